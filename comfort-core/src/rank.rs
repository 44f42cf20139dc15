use crate::model::ScoredCity;

/// Assign dense 1-based ranks by descending comfort score.
///
/// The returned batch keeps the input order; only `rank` changes. Equal
/// scores get consecutive ranks in input order.
pub fn rank_cities(mut cities: Vec<ScoredCity>) -> Vec<ScoredCity> {
    let mut order: Vec<usize> = (0..cities.len()).collect();
    // `sort_by` is stable, which is what orders ties by input position.
    order.sort_by(|&a, &b| cities[b].comfort_score.total_cmp(&cities[a].comfort_score));

    for (position, index) in order.into_iter().enumerate() {
        cities[index].rank = position as u32 + 1;
    }

    cities
}
