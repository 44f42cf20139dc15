//! Comfort scoring: one observation in, one bounded score out.
//!
//! The score is the sum of five weighted components (temperature, humidity,
//! wind, visibility, cloud cover), scaled by every penalty multiplier that
//! applies, clamped to `[0, 100]` and rounded to one decimal place with
//! round-half-away-from-zero.

use serde::Serialize;

use crate::{model::WeatherObservation, profile::ScoringProfile};

/// Per-component view of a single score computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
    pub visibility: f64,
    pub cloud: f64,
    pub subtotal: f64,
    pub multiplier: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    profile: ScoringProfile,
}

impl ScoreCalculator {
    pub fn new(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Comfort score in `[0, 100]`. Defined for every finite input.
    pub fn score(&self, obs: &WeatherObservation) -> f64 {
        self.breakdown(obs).score
    }

    pub fn breakdown(&self, obs: &WeatherObservation) -> ScoreBreakdown {
        let temperature = self.temperature_points(obs.temperature);
        let humidity = self.humidity_points(obs.temperature, f64::from(obs.humidity));
        let wind = self.wind_points(obs.temperature, obs.wind_speed);
        let visibility = self.visibility_points(obs.visibility);
        let cloud = self.cloud_points(obs.is_snowing, f64::from(obs.cloud_percentage));

        let subtotal = temperature + humidity + wind + visibility + cloud;
        let multiplier = self.penalty_multiplier(obs);
        let score = round_to_tenth((subtotal * multiplier).clamp(0.0, 100.0));

        ScoreBreakdown {
            temperature,
            humidity,
            wind,
            visibility,
            cloud,
            subtotal,
            multiplier,
            score,
        }
    }

    fn temperature_points(&self, temp: f64) -> f64 {
        let rule = &self.profile.temperature;
        let d = (temp - rule.optimal_c).abs();

        if d <= rule.mild_band {
            rule.max_points * (1.0 - d / rule.mild_divisor)
        } else if d <= rule.moderate_band {
            rule.max_points * (1.0 - d / rule.moderate_divisor)
        } else {
            (rule.max_points * (1.0 - d / rule.severe_divisor)).max(0.0)
        }
    }

    /// Humidity barely matters in the cold and dominates in the heat.
    fn humidity_weight(&self, temp: f64) -> f64 {
        let rule = &self.profile.humidity;
        if temp < rule.cold_below_c {
            rule.cold_weight
        } else if temp < rule.cool_below_c {
            rule.cool_weight
        } else if temp > rule.hot_above_c {
            rule.hot_weight
        } else {
            rule.mild_weight
        }
    }

    fn humidity_points(&self, temp: f64, humidity: f64) -> f64 {
        let rule = &self.profile.humidity;
        let w = self.humidity_weight(temp);

        if humidity <= rule.dry_limit {
            w * (rule.dry_floor + (1.0 - rule.dry_floor) * (humidity / rule.dry_limit))
        } else if humidity <= rule.comfortable_limit {
            w * (1.0 - (humidity - rule.optimal).abs() / rule.comfortable_span)
        } else {
            (w * (1.0 - (humidity - rule.comfortable_limit) / rule.humid_span)).max(0.0)
        }
    }

    fn wind_points(&self, temp: f64, wind_speed: f64) -> f64 {
        let rule = &self.profile.wind;
        let optimal = if temp < rule.cool_below_c {
            rule.calm_optimal_mps
        } else {
            rule.breezy_optimal_mps
        };

        (rule.max_points * (1.0 - (wind_speed - optimal).abs() / rule.tolerance_mps)).max(0.0)
    }

    fn visibility_points(&self, visibility_km: i32) -> f64 {
        let rule = &self.profile.visibility;
        if visibility_km == 0 {
            return 0.0;
        }
        (f64::from(visibility_km) * rule.points_per_km).min(rule.max_points)
    }

    // May go negative for out-of-range cloud cover; the final clamp absorbs it.
    fn cloud_points(&self, is_snowing: bool, cloud_pct: f64) -> f64 {
        let rule = &self.profile.cloud;
        if is_snowing {
            return 0.0;
        }
        rule.max_points * (1.0 - (cloud_pct - rule.optimal_pct).abs() / rule.span_pct)
    }

    fn penalty_multiplier(&self, obs: &WeatherObservation) -> f64 {
        let p = &self.profile.penalties;
        let mut multiplier = 1.0;

        if obs.temperature <= p.freezing_at_or_below_c {
            multiplier *= p.freezing;
        }
        if obs.temperature > p.heat_above_c {
            multiplier *= p.heat;
        }
        if obs.is_snowing {
            multiplier *= p.snow;
        }
        if obs.wind_speed > p.wind_chill_wind_above_mps
            && obs.temperature < p.wind_chill_temp_below_c
        {
            multiplier *= p.wind_chill;
        }

        multiplier
    }
}

/// Round to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn weather(
        temp: f64,
        humidity: i32,
        wind: f64,
        clouds: i32,
        description: &str,
    ) -> WeatherObservation {
        WeatherObservation {
            city_id: 1,
            city_name: "Test".to_string(),
            temperature: temp,
            humidity,
            wind_speed: wind,
            cloud_percentage: clouds,
            visibility: 10,
            pressure: 1013,
            weather_description: description.to_string(),
            is_snowing: WeatherObservation::describes_snow(description),
            observed_at: Utc::now(),
        }
    }

    fn score(obs: &WeatherObservation) -> f64 {
        ScoreCalculator::default().score(obs)
    }

    #[test]
    fn ideal_conditions_score_98() {
        assert_eq!(score(&weather(22.0, 50, 4.0, 30, "Clear")), 98.0);
    }

    #[test]
    fn near_optimal_weather_scores_between_95_and_100() {
        let s = score(&weather(22.0, 50, 3.0, 30, "Clear"));
        assert_eq!(s, 96.1);
        assert!((95.0..=100.0).contains(&s));
    }

    #[test]
    fn extreme_tropical_heat_scores_low() {
        let s = score(&weather(35.0, 90, 1.0, 0, "Extreme"));
        assert_eq!(s, 32.6);
        assert!((0.0..55.0).contains(&s));
    }

    #[test]
    fn hot_humid_scores_below_warm_normal() {
        let hot_humid = score(&weather(30.0, 80, 2.0, 50, "Muggy"));
        let normal = score(&weather(27.0, 65, 2.0, 50, "Fine"));

        assert_eq!(normal, 76.0);
        assert!(hot_humid < normal, "hot+humid {hot_humid} should be below {normal}");
    }

    #[test]
    fn dry_air_beats_humid_air() {
        let dry = score(&weather(22.0, 25, 3.0, 30, "Dry"));
        let humid = score(&weather(22.0, 75, 3.0, 30, "Humid"));

        assert_eq!(dry, 95.4);
        assert_eq!(humid, 91.5);
        assert!(dry > humid);
    }

    #[test]
    fn extreme_inputs_stay_in_range() {
        let cold = score(&weather(-10.0, 90, 15.0, 100, "Test"));
        let heat = score(&weather(50.0, 10, 0.0, 0, "Test"));

        assert_eq!(cold, 8.2);
        assert_eq!(heat, 36.4);
        for s in [cold, heat] {
            assert!((0.0..=100.0).contains(&s), "score out of range: {s}");
        }
    }

    #[test]
    fn snow_zeroes_cloud_and_halves_total() {
        let mut obs = weather(-2.0, 80, 3.0, 90, "light snow");
        obs.visibility = 5;
        let b = ScoreCalculator::default().breakdown(&obs);

        assert_eq!(b.cloud, 0.0);
        assert!((b.multiplier - 0.65 * 0.5).abs() < 1e-12);
        assert_eq!(b.score, 10.5);
    }

    #[test]
    fn penalties_compound() {
        let b = ScoreCalculator::default().breakdown(&weather(-10.0, 90, 15.0, 100, "Test"));
        assert!((b.multiplier - 0.65 * 0.75).abs() < 1e-12);

        let b = ScoreCalculator::default().breakdown(&weather(22.0, 50, 12.0, 30, "Windy"));
        assert_eq!(b.multiplier, 1.0);
    }

    #[test]
    fn zero_visibility_scores_nothing() {
        let mut obs = weather(22.0, 50, 4.0, 30, "Fog");
        obs.visibility = 0;
        let b = ScoreCalculator::default().breakdown(&obs);

        assert_eq!(b.visibility, 0.0);
        assert_eq!(b.score, 86.0);
    }

    #[test]
    fn visibility_caps_at_twelve_points() {
        let mut obs = weather(22.0, 50, 4.0, 30, "Clear");
        obs.visibility = 40;
        assert_eq!(ScoreCalculator::default().breakdown(&obs).visibility, 12.0);

        obs.visibility = 5;
        assert!((ScoreCalculator::default().breakdown(&obs).visibility - 6.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_inputs_clamp_to_zero() {
        let mut obs = weather(-40.0, 200, 50.0, 250, "Blizzard");
        obs.visibility = 0;
        let b = ScoreCalculator::default().breakdown(&obs);

        assert!(b.subtotal < 0.0);
        assert_eq!(b.score, 0.0);
    }

    #[test]
    fn humidity_weight_follows_temperature_bands() {
        let calc = ScoreCalculator::default();
        assert_eq!(calc.humidity_weight(4.9), 12.0);
        assert_eq!(calc.humidity_weight(5.0), 18.0);
        assert_eq!(calc.humidity_weight(15.0), 23.0);
        assert_eq!(calc.humidity_weight(28.0), 23.0);
        assert_eq!(calc.humidity_weight(28.1), 28.0);
    }

    #[test]
    fn wind_optimum_is_calmer_in_the_cold() {
        let calc = ScoreCalculator::default();
        assert_eq!(calc.wind_points(10.0, 1.0), 15.0);
        assert_eq!(calc.wind_points(20.0, 4.0), 15.0);
        assert_eq!(calc.wind_points(20.0, 20.0), 0.0);
    }

    #[test]
    fn score_decreases_away_from_optimum() {
        let calc = ScoreCalculator::default();
        let at = |t: f64| calc.score(&weather(t, 50, 3.0, 30, "Clear"));

        let mut previous = at(22.0);
        for step in 1..=12 {
            let t = 22.0 + f64::from(step) * 0.5;
            let current = at(t);
            assert!(current < previous, "{t}°C: {current} !< {previous}");
            previous = current;
        }

        let mut previous = at(22.0);
        for step in 1..=12 {
            let t = 22.0 - f64::from(step) * 0.5;
            let current = at(t);
            assert!(current < previous, "{t}°C: {current} !< {previous}");
            previous = current;
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let obs = weather(17.3, 63, 5.5, 72, "broken clouds");
        let calc = ScoreCalculator::default();
        assert_eq!(calc.score(&obs), calc.score(&obs));
        assert_eq!(calc.breakdown(&obs), calc.breakdown(&obs));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to_tenth(0.25), 0.3);
        assert_eq!(round_to_tenth(1.75), 1.8);
        assert_eq!(round_to_tenth(-0.25), -0.3);
        assert_eq!(round_to_tenth(42.04), 42.0);
    }
}
