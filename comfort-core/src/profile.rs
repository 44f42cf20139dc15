//! Named snapshot of every constant the comfort formula uses.
//!
//! The `version` tag identifies the formula. Cached results are keyed by it,
//! so any change to a constant below must come with a new version string.

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub version: &'static str,
    pub temperature: TemperatureRule,
    pub humidity: HumidityRule,
    pub wind: WindRule,
    pub visibility: VisibilityRule,
    pub cloud: CloudRule,
    pub penalties: Penalties,
}

/// Three-tier distance penalty around an ideal temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRule {
    pub optimal_c: f64,
    pub max_points: f64,
    /// Deviations up to this many degrees use `mild_divisor`.
    pub mild_band: f64,
    pub mild_divisor: f64,
    /// Deviations up to this many degrees use `moderate_divisor`.
    pub moderate_band: f64,
    pub moderate_divisor: f64,
    pub severe_divisor: f64,
}

/// Humidity scoring, weighted by how much humidity matters at the current
/// temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct HumidityRule {
    pub cold_below_c: f64,
    pub cold_weight: f64,
    pub cool_below_c: f64,
    pub cool_weight: f64,
    pub hot_above_c: f64,
    pub hot_weight: f64,
    pub mild_weight: f64,
    pub dry_limit: f64,
    /// Fraction of the weight awarded at 0% humidity.
    pub dry_floor: f64,
    pub optimal: f64,
    pub comfortable_limit: f64,
    pub comfortable_span: f64,
    pub humid_span: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindRule {
    pub max_points: f64,
    /// Below this temperature the calm optimum applies.
    pub cool_below_c: f64,
    pub calm_optimal_mps: f64,
    pub breezy_optimal_mps: f64,
    pub tolerance_mps: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityRule {
    pub max_points: f64,
    pub points_per_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudRule {
    pub max_points: f64,
    pub optimal_pct: f64,
    pub span_pct: f64,
}

/// Multipliers applied to the summed components. Every matching penalty
/// compounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Penalties {
    pub freezing_at_or_below_c: f64,
    pub freezing: f64,
    pub heat_above_c: f64,
    pub heat: f64,
    pub snow: f64,
    pub wind_chill_wind_above_mps: f64,
    pub wind_chill_temp_below_c: f64,
    pub wind_chill: f64,
}

impl ScoringProfile {
    pub fn standard() -> Self {
        Self {
            version: "comfort-v3",
            temperature: TemperatureRule {
                optimal_c: 22.0,
                max_points: 40.0,
                mild_band: 5.0,
                mild_divisor: 25.0,
                moderate_band: 15.0,
                moderate_divisor: 20.0,
                severe_divisor: 30.0,
            },
            humidity: HumidityRule {
                cold_below_c: 5.0,
                cold_weight: 12.0,
                cool_below_c: 15.0,
                cool_weight: 18.0,
                hot_above_c: 28.0,
                hot_weight: 28.0,
                mild_weight: 23.0,
                dry_limit: 30.0,
                dry_floor: 0.8,
                optimal: 50.0,
                comfortable_limit: 70.0,
                comfortable_span: 40.0,
                humid_span: 25.0,
            },
            wind: WindRule {
                max_points: 15.0,
                cool_below_c: 15.0,
                calm_optimal_mps: 1.0,
                breezy_optimal_mps: 4.0,
                tolerance_mps: 8.0,
            },
            visibility: VisibilityRule { max_points: 12.0, points_per_km: 1.2 },
            cloud: CloudRule { max_points: 8.0, optimal_pct: 30.0, span_pct: 100.0 },
            penalties: Penalties {
                freezing_at_or_below_c: 0.0,
                freezing: 0.65,
                heat_above_c: 32.0,
                heat: 0.70,
                snow: 0.50,
                wind_chill_wind_above_mps: 10.0,
                wind_chill_temp_below_c: 10.0,
                wind_chill: 0.75,
            },
        }
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::standard()
    }
}
