//! Core library for the city comfort service.
//!
//! This crate defines:
//! - The comfort scoring profile, calculator and ranker
//! - Configuration & credentials handling
//! - Abstractions over the weather and identity providers
//! - The cached fetch cycle that ties them together
//!
//! It is used by `comfort-web` and `comfort-cli`.

pub mod cities;
pub mod config;
pub mod identity;
pub mod model;
pub mod profile;
pub mod provider;
pub mod rank;
pub mod scoring;
pub mod service;

pub use cities::City;
pub use config::{Auth0Config, Config, ServerConfig};
pub use identity::{Auth0Client, IdentityError, IdentityProvider};
pub use model::{ScoredCity, WeatherObservation};
pub use profile::ScoringProfile;
pub use provider::{FetchError, WeatherProvider};
pub use rank::rank_cities;
pub use scoring::{ScoreBreakdown, ScoreCalculator};
pub use service::{CacheStatus, ComfortService, RankedBatch};
