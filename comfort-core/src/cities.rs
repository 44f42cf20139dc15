use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{error, warn};

/// A city the service tracks, identified by its OpenWeatherMap id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CitiesFile {
    #[serde(rename = "List", default)]
    list: Vec<CityEntry>,
}

#[derive(Debug, Deserialize)]
struct CityEntry {
    #[serde(rename = "CityCode")]
    code: String,
    #[serde(rename = "CityName")]
    name: String,
}

/// Parse a `cities.json` document. Entries whose code is not an integer are skipped.
pub fn parse_cities(json: &str) -> Result<Vec<City>> {
    let file: CitiesFile = serde_json::from_str(json).context("Failed to parse cities JSON")?;

    let cities = file
        .list
        .into_iter()
        .filter_map(|entry| match entry.code.trim().parse::<i64>() {
            Ok(id) => Some(City { id, name: entry.name }),
            Err(_) => {
                warn!(
                    city = %entry.name,
                    code = %entry.code,
                    "skipping city with unparseable code"
                );
                None
            }
        })
        .collect();

    Ok(cities)
}

pub fn read_cities(path: &Path) -> Result<Vec<City>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cities file: {}", path.display()))?;
    parse_cities(&json)
}

/// Like [`read_cities`], but an unreadable file logs an error and yields no cities.
pub fn load_cities(path: &Path) -> Vec<City> {
    read_cities(path).unwrap_or_else(|err| {
        error!("failed to load city list: {err:#}");
        Vec::new()
    })
}
