use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use comfort_core::{ComfortService, Config, ScoredCity};
use inquire::{Password, Text};
use std::{fmt::Write, path::PathBuf};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "comfort", version, about = "Ranks cities by how comfortable their weather is")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on; overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch, score and print the ranking once.
    Rank,

    /// Store the OpenWeather API key and city list location.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Configure => self.configure(),
            Command::Serve { bind } => {
                let config = self.effective_config()?;
                let bind = bind.clone().unwrap_or_else(|| config.server.bind.clone());
                comfort_web::serve(&config, &bind).await
            }
            Command::Rank => {
                let config = self.effective_config()?;
                let service = ComfortService::from_config(&config)?;
                let batch = service.fetch_cycle().await;
                println!("Comfort ranking at {}", Local::now().format("%Y-%m-%d %H:%M"));
                print!("{}", format_table(&batch));
                Ok(())
            }
        }
    }

    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    fn stored_config(&self) -> anyhow::Result<Config> {
        Config::load_from(&self.config_path()?)
    }

    /// Stored config with environment overrides applied.
    fn effective_config(&self) -> anyhow::Result<Config> {
        let mut config = self.stored_config()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn configure(&self) -> anyhow::Result<()> {
        let path = self.config_path()?;
        let mut config = self.stored_config()?;

        let api_key = Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        let cities_file = Text::new("City list file:")
            .with_default(&config.cities_file.display().to_string())
            .prompt()
            .context("Failed to read city list path")?;

        config.api_key = Some(api_key.trim().to_string());
        config.cities_file = PathBuf::from(cities_file);
        config.save_to(&path)?;

        info!(path = %path.display(), "configuration saved");
        println!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// Render a batch in rank order, one city per line.
fn format_table(batch: &[ScoredCity]) -> String {
    if batch.is_empty() {
        return "No cities could be scored.\n".to_string();
    }

    let mut rows: Vec<&ScoredCity> = batch.iter().collect();
    rows.sort_by_key(|c| c.rank);

    let mut out = format!(
        "{:>4}  {:<16} {:>6} {:>7} {:>5} {:>6}  {}\n",
        "#", "City", "Score", "Temp", "Hum", "Wind", "Conditions"
    );
    for city in rows {
        let obs = &city.observation;
        let _ = writeln!(
            out,
            "{:>4}  {:<16} {:>6.1} {:>6.1}C {:>4}% {:>6.1}  {}",
            city.rank,
            obs.city_name,
            city.comfort_score,
            obs.temperature,
            obs.humidity,
            obs.wind_speed,
            obs.weather_description,
        );
    }
    out
}
