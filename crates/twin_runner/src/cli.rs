use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use twin_core::config::TwinConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable log lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Digital twin of an EV convoy sharing a charging station.
#[derive(Debug, Parser)]
#[command(name = "ev-twin", version)]
pub struct Args {
    /// JSON file with configuration overrides.
    #[arg(long, env = "EV_TWIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for departure staggering.
    #[arg(long, env = "EV_TWIN_SEED")]
    pub seed: Option<u64>,

    #[arg(long)]
    pub vehicles: Option<usize>,

    #[arg(long)]
    pub chargers: Option<usize>,

    /// Simulated minutes to run.
    #[arg(long = "horizon-min")]
    pub horizon_min: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Args {
    /// Loads the config file (or defaults) and applies flag overrides.
    pub fn resolve_config(&self) -> Result<TwinConfig> {
        let mut config = match &self.config {
            Some(path) => TwinConfig::from_json_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => TwinConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(vehicles) = self.vehicles {
            config.vehicle_count = vehicles;
        }
        if let Some(chargers) = self.chargers {
            config.charger_slots = chargers;
        }
        if let Some(minutes) = self.horizon_min {
            config.horizon_minutes = minutes;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "ev-twin",
            "--seed",
            "7",
            "--vehicles",
            "5",
            "--chargers",
            "1",
            "--horizon-min",
            "120",
            "--format",
            "json",
        ]);
        assert_eq!(args.format, OutputFormat::Json);
        let config = args.resolve_config().expect("config");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.vehicle_count, 5);
        assert_eq!(config.charger_slots, 1);
        assert_eq!(config.horizon_minutes, 120.0);
        assert_eq!(config.trip_distance_km, 98.0);
    }

    #[test]
    fn invalid_override_is_reported() {
        let args = Args::parse_from(["ev-twin", "--chargers", "0"]);
        let err = args.resolve_config().expect_err("zero chargers");
        assert!(format!("{err:#}").contains("charger_slots"));
    }

    #[test]
    fn flags_take_precedence_over_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(
            &mut file,
            br#"{ "charger_slots": 4, "trip_distance_km": 50.0, "seed": 1 }"#,
        )
        .expect("write config");
        let path = file.path().to_string_lossy().into_owned();

        let args = Args::parse_from(["ev-twin", "--config", path.as_str(), "--seed", "9"]);
        let config = args.resolve_config().expect("config");
        assert_eq!(config.charger_slots, 4);
        assert_eq!(config.trip_distance_km, 50.0);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let args = Args::parse_from(["ev-twin", "--config", "/nonexistent/ev-twin.json"]);
        let err = args.resolve_config().expect_err("missing file");
        assert!(format!("{err:#}").contains("/nonexistent/ev-twin.json"));
    }
}
