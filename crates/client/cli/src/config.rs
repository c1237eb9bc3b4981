//! Command line and environment configuration.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use warfare_content::ContentFactory;
use warfare_runtime::RuntimeConfig;

/// Play out the scripted engagements of a battle scenario.
///
/// Every option can also be set through the environment (a `.env` file in
/// the working directory is honoured).
#[derive(Clone, Debug, Parser)]
#[command(name = "warfare", version, about)]
pub struct CliConfig {
    /// Bundled scenario to play (file stem under `<data-dir>/scenarios`).
    #[arg(default_value = "river_ford", env = "WARFARE_SCENARIO")]
    pub scenario: String,

    /// Play this scenario file instead of a bundled one.
    #[arg(long, env = "WARFARE_SCENARIO_FILE")]
    pub scenario_file: Option<PathBuf>,

    /// Rules file; defaults to `<data-dir>/rules.toml`.
    #[arg(long, env = "WARFARE_RULES")]
    pub rules: Option<PathBuf>,

    /// Content directory; defaults to the data shipped with the crate.
    #[arg(long, env = "WARFARE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Milliseconds a unit spends per cell when advancing after combat.
    #[arg(long, default_value_t = 0, env = "WARFARE_STEP_DELAY_MS")]
    pub step_delay_ms: u64,

    /// Print each combat outcome as a JSON line on stdout.
    #[arg(long)]
    pub json: bool,

    /// Also write logs to `<log-dir>/warfare.log`.
    #[arg(long, env = "WARFARE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    pub fn content(&self) -> ContentFactory {
        match &self.data_dir {
            Some(dir) => ContentFactory::new(dir.clone()),
            None => ContentFactory::bundled(),
        }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            movement_step_delay: Duration::from_millis(self.step_delay_ms),
            ..RuntimeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_play_the_bundled_river_ford() {
        let config = CliConfig::try_parse_from(["warfare"]).unwrap();
        assert_eq!(config.scenario, "river_ford");
        assert!(config.rules.is_none());
        assert!(!config.json);
        assert_eq!(config.runtime().movement_step_delay, Duration::ZERO);
        assert!(config.content().data_dir().ends_with("data"));
    }

    #[test]
    fn options_override_defaults() {
        let config = CliConfig::try_parse_from([
            "warfare",
            "barbarian_raid",
            "--step-delay-ms",
            "25",
            "--json",
            "--data-dir",
            "/srv/warfare",
        ])
        .unwrap();
        assert_eq!(config.scenario, "barbarian_raid");
        assert!(config.json);
        assert_eq!(
            config.runtime().movement_step_delay,
            Duration::from_millis(25)
        );
        assert_eq!(
            config.content().data_dir(),
            std::path::Path::new("/srv/warfare")
        );
    }
}
