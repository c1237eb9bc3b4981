//! Command line entry point: stages a scenario and plays its engagements.
mod config;
mod presentation;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::CliConfig;
use presentation::Narrator;
use warfare_content::{RulesLoader, ScenarioLoader};
use warfare_runtime::{Event, MovementEvent, OracleManager, Runtime, RuntimeError, Topic};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::parse();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let content = config.content();
    let rules = match &config.rules {
        Some(path) => RulesLoader::load(path)?,
        None => content.load_rules()?,
    };
    let scenario = match &config.scenario_file {
        Some(path) => ScenarioLoader::load(path)?,
        None => content.load_scenario(&config.scenario)?,
    };
    info!(
        scenario = %scenario.name,
        units = scenario.state.units.len(),
        engagements = scenario.engagements.len(),
        "scenario loaded"
    );

    let narrator = Narrator::new(&scenario);
    let runtime = Runtime::builder()
        .config(config.runtime())
        .initial_state(scenario.state.clone())
        .oracles(OracleManager::from_scenario(&scenario, rules))
        .build()
        .await?;
    let handle = runtime.handle();
    let reporter = tokio::spawn(narrator.clone().follow(
        handle.subscribe(Topic::Battle),
        handle.subscribe(Topic::Movement),
    ));
    let mut movement_rx = handle.subscribe(Topic::Movement);

    for engagement in &scenario.engagements {
        let outcome = match handle
            .attack(engagement.attacker, engagement.defender, engagement.combat)
            .await
        {
            Ok(outcome) => outcome,
            // Already reported on the battle topic.
            Err(RuntimeError::Combat(_)) => continue,
            Err(err) => return Err(err.into()),
        };
        if config.json {
            println!("{}", serde_json::to_string(&outcome)?);
        }
        if outcome.deferred_move.is_some() {
            await_settled_move(&mut movement_rx).await;
        }
    }

    let state = handle.query_state().await?;
    for line in narrator.summarize(&state) {
        println!("{line}");
    }

    drop(movement_rx);
    drop(handle);
    runtime.shutdown().await?;
    reporter.await.context("battle log task failed")?;
    Ok(())
}

/// Waits until the pending advance completes, fails, or is abandoned.
async fn await_settled_move(rx: &mut broadcast::Receiver<Event>) {
    let settle = async {
        loop {
            match rx.recv().await {
                Ok(Event::Movement(MovementEvent::Requested(_))) => continue,
                Ok(_) | Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    };
    if tokio::time::timeout(Duration::from_secs(30), settle)
        .await
        .is_err()
    {
        warn!("advance still pending after 30s; continuing");
    }
}

/// Logs to stderr, and additionally to `<log_dir>/warfare.log` when given.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(
    log_dir: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, "warfare.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        info!("Log file: {}/warfare.log", dir.display());
    }
    Ok(guard)
}
