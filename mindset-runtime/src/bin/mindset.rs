//! Terminal driver: play one MINDSET run from the command line.
//!
//! ```text
//! mindset [CONFIG] [--seed N] [--scenario INDEX]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mindset_core::catalog::{CatalogTemplate, ScenarioCatalog};
use mindset_core::config::MindsetConfig;
use mindset_core::narration::{companion_line, companion_mood};
use mindset_core::profile::JsonFileProfileStore;
use mindset_core::session::{GameSession, SessionEvent, SessionSnapshot};
use mindset_runtime::commands::TERMINAL_HELP;
use mindset_runtime::{HostConfig, SessionHandle, SessionHost, TerminalInput, parse_terminal_line};

/// Spot-the-mistake detective training in the terminal.
#[derive(Debug, Parser)]
#[command(name = "mindset", version, about)]
struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(env = "MINDSET_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for the error variants, overriding `[session] seed`.
    #[arg(long)]
    seed: Option<u64>,

    /// Play only this catalog index, overriding `[session] scenario`.
    #[arg(long)]
    scenario: Option<usize>,
}

impl Args {
    fn load_config(&self) -> Result<MindsetConfig> {
        let mut config = match &self.config {
            Some(path) => MindsetConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => MindsetConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut MindsetConfig) {
        if let Some(seed) = self.seed {
            config.session.seed = Some(seed);
        }
        if let Some(scenario) = self.scenario {
            config.session.scenario = Some(scenario);
        }
    }
}

fn load_catalog(config: &MindsetConfig) -> Result<ScenarioCatalog> {
    let seed = config.session.seed.unwrap_or_else(rand::random);
    info!(seed, "Building scenario catalog");
    let catalog = match &config.session.catalog_path {
        Some(path) => CatalogTemplate::from_file(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?
            .build(seed)?,
        None => ScenarioCatalog::builtin(seed)?,
    };
    Ok(catalog)
}

fn render(snapshot: &SessionSnapshot, catalog: &ScenarioCatalog, name: &str) {
    let Some(phase) = snapshot
        .scenario_id
        .and_then(|id| catalog.by_id(id))
        .zip(snapshot.phase_id.as_ref())
        .and_then(|(scenario, phase)| scenario.phase(phase))
    else {
        return;
    };
    let state = &snapshot.state;
    println!();
    if let Some(title) = &snapshot.scenario_title {
        println!("{title}: phase {}/{}", snapshot.phase_number, snapshot.phase_count);
    }
    println!(
        "[{:?}] {}",
        companion_mood(state.game_phase),
        companion_line(state, phase, name)
    );
    if let Some(error) = &state.collaborator_error {
        println!("(!) {error}");
    }
    match state.game_phase {
        mindset_core::GamePhase::Touch => {
            for element in &phase.elements {
                let mark = if state.found_targets.contains(&element.id) {
                    "x"
                } else if state.incorrect_taps.contains_key(&element.id) {
                    "!"
                } else if state.highlighted.as_ref() == Some(&element.id) {
                    "*"
                } else {
                    " "
                };
                println!("  [{mark}] {:<20} {}", element.id, element.label);
            }
        }
        mindset_core::GamePhase::Hint => println!("Hint: {}", snapshot.hint_text),
        _ => {}
    }
}

async fn drive(handle: SessionHandle, catalog: Arc<ScenarioCatalog>, name: String) -> Result<()> {
    let mut events = handle.subscribe_events();
    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{TERMINAL_HELP}");

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot, &catalog, &name);
            }
            event = events.recv() => {
                if let Ok(SessionEvent::SessionCompleted(summary)) = event {
                    println!();
                    println!("{} {}", summary.stars, summary.stars.title());
                    println!(
                        "Scenarios: {}  Mistakes found: {}  Hints: {}",
                        summary.stats.scenarios_completed,
                        summary.stats.targets_found,
                        summary.stats.hints_used
                    );
                    println!("Type `reset` to play again or `quit` to leave.");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let phase = handle.snapshot().state.game_phase;
                match parse_terminal_line(&line, phase) {
                    Some(TerminalInput::Command(command)) => handle.send(command).await?,
                    Some(TerminalInput::Status) => render(&handle.snapshot(), &catalog, &name),
                    Some(TerminalInput::Help) => println!("{TERMINAL_HELP}"),
                    Some(TerminalInput::Quit) => break,
                    None => println!("?  (type `help`)"),
                }
            }
        }
    }

    handle.shutdown().await?;
    if let Some(profile) = handle.profile() {
        println!(
            "{}: {} sessions, {} mistakes found, best {}",
            profile.display_name,
            profile.total_sessions,
            profile.total_targets_found,
            profile.best_star_rating.map_or_else(String::new, |s| s.to_string())
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().load_config()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let catalog = Arc::new(load_catalog(&config)?);
    let session = GameSession::from_config(Arc::clone(&catalog), &config)?;
    let store = Arc::new(JsonFileProfileStore::open(&config.player.profile_dir)?);
    let mut host_config = HostConfig::from_config(&config);
    host_config.profile_id = store.resolve_id(config.player.profile_id)?;
    let name = host_config.player_name.clone();
    info!(profile = %host_config.profile_id, "Starting session");

    let handle = SessionHost::spawn(session, store, host_config);
    drive(handle, catalog, name).await
}
