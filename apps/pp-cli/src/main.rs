mod fixture;

use clap::{Parser, Subcommand};
use fixture::{Fixture, FixtureBackend};
use pp_app::{
    AppError, AppResult, Completion, RecordingView, RemoteWorker, Session, SessionConfig, UiEvent,
};
use pp_core::{SessionId, VirtualClock};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// How long `replay` waits for the fixture service before giving up.
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "pp-cli")]
#[command(about = "Phase-plane explorer CLI - schema checks and headless session replay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model schema file (YAML, or JSON by extension)
    CheckSchema {
        /// Path to the schema file
        schema_path: PathBuf,
    },
    /// Drive a session through a scripted event sequence against a fixture service
    Replay {
        /// YAML list of timed UI events
        #[arg(long)]
        script: PathBuf,
        /// YAML fixture describing the models the service knows
        #[arg(long)]
        fixture: PathBuf,
        /// Session configuration (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fixed session id, for reproducible routes (random when omitted)
        #[arg(long)]
        session: Option<SessionId>,
    },
}

/// One scripted user event, delivered `at_ms` after the session starts.
#[derive(Debug, Deserialize)]
struct ScriptStep {
    at_ms: u64,
    event: UiEvent,
}

type ReplaySession = Session<RemoteWorker, RecordingView>;

fn main() -> AppResult<()> {
    // Logs go to stderr; stdout carries the replay transcript.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CheckSchema { schema_path } => cmd_check_schema(&schema_path),
        Commands::Replay {
            script,
            fixture,
            config,
            session,
        } => cmd_replay(&script, &fixture, config.as_deref(), session),
    }
}

fn cmd_check_schema(schema_path: &Path) -> AppResult<()> {
    println!("Checking schema: {}", schema_path.display());
    let schema = pp_schema::load_model_schema(schema_path)?;
    let graph = &schema.graph_params;
    println!("✓ Schema is valid");
    println!("  Parameters: {}", schema.params.len());
    for p in &schema.params {
        println!(
            "    {} in [{}, {}] step {} default {}",
            p.name, p.min, p.max, p.step, p.default
        );
    }
    println!(
        "  State variables: {}",
        graph.state_variable_names().join(", ")
    );
    println!("  Default axes: {} / {}", graph.default_sv[0], graph.default_sv[1]);
    if !graph.modes.is_empty() {
        println!("  Modes: {} (default {})", graph.modes.join(", "), graph.default_mode);
    }
    Ok(())
}

fn cmd_replay(
    script_path: &Path,
    fixture_path: &Path,
    config_path: Option<&Path>,
    session_id: Option<SessionId>,
) -> AppResult<()> {
    let config = match config_path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let fixture: Fixture = pp_schema::load_yaml(fixture_path)?;
    for (name, schema) in &fixture.models {
        pp_schema::validate_model_schema(schema)
            .map_err(|e| AppError::Config(format!("fixture model '{name}': {e}")))?;
    }
    let steps: Vec<ScriptStep> = pp_schema::load_yaml(script_path)?;
    tracing::info!(steps = steps.len(), models = fixture.models.len(), "starting replay");

    let (worker, completions) = RemoteWorker::start(FixtureBackend::new(fixture));
    let id = session_id.unwrap_or_else(SessionId::new_random);
    let mut session = Session::with_id(id, config, worker, RecordingView::new());
    let mut clock = VirtualClock::new();
    println!("Session {}", session.id());

    for step in steps {
        let at = Duration::from_millis(step.at_ms);
        if at < clock.now() {
            return Err(AppError::Config(format!(
                "script step at {} ms goes back in time",
                step.at_ms
            )));
        }
        run_until(&mut session, &completions, &mut clock, at)?;
        session.handle(step.event, clock.now());
        settle(&mut session, &completions)?;
        emit(&mut session, &clock)?;
    }
    // Let trailing debounced actions fire.
    if let Some(deadline) = session.next_deadline() {
        run_until(&mut session, &completions, &mut clock, deadline)?;
    }

    println!(
        "Done at {} ms: model {}, phase {:?}, {} trajectories",
        clock.now().as_millis(),
        session.model_name().unwrap_or("-"),
        session.phase(),
        session.trajectories().len()
    );
    Ok(())
}

/// Advance virtual time to `until`, firing every debounce deadline on the way.
fn run_until(
    session: &mut ReplaySession,
    completions: &Receiver<Completion>,
    clock: &mut VirtualClock,
    until: Duration,
) -> AppResult<()> {
    while let Some(deadline) = session.next_deadline().filter(|d| *d <= until) {
        clock.advance_to(deadline);
        session.tick(clock.now());
        settle(session, completions)?;
        emit(session, clock)?;
    }
    clock.advance_to(until);
    Ok(())
}

/// Feed replies back until nothing is outstanding. Replies may trigger
/// follow-up requests, which are waited for as well.
fn settle(session: &mut ReplaySession, completions: &Receiver<Completion>) -> AppResult<()> {
    while session.pending_requests() > 0 {
        let completion = completions
            .recv_timeout(REPLY_TIMEOUT)
            .map_err(|e| AppError::Remote {
                operation: "replay",
                message: e.to_string(),
            })?;
        session.complete(completion);
    }
    Ok(())
}

fn emit(session: &mut ReplaySession, clock: &VirtualClock) -> AppResult<()> {
    let at = clock.now().as_millis();
    for call in session.view_mut().take_calls() {
        println!("{at:>6} ms  {}", serde_json::to_string(&call)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos")
            .join(name)
    }

    #[test]
    fn demo_files_load() {
        let steps: Vec<ScriptStep> = pp_schema::load_yaml(&demo("script.yaml")).unwrap();
        assert!(steps.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
        assert!(matches!(steps[0].event, UiEvent::TreeChanged { .. }));

        let fixture: Fixture = pp_schema::load_yaml(&demo("fixture.yaml")).unwrap();
        for schema in fixture.models.values() {
            pp_schema::validate_model_schema(schema).unwrap();
        }

        let config = SessionConfig::load(&demo("session.yaml")).unwrap();
        assert_eq!(config.tree.integrator_fields, vec!["integrator".to_string()]);
        pp_schema::load_model_schema(&demo("oscillator.yaml")).unwrap();
    }
}
