//! Headless simulator: runs one encounter with a scripted player and prints
//! the fight and its report.
mod autopilot;
mod config;
mod presentation;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use autopilot::Autopilot;
use config::CliConfig;
use game_content::ContentFactory;
use game_core::{CombatEvent, SessionId};
use runtime::{
    CombatOrchestrator, FileReportRepository, FileSessionRepository, InputRequest,
    OracleManager, Response,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    setup_logging(&config)?;

    let content = ContentFactory::load_dir(&config.data_dir)
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    let encounter = content
        .encounter(&config.encounter)
        .cloned()
        .ok_or_else(|| anyhow!("unknown encounter '{}'", config.encounter))?;
    let autopilot = Autopilot::new(content.spells.iter().cloned());

    let save_dir = config.resolved_save_dir();
    let seed = config.seed.unwrap_or_else(rand::random);
    let session_id = SessionId(rand::random());
    tracing::info!(%session_id, seed, save_dir = %save_dir.display(), "starting simulation");

    let mut builder = CombatOrchestrator::builder()
        .oracles(OracleManager::from_content(&content))
        .new_session(session_id, config.character.clone(), encounter, seed)
        .reports(Arc::new(FileReportRepository::new(save_dir.join("reports"))?));
    if config.enable_persistence {
        builder = builder.sessions(Arc::new(FileSessionRepository::new(
            save_dir.join("sessions"),
        )?));
    }
    let mut orchestrator = builder.build()?;

    println!("{} (seed {seed:#x})", orchestrator.session().encounter.name);
    let response = orchestrator.handle(InputRequest::Ready)?;
    print_events(&orchestrator, response.events());

    let mut player_turns = 0u32;
    let mut last_round = 0u32;
    while !orchestrator.phase().is_terminal() {
        if !orchestrator.is_player_turn() {
            let events = orchestrator.run_until_player_turn()?;
            if events.is_empty() && !orchestrator.is_player_turn() {
                return Err(anyhow!("scheduler stalled in {}", orchestrator.phase()));
            }
            print_events(&orchestrator, &events);
            continue;
        }

        let round = orchestrator.session().state.turn.round;
        if round != last_round {
            last_round = round;
            player_turns += 1;
            if player_turns > config.max_turns {
                tracing::warn!(turns = config.max_turns, "turn cap reached, abandoning");
                println!("turn cap of {} reached", config.max_turns);
                break;
            }
            if config.show_map {
                print!("{}", presentation::render(&orchestrator.session().state));
            }
        }

        let request = autopilot.decide(&orchestrator.session().state, orchestrator.config());
        tracing::debug!(?request, "autopilot decision");
        match orchestrator.handle(request)? {
            Response::Accepted { events } => print_events(&orchestrator, &events),
            Response::Refused(refusal) => {
                tracing::warn!(code = %refusal.code, "{}", refusal.message);
                let fallback = orchestrator.handle(InputRequest::EndTurn)?;
                if let Some(refusal) = fallback.refusal() {
                    return Err(anyhow!("player stuck: {}", refusal.message));
                }
                print_events(&orchestrator, fallback.events());
            }
        }
    }

    match orchestrator.report() {
        Some(report) => print!("{}", presentation::summary(report)),
        None => println!("no report: the fight did not finish"),
    }
    Ok(())
}

fn print_events(orchestrator: &CombatOrchestrator, events: &[CombatEvent]) {
    let state = &orchestrator.session().state;
    for event in events {
        println!("{}", presentation::describe(state, event));
    }
}

/// File logging always; stderr on request.
fn setup_logging(config: &CliConfig) -> Result<()> {
    let log_dir = CliConfig::log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "tactics.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = config
        .log_to_stderr
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Keep the writer alive for the whole process
    std::mem::forget(guard);

    tracing::info!("Log file: {}/tactics.log", log_dir.display());
    Ok(())
}
