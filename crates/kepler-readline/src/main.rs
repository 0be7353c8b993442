mod command;
mod helper;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kepler_core::catalog::Catalog;
use kepler_core::config::AppConfig;
use kepler_core::secret::CredentialService;
use kepler_core::session::MessageId;
use kepler_infrastructure::{ConfigService, KeplerPaths, SecretServiceImpl};
use kepler_interaction::{ChatSessionGateway, GeminiApiAgent, MissionControl, PendingReply};

use crate::command::Command;
use crate::helper::CliHelper;

/// How long the prompt waits for a reply before handing control back.
const REPLY_WAIT: Duration = Duration::from_secs(90);

/// Installs the file logger. Logs never go to the terminal.
fn init_logging(paths: &KeplerPaths, level: &str) -> Option<WorkerGuard> {
    let logs_dir = match paths.logs_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{}", format!("Logging disabled: {e}").bright_black());
            return None;
        }
    };
    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("{}", format!("Logging disabled: {e}").bright_black());
        return None;
    }

    let appender = tracing_appender::rolling::daily(&logs_dir, "kepler.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();

    Some(guard)
}

fn load_config(paths: &KeplerPaths) -> AppConfig {
    match ConfigService::new(paths.clone()).get_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                format!("Could not read config.toml ({e}); using defaults.").yellow()
            );
            AppConfig::default()
        }
    }
}

/// Warns up front when no API key is configured and leaves a template to fill in.
async fn check_credentials(paths: &KeplerPaths, secrets: &SecretServiceImpl) {
    match secrets.api_key().await {
        Ok(Some(_)) => tracing::info!("[Startup] API key found"),
        Ok(None) => {
            tracing::warn!("[Startup] No API key configured");
            let hint = match paths.ensure_secret_file() {
                Ok(path) => format!(
                    "No Gemini API key found. Set GEMINI_API_KEY or API_KEY, or edit {}.",
                    path.display()
                ),
                Err(e) => {
                    tracing::warn!("[Startup] Failed to create secret template: {}", e);
                    "No Gemini API key found. Set GEMINI_API_KEY or API_KEY.".to_string()
                }
            };
            println!("{}", hint.yellow());
        }
        Err(e) => {
            tracing::error!("[Startup] Failed to read credentials: {}", e);
            println!("{}", format!("Could not read credentials: {e}").yellow());
        }
    }
}

/// Prints every message newer than `last_seen` and advances it.
fn print_new_messages(mission: &MissionControl, last_seen: &mut Option<MessageId>) {
    let snapshot = mission.snapshot();
    for message in snapshot.transcript.since(*last_seen) {
        render::message(message);
        *last_seen = Some(message.id);
    }
}

/// Waits for the background work of an intent, then prints what it added.
async fn await_reply(
    mission: &MissionControl,
    pending: PendingReply,
    last_seen: &mut Option<MessageId>,
) {
    if !pending.is_finished() {
        println!("{}", "Mission Command is responding...".bright_black());
    }
    if timeout(REPLY_WAIT, pending.settled()).await.is_err() {
        println!(
            "{}",
            "Still waiting on Mission Command. The reply will appear once it arrives."
                .bright_black()
        );
    }
    print_new_messages(mission, last_seen);
}

/// Executes one command. Returns false when the REPL should exit.
async fn dispatch(
    mission: &MissionControl,
    command: Command,
    last_seen: &mut Option<MessageId>,
) -> bool {
    let catalog = *mission.catalog();

    match command {
        Command::Quit => return false,
        Command::Help => render::help(),
        Command::Spectra => render::reference_spectra(&catalog),
        Command::Status => {
            let session_open = mission.gateway().has_session();
            render::status(&mission.snapshot(), session_open);
        }
        Command::Reset => {
            mission.gateway().reset();
            println!(
                "{}",
                "Mission Command link reset. It reconnects on the next exchange.".bright_green()
            );
        }
        Command::Invalid(hint) => println!("{}", hint.yellow()),
        Command::Start => match mission.dismiss_briefing() {
            Ok(pending) => {
                render::overview(&catalog);
                await_reply(mission, pending, last_seen).await;
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        },
        Command::Select(query) => {
            let id = catalog
                .find_planet(&query)
                .map(|planet| planet.id.to_string())
                .unwrap_or(query);
            match mission.select_planet(&id) {
                Ok(pending) => {
                    render::view(&catalog, &mission.snapshot());
                    await_reply(mission, pending, last_seen).await;
                }
                Err(e) => println!("{}", e.to_string().yellow()),
            }
        }
        Command::Back => match mission.back() {
            Ok(()) => {
                print_new_messages(mission, last_seen);
                println!();
                render::overview(&catalog);
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        },
        Command::Say(text) => match mission.send_message(&text) {
            Ok(pending) => await_reply(mission, pending, last_seen).await,
            Err(e) => println!("{}", e.to_string().yellow()),
        },
        Command::Ask(question) => {
            println!("{}", "Consulting Mission Command...".bright_black());
            match mission.quick_answer(&question).await {
                Ok(answer) => {
                    for line in answer.lines() {
                        println!("{}", line.bright_blue());
                    }
                }
                Err(e) => println!("{}", e.user_message().yellow()),
            }
        }
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    let paths = KeplerPaths::default();
    let config = load_config(&paths);
    let _log_guard = init_logging(&paths, &config.logging.level);
    tracing::info!("[Startup] Kepler explorer starting");

    let secrets = SecretServiceImpl::new(paths.clone());
    check_credentials(&paths, &secrets).await;

    let catalog = Catalog::seeded();
    let agent = GeminiApiAgent::new(Arc::new(secrets), &config.gemini)?;
    tracing::info!("[Startup] Mission Command backed by {}", agent.model());
    let gateway = Arc::new(ChatSessionGateway::new(Arc::new(agent), catalog));
    let mission = MissionControl::new(catalog, gateway);

    let helper = CliHelper::new(catalog.planets().iter().map(|planet| planet.id));
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(helper));

    render::view(&catalog, &mission.snapshot());
    println!();

    let mut last_seen: Option<MessageId> = None;

    loop {
        let prompt = match mission.view().focused_planet() {
            Some(planet) => format!("{}> ", planet.id),
            None => ">> ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                if !dispatch(&mission, command, &mut last_seen).await {
                    println!("{}", "Goodbye, Explorer!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                tracing::error!("[Repl] Readline failed: {:?}", err);
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!("[Repl] Kepler explorer exiting");
    Ok(())
}
