use std::io::BufRead;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use mrscraper_core::{
    console_source_url, find_console, update, validate_custom_url, AppState, Msg,
    RunConfiguration, RunStatus, ValidationError, CONSOLES, REGIONS,
};
use mrscraper_logging::{scrape_info, scrape_warn};

use super::effects::EffectRunner;
use super::settings::{load_settings, AppSettings};
use super::{logging, render};
use crate::cli::Args;

const TICK_INTERVAL: Duration = Duration::from_millis(75);
/// Conventional status for a process ended by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    Cancel,
    Exit,
}

/// First Ctrl-C asks the run to stop cooperatively; the next one quits.
#[derive(Debug, Default)]
struct InterruptGate {
    pressed: AtomicBool,
}

impl InterruptGate {
    fn on_interrupt(&self) -> InterruptAction {
        if self.pressed.swap(true, Ordering::SeqCst) {
            InterruptAction::Exit
        } else {
            InterruptAction::Cancel
        }
    }
}

pub fn run_app(args: Args) -> anyhow::Result<ExitCode> {
    logging::initialize(args.log);

    if args.list_consoles {
        print_catalog();
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(args.settings.as_deref());
    let config = build_run_configuration(&args, &settings)?;
    if !confirm_output_reset(&config, args.yes)? {
        println!("Nothing was downloaded.");
        return Ok(ExitCode::SUCCESS);
    }

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(settings.engine_config(), msg_tx.clone())
        .context("could not start the download engine")?;

    let ctrlc_tx = msg_tx.clone();
    let gate = InterruptGate::default();
    ctrlc::set_handler(move || match gate.on_interrupt() {
        InterruptAction::Cancel => {
            eprintln!("Cancelling after the current file; press Ctrl-C again to quit now.");
            let _ = ctrlc_tx.send(Msg::CancelClicked);
        }
        InterruptAction::Exit => {
            scrape_warn!("Second interrupt, exiting without waiting for the run");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
    .context("could not install the Ctrl-C handler")?;
    spawn_stdin_reader(msg_tx.clone());

    // Background tick to throttle rendering.
    let tick_tx = msg_tx.clone();
    thread::spawn(move || {
        while tick_tx.send(Msg::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    msg_tx
        .send(Msg::StartRequested(config))
        .context("session channel closed")?;
    drop(msg_tx);

    let mut state = AppState::new();
    println!("{}", render::render(&state.view()));
    for msg in msg_rx.iter() {
        let is_tick = msg == Msg::Tick;
        let (next, effects) = update(state, msg);
        state = next;
        runner.apply(effects)?;

        let finished = state.session().is_terminal();
        if (is_tick || finished) && state.consume_dirty() {
            println!("{}", render::render(&state.view()));
        }
        if finished {
            break;
        }
    }

    let status = state.session();
    scrape_info!("Session ended: {:?}", status);
    Ok(exit_code(status))
}

/// Turns the command line into a run configuration, enforcing the checks
/// that must pass before anything is started.
fn build_run_configuration(
    args: &Args,
    settings: &AppSettings,
) -> anyhow::Result<RunConfiguration> {
    let source_url = resolve_source(args)?;
    let output_root = args
        .output
        .clone()
        .ok_or(ValidationError::MissingOutputRoot)?;
    let region = match &args.region {
        Some(region) => resolve_region(region)?,
        None => resolve_region(&settings.default_region)
            .context("default_region in the settings file")?,
    };

    let config = RunConfiguration {
        region_filter_enabled: !args.no_region_filter,
        region,
        smart_filter_enabled: !args.no_smart_filter,
        entry_limit: args.limit,
        ..RunConfiguration::new(source_url, output_root)
    };
    config.validate()?;
    Ok(config)
}

fn resolve_source(args: &Args) -> Result<String, ValidationError> {
    match (&args.console, &args.url) {
        (Some(label), _) => find_console(label)
            .map(console_source_url)
            .ok_or_else(|| ValidationError::UnknownConsole(label.clone())),
        (None, Some(url)) => {
            validate_custom_url(url)?;
            Ok(url.trim().to_string())
        }
        (None, None) => Err(ValidationError::MissingSourceUrl),
    }
}

fn resolve_region(region: &str) -> anyhow::Result<String> {
    let wanted = region.trim();
    match REGIONS.iter().find(|known| known.eq_ignore_ascii_case(wanted)) {
        Some(known) => Ok(known.to_string()),
        None => bail!(
            "unknown region {:?}; choose one of: {}",
            wanted,
            REGIONS.join(", ")
        ),
    }
}

/// Asks before an existing output folder is wiped. `assume_yes` skips the prompt.
fn confirm_output_reset(config: &RunConfiguration, assume_yes: bool) -> anyhow::Result<bool> {
    let output_dir = config.output_dir();
    if assume_yes || !output_dir.exists() {
        return Ok(true);
    }
    let proceed = dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} will be deleted and filled again. Continue?",
            output_dir.display()
        ))
        .default(false)
        .interact()
        .context("could not read confirmation")?;
    if !proceed {
        scrape_warn!("Replacing {:?} declined", output_dir);
    }
    Ok(proceed)
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(msg) = parse_command(&line) else {
                continue;
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn parse_command(line: &str) -> Option<Msg> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" | "resume" => Some(Msg::PauseToggled),
        "c" | "cancel" => Some(Msg::CancelClicked),
        _ => None,
    }
}

fn print_catalog() {
    println!("Consoles:");
    for console in CONSOLES {
        println!("  {console}");
    }
    println!("Regions:");
    for region in REGIONS {
        println!("  {region}");
    }
}

fn exit_code(status: RunStatus) -> ExitCode {
    match status {
        RunStatus::Completed | RunStatus::Cancelled => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
