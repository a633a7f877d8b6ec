//! Command implementations for the `title-critic` binary

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::config::Config;
use crate::controller::{EvaluationController, SubmissionState};
use crate::core::EvaluationMode;
use crate::view::{
    compose, render_mode_bar, render_panel, submit_enabled, submit_label, RenderOptions,
};

/// Service settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct ServiceOverrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Load configuration (explicit file or default location) and apply CLI overrides
pub fn resolve_config(config_path: Option<&Path>, overrides: &ServiceOverrides) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides_from(|key| std::env::var(key).ok())?;
            config
        }
        None => Config::load()?,
    };

    if let Some(url) = &overrides.api_url {
        config.service.base_url = url.clone();
    }
    if let Some(timeout) = overrides.timeout_secs {
        config.service.timeout_secs = timeout;
    }
    config.validate()?;

    tracing::debug!(base_url = %config.service.base_url, "configuration resolved");
    Ok(config)
}

fn render_options() -> RenderOptions {
    RenderOptions {
        color: std::io::stdout().is_terminal(),
    }
}

/// Evaluate one title; returns whether the evaluation succeeded
pub async fn run_evaluate(
    config: &Config,
    title: &str,
    mode: Option<EvaluationMode>,
    as_json: bool,
) -> Result<bool> {
    let mode = mode.unwrap_or(config.client.default_mode);
    let controller = EvaluationController::from_config(&config.service);

    controller.submit(title, mode).await?;
    let state = controller.state();

    if as_json {
        let body = match (state.evaluation(), state.failure()) {
            (Some(evaluation), _) => json!({ "mode": mode, "evaluation": evaluation }),
            (_, Some(failure)) => json!({ "mode": mode, "error": failure }),
            _ => json!({ "mode": mode }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let options = render_options();
        println!("{} {}", mode.glyph(), mode.label());
        println!("{}", render_panel(&compose(&state), options));
    }

    Ok(state.failure().is_none())
}

/// List the registry
pub fn run_modes(default_mode: EvaluationMode) {
    for mode in EvaluationMode::all() {
        let marker = if *mode == default_mode { "*" } else { " " };
        println!(
            "{} {} {:<7} {}  {}",
            marker,
            mode.glyph(),
            mode.id(),
            mode.label(),
            mode.description().dimmed()
        );
    }
}

/// Print the effective configuration, optionally writing it back to disk
pub fn run_config(config: &Config, config_path: Option<PathBuf>, save: bool) -> Result<()> {
    let path = match config_path {
        Some(path) => {
            if save {
                config.save_to(&path)?;
            }
            path
        }
        None => {
            if save {
                config.save()?;
            }
            Config::config_path()?
        }
    };
    if save {
        tracing::info!(path = %path.display(), "configuration saved");
    }
    println!("# {}", path.display());
    print!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize configuration")?
    );
    Ok(())
}

/// A line typed in the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Title(&'a str),
    Mode(&'a str),
    Next,
    Prev,
    Reset,
    Modes,
    Help,
    Quit,
    Unknown(&'a str),
}

pub fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Title(line);
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "mode" | "m" if !arg.is_empty() => Input::Mode(arg),
        "mode" | "m" | "modes" => Input::Modes,
        "next" | "n" => Input::Next,
        "prev" | "p" => Input::Prev,
        "reset" | "r" => Input::Reset,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(trimmed),
    }
}

const INTERACTIVE_HELP: &str = "\
Type a title and press Enter to evaluate it.
  :mode <id>   select a mode (casual, cool, imouto, poet)
  :next/:prev  cycle through modes
  :reset       clear the current result
  :quit        leave";

/// Everything the input loop wants shown, in the order it was produced
#[derive(Debug)]
enum SessionOutput {
    Line(String),
    Prompt(&'static str),
}

/// Sole writer to stdout during an interactive session
///
/// State changes are checked before queued lines. A submission completes
/// before the loop queues its next line, so a panel always precedes
/// whatever the loop printed after it.
async fn print_session(
    mut state_rx: watch::Receiver<SubmissionState>,
    mut output_rx: mpsc::UnboundedReceiver<SessionOutput>,
    options: RenderOptions,
) {
    let mut watching = true;
    loop {
        tokio::select! {
            biased;
            changed = state_rx.changed(), if watching => match changed {
                Ok(()) => {
                    let text = {
                        let state = state_rx.borrow_and_update();
                        render_panel(&compose(&state), options)
                    };
                    println!("{}\n", text);
                }
                Err(_) => watching = false,
            },
            output = output_rx.recv() => match output {
                Some(SessionOutput::Line(line)) => println!("{}", line),
                Some(SessionOutput::Prompt(label)) => {
                    print!("{} ▸ ", label);
                    let _ = std::io::stdout().flush();
                }
                None => break,
            },
        }
    }
}

/// Line-oriented session over stdin
///
/// Panels are printed in response to controller state changes, the same
/// way a graphical frontend would redraw.
pub async fn run_interactive(config: &Config, mode: Option<EvaluationMode>) -> Result<()> {
    let options = render_options();
    let controller = Arc::new(EvaluationController::from_config(&config.service));
    let mut mode = mode.unwrap_or(config.client.default_mode);

    let (out, output_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_session(controller.subscribe(), output_rx, options));
    let show = |line: String| {
        let _ = out.send(SessionOutput::Line(line));
    };

    show(INTERACTIVE_HELP.to_string());
    show(format!("{}\n", render_mode_bar(mode, options)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let _ = out.send(SessionOutput::Prompt(submit_label(&controller.state())));
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => show(INTERACTIVE_HELP.to_string()),
            Input::Modes => show(render_mode_bar(mode, options)),
            Input::Mode(id) => match id.parse::<EvaluationMode>() {
                Ok(selected) => {
                    mode = selected;
                    show(render_mode_bar(mode, options));
                }
                Err(e) => eprintln!("{}", e),
            },
            Input::Next => {
                mode = mode.next();
                show(render_mode_bar(mode, options));
            }
            Input::Prev => {
                mode = mode.prev();
                show(render_mode_bar(mode, options));
            }
            Input::Reset => controller.reset(),
            Input::Unknown(command) => eprintln!("unknown command '{}' (try :help)", command),
            Input::Title(title) => {
                if !submit_enabled(&controller.state(), title) {
                    continue;
                }
                if let Err(e) = controller.submit(title, mode).await {
                    eprintln!("{}", e);
                }
            }
        }
    }

    // Closing both channels lets the printer drain and exit
    drop(out);
    drop(controller);
    printer.await?;
    Ok(())
}
