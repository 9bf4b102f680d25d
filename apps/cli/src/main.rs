use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Result;
use clap::Parser;
use shared::protocol::StepEvent;
use stepper::{
    config::{load_settings, load_settings_from},
    pacing::duration_millis,
    RunView, SessionError, SortSession,
};
use tokio::sync::broadcast::error::RecvError;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Animate insertion sort step by step in the terminal")]
struct Args {
    /// Comma-separated integers, e.g. "5,3,4,1,2".
    #[arg(long)]
    values: String,
    /// Pause between steps; overrides the settings file.
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print every step event as a JSON line instead of narration.
    #[arg(long)]
    json: bool,
    /// Draw the bars after every narration.
    #[arg(long)]
    bars: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    let session = SortSession::from_settings(&settings);
    if let Some(delay_ms) = args.delay_ms {
        let applied = session.delay().set(Duration::from_millis(delay_ms));
        if applied != Duration::from_millis(delay_ms) {
            tracing::warn!(
                requested_ms = delay_ms,
                applied_ms = duration_millis(applied),
                "delay clamped to configured bounds"
            );
        }
    }

    let mut events = session.subscribe_events();
    let handle = match session.start_from_input(&args.values) {
        Ok(handle) => handle,
        Err(SessionError::Input(err)) => {
            eprintln!("{err}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    let mut view = RunView::default();
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "terminal output fell behind the run");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        view.apply_event(&event);
        if args.json {
            println!("{}", event.to_json_line()?);
        } else {
            print_event(&event, &view, args.bars);
        }
        if matches!(event, StepEvent::RunCompleted { .. }) {
            break;
        }
    }

    let sorted = handle.await?;
    if !args.json {
        let joined: Vec<String> = sorted.iter().map(i64::to_string).collect();
        println!("{}", joined.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_event(event: &StepEvent, view: &RunView, bars: bool) {
    match event {
        StepEvent::RunStarted { .. } => {
            println!("Starting Insertion Sort...");
            if bars {
                print!("{}", render::render_board(&view.board));
            }
        }
        StepEvent::Narrated(narration) | StepEvent::Rejected(narration) => {
            println!("{}{}", render::level_prefix(narration.level), narration.message);
            if bars && !view.board.is_empty() {
                print!("{}", render::render_board(&view.board));
            }
        }
        StepEvent::Visual(_) | StepEvent::RunCompleted { .. } => {}
    }
}
