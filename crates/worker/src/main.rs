use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use pulse_core::pipeline::{Pipeline, PipelineState};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

mod input;

#[derive(Debug, Parser)]
#[command(name = "pulse_worker")]
struct Args {
    /// JSON file with `today` and `yesterday` snapshots ("-" reads stdin).
    /// Defaults to PULSE_INPUT_PATH.
    #[arg(long, conflicts_with = "sample")]
    input: Option<String>,

    /// Evaluate the built-in sample day instead of reading input.
    #[arg(long)]
    sample: bool,

    /// Print the whole final pipeline state instead of only the decision output.
    #[arg(long)]
    full: bool,
}

#[derive(Debug, Serialize)]
struct FullReport<'a> {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    state: &'a PipelineState,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pulse_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    // stdout carries the JSON result, so logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("pulse_run", %run_id);
    let _enter = span.enter();

    if let Err(err) = run(&args, &settings, run_id) {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "pulse run failed");
        return Err(err);
    }
    Ok(())
}

fn run(args: &Args, settings: &pulse_core::config::Settings, run_id: Uuid) -> anyhow::Result<()> {
    let source = input::resolve_source(args.input.as_deref(), args.sample, settings)?;
    tracing::info!(%source, full = args.full, "evaluating business pulse");

    let input = input::read_input(&source)?;
    let state = Pipeline::standard()
        .run(PipelineState::new(input))
        .context("pipeline run failed")?;

    let rendered = if args.full {
        serde_json::to_string_pretty(&FullReport {
            run_id,
            generated_at: Utc::now(),
            state: &state,
        })?
    } else {
        serde_json::to_string_pretty(state.output()?)?
    };
    println!("{rendered}");

    Ok(())
}

fn init_sentry(settings: &pulse_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
