//! Replay a scripted input trace against the keyboard engine.
//!
//! Usage:
//!   cargo run --features cli --bin dwell_sim -- traces/i_like.yaml
//!   cargo run --features cli --bin dwell_sim -- -c keyboard.yaml --variant switch_control trace.yaml
//!   cargo run --features cli --bin dwell_sim -- --format json trace.yaml
//!   cargo run --features cli --bin dwell_sim -- --realtime trace.yaml

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use aac_keyboard::dwell_layout::Modality;
use aac_keyboard::{play, replay, KeyboardConfig, ReplayReport, Services, SessionDriver, Trace};

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    Plain,
    HeadTracking,
    SwitchControl,
}

impl From<Variant> for Modality {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Plain => Modality::Plain,
            Variant::HeadTracking => Modality::HeadTracking,
            Variant::SwitchControl => Modality::SwitchControl,
        }
    }
}

#[derive(Parser)]
#[command(name = "dwell_sim")]
#[command(about = "Replay an input trace through the dwell keyboard")]
struct Args {
    /// Trace file (YAML)
    trace: PathBuf,

    /// Keyboard configuration file (YAML)
    #[arg(short = 'c', long, env = "AAC_CONFIG")]
    config: Option<PathBuf>,

    /// Keyboard variant; overrides the configured one and its timing preset
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Print the dwell event log
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Run the live driver on the wall clock; speech and sounds are logged
    #[arg(long)]
    realtime: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,aac_keyboard=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = if args.realtime {
        run_live(&args).await
    } else {
        run(&args).await.map(|report| print_report(&report, &args))
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<KeyboardConfig> {
    let mut config = match (&args.config, args.variant) {
        (Some(path), variant) => {
            let mut config = KeyboardConfig::load(path)?;
            if let Some(variant) = variant {
                config.variant = variant.into();
                config.timings = None;
            }
            config
        }
        (None, Some(variant)) => KeyboardConfig::for_variant(variant.into()),
        (None, None) => KeyboardConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

async fn run(args: &Args) -> anyhow::Result<ReplayReport> {
    let config = load_config(args)?;
    let catalog = config.load_catalog()?;
    let trace = Trace::load(&args.trace)?;
    replay(&trace, &config, catalog).await
}

async fn run_live(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let trace = Trace::load(&args.trace)?;

    let services = Services::tracing(&config.speech, &config.sound);
    let mut driver = SessionDriver::from_config(&config, services)?;
    if !trace.suggestions.is_empty() {
        driver = driver.with_source(Arc::new(trace.suggestions.clone()));
    }

    let played = play(&trace, &config, driver).await?;
    let commits: Vec<String> = played
        .session
        .log()
        .commits()
        .iter()
        .map(|t| t.to_string())
        .collect();

    println!("Session:  {}", played.session.id());
    println!("Sentence: {:?}", played.last_view.sentence);
    println!("Layout:   {}", played.last_view.layout.id);
    println!("Commits:  {}", commits.join(", "));
    if args.verbose {
        println!("\nDwell log:");
        for line in played.session.log().to_lines() {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn print_report(report: &ReplayReport, args: &Args) {
    if args.format == "json" {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing report: {}", e),
        }
        return;
    }

    println!("Session:  {}", report.session);
    println!("Sentence: {:?}", report.sentence);
    println!("Layout:   {}", report.layout);
    println!("Commits:  {}", report.commits.join(", "));
    println!("Spoken:   {}", report.spoken.join(" | "));
    println!("Sounds:   {}", report.sounds);
    if !report.signals.is_empty() {
        println!("Signals:  {:?}", report.signals);
    }
    if report.ended {
        println!("Session ended");
    }
    if args.verbose {
        println!("\nDwell log:");
        for line in &report.log {
            println!("  {}", line);
        }
    }
}
