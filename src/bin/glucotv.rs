use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use glucotv::api::HttpDataSource;
use glucotv::device::HttpUploader;
use glucotv::settings::{self, Environment, PartialBsLimits, PartialRefreshSettings};
use glucotv::viz::{self, fonts};
use glucotv::{PartialChartConfig, ReadingPoint, service, storage};

#[derive(Parser, Debug)]
#[command(
    name = "glucotv",
    version,
    about = "Render CGM glucose readings into a chart image and push it to a network display"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart JPEG to a file from saved readings or mock data.
    Render(RenderArgs),
    /// Fetch readings, render, and upload once to the display.
    Refresh(RefreshArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output JPEG path.
    #[arg(short, long, default_value = "glucose.jpg")]
    out: PathBuf,
    /// Readings JSON file (as written by `refresh --save x.json`).
    #[arg(short, long)]
    readings: Option<PathBuf>,
    /// Ignore --readings and draw synthetic data.
    #[arg(long, default_value_t = false)]
    mock: bool,
    /// Partial chart configuration (JSON, camelCase keys).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory with .ttf/.otf files. Text is skipped when no fonts are available.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RefreshArgs {
    /// Hours of history to fetch and show (default 6).
    #[arg(long)]
    span_hours: Option<u32>,
    /// Lower bound of the good range in mg/dL (default 60).
    #[arg(long)]
    low: Option<f64>,
    /// Upper bound of the good range in mg/dL (default 200).
    #[arg(long)]
    high: Option<f64>,
    /// Partial chart configuration (JSON, camelCase keys).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory with .ttf/.otf files.
    #[arg(long)]
    fonts: Option<PathBuf>,
    /// .env file to load before reading the environment.
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Also save the fetched readings (format inferred by --format or extension).
    #[arg(long)]
    save: Option<PathBuf>,
    /// Output format for --save (csv or json).
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Also write the uploaded frame to this path.
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Refresh(args) => cmd_refresh(args),
    }
}

fn load_overrides(path: Option<&Path>) -> Result<PartialChartConfig> {
    let Some(path) = path else {
        return Ok(PartialChartConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

fn init_fonts(dir: Option<&Path>) {
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| dirs::config_dir().map(|d| d.join(settings::APP_DIR).join("fonts")));
    let Some(dir) = dir else {
        log::warn!("no font directory; text will be skipped");
        return;
    };
    if let Err(e) = fonts::init(&dir) {
        log::warn!("fonts unavailable from {}: {}; text will be skipped", dir.display(), e);
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    init_fonts(args.fonts.as_deref());
    let mut overrides = load_overrides(args.config.as_deref())?;
    if args.mock {
        overrides.generate_mock_data = Some(true);
    }

    let readings: Vec<ReadingPoint> = match args.readings.as_ref() {
        Some(p) if !args.mock => storage::load_json(p)
            .with_context(|| format!("load readings {}", p.display()))?,
        _ => Vec::new(),
    };

    let jpeg = glucotv::render_image(&readings, &overrides)?;
    std::fs::write(&args.out, &jpeg)
        .with_context(|| format!("write {}", args.out.display()))?;
    eprintln!("Wrote {} bytes to {}", jpeg.len(), args.out.display());
    Ok(())
}

fn cmd_refresh(args: RefreshArgs) -> Result<()> {
    settings::load_dotenv(args.env_file.clone())?;
    let env = Environment::from_env()?;
    log::debug!("{:?}", env);
    init_fonts(args.fonts.as_deref());
    let chart = load_overrides(args.config.as_deref())?;

    let source = HttpDataSource::new(&env.api_url, &env.session_cookie, &env.userid_cookie)?;
    let uploader = HttpUploader::new(&env.device_url)?;
    let overrides = PartialRefreshSettings {
        bs_limits: PartialBsLimits {
            low: args.low,
            high: args.high,
        },
        span_hours: args.span_hours,
    };

    let outcome = service::refresh_screen(&source, &uploader, &overrides, &chart)?;

    if let Some(path) = args.save.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&outcome.readings, path)?,
            "json" => storage::save_json(&outcome.readings, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} readings to {}", outcome.readings.len(), path.display());
    }

    if let Some(path) = args.preview.as_ref() {
        std::fs::write(path, &outcome.jpeg)
            .with_context(|| format!("write {}", path.display()))?;
        eprintln!("Wrote preview to {}", path.display());
    }

    let config = service::chart_config(&outcome.settings, &chart);
    match viz::plan_header(&outcome.readings, &config, Utc::now()) {
        Some(h) => println!(
            "{} mg/dL {} {} ({} readings) -> {}",
            h.value_text,
            h.trend.direction,
            h.age_text(),
            outcome.readings.len(),
            uploader.upload_url()
        ),
        None => println!(
            "no readings in the last {}h -> {}",
            outcome.settings.span_hours,
            uploader.upload_url()
        ),
    }
    Ok(())
}
