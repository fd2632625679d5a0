use anyhow::{Context, Result};
use autochart::{loader, pipeline, ChartType, Config, Outcome, Overrides};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Rows shown by `--preview`.
const PREVIEW_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "autochart")]
#[command(about = "Pick a chart for a CSV, TSV, JSON or spreadsheet table and render it as PNG", long_about = None)]
struct Args {
    /// Input table (.csv, .tsv, .json, .xlsx, .xls or .ods)
    input: PathBuf,

    /// Chart type to draw instead of the recommended one
    #[arg(long, value_enum)]
    chart_type: Option<ChartType>,

    /// Column for the x axis
    #[arg(short = 'x', long = "x")]
    x: Option<String>,

    /// Column for the y axis
    #[arg(short = 'y', long = "y")]
    y: Option<String>,

    /// Output file, or '-' for stdout [default: Chart_<stem>_<Type>.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resolution in dots per inch (overrides the config file)
    #[arg(long)]
    dpi: Option<u32>,

    /// Print the first rows of the table before charting
    #[arg(long)]
    preview: bool,

    /// Print the inference report as JSON on stderr
    #[arg(long)]
    report: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };
    if let Some(dpi) = args.dpi {
        config.render.dpi = dpi;
    }

    let data = match loader::load_path(&args.input, &config.load) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: failed to load '{}': {}", args.input.display(), e);
            return ExitCode::from(1);
        }
    };

    if args.preview {
        eprintln!("{}", data.preview(PREVIEW_ROWS));
    }

    let overrides = Overrides {
        chart_type: args.chart_type,
        x: args.x.clone(),
        y: args.y.clone(),
    };

    let report = match pipeline::run(&data, &overrides, &config.render) {
        Outcome::Empty => {
            eprintln!("Warning: '{}' has no rows, nothing to chart", args.input.display());
            return ExitCode::SUCCESS;
        }
        Outcome::Charted(report) => report,
    };

    if args.report {
        let summary = serde_json::json!({
            "classes": report.classes,
            "recommended": report.recommended,
            "chart_type": report.chart_type,
            "binding": report.binding,
            "advisories": report.advisories,
        });
        eprintln!("{}", summary);
    }
    for advisory in &report.advisories {
        eprintln!("Warning: {}", advisory);
    }

    let chart = match report.result {
        Ok(chart) => chart,
        Err(e) => {
            eprintln!("Error: failed to render {} chart: {}", report.chart_type, e);
            return ExitCode::from(2);
        }
    };
    for warning in &chart.warnings {
        eprintln!("Warning: {}", warning);
    }

    let output = args.output.unwrap_or_else(|| {
        let source = args
            .input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("data");
        PathBuf::from(pipeline::download_file_name(source, chart.chart_type))
    });

    if let Err(e) = write_png(&output, &chart.png) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path),
        None => Ok(Config::default()),
    }
}

fn write_png(output: &Path, png: &[u8]) -> Result<()> {
    if output == Path::new("-") {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(png)
            .context("Failed to write PNG to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    } else {
        std::fs::write(output, png)
            .with_context(|| format!("Failed to write PNG to '{}'", output.display()))?;
        log::info!("wrote {}", output.display());
    }
    Ok(())
}
