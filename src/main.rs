use anyhow::{Context, Result};
use clap::Parser;
use csvdash::csv_reader::{self, ReadOptions};
use csvdash::graph::{self, AxisLabels};
use csvdash::preview;
use csvdash::{ChartKind, OutputFormat, Policy, RenderOptions, TabularVisualizer, Table};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAX_SIDE: i64 = graph::MAX_DIMENSION as i64;

#[derive(Parser, Debug)]
#[command(name = "csvdash")]
#[command(about = "Chart a CSV file: picks axes, detects numeric vs categorical data", long_about = None)]
struct Args {
    /// Input file (CSV, or JSON with --json-input); reads stdin when omitted
    file: Option<PathBuf>,

    /// X column (defaults to the first column)
    #[arg(long)]
    x: Option<String>,

    /// Y column (defaults to the first mostly-numeric column)
    #[arg(long)]
    y: Option<String>,

    /// Rendering of numeric series
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    chart: ChartKind,

    /// Print the derived chart data as JSON instead of rendering
    #[arg(long)]
    json: bool,

    /// Print the headers and the first ROWS rows as a table instead of charting
    #[arg(long, value_name = "ROWS", num_args = 0..=1, default_missing_value = "20")]
    table: Option<usize>,

    /// Input is a JSON preview payload or an array of objects
    #[arg(long)]
    json_input: bool,

    /// Write the chart here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE))]
    width: u32,

    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE))]
    height: u32,

    /// Stroke width of line charts, in pixels
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=64))]
    line_width: u32,

    #[arg(long)]
    title: Option<String>,

    /// Series color: red, green, blue, ... or #rrggbb
    #[arg(long)]
    color: Option<String>,

    /// Only load the first N data rows
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Field delimiter (sniffed when omitted)
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// JSON file overriding thresholds and caps
    #[arg(long, env = "CSVDASH_POLICY")]
    policy: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "csvdash=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_table(args: &Args) -> Result<Table> {
    if args.json_input {
        let mut text = String::new();
        match &args.file {
            Some(path) => {
                text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read '{}'", path.display()))?;
            }
            None => {
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read JSON from stdin")?;
            }
        }
        let value: serde_json::Value = serde_json::from_str(&text).context("Invalid JSON input")?;
        let table = Table::from_json(&value)?;
        return Ok(match args.preview_rows {
            Some(n) => table.head(n),
            None => table,
        });
    }

    let options = ReadOptions {
        delimiter: args.delimiter,
        max_rows: args.preview_rows,
        keep_ragged: false,
    };
    match &args.file {
        Some(path) => csv_reader::read_csv_file(path, &options),
        None => csv_reader::read_csv_from_stdin(&options).context("Failed to read CSV from stdin"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let policy = match &args.policy {
        Some(path) => Policy::from_json_file(path)?,
        None => Policy::default(),
    };

    let table = load_table(&args)?;
    info!(columns = table.headers.len(), rows = table.rows.len(), "table loaded");

    let mut visualizer = TabularVisualizer::new(policy);
    // Explicit picks first so defaults never replace them
    if let Some(x) = &args.x {
        visualizer.set_x(x.clone());
    }
    if let Some(y) = &args.y {
        visualizer.set_y(y.clone());
    }
    visualizer.set_chart_kind(args.chart);
    visualizer.load(table);

    let view = visualizer.view();
    info!(class = ?visualizer.y_class(), "{}", view);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if let Some(rows) = args.table {
        let grid = preview::preview_table(visualizer.table(), rows);
        grid.print(&mut handle).context("Failed to write table")?;
        return Ok(());
    }

    if args.json {
        let summary = serde_json::json!({
            "x": visualizer.x_column(),
            "y": visualizer.y_column(),
            "class": visualizer.y_class(),
            "message": view.message(),
            "chart": view,
        });
        serde_json::to_writer_pretty(&mut handle, &summary).context("Failed to write JSON")?;
        writeln!(handle).context("Failed to write JSON")?;
        return Ok(());
    }

    if let Some(message) = view.message() {
        eprintln!("{}", message);
        std::process::exit(2);
    }

    let options = RenderOptions {
        width: args.width,
        height: args.height,
        format: args.format,
        title: args.title.clone(),
        color: args.color.clone(),
        line_width: args.line_width,
        ..RenderOptions::default()
    };
    let labels = AxisLabels {
        x: visualizer.x_column().unwrap_or_default().to_string(),
        y: visualizer.y_column().unwrap_or_default().to_string(),
    };
    let bytes = graph::render_view(&view, &labels, &options).context("Failed to render chart")?;

    match &args.output {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => {
            handle.write_all(&bytes).context("Failed to write chart to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
