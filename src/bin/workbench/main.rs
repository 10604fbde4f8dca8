// Matrix Workbench Runner — native driver for the analysis session
// Builds a matrix, runs the time-analysis ticker, and exports the results
//
// Usage:
//   cargo run --bin workbench                          # Random 5x4 matrix, 10 ticks
//   cargo run --bin workbench -- --sample              # Built-in 8x4 sample dataset
//   cargo run --bin workbench -- --rows 6 --cols 3     # Custom dimensions
//   cargo run --bin workbench -- --ticks 30 --realtime # Wall-clock ticking (1s period)
//   cargo run --bin workbench -- --edit 0,1,42         # Apply a cell edit before analysis
//   cargo run --bin workbench -- --export results      # Write export document to results/
//   cargo run --bin workbench -- --config wb.json      # Load WorkbenchConfig from JSON

mod driver;
mod export;

use matrix_workbench::WorkbenchConfig;
use tracing_subscriber::EnvFilter;

use driver::{CellEdit, RunPlan};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    config_path: Option<String>,
    seed: Option<u64>,
    threshold: Option<f64>,
    rows: usize,
    cols: usize,
    sample: bool,
    ticks: u64,
    realtime: bool,
    edits: Vec<CellEdit>,
    export_dir: Option<String>,
    verbose: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        config_path: None,
        seed: None,
        threshold: None,
        rows: 5,
        cols: 4,
        sample: false,
        ticks: 10,
        realtime: false,
        edits: Vec::new(),
        export_dir: None,
        verbose: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                cli.config_path = args.get(i).cloned();
            }
            "--seed" => {
                i += 1;
                cli.seed = args.get(i).and_then(|s| s.parse().ok());
            }
            "--threshold" => {
                i += 1;
                cli.threshold = args.get(i).and_then(|s| s.parse().ok());
            }
            "--rows" => {
                i += 1;
                if i < args.len() {
                    cli.rows = args[i].parse().unwrap_or(5);
                }
            }
            "--cols" => {
                i += 1;
                if i < args.len() {
                    cli.cols = args[i].parse().unwrap_or(4);
                }
            }
            "--ticks" => {
                i += 1;
                if i < args.len() {
                    cli.ticks = args[i].parse().unwrap_or(10);
                }
            }
            "--edit" => {
                i += 1;
                match args.get(i).and_then(|s| CellEdit::parse(s)) {
                    Some(edit) => cli.edits.push(edit),
                    None => eprintln!("Ignoring malformed --edit (expected row,col,value)"),
                }
            }
            "--export" => {
                i += 1;
                cli.export_dir = args.get(i).cloned();
            }
            "--sample" => cli.sample = true,
            "--realtime" => cli.realtime = true,
            "--verbose" | "-v" => cli.verbose = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("matrix_workbench={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &CliArgs) -> Result<WorkbenchConfig, String> {
    let mut config = match &cli.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path, e))?;
            WorkbenchConfig::from_json(&text).map_err(|e| e.to_string())?
        }
        None => WorkbenchConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(threshold) = cli.threshold {
        config.correlation_threshold = threshold;
    }
    Ok(config)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let plan = RunPlan {
        rows: cli.rows,
        cols: cli.cols,
        sample: cli.sample,
        ticks: cli.ticks,
        realtime: cli.realtime,
        edits: cli.edits,
    };

    println!("\n  Matrix Workbench Runner");
    println!("  Seed: {} | Threshold: {} | Ticks: {} ({})\n",
        config.seed,
        config.correlation_threshold,
        plan.ticks,
        if plan.realtime { "realtime" } else { "simulated clock" });

    let session = match driver::run(config, &plan) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let summary = session.summary();
    println!("\n  {}", "-".repeat(60));
    println!("  Matrix:          {}x{}", summary.rows, summary.cols);
    println!("  Changes:         {}", summary.total_changes);
    match summary.correlation_strength_pct {
        Some(pct) => println!("  Avg Correlation: {}%", pct),
        None => println!("  Avg Correlation: N/A"),
    }
    match summary.future_value_projection {
        Some(fv) => println!("  FV Projection:   ${}", fv),
        None => println!("  FV Projection:   N/A"),
    }

    if let Some(dir) = &cli.export_dir {
        match export::write_document(&session, std::path::Path::new(dir)) {
            Ok(path) => println!("\n  Results saved to: {}\n", path.display()),
            Err(e) => {
                eprintln!("  Export failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
