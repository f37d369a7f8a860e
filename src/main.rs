#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use zk_bench::bench_cmd::{self, OutputOptions};
use zk_bench::circuit::CircuitRegistry;
use zk_bench::config::{
    DEFAULT_ALGO, DEFAULT_CIRCUIT, DEFAULT_COUNT, DEFAULT_CURVE, DEFAULT_PROFILE, DEFAULT_SIZE,
    RawParams,
};

#[derive(Parser, Debug)]
#[command(name = "zk-bench")]
#[command(about = "Runs benchmarks and profiles of Groth16 proof stages", long_about = None)]
struct Cli {
    /// Name of the circuit to use
    #[arg(long, default_value = DEFAULT_CIRCUIT)]
    circuit: String,

    /// Size of the circuit, parameter to the circuit constructor
    #[arg(long, default_value_t = DEFAULT_SIZE, allow_negative_numbers = true)]
    size: i64,

    /// Bench count (time is averaged over the number of executions)
    #[arg(long, default_value_t = DEFAULT_COUNT, allow_negative_numbers = true)]
    count: i64,

    /// Algorithm to benchmark: compile, setup, prove or verify
    #[arg(long, default_value = DEFAULT_ALGO)]
    algo: String,

    /// Type of profile: none, trace, cpu or mem
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Curve name (case-insensitive), see --list
    #[arg(long, default_value = DEFAULT_CURVE)]
    curve: String,

    /// Directory for profiling artifacts
    #[arg(long, default_value = ".")]
    profile_dir: PathBuf,

    /// Write machine-readable JSON report to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Append the record to this JSONL file
    #[arg(long)]
    jsonl: Option<PathBuf>,

    /// TOML suite file; flags above become the defaults of every entry
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Print available circuits and curves, then exit
    #[arg(long)]
    list: bool,

    /// Enable verbose logging (or set ZK_BENCH_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("ZK_BENCH_LOG").unwrap_or_else(|_| {
        if verbose { "zk_bench=debug".to_string() } else { "zk_bench=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let circuits = CircuitRegistry::with_defaults();
    if cli.list {
        println!("{}", bench_cmd::list(&circuits));
        return;
    }

    let raw = RawParams {
        circuit: cli.circuit,
        size: cli.size,
        count: cli.count,
        algo: cli.algo,
        profile: cli.profile,
        curve: cli.curve,
    };
    let opts = OutputOptions {
        profile_dir: cli.profile_dir,
        json: cli.json,
        jsonl: cli.jsonl,
        cli_args: std::env::args().collect(),
    };

    let result = match &cli.suite {
        Some(suite) => bench_cmd::run_suite(suite, &raw, &circuits, &opts).map(|_| ()),
        None => bench_cmd::run(&raw, &circuits, &opts).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
