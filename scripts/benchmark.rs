// scripts/benchmark.rs
use clap::Parser;
use mc_greeks::analytics::black_scholes;
use mc_greeks::instruments::EuropeanOption;
use mc_greeks::math_utils::Timer;
use mc_greeks::mc::{price_gbm, price_heston, FiniteDifferenceGreeks, SimulationConfig};
use mc_greeks::models::{GbmParams, HestonParams};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Throughput and convergence benchmarks for the Monte Carlo engines
#[derive(Parser, Debug)]
#[command(name = "benchmark", version)]
struct Args {
    /// Path counts to sweep for the GBM convergence table
    #[arg(long, value_delimiter = ',', default_values_t = vec![10_000, 100_000, 1_000_000])]
    paths: Vec<usize>,

    /// Logical worker count (defaults to the number of CPUs)
    #[arg(long, default_value_t = num_cpus::get())]
    workers: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Time steps for the Heston run
    #[arg(long, default_value_t = 252)]
    heston_steps: usize,

    /// Directory the CSV report is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rust_version: Command::new("rustc")
                .arg("--version")
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown Rust version".to_string()),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    value: f64,
    std_error: Option<f64>,
    analytic_value: Option<f64>,
}

impl BenchmarkResult {
    fn relative_error(&self) -> Option<f64> {
        self.analytic_value
            .map(|analytic| (self.value - analytic).abs() / analytic.abs())
    }
}

const S0: f64 = 100.0;
const K: f64 = 100.0;
const R: f64 = 0.05;
const SIGMA: f64 = 0.2;
const T: f64 = 1.0;

fn run_gbm_benchmarks(args: &Args) -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let call = EuropeanOption::call(K, T);
    let market = GbmParams::new(S0, R, SIGMA);
    let analytic_price = black_scholes::call_price(S0, K, R, SIGMA, T);

    for &paths in &args.paths {
        info!(paths, "running GBM benchmark");
        let cfg = SimulationConfig::new(paths)
            .with_seed(args.seed)
            .with_workers(args.workers);

        let mut timer = Timer::new();
        timer.start();
        let est = price_gbm(&call, &market, &cfg);
        let time_ms = timer.elapsed_ms();

        results.push(BenchmarkResult {
            name: format!("GBM Call ({}k paths)", paths / 1000),
            paths: est.paths,
            time_ms,
            throughput_paths_per_sec: est.paths as f64 / (time_ms / 1000.0),
            value: est.price,
            std_error: Some(est.std_error),
            analytic_value: Some(analytic_price),
        });
    }

    // Greeks at the largest path count only
    if let Some(&paths) = args.paths.iter().max() {
        let fd = FiniteDifferenceGreeks::from_config(
            SimulationConfig::new(paths)
                .with_seed(args.seed)
                .with_workers(args.workers),
        );

        let cases: [(&str, usize, fn(&FiniteDifferenceGreeks) -> f64, f64); 4] = [
            (
                "FD Delta",
                2,
                |fd| fd.delta(&EuropeanOption::call(K, T), &GbmParams::new(S0, R, SIGMA), None),
                black_scholes::call_delta(S0, K, R, SIGMA, T),
            ),
            (
                "FD Gamma",
                3,
                |fd| fd.gamma(&EuropeanOption::call(K, T), &GbmParams::new(S0, R, SIGMA), None),
                black_scholes::gamma(S0, K, R, SIGMA, T),
            ),
            (
                "FD Vega",
                2,
                |fd| fd.vega(&EuropeanOption::call(K, T), &GbmParams::new(S0, R, SIGMA), None),
                black_scholes::vega(S0, K, R, SIGMA, T),
            ),
            (
                "FD Rho",
                2,
                |fd| fd.rho(&EuropeanOption::call(K, T), &GbmParams::new(S0, R, SIGMA), None),
                black_scholes::call_rho(S0, K, R, SIGMA, T),
            ),
        ];

        for (name, repricings, greek, analytic) in cases {
            info!(paths, greek = name, "running greeks benchmark");
            let mut timer = Timer::new();
            timer.start();
            let value = greek(&fd);
            let time_ms = timer.elapsed_ms();
            let total_paths = repricings * paths;

            results.push(BenchmarkResult {
                name: name.to_string(),
                paths: total_paths,
                time_ms,
                throughput_paths_per_sec: total_paths as f64 / (time_ms / 1000.0),
                value,
                std_error: None,
                analytic_value: Some(analytic),
            });
        }
    }

    results
}

fn run_heston_benchmark(args: &Args) -> BenchmarkResult {
    let params = HestonParams {
        spot: S0,
        rate: R,
        v0: 0.04,
        kappa: 2.0,
        theta: 0.04,
        xi: 0.3,
        rho: -0.5,
    };
    let paths = 100_000;
    let cfg = SimulationConfig::new(paths)
        .with_steps(args.heston_steps)
        .with_seed(args.seed)
        .with_workers(args.workers);

    info!(paths, steps = args.heston_steps, "running Heston benchmark");
    let mut timer = Timer::new();
    timer.start();
    let price = price_heston(&EuropeanOption::call(K, T), &params, &cfg);
    let time_ms = timer.elapsed_ms();

    BenchmarkResult {
        name: format!("Heston FTE Call ({} steps)", args.heston_steps),
        paths,
        time_ms,
        throughput_paths_per_sec: paths as f64 / (time_ms / 1000.0),
        value: price,
        std_error: None,
        analytic_value: None,
    }
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "N/A".to_string())
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    args: &Args,
    path: &Path,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(file, "# Logical Workers: {}", args.workers)?;
    writeln!(file, "# Seed: {}", args.seed)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Paths,Time_ms,Throughput_paths_per_sec,Value,Std_Error,Analytic_Value,Relative_Error"
    )?;
    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.6},{},{},{}",
            result.name,
            result.paths,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.value,
            format_optional(result.std_error, 6),
            format_optional(result.analytic_value, 6),
            format_optional(result.relative_error(), 6),
        )?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.workers == 0 {
        return Err("--workers must be at least 1".into());
    }

    println!("mc-greeks Benchmark Suite");
    println!("=========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!("  Logical Workers: {}", args.workers);
    println!();

    let mut all_results = run_gbm_benchmarks(&args);
    all_results.push(run_heston_benchmark(&args));

    println!("\n{:=<100}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<100}", "");
    println!(
        "{:<28} {:>9} {:>10} {:>14} {:>10} {:>10} {:>10} {:>10}",
        "Benchmark", "Paths", "Time (ms)", "Throughput", "Value", "Std Err", "Analytic", "Rel Error"
    );
    println!("{:-<100}", "");

    for result in &all_results {
        println!(
            "{:<28} {:>9} {:>10.2} {:>14.0} {:>10.4} {:>10} {:>10} {:>10}",
            result.name,
            result.paths,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.value,
            format_optional(result.std_error, 4),
            format_optional(result.analytic_value, 4),
            result
                .relative_error()
                .map(|e| format!("{:.3}%", e * 100.0))
                .unwrap_or_else(|| "N/A".to_string()),
        );
    }
    println!("{:=<100}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let path = args.output_dir.join(format!("benchmark_results_{}.csv", timestamp));
    write_results_to_csv(&all_results, &system_info, &args, &path)?;

    println!("\nResults saved to: {}", path.display());
    println!("To reproduce: cargo run --bin benchmark --release -- --workers {} --seed {}", args.workers, args.seed);

    Ok(())
}
