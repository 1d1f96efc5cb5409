use clap::Parser;
use lanewise::{
    ElementKind, SpeciesDescriptor, VectorError,
    config::{self, ConfigError, RuntimeConfig},
    differential::{replay_descriptor, sweep_descriptor},
    fs::{LoadError, load_lane_rows},
    species::{Shape, by_species},
    statistics::DifferentialStats,
};
use rand::{SeedableRng, rngs::StdRng};
use std::{
    path::PathBuf,
    process::ExitCode,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};
use thiserror::Error;
use tqdm::tqdm;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Differential checker for the lane-wise vector API
#[derive(Parser, Debug)]
#[command(name = "lanewise")]
#[command(about = "Compares the scalar and portable SIMD backends lane for lane", long_about = None)]
struct Args {
    /// Seed for the random operands
    #[arg(short, long, default_value_t = 1337)]
    seed: u64,

    /// Random cases per species
    #[arg(short, long, default_value_t = 1000)]
    iterations: usize,

    /// Shape widths to sweep in bits (comma-separated, "max" for the widest scalable shape)
    #[arg(long, value_delimiter = ',', default_value = "64,128,256,512,max")]
    shapes: Vec<String>,

    /// Number of threads sharing the cases of one species
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// JSON runtime configuration, installed before anything else runs
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 2-d float32 numpy file whose rows replace the random vector operands
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Where to write the per-operation JSON report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error("could not write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("unknown shape {0:?}, expected a bit width or \"max\"")]
    Shape(String),
}

fn resolve_descriptors(shapes: &[String]) -> Result<Vec<SpeciesDescriptor>, CliError> {
    let mut descriptors = Vec::new();
    for token in shapes {
        let token = token.trim();
        for kind in ElementKind::ALL {
            let desc = if token == "max" {
                let max = config::current().max_bit_width;
                let shape = Shape::scalable(max).ok_or_else(|| CliError::Shape(token.into()))?;
                SpeciesDescriptor::new(kind, shape)
            } else {
                let bits = token
                    .parse()
                    .map_err(|_| CliError::Shape(token.into()))?;
                by_species(kind, bits)?
            };
            if !descriptors.contains(&desc) {
                descriptors.push(desc);
            }
        }
    }
    Ok(descriptors)
}

fn run_species_job(
    desc: SpeciesDescriptor,
    seed: u64,
    iterations: usize,
    num_threads: usize,
) -> Result<DifferentialStats, CliError> {
    let batch_size = 64;
    let next_batch = &AtomicUsize::new(0);

    let results: Vec<Result<DifferentialStats, VectorError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads.max(1))
            .map(|_| {
                scope.spawn(move || -> Result<DifferentialStats, VectorError> {
                    let mut local_stats = DifferentialStats::new();
                    loop {
                        let batch_start = next_batch.fetch_add(batch_size, Ordering::Relaxed);
                        if batch_start >= iterations {
                            break;
                        }
                        let batch_end = std::cmp::min(batch_start + batch_size, iterations);

                        // one stream per batch, independent of the thread count
                        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(batch_start as u64));
                        for _ in batch_start..batch_end {
                            sweep_descriptor(desc, &mut rng, &mut local_stats)?;
                        }
                    }
                    Ok(local_stats)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });

    let mut combined = DifferentialStats::new();
    for local in results {
        combined = combined.merge(&local?);
    }
    Ok(combined)
}

fn run_replay_job(
    desc: SpeciesDescriptor,
    rows: &[Vec<f32>],
    seed: u64,
) -> Result<DifferentialStats, CliError> {
    let mut stats = DifferentialStats::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let len = rows.len();
    for i in 0..len {
        let operands = [&rows[i][..], &rows[(i + 1) % len][..], &rows[(i + 2) % len][..]];
        replay_descriptor(desc, operands, &mut rng, &mut stats)?;
    }
    Ok(stats)
}

fn run(args: &Args) -> Result<DifferentialStats, CliError> {
    if let Some(path) = &args.config {
        config::install(RuntimeConfig::from_json_path(path)?)?;
    }
    let descriptors = resolve_descriptors(&args.shapes)?;
    let rows = args.replay.as_ref().map(|path| load_lane_rows(path)).transpose()?;

    info!(
        species = descriptors.len(),
        iterations = args.iterations,
        threads = args.threads,
        seed = args.seed,
        "starting differential sweep"
    );

    let mut stats = DifferentialStats::new();
    for &desc in tqdm(descriptors.iter()) {
        let job = match &rows {
            Some(rows) => run_replay_job(desc, rows, args.seed)?,
            None => run_species_job(desc, args.seed, args.iterations, args.threads)?,
        };
        stats = stats.merge(&job);
    }

    if let Some(path) = &args.report {
        stats.dump(path)?;
    }
    Ok(stats)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let stats = match run(&args) {
        Ok(stats) => stats,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    println!("\n==========");
    println!(
        "Checked {} operations over {} cases",
        stats.get_checked(),
        stats.get_cases()
    );
    println!("Mismatches: {}", stats.get_mismatched());
    for op in stats.mismatched_ops() {
        println!("  {op}: {:?}", stats.get_tally(op));
    }
    println!("==========");

    if stats.get_mismatched() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
