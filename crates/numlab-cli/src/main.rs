mod config;
mod data;
mod demos;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::data::ControlSet;
use crate::demos::Context;

#[derive(Parser)]
#[command(
    name = "numlab",
    version,
    about = "Numerical methods demos: curves, quadrature, approximation, linear systems"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for generated charts and point sets
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Seed for every random draw in the run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot two Bezier curves with their control polygons
    Bezier {
        #[arg(long, value_enum, default_value = "small")]
        set: ControlSet,
        /// Points evaluated along each curve
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Generate random point sets around the reference polygons
    RandomPoints {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Render the random test-data matrix with column mean and variance
    StatsMatrix,
    /// Chebyshev best-square approximation of sqrt(1 - x^2)
    Chebyshev {
        /// Comma separated, e.g. 8,10
        #[arg(long, value_delimiter = ',')]
        degrees: Option<Vec<usize>>,
    },
    /// Least-squares polynomial fit of points on the unit semicircle
    LsqFit {
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        degree: Option<usize>,
    },
    /// Step-halving composite Simpson quadrature
    Simpson,
    /// Gaussian elimination with partial pivoting
    Gauss {
        /// System file: "n" followed by n rows of n + 1 numbers
        #[arg(long)]
        input: Option<PathBuf>,
        /// Solve a random sparse upper-triangular system of this order instead
        #[arg(long, conflicts_with = "input")]
        size: Option<usize>,
    },
    /// Jacobi iteration on a random sparse upper-triangular system
    Jacobi {
        #[arg(long)]
        size: Option<usize>,
    },
    /// Solve the built-in quadratic equations with every strategy
    Quadratic {
        /// Starting point for Newton iteration
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        guess: f64,
    },
    /// Nearest point on a random ellipse by projected gradient descent
    Ellipse,
    /// Hausdorff distance between two discretized Bezier curves
    Hausdorff {
        /// Control points: count, then that many "x y" lines, for each curve
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write "Hausdorff Distance: <value>" here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show that float addition commutes but does not associate
    FloatLaws,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = config::load_config(cli.config.as_deref())?;
    if cli.output_dir.is_some() {
        config.output_dir = cli.output_dir;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let mut ctx = Context::new(config)?;

    match cli.command {
        Commands::Bezier { set, samples } => demos::bezier(&ctx, set, samples),
        Commands::RandomPoints { count } => demos::random_points(&mut ctx, count),
        Commands::StatsMatrix => demos::stats_matrix(&mut ctx),
        Commands::Chebyshev { degrees } => demos::chebyshev(&ctx, degrees),
        Commands::LsqFit { points, degree } => demos::lsq_fit(&ctx, points, degree),
        Commands::Simpson => demos::simpson(&ctx),
        Commands::Gauss { input, size } => demos::gauss(&mut ctx, input.as_deref(), size),
        Commands::Jacobi { size } => demos::jacobi_demo(&mut ctx, size),
        Commands::Quadratic { guess } => demos::quadratic(guess),
        Commands::Ellipse => demos::ellipse(&mut ctx),
        Commands::Hausdorff { input, output } => {
            demos::hausdorff_demo(&ctx, input.as_deref(), output.as_deref())
        }
        Commands::FloatLaws => demos::float_laws(),
    }
}
