//! CLI for randlab: classical pseudorandom generators, period theorems,
//! uniformity tests and acceptance-rejection sampling.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "randlab")]
#[command(about = "randlab: classical pseudorandom generators and the theorems that judge them")]
#[command(version = randlab_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sequence until it repeats, collapses to 0 or hits the ceiling
    Generate {
        /// Generation method
        #[arg(long, value_parser = randlab_core::GenerationMethod::NAMES)]
        method: String,

        /// Method parameter as key=value (x0, a, b, m, digits). Repeatable.
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Iteration ceiling
        #[arg(long, default_value = "100000")]
        max_iterations: usize,

        /// Number of rows to print in the table view (0 = all)
        #[arg(long, default_value = "20")]
        show: usize,

        /// Print the JSON response instead of the table view
        #[arg(long)]
        json: bool,

        /// Write the JSON response to a file
        #[arg(long)]
        output: Option<String>,
    },

    /// Check congruential parameters against their maximum-period theorem
    Validate {
        /// Generation method
        #[arg(long, value_parser = randlab_core::GenerationMethod::NAMES)]
        method: String,

        /// Method parameter as key=value (x0, a, b, m, digits). Repeatable.
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Print the JSON response
        #[arg(long)]
        json: bool,

        /// Write the JSON response to a file
        #[arg(long)]
        output: Option<String>,
    },

    /// Run a chi-square or Kolmogorov-Smirnov uniformity test
    Test {
        /// Test to run
        #[arg(long = "type", value_parser = ["chi_square", "kolmogorov_smirnov"])]
        test_type: String,

        /// Number of equal-width intervals (chi-square)
        #[arg(long)]
        intervals: Option<u64>,

        /// Significance level: 0.01, 0.05 or 0.10
        #[arg(long)]
        alpha: Option<f64>,

        /// Sample values, comma or space separated
        #[arg(long, num_args = 1.., value_delimiter = ',', conflicts_with = "file")]
        numbers: Vec<f64>,

        /// Read the sample from a file: plain numbers, a JSON array, or a
        /// `randlab generate --output` result
        #[arg(long)]
        file: Option<String>,

        /// Print the JSON response
        #[arg(long)]
        json: bool,

        /// Write the JSON response to a file
        #[arg(long)]
        output: Option<String>,
    },

    /// Draw variates from a fixed density by acceptance-rejection
    Sample {
        /// Target density
        #[arg(long, value_parser = ["linear", "quadratic", "hyperbola"])]
        distribution: String,

        /// Number of values to accept (1-10000)
        #[arg(long, default_value = "100")]
        count: i64,

        /// Seed for reproducible draws (OS entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of accepted values to print (0 = all)
        #[arg(long, default_value = "20")]
        show: usize,

        /// Print the JSON response
        #[arg(long)]
        json: bool,

        /// Write the JSON response to a file
        #[arg(long)]
        output: Option<String>,
    },

    /// Start the HTTP engine server
    Server {
        /// Address to bind
        #[arg(long, env = "RANDLAB_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "RANDLAB_PORT", default_value = "8000")]
        port: u16,

        /// Generator iteration ceiling
        #[arg(long, env = "RANDLAB_MAX_ITERATIONS", default_value = "100000")]
        max_iterations: usize,

        /// Largest sampler count accepted
        #[arg(long, env = "RANDLAB_MAX_VARIATES", default_value = "10000")]
        max_variates: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            method,
            params,
            max_iterations,
            show,
            json,
            output,
        } => commands::generate::run(commands::generate::GenerateCommandConfig {
            method: &method,
            params: &params,
            max_iterations,
            show,
            json,
            output_path: output.as_deref(),
        }),
        Commands::Validate {
            method,
            params,
            json,
            output,
        } => commands::validate::run(&method, &params, json, output.as_deref()),
        Commands::Test {
            test_type,
            intervals,
            alpha,
            numbers,
            file,
            json,
            output,
        } => commands::test::run(commands::test::TestCommandConfig {
            test_type: &test_type,
            intervals,
            alpha,
            numbers,
            file: file.as_deref(),
            json,
            output_path: output.as_deref(),
        }),
        Commands::Sample {
            distribution,
            count,
            seed,
            show,
            json,
            output,
        } => commands::sample::run(
            &distribution,
            count,
            seed,
            show,
            json,
            output.as_deref(),
        ),
        Commands::Server {
            host,
            port,
            max_iterations,
            max_variates,
        } => commands::server::run(&host, port, max_iterations, max_variates),
    }
}
