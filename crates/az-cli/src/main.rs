//! azpost CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use az_core::LogDensity;
use az_inference::Posterior;

mod run_config;

use run_config::{ParamsInput, Problem, RunConfig};

#[derive(Parser)]
#[command(name = "azpost")]
#[command(about = "azpost - Bayesian scoring of R-matrix parameters")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sampled parameter layout, starting point and priors
    Describe {
        /// Run configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate the log-posterior at one or more parameter vectors
    Eval {
        /// Run configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Parameter vectors (JSON): a list of numbers, a name-to-value object,
        /// or a list of either. Defaults to the starting point.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Overrides the configuration.
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Describe { config, output } => cmd_describe(&config, output.as_ref()),
        Commands::Eval { config, params, output, threads } => {
            cmd_eval(&config, params.as_deref(), output.as_ref(), threads)
        }
        Commands::Version => {
            println!("azpost {}", az_core::VERSION);
            Ok(())
        }
    }
}

fn load_problem(config: &Path) -> Result<(RunConfig, Problem)> {
    tracing::info!(path = %config.display(), "loading run configuration");
    let cfg = run_config::read_run_config(config)?;
    let base_dir = config.parent().unwrap_or_else(|| Path::new("."));
    let problem = cfg.build(base_dir)?;
    Ok((cfg, problem))
}

fn cmd_describe(config: &Path, output: Option<&PathBuf>) -> Result<()> {
    let (_, problem) = load_problem(config)?;
    let posterior = Posterior::new(&problem.likelihood).with_priors(problem.priors.clone())?;
    let params = problem.likelihood.parameters();

    let kinds: Vec<&str> =
        (0..params.dim()).map(|i| if params.is_norm(i) { "norm" } else { "physics" }).collect();

    let value = serde_json::json!({
        "parameter_names": params.names(),
        "kinds": kinds,
        "n_physics": params.n_physics(),
        "n_norms": params.n_norms(),
        "initial": posterior.parameter_init(),
        "priors": posterior.priors().priors(),
        "n_points": problem.likelihood.data().total_points(),
    });
    write_json(output, value)
}

fn cmd_eval(
    config: &Path,
    params: Option<&Path>,
    output: Option<&PathBuf>,
    threads: Option<usize>,
) -> Result<()> {
    let (cfg, problem) = load_problem(config)?;

    let threads = threads.or(cfg.threads).unwrap_or(1);
    if threads > 0 {
        // Best-effort; the global pool may already be initialized.
        let _ = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global();
    }

    let posterior = Posterior::new(&problem.likelihood).with_priors(problem.priors.clone())?;
    let model = problem.likelihood.parameters();

    let thetas: Vec<Vec<f64>> = match params {
        Some(path) => run_config::read_params(path)?
            .into_iter()
            .map(|p| match p {
                ParamsInput::Vector(v) => Ok(v),
                ParamsInput::Named(m) => Ok(model.vector_from_named(&m)?),
            })
            .collect::<Result<_>>()?,
        None => vec![posterior.parameter_init()],
    };
    tracing::info!(vectors = thetas.len(), threads, "evaluating posterior");

    let evaluations: Vec<serde_json::Value> = posterior
        .evaluate_batch(&thetas)
        .into_iter()
        .map(|r| match r {
            Ok(e) => {
                let accepted = e.is_accepted();
                let mut v = serde_json::to_value(e).unwrap_or(serde_json::Value::Null);
                if let Some(obj) = v.as_object_mut() {
                    obj.insert("accepted".into(), accepted.into());
                }
                v
            }
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        })
        .collect();

    let value = serde_json::json!({
        "parameter_names": model.names(),
        "evaluations": evaluations,
    });
    write_json(output, value)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
