use clap::{Parser, Subcommand};
use schoolrec_api::RestApi;
use schoolrec_storage::{load_dataset, train, Artifacts, TrainConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// School similarity recommender
#[derive(Parser, Debug)]
#[command(name = "schoolrec")]
#[command(about = "Train and serve school similarity recommendations", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the similarity models from a dataset CSV and persist them
    Train {
        /// Path to the school dataset CSV
        #[arg(short, long)]
        dataset: PathBuf,

        /// Where to write the fitted artifact snapshot
        #[arg(short, long, default_value = "models/schoolrec.bin")]
        artifacts: PathBuf,

        /// Committee size of the ensemble model
        #[arg(long, default_value_t = 5)]
        trees: usize,

        /// Depth cap for each committee tree
        #[arg(long, default_value_t = 15)]
        max_depth: usize,

        /// Seed for bootstrap sampling
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Dataset column to exclude from the feature space (repeatable)
        #[arg(long = "drop-column")]
        drop_columns: Vec<String>,
    },
    /// Serve recommendations over HTTP from a persisted snapshot
    Serve {
        /// Path to the fitted artifact snapshot
        #[arg(short, long, default_value = "models/schoolrec.bin")]
        artifacts: PathBuf,

        /// HTTP API port
        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Directory with the static frontend
        #[arg(long, default_value = "static")]
        static_dir: PathBuf,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting schoolrec v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Train {
            dataset,
            artifacts,
            trees,
            max_depth,
            seed,
            drop_columns,
        } => {
            info!("Dataset: {:?}", dataset);
            let data = load_dataset(&dataset)?;
            info!("Loaded {} schools", data.records.len());

            let config = TrainConfig {
                n_trees: trees,
                max_depth,
                seed,
                drop_columns,
            };
            let fitted = train(&data, &config)?;
            fitted.save(&artifacts)?;
            info!(
                "Fitted {} features x {} schools, snapshot written to {:?}",
                fitted.feature_columns.len(),
                fitted.records.len(),
                artifacts
            );
        }
        Command::Serve {
            artifacts,
            port,
            static_dir,
        } => {
            // All-or-nothing: a missing or misaligned snapshot refuses to
            // serve instead of starting with an empty store.
            let resolver = Artifacts::load(&artifacts)?.into_resolver()?;
            info!("Loaded {} schools from {:?}", resolver.store().len(), artifacts);
            info!("HTTP API: http://localhost:{}/", port);
            RestApi::start(Arc::new(resolver), port, static_dir).await?;
        }
    }

    Ok(())
}
