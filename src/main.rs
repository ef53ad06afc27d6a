use anyhow::Context;
use clap::Parser;
use prof_rates::app::{run_command, AppCommand};
use prof_rates::config::{load_config, LogFormat, StoreBackend, TomlConfig};
use prof_rates::core::Store;
use prof_rates::utils::logger;
use prof_rates::{CliConfig, FileStore, MemoryStore, RatingError, RatingService, Session};
use std::path::PathBuf;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CLIENT: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 3;

fn exit_code_for(error: &RatingError) -> i32 {
    if error.is_client_error() {
        EXIT_CLIENT
    } else if matches!(error, RatingError::StorageUnavailable { .. }) {
        EXIT_STORAGE
    } else {
        EXIT_CONFIG
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config_path = cli.config.as_deref().map(PathBuf::from);
    let config = match load_config(config_path.as_deref(), cli.store.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(EXIT_CONFIG);
        }
    };

    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    let session = Session::resolve(cli.user.as_deref());
    tracing::debug!("Authenticated session: {}", session.is_authenticated());
    let command = AppCommand::from(cli.command.clone());

    let result = match config.store.backend {
        StoreBackend::Memory => run(MemoryStore::new(), &config, &session, command, cli.json).await,
        StoreBackend::File => match FileStore::open(&config.store.path)
            .await
            .with_context(|| format!("Failed to open store at {}", config.store.path))
        {
            Ok(store) => run(store, &config, &session, command, cli.json).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            let (message, code) = match e.downcast_ref::<RatingError>() {
                Some(rating_error) => {
                    tracing::debug!(
                        "Command failed: {} (kind: {:?}, status: {})",
                        rating_error,
                        rating_error.kind(),
                        rating_error.status_code()
                    );
                    (rating_error.user_friendly_message(), exit_code_for(rating_error))
                }
                None => (format!("{:#}", e), EXIT_STORAGE),
            };

            if code != EXIT_CLIENT {
                tracing::error!("{:#}", e);
            }
            eprintln!("❌ {}", message);
            std::process::exit(code);
        }
    }
}

async fn run<S: Store>(
    store: S,
    config: &TomlConfig,
    session: &Session,
    command: AppCommand,
    json: bool,
) -> anyhow::Result<String> {
    config
        .seed_catalog(&store)
        .await
        .context("Failed to seed catalog")?;

    let service = RatingService::with_rounding(store, config.ratings.rounding);
    let output = run_command(&service, session, command, json).await?;
    Ok(output)
}
