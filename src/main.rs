use card_issuer::config::{Command, StorageBackend};
use card_issuer::utils::{logger, validation::Validate};
use card_issuer::{
    AppConfig, CardApplication, CardError, CardStore, CliConfig, FileCardStore,
    HttpIdentityVerifier, InMemoryCardStore, IssuanceService, LimitUpdate,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting card-issuer CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {} (kind: {:?})", e, e.kind());
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<(), CardError> {
    let config = cli.resolve()?;
    config.validate()?;

    let verifier = HttpIdentityVerifier::new(&config.identity.base_url, config.identity_timeout())?;

    match config.storage.backend {
        StorageBackend::File => {
            let store = FileCardStore::open(&config.storage.path)?;
            execute(cli.command, &config, store, verifier).await
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; nothing will be kept after exit");
            execute(cli.command, &config, InMemoryCardStore::new(), verifier).await
        }
    }
}

async fn execute<S: CardStore>(
    command: Command,
    config: &AppConfig,
    store: S,
    verifier: HttpIdentityVerifier,
) -> Result<(), CardError> {
    let service = IssuanceService::new(store, verifier, config.issuance_policy());

    match command {
        Command::Issue(args) => {
            let card = service.issue(CardApplication::from(args)).await?;
            print_json(&card)
        }
        Command::Query { customer_id } => match service.query_by_customer(&customer_id).await? {
            Some(card) => print_json(&card),
            None => Err(CardError::NotFound {
                target: format!("customer {}", customer_id),
            }),
        },
        Command::Show { id } => {
            let card = service.card_by_id(id).await?;
            print_json(&card)
        }
        Command::UpdateLimit(args) => {
            let key = args.key().ok_or_else(|| CardError::MissingConfigError {
                field: "--id or --customer-id".to_string(),
            })?;
            match service.update_limit(key, args.limit).await? {
                LimitUpdate::Updated(card) => print_json(&card),
                LimitUpdate::NotFound => {
                    tracing::warn!("No card matched; nothing updated");
                    println!("null");
                    Ok(())
                }
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CardError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
