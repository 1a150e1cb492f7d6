use crate::config::toml_config::{AppConfig, StorageBackend};
use crate::domain::model::{CardApplication, CardKey};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "card-issuer")]
#[command(about = "Issue and manage credit cards under the issuance policy")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override identity.base_url from config
    #[arg(long, global = true)]
    pub identity_url: Option<String>,

    /// Override storage.path from config (implies the file backend)
    #[arg(long, global = true)]
    pub store_path: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Submit a card application
    Issue(IssueArgs),
    /// Show the card held by a customer
    Query { customer_id: String },
    /// Show a card by its id
    Show { id: u64 },
    /// Change the limit of an existing card
    UpdateLimit(UpdateLimitArgs),
}

#[derive(Debug, Clone, Args)]
pub struct IssueArgs {
    #[arg(long)]
    pub customer_id: String,
    #[arg(long)]
    pub limit: u64,
    #[arg(long)]
    pub card_number: String,
    #[arg(long)]
    pub expiry: String,
    #[arg(long)]
    pub cvv: String,
}

impl From<IssueArgs> for CardApplication {
    fn from(args: IssueArgs) -> Self {
        CardApplication {
            customer_id: args.customer_id,
            limit: args.limit,
            card_number: args.card_number,
            expiry: args.expiry,
            cvv: args.cvv,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct UpdateLimitArgs {
    #[arg(long, conflicts_with = "customer_id", required_unless_present = "customer_id")]
    pub id: Option<u64>,
    #[arg(long)]
    pub customer_id: Option<String>,
    #[arg(long)]
    pub limit: u64,
}

impl UpdateLimitArgs {
    pub fn key(&self) -> Option<CardKey> {
        match (&self.id, &self.customer_id) {
            (Some(id), _) => Some(CardKey::Id(*id)),
            (None, Some(customer_id)) => Some(CardKey::Customer(customer_id.clone())),
            (None, None) => None,
        }
    }
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies command-line overrides.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(url) = &self.identity_url {
            tracing::debug!("🔧 identity.base_url overridden to: {}", url);
            config.identity.base_url = url.clone();
        }
        if let Some(path) = &self.store_path {
            tracing::debug!("🔧 storage.path overridden to: {}", path);
            config.storage.backend = StorageBackend::File;
            config.storage.path = path.clone();
        }

        Ok(config)
    }
}
