//! CLI commands

use anyhow::Result;
use clap::Subcommand;
use padron_client::{EstablishmentListParams, PadronClient, PadronError, TokenStore};
use padron_core::{EstablishmentCreate, EstablishmentPatch, LoginRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session credentials
    Login {
        /// Backend username
        #[arg(short = 'u', long)]
        username: String,

        /// Backend password
        #[arg(short = 'p', long, env = "PADRON_PASSWORD")]
        password: String,
    },

    /// Drop the stored session credentials
    Logout,

    /// Show the location tree behind the environment picker
    Environments,

    /// Establishment operations
    Establishments {
        #[command(subcommand)]
        command: EstablishmentCommands,
    },
}

#[derive(Subcommand)]
pub enum EstablishmentCommands {
    /// List establishments, paginated
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,

        /// Free-text search filter
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one establishment
    Get { id: i64 },

    /// Create an establishment
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        /// Location code produced by the environment picker
        #[arg(long)]
        location: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        telephone: Option<String>,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        province: Option<String>,

        #[arg(long)]
        district: Option<String>,

        /// Whether the establishment sells online
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        has_internet_sales: bool,

        /// Whether the establishment offers courier delivery
        #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
        has_courier: bool,
    },

    /// Update fields of an establishment
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        telephone: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        has_internet_sales: Option<bool>,

        #[arg(long)]
        has_courier: Option<bool>,

        #[arg(long)]
        code: Option<String>,
    },

    /// Delete an establishment
    Delete { id: i64 },
}

impl Commands {
    pub async fn execute(self, data_dir: Option<PathBuf>, base_url: Option<String>) -> Result<()> {
        let data_dir = config::resolve_data_dir(data_dir);
        let config = config::load_config(&data_dir)?;
        let base_url = base_url
            .or_else(|| std::env::var("PADRON_API_URL").ok())
            .unwrap_or(config.base_url);

        let tokens = Arc::new(TokenStore::open(data_dir.join("tokens.json")));
        let client = PadronClient::builder()
            .base_url(base_url)
            .token_store(tokens)
            .build()?;

        match self {
            Commands::Login { username, password } => {
                let credentials = LoginRequest { username, password };
                client.login(&credentials).await.map_err(report)?;
                println!("Sesión iniciada como {}", credentials.username);
                Ok(())
            }
            Commands::Logout => {
                client.logout();
                println!("Sesión cerrada");
                Ok(())
            }
            Commands::Environments => {
                let tree = client.list_environments().await.map_err(report)?;
                println!("{}", serde_json::to_string_pretty(&tree)?);
                Ok(())
            }
            Commands::Establishments { command } => command.execute(&client).await,
        }
    }
}

impl EstablishmentCommands {
    pub async fn execute(self, client: &PadronClient) -> Result<()> {
        match self {
            EstablishmentCommands::List {
                page,
                page_size,
                search,
            } => {
                let params = EstablishmentListParams {
                    page,
                    page_size,
                    search,
                };
                let listing = client.list_establishments(&params).await.map_err(report)?;
                println!("{}", serde_json::to_string_pretty(&listing)?);
                Ok(())
            }
            EstablishmentCommands::Get { id } => {
                let establishment = client.get_establishment(id).await.map_err(report)?;
                println!("{}", serde_json::to_string_pretty(&establishment)?);
                Ok(())
            }
            EstablishmentCommands::Create {
                name,
                address,
                location,
                email,
                telephone,
                code,
                department,
                province,
                district,
                has_internet_sales,
                has_courier,
            } => {
                let payload = EstablishmentCreate {
                    name,
                    address,
                    email,
                    telephone,
                    location,
                    has_internet_sales,
                    has_courier,
                    code,
                    department,
                    province,
                    district,
                };
                let created = client.create_establishment(&payload).await.map_err(report)?;
                println!("{}", serde_json::to_string_pretty(&created)?);
                Ok(())
            }
            EstablishmentCommands::Update {
                id,
                name,
                address,
                email,
                telephone,
                location,
                has_internet_sales,
                has_courier,
                code,
            } => {
                let patch = EstablishmentPatch {
                    name,
                    address,
                    email,
                    telephone,
                    location,
                    has_internet_sales,
                    has_courier,
                    code,
                };
                let updated = client
                    .update_establishment(id, &patch)
                    .await
                    .map_err(report)?;
                println!("{}", serde_json::to_string_pretty(&updated)?);
                Ok(())
            }
            EstablishmentCommands::Delete { id } => {
                client.delete_establishment(id).await.map_err(report)?;
                println!("Establecimiento {id} eliminado");
                Ok(())
            }
        }
    }
}

/// Turn an operation failure into the notification shown to the user,
/// logging the raw error. Nothing is swallowed.
fn report(error: PadronError) -> anyhow::Error {
    match &error {
        PadronError::Api(api) => {
            warn!(code = api.code, meta = ?api.meta, "[API ERROR] {}: {}", api.codestring, api.message);
            anyhow::anyhow!("{}: {}", api.codestring, api.message)
        }
        PadronError::Validation(validation) => {
            warn!("[VALIDATION] {validation}");
            anyhow::anyhow!("Datos inválidos: {validation}")
        }
    }
}
