use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use color_eyre::eyre::{bail, Result};
use member_registry::{
    app_state::{AppState, MemberStoreType},
    services::data_stores::{HashmapMemberStore, RedbMemberStore},
    utils::{
        constants::{env, prod, APP_PORT, DATABASE_DIR, DATABASE_FILE},
        tracing::init_tracing,
    },
    Application, Frontends,
};

/// Member registry served as a JSON API and as HTML forms
#[derive(Parser, Debug)]
#[command(name = "member-registry", version)]
struct Args {
    /// Interface address to bind
    #[arg(short, long, env = env::APP_ADDRESS_ENV_VAR, default_value = prod::APP_HOST)]
    address: String,

    /// Port to listen on
    #[arg(short, long, env = env::APP_PORT_ENV_VAR, default_value_t = *APP_PORT)]
    port: u16,

    /// Directory holding the database file
    #[arg(long, env = env::DATABASE_DIR_ENV_VAR, default_value_t = DATABASE_DIR.to_string())]
    db_dir: String,

    /// Database file name inside the database directory
    #[arg(long, env = env::DATABASE_FILE_ENV_VAR, default_value_t = DATABASE_FILE.to_string())]
    db_file: String,

    /// Keep members in memory only; nothing is written to disk
    #[arg(long)]
    in_memory: bool,

    /// Do not serve the JSON API under /api
    #[arg(long)]
    disable_api: bool,

    /// Do not serve the HTML forms
    #[arg(long)]
    disable_site: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let frontends = Frontends {
        api: !args.disable_api,
        site: !args.disable_site,
    };
    if !frontends.any() {
        bail!("--disable-api and --disable-site cannot both be set");
    }

    let member_store: MemberStoreType = if args.in_memory {
        tracing::warn!("using in-memory member store, data will not persist");
        Arc::new(HashmapMemberStore::default())
    } else {
        let path = PathBuf::from(&args.db_dir).join(&args.db_file);
        Arc::new(RedbMemberStore::open(path)?)
    };

    let app_state = AppState::new(member_store);
    let address = format!("{}:{}", args.address, args.port);

    let app = Application::build(app_state, &address, frontends).await?;
    app.run().await?;

    Ok(())
}
