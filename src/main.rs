mod access;
mod api;
mod audit;
mod cli;
mod config;
mod guard;
mod menu;
mod screens;
mod session;
mod state;
mod store;
mod validate;

use anyhow::Result;
use clap::Parser;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taller", about = "Sistema de gestión para taller mecánico")]
pub struct Args {
    #[arg(short = 'c', long, help = "Run a single command and exit")]
    pub command: Option<String>,

    #[arg(
        long,
        env = "TALLER_API_URL",
        help = "Backend base URL (overrides config)"
    )]
    pub api_url: Option<String>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "TALLER_DATA_DIR",
        help = "Data directory for session storage and the audit log"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Accounts file (defaults to <data-dir>/accounts.toml)")]
    pub accounts: Option<PathBuf>,

    #[arg(long, help = "Debug output")]
    pub debug: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load configuration, then apply CLI/env overrides
    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_default()
    };

    if let Some(api_url) = &args.api_url {
        cfg.api.base_url = api_url.clone();
    }
    if let Some(data_dir) = &args.data_dir {
        cfg.storage.data_dir = Some(data_dir.clone());
    }

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error: {}", error);
        }
        return Err(anyhow::anyhow!("invalid configuration"));
    }

    let data_dir = cfg.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let store = store::Store::open(&data_dir.join("storage"))?;
    let accounts_path = args
        .accounts
        .clone()
        .unwrap_or_else(|| data_dir.join("accounts.toml"));
    let accounts = session::AccountStore::load(&accounts_path);

    let session_id = uuid::Uuid::new_v4().to_string();
    let audit_path = data_dir.join("audit").join(format!("{}.jsonl", session_id));
    let mut audit = audit::AuditLog::new(&audit_path, &session_id)?;

    // Reconstruct the previous session before anything renders
    let mut session = session::SessionState::new();
    match session.restore(&store) {
        session::RestoreOutcome::Restored => {
            if let Some(user) = session.current_user() {
                let _ = audit.session_restored(&user.email);
            }
        }
        session::RestoreOutcome::Discarded => {
            let _ = audit.session_discarded();
        }
        session::RestoreOutcome::NoSession => {}
    }

    if args.debug {
        eprintln!("[DEBUG] API base URL: {}", cfg.api.base_url);
        eprintln!("[DEBUG] Data dir: {}", data_dir.display());
        eprintln!(
            "[DEBUG] Accounts: {} ({} cuentas)",
            accounts_path.display(),
            accounts.accounts.len()
        );
    }

    let api = api::Client::new(&cfg.api.base_url, cfg.api.timeout_ms);
    let current_view = if session.is_authenticated() {
        Some(access::Tab::Inicio)
    } else {
        None
    };

    let ctx = cli::Context {
        config: cfg,
        debug: args.debug,
        session_id,
        store,
        accounts,
        session: RefCell::new(session),
        api: Box::new(api),
        audit: RefCell::new(audit),
        state: RefCell::new(state::ShopState::seed()),
        current_view: Cell::new(current_view),
        pending_login_redirect: Cell::new(false),
    };

    if let Some(command) = &args.command {
        cli::run_once(&ctx, command)
    } else {
        cli::run_repl(ctx)
    }
}
