//! IDSafe CLI - Main entry point

use clap::{Parser, Subcommand};
use idsafe_core::{ActorId, IdentityHash};
use idsafe_engine::EngineConfig;
use idsafe_rpc::{commands, AppContext};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "idsafe")]
#[command(about = "IDSafe - threshold-approved identity registry", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the registry with an admin, NGO set, and threshold
    Init {
        /// Administrator identifier
        #[arg(long)]
        admin: ActorId,
        /// Validator NGO identifier (repeatable)
        #[arg(long = "ngo", required = true)]
        ngos: Vec<ActorId>,
        /// Distinct approvals required for registration
        #[arg(long, default_value = "2")]
        threshold: u32,
    },

    /// Register a subject's identity (NGO-only)
    Register {
        /// Subject identifier
        subject: ActorId,
        /// Precomputed 32-byte hash, hex-encoded
        hash: Option<IdentityHash>,
        /// Raw identity data to digest with SHA-256 instead of a hash
        #[arg(long, conflicts_with = "hash")]
        data: Option<String>,
        /// Acting NGO
        #[arg(long = "as", value_name = "NGO")]
        caller: ActorId,
    },

    /// Approve a subject's current hash (NGO-only)
    Approve {
        /// Subject identifier
        subject: ActorId,
        /// Acting NGO
        #[arg(long = "as", value_name = "NGO")]
        caller: ActorId,
    },

    /// Replace a subject's stored hash (NGO-only; clears approvals)
    StoreHash {
        /// Subject identifier
        subject: ActorId,
        /// Precomputed 32-byte hash, hex-encoded
        hash: Option<IdentityHash>,
        /// Raw identity data to digest with SHA-256 instead of a hash
        #[arg(long, conflicts_with = "hash")]
        data: Option<String>,
        /// Acting NGO
        #[arg(long = "as", value_name = "NGO")]
        caller: ActorId,
    },

    /// Revoke a subject's registration (admin-only)
    Revoke {
        /// Subject identifier
        subject: ActorId,
        /// Acting admin
        #[arg(long = "as", value_name = "ADMIN")]
        caller: ActorId,
    },

    /// Show a subject's lifecycle status
    Status {
        /// Subject identifier
        subject: ActorId,
    },

    /// Print a subject's stored hash
    Hash {
        /// Subject identifier
        subject: ActorId,
    },

    /// Add a validator NGO (admin-only)
    AddNgo {
        /// NGO identifier
        id: ActorId,
        /// Acting admin
        #[arg(long = "as", value_name = "ADMIN")]
        caller: ActorId,
    },

    /// Remove a validator NGO (admin-only)
    RemoveNgo {
        /// NGO identifier
        id: ActorId,
        /// Acting admin
        #[arg(long = "as", value_name = "ADMIN")]
        caller: ActorId,
    },

    /// Transfer the administrator role (admin-only)
    ChangeAdmin {
        /// New administrator identifier
        new_admin: ActorId,
        /// Acting admin
        #[arg(long = "as", value_name = "ADMIN")]
        caller: ActorId,
    },

    /// Change the approval threshold (admin-only)
    ChangeThreshold {
        /// Distinct approvals required
        k: u32,
        /// Acting admin
        #[arg(long = "as", value_name = "ADMIN")]
        caller: ActorId,
    },

    /// List the admin, NGO set, and threshold
    Ngos,

    /// Print engine-wide counts
    Stats,

    /// Print the audit ledger
    Audit,
}

fn resolve_hash(
    hash: Option<IdentityHash>,
    data: Option<String>,
) -> Result<IdentityHash, anyhow::Error> {
    match (hash, data) {
        (Some(hash), _) => Ok(hash),
        (None, Some(data)) => Ok(IdentityHash::digest(data.as_bytes())),
        (None, None) => anyhow::bail!("Provide either a hex hash or --data"),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            admin,
            ngos,
            threshold,
        } => {
            let config = EngineConfig {
                admin,
                validators: ngos,
                required_approvals: threshold,
            };
            let ctx = AppContext::init(&cli.data, &config)?;
            println!("✅ Initialized registry at {}", ctx.data_dir().display());
            commands::ngos(&ctx)?;
        }

        Commands::Register {
            subject,
            hash,
            data,
            caller,
        } => {
            let hash = resolve_hash(hash, data)?;
            let mut ctx = AppContext::new(&cli.data)?;
            commands::register(&mut ctx, &caller, &subject, hash)?;
        }

        Commands::Approve { subject, caller } => {
            let mut ctx = AppContext::new(&cli.data)?;
            commands::approve(&mut ctx, &caller, &subject)?;
        }

        Commands::StoreHash {
            subject,
            hash,
            data,
            caller,
        } => {
            let hash = resolve_hash(hash, data)?;
            let mut ctx = AppContext::new(&cli.data)?;
            commands::store_hash(&mut ctx, &caller, &subject, hash)?;
        }

        Commands::Revoke { subject, caller } => {
            let mut ctx = AppContext::new(&cli.data)?;
            commands::revoke(&mut ctx, &caller, &subject)?;
        }

        Commands::Status { subject } => {
            let ctx = AppContext::new(&cli.data)?;
            commands::status(&ctx, &subject)?;
        }

        Commands::Hash { subject } => {
            let ctx = AppContext::new(&cli.data)?;
            commands::hash(&ctx, &subject)?;
        }

        Commands::AddNgo { id, caller } => {
            let mut ctx = AppContext::new(&cli.data)?;
            commands::add_ngo(&mut ctx, &caller, id)?;
        }

        Commands::RemoveNgo { id, caller } => {
            let mut ctx = AppContext::new(&cli.data)?;
            commands::remove_ngo(&mut ctx, &caller, &id)?;
        }

        Commands::ChangeAdmin { new_admin, caller } => {
            let mut ctx = AppContext::new(&cli.data)?;
            commands::change_admin(&mut ctx, &caller, new_admin)?;
        }

        Commands::ChangeThreshold { k, caller } => {
            let mut ctx = AppContext::new(&cli.data)?;
            commands::change_threshold(&mut ctx, &caller, k)?;
        }

        Commands::Ngos => {
            let ctx = AppContext::new(&cli.data)?;
            commands::ngos(&ctx)?;
        }

        Commands::Stats => {
            let ctx = AppContext::new(&cli.data)?;
            commands::stats(&ctx)?;
        }

        Commands::Audit => {
            let ctx = AppContext::new(&cli.data)?;
            commands::audit(&ctx)?;
        }
    }

    Ok(())
}
