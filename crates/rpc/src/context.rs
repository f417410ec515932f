//! Application context - wires everything together

use idsafe_engine::{ApprovalEngine, EngineConfig};
use std::path::{Path, PathBuf};

/// Application context - the engine plus its data directory
pub struct AppContext {
    pub engine: ApprovalEngine,
    data_dir: PathBuf,
}

impl AppContext {
    /// Initialize a fresh data directory with the given seed config.
    ///
    /// Fails if the directory was already initialized; re-running init
    /// must never silently reset governance.
    pub fn init(data_dir: impl AsRef<Path>, config: &EngineConfig) -> Result<Self, anyhow::Error> {
        let data_dir = data_dir.as_ref();
        let config_path = data_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!("Already initialized: {} exists", config_path.display());
        }

        std::fs::create_dir_all(data_dir)?;
        std::fs::write(&config_path, serde_json::to_string_pretty(config)?)?;

        let engine = ApprovalEngine::open(data_dir, config)?;
        Ok(Self {
            engine,
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// Open an initialized data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let data_dir = data_dir.as_ref();
        let config_path = data_dir.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "No configuration at {}; run `idsafe init` first",
                config_path.display()
            );
        }

        let config = EngineConfig::from_file(&config_path)?;
        let engine = ApprovalEngine::open(data_dir, &config)?;
        Ok(Self {
            engine,
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// The data directory this context operates on
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
