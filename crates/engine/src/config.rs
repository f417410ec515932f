//! Engine configuration - the genesis seed
//!
//! The config names the initial administrator, validator set, and
//! threshold. It is only consulted when the store holds no governance
//! checkpoint yet; after the first mutation, the checkpoint wins.

use idsafe_core::ActorId;
use serde::{Deserialize, Serialize};

/// Seed configuration for a fresh deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial administrator
    pub admin: ActorId,

    /// Initial validator (NGO) set
    pub validators: Vec<ActorId>,

    /// Distinct approvals required for registration
    #[serde(default = "default_required_approvals")]
    pub required_approvals: u32,
}

fn default_required_approvals() -> u32 {
    2
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
