//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use nexus_core::error::{NexusError, Result};

pub use schema::{FeedConfig, GatewaySection, NexusConfig, SimulationSection};

pub fn load_from_file(path: &str) -> Result<NexusConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| NexusError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<NexusConfig> {
    let cfg: NexusConfig = serde_yaml::from_str(s)
        .map_err(|e| NexusError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
