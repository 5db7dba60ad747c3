use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use floor_model::{GatewayConfig, SchedulerConfig, StaffShift};
use floor_observe::LoggerConfig;

/// Path of the JSON configuration file.
pub const CONFIG_ENV: &str = "FLOOR_CONFIG";
/// Pinned station id, overriding `context.station_id`.
pub const STATION_ENV: &str = "FLOOR_STATION_ID";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub logger: LoggerConfig,
    pub scheduler: SchedulerConfig,
    pub gateway: GatewayConfig,
    pub context: ContextConfig,
    pub admin: AdminConfig,
    /// Staff shown on the floor board; the board task is off when empty.
    pub roster: Vec<StaffShift>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub station_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Listen address of the admin endpoints, e.g. `127.0.0.1:9090`. Disabled when unset.
    pub listen: Option<String>,
}

impl DashboardConfig {
    /// Load from `FLOOR_CONFIG` (defaults when unset) and apply `FLOOR_STATION_ID`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).ok();
        let station = std::env::var(STATION_ENV).ok();
        Self::from_sources(path.as_deref().map(Path::new), station.as_deref())
    }

    pub fn from_sources(path: Option<&Path>, station: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(raw) = station.map(str::trim).filter(|s| !s.is_empty()) {
            let id = raw
                .parse::<u64>()
                .with_context(|| format!("{STATION_ENV} must be a non-negative integer, got '{raw}'"))?;
            config.context.station_id = Some(id);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate().context("scheduler section")?;
        self.gateway.validate().context("gateway section")?;
        Ok(())
    }
}
