use std::sync::Arc;

use anyhow::Context;
use common::campus::{CampusMap, CidrEntry};
use tracing::info;

use crate::{
    config::Config,
    http_utils::{folio_utils::FolioClient, ip_lookup::PublicIpLookup},
};

pub struct AppState {
    pub config: Config,
    pub campus_map: CampusMap,
    pub folio: FolioClient,
    pub ip_lookup: PublicIpLookup,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let campus_map = load_campus_map(&config)?;
        let folio = FolioClient::new(&config)?;
        let ip_lookup = PublicIpLookup::new(&config)?;

        Ok(Arc::new(Self {
            config,
            campus_map,
            folio,
            ip_lookup,
        }))
    }
}

fn load_campus_map(config: &Config) -> anyhow::Result<CampusMap> {
    let Some(path) = &config.campus_ranges_file else {
        info!("Using built-in campus table");
        return Ok(CampusMap::consortium());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read campus table {}", path.display()))?;
    let entries: Vec<CidrEntry> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse campus table {}", path.display()))?;
    let campus_map = CampusMap::from_entries(&entries)
        .with_context(|| format!("Invalid campus table {}", path.display()))?;
    info!("Loaded {} campus ranges from {}", campus_map.ranges().len(), path.display());
    Ok(campus_map)
}
