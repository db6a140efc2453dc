//! Campus detection API.

mod detect_campus;
pub use detect_campus::{client_ip_from_headers, detect_campus};

use serde::{Deserialize, Serialize};

/// Query parameters accepted by the campus endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CampusParams {
    pub college: Option<String>,
    pub ip: Option<String>,
    pub current: Option<String>,
}
