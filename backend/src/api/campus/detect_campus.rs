use axum::http::HeaderMap;
use common::{
    campus::{Campus, CampusMap},
    search_result::{CampusDetection, CampusSource},
};
use tracing::{debug, warn};

use crate::http_utils::ip_lookup::IpLookup;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const REAL_IP_HEADER: &str = "x-real-ip";

/// Decides which campus to present.
///
/// An explicit `college_override` wins outright and no lookup is made. A
/// `client_ip` already known to the server is resolved locally. Only then is
/// `lookup` called, and any failure there keeps `current`.
pub async fn detect_campus<L: IpLookup>(
    campus_map: &CampusMap,
    lookup: &L,
    college_override: Option<&str>,
    client_ip: Option<&str>,
    current: Campus,
) -> CampusDetection {
    if let Some(college) = non_blank(college_override) {
        debug!("campus from override: {college}");
        return CampusDetection {
            college: Campus::from(college.to_string()),
            source: CampusSource::Override,
        };
    }

    if let Some(ip) = non_blank(client_ip) {
        let college = campus_map.resolve_college(ip);
        debug!("campus from client ip {ip}: {college}");
        return CampusDetection { college, source: CampusSource::ClientIp };
    }

    match lookup.lookup_ip().await {
        Ok(ip) => {
            let college = campus_map.resolve_college(&ip);
            debug!("campus from ip lookup {ip}: {college}");
            CampusDetection { college, source: CampusSource::Lookup }
        }
        Err(e) => {
            warn!("IP lookup failed, keeping campus {current}: {e:#}");
            CampusDetection { college: current, source: CampusSource::Fallback }
        }
    }
}

/// First address of `X-Forwarded-For`, else `X-Real-IP`.
///
/// Any client can send these headers, so they are only consulted when the
/// service sits behind a proxy that overwrites them (see
/// `Config::trust_forwarded_headers`).
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get(REAL_IP_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded.or_else(real_ip).map(str::to_string)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
