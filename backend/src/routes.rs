use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Json,
    extract::{ConnectInfo, Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use common::{
    campus::Campus,
    search_query::SearchFacets,
    search_result::{CampusDetection, CourseSearchResults},
};

use crate::{
    api::{
        campus::{CampusParams, client_ip_from_headers, detect_campus},
        search::{PageParams, search_courses},
    },
    error::AppError,
    state::AppState,
};

pub async fn search_courses_handler(
    State(state): State<Arc<AppState>>,
    facets: Result<Query<SearchFacets>, QueryRejection>,
    paging: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<CourseSearchResults>, AppError> {
    let Query(facets) = facets.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Query(paging) = paging.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if paging.offset().is_none() {
        return Err(AppError::BadRequest(format!("Page number out of range: {}", paging.page)));
    }

    let results = search_courses(&state.folio, facets, paging.page)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(results))
}

pub async fn campus_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    params: Result<Query<CampusParams>, QueryRejection>,
) -> Result<Json<CampusDetection>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // explicit ?ip=, then proxy headers, then the TCP peer itself
    let client_ip = params
        .ip
        .clone()
        .filter(|ip| !ip.trim().is_empty())
        .or_else(|| {
            state
                .config
                .trust_forwarded_headers
                .then(|| client_ip_from_headers(&headers))
                .flatten()
        })
        .or_else(|| Some(peer_ip(&peer)));
    let current = params.current.clone().map(Campus::from).unwrap_or_default();
    let detected = detect_campus(
        &state.campus_map,
        &state.ip_lookup,
        params.college.as_deref(),
        client_ip.as_deref(),
        current,
    )
    .await;
    Ok(Json(detected))
}

/// Peer address as dotted quad when it is IPv4 or IPv4-mapped IPv6.
fn peer_ip(peer: &SocketAddr) -> String {
    match peer.ip() {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        },
        IpAddr::V4(v4) => v4.to_string(),
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}
