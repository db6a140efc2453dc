use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;

pub const OKAPI_TENANT_HEADER: &str = "X-Okapi-Tenant";
pub const OKAPI_TOKEN_HEADER: &str = "X-Okapi-Token";

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCourseCollection {
    #[serde(default)]
    pub courses: Vec<RawCourse>,
    #[serde(default)]
    pub total_records: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawCourse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub course_number: Option<String>,
    pub section_name: Option<String>,
    pub department_object: Option<RawNamedObject>,
    pub course_listing_object: Option<RawCourseListing>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCourseListing {
    pub registrar_id: Option<String>,
    pub term_object: Option<RawNamedObject>,
    #[serde(default)]
    pub instructor_objects: Vec<RawNamedObject>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawNamedObject {
    pub name: String,
}


/// Course search client for a FOLIO tenant behind Okapi.
#[derive(Debug, Clone)]
pub struct FolioClient {
    client: reqwest::Client,
    courses_url: String,
    tenant: String,
    token: Option<String>,
}

impl FolioClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.folio_timeout).build()?;
        Ok(Self {
            client,
            courses_url: config.folio_courses_url(),
            tenant: config.folio_tenant.clone(),
            token: config.folio_token.clone(),
        })
    }

    pub async fn search_courses(&self, cql: &str, limit: u64, offset: u64) -> anyhow::Result<RawCourseCollection> {
        let t0 = std::time::Instant::now();
        info!("FOLIO course search: {cql} (limit={limit} offset={offset})");

        let mut request = self
            .client
            .get(&self.courses_url)
            .query(&[("query", cql.to_string()), ("limit", limit.to_string()), ("offset", offset.to_string())])
            .header(OKAPI_TENANT_HEADER, &self.tenant)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(OKAPI_TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_txt = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("Error: {}: {}", status, response_txt);
        }
        let dt_ms = t0.elapsed().as_millis();
        debug!("FOLIO response: len = {} ({}ms)", response_txt.len(), dt_ms);

        let response: RawCourseCollection = serde_json::from_str(&response_txt)?;
        Ok(response)
    }
}
