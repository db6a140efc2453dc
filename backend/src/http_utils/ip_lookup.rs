//! Public "what is my IP" lookup.

use std::future::Future;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Finds the public address of the visitor.
pub trait IpLookup {
    fn lookup_ip(&self) -> impl Future<Output = anyhow::Result<String>> + Send;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IpLookupResponse {
    pub ip: String,
}

/// Calls a JSON endpoint answering `{"ip": "a.b.c.d"}`. Requests are
/// bounded by the configured timeout; expiry is reported as an error.
#[derive(Debug, Clone)]
pub struct PublicIpLookup {
    client: reqwest::Client,
    url: String,
}

impl PublicIpLookup {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.ip_lookup_timeout).build()?;
        Ok(Self { client, url: config.ip_lookup_url.clone() })
    }
}

impl IpLookup for PublicIpLookup {
    async fn lookup_ip(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("IP lookup request to {} failed", self.url))?
            .error_for_status()?;
        let body: IpLookupResponse = response.json().await.context("IP lookup returned an unexpected body")?;
        Ok(body.ip)
    }
}
