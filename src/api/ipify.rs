use std::net::Ipv4Addr;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use super::client::PublicIpResolver;
use super::models::IpResponse;

// ipify seems to be the service with the least restrictions.
const IP_ENDPOINT: &str = "https://api.ipify.org?format=json";

pub struct IpifyResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl IpifyResolver {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(IP_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(super::REQUEST_TIMEOUT)
            .build()
            .context("failed to build the HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PublicIpResolver for IpifyResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .context("public IP lookup failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("public IP lookup returned {}", response.status()));
        }

        let body: IpResponse = response
            .json()
            .await
            .context("public IP lookup returned an unexpected body")?;

        Ipv4Addr::from_str(&body.ip)
            .with_context(|| format!("public IP lookup returned a malformed address: {}", body.ip))
    }
}
