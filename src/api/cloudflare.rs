use std::net::Ipv4Addr;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{error, info};
use serde_json::json;

use super::client::DnsApiClient;
use super::models::{ApiDnsRecord, ApiResponse};
use crate::config::RecordTarget;

/// TTL written on every update, in seconds. Kept short so a pushed change
/// propagates quickly after the IP moves.
pub const RECORD_TTL: u32 = 120;

pub struct CloudflareClient {
    client: reqwest::Client,
}

impl CloudflareClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(super::REQUEST_TIMEOUT)
            .build()
            .context("failed to build the HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DnsApiClient for CloudflareClient {
    async fn find_record_id(&self, target: &RecordTarget) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!(
                "{}/zones/{}/dns_records",
                target.api_url, target.zone_id
            ))
            .query(&[("type", "A"), ("name", target.record_name.as_str())])
            .bearer_auth(&target.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .with_context(|| format!("failed to list DNS records for {}", target.record_name))?;

        let text = response.text().await?;
        let parsed: ApiResponse<Vec<ApiDnsRecord>> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("failed to parse record list: {}. Response: {}", e, text))?;

        if !parsed.success {
            return Err(anyhow!("record lookup rejected: {:?}", parsed.errors));
        }

        // The name filter is exact, but the API still answers with a list;
        // first entry wins if there is somehow more than one.
        let record_id = parsed
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|record| record.id);

        if record_id.is_none() {
            error!("DNS record not found for {}", target.record_name);
        }

        Ok(record_id)
    }

    async fn update_record(
        &self,
        target: &RecordTarget,
        record_id: &str,
        new_ip: Ipv4Addr,
    ) -> Result<()> {
        let response = self
            .client
            .put(format!(
                "{}/zones/{}/dns_records/{}",
                target.api_url, target.zone_id, record_id
            ))
            .bearer_auth(&target.api_token)
            .header("Content-Type", "application/json")
            .json(&json!({
                "type": "A",
                "name": target.record_name,
                "content": new_ip.to_string(),
                "ttl": RECORD_TTL,
                "proxied": target.proxied,
            }))
            .send()
            .await
            .with_context(|| format!("failed to send the update for {}", target.record_name))?;

        let text = response.text().await?;
        let parsed: ApiResponse<ApiDnsRecord> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("failed to parse update response: {}. Response: {}", e, text))?;

        if !parsed.success {
            return Err(anyhow!(
                "update of {} rejected: {:?}",
                target.record_name,
                parsed.errors
            ));
        }

        info!("DNS record updated: {} -> {}", target.record_name, new_ip);
        Ok(())
    }
}
