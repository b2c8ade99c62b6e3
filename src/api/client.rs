use std::net::Ipv4Addr;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::config::RecordTarget;

/// Source of the caller's current public IPv4 address.
///
/// Every failure mode (network error, bad status, malformed body) collapses
/// into one opaque `Err`; callers only decide whether to skip or abort.
#[async_trait]
pub trait PublicIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr>;
}

/// Lookup and overwrite of a single provider DNS record.
#[async_trait]
pub trait DnsApiClient {
    /// Find the provider-assigned id of the A record named in `target`.
    /// `Ok(None)` means the zone has no such record, which is not an error
    /// at this level.
    async fn find_record_id(&self, target: &RecordTarget) -> Result<Option<String>>;

    /// Overwrite the record's address with `new_ip`. No internal retry.
    async fn update_record(
        &self,
        target: &RecordTarget,
        record_id: &str,
        new_ip: Ipv4Addr,
    ) -> Result<()>;

    /// Look the record up, then overwrite it. The id is re-resolved on every
    /// call: if the record was deleted and recreated on the provider side, a
    /// cached id would keep failing silently.
    async fn synchronize(&self, target: &RecordTarget, new_ip: Ipv4Addr) -> Result<()> {
        let record_id = self
            .find_record_id(target)
            .await
            .with_context(|| format!("could not look up the record id for {}", target.record_name))?
            .ok_or_else(|| {
                anyhow!(
                    "no A record named {} exists in zone {}",
                    target.record_name,
                    target.zone_id
                )
            })?;

        self.update_record(target, &record_id, new_ip)
            .await
            .with_context(|| format!("could not update the record {}", target.record_name))
    }
}
