use std::net::Ipv4Addr;

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::time::{sleep, Duration};

use crate::api::{DnsApiClient, PublicIpResolver};
use crate::config::RecordTarget;

const POLL_INTERVAL: Duration = Duration::from_secs(120);

/// The update loop. Resolves the public IP on an interval and, when it moved,
/// pushes it into every configured record. Last-known IP and the first-pass
/// flag are the only state; both change only at the end of a pass that got a
/// fresh IP.
pub struct DdnsUpdater<R, C> {
    targets: Vec<RecordTarget>,
    resolver: R,
    dns: C,
    current_ip: Option<Ipv4Addr>,
    first: bool,
}

impl<R: PublicIpResolver, C: DnsApiClient + Sync> DdnsUpdater<R, C> {
    pub fn new(targets: Vec<RecordTarget>, resolver: R, dns: C) -> Self {
        Self {
            targets,
            resolver,
            dns,
            current_ip: None,
            first: true,
        }
    }

    /// Run forever. Only the very first IP lookup is allowed to kill the
    /// process: without a baseline there is nothing sensible to schedule.
    pub async fn run(&mut self) -> Result<()> {
        let baseline = self
            .resolver
            .resolve()
            .await
            .context("could not resolve the public IP on startup, is the network up?")?;

        info!("starting with public IP {baseline}");
        self.current_ip = Some(baseline);

        let mut first_pass = true;
        loop {
            if !first_pass {
                sleep(POLL_INTERVAL).await;
            }
            first_pass = false;
            self.iterate().await;
        }
    }

    /// One pass: resolve, debounce, synchronize. The first pass pushes
    /// unconditionally even when the IP matches the baseline, so the provider
    /// converges after a restart no matter what it currently holds.
    async fn iterate(&mut self) {
        let new_ip = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("could not resolve the public IP, skipping this pass: {e:#}");
                return;
            }
        };

        if !self.first && self.current_ip == Some(new_ip) {
            info!("public IP {new_ip} unchanged, nothing to do");
            return;
        }

        self.synchronize_all(new_ip).await;

        // Advance even if some records failed to update; a failed write is
        // only re-attempted once the IP moves again.
        self.current_ip = Some(new_ip);
        self.first = false;
    }

    /// Push `new_ip` to every target. Targets are independent, so a failure
    /// is logged and the remaining records are still attempted.
    async fn synchronize_all(&self, new_ip: Ipv4Addr) {
        for target in &self.targets {
            match self.dns.synchronize(target, new_ip).await {
                Ok(()) => info!("synchronized {} -> {new_ip}", target.record_name),
                Err(e) => error!("failed to synchronize {}: {e:#}", target.record_name),
            }
        }
    }
}
