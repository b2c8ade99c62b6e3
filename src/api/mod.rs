pub mod client;
pub mod cloudflare;
pub mod ipify;
pub mod models;

pub use client::{DnsApiClient, PublicIpResolver};
pub use cloudflare::CloudflareClient;
pub use ipify::IpifyResolver;

/// Hard cap on every outbound request. The upstream services give no latency
/// guarantee and a hung call would otherwise stall the update loop forever.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
