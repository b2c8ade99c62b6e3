mod api;
mod config;
mod ddns;

use anyhow::Result;
use api::{CloudflareClient, IpifyResolver};
use config::Config;
use ddns::DdnsUpdater;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Missing configuration and a failed first IP lookup both bubble out of
    // here, so the process exits non-zero before any update is attempted.
    let config = Config::from_env()?;

    let mut ddns = DdnsUpdater::new(config.targets, IpifyResolver::new()?, CloudflareClient::new()?);
    ddns.run().await
}
