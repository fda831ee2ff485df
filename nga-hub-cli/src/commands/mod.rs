pub mod datasets;
pub mod url;

use anyhow::{Context, Result};
use nga_hub::{HubClient, HubClientBuilder, TimeZoneMode};
use std::time::Duration;

/// Client settings given on the command line.
pub struct ClientOptions {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub local_time: bool,
}

/// Build the catalog client, letting command-line options override the environment.
pub fn build_client(options: ClientOptions) -> Result<HubClient> {
    let mut builder = HubClientBuilder::from_env();

    if let Some(base_url) = options.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(secs) = options.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if options.local_time {
        builder = builder.time_zone(TimeZoneMode::Local);
    }

    builder.build().context("Failed to create catalog client")
}
