use std::collections::BTreeSet;

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::config::{BGPVIEW_PREFIX_URL, USER_AGENT};
use crate::services::types::BgpViewPrefixResponse;

/// Fetch the origin ASNs currently observed for a prefix from BGPView.
/// Returns an empty set when the reply carries no origin data at all.
pub fn prefix_origins(
    client: &reqwest::blocking::Client,
    prefix: &str,
) -> Result<BTreeSet<u32>> {
    let url = format!("{}/{}", BGPVIEW_PREFIX_URL, urlencoding::encode(prefix));
    debug!("BGPView prefix URL: {}", url);

    let response = client.get(&url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(anyhow!("BGPView HTTP error: {}", response.status()));
    }

    let body: BgpViewPrefixResponse = response.json()?;

    let mut origins = BTreeSet::new();
    if let Some(data) = body.data {
        for origin in data.asns.unwrap_or_default() {
            if let Some(asn) = origin.asn {
                origins.insert(asn);
            }
        }

        // Fallback shape: a bare top-level asn value
        if origins.is_empty() {
            if let Some(value) = data.asn.as_ref().and_then(|v| v.as_u64()) {
                origins.insert(value as u32);
            }
        }
    }

    Ok(origins)
}
