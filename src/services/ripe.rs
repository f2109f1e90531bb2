use anyhow::{Result, anyhow};
use tracing::debug;

use crate::config::{
    RIPE_ANNOUNCED_PREFIXES_URL, RIPE_AS_OVERVIEW_URL, RIPE_PREFIX_OVERVIEW_URL,
    RIPE_RPKI_VALIDATION_URL, USER_AGENT,
};
use crate::services::types::{
    AnnouncedPrefixesResponse, AsOverviewResponse, PrefixOverviewResponse, RpkiValidationResponse,
};

/// Query the RIPEstat prefix-overview endpoint for an IP or prefix.
pub fn prefix_overview(
    client: &reqwest::blocking::Client,
    resource: &str,
) -> Result<PrefixOverviewResponse> {
    let url = format!(
        "{}?resource={}",
        RIPE_PREFIX_OVERVIEW_URL,
        urlencoding::encode(resource)
    );
    debug!("RIPEstat prefix-overview URL: {}", url);

    let response = client.get(&url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(anyhow!("RIPEstat HTTP error: {}", response.status()));
    }

    let json_response: PrefixOverviewResponse = response.json()?;

    if json_response.status != "ok" {
        return Err(anyhow!("RIPEstat error: status={}", json_response.status));
    }

    Ok(json_response)
}

/// Query the RIPEstat as-overview endpoint for an ASN.
pub fn as_overview(client: &reqwest::blocking::Client, asn: &str) -> Result<AsOverviewResponse> {
    let url = format!(
        "{}?resource={}",
        RIPE_AS_OVERVIEW_URL,
        urlencoding::encode(asn)
    );
    debug!("RIPEstat as-overview URL: {}", url);

    let response = client.get(&url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(anyhow!("RIPEstat HTTP error: {}", response.status()));
    }

    let json_response: AsOverviewResponse = response.json()?;

    if json_response.status != "ok" {
        return Err(anyhow!("RIPEstat error: status={}", json_response.status));
    }

    Ok(json_response)
}

/// Query the RIPEstat announced-prefixes endpoint for an ASN.
pub fn announced_prefixes(
    client: &reqwest::blocking::Client,
    asn: &str,
) -> Result<AnnouncedPrefixesResponse> {
    let url = format!(
        "{}?resource={}",
        RIPE_ANNOUNCED_PREFIXES_URL,
        urlencoding::encode(asn)
    );
    debug!("RIPEstat announced-prefixes URL: {}", url);

    let response = client.get(&url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(anyhow!("RIPEstat HTTP error: {}", response.status()));
    }

    let json_response: AnnouncedPrefixesResponse = response.json()?;

    if json_response.status != "ok" {
        return Err(anyhow!("RIPEstat error: status={}", json_response.status));
    }

    Ok(json_response)
}

/// Query the RIPEstat rpki-validation endpoint for a prefix/ASN pair.
/// The endpoint wants both the prefix and the origin ASN as resource.
pub fn rpki_validation(
    client: &reqwest::blocking::Client,
    prefix: &str,
    asn: &str,
) -> Result<RpkiValidationResponse> {
    let url = format!(
        "{}?resource={}&prefix={}",
        RIPE_RPKI_VALIDATION_URL,
        urlencoding::encode(asn),
        urlencoding::encode(prefix)
    );
    debug!("RIPEstat rpki-validation URL: {}", url);

    let response = client.get(&url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(anyhow!("RIPEstat HTTP error: {}", response.status()));
    }

    let json_response: RpkiValidationResponse = response.json()?;

    if json_response.status != "ok" {
        return Err(anyhow!("RIPEstat error: status={}", json_response.status));
    }

    Ok(json_response)
}
