pub mod bgpview;
pub mod cymru;
pub mod ripe;
pub mod types;

use std::time::Duration;

use anyhow::Result;

/// Build the one blocking HTTP client a run shares across requests.
pub fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
    Ok(client)
}
