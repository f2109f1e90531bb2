use std::collections::BTreeSet;
use std::time::Duration;

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::aggregate::ResolvedRecord;
use crate::core::error::IntelError;
use crate::core::query::Subject;
use crate::services;
use crate::services::cymru::{self, CymruRecord};
use crate::services::ripe;
use crate::services::types::{AsOverviewResponse, PrefixOverviewResponse};

/// Lookup backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolverBackend {
    /// RIPEstat Data API over HTTPS
    Ripe,
    /// Team Cymru WHOIS over TCP port 43
    Cymru,
}

/// Issues exactly one lookup round trip per resolve call and builds a
/// normalized record from the reply. No retries, no caching; failures
/// surface immediately to the caller.
pub struct Resolver {
    backend: ResolverBackend,
    http: reqwest::blocking::Client,
    timeout: Duration,
}

impl Resolver {
    pub fn new(backend: ResolverBackend, timeout: Duration) -> Result<Self, IntelError> {
        let http = services::http_client(timeout)
            .map_err(|e| IntelError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Resolver { backend, http, timeout })
    }

    pub fn resolve(&self, subject: &Subject) -> Result<ResolvedRecord, IntelError> {
        debug!("Resolving {} via {:?}", subject, self.backend);
        match self.backend {
            ResolverBackend::Ripe => self.resolve_ripe(subject),
            ResolverBackend::Cymru => self.resolve_cymru(subject),
        }
    }

    fn resolve_ripe(&self, subject: &Subject) -> Result<ResolvedRecord, IntelError> {
        let resource = subject.resource();
        match subject {
            Subject::Ip(_) => {
                let response = ripe::prefix_overview(&self.http, &resource)
                    .map_err(|e| IntelError::lookup_failed(&resource, e))?;
                record_from_prefix_overview(&resource, response)
            }
            Subject::Asn(asn) => {
                let response = ripe::as_overview(&self.http, &resource)
                    .map_err(|e| IntelError::lookup_failed(&resource, e))?;
                record_from_as_overview(*asn, response)
            }
        }
    }

    fn resolve_cymru(&self, subject: &Subject) -> Result<ResolvedRecord, IntelError> {
        let resource = subject.resource();
        let record = cymru::lookup(&resource, self.timeout)
            .map_err(|e| IntelError::lookup_failed(&resource, e))?;
        record_from_cymru(&resource, record)
    }

    /// Fetch the prefixes currently announced by an ASN.
    pub fn announced_prefixes(&self, asn: u32) -> Result<Vec<String>, IntelError> {
        let resource = format!("AS{}", asn);
        let response = ripe::announced_prefixes(&self.http, &resource)
            .map_err(|e| IntelError::lookup_failed(&resource, e))?;
        let prefixes = response
            .data
            .and_then(|data| data.prefixes)
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.prefix)
            .collect();
        Ok(prefixes)
    }

    pub fn http(&self) -> &reqwest::blocking::Client {
        &self.http
    }
}

/// Registration country inferred from the trailing ", CC" of a
/// RIPEstat holder string.
pub fn holder_country(holder: &str) -> Option<String> {
    static COUNTRY_TAIL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r",\s*([A-Z]{2})\s*$").unwrap());
    COUNTRY_TAIL_RE
        .captures(holder)
        .map(|captures| captures[1].to_string())
}

fn record_from_prefix_overview(
    resource: &str,
    response: PrefixOverviewResponse,
) -> Result<ResolvedRecord, IntelError> {
    let data = response
        .data
        .ok_or_else(|| IntelError::lookup_failed(resource, "reply carries no data"))?;

    // An IP with no origin ASN cannot be aggregated; fail closed
    // instead of emitting a keyless record.
    let origin = data
        .asns
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| IntelError::lookup_failed(resource, "no origin ASN in reply"))?;

    let mut prefixes = BTreeSet::new();
    if let Some(prefix) = data.resource.filter(|r| r.contains('/')) {
        prefixes.insert(prefix);
    }

    Ok(ResolvedRecord {
        subject: resource.to_string(),
        asn: Some(origin.asn),
        country: origin.holder.as_deref().and_then(holder_country),
        holder: origin.holder,
        prefixes,
    })
}

fn record_from_as_overview(
    asn: u32,
    response: AsOverviewResponse,
) -> Result<ResolvedRecord, IntelError> {
    let resource = format!("AS{}", asn);
    let data = response
        .data
        .ok_or_else(|| IntelError::lookup_failed(&resource, "reply carries no data"))?;

    Ok(ResolvedRecord {
        subject: resource,
        asn: Some(asn),
        country: data.holder.as_deref().and_then(holder_country),
        holder: data.holder,
        prefixes: BTreeSet::new(),
    })
}

fn record_from_cymru(resource: &str, record: CymruRecord) -> Result<ResolvedRecord, IntelError> {
    let asn = record
        .asn
        .ok_or_else(|| IntelError::lookup_failed(resource, "no origin ASN in reply"))?;

    Ok(ResolvedRecord {
        subject: resource.to_string(),
        asn: Some(asn),
        holder: record.as_name,
        country: record.country_code,
        prefixes: record.bgp_prefix.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::types::{AsOverviewData, PrefixOrigin, PrefixOverviewData};

    #[test]
    fn test_holder_country_tail() {
        assert_eq!(holder_country("GOOGLE - Google LLC, US").as_deref(), Some("US"));
        assert_eq!(holder_country("EXAMPLE-AS, DE ").as_deref(), Some("DE"));
        assert_eq!(holder_country("NO-TAIL HOLDING"), None);
        assert_eq!(holder_country(""), None);
    }

    #[test]
    fn test_record_from_prefix_overview() {
        let response = PrefixOverviewResponse {
            data: Some(PrefixOverviewData {
                resource: Some("8.8.8.0/24".to_string()),
                asns: Some(vec![PrefixOrigin {
                    asn: 15169,
                    holder: Some("GOOGLE - Google LLC, US".to_string()),
                }]),
                announced: Some(true),
            }),
            status: "ok".to_string(),
            messages: None,
        };
        let record = record_from_prefix_overview("8.8.8.8", response).unwrap();
        assert_eq!(record.asn, Some(15169));
        assert_eq!(record.country.as_deref(), Some("US"));
        assert!(record.prefixes.contains("8.8.8.0/24"));
    }

    #[test]
    fn test_prefix_overview_without_origin_fails_closed() {
        let response = PrefixOverviewResponse {
            data: Some(PrefixOverviewData {
                resource: Some("192.0.0.0/8".to_string()),
                asns: Some(vec![]),
                announced: Some(false),
            }),
            status: "ok".to_string(),
            messages: None,
        };
        assert!(matches!(
            record_from_prefix_overview("192.0.0.1", response),
            Err(IntelError::LookupFailed { .. })
        ));
    }

    #[test]
    fn test_record_from_as_overview() {
        let response = AsOverviewResponse {
            data: Some(AsOverviewData {
                holder: Some("CLOUDFLARENET, US".to_string()),
                announced: Some(true),
                resource: Some("13335".to_string()),
            }),
            status: "ok".to_string(),
            messages: None,
        };
        let record = record_from_as_overview(13335, response).unwrap();
        assert_eq!(record.subject, "AS13335");
        assert_eq!(record.asn, Some(13335));
        assert_eq!(record.country.as_deref(), Some("US"));
        assert!(record.prefixes.is_empty());
    }

    #[test]
    fn test_record_from_cymru() {
        let cymru = CymruRecord {
            asn: Some(15169),
            bgp_prefix: Some("8.8.8.0/24".to_string()),
            country_code: Some("US".to_string()),
            as_name: Some("GOOGLE, US".to_string()),
        };
        let record = record_from_cymru("8.8.8.8", cymru).unwrap();
        assert_eq!(record.asn, Some(15169));
        assert!(record.prefixes.contains("8.8.8.0/24"));

        let empty = CymruRecord { asn: None, bgp_prefix: None, country_code: None, as_name: None };
        assert!(record_from_cymru("8.8.8.8", empty).is_err());
    }
}
