use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use cidr::{Ipv4Cidr, Ipv6Cidr};

use crate::config::{PRIVATE_IPV4_RANGES, PRIVATE_IPV6_RANGES};
use crate::core::error::IntelError;

/// A validated lookup subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Ip(IpAddr),
    Asn(u32),
}

impl Subject {
    /// Classify and validate one input string. Accepts IPv4/IPv6
    /// addresses and ASNs spelled AS15169, as15169 or 15169. Private
    /// and reserved addresses are rejected here, before any network
    /// call is made.
    pub fn parse(input: &str) -> Result<Subject, IntelError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IntelError::InvalidInput(input.to_string()));
        }

        if let Ok(ip) = trimmed.parse::<IpAddr>() {
            let routable = match ip {
                IpAddr::V4(v4) => !is_private_ipv4(v4),
                IpAddr::V6(v6) => !is_private_ipv6(v6),
            };
            if !routable {
                return Err(IntelError::InvalidInput(input.to_string()));
            }
            return Ok(Subject::Ip(ip));
        }

        if let Some(asn) = parse_asn(trimmed) {
            return Ok(Subject::Asn(asn));
        }

        Err(IntelError::InvalidInput(input.to_string()))
    }

    /// Canonical resource string for lookup services: the address
    /// itself for IPs, AS-prefixed for ASNs.
    pub fn resource(&self) -> String {
        match self {
            Subject::Ip(ip) => ip.to_string(),
            Subject::Asn(asn) => format!("AS{}", asn),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource())
    }
}

/// Parse an ASN with or without the AS prefix. Returns None for
/// anything that is not a plain decimal number after the prefix.
pub fn parse_asn(input: &str) -> Option<u32> {
    let digits = if input.len() > 2 && input[..2].eq_ignore_ascii_case("as") {
        &input[2..]
    } else {
        input
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    for range_str in PRIVATE_IPV4_RANGES {
        if let Ok(range) = range_str.parse::<Ipv4Cidr>() {
            if range.contains(&ip) {
                return true;
            }
        }
    }
    false
}

pub fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    for range_str in PRIVATE_IPV6_RANGES {
        if let Ok(range) = range_str.parse::<Ipv6Cidr>() {
            if range.contains(&ip) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(
            Subject::parse("8.8.8.8").unwrap(),
            Subject::Ip("8.8.8.8".parse().unwrap())
        );
    }

    #[test]
    fn test_parse_ipv6() {
        assert_eq!(
            Subject::parse("2001:4860:4860::8888").unwrap(),
            Subject::Ip("2001:4860:4860::8888".parse().unwrap())
        );
    }

    #[test]
    fn test_parse_asn_spellings() {
        assert_eq!(Subject::parse("AS15169").unwrap(), Subject::Asn(15169));
        assert_eq!(Subject::parse("as13335").unwrap(), Subject::Asn(13335));
        assert_eq!(Subject::parse("64512").unwrap(), Subject::Asn(64512));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Subject::parse("999.999.1.1").is_err());
        assert!(Subject::parse("not.an.ip").is_err());
        assert!(Subject::parse("").is_err());
        assert!(Subject::parse("AS").is_err());
        assert!(Subject::parse("AS12x").is_err());
    }

    #[test]
    fn test_rejects_private_addresses() {
        assert!(Subject::parse("10.1.2.3").is_err());
        assert!(Subject::parse("192.168.0.1").is_err());
        assert!(Subject::parse("127.0.0.1").is_err());
        assert!(Subject::parse("fe80::1").is_err());
    }

    #[test]
    fn test_resource_strings() {
        assert_eq!(Subject::parse("AS15169").unwrap().resource(), "AS15169");
        assert_eq!(Subject::parse("1.1.1.1").unwrap().resource(), "1.1.1.1");
    }
}
