/*
 * BGP-Intel: BGP and ASN intelligence toolkit
 * Copyright (C) 2025 BGP-Intel Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

use std::net::Ipv4Addr;

use cidr::Ipv4Cidr;
use rand::Rng;

use crate::core::error::IntelError;
use crate::core::query::is_private_ipv4;

/// Generate test addresses: uniform over globally routable IPv4 space,
/// or host addresses within one prefix when given.
pub fn generate(count: u32, prefix: Option<&str>) -> Result<Vec<Ipv4Addr>, IntelError> {
    let parsed = prefix
        .map(|p| {
            p.parse::<Ipv4Cidr>()
                .map_err(|_| IntelError::InvalidInput(p.to_string()))
        })
        .transpose()?;

    let mut rng = rand::thread_rng();
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let address = match &parsed {
            Some(cidr) => random_in_prefix(cidr, &mut rng),
            None => random_global_unicast(&mut rng),
        };
        out.push(address);
    }
    Ok(out)
}

/// Draw until the candidate is globally routable unicast.
pub fn random_global_unicast(rng: &mut impl Rng) -> Ipv4Addr {
    loop {
        let candidate = Ipv4Addr::from(rng.next_u32());
        if is_global_unicast(candidate) {
            return candidate;
        }
    }
}

/// Host address within a prefix. Network and broadcast addresses are
/// excluded for prefixes shorter than /31.
pub fn random_in_prefix(cidr: &Ipv4Cidr, rng: &mut impl Rng) -> Ipv4Addr {
    if cidr.network_length() >= 31 {
        return cidr.first_address();
    }

    let first_host = u32::from(cidr.first_address()) + 1;
    let last_host = u32::from(cidr.last_address()) - 1;
    Ipv4Addr::from(rng.gen_range(first_host..=last_host))
}

fn is_global_unicast(ip: Ipv4Addr) -> bool {
    let first_octet = ip.octets()[0];
    // 0.0.0.0/8 plus multicast and reserved space above 224.0.0.0
    if first_octet == 0 || first_octet >= 224 {
        return false;
    }
    !is_private_ipv4(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_count() {
        let addresses = generate(5, None).unwrap();
        assert_eq!(addresses.len(), 5);
    }

    #[test]
    fn test_generated_addresses_are_globally_routable() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let address = random_global_unicast(&mut rng);
            assert!(is_global_unicast(address), "{} is not routable", address);
            assert!(!is_private_ipv4(address));
        }
    }

    #[test]
    fn test_in_prefix_draws_stay_inside_host_range() {
        let cidr: Ipv4Cidr = "198.18.0.0/24".parse().unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let address = random_in_prefix(&cidr, &mut rng);
            assert!(cidr.contains(&address));
            assert_ne!(address, cidr.first_address());
            assert_ne!(address, cidr.last_address());
        }
    }

    #[test]
    fn test_tiny_prefixes_return_network_address() {
        let mut rng = rand::thread_rng();
        let single: Ipv4Cidr = "203.0.113.1/32".parse().unwrap();
        assert_eq!(random_in_prefix(&single, &mut rng), "203.0.113.1".parse::<Ipv4Addr>().unwrap());

        let pair: Ipv4Cidr = "203.0.113.0/31".parse().unwrap();
        assert_eq!(random_in_prefix(&pair, &mut rng), "203.0.113.0".parse::<Ipv4Addr>().unwrap());
    }

    #[test]
    fn test_bad_prefix_is_invalid_input() {
        assert!(matches!(
            generate(1, Some("not-a-prefix")),
            Err(IntelError::InvalidInput(_))
        ));
    }
}
