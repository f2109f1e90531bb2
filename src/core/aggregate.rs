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

use std::collections::{BTreeSet, HashMap};

use cidr::{Ipv4Cidr, Ipv6Cidr};
use clap::ValueEnum;
use serde::Serialize;

/// Normalized result of one successful lookup. Constructed once by the
/// resolver and discarded after aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRecord {
    pub subject: String,
    pub asn: Option<u32>,
    pub holder: Option<String>,
    pub country: Option<String>,
    pub prefixes: BTreeSet<String>,
}

impl ResolvedRecord {
    /// Length of the covering prefix when one was returned.
    pub fn covering_prefix_length(&self) -> Option<u8> {
        self.prefixes.iter().next().and_then(|p| prefix_length(p))
    }
}

/// One row of a distribution. Ordering is derived at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateEntry {
    pub key: u64,
    pub count: u64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// Count records per origin ASN
    Asn,
    /// Count records per covering-prefix length
    PrefixLength,
}

/// Build the frequency distribution of a batch run. Entries are sorted
/// by count descending; equal counts order by ascending key. Records
/// that carry no value for the grouping key are skipped. For ASN
/// grouping the label is the first holder name observed for that ASN.
pub fn aggregate(records: &[ResolvedRecord], by: GroupBy) -> Vec<AggregateEntry> {
    let mut counts: HashMap<u64, u64> = HashMap::new();
    let mut labels: HashMap<u64, String> = HashMap::new();

    for record in records {
        let key = match by {
            GroupBy::Asn => record.asn.map(u64::from),
            GroupBy::PrefixLength => record.covering_prefix_length().map(u64::from),
        };
        let Some(key) = key else { continue };

        *counts.entry(key).or_insert(0) += 1;

        if let GroupBy::Asn = by {
            if let Some(holder) = &record.holder {
                labels.entry(key).or_insert_with(|| holder.clone());
            }
        }
    }

    let mut entries: Vec<AggregateEntry> = counts
        .into_iter()
        .map(|(key, count)| AggregateEntry {
            key,
            count,
            label: labels.get(&key).cloned(),
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)));
    entries
}

/// Network length of a CIDR string, either address family.
pub fn prefix_length(prefix: &str) -> Option<u8> {
    if let Ok(cidr) = prefix.parse::<Ipv4Cidr>() {
        return Some(cidr.network_length());
    }
    if let Ok(cidr) = prefix.parse::<Ipv6Cidr>() {
        return Some(cidr.network_length());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subject: &str, asn: Option<u32>, holder: Option<&str>, prefix: Option<&str>) -> ResolvedRecord {
        ResolvedRecord {
            subject: subject.to_string(),
            asn,
            holder: holder.map(str::to_string),
            country: None,
            prefixes: prefix.map(str::to_string).into_iter().collect(),
        }
    }

    #[test]
    fn test_counts_per_asn() {
        let records = vec![
            record("8.8.8.8", Some(15169), Some("GOOGLE"), Some("8.8.8.0/24")),
            record("8.8.8.8", Some(15169), Some("GOOGLE"), Some("8.8.8.0/24")),
            record("1.1.1.1", Some(13335), Some("CLOUDFLARENET"), Some("1.1.1.0/24")),
        ];
        let entries = aggregate(&records, GroupBy::Asn);
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].key, entries[0].count), (15169, 2));
        assert_eq!((entries[1].key, entries[1].count), (13335, 1));
        let total: u64 = entries.iter().map(|e| e.count).sum();
        assert_eq!(total, records.len() as u64);
    }

    #[test]
    fn test_equal_counts_order_by_ascending_key() {
        let records = vec![
            record("a", Some(64500), None, None),
            record("b", Some(64499), None, None),
            record("c", Some(64501), None, None),
        ];
        let entries = aggregate(&records, GroupBy::Asn);
        let keys: Vec<u64> = entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![64499, 64500, 64501]);
    }

    #[test]
    fn test_empty_input_yields_empty_aggregate() {
        assert!(aggregate(&[], GroupBy::Asn).is_empty());
        assert!(aggregate(&[], GroupBy::PrefixLength).is_empty());
    }

    #[test]
    fn test_records_without_key_are_skipped() {
        let records = vec![
            record("a", None, None, None),
            record("b", Some(64500), None, None),
        ];
        let entries = aggregate(&records, GroupBy::Asn);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 1);
    }

    #[test]
    fn test_prefix_length_grouping() {
        let records = vec![
            record("a", Some(1), None, Some("8.8.8.0/24")),
            record("b", Some(2), None, Some("1.1.1.0/24")),
            record("c", Some(3), None, Some("9.9.0.0/16")),
        ];
        let entries = aggregate(&records, GroupBy::PrefixLength);
        assert_eq!((entries[0].key, entries[0].count), (24, 2));
        assert_eq!((entries[1].key, entries[1].count), (16, 1));
    }

    #[test]
    fn test_label_is_first_holder_observed() {
        let records = vec![
            record("a", Some(64500), Some("FIRST"), None),
            record("b", Some(64500), Some("SECOND"), None),
        ];
        let entries = aggregate(&records, GroupBy::Asn);
        assert_eq!(entries[0].label.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_prefix_length_parsing() {
        assert_eq!(prefix_length("8.8.8.0/24"), Some(24));
        assert_eq!(prefix_length("2001:4860::/32"), Some(32));
        assert_eq!(prefix_length("garbage"), None);
    }
}
