use anyhow::Result;

use crate::core::aggregate::{AggregateEntry, ResolvedRecord};

/// Maximum width of the label column in table mode.
const LABEL_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Table }
    }
}

/// Render a distribution either as a fixed-width table or as a JSON
/// array of {key, count, label} objects. An empty aggregate renders an
/// explicit "no results" line in table mode and [] in JSON mode.
pub fn render_aggregate(entries: &[AggregateEntry], mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => Ok(format!("{}\n", serde_json::to_string_pretty(entries)?)),
        OutputMode::Table => Ok(render_aggregate_table(entries)),
    }
}

fn render_aggregate_table(entries: &[AggregateEntry]) -> String {
    if entries.is_empty() {
        return "no results\n".to_string();
    }

    let key_width = entries
        .iter()
        .map(|e| e.key.to_string().len())
        .max()
        .unwrap_or(0)
        .max("KEY".len());
    let count_width = entries
        .iter()
        .map(|e| e.count.to_string().len())
        .max()
        .unwrap_or(0)
        .max("COUNT".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:>key_width$}  {:>count_width$}  {}\n",
        "KEY", "COUNT", "LABEL"
    ));
    for entry in entries {
        let label = entry.label.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{:>key_width$}  {:>count_width$}  {}\n",
            entry.key,
            entry.count,
            truncate_string(label, LABEL_WIDTH)
        ));
    }
    out
}

/// Render one resolved record, RIPE-style key: value block or a single
/// JSON object. Missing fields render as "unknown".
pub fn render_record(record: &ResolvedRecord, mode: OutputMode) -> Result<String> {
    if mode == OutputMode::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(record)?));
    }

    let mut out = String::new();
    out.push_str(&format!("% Lookup result for {}\n\n", record.subject));
    out.push_str(&format!("subject:        {}\n", record.subject));
    out.push_str(&format!(
        "origin-asn:     {}\n",
        record
            .asn
            .map(|asn| format!("AS{}", asn))
            .unwrap_or_else(|| "unknown".to_string())
    ));
    out.push_str(&format!(
        "holder:         {}\n",
        record.holder.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!(
        "country:        {}\n",
        record.country.as_deref().unwrap_or("unknown")
    ));
    if record.prefixes.is_empty() {
        out.push_str("prefix:         unknown\n");
    } else {
        for prefix in &record.prefixes {
            out.push_str(&format!("prefix:         {}\n", prefix));
        }
    }
    Ok(out)
}

/// Truncate a string to the given display length.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn sample_entries() -> Vec<AggregateEntry> {
        vec![
            AggregateEntry { key: 15169, count: 2, label: Some("GOOGLE - Google LLC".to_string()) },
            AggregateEntry { key: 13335, count: 1, label: None },
        ]
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let rendered = render_aggregate(&sample_entries(), OutputMode::Table).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("KEY"));
        assert!(lines[0].contains("COUNT"));
        assert!(lines[1].contains("15169"));
        assert!(lines[2].contains("13335"));
    }

    #[test]
    fn test_empty_aggregate_renders_no_results() {
        let rendered = render_aggregate(&[], OutputMode::Table).unwrap();
        assert_eq!(rendered, "no results\n");
        let rendered = render_aggregate(&[], OutputMode::Json).unwrap();
        assert_eq!(rendered.trim(), "[]");
    }

    #[test]
    fn test_json_and_table_carry_the_same_pairs() {
        let entries = sample_entries();

        let json = render_aggregate(&entries, OutputMode::Json).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        let mut json_pairs: Vec<(u64, u64)> = parsed
            .iter()
            .map(|v| (v["key"].as_u64().unwrap(), v["count"].as_u64().unwrap()))
            .collect();

        let table = render_aggregate(&entries, OutputMode::Table).unwrap();
        let mut table_pairs: Vec<(u64, u64)> = table
            .lines()
            .skip(1)
            .map(|line| {
                let mut fields = line.split_whitespace();
                (
                    fields.next().unwrap().parse().unwrap(),
                    fields.next().unwrap().parse().unwrap(),
                )
            })
            .collect();

        json_pairs.sort_unstable();
        table_pairs.sort_unstable();
        assert_eq!(json_pairs, table_pairs);
    }

    #[test]
    fn test_record_rendering_marks_missing_fields_unknown() {
        let record = ResolvedRecord {
            subject: "8.8.8.8".to_string(),
            asn: Some(15169),
            holder: None,
            country: None,
            prefixes: BTreeSet::new(),
        };
        let rendered = render_record(&record, OutputMode::Table).unwrap();
        assert!(rendered.contains("origin-asn:     AS15169"));
        assert!(rendered.contains("holder:         unknown"));
        assert!(rendered.contains("prefix:         unknown"));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("very_long_string", 10), "very_lo...");
        assert_eq!(truncate_string("exact", 5), "exact");
    }
}
