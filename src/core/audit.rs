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

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use cidr::{Ipv4Cidr, Ipv6Cidr};
use serde::Serialize;
use tracing::warn;

use crate::core::error::IntelError;
use crate::core::query::parse_asn;
use crate::core::report::OutputMode;
use crate::services::bgpview;
use crate::services::ripe;
use crate::services::types::RpkiValidationResponse;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Verdict for one prefix-origin comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Alert,
    Unknown,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct OriginCheck {
    pub prefix: String,
    pub expected_asn: u32,
    pub observed_asns: Vec<u32>,
    pub status: CheckStatus,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RpkiCheck {
    pub prefix: String,
    pub asn: u32,
    pub state: String,
}

/// Classify one prefix against the origins currently observed for it.
pub fn evaluate_origin(prefix: &str, expected_asn: u32, observed: &BTreeSet<u32>) -> OriginCheck {
    if observed.is_empty() {
        return OriginCheck {
            prefix: prefix.to_string(),
            expected_asn,
            observed_asns: Vec::new(),
            status: CheckStatus::Unknown,
            reason: "no origin data".to_string(),
        };
    }

    if observed.contains(&expected_asn) {
        return OriginCheck {
            prefix: prefix.to_string(),
            expected_asn,
            observed_asns: observed.iter().copied().collect(),
            status: CheckStatus::Ok,
            reason: "expected origin present".to_string(),
        };
    }

    OriginCheck {
        prefix: prefix.to_string(),
        expected_asn,
        observed_asns: observed.iter().copied().collect(),
        status: CheckStatus::Alert,
        reason: "origin mismatch, possible hijack or leak".to_string(),
    }
}

/// RPKI state from a validation reply: data.status first, then
/// validity.state, else unknown. Always lower-case.
pub fn extract_rpki_state(response: &RpkiValidationResponse) -> String {
    let Some(data) = &response.data else {
        return "unknown".to_string();
    };

    if let Some(status) = data.status.as_deref().filter(|s| !s.is_empty()) {
        return status.to_lowercase();
    }

    if let Some(state) = data
        .validity
        .as_ref()
        .and_then(|validity| validity.state.as_deref())
        .filter(|s| !s.is_empty())
    {
        return state.to_lowercase();
    }

    "unknown".to_string()
}

/// Parse a CSV baseline file of prefix,asn rows. Comment and blank
/// lines are skipped, as are rows with a malformed prefix or ASN.
pub fn parse_baseline(path: &Path) -> Result<Vec<(String, u32)>, IntelError> {
    let text = fs::read_to_string(path).map_err(|e| {
        IntelError::Configuration(format!(
            "cannot read baseline file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut targets = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 2 {
            warn!("Skipping short baseline row: {:?}", line);
            continue;
        }

        let prefix = parts[0];
        let Some(asn) = parse_asn(parts[1]) else {
            warn!("Skipping baseline row with bad ASN: {:?}", line);
            continue;
        };
        if !is_valid_prefix(prefix) {
            warn!("Skipping baseline row with bad prefix: {:?}", line);
            continue;
        }

        targets.push((prefix.to_string(), asn));
    }
    Ok(targets)
}

pub fn is_valid_prefix(prefix: &str) -> bool {
    prefix.parse::<Ipv4Cidr>().is_ok() || prefix.parse::<Ipv6Cidr>().is_ok()
}

/// Merge a --prefix/ASN pair and a baseline file into one target list.
/// At least one source must yield a target.
pub fn collect_targets(
    prefix: Option<&str>,
    asn: Option<&str>,
    baseline: Option<&Path>,
) -> Result<Vec<(String, u32)>, IntelError> {
    let mut targets = Vec::new();

    if let Some(path) = baseline {
        targets.extend(parse_baseline(path)?);
    }

    match (prefix, asn) {
        (Some(prefix), Some(asn_text)) => {
            if !is_valid_prefix(prefix) {
                return Err(IntelError::InvalidInput(prefix.to_string()));
            }
            let asn = parse_asn(asn_text)
                .ok_or_else(|| IntelError::InvalidInput(asn_text.to_string()))?;
            targets.push((prefix.to_string(), asn));
        }
        (None, None) => {}
        _ => {
            return Err(IntelError::Configuration(
                "a prefix and an ASN must be given together".to_string(),
            ));
        }
    }

    if targets.is_empty() {
        return Err(IntelError::Configuration(
            "provide a prefix/ASN pair or a baseline file".to_string(),
        ));
    }
    Ok(targets)
}

/// Compare each target's expected origin against BGPView observations.
/// A fetch failure becomes an error row, never a panic or abort.
pub fn run_origin_checks(
    client: &reqwest::blocking::Client,
    targets: &[(String, u32)],
) -> Vec<OriginCheck> {
    targets
        .iter()
        .map(|(prefix, expected)| match bgpview::prefix_origins(client, prefix) {
            Ok(observed) => evaluate_origin(prefix, *expected, &observed),
            Err(e) => {
                warn!("Origin fetch failed for {}: {}", prefix, e);
                OriginCheck {
                    prefix: prefix.clone(),
                    expected_asn: *expected,
                    observed_asns: Vec::new(),
                    status: CheckStatus::Error,
                    reason: e.to_string(),
                }
            }
        })
        .collect()
}

/// Fetch the RPKI validation state for each target pair.
pub fn run_rpki_checks(
    client: &reqwest::blocking::Client,
    targets: &[(String, u32)],
) -> Vec<RpkiCheck> {
    targets
        .iter()
        .map(|(prefix, asn)| {
            let state = match ripe::rpki_validation(client, prefix, &format!("AS{}", asn)) {
                Ok(response) => extract_rpki_state(&response),
                Err(e) => {
                    warn!("RPKI validation failed for {} AS{}: {}", prefix, asn, e);
                    "error".to_string()
                }
            };
            RpkiCheck { prefix: prefix.clone(), asn: *asn, state }
        })
        .collect()
}

pub fn origin_checks_exit_code(rows: &[OriginCheck]) -> i32 {
    let flagged = rows
        .iter()
        .any(|row| matches!(row.status, CheckStatus::Alert | CheckStatus::Error));
    if flagged { 2 } else { 0 }
}

pub fn rpki_checks_exit_code(rows: &[RpkiCheck]) -> i32 {
    let flagged = rows
        .iter()
        .any(|row| row.state == "invalid" || row.state == "error");
    if flagged { 2 } else { 0 }
}

pub fn render_origin_checks(
    rows: &[OriginCheck],
    mode: OutputMode,
    color: bool,
) -> Result<String> {
    if mode == OutputMode::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(rows)?));
    }
    if rows.is_empty() {
        return Ok("no results\n".to_string());
    }

    let mut out = String::new();
    out.push_str("PREFIX\tEXPECTED\tOBSERVED\tSTATUS\tREASON\n");
    for row in rows {
        let observed = if row.observed_asns.is_empty() {
            "-".to_string()
        } else {
            row.observed_asns
                .iter()
                .map(|asn| format!("AS{}", asn))
                .collect::<Vec<_>>()
                .join(",")
        };
        let line = format!(
            "{}\tAS{}\t{}\t{}\t{}",
            row.prefix,
            row.expected_asn,
            observed,
            status_text(row.status),
            row.reason
        );
        if color && matches!(row.status, CheckStatus::Alert | CheckStatus::Error) {
            out.push_str(&format!("{}{}{}\n", ANSI_RED, line, ANSI_RESET));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }
    Ok(out)
}

pub fn render_rpki_checks(rows: &[RpkiCheck], mode: OutputMode, color: bool) -> Result<String> {
    if mode == OutputMode::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(rows)?));
    }
    if rows.is_empty() {
        return Ok("no results\n".to_string());
    }

    let mut out = String::new();
    out.push_str("PREFIX\tASN\tRPKI_STATE\n");
    for row in rows {
        let line = format!("{}\tAS{}\t{}", row.prefix, row.asn, row.state);
        if color && (row.state == "invalid" || row.state == "error") {
            out.push_str(&format!("{}{}{}\n", ANSI_RED, line, ANSI_RESET));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }
    Ok(out)
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "ok",
        CheckStatus::Alert => "alert",
        CheckStatus::Unknown => "unknown",
        CheckStatus::Error => "error",
    }
}
