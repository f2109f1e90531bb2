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

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::aggregate::ResolvedRecord;
use crate::core::error::IntelError;
use crate::core::query::Subject;
use crate::core::resolver::Resolver;

/// A subject excluded from the aggregate, with the reason it was
/// excluded. Reported in the run summary.
#[derive(Debug, Clone)]
pub struct SkippedSubject {
    pub subject: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<ResolvedRecord>,
    pub skipped: Vec<SkippedSubject>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Load subjects from a newline-delimited file. Blank lines and lines
/// starting with # are dropped here; malformed subjects stay in the
/// list and are skipped (with a reason) by the run itself.
pub fn load_subjects(path: &Path) -> Result<Vec<String>, IntelError> {
    let text = fs::read_to_string(path).map_err(|e| {
        IntelError::Configuration(format!("cannot read input file {}: {}", path.display(), e))
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Resolve subjects one at a time, in input order. A failed subject is
/// logged and excluded; it never aborts the batch.
pub fn run_batch(resolver: &Resolver, subjects: &[String]) -> BatchOutcome {
    run_batch_with(subjects, |subject| resolver.resolve(subject))
}

/// Batch loop with the resolve step injected, shared by the network
/// path and the tests.
pub fn run_batch_with<F>(subjects: &[String], mut resolve: F) -> BatchOutcome
where
    F: FnMut(&Subject) -> Result<ResolvedRecord, IntelError>,
{
    let mut outcome = BatchOutcome::default();

    for raw in subjects {
        let subject = match Subject::parse(raw) {
            Ok(subject) => subject,
            Err(e) => {
                warn!("Skipping {:?}: {}", raw, e);
                outcome.skipped.push(SkippedSubject {
                    subject: raw.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match resolve(&subject) {
            Ok(record) => {
                debug!("Resolved {} to AS{:?}", subject, record.asn);
                outcome.records.push(record);
            }
            Err(e) => {
                warn!("{}", e);
                outcome.skipped.push(SkippedSubject {
                    subject: raw.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Write;

    use super::*;

    fn fake_record(subject: &Subject, asn: u32) -> ResolvedRecord {
        ResolvedRecord {
            subject: subject.resource(),
            asn: Some(asn),
            holder: None,
            country: None,
            prefixes: BTreeSet::new(),
        }
    }

    #[test]
    fn test_load_subjects_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# targets").unwrap();
        writeln!(file, "8.8.8.8").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  1.1.1.1  ").unwrap();
        writeln!(file, "# trailing comment").unwrap();

        let subjects = load_subjects(file.path()).unwrap();
        assert_eq!(subjects, vec!["8.8.8.8", "1.1.1.1"]);
    }

    #[test]
    fn test_load_subjects_missing_file_is_configuration_error() {
        let result = load_subjects(Path::new("/nonexistent/subjects.txt"));
        assert!(matches!(result, Err(IntelError::Configuration(_))));
    }

    #[test]
    fn test_malformed_subject_is_skipped_not_fatal() {
        let subjects = vec![
            "8.8.8.8".to_string(),
            "not.an.ip".to_string(),
            "1.1.1.1".to_string(),
        ];
        let outcome = run_batch_with(&subjects, |subject| Ok(fake_record(subject, 64500)));
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].subject, "not.an.ip");
        assert_eq!(outcome.total(), 3);
    }

    #[test]
    fn test_lookup_failure_is_excluded_and_counted() {
        let subjects = vec!["8.8.8.8".to_string(), "9.9.9.9".to_string()];
        let outcome = run_batch_with(&subjects, |subject| {
            if subject.resource() == "9.9.9.9" {
                Err(IntelError::lookup_failed("9.9.9.9", "timed out"))
            } else {
                Ok(fake_record(subject, 15169))
            }
        });
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("timed out"));
    }

    #[test]
    fn test_duplicate_subjects_each_contribute() {
        let subjects = vec!["8.8.8.8".to_string(); 3];
        let outcome = run_batch_with(&subjects, |subject| Ok(fake_record(subject, 15169)));
        assert_eq!(outcome.records.len(), 3);
    }
}
