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

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use bgp_intel::config::{Cli, Command};
use bgp_intel::core::aggregate;
use bgp_intel::core::audit;
use bgp_intel::core::batch;
use bgp_intel::core::error::IntelError;
use bgp_intel::core::ipgen;
use bgp_intel::core::query::Subject;
use bgp_intel::core::report::{self, OutputMode};
use bgp_intel::core::resolver::{Resolver, ResolverBackend};
use bgp_intel::services;

fn main() {
    let args = Cli::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // Logs go to stderr so table and JSON output stay parseable
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Cli) -> Result<i32> {
    let timeout = Duration::from_secs(args.timeout);

    match args.command {
        Command::Ip { address, json } => {
            let subject = Subject::parse(&address)?;
            let Subject::Ip(_) = subject else {
                return Err(IntelError::InvalidInput(address).into());
            };
            let resolver = Resolver::new(ResolverBackend::Ripe, timeout)?;
            let record = resolver.resolve(&subject)?;
            print!(
                "{}",
                report::render_record(&record, OutputMode::from_json_flag(json))?
            );
            Ok(0)
        }

        Command::Asn { asn, json } => {
            let subject = Subject::parse(&asn)?;
            let Subject::Asn(number) = subject else {
                return Err(IntelError::InvalidInput(asn).into());
            };
            let resolver = Resolver::new(ResolverBackend::Ripe, timeout)?;
            let mut record = resolver.resolve(&subject)?;
            record.prefixes.extend(resolver.announced_prefixes(number)?);
            print!(
                "{}",
                report::render_record(&record, OutputMode::from_json_flag(json))?
            );
            Ok(0)
        }

        Command::Report { file, json, by, resolver: backend } => {
            let subjects = batch::load_subjects(&file)?;
            let resolver = Resolver::new(backend, timeout)?;
            let outcome = batch::run_batch(&resolver, &subjects);

            let entries = aggregate::aggregate(&outcome.records, by);
            print!(
                "{}",
                report::render_aggregate(&entries, OutputMode::from_json_flag(json))?
            );

            eprintln!(
                "# {} subjects: {} resolved, {} skipped",
                outcome.total(),
                outcome.records.len(),
                outcome.skipped.len()
            );
            for skipped in &outcome.skipped {
                eprintln!("#   {}: {}", skipped.subject, skipped.reason);
            }
            Ok(0)
        }

        Command::Rpki { prefix, asn, baseline, json } => {
            let targets =
                audit::collect_targets(prefix.as_deref(), asn.as_deref(), baseline.as_deref())?;
            let client = services::http_client(timeout)?;
            let rows = audit::run_rpki_checks(&client, &targets);
            let color = !json && atty::is(atty::Stream::Stdout);
            print!(
                "{}",
                audit::render_rpki_checks(&rows, OutputMode::from_json_flag(json), color)?
            );
            Ok(audit::rpki_checks_exit_code(&rows))
        }

        Command::Hijack { prefix, expected_asn, baseline, json } => {
            let targets = audit::collect_targets(
                prefix.as_deref(),
                expected_asn.as_deref(),
                baseline.as_deref(),
            )?;
            let client = services::http_client(timeout)?;
            let rows = audit::run_origin_checks(&client, &targets);
            let color = !json && atty::is(atty::Stream::Stdout);
            print!(
                "{}",
                audit::render_origin_checks(&rows, OutputMode::from_json_flag(json), color)?
            );
            Ok(audit::origin_checks_exit_code(&rows))
        }

        Command::Gen { count, prefix } => {
            for address in ipgen::generate(count, prefix.as_deref())? {
                println!("{}", address);
            }
            Ok(0)
        }
    }
}
