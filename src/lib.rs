//! # BGP-Intel Library
//!
//! A BGP/ASN intelligence library with support for:
//! - IP-to-ASN resolution (RIPEstat Data API, Team Cymru WHOIS)
//! - ASN overviews with announced prefixes
//! - ASN and prefix-length distributions over subject lists
//! - BGP origin-hijack plausibility checks and RPKI state checks
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! bgp-intel = "0.3"
//! anyhow = "1.0"
//! ```
//!
//! Basic usage:
//! ```no_run
//! use bgp_intel::lookup;
//!
//! fn main() -> anyhow::Result<()> {
//!     let result = lookup("8.8.8.8")?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Subjects
//!
//! - IPv4: `lookup("1.1.1.1")`
//! - IPv6: `lookup("2001:4860:4860::8888")`
//! - ASN: `lookup("AS13335")`, `lookup("13335")`

use std::time::Duration;

pub mod config;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use core::aggregate::{AggregateEntry, GroupBy, ResolvedRecord, aggregate};
pub use core::error::IntelError;
pub use core::query::Subject;
pub use core::report::OutputMode;
pub use core::resolver::{Resolver, ResolverBackend};

/// Simple API for one intelligence lookup
///
/// This is the main entry point for using this crate as a library.
/// The subject is validated, resolved once against the RIPEstat Data
/// API with the default timeout, and rendered as a text block.
///
/// # Examples
///
/// ```no_run
/// use bgp_intel::lookup;
///
/// fn main() -> anyhow::Result<()> {
///     // Resolve an IP to its origin ASN
///     let result = lookup("8.8.8.8")?;
///     println!("{}", result);
///
///     // Look up an ASN overview
///     let result = lookup("AS13335")?;
///     println!("{}", result);
///
///     Ok(())
/// }
/// ```
pub fn lookup(input: &str) -> anyhow::Result<String> {
    let subject = Subject::parse(input)?;
    let resolver = Resolver::new(
        ResolverBackend::Ripe,
        Duration::from_secs(config::DEFAULT_TIMEOUT_SECONDS),
    )?;
    let record = resolver.resolve(&subject)?;
    core::report::render_record(&record, OutputMode::Table)
}
