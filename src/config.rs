use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::aggregate::GroupBy;
use crate::core::resolver::ResolverBackend;

// RIPEstat Data API endpoints
pub const RIPE_PREFIX_OVERVIEW_URL: &str = "https://stat.ripe.net/data/prefix-overview/data.json";
pub const RIPE_AS_OVERVIEW_URL: &str = "https://stat.ripe.net/data/as-overview/data.json";
pub const RIPE_ANNOUNCED_PREFIXES_URL: &str =
    "https://stat.ripe.net/data/announced-prefixes/data.json";
pub const RIPE_RPKI_VALIDATION_URL: &str = "https://stat.ripe.net/data/rpki-validation/data.json";

// BGPView API
pub const BGPVIEW_PREFIX_URL: &str = "https://api.bgpview.io/prefix";

// Team Cymru IP-to-ASN WHOIS service
pub const CYMRU_WHOIS_SERVER: &str = "whois.cymru.com";
pub const CYMRU_WHOIS_PORT: u16 = 43;

pub const USER_AGENT: &str = "bgp-intel/0.3";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

// Private IP range definitions
pub const PRIVATE_IPV4_RANGES: &[&str] = &[
    "10.0.0.0/8",      // RFC1918
    "172.16.0.0/12",   // RFC1918
    "192.168.0.0/16",  // RFC1918
    "169.254.0.0/16",  // Link-local addresses
    "192.0.2.0/24",    // Documentation examples (TEST-NET-1)
    "198.51.100.0/24", // Documentation examples (TEST-NET-2)
    "203.0.113.0/24",  // Documentation examples (TEST-NET-3)
    "100.64.0.0/10",   // CGNAT (Carrier-grade NAT)
    "127.0.0.0/8",     // Localhost
];

pub const PRIVATE_IPV6_RANGES: &[&str] = &[
    "fc00::/7",      // Unique Local Addresses
    "fd00::/8",      // Unique Local Addresses (subset)
    "fe80::/10",     // Link-local addresses
    "::1/128",       // Localhost
    "2001:db8::/32", // Documentation addresses
];

#[derive(Parser)]
#[command(author, version, about = "BGP and ASN intelligence lookups")]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Enable trace output (extremely verbose)
    #[arg(short, long, global = true)]
    pub trace: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve one IP address to its origin ASN, holder and covering prefix
    Ip {
        /// IPv4 or IPv6 address
        address: String,

        /// Emit a JSON object instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show an ASN overview together with its announced prefixes
    Asn {
        /// ASN, accepted as AS15169, as15169 or 15169
        asn: String,

        /// Emit a JSON object instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve a subject file and report the ASN or prefix-length distribution
    Report {
        /// Input file with one subject per line (# comments allowed)
        #[arg(short, long)]
        file: PathBuf,

        /// Emit a JSON array instead of a table
        #[arg(long)]
        json: bool,

        /// Distribution key
        #[arg(long, value_enum, default_value_t = GroupBy::Asn)]
        by: GroupBy,

        /// Lookup backend
        #[arg(long, value_enum, default_value_t = ResolverBackend::Ripe)]
        resolver: ResolverBackend,
    },

    /// Check the RPKI origin-validation state of prefix/ASN pairs
    Rpki {
        /// Prefix to validate, e.g. 8.8.8.0/24
        #[arg(long)]
        prefix: Option<String>,

        /// Origin ASN for --prefix, e.g. AS15169
        #[arg(long)]
        asn: Option<String>,

        /// CSV baseline file with prefix,asn rows
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Emit a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare expected against currently observed origin ASNs for prefixes
    Hijack {
        /// Prefix to inspect, e.g. 8.8.8.0/24
        #[arg(long)]
        prefix: Option<String>,

        /// Expected origin ASN for --prefix
        #[arg(long)]
        expected_asn: Option<String>,

        /// CSV baseline file with prefix,asn rows
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Emit a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate random IPv4 addresses, one per line
    Gen {
        /// Number of addresses to generate
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,

        /// Draw host addresses from this prefix instead of global unicast space
        #[arg(long)]
        prefix: Option<String>,
    },
}
