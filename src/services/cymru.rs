use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};

use crate::config::{CYMRU_WHOIS_PORT, CYMRU_WHOIS_SERVER};

/// Fields extracted from one Team Cymru verbose reply. IP replies carry
/// a BGP prefix and country; ASN replies omit the prefix column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CymruRecord {
    pub asn: Option<u32>,
    pub bgp_prefix: Option<String>,
    pub country_code: Option<String>,
    pub as_name: Option<String>,
}

/// Issue one verbose lookup (` -v <resource>`) against the Team Cymru
/// WHOIS service and parse the reply.
pub fn lookup(resource: &str, timeout: Duration) -> Result<CymruRecord> {
    let query = format!(" -v {}", resource);
    let response = whois_query(&query, CYMRU_WHOIS_SERVER, CYMRU_WHOIS_PORT, timeout)?;
    parse_verbose_reply(&response)
}

/// Send one WHOIS query over TCP and read the reply to end of stream.
pub fn whois_query(query: &str, server: &str, port: u16, timeout: Duration) -> Result<String> {
    debug!("Querying WHOIS server: {}:{}", server, port);

    let addr = (server, port)
        .to_socket_addrs()
        .with_context(|| format!("Cannot resolve WHOIS server {}", server))?
        .next()
        .ok_or_else(|| anyhow!("No address found for WHOIS server {}", server))?;

    let mut stream = TcpStream::connect_timeout(&addr, timeout)
        .with_context(|| format!("Cannot connect to WHOIS server {}:{}", server, port))?;

    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }

    // WHOIS protocol expects a CRLF-terminated query
    let query_str = format!("{}\r\n", query);
    stream.write_all(query_str.as_bytes())?;
    stream.flush()?;

    let mut response = String::new();
    stream.read_to_string(&mut response)?;

    debug!("Received {} bytes from {}:{}", response.len(), server, port);

    if response.is_empty() {
        return Err(anyhow!("Empty response from WHOIS server"));
    }

    Ok(response)
}

/// Parse a verbose Cymru reply by its header row. Fields are located
/// by name, never by column position, so either the IP or the ASN reply
/// shape parses; a header missing a required field fails closed.
pub fn parse_verbose_reply(reply: &str) -> Result<CymruRecord> {
    let mut rows = reply.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = rows.next().context("empty WHOIS reply")?;
    if header.starts_with("Error:") {
        bail!("WHOIS service error: {}", header);
    }

    let columns = split_fields(header);
    for required in ["AS", "AS Name"] {
        if !columns.iter().any(|c| c == required) {
            bail!("WHOIS reply header is missing the {:?} field", required);
        }
    }

    let data = rows.next().context("WHOIS reply carries no data row")?;
    let fields = split_fields(data);
    if fields.len() != columns.len() {
        bail!(
            "WHOIS data row has {} fields, header has {}",
            fields.len(),
            columns.len()
        );
    }

    let cell = |name: &str| -> Option<String> {
        let index = columns.iter().position(|c| c == name)?;
        let value = fields[index].as_str();
        (!value.is_empty() && value != "NA").then(|| value.to_string())
    };

    // The AS cell can list several origins separated by spaces; the
    // first one is the mapping Cymru considers primary.
    let asn = cell("AS").and_then(|v| v.split_whitespace().next().and_then(|t| t.parse().ok()));

    Ok(CymruRecord {
        asn,
        bgp_prefix: cell("BGP Prefix"),
        country_code: cell("CC"),
        as_name: cell("AS Name"),
    })
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('|').map(|field| field.trim().to_string()).collect()
}
