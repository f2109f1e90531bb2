use serde::Deserialize;

// RIPEstat Data API payloads. Every data field is optional so a
// partial or reshaped reply degrades to "unknown" instead of a parse
// error; callers decide which absences fail closed.

#[derive(Debug, Deserialize)]
pub struct PrefixOverviewResponse {
    pub data: Option<PrefixOverviewData>,
    pub status: String,
    #[allow(dead_code)]
    pub messages: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct PrefixOverviewData {
    pub resource: Option<String>,
    pub asns: Option<Vec<PrefixOrigin>>,
    #[allow(dead_code)]
    pub announced: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrefixOrigin {
    pub asn: u32,
    pub holder: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AsOverviewResponse {
    pub data: Option<AsOverviewData>,
    pub status: String,
    #[allow(dead_code)]
    pub messages: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct AsOverviewData {
    pub holder: Option<String>,
    #[allow(dead_code)]
    pub announced: Option<bool>,
    #[allow(dead_code)]
    pub resource: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnnouncedPrefixesResponse {
    pub data: Option<AnnouncedPrefixesData>,
    pub status: String,
    #[allow(dead_code)]
    pub messages: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct AnnouncedPrefixesData {
    pub prefixes: Option<Vec<AnnouncedPrefix>>,
    #[allow(dead_code)]
    pub resource: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnnouncedPrefix {
    pub prefix: String,
    #[allow(dead_code)]
    pub timelines: Option<Vec<Timeline>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Timeline {
    #[allow(dead_code)]
    pub starttime: Option<String>,
    #[allow(dead_code)]
    pub endtime: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RpkiValidationResponse {
    pub data: Option<RpkiValidationData>,
    pub status: String,
    #[allow(dead_code)]
    pub messages: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct RpkiValidationData {
    pub status: Option<String>,
    pub validity: Option<RpkiValidity>,
}

#[derive(Debug, Deserialize)]
pub struct RpkiValidity {
    pub state: Option<String>,
    #[allow(dead_code)]
    pub description: Option<String>,
}

// BGPView prefix payload. The origin list is the common shape; some
// replies only carry a bare top-level asn value, kept as raw JSON and
// extracted by the caller.

#[derive(Debug, Deserialize)]
pub struct BgpViewPrefixResponse {
    pub data: Option<BgpViewPrefixData>,
    #[allow(dead_code)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BgpViewPrefixData {
    pub asns: Option<Vec<BgpViewOrigin>>,
    pub asn: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BgpViewOrigin {
    pub asn: Option<u32>,
}
