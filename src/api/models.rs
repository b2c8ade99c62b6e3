use serde::Deserialize;

/// Envelope every Cloudflare v4 endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiDnsRecord {
    pub id: String,
}

/// Body returned by ipify's JSON endpoint.
#[derive(Debug, Deserialize)]
pub struct IpResponse {
    pub ip: String,
}
