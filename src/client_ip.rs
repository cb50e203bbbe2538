//! Client IP resolution from proxy forwarding headers.

use axum::http::HeaderMap;

/// Value reported when no forwarding header identifies the client.
pub const UNKNOWN_IP: &str = "unknown";

/// Resolve the client IP for attribution.
///
/// Headers are consulted in priority order:
/// 1. `x-forwarded-for` - first entry of the comma-separated chain, which
///    is the original client when the header is set by a trusted proxy
/// 2. `x-real-ip`
/// 3. `cf-connecting-ip`
///
/// Falls back to the literal string `"unknown"`. The result is echoed in
/// response metadata and recorded in the usage log; it is client-supplied
/// data and is never used for access control.
pub fn resolve(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    if let Some(cf_ip) = header_str(headers, "cf-connecting-ip") {
        return cf_ip.to_string();
    }

    UNKNOWN_IP.to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
