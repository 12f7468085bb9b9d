// Simple helpers to avoid accidental printing of secrets in logs/tests.
use reqwest::Url;
use std::env;

fn dev_print_secrets() -> bool {
    env::var("DEV_PRINT_SECRETS").ok().as_deref() == Some("1")
}

/// Redact an RPC endpoint for logging. Provider API keys live in the path, so
/// only scheme, host and port survive unless DEV_PRINT_SECRETS=1 is set.
pub fn redact_url(url: &Url) -> String {
    if dev_print_secrets() {
        return url.to_string();
    }
    let host = url.host_str().unwrap_or("<no-host>");
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    let path = if url.path().trim_matches('/').is_empty() { "" } else { "/<redacted>" };
    format!("{}://{}{}{}", url.scheme(), host, port, path)
}
