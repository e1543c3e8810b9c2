/// Server address used when nothing usable is stored.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5123";

/// Resolves the effective server URL: a stored value that is non-blank after
/// trimming wins, otherwise [`DEFAULT_SERVER_URL`].
///
/// Trailing slashes are dropped so that endpoint paths can be appended
/// directly (`{url}/health`).
pub fn resolve_server_url(stored: Option<&str>) -> String {
    let trimmed = stored
        .map(str::trim)
        .map(|value| value.trim_end_matches('/'))
        .filter(|value| !value.is_empty());
    match trimmed {
        Some(value) => value.to_string(),
        None => DEFAULT_SERVER_URL.to_string(),
    }
}

/// Joins an endpoint path such as `/queue/send` onto a resolved server URL.
pub fn endpoint(server_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        server_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
