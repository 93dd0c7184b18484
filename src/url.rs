/// Default RPC path served by the Transmission daemon.
pub const DEFAULT_RPC_PATH: &str = "/transmission/rpc";
/// Default endpoint used when no URL is configured.
pub const DEFAULT_RPC_URL: &str = "http://localhost:9091/transmission/rpc";

/// Normalize a configured endpoint.
///
/// Blank input falls back to [`DEFAULT_RPC_URL`]; surrounding whitespace and
/// trailing slashes are removed.
pub fn normalize_rpc_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DEFAULT_RPC_URL.to_string();
    }
    trimmed.trim_end_matches('/').to_string()
}

/// Assemble an endpoint from host/port/SSL/path settings.
///
/// Assembly rules:
/// 1) scheme is `https` when `ssl` is set, `http` otherwise
/// 2) an empty `rpc_path` becomes [`DEFAULT_RPC_PATH`]
/// 3) a missing leading `/` on `rpc_path` is added
pub fn build_rpc_url(host: &str, port: u16, ssl: bool, rpc_path: &str) -> String {
    let scheme = if ssl { "https" } else { "http" };
    let path = match rpc_path.trim() {
        "" => DEFAULT_RPC_PATH.to_string(),
        path if path.starts_with('/') => path.to_string(),
        path => format!("/{path}"),
    };
    format!("{scheme}://{}:{port}{path}", host.trim())
}
