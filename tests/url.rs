use trg_http::url::DEFAULT_RPC_PATH;
use trg_http::{build_rpc_url, normalize_rpc_url, DEFAULT_RPC_URL};

#[test]
fn url_normalization_trims_and_defaults() {
    assert_eq!(normalize_rpc_url(""), DEFAULT_RPC_URL);
    assert_eq!(normalize_rpc_url("   "), DEFAULT_RPC_URL);
    assert_eq!(
        normalize_rpc_url(" http://nas:9091/transmission/rpc/ "),
        "http://nas:9091/transmission/rpc"
    );
}

#[test]
fn url_is_built_from_host_settings() {
    assert_eq!(
        build_rpc_url("nas.local", 9091, false, ""),
        format!("http://nas.local:9091{DEFAULT_RPC_PATH}")
    );
    assert_eq!(
        build_rpc_url(" seedbox ", 443, true, "custom/rpc"),
        "https://seedbox:443/custom/rpc"
    );
    assert_eq!(
        build_rpc_url("127.0.0.1", 9091, false, "/transmission/rpc"),
        "http://127.0.0.1:9091/transmission/rpc"
    );
}
