use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use trg_http::{build_rpc_url, ClientConfig};

use crate::args::CliArgs;

const DEFAULT_PORT: u16 = 9091;

/// Connection profile loaded from a JSON file.
///
/// Every field is optional; absent fields keep the value resolved from the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rpc_path: Option<String>,
    pub ssl: Option<bool>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_response_bytes: Option<usize>,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse profile {}", path.display()))
    }

    fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(ssl) = self.ssl {
            config = config.with_ssl(ssl);
        }
        if let Some(url) = self.url {
            config = config.with_url(url);
        }
        if let Some(host) = self.host {
            let ssl = config.ssl;
            config = config.with_url(build_rpc_url(
                &host,
                self.port.unwrap_or(DEFAULT_PORT),
                ssl,
                self.rpc_path.as_deref().unwrap_or_default(),
            ));
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(proxy) = self.proxy {
            config = config.with_proxy(proxy);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(limit) = self.max_response_bytes {
            config = config.with_max_response_bytes(limit);
        }
        config
    }
}

/// Resolves settings in increasing precedence: environment, profile file,
/// command-line flags.
pub fn resolve_config(base: ClientConfig, args: &CliArgs) -> Result<ClientConfig> {
    let mut config = match &args.config_path {
        Some(path) => Profile::load(path)?.apply(base),
        None => base,
    };

    if args.ssl {
        config = config.with_ssl(true);
    }
    if let Some(url) = &args.url {
        config = config.with_url(url.as_str());
    }
    if let Some(host) = &args.host {
        let ssl = config.ssl;
        config = config.with_url(build_rpc_url(
            host,
            args.port.unwrap_or(DEFAULT_PORT),
            ssl,
            args.rpc_path.as_deref().unwrap_or_default(),
        ));
    }
    if let Some(username) = &args.username {
        config.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    if let Some(proxy) = &args.proxy {
        config = config.with_proxy(proxy.as_str());
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use trg_http::DEFAULT_RPC_URL;

    use super::*;

    fn profile_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp profile should be created");
        file.write_all(json.as_bytes())
            .expect("profile should be written");
        file
    }

    #[test]
    fn profile_host_settings_build_the_endpoint() {
        let file = profile_file(
            r#"{"host":"seedbox","port":443,"ssl":true,"username":"admin","password":"secret","timeout_secs":20}"#,
        );
        let args = CliArgs {
            config_path: Some(file.path().to_path_buf()),
            ..CliArgs::default()
        };

        let config = resolve_config(ClientConfig::default(), &args).expect("profile resolves");

        assert_eq!(config.url, "https://seedbox:443/transmission/rpc");
        assert!(config.ssl);
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
        assert_eq!(config.timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn flags_override_profile_values() {
        let file = profile_file(r#"{"url":"http://nas:9091/transmission/rpc","username":"admin"}"#);
        let args = CliArgs {
            config_path: Some(file.path().to_path_buf()),
            username: Some("operator".to_string()),
            proxy: Some("http://proxy:3128".to_string()),
            ..CliArgs::default()
        };

        let config = resolve_config(ClientConfig::default(), &args).expect("profile resolves");

        assert_eq!(config.url, "http://nas:9091/transmission/rpc");
        assert_eq!(config.username, "operator");
        assert_eq!(config.proxy.as_deref(), Some("http://proxy:3128"));
    }

    #[test]
    fn missing_profile_keeps_base_config() {
        let config = resolve_config(ClientConfig::default(), &CliArgs::default())
            .expect("no profile resolves");
        assert_eq!(config.url, DEFAULT_RPC_URL);
    }

    #[test]
    fn unknown_profile_fields_are_rejected() {
        let file = profile_file(r#"{"hostname":"nas"}"#);
        let error = Profile::load(file.path()).expect_err("unknown field must fail");
        assert!(format!("{error:#}").contains("failed to parse profile"));
    }
}
