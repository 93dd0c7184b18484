use std::path::PathBuf;

use clap::Parser;

/// Where the request body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Inline(String),
    Stdin,
}

/// Sends one Transmission RPC request and writes the response payload to
/// stdout.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "trg-rpc", version)]
#[command(about = "Send one Transmission RPC request", long_about = None)]
pub struct CliArgs {
    /// JSON connection profile
    #[arg(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// RPC endpoint URL
    #[arg(long)]
    pub url: Option<String>,

    /// Daemon host; builds the URL with --port, --rpc-path and --ssl
    #[arg(long)]
    pub host: Option<String>,

    /// Daemon port (default 9091)
    #[arg(long)]
    pub port: Option<u16>,

    /// RPC path (default /transmission/rpc)
    #[arg(long, value_name = "PATH")]
    pub rpc_path: Option<String>,

    /// HTTP Basic user name
    #[arg(long)]
    pub username: Option<String>,

    /// HTTP Basic password
    #[arg(long)]
    pub password: Option<String>,

    /// Use https and skip certificate verification
    #[arg(long)]
    pub ssl: bool,

    /// HTTP proxy URL
    #[arg(long)]
    pub proxy: Option<String>,

    /// Whole-request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Request body; read from stdin when omitted or given as '-'
    #[arg(value_name = "BODY")]
    pub body: Option<String>,
}

impl CliArgs {
    pub fn body_source(&self) -> BodySource {
        match self.body.as_deref() {
            None | Some("-") => BodySource::Stdin,
            Some(body) => BodySource::Inline(body.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(values: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("trg-rpc").chain(values.iter().copied()))
    }

    #[test]
    fn defaults_read_body_from_stdin() {
        let parsed = parse(&[]).expect("empty args parse");
        assert_eq!(parsed, CliArgs::default());
        assert_eq!(parsed.body_source(), BodySource::Stdin);

        let dash = parse(&["-"]).expect("dash parses");
        assert_eq!(dash.body_source(), BodySource::Stdin);
    }

    #[test]
    fn flags_and_inline_body_are_parsed() {
        let parsed = parse(&[
            "--host",
            "nas",
            "--port",
            "9092",
            "--ssl",
            "--username",
            "admin",
            "--timeout",
            "15",
            "--config",
            "profile.json",
            r#"{"method":"session-get"}"#,
        ])
        .expect("args parse");

        assert_eq!(parsed.host.as_deref(), Some("nas"));
        assert_eq!(parsed.port, Some(9092));
        assert!(parsed.ssl);
        assert_eq!(parsed.username.as_deref(), Some("admin"));
        assert_eq!(parsed.timeout_secs, Some(15));
        assert_eq!(parsed.config_path, Some(PathBuf::from("profile.json")));
        assert_eq!(
            parsed.body_source(),
            BodySource::Inline(r#"{"method":"session-get"}"#.to_string())
        );
    }

    #[test]
    fn bad_input_is_rejected() {
        assert_eq!(
            parse(&["--port", "http"]).expect_err("bad port").kind(),
            ErrorKind::ValueValidation
        );
        assert!(parse(&["--url"]).is_err());
        assert_eq!(
            parse(&["--verbose"]).expect_err("unknown flag").kind(),
            ErrorKind::UnknownArgument
        );
        assert!(parse(&["{}", "-"]).is_err());
    }

    #[test]
    fn help_is_not_a_usage_error() {
        let error = parse(&["--help"]).expect_err("help short-circuits parsing");
        assert_eq!(error.kind(), ErrorKind::DisplayHelp);
        assert!(!error.use_stderr());
    }
}
