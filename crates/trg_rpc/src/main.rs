use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use trg_http::{perform, ClientConfig, ClientContext, ResponseStatus};

mod args;
mod logging;
mod profile;

use args::{BodySource, CliArgs};
use profile::resolve_config;

const EXIT_HTTP_ERROR: u8 = 1;
const EXIT_TRANSPORT_ERROR: u8 = 2;
const EXIT_USAGE: u8 = 64;

fn main() -> ExitCode {
    logging::init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("trg-rpc: {error:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(args: &CliArgs) -> Result<ExitCode> {
    let config = resolve_config(ClientConfig::from_env(), args)?;
    tracing::debug!(url = %config.url, ssl = config.ssl, "resolved connection settings");
    let context = ClientContext::new(config).context("invalid connection settings")?;
    let body = read_body(&args.body_source())?;

    let response = perform(&context, &body);

    if let Some(payload) = &response.payload {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(payload)
            .and_then(|()| stdout.flush())
            .context("failed to write response payload")?;
    }
    if !response.is_success() {
        eprintln!("trg-rpc: {} (code {})", response.status, response.code());
    }

    Ok(ExitCode::from(exit_code(&response.status)))
}

fn read_body(source: &BodySource) -> Result<Vec<u8>> {
    match source {
        BodySource::Inline(body) => Ok(body.as_bytes().to_vec()),
        BodySource::Stdin => {
            let mut body = Vec::new();
            io::stdin()
                .read_to_end(&mut body)
                .context("failed to read request body from stdin")?;
            Ok(body)
        }
    }
}

fn exit_code(status: &ResponseStatus) -> u8 {
    match status {
        ResponseStatus::Success => 0,
        ResponseStatus::Http(_) => EXIT_HTTP_ERROR,
        ResponseStatus::Transport(_) => EXIT_TRANSPORT_ERROR,
    }
}
