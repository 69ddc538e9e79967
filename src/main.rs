//! Chat Relay - Entry Point
//!
//! Accepts TCP clients and relays every message to all other connected clients.

use clap::Parser;
use clap::error::ErrorKind;
use log::info;
use std::ffi::OsString;
use std::process::ExitCode;

use chat_relay::error::{RelayError, handle_fatal};
use chat_relay::utils::logging::setup_logging;
use chat_relay::{Relay, RelayConfig};

/// Relays chat messages between TCP clients.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Port to listen on (defaults to the configured port)
    port: Option<u16>,
}

/// Parses `program [port]`. Anything else is a usage error; help and
/// version requests exit directly.
fn parse_args_from<I, T>(args: I) -> Result<Cli, RelayError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => RelayError::Usage(program),
    })
}

async fn run(cli: Cli) -> Result<(), RelayError> {
    let config = RelayConfig::load()?.with_port(cli.port);
    info!("Launching chat relay...");

    let relay = Relay::bind(config)?;
    relay.run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_logging();

    let result = match parse_args_from(std::env::args_os()) {
        Ok(cli) => run(cli).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(handle_fatal(&e) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_port_uses_configured_default() {
        let cli = parse_args_from(["chat-relay"]).unwrap();
        assert_eq!(cli.port, None);
    }

    #[test]
    fn test_single_port_argument() {
        let cli = parse_args_from(["chat-relay", "9000"]).unwrap();
        assert_eq!(cli.port, Some(9000));
    }

    #[test]
    fn test_extra_arguments_are_a_usage_error() {
        let err = parse_args_from(["chat-relay", "9000", "9001"]).unwrap_err();
        assert!(matches!(&err, RelayError::Usage(program) if program == "chat-relay"));
        assert_eq!(err.to_string(), "Usage: chat-relay [(optional)port]");
        assert_eq!(handle_fatal(&err), 1);
    }

    #[test]
    fn test_non_numeric_port_is_a_usage_error() {
        let err = parse_args_from(["chat-relay", "seven"]).unwrap_err();
        assert!(matches!(err, RelayError::Usage(_)));
    }
}
