//! `uhf` - configure a UHFReader18 over a serial link.

mod shell;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uhf_reader18::{BROADCAST_ADDRESS, DEFAULT_BAUD_RATE, SerialTransport, UhfReader18};

use shell::{Flow, Shell};

/// Query and configure a UHFReader18 RFID reader.
#[derive(Parser)]
#[command(name = "uhf", version)]
struct Cli {
    /// Serial device the reader is attached to
    port: String,

    /// Baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Give up waiting for a reply after this many milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Reader address used by `mode` (0xff reaches any reader)
    #[arg(long, value_parser = shell::parse_address, default_value_t = BROADCAST_ADDRESS)]
    address: u8,

    /// Log protocol traffic to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Run a single shell command and exit, e.g. `power 20`
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let transport =
        match SerialTransport::new(&cli.port, cli.baud, Duration::from_millis(cli.timeout_ms)) {
            Ok(transport) => transport,
            Err(e) => {
                eprintln!("error: cannot open {}: {}", cli.port, e);
                return ExitCode::from(2);
            }
        };
    log::info!("Opened {} at {} baud", cli.port, cli.baud);

    let mut shell = Shell::new(UhfReader18::new(transport), cli.address, std::io::stdout());

    let result = if cli.command.is_empty() {
        shell.run(std::io::stdin().lock()).map(|_| Flow::Continue)
    } else {
        shell.handle_line(&cli.command.join(" "))
    };

    match result {
        Ok(Flow::Failed) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
