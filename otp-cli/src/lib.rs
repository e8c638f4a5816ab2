#![deny(missing_docs)]
//! Command-line front end shared by the `otp_enc` and `otp_dec` clients.
//!
//! Both clients take a text file, a key file and a daemon port, validate the
//! files locally, and print the daemon's answer to standard output.

use clap::{CommandFactory, FromArgMatches, Parser};
use log::debug;
use otp_core::client::{self, DEFAULT_HOST};
use otp_core::{Mode, OtpError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Arguments accepted by both clients.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Encode a message with a key on a daemon listening on port 57171\notp_enc plaintext mykey 57171 > ciphertext\n\n# Decode it again through the decode daemon\notp_dec ciphertext mykey 57172 > plaintext\n\nEXIT STATUS:\n  0  success\n  1  bad input: invalid character, key too short, unreadable file\n  2  could not connect, or reached the wrong daemon"
)]
pub struct ClientArgs {
    /// File holding the text, terminated by a newline
    pub text: PathBuf,

    /// File holding the key, at least as long as the text
    pub key: PathBuf,

    /// Port the daemon listens on
    pub port: u16,

    /// Host the daemon runs on
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
}

/// Entry point for the client binary of the given mode.
#[must_use]
pub fn main_for(mode: Mode) -> ExitCode {
    env_logger::init();

    let about = match mode {
        Mode::Encode => "Asks an otp_enc_d daemon to encode a text file with a key file.",
        Mode::Decode => "Asks an otp_dec_d daemon to decode a text file with a key file.",
    };
    let matches = ClientArgs::command()
        .name(mode.client_name())
        .about(about)
        .get_matches();
    let args = ClientArgs::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    match run(mode, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_remote() {
                eprintln!("{}: error on port {}: {e}", mode.client_name(), args.port);
            } else {
                eprintln!("{}: error: {e}", mode.client_name());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Validates the input files, performs one exchange with the daemon and
/// writes its reply to standard output.
///
/// # Errors
///
/// Returns the first [`OtpError`] encountered; local validation always runs
/// before any connection is attempted.
pub fn run(mode: Mode, args: &ClientArgs) -> Result<(), OtpError> {
    let record = client::prepare(&args.text, &args.key)?;
    debug!(
        "{} sending {} symbols to {}:{}",
        mode.client_name(),
        record.text().len(),
        args.host,
        args.port
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let reply = runtime.block_on(client::request(mode, &args.host, args.port, &record))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&reply)?;
    stdout.flush()?;
    Ok(())
}
