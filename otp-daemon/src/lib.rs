#![deny(missing_docs)]
//! Command-line front end shared by the `otp_enc_d` and `otp_dec_d` daemons.
//!
//! A daemon binds its port, then serves every connection on its own task
//! until the process is terminated from outside.

use clap::{CommandFactory, FromArgMatches, Parser};
use log::error;
use otp_core::Mode;
use otp_core::config::DaemonConfig;
use otp_core::daemon::Daemon;
use std::path::PathBuf;
use std::process::ExitCode;

/// Arguments accepted by both daemons.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Run the encode daemon in the background\notp_enc_d 57171 &\n\n# Use a configuration file\notp_dec_d 57172 --config ./daemon.json\n\nThe configuration file may also be named by the OTP_DAEMON_CONFIG environment variable."
)]
pub struct DaemonArgs {
    /// Port to listen on
    pub port: u16,

    /// JSON configuration file (bind_address, max_sessions, backlog, max_frame_len)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Entry point for the daemon binary of the given mode.
///
/// Returns only if the daemon cannot start; the exit code is then `1`.
#[must_use]
pub fn main_for(mode: Mode) -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let about = match mode {
        Mode::Encode => "Serves otp_enc clients: encodes text with a key and sends it back.",
        Mode::Decode => "Serves otp_dec clients: decodes text with a key and sends it back.",
    };
    let matches = match DaemonArgs::command()
        .name(mode.daemon_name())
        .about(about)
        .try_get_matches()
    {
        Ok(matches) => matches,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(1);
        }
        Err(e) => e.exit(),
    };
    let args = match DaemonArgs::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    let config = match DaemonConfig::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}: {e}", mode.daemon_name());
            return ExitCode::from(e.exit_code());
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{}: could not start runtime: {e}", mode.daemon_name());
            return ExitCode::from(1);
        }
    };

    runtime.block_on(async {
        match Daemon::bind(mode, args.port, config) {
            Ok(daemon) => {
                daemon.run().await;
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}: {e}", mode.daemon_name());
                ExitCode::from(e.exit_code())
            }
        }
    })
}
