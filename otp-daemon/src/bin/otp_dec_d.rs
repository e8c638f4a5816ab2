//! Decode daemon: answers `otp_dec` clients with plaintext.

use otp_core::Mode;
use std::process::ExitCode;

fn main() -> ExitCode {
    otp_daemon::main_for(Mode::Decode)
}
