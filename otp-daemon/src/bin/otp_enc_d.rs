//! Encode daemon: answers `otp_enc` clients with ciphertext.

use otp_core::Mode;
use std::process::ExitCode;

fn main() -> ExitCode {
    otp_daemon::main_for(Mode::Encode)
}
