//! Decode client: sends a ciphertext file and a key file to `otp_dec_d`.

use otp_core::Mode;
use std::process::ExitCode;

fn main() -> ExitCode {
    otp_cli::main_for(Mode::Decode)
}
