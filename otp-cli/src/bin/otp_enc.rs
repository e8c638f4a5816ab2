//! Encode client: sends a plaintext file and a key file to `otp_enc_d`.

use otp_core::Mode;
use std::process::ExitCode;

fn main() -> ExitCode {
    otp_cli::main_for(Mode::Encode)
}
