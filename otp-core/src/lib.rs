// File:    lib.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The main library crate for otp-core: the cipher, the wire protocol, and the daemon and client roles.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # OTP Core Library
//!
//! This library provides the pieces shared by the one-time pad daemons and
//! clients: the 27-symbol alphabet and its modular transform, input
//! validation, the length-prefixed frame codec, the role tag handshake, and
//! the daemon accept loop with its per-connection sessions.

/// The 27-symbol alphabet and the symbol transform.
pub mod alphabet;
/// The client role.
pub mod client;
/// Daemon configuration.
pub mod config;
/// The daemon accept loop.
pub mod daemon;
/// Error types.
pub mod error;
/// Length-prefixed framing over a byte stream.
pub mod frame;
/// The role tag handshake.
pub mod handshake;
/// Encode and decode variants.
pub mod mode;
/// The text and key payload record.
pub mod record;
/// Per-connection session handling.
pub mod session;
/// Validation of text and key files.
pub mod validator;

pub use error::{OtpError, TransportError};
pub use mode::Mode;
