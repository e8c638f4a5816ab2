// File:    error.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Error taxonomy shared by the daemons and clients.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Errors raised by validation, framing, the handshake and the client and daemon roles.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the byte-stream transport during framing or the handshake.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the stream before the declared byte count arrived.
    #[error("peer closed the connection after {received} of {expected} bytes")]
    PrematureClose {
        /// Bytes the reader was waiting for.
        expected: usize,
        /// Bytes accumulated before the close.
        received: usize,
    },

    /// A frame declared a length above the configured maximum.
    #[error("frame of {declared} bytes exceeds the {max} byte limit")]
    FrameTooLarge {
        /// Length announced by the frame's prefix (or the outgoing payload size).
        declared: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The underlying socket read or write failed.
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// Every failure a client process or a daemon session can end with.
#[derive(Debug, Error)]
pub enum OtpError {
    /// A text, key or record contained a byte outside the alphabet.
    #[error("invalid character 0x{found:02X} at offset {offset} in {origin}")]
    InvalidCharacter {
        /// Where the byte came from (a file path, or the received record).
        origin: String,
        /// Offset of the byte within its line.
        offset: usize,
        /// The offending byte.
        found: u8,
    },

    /// The key has fewer symbols than the text it must cover.
    #[error("key too short: {key_len} symbols for {text_len} symbols of text")]
    KeyTooShort {
        /// Symbols in the text.
        text_len: usize,
        /// Symbols in the key.
        key_len: usize,
    },

    /// An input file could not be opened or read, or ended before its newline.
    #[error("could not read {}: {source}", .path.display())]
    FileIo {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A local I/O failure outside of the network stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A received payload did not have the `TEXT '\n' KEY` shape.
    #[error("malformed payload record: {0}")]
    MalformedRecord(String),

    /// The daemon's endpoint could not be reached.
    #[error("could not connect to {host} on port {port}: {source}")]
    ConnectFailed {
        /// Host name or address that was dialled.
        host: String,
        /// Port that was dialled.
        port: u16,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The peer answered the handshake with another role's tag.
    #[error("peer sent role tag {received:?}, expected {expected:?}")]
    WrongPeer {
        /// Tag a correctly matched peer would have sent.
        expected: char,
        /// Tag actually received.
        received: char,
    },

    /// Sending or receiving a frame failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The daemon's listening endpoint could not be created.
    #[error("could not listen on {addr}: {source}")]
    Bind {
        /// Address the daemon tried to bind.
        addr: SocketAddr,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The daemon configuration file could not be loaded.
    #[error("invalid configuration in {}: {message}", .path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },
}

impl OtpError {
    /// Process exit code for a client that fails with this error.
    ///
    /// Local validation and file failures exit with `1`; failures at the
    /// remote boundary (connecting, the handshake, the transport) exit with `2`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidCharacter { .. }
            | Self::KeyTooShort { .. }
            | Self::FileIo { .. }
            | Self::Io(_)
            | Self::MalformedRecord(_)
            | Self::Bind { .. }
            | Self::Config { .. } => 1,
            Self::ConnectFailed { .. } | Self::WrongPeer { .. } | Self::Transport(_) => 2,
        }
    }

    /// Returns `true` for failures at the remote boundary.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.exit_code() == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_failures_exit_with_one() {
        let err = OtpError::KeyTooShort {
            text_len: 5,
            key_len: 3,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(!err.is_remote());

        let err = OtpError::InvalidCharacter {
            origin: "plain".into(),
            offset: 2,
            found: b'a',
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "invalid character 0x61 at offset 2 in plain");
    }

    #[test]
    fn remote_failures_exit_with_two() {
        let err = OtpError::ConnectFailed {
            host: "127.0.0.1".into(),
            port: 57_171,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("57171"));

        let err = OtpError::WrongPeer {
            expected: 't',
            received: 'p',
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "peer sent role tag 'p', expected 't'");

        let err = OtpError::from(TransportError::PrematureClose {
            expected: 10,
            received: 4,
        });
        assert!(err.is_remote());
    }
}
