//! Encode and decode variants of the daemon and client roles.

use crate::alphabet::{Symbol, decode_symbol, encode_symbol};
use std::fmt;

/// Role tag sent by the encode daemon and expected from the encode client.
pub const ENCODE_TAG: u8 = b't';
/// Role tag sent by the decode daemon and expected from the decode client.
pub const DECODE_TAG: u8 = b'p';

/// Which direction of the transform a daemon or client performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Plaintext plus key to ciphertext.
    Encode,
    /// Ciphertext minus key to plaintext.
    Decode,
}

impl Mode {
    /// The single-byte role tag exchanged during the handshake.
    #[must_use]
    pub const fn role_tag(self) -> u8 {
        match self {
            Self::Encode => ENCODE_TAG,
            Self::Decode => DECODE_TAG,
        }
    }

    /// Applies this mode's transform to one text symbol and its key symbol.
    #[must_use]
    pub const fn apply(self, text: Symbol, key: Symbol) -> Symbol {
        match self {
            Self::Encode => encode_symbol(text, key),
            Self::Decode => decode_symbol(text, key),
        }
    }

    /// Executable name of the client for this mode.
    #[must_use]
    pub const fn client_name(self) -> &'static str {
        match self {
            Self::Encode => "otp_enc",
            Self::Decode => "otp_dec",
        }
    }

    /// Executable name of the daemon for this mode.
    #[must_use]
    pub const fn daemon_name(self) -> &'static str {
        match self {
            Self::Encode => "otp_enc_d",
            Self::Decode => "otp_dec_d",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => f.write_str("encode"),
            Self::Decode => f.write_str("decode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct() {
        assert_eq!(Mode::Encode.role_tag(), b't');
        assert_eq!(Mode::Decode.role_tag(), b'p');
        assert_ne!(Mode::Encode.role_tag(), Mode::Decode.role_tag());
    }

    #[test]
    fn apply_dispatches_by_direction() {
        let h = Symbol::from_byte(b'H').unwrap();
        let x = Symbol::from_byte(b'X').unwrap();
        let cipher = Mode::Encode.apply(h, x);
        assert_eq!(cipher.to_byte(), b'D');
        assert_eq!(Mode::Decode.apply(cipher, x), h);
    }
}
