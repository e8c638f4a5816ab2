// File:    alphabet.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: The 27-symbol alphabet and the modular symbol transform used by the encode and decode daemons.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! This module contains the alphabet and the symbol-wise cipher operations.

use std::fmt;

/// The ordered alphabet: the 26 uppercase Latin letters followed by the space.
pub const ALPHABET: &[u8; 27] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ ";

/// Number of symbols in [`ALPHABET`]; all index arithmetic is modulo this value.
pub const MODULUS: u8 = 27;

/// A single member of [`ALPHABET`], stored as its index.
///
/// A `Symbol` can only be built from a byte that belongs to the alphabet or
/// from an index in `0..27`, so every operation on it is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Looks up the symbol for an alphabet byte. Membership is exact equality;
    /// lowercase letters, digits and control bytes are rejected.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A'..=b'Z' => Some(Self(byte - b'A')),
            b' ' => Some(Self(MODULUS - 1)),
            _ => None,
        }
    }

    /// Returns the symbol at `index`, or `None` if `index` is not below [`MODULUS`].
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < MODULUS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The position of this symbol in [`ALPHABET`], in `0..27`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The byte this symbol is written as on the wire and in files.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        ALPHABET[self.0 as usize]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.to_byte()))
    }
}

/// Returns `true` if `byte` is a member of [`ALPHABET`].
#[must_use]
pub const fn is_symbol(byte: u8) -> bool {
    Symbol::from_byte(byte).is_some()
}

/// Encodes one symbol: `(index(text) + index(key)) mod 27`.
#[must_use]
pub const fn encode_symbol(text: Symbol, key: Symbol) -> Symbol {
    // Both indices are below 27, so the sum never exceeds 52.
    Symbol((text.0 + key.0) % MODULUS)
}

/// Decodes one symbol: `(index(cipher) - index(key) + 27) mod 27`.
///
/// This is the exact inverse of [`encode_symbol`] for the same key symbol.
#[must_use]
pub const fn decode_symbol(cipher: Symbol, key: Symbol) -> Symbol {
    Symbol((cipher.0 + MODULUS - key.0) % MODULUS)
}

/// Renders a symbol sequence as the bytes it is written with.
#[must_use]
pub fn to_bytes(symbols: &[Symbol]) -> Vec<u8> {
    symbols.iter().map(|s| s.to_byte()).collect()
}
