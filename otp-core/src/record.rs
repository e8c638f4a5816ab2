//! The `TEXT '\n' KEY` payload record carried in a single frame.

use crate::alphabet::{Symbol, to_bytes};
use crate::error::OtpError;
use crate::mode::Mode;

/// Separator between the text and the key on the wire.
pub const DELIMITER: u8 = b'\n';

/// A text and the key that covers it, held as two separate symbol sequences.
///
/// The key is at least as long as the text; only its first `text.len()`
/// symbols take part in the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRecord {
    text: Vec<Symbol>,
    key: Vec<Symbol>,
}

impl PayloadRecord {
    /// Pairs a text with its key.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::KeyTooShort`] if the key has fewer symbols than the text.
    pub fn new(text: Vec<Symbol>, key: Vec<Symbol>) -> Result<Self, OtpError> {
        if key.len() < text.len() {
            return Err(OtpError::KeyTooShort {
                text_len: text.len(),
                key_len: key.len(),
            });
        }
        Ok(Self { text, key })
    }

    /// Parses a record received from the wire.
    ///
    /// The text ends at the first newline and the key is everything after it.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::MalformedRecord`] if there is no newline,
    /// [`OtpError::InvalidCharacter`] if either side holds a non-alphabet
    /// byte, and [`OtpError::KeyTooShort`] if the key does not cover the text.
    pub fn parse(bytes: &[u8]) -> Result<Self, OtpError> {
        let split = bytes
            .iter()
            .position(|&b| b == DELIMITER)
            .ok_or_else(|| OtpError::MalformedRecord("no newline between text and key".into()))?;

        let text = parse_symbols(&bytes[..split], "received text")?;
        let key = parse_symbols(&bytes[split + 1..], "received key")?;
        Self::new(text, key)
    }

    /// The text symbols.
    #[must_use]
    pub fn text(&self) -> &[Symbol] {
        &self.text
    }

    /// The key symbols, including any beyond the text's length.
    #[must_use]
    pub fn key(&self) -> &[Symbol] {
        &self.key
    }

    /// Number of bytes the daemon answers with: the text length plus the newline.
    #[must_use]
    pub fn reply_len(&self) -> usize {
        self.text.len() + 1
    }

    /// Serializes the record as `TEXT '\n' KEY`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.text.len() + 1 + self.key.len());
        bytes.extend(self.text.iter().map(|s| s.to_byte()));
        bytes.push(DELIMITER);
        bytes.extend(self.key.iter().map(|s| s.to_byte()));
        bytes
    }

    /// Applies `mode` symbol-wise, pairing `text[i]` with `key[i]`.
    #[must_use]
    pub fn transform(&self, mode: Mode) -> Vec<Symbol> {
        self.text
            .iter()
            .zip(&self.key)
            .map(|(&text, &key)| mode.apply(text, key))
            .collect()
    }

    /// The daemon's reply bytes: the transformed text followed by a newline.
    #[must_use]
    pub fn reply(&self, mode: Mode) -> Vec<u8> {
        let mut reply = to_bytes(&self.transform(mode));
        reply.push(DELIMITER);
        reply
    }
}

fn parse_symbols(bytes: &[u8], origin: &str) -> Result<Vec<Symbol>, OtpError> {
    bytes
        .iter()
        .enumerate()
        .map(|(offset, &found)| {
            Symbol::from_byte(found).ok_or_else(|| OtpError::InvalidCharacter {
                origin: origin.to_string(),
                offset,
                found,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(s: &str) -> Vec<Symbol> {
        s.bytes().map(|b| Symbol::from_byte(b).unwrap()).collect()
    }

    #[test]
    fn serializes_text_newline_key() {
        let record = PayloadRecord::new(symbols("HI"), symbols("ABCD")).unwrap();
        assert_eq!(record.to_bytes(), b"HI\nABCD");
        assert_eq!(record.reply_len(), 3);
    }

    #[test]
    fn parse_splits_at_first_newline() {
        let record = PayloadRecord::parse(b"HELLO\nXMCKLQQ").unwrap();
        assert_eq!(record.text(), symbols("HELLO").as_slice());
        assert_eq!(record.key(), symbols("XMCKLQQ").as_slice());
    }

    #[test]
    fn parse_rejects_missing_delimiter() {
        let err = PayloadRecord::parse(b"HELLOXMCKL").unwrap_err();
        assert!(matches!(err, OtpError::MalformedRecord(_)));
    }

    #[test]
    fn parse_rejects_second_newline_in_key() {
        let err = PayloadRecord::parse(b"HI\nAB\nC").unwrap_err();
        assert!(matches!(err, OtpError::InvalidCharacter { offset: 2, found: b'\n', .. }));
    }

    #[test]
    fn short_key_is_rejected() {
        let err = PayloadRecord::new(symbols("HELLO"), symbols("XMC")).unwrap_err();
        assert!(matches!(
            err,
            OtpError::KeyTooShort {
                text_len: 5,
                key_len: 3
            }
        ));
        assert!(PayloadRecord::parse(b"HELLO\nXMC").is_err());
    }

    #[test]
    fn transform_uses_only_leading_key_symbols() {
        let record = PayloadRecord::new(symbols("HELLO"), symbols("XMCKLZZZZ")).unwrap();
        let cipher = record.transform(Mode::Encode);
        assert_eq!(cipher.len(), 5);
        assert_eq!(record.reply(Mode::Encode), b"DQNVZ\n");
    }

    #[test]
    fn empty_text_yields_bare_newline() {
        let record = PayloadRecord::parse(b"\n").unwrap();
        assert!(record.text().is_empty());
        assert_eq!(record.reply(Mode::Decode), b"\n");
    }
}
