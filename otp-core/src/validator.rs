// File:    validator.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Reads a text or key file up to its first newline and checks every byte against the alphabet.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::alphabet::Symbol;
use crate::error::OtpError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads symbols from `reader` up to, but not including, the first newline.
///
/// Anything after the first newline is left unread. The `origin` names the
/// input in error messages.
///
/// # Errors
///
/// Returns [`OtpError::InvalidCharacter`] for the first byte that is not in the
/// alphabet, and [`OtpError::Io`] if the reader fails or ends before a newline.
pub fn read_symbols<R: BufRead>(reader: &mut R, origin: &str) -> Result<Vec<Symbol>, OtpError> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;

    let terminated = line.last() == Some(&b'\n');
    if terminated {
        line.pop();
    }

    // Bytes are checked in order, so a bad character is reported even when
    // the stream also lacks its newline.
    let symbols = line
        .iter()
        .enumerate()
        .map(|(offset, &found)| {
            Symbol::from_byte(found).ok_or_else(|| OtpError::InvalidCharacter {
                origin: origin.to_string(),
                offset,
                found,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !terminated {
        return Err(OtpError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{origin} ends without a terminating newline"),
        )));
    }

    Ok(symbols)
}

/// Opens the file at `path` and validates its first line with [`read_symbols`].
///
/// # Errors
///
/// Returns [`OtpError::InvalidCharacter`] for a non-alphabet byte and
/// [`OtpError::FileIo`] if the file cannot be opened, cannot be read, or has
/// no terminating newline.
pub fn validate_file(path: &Path) -> Result<Vec<Symbol>, OtpError> {
    let file = File::open(path).map_err(|source| OtpError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    read_symbols(&mut reader, &path.display().to_string()).map_err(|e| match e {
        OtpError::Io(source) => OtpError::FileIo {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
