// File:    frame.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Length-prefixed framing of payload records over a byte stream.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Frame codec.
//!
//! A frame is a 4-byte little-endian length followed by exactly that many
//! payload bytes. Stream transports have no message boundaries, so reads
//! accumulate until the declared count is reached.

use crate::error::TransportError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Width of the length prefix in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest frame a daemon accepts unless configured otherwise (1 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 1 << 20;

/// Writes `payload` behind its length prefix.
///
/// # Errors
///
/// Returns [`TransportError::FrameTooLarge`] if the payload length does not
/// fit the prefix, or [`TransportError::Io`] if the write fails.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len()).map_err(|_| TransportError::FrameTooLarge {
        declared: payload.len(),
        max: u32::MAX as usize,
    })?;
    writer.write_all(&len.to_le_bytes()).await?;
    write_payload(writer, payload).await
}

/// Writes raw bytes with no prefix, looping over partial writes.
///
/// # Errors
///
/// Returns [`TransportError::Io`] if the write fails.
pub async fn write_payload<W>(writer: &mut W, payload: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame, refusing any declared length above `max_len`.
///
/// # Errors
///
/// Returns [`TransportError::PrematureClose`] if the peer closes before the
/// prefix or the payload is complete, [`TransportError::FrameTooLarge`] for an
/// oversized declaration, and [`TransportError::Io`] on a socket error.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let prefix = read_exact_bytes(reader, LENGTH_PREFIX_LEN).await?;
    let mut raw = [0u8; LENGTH_PREFIX_LEN];
    raw.copy_from_slice(&prefix);
    let declared = u32::from_le_bytes(raw) as usize;

    if declared > max_len {
        return Err(TransportError::FrameTooLarge {
            declared,
            max: max_len,
        });
    }
    read_exact_bytes(reader, declared).await
}

/// Reads exactly `len` bytes, accumulating partial reads.
///
/// # Errors
///
/// Returns [`TransportError::PrematureClose`] on a zero-byte read before
/// `len` bytes have arrived, or [`TransportError::Io`] on a socket error.
pub async fn read_exact_bytes<R>(reader: &mut R, len: usize) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; len];
    let mut received = 0;
    while received < len {
        let n = reader.read(&mut buf[received..]).await?;
        if n == 0 {
            return Err(TransportError::PrematureClose {
                expected: len,
                received,
            });
        }
        received += n;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn frame_crosses_a_small_pipe() {
        // An 8-byte pipe forces both sides through many partial transfers.
        let (mut client, mut server) = duplex(8);
        let payload = b"ATTACK AT DAWN\nQWERTYUIOPASDFGHJKL".to_vec();
        let expected = payload.clone();

        let writer = tokio::spawn(async move { write_frame(&mut client, &payload).await });
        let received = read_frame(&mut server, DEFAULT_MAX_FRAME_LEN).await.unwrap();
        writer.await.unwrap().unwrap();

        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn prefix_is_little_endian() {
        let (mut client, mut server) = duplex(64);
        write_frame(&mut client, b"ABC").await.unwrap();
        let raw = read_exact_bytes(&mut server, 7).await.unwrap();
        assert_eq!(raw, [3, 0, 0, 0, b'A', b'B', b'C']);
    }

    #[tokio::test]
    async fn oversized_declaration_is_refused() {
        let (mut client, mut server) = duplex(64);
        client.write_all(&100u32.to_le_bytes()).await.unwrap();
        let err = read_frame(&mut server, 10).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::FrameTooLarge {
                declared: 100,
                max: 10
            }
        ));
    }

    #[tokio::test]
    async fn close_mid_payload_is_premature() {
        let (mut client, mut server) = duplex(64);
        client.write_all(&10u32.to_le_bytes()).await.unwrap();
        client.write_all(b"ABCD").await.unwrap();
        drop(client);

        let err = read_frame(&mut server, DEFAULT_MAX_FRAME_LEN).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::PrematureClose {
                expected: 10,
                received: 4
            }
        ));
    }

    #[tokio::test]
    async fn close_mid_prefix_is_premature() {
        let (mut client, mut server) = duplex(64);
        client.write_all(&[5, 0]).await.unwrap();
        drop(client);

        let err = read_frame(&mut server, DEFAULT_MAX_FRAME_LEN).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::PrematureClose {
                expected: LENGTH_PREFIX_LEN,
                received: 2
            }
        ));
    }

    #[tokio::test]
    async fn zero_length_frame_is_empty() {
        let (mut client, mut server) = duplex(64);
        write_frame(&mut client, b"").await.unwrap();
        assert!(read_frame(&mut server, 0).await.unwrap().is_empty());
    }
}
