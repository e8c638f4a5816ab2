//! One-byte role tag exchange performed right after a connection opens.
//!
//! Each side checks the tag it receives on its own, so an encode client can
//! never be served by a decode daemon or the other way round. The tag is an
//! identity check only; any peer that sends the right byte passes.

use crate::error::{OtpError, TransportError};
use crate::frame::{read_exact_bytes, write_payload};
use crate::mode::Mode;
use tokio::io::{AsyncRead, AsyncWrite};

/// Daemon side: send our tag, then read and check the client's.
///
/// # Errors
///
/// Returns [`OtpError::WrongPeer`] if the client's tag belongs to the other
/// mode, or [`OtpError::Transport`] if the exchange itself fails.
pub async fn accept<S>(stream: &mut S, mode: Mode) -> Result<(), OtpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let tag = mode.role_tag();
    write_payload(stream, &[tag]).await?;
    let received = read_tag(stream).await?;
    verify(tag, received)
}

/// Client side: read the daemon's tag, send ours, then check the daemon's.
///
/// Our tag is sent before checking so the daemon also sees the mismatch.
///
/// # Errors
///
/// Returns [`OtpError::WrongPeer`] if the daemon serves the other mode, or
/// [`OtpError::Transport`] if the exchange itself fails.
pub async fn initiate<S>(stream: &mut S, mode: Mode) -> Result<(), OtpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let tag = mode.role_tag();
    let received = read_tag(stream).await?;
    write_payload(stream, &[tag]).await?;
    verify(tag, received)
}

async fn read_tag<S>(stream: &mut S) -> Result<u8, TransportError>
where
    S: AsyncRead + Unpin,
{
    let byte = read_exact_bytes(stream, 1).await?;
    Ok(byte[0])
}

fn verify(expected: u8, received: u8) -> Result<(), OtpError> {
    if expected == received {
        Ok(())
    } else {
        Err(OtpError::WrongPeer {
            expected: char::from(expected),
            received: char::from(received),
        })
    }
}
