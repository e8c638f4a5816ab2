//! The client role: validate two files, send them to a daemon, return its answer.

use crate::error::OtpError;
use crate::frame::{read_exact_bytes, write_frame};
use crate::handshake;
use crate::mode::Mode;
use crate::record::PayloadRecord;
use crate::validator::validate_file;
use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use std::path::Path;

/// Host the clients dial unless told otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Validates the text and key files and pairs them into a record.
///
/// Nothing touches the network here, so every failure is local.
///
/// # Errors
///
/// Returns [`OtpError::InvalidCharacter`] or [`OtpError::FileIo`] if either
/// file fails validation, and [`OtpError::KeyTooShort`] if the key does not
/// cover the text.
pub fn prepare(text_path: &Path, key_path: &Path) -> Result<PayloadRecord, OtpError> {
    let text = validate_file(text_path)?;
    let key = validate_file(key_path)?;
    debug!("validated {} text symbols and {} key symbols", text.len(), key.len());
    PayloadRecord::new(text, key)
}

/// Connects to the daemon at `host:port` and exchanges `record` with it.
///
/// Returns the daemon's reply, the transformed text followed by a newline.
///
/// # Errors
///
/// Returns [`OtpError::ConnectFailed`] if the daemon cannot be reached,
/// [`OtpError::WrongPeer`] if it serves the other mode, and
/// [`OtpError::Transport`] if the exchange is cut short.
pub async fn request(mode: Mode, host: &str, port: u16, record: &PayloadRecord) -> Result<Vec<u8>, OtpError> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| OtpError::ConnectFailed {
            host: host.to_string(),
            port,
            source,
        })?;
    debug!("connected to {host}:{port}");
    exchange(&mut stream, mode, record).await
}

/// Runs the client side of one session over an already open stream.
///
/// # Errors
///
/// Returns [`OtpError::WrongPeer`] on a handshake mismatch and
/// [`OtpError::Transport`] if the stream fails or closes early.
pub async fn exchange<S>(stream: &mut S, mode: Mode, record: &PayloadRecord) -> Result<Vec<u8>, OtpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    handshake::initiate(stream, mode).await?;
    write_frame(stream, &record.to_bytes()).await?;
    let reply = read_exact_bytes(stream, record.reply_len()).await?;
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use std::fs;
    use tokio::io::duplex;

    #[test]
    fn prepare_rejects_short_key_before_any_connection() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("plain");
        let key = dir.path().join("key");
        fs::write(&text, "HELLO WORLD\n").unwrap();
        fs::write(&key, "ABC\n").unwrap();

        let err = prepare(&text, &key).unwrap_err();
        assert!(matches!(err, OtpError::KeyTooShort { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn prepare_rejects_bad_key_character() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("plain");
        let key = dir.path().join("key");
        fs::write(&text, "HELLO\n").unwrap();
        fs::write(&key, "XMCK1\n").unwrap();

        let err = prepare(&text, &key).unwrap_err();
        assert!(matches!(err, OtpError::InvalidCharacter { offset: 4, found: b'1', .. }));
    }

    #[tokio::test]
    async fn exchange_against_an_in_memory_session() {
        let (mut client, server) = duplex(16);
        tokio::spawn(Session::new(server, "mem", Mode::Decode, 1024).run());

        let record = PayloadRecord::parse(b"DQNVZ\nXMCKL").unwrap();
        let reply = exchange(&mut client, Mode::Decode, &record).await.unwrap();
        assert_eq!(reply, b"HELLO\n");
    }

    #[tokio::test]
    async fn closed_port_is_connect_failed() {
        // Bind then drop a listener to find a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let record = PayloadRecord::parse(b"A\nB").unwrap();
        let err = request(Mode::Encode, DEFAULT_HOST, port, &record).await.unwrap_err();
        assert!(matches!(err, OtpError::ConnectFailed { port: p, .. } if p == port));
        assert_eq!(err.exit_code(), 2);
    }
}
