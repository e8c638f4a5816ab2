//! One accepted connection, served from handshake to close.

use crate::error::{OtpError, TransportError};
use crate::frame::{read_frame, write_payload};
use crate::handshake;
use crate::mode::Mode;
use crate::record::PayloadRecord;
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// A single client connection and everything needed to answer it.
///
/// A session owns its stream exclusively and shares nothing with the accept
/// loop or with other sessions.
#[derive(Debug)]
pub struct Session<S> {
    id: Uuid,
    peer: String,
    stream: S,
    mode: Mode,
    max_frame_len: usize,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an accepted stream. `peer` is only used in log lines.
    pub fn new(stream: S, peer: impl Into<String>, mode: Mode, max_frame_len: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer: peer.into(),
            stream,
            mode,
            max_frame_len,
        }
    }

    /// Identifier attached to this session's log lines.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Serves the session and logs how it ended. Never fails: a broken
    /// session only affects its own connection.
    pub async fn run(self) {
        let id = self.id;
        let peer = self.peer.clone();
        match self.serve().await {
            Ok(len) => info!("session {id} ({peer}): served {len} symbols"),
            Err(OtpError::WrongPeer { expected, received }) => {
                warn!("session {id} ({peer}): rejected peer with role tag {received:?}, expected {expected:?}");
            }
            Err(e) => warn!("session {id} ({peer}): ended with error: {e}"),
        }
    }

    /// Runs the handshake, reads the request frame, transforms it, writes the
    /// reply and closes the stream. Returns the number of symbols transformed.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::WrongPeer`] on a handshake mismatch,
    /// [`OtpError::Transport`] if the stream fails or closes early, and a
    /// validation error if the record is malformed.
    pub async fn serve(mut self) -> Result<usize, OtpError> {
        handshake::accept(&mut self.stream, self.mode).await?;
        debug!("session {}: handshake ok", self.id);

        let raw = read_frame(&mut self.stream, self.max_frame_len).await?;
        let record = PayloadRecord::parse(&raw)?;
        debug!(
            "session {}: {} text symbols, {} key symbols",
            self.id,
            record.text().len(),
            record.key().len()
        );

        let reply = record.reply(self.mode);
        write_payload(&mut self.stream, &reply).await?;
        self.stream.shutdown().await.map_err(TransportError::from)?;
        Ok(record.text().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{read_exact_bytes, write_frame};
    use tokio::io::{AsyncReadExt, duplex};

    #[tokio::test]
    async fn answers_one_request() {
        let (mut client, server) = duplex(64);
        let session = Session::new(server, "test", Mode::Encode, 1024);
        let task = tokio::spawn(session.serve());

        handshake::initiate(&mut client, Mode::Encode).await.unwrap();
        write_frame(&mut client, b"HELLO\nXMCKL").await.unwrap();
        let reply = read_exact_bytes(&mut client, 6).await.unwrap();
        assert_eq!(reply, b"DQNVZ\n");

        assert_eq!(task.await.unwrap().unwrap(), 5);
        // The session closed its end after replying.
        let mut rest = Vec::new();
        client.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn wrong_peer_gets_no_reply() {
        let (mut client, server) = duplex(64);
        let session = Session::new(server, "test", Mode::Decode, 1024);
        let task = tokio::spawn(session.serve());

        let err = handshake::initiate(&mut client, Mode::Encode).await.unwrap_err();
        assert!(matches!(err, OtpError::WrongPeer { .. }));
        assert!(matches!(
            task.await.unwrap().unwrap_err(),
            OtpError::WrongPeer { .. }
        ));
    }

    #[tokio::test]
    async fn invalid_record_ends_session() {
        let (mut client, server) = duplex(64);
        let session = Session::new(server, "test", Mode::Encode, 1024);
        let task = tokio::spawn(session.serve());

        handshake::initiate(&mut client, Mode::Encode).await.unwrap();
        write_frame(&mut client, b"hello\nXMCKL").await.unwrap();
        assert!(matches!(
            task.await.unwrap().unwrap_err(),
            OtpError::InvalidCharacter { .. }
        ));
    }

    #[tokio::test]
    async fn each_session_has_its_own_id() {
        let (_a, server_a) = duplex(8);
        let (_b, server_b) = duplex(8);
        let a = Session::new(server_a, "a", Mode::Encode, 8);
        let b = Session::new(server_b, "b", Mode::Encode, 8);
        assert_ne!(a.id(), b.id());
    }
}
