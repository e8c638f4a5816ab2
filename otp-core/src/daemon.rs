// File:    daemon.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: The listening daemon: binds the endpoint and hands every accepted connection to its own session task.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The accept loop shared by the encode and decode daemons.

use crate::config::DaemonConfig;
use crate::error::OtpError;
use crate::mode::Mode;
use crate::session::Session;
use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;

/// Pause after a failed `accept` so a persistent error does not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// A bound daemon, ready to serve.
#[derive(Debug)]
pub struct Daemon {
    listener: TcpListener,
    mode: Mode,
    config: DaemonConfig,
    slots: Arc<Semaphore>,
}

impl Daemon {
    /// Binds the listening endpoint on `port` (0 picks an ephemeral port).
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Bind`] if the socket cannot be created, bound or
    /// put into listening mode.
    pub fn bind(mode: Mode, port: u16, config: DaemonConfig) -> Result<Self, OtpError> {
        let addr = SocketAddr::new(config.bind_address, port);
        let listener = listen(addr, config.backlog).map_err(|source| OtpError::Bind { addr, source })?;
        let slots = Arc::new(Semaphore::new(config.max_sessions));
        Ok(Self {
            listener,
            mode,
            config,
            slots,
        })
    }

    /// The address actually bound, useful when binding port 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket's address cannot be queried.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, serving each on its own task.
    ///
    /// A session slot is taken before `accept` is called, so when all slots
    /// are busy further connections wait in the kernel backlog until one
    /// frees up. Session failures are logged and never stop the loop.
    pub async fn run(self) {
        match self.local_addr() {
            Ok(addr) => info!(
                "{} listening on {addr} ({} session slots)",
                self.mode.daemon_name(),
                self.config.max_sessions
            ),
            Err(e) => warn!("{} listening on unknown address: {e}", self.mode.daemon_name()),
        }

        loop {
            let Ok(permit) = Arc::clone(&self.slots).acquire_owned().await else {
                error!("session slots were closed; accept loop stopping");
                return;
            };

            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let session = Session::new(stream, peer.to_string(), self.mode, self.config.max_frame_len);
                    info!("session {} accepted from {peer}", session.id());
                    tokio::spawn(async move {
                        session.run().await;
                        drop(permit);
                    });
                }
                Err(e) => {
                    warn!("accept failed: {e}");
                    drop(permit);
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                }
            }
        }
    }
}

fn listen(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn loopback() -> DaemonConfig {
        DaemonConfig {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            ..DaemonConfig::default()
        }
    }

    #[tokio::test]
    async fn binds_an_ephemeral_port() {
        let daemon = Daemon::bind(Mode::Encode, 0, loopback()).unwrap();
        assert_ne!(daemon.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn port_in_use_is_a_bind_error() {
        let first = Daemon::bind(Mode::Encode, 0, loopback()).unwrap();
        let port = first.local_addr().unwrap().port();

        // SO_REUSEADDR does not allow two listeners on one port.
        let err = Daemon::bind(Mode::Decode, port, loopback()).unwrap_err();
        assert!(matches!(err, OtpError::Bind { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
