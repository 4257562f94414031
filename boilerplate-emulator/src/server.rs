use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

use apdu_core::error::DeviceError;
use apdu_core::framing;
use log::{info, warn};

use crate::app::App;

/// Answers framed commands on `stream` until the peer closes it.
/// Returns how many commands were handled.
pub fn serve_connection<S: Read + Write>(app: &mut App, stream: &mut S) -> Result<usize, DeviceError> {
    let mut handled = 0;
    while let Some(raw) = framing::read_command_frame(stream)? {
        let answer = app.process(&raw);
        framing::write_answer(stream, &answer)?;
        handled += 1;
    }
    Ok(handled)
}

/// Exposes an [App] on a TCP port with the Speculos APDU framing, one client at a time.
pub struct Server {
    listener: TcpListener,
    app: App,
}

impl Server {
    pub fn bind<A: ToSocketAddrs>(addr: A, app: App) -> Result<Self, DeviceError> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, app })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DeviceError> {
        Ok(self.listener.local_addr()?)
    }

    /// Waits for one client and serves it until it disconnects.
    pub fn accept_one(&mut self) -> Result<usize, DeviceError> {
        let (mut stream, peer) = self.listener.accept()?;
        info!("client connected from {}", peer);
        let handled = serve_connection(&mut self.app, &mut stream)?;
        info!("client {} disconnected after {} commands", peer, handled);
        Ok(handled)
    }

    pub fn run(mut self) -> Result<(), DeviceError> {
        info!("listening for APDUs on {}", self.local_addr()?);
        loop {
            if let Err(e) = self.accept_one() {
                warn!("connection ended with an error: {}", e);
            }
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }
}
