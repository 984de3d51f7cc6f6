//! Listening socket and accept loop.
//!
//! A [`Server`] is configured with [`ServerBuilder`], bound with [`Server::bind`] and run
//! with [`BoundServer::serve`]. Every accepted socket is served by its own task running an
//! [`HttpConnection`]; the accept loop never waits on a connection.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, error, info, info_span, warn};

use crate::connection::HttpConnection;
use crate::handler::{DefaultHandler, Handler};

pub struct ServerBuilder {
    handler: Option<Arc<dyn Handler>>,
    address: Option<io::Result<Vec<SocketAddr>>>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { handler: None, address: None }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    /// Sets the handler every request is dispatched to. Defaults to [`DefaultHandler`].
    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?.map_err(ServerBuildError::invalid_address)?;
        if address.is_empty() {
            return Err(ServerBuildError::MissingAddress);
        }
        let handler = self.handler.unwrap_or_else(|| Arc::new(DefaultHandler));
        Ok(Server { handler, address })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid address: {source}")]
    InvalidAddress { source: io::Error },
}

impl ServerBuildError {
    fn invalid_address(source: io::Error) -> Self {
        Self::InvalidAddress { source }
    }
}

pub struct Server {
    handler: Arc<dyn Handler>,
    address: Vec<SocketAddr>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub async fn bind(self) -> io::Result<BoundServer> {
        let listener = TcpListener::bind(self.address.as_slice())
            .await
            .inspect_err(|e| error!(cause = %e, address = ?self.address, "bind server error"))?;
        Ok(BoundServer { listener, handler: self.handler })
    }

    /// Binds and serves until the process ends.
    pub async fn start(self) -> io::Result<()> {
        self.bind().await?.serve().await;
        Ok(())
    }
}

/// A server whose socket is listening but which does not accept yet.
pub struct BoundServer {
    listener: TcpListener,
    handler: Arc<dyn Handler>,
}

impl BoundServer {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn serve(self) {
        match self.listener.local_addr() {
            Ok(address) => info!(%address, "start listening"),
            Err(e) => warn!(cause = %e, "start listening at unknown address"),
        }

        loop {
            let (tcp_stream, peer) = match self.listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&self.handler);
            tokio::spawn(serve_connection(tcp_stream, handler).instrument(info_span!("connection", %peer)));
        }
    }
}

async fn serve_connection(tcp_stream: TcpStream, handler: Arc<dyn Handler>) {
    let (reader, writer) = tcp_stream.into_split();
    let connection = HttpConnection::new(reader, writer);
    match connection.process(handler).await {
        Ok(()) => info!("finished process, connection shutdown"),
        Err(e) => error!("service has error, cause {}, connection shutdown", e),
    }
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder").field("has_handler", &self.handler.is_some()).field("address", &self.address).finish()
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server").field("address", &self.address).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for BoundServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundServer").field("listener", &self.listener).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_address() {
        let error = Server::builder().build().unwrap_err();
        assert!(matches!(error, ServerBuildError::MissingAddress));
    }

    #[test]
    fn build_rejects_unparsable_address() {
        let error = Server::builder().address("not an address").build().unwrap_err();
        assert!(matches!(error, ServerBuildError::InvalidAddress { .. }));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn connection_task_can_be_spawned() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let stream = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
        let handler: Arc<dyn Handler> = Arc::new(DefaultHandler);

        let task = serve_connection(stream, handler);
        assert_send(&task);

        // the peer side never writes, closing it ends the task cleanly
        let (peer, _) = listener.accept().await.unwrap();
        drop(peer);
        tokio::spawn(task).await.unwrap();
    }

    #[tokio::test]
    async fn bind_reports_local_addr() {
        let server = Server::builder().address("127.0.0.1:0").build().unwrap().bind().await.unwrap();

        let address = server.local_addr().unwrap();
        assert!(address.ip().is_loopback());
        assert_ne!(address.port(), 0);
    }
}
