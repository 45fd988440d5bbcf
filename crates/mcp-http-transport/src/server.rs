//! TCP accept loop adapting [`HttpTransport`] to a real connection.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::transport::HttpTransport;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[from] std::io::Error),
}

pub struct HttpTransportServer {
    bind_address: SocketAddr,
    transport: Arc<HttpTransport>,
}

impl HttpTransportServer {
    pub fn new(bind_address: SocketAddr, transport: Arc<HttpTransport>) -> Self {
        Self { bind_address, transport }
    }

    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind_address)
            .await
            .map_err(|source| ServerError::Bind { addr: self.bind_address, source })?;
        info!("MCP Streamable HTTP transport listening on {}", self.bind_address);

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("accepted connection from {peer_addr}");

            let transport = Arc::clone(&self.transport);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let transport = Arc::clone(&transport);
                    async move { Ok::<_, std::convert::Infallible>(transport.handle(req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    let message = err.to_string();
                    if message.contains("connection closed before message completed") {
                        debug!("client {peer_addr} disconnected: {message}");
                    } else {
                        error!("error serving connection from {peer_addr}: {message}");
                    }
                }
            });
        }
    }
}
