//! Transport service.
//!
//! Runs the configured transport and keeps the storage watch alive for as
//! long as the transport serves clients.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::TransportError;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Runs the MCP server on one transport.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Serve until the transport returns.
    ///
    /// The storage watch runs while the transport is up and is stopped when
    /// it returns, whether or not it failed.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        server.start_watching();

        let result = match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => serve_stdio(server.clone()).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server.clone()).await,
        };

        server.stop_watching();
        result
    }
}

/// Serve a single client over stdin/stdout until it disconnects.
#[cfg(feature = "stdio")]
async fn serve_stdio(server: McpServer) -> TransportResult<()> {
    use rmcp::ServiceExt;

    info!(
        "Ready - serving prompts from {} via stdin/stdout",
        server.config().prompts.storage_dir.display()
    );

    let session = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(TransportError::session)?;
    let reason = session.waiting().await.map_err(TransportError::session)?;

    info!("STDIO session ended: {:?}", reason);
    Ok(())
}
