//! STDIO transport implementation.
//!
//! Standard input/output transport, the default when running under a
//! conversational MCP client.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve the MCP protocol over stdin/stdout until the client hangs up.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - serving MCP over stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::Service(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
