//! Transport layer for the MCP server.
//!
//! MCP clients speak to this server over standard input/output; the stdio
//! transport handles the connection lifecycle and delegates message
//! processing to the server handler. All logging goes to stderr so stdout
//! stays a clean protocol channel.

mod error;
mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
