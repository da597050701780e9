//! filedrop Client Library
//!
//! Typed HTTP client for a filedrop upload server.
//!
//! # Example
//!
//! ```rust,no_run
//! use filedrop_client::FiledropClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), filedrop_client::ClientError> {
//!     let client = FiledropClient::new("http://localhost:8080")?;
//!     let reply = client.upload("/upload", "file", "a.txt", b"0123456789".to_vec()).await?;
//!     assert_eq!(reply, "File successfully uploaded\n");
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module runs a router on an ephemeral port:
//!
//! ```rust,ignore
//! use filedrop_client::testing::TestServer;
//!
//! let server = TestServer::start(create_router(state)).await?;
//! server.client.health().await?;
//! ```

mod client;
mod error;
pub mod testing;

pub use client::FiledropClient;
pub use error::{ClientError, Result};

// Re-export multipart types for hand-built forms
pub use reqwest::multipart::{Form, Part};
