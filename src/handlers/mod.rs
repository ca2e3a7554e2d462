//! Content handlers.
//!
//! # Data Flow
//! ```text
//! Access-checked PathInfo + canonical path
//!     → chain.rs (try handlers in registration order)
//!     → static_file.rs (default: serve bytes with a guessed MIME type)
//!     → Return: response, or None when every handler declined
//! ```

pub mod chain;
pub mod static_file;

pub use chain::{ContentHandler, HandlerChain, HandlerError};
pub use static_file::StaticFileHandler;
