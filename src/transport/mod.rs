//! Network input boundary: obtaining raw byte streams from HTTP responses.

pub mod http;

pub use http::{HttpTransport, TransportError};
