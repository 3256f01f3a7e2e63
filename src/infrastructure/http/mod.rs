//! HTTP transport adapters.

mod transport;

pub use transport::ReqwestTransport;
