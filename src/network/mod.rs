//! Network layer - HTTP request execution
//!
//! The Network actor receives request commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{ReqwestTransport, Transport};
