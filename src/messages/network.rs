//! Network messages - communication between App and Network layers

use crate::builder::RequestSpec;
use crate::error::TransportError;
use crate::models::ResponseResult;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute a resolved HTTP request
    Execute { id: u64, spec: RequestSpec },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// The transport returned a response (any status code)
    Completed { id: u64, result: ResponseResult },
    /// The request was attempted and failed before a response arrived
    Failed { id: u64, error: TransportError },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }
}
