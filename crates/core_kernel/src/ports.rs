//! Ports for external collaborators
//!
//! The assessment pipeline talks to several systems it does not own: fact
//! lookups (SSN usage, death registry, claim velocity), the identity
//! cross-match service and the free-text scoring oracle. Each is modelled as a
//! port trait in the domain that consumes it, extending [`DomainPort`], with a
//! mock adapter for tests and offline runs.
//!
//! ```text
//!   EnterpriseAnalyzer ──▶ FactLookupPort      (domain_rules)
//!                     ├──▶ CrossMatchPort      (domain_cases)
//!                     └──▶ ScoringOraclePort   (interface_analyzer)
//! ```
//!
//! All ports return [`PortError`]. Callers on the assessment path treat every
//! port error as non-fatal and substitute a safe default.

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The request was rejected as invalid
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a ServiceUnavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared behind `Arc<dyn _>` between the foreground assessment path
/// and background maintenance, so they must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Result for an in-process adapter that cannot fail
    pub fn healthy(adapter_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: Some(message.into()),
            checked_at: chrono::Utc::now(),
        }
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Claimant", "CLT-123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("CLT-123"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "death_registry_lookup".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());
        assert!(PortError::unavailable("scoring-oracle").is_transient());
        assert!(!PortError::validation("empty text").is_transient());
    }

    #[test]
    fn test_healthy_result() {
        let result = HealthCheckResult::healthy("mock-oracle", "always up");
        assert_eq!(result.status, AdapterHealth::Healthy);
    }
}
