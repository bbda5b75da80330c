//! Error types for link setup

use std::io;
use std::net::SocketAddr;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors surfaced to callers of the link API
///
/// Only failures that prevent the link from existing at all end up here.
/// Runtime trouble on an established link is absorbed by the session loop:
/// malformed frames are dropped, control-send failures take the same retry
/// path as a lost scale, and staleness shows up as a connectivity event.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The local receive socket could not be bound
    #[error("failed to bind receive socket {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display() {
        let err = LinkError::Bind {
            addr: "0.0.0.0:5555".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };

        let text = err.to_string();
        assert!(text.contains("0.0.0.0:5555"));
        assert!(text.contains("address in use"));
    }

    #[test]
    fn test_bind_error_has_source() {
        let err = LinkError::Bind {
            addr: "0.0.0.0:5555".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert!(std::error::Error::source(&err).is_some());
    }
}
