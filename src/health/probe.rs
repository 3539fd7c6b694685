//! TCP reachability probing.
//!
//! # Responsibilities
//! - Attempt a single TCP connect per backend within a timeout
//! - Close the connection immediately on success
//!
//! # Design Decisions
//! - The [`Probe`] trait is the only I/O seam of the validator; tests swap in
//!   an in-memory implementation
//! - No retries: one attempt, then reachable or not

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

/// Reachability check for a `hostname:port` pair.
pub trait Probe: Send + Sync {
    /// Returns true if a connection could be established within `timeout`.
    fn probe(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = bool> + Send;
}

/// Probe backed by a real `TcpStream::connect`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl Probe for TcpProbe {
    fn probe(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = bool> + Send {
        let target = format!("{}:{}", hostname, port);

        async move {
            match time::timeout(timeout, TcpStream::connect(&target)).await {
                Ok(Ok(stream)) => {
                    drop(stream);
                    tracing::debug!(target = %target, "Probe connected");
                    true
                }
                Ok(Err(e)) => {
                    tracing::warn!(target = %target, error = %e, "Probe failed: connection error");
                    false
                }
                Err(_) => {
                    tracing::warn!(target = %target, timeout_ms = timeout.as_millis() as u64, "Probe failed: timeout");
                    false
                }
            }
        }
    }
}
