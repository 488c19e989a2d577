//! Port allocation with fallback probing.
//!
//! The tray controller has no IPC channel to the server, so the bound port
//! is persisted as plain text in the data directory for it to read.

use anyhow::{bail, Result};
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// How many consecutive ports are probed, starting at the base port.
pub const PORT_RANGE: u16 = 10;

/// Bind the first free port in `base..base + PORT_RANGE` on all interfaces.
///
/// Every busy port is logged and skipped; exhausting the range is fatal.
pub async fn bind_first_free(base: u16) -> Result<(TcpListener, u16)> {
    // Clamp at the top of the port space rather than wrapping around.
    let last = base.saturating_add(PORT_RANGE - 1);
    for port in base..=last {
        match TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => {
                info!("Bound to port {}", port);
                return Ok((listener, port));
            }
            Err(e) => {
                info!("Port {} is busy ({}). Trying next...", port, e);
            }
        }
    }
    bail!("Could not find an available port in range {}-{}", base, last);
}

/// Persist the bound port for the tray controller.
///
/// A failure here is logged but tolerated: the server is still reachable,
/// the tray just cannot discover the port automatically.
pub fn write_port_file(path: &Path, port: u16) {
    if let Err(e) = std::fs::write(path, port.to_string()) {
        warn!("Could not write port file {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn binds_the_base_port_when_free() {
        // Ephemeral probe to find a free base for the test.
        let probe = TcpListener::bind(("0.0.0.0", 0)).await.expect("bind probe");
        let base = probe.local_addr().expect("addr").port();
        drop(probe);

        let (_listener, port) = bind_first_free(base).await.expect("Failed to bind");
        assert_eq!(port, base);
    }

    #[tokio::test]
    async fn falls_back_to_the_last_port_in_range() {
        let base = 49310;
        // Occupy base..base+9, leaving only the final port free.
        let mut held = Vec::new();
        for port in base..base + PORT_RANGE - 1 {
            held.push(
                TcpListener::bind(("0.0.0.0", port))
                    .await
                    .expect("Failed to occupy port"),
            );
        }

        let (_listener, port) = bind_first_free(base).await.expect("Failed to bind");
        assert_eq!(port, base + PORT_RANGE - 1);
    }

    #[tokio::test]
    async fn exhausted_range_is_fatal() {
        let base = 49330;
        let mut held = Vec::new();
        for port in base..base + PORT_RANGE {
            held.push(
                TcpListener::bind(("0.0.0.0", port))
                    .await
                    .expect("Failed to occupy port"),
            );
        }

        let err = bind_first_free(base).await.expect_err("should exhaust range");
        assert!(err.to_string().contains("available port"));
    }

    #[tokio::test]
    async fn base_at_the_top_of_port_space_does_not_wrap() {
        // A base near u16::MAX probes up to 65535 and stops; it must
        // report either a bind or exhaustion, never wrap to low ports.
        match bind_first_free(u16::MAX).await {
            Ok((_, port)) => assert_eq!(port, u16::MAX),
            Err(e) => assert!(e.to_string().contains("available port")),
        }
    }

    #[tokio::test]
    async fn port_file_round_trips() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("server_port.txt");
        write_port_file(&path, 8090);
        let content = std::fs::read_to_string(&path).expect("Failed to read port file");
        assert_eq!(content, "8090");
    }
}
