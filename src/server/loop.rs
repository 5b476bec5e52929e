// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the site listener.
///
/// Returns once `signals` requests shutdown. Connections already accepted
/// keep running in their own tasks.
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    while !signals.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = signals.shutdown.notified() => {}
        }
    }

    let in_flight = active_connections.load(Ordering::SeqCst);
    logger::log_info(&format!(
        "Listener on {} closed, {in_flight} connection(s) still in flight",
        listener.local_addr()?
    ));
    Ok(())
}
