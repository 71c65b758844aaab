use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use client_logging::{client_debug, client_error};
use tokio_util::sync::CancellationToken;

use crate::transport::{ReqwestTransport, Transport, TransportSettings};
use crate::{EngineEvent, TransportRequest};

enum EngineCommand<T> {
    Send { tag: T, request: TransportRequest },
}

/// Runs requests on a background tokio runtime and reports completions.
///
/// `T` is an opaque tag handed back with each completion so the caller can
/// route it. Requests run concurrently; each is bounded by its own timeout.
pub struct EngineHandle<T> {
    cmd_tx: mpsc::Sender<EngineCommand<T>>,
    event_rx: mpsc::Receiver<EngineEvent<T>>,
    shutdown: CancellationToken,
}

impl<T: Send + 'static> EngineHandle<T> {
    pub fn new(settings: TransportSettings) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new(settings)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand<T>>();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    client_error!("Could not start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                if token.is_cancelled() {
                    break;
                }
                let transport = transport.clone();
                let event_tx = event_tx.clone();
                let token = token.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = handle_command(transport.as_ref(), command, event_tx) => {}
                    }
                });
            }
            client_debug!("Engine command loop finished");
            runtime.shutdown_timeout(Duration::from_millis(200));
        });

        Self {
            cmd_tx,
            event_rx,
            shutdown,
        }
    }

    pub fn send(&self, tag: T, request: TransportRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Send { tag, request });
    }

    pub fn try_recv(&self) -> Option<EngineEvent<T>> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent<T>> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Abandons outstanding requests. Their completions are never reported.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<T> Drop for EngineHandle<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_command<T>(
    transport: &dyn Transport,
    command: EngineCommand<T>,
    event_tx: mpsc::Sender<EngineEvent<T>>,
) {
    match command {
        EngineCommand::Send { tag, request } => {
            let started = Instant::now();
            let outcome = transport.send(&request).await;
            let elapsed = started.elapsed();
            client_debug!(
                "{} {} -> {} in {} ms",
                request.method,
                request.url,
                outcome,
                elapsed.as_millis()
            );
            let _ = event_tx.send(EngineEvent::Completed {
                tag,
                outcome,
                elapsed,
            });
        }
    }
}
