use std::sync::Arc;
use std::time::Duration;

use rag_client_engine::{
    EngineEvent, EngineHandle, HttpMethod, Outcome, Transport, TransportRequest,
};

/// Answers every request with the status encoded in its URL after a delay
/// encoded in its timeout field.
struct ScriptedTransport;

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &TransportRequest) -> Outcome {
        tokio::time::sleep(request.timeout).await;
        let status = request
            .url
            .rsplit('/')
            .next()
            .and_then(|code| code.parse().ok())
            .unwrap_or(200);
        Outcome::Success { status, body: None }
    }
}

fn request(status: u16, delay_ms: u64) -> TransportRequest {
    TransportRequest {
        method: HttpMethod::Get,
        url: format!("http://scripted/{status}"),
        body: None,
        timeout: Duration::from_millis(delay_ms),
    }
}

fn completed(event: Option<EngineEvent<&'static str>>) -> (&'static str, Outcome) {
    match event {
        Some(EngineEvent::Completed { tag, outcome, .. }) => (tag, outcome),
        None => panic!("engine did not report in time"),
    }
}

#[test]
fn completion_carries_tag_and_elapsed_time() {
    client_logging::initialize_for_tests();
    let engine = EngineHandle::with_transport(Arc::new(ScriptedTransport));
    engine.send("probe", request(204, 20));

    match engine.recv_timeout(Duration::from_secs(5)) {
        Some(EngineEvent::Completed {
            tag,
            outcome,
            elapsed,
        }) => {
            assert_eq!(tag, "probe");
            assert_eq!(
                outcome,
                Outcome::Success {
                    status: 204,
                    body: None
                }
            );
            assert!(elapsed >= Duration::from_millis(20));
        }
        None => panic!("engine did not report in time"),
    }
}

#[test]
fn requests_run_concurrently() {
    let engine = EngineHandle::with_transport(Arc::new(ScriptedTransport));
    engine.send("slow query", request(200, 400));
    engine.send("fast probe", request(200, 10));

    let (first, _) = completed(engine.recv_timeout(Duration::from_secs(5)));
    let (second, _) = completed(engine.recv_timeout(Duration::from_secs(5)));
    assert_eq!(first, "fast probe");
    assert_eq!(second, "slow query");
}

#[test]
fn shutdown_abandons_outstanding_requests() {
    let engine = EngineHandle::with_transport(Arc::new(ScriptedTransport));
    engine.send("never", request(200, 300));
    std::thread::sleep(Duration::from_millis(50));
    engine.shutdown();

    assert!(engine.recv_timeout(Duration::from_millis(600)).is_none());
    assert!(engine.try_recv().is_none());
}
