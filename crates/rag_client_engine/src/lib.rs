//! RAG client engine: HTTP transport, request execution and local storage.
mod classify;
mod engine;
mod persist;
mod transport;
mod types;

pub use classify::{
    default_classifier, default_cross_origin_classifier, CrossOriginClassifier, FailureSignature,
};
pub use engine::EngineHandle;
pub use persist::{ensure_storage_dir, FileStore, PersistError};
pub use transport::{ReqwestTransport, Transport, TransportSettings};
pub use types::{EngineEvent, HttpMethod, Outcome, TransportRequest};
