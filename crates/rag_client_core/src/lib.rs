//! RAG client core: pure session state machine and view-model helpers.
//!
//! Nothing in this crate performs I/O. Hosts feed [`Msg`] values into
//! [`update`], execute the returned [`Effect`]s and render [`AppState::view`].
mod answer;
mod config;
mod effect;
mod error;
mod history;
mod msg;
mod probe;
mod state;
mod status;
mod submit;
mod update;
mod view_model;

pub use answer::{synthesize_answer, ResultEntry, SourceMetadata, NO_RESULTS_MESSAGE};
pub use config::{
    ConfigError, EndpointConfig, RequestContract, DEFAULT_FALLBACK_BASE, DEFAULT_PRIMARY_BASE,
    DIAGNOSTIC_TIMEOUT, HEALTH_PATH, PROBE_INTERVAL, PROBE_TIMEOUT, QUERY_PATH, QUERY_TIMEOUT,
};
pub use effect::{Effect, Method, Request, RequestTag};
pub use error::QueryError;
pub use history::{EntryId, History, QueryResult, HISTORY_LIMIT};
pub use msg::{Msg, Reply};
pub use probe::{ProbeId, ProbeStep};
pub use state::AppState;
pub use status::{ConnectivityStatus, ProbeFailure};
pub use submit::{begin_query, complete_query};
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView, ResponseView};
