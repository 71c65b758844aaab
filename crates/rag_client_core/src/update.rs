use client_logging::client_debug;

use crate::effect::RequestTag;
use crate::view_model::ResponseView;
use crate::{probe, submit, AppState, Effect, History, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QuestionChanged(text) => {
            if state.question != text {
                state.question = text;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::QuerySubmitted => match submit::begin_query(&mut state) {
            Ok(request) => {
                state.notice = None;
                vec![Effect::Send {
                    tag: RequestTag::Query,
                    request,
                }]
            }
            Err(err) => {
                client_debug!("Query rejected: {}", err);
                state.notice = Some(err);
                state.mark_dirty();
                Vec::new()
            }
        },
        Msg::ProbeRequested => probe::start_probe(&mut state),
        Msg::ProbeReplied {
            probe_id,
            step,
            reply,
        } => probe::apply_reply(&mut state, probe_id, step, reply),
        Msg::QueryReplied {
            reply,
            latency,
            completed_at,
        } => {
            if !state.in_flight() {
                client_debug!("Dropping query reply with no query in flight");
                return (state, Vec::new());
            }
            match submit::complete_query(&mut state, reply, latency, completed_at) {
                Ok(result) => {
                    state.response = Some(ResponseView::Answered(result));
                    vec![persist(&state)]
                }
                Err(err) => {
                    state.response = Some(ResponseView::Failed(err));
                    Vec::new()
                }
            }
        }
        Msg::HistoryRestored(entries) => {
            state.history = History::from_entries(entries);
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryEntrySelected(id) => {
            if let Some(entry) = state.history.find(id) {
                state.question = entry.question.clone();
                state.notice = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::HistoryCleared => {
            if state.history.clear() {
                state.mark_dirty();
                vec![persist(&state)]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn persist(state: &AppState) -> Effect {
    Effect::PersistHistory(state.history.entries().to_vec())
}
