use rag_client_core::{update, AppState, Msg};

#[test]
fn repeating_the_same_question_is_noop() {
    let (mut state, _) = update(AppState::new(), Msg::QuestionChanged("hours?".into()));
    assert!(state.consume_dirty());

    let (mut next, effects) = update(state.clone(), Msg::QuestionChanged("hours?".into()));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn clearing_empty_history_leaves_state_untouched() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::HistoryCleared);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn selecting_unknown_entry_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::HistoryEntrySelected(42));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
