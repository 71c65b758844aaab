use std::io::{self, BufRead};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use client_logging::{client_info, client_warn};
use rag_client_core::{update, AppState, AppViewModel, EndpointConfig, Msg};
use rag_client_engine::{ensure_storage_dir, FileStore};

use super::config::{load_endpoint_config, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui::input::{parse_line, Command};
use super::ui::render;

const STORAGE_DIRNAME: &str = ".rag_client";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

enum HostEvent {
    Input(Command),
    InputClosed,
    ProbeTimer,
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let cwd = std::env::current_dir().context("could not resolve the working directory")?;
    let config = load_endpoint_config(&cwd.join(CONFIG_FILENAME));
    let storage = cwd.join(STORAGE_DIRNAME);
    if let Err(err) = ensure_storage_dir(&storage) {
        client_warn!("History will not be saved to {:?}: {}", storage, err);
    }
    let store = FileStore::new(storage);
    let history = persistence::load_history(&store);
    let probe_interval = config.probe_interval;

    let mut session = Session::new(config, EffectRunner::new(store));

    let (host_tx, host_rx) = mpsc::channel::<HostEvent>();
    spawn_input_thread(host_tx.clone());
    spawn_probe_timer(host_tx, probe_interval);

    print_lines(render::help_lines());
    print_lines(session.dispatch_all(vec![Msg::HistoryRestored(history), Msg::ProbeRequested]));

    loop {
        match host_rx.try_recv() {
            Ok(HostEvent::Input(command)) => match session.handle_command(command) {
                Some(lines) => print_lines(lines),
                None => break,
            },
            Ok(HostEvent::ProbeTimer) => {
                print_lines(session.dispatch_all(vec![Msg::ProbeRequested]));
            }
            Ok(HostEvent::InputClosed) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }
        print_lines(session.await_completions(POLL_INTERVAL));
    }

    session.shutdown();
    client_info!("Session ended");
    Ok(())
}

/// Owns the one `AppState` of the process and everything that acts on it.
struct Session {
    state: AppState,
    shown: Option<AppViewModel>,
    runner: EffectRunner,
}

impl Session {
    fn new(config: EndpointConfig, runner: EffectRunner) -> Self {
        Self {
            state: AppState::with_config(config),
            shown: None,
            runner,
        }
    }

    /// Applies `msgs` in order and returns the lines describing what changed.
    fn dispatch_all(&mut self, msgs: Vec<Msg>) -> Vec<String> {
        let mut dirty = false;
        for msg in msgs {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            dirty |= state.consume_dirty();
            self.state = state;
            self.runner.enqueue(effects);
        }

        if !dirty {
            return Vec::new();
        }
        let view = self.state.view();
        let lines = render::render(self.shown.as_ref(), &view);
        self.shown = Some(view);
        lines
    }

    /// Waits up to `timeout` for a completed request, then applies every
    /// completion that is ready.
    fn await_completions(&mut self, timeout: Duration) -> Vec<String> {
        let Some(first) = self.runner.wait(timeout) else {
            return Vec::new();
        };
        let mut lines = self.dispatch_all(vec![first]);
        while let Some(msg) = self.runner.poll() {
            lines.extend(self.dispatch_all(vec![msg]));
        }
        lines
    }

    /// `None` when the user asked to leave.
    fn handle_command(&mut self, command: Command) -> Option<Vec<String>> {
        let lines = match command {
            Command::Ask(question) => {
                self.submit(vec![Msg::QuestionChanged(question), Msg::QuerySubmitted])
            }
            Command::Send => self.submit(vec![Msg::QuerySubmitted]),
            Command::Probe => self.dispatch_all(vec![Msg::ProbeRequested]),
            Command::ShowHistory => render::history_lines(&self.state.view()),
            Command::Use(id) => {
                if self.state.history().find(id).is_some() {
                    self.dispatch_all(vec![Msg::HistoryEntrySelected(id)])
                } else {
                    vec![format!("No history entry #{id}.")]
                }
            }
            Command::Clear => {
                let mut lines = self.dispatch_all(vec![Msg::HistoryCleared]);
                lines.push("History cleared.".to_string());
                lines
            }
            Command::Help => render::help_lines(),
            Command::Quit => return None,
            Command::Blank => Vec::new(),
            Command::Invalid(reason) => vec![reason],
        };
        Some(lines)
    }

    fn submit(&mut self, msgs: Vec<Msg>) -> Vec<String> {
        let mut lines = self.dispatch_all(msgs);
        lines.extend(render::notice_lines(&self.state.view()));
        lines
    }

    fn shutdown(&self) {
        self.runner.shutdown();
    }
}

fn spawn_input_thread(host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if host_tx.send(HostEvent::Input(parse_line(&line))).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    client_warn!("Stopped reading input: {}", err);
                    break;
                }
            }
        }
        let _ = host_tx.send(HostEvent::InputClosed);
    });
}

fn spawn_probe_timer(host_tx: mpsc::Sender<HostEvent>, interval: Duration) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if host_tx.send(HostEvent::ProbeTimer).is_err() {
            break;
        }
    });
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rag_client_core::{QueryResult, RequestContract};
    use tempfile::TempDir;

    fn session(temp: &TempDir) -> Session {
        let config = EndpointConfig {
            contract: RequestContract::Simple,
            ..EndpointConfig::with_bases("http://127.0.0.1:9", None)
        };
        Session::new(config, EffectRunner::new(FileStore::new(temp.path().to_path_buf())))
    }

    fn entry(id: u64, question: &str) -> QueryResult {
        QueryResult {
            id,
            question: question.to_string(),
            answer: "answer".to_string(),
            latency: Duration::from_millis(300),
            completed_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn question_before_first_probe_is_refused_with_guidance() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);

        let lines = session
            .handle_command(Command::Ask("anyone there?".to_string()))
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "Not sent: not connected to the query service. The service is not connected. \
                 Check the connection status and retry."
                    .to_string()
            ]
        );
        assert!(!session.state.in_flight());
    }

    #[test]
    fn history_commands_act_on_restored_entries() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        session.dispatch_all(vec![Msg::HistoryRestored(vec![
            entry(2, "second"),
            entry(1, "first"),
        ])]);

        assert_eq!(
            session.handle_command(Command::Use(1)).unwrap(),
            vec!["Loaded question: first (:send to ask it)".to_string()]
        );
        assert_eq!(
            session.handle_command(Command::Use(9)).unwrap(),
            vec!["No history entry #9.".to_string()]
        );
        assert_eq!(session.handle_command(Command::ShowHistory).unwrap().len(), 2);

        session.handle_command(Command::Clear).unwrap();
        assert!(session.state.history().is_empty());
        let stored = FileStore::new(temp.path().to_path_buf());
        assert!(persistence::try_load_history(&stored).unwrap().is_empty());
    }

    #[test]
    fn unreachable_service_settles_offline_after_waiting() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        session.dispatch_all(vec![Msg::ProbeRequested]);

        let lines = session.await_completions(Duration::from_secs(10));

        assert_eq!(
            session.state.status(),
            rag_client_core::ConnectivityStatus::Offline
        );
        assert!(lines.iter().any(|line| line.starts_with("Status: Offline")));
        session.shutdown();
    }

    #[test]
    fn quit_ends_the_session() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        assert!(session.handle_command(Command::Quit).is_none());
        session.shutdown();
    }
}
