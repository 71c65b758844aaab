use std::time::Duration;

use rag_client_core::{AppViewModel, ConnectivityStatus, QueryError, ResponseView};

use super::constants::*;

/// Lines to print for the transition from `previous` to `view`.
///
/// Only what changed is printed; `None` means nothing has been shown yet.
pub fn render(previous: Option<&AppViewModel>, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let status_changed = previous.is_none_or(|prev| {
        prev.status != view.status
            || prev.probe_failure != view.probe_failure
            || prev.active_base != view.active_base
    });
    if status_changed && view.status != ConnectivityStatus::Unknown {
        lines.push(status_line(view));
    }

    let was_in_flight = previous.is_some_and(|prev| prev.in_flight);
    if view.in_flight && !was_in_flight {
        lines.push(format!("Asking: {}", view.question.trim()));
    }

    let question_changed = previous.is_some_and(|prev| prev.question != view.question);
    if question_changed && !view.in_flight && view.notice.is_none() {
        lines.push(format!(
            "Loaded question: {} (:send to ask it)",
            view.question.trim()
        ));
    }

    let response_changed = previous.is_none_or(|prev| prev.response != view.response);
    if response_changed {
        if let Some(response) = &view.response {
            lines.extend(response_lines(response));
        }
    }

    lines
}

/// Lines explaining why a submission was refused before anything was sent.
pub fn notice_lines(view: &AppViewModel) -> Vec<String> {
    view.notice.iter().map(error_line).collect()
}

pub fn history_lines(view: &AppViewModel) -> Vec<String> {
    if view.history.is_empty() {
        return vec!["History is empty.".to_string()];
    }
    view.history
        .iter()
        .map(|row| {
            format!(
                "#{id:<4} {when}  {latency:>7}  {question}",
                id = row.id,
                when = row.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                latency = format_latency(row.latency),
                question = row.question
            )
        })
        .collect()
}

pub fn help_lines() -> Vec<String> {
    HELP_LINES.iter().map(|line| line.to_string()).collect()
}

fn status_line(view: &AppViewModel) -> String {
    let label = match view.status {
        ConnectivityStatus::Unknown => "Unknown",
        ConnectivityStatus::Checking => "Checking connection...",
        ConnectivityStatus::Online => "Online",
        ConnectivityStatus::OnlineDegraded => "Online (limited)",
        ConnectivityStatus::Blocked => "Blocked",
        ConnectivityStatus::Offline => "Offline",
    };
    let mut line = format!("Status: {label} [{}]", view.active_base);
    if view.via_fallback && view.status.is_connected() {
        line.push_str(" via fallback address");
    }
    if let Some(failure) = view.probe_failure {
        line.push_str(&format!(": {failure}"));
    }
    line
}

fn response_lines(response: &ResponseView) -> Vec<String> {
    match response {
        ResponseView::Answered(result) => {
            let mut lines = vec![RULE.to_string()];
            lines.extend(plain_text(&result.answer).lines().map(str::to_string));
            lines.push(format!(
                "(#{} answered in {})",
                result.id,
                format_latency(result.latency)
            ));
            lines.push(RULE.to_string());
            lines
        }
        ResponseView::Failed(err) => vec![error_line(err)],
    }
}

fn error_line(err: &QueryError) -> String {
    let lead = if err.is_precondition() {
        "Not sent"
    } else {
        "Error"
    };
    format!("{lead}: {err}. {}", err.guidance())
}

/// Drops markdown emphasis so answers read cleanly in a terminal.
pub fn plain_text(markdown: &str) -> String {
    markdown
        .lines()
        .map(|line| {
            let line = line.replace("**", "");
            match line
                .strip_prefix('*')
                .and_then(|inner| inner.strip_suffix('*'))
            {
                Some(inner) if !inner.is_empty() => inner.to_string(),
                _ => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_latency(latency: Duration) -> String {
    format!("{:.2}s", latency.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rag_client_core::{HistoryRowView, ProbeFailure, QueryResult};

    fn online() -> AppViewModel {
        AppViewModel {
            status: ConnectivityStatus::Online,
            active_base: "https://rag.example.com:8443".to_string(),
            ..AppViewModel::default()
        }
    }

    fn answered(id: u64) -> ResponseView {
        ResponseView::Answered(QueryResult {
            id,
            question: "q".to_string(),
            answer: "**Found 1 relevant result(s):**\n\n**1.** Hello\n\n---\n*Search scope: Global*"
                .to_string(),
            latency: Duration::from_millis(1_500),
            completed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        })
    }

    #[test]
    fn first_render_shows_status() {
        assert_eq!(
            render(None, &online()),
            vec!["Status: Online [https://rag.example.com:8443]".to_string()]
        );
    }

    #[test]
    fn unchanged_view_prints_nothing() {
        let view = online();
        assert!(render(Some(&view), &view).is_empty());
    }

    #[test]
    fn failure_reason_follows_status() {
        let before = online();
        let after = AppViewModel {
            status: ConnectivityStatus::Offline,
            probe_failure: Some(ProbeFailure::Timeout),
            ..online()
        };

        assert_eq!(
            render(Some(&before), &after),
            vec![
                "Status: Offline [https://rag.example.com:8443]: service did not respond in time"
                    .to_string()
            ]
        );
    }

    #[test]
    fn answer_is_printed_once_without_markdown() {
        let before = AppViewModel {
            in_flight: true,
            question: "q".to_string(),
            ..online()
        };
        let after = AppViewModel {
            question: "q".to_string(),
            response: Some(answered(4)),
            ..online()
        };

        let lines = render(Some(&before), &after);
        assert_eq!(lines[1], "Found 1 relevant result(s):");
        assert!(lines.contains(&"1. Hello".to_string()));
        assert!(lines.contains(&"Search scope: Global".to_string()));
        assert!(lines.contains(&"(#4 answered in 1.50s)".to_string()));
        assert!(render(Some(&after), &after).is_empty());
    }

    #[test]
    fn failed_query_shows_guidance() {
        let before = AppViewModel {
            in_flight: true,
            ..online()
        };
        let after = AppViewModel {
            response: Some(ResponseView::Failed(QueryError::ServerError(503))),
            ..online()
        };

        assert_eq!(
            render(Some(&before), &after),
            vec![
                "Error: service answered with HTTP 503. Internal server error: try again."
                    .to_string()
            ]
        );
    }

    #[test]
    fn refused_submission_is_marked_as_not_sent() {
        let view = AppViewModel {
            notice: Some(QueryError::Busy),
            ..online()
        };

        assert_eq!(
            notice_lines(&view),
            vec![
                "Not sent: a query is already in progress. Wait for the current query to finish."
                    .to_string()
            ]
        );
        assert!(notice_lines(&online()).is_empty());
    }

    #[test]
    fn selecting_history_loads_question() {
        let before = online();
        let after = AppViewModel {
            question: "holiday rules".to_string(),
            ..online()
        };

        assert_eq!(
            render(Some(&before), &after),
            vec!["Loaded question: holiday rules (:send to ask it)".to_string()]
        );
    }

    #[test]
    fn history_rows_are_listed_newest_first() {
        let view = AppViewModel {
            history: vec![
                HistoryRowView {
                    id: 2,
                    question: "second".to_string(),
                    latency: Duration::from_millis(250),
                    completed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap(),
                },
                HistoryRowView {
                    id: 1,
                    question: "first".to_string(),
                    latency: Duration::from_secs(2),
                    completed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                },
            ],
            ..online()
        };

        assert_eq!(
            history_lines(&view),
            vec![
                "#2    2024-05-01 12:05:00 UTC    0.25s  second".to_string(),
                "#1    2024-05-01 12:00:00 UTC    2.00s  first".to_string(),
            ]
        );
        assert_eq!(
            history_lines(&online()),
            vec!["History is empty.".to_string()]
        );
    }

    #[test]
    fn plain_text_keeps_unbalanced_asterisks() {
        assert_eq!(plain_text("*Source: A - B*"), "Source: A - B");
        assert_eq!(plain_text("* bullet"), "* bullet");
        assert_eq!(plain_text("a * b"), "a * b");
    }
}
