use rag_client_core::EntryId;

use super::constants::*;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Probe,
    ShowHistory,
    Use(EntryId),
    Send,
    Clear,
    Help,
    Quit,
    Blank,
    Invalid(String),
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Blank;
    }

    let Some(rest) = trimmed.strip_prefix(CMD_PREFIX) else {
        return Command::Ask(trimmed.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let argument = parts.next();
    match (name.as_str(), argument) {
        (CMD_PROBE, None) => Command::Probe,
        (CMD_HISTORY, None) => Command::ShowHistory,
        (CMD_SEND, None) => Command::Send,
        (CMD_CLEAR, None) => Command::Clear,
        (CMD_HELP, None) => Command::Help,
        (CMD_QUIT, None) => Command::Quit,
        (CMD_USE, Some(id)) => match id.parse::<EntryId>() {
            Ok(id) if parts.next().is_none() => Command::Use(id),
            _ => Command::Invalid(format!("'{id}' is not a history id")),
        },
        (CMD_USE, None) => Command::Invalid("usage: :use <id>".to_string()),
        _ => Command::Invalid(format!("unknown command '{trimmed}', try :help")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse_line("  what is the vacation policy?\n"),
            Command::Ask("what is the vacation policy?".to_string())
        );
        assert_eq!(parse_line("   \n"), Command::Blank);
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_line(":probe"), Command::Probe);
        assert_eq!(parse_line(":HISTORY"), Command::ShowHistory);
        assert_eq!(parse_line(" :Quit "), Command::Quit);
        assert_eq!(parse_line(":send"), Command::Send);
        assert_eq!(parse_line(":clear"), Command::Clear);
    }

    #[test]
    fn use_requires_a_numeric_id() {
        assert_eq!(parse_line(":use 12"), Command::Use(12));
        assert!(matches!(parse_line(":use"), Command::Invalid(_)));
        assert!(matches!(parse_line(":use twelve"), Command::Invalid(_)));
        assert!(matches!(parse_line(":use 1 2"), Command::Invalid(_)));
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert!(matches!(parse_line(":exit"), Command::Invalid(_)));
        assert!(matches!(parse_line(":probe now"), Command::Invalid(_)));
    }
}
