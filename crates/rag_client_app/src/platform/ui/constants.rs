pub const CMD_PREFIX: char = ':';
pub const CMD_PROBE: &str = "probe";
pub const CMD_HISTORY: &str = "history";
pub const CMD_USE: &str = "use";
pub const CMD_SEND: &str = "send";
pub const CMD_CLEAR: &str = "clear";
pub const CMD_QUIT: &str = "quit";
pub const CMD_HELP: &str = "help";

pub const RULE: &str = "------------------------------------------------------------";

pub const HELP_LINES: &[&str] = &[
    "Type a question and press Enter to ask it.",
    ":probe      check connectivity now",
    ":history    list past queries",
    ":use <id>   load a past question",
    ":send       ask the current question again",
    ":clear      delete the history",
    ":quit       exit",
];
