//! The command table.
//!
//! Lookup is a linear scan by exact, case-sensitive name. The table order is
//! the order `help` lists commands in.

/// What a command does when dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// List commands or describe one.
    Help,
    /// Run until the engine halts.
    Continue,
    /// End the session.
    Quit,
    /// Execute `n` instructions.
    Step,
    /// Print emulator state.
    Info,
    /// Dump memory words.
    Examine,
}

/// One entry of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandDef {
    /// Command word typed by the operator.
    pub name: &'static str,
    /// One-line description shown by `help`.
    pub description: &'static str,
    /// Handler to run.
    pub kind: CommandKind,
}

/// Every command the monitor understands, in help order.
pub const COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "help",
        description: "Display information about all supported commands",
        kind: CommandKind::Help,
    },
    CommandDef {
        name: "c",
        description: "Continue the execution of the program",
        kind: CommandKind::Continue,
    },
    CommandDef {
        name: "q",
        description: "Exit the monitor",
        kind: CommandKind::Quit,
    },
    CommandDef {
        name: "si",
        description: "[n] Single step execution, default n = 1",
        kind: CommandKind::Step,
    },
    CommandDef {
        name: "info",
        description: "r Print register",
        kind: CommandKind::Info,
    },
    CommandDef {
        name: "x",
        description: "N EXPR Scan memory. Evaluate EXPR and use the result as the starting \
                      address, output N consecutive 4-byte words in hexadecimal form",
        kind: CommandKind::Examine,
    },
];

/// Find a command by exact name. The first match wins.
pub fn lookup(name: &str) -> Option<&'static CommandDef> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}

impl CommandDef {
    /// The line `help` prints for this command.
    pub fn help_line(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = COMMANDS.iter().map(|cmd| cmd.name).collect();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn test_lookup_exact_match() {
        assert_eq!(lookup("si").map(|cmd| cmd.kind), Some(CommandKind::Step));
        assert_eq!(lookup("x").map(|cmd| cmd.kind), Some(CommandKind::Examine));
        assert_eq!(lookup("help").map(|cmd| cmd.kind), Some(CommandKind::Help));
    }

    #[test]
    fn test_lookup_rejects_prefix_and_case() {
        assert!(lookup("s").is_none());
        assert!(lookup("hel").is_none());
        assert!(lookup("Help").is_none());
        assert!(lookup("info r").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_table_order() {
        let names: Vec<_> = COMMANDS.iter().map(|cmd| cmd.name).collect();
        assert_eq!(names, ["help", "c", "q", "si", "info", "x"]);
    }

    #[test]
    fn test_help_line() {
        let quit = lookup("q").unwrap();
        assert_eq!(quit.help_line(), "q - Exit the monitor");
    }
}
