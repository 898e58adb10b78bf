//! Reading operator input and splitting it into a command word and arguments.

use std::io::BufRead;

use rustyline::config::Config as EditorConfig;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::error::Result;

/// A source of operator input lines.
pub trait LineSource {
    /// Read the next line.
    ///
    /// A blank line is returned as an empty string. `None` means the input
    /// is exhausted and the session should end.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Interactive prompt with line editing and in-memory history.
pub struct Prompt {
    editor: DefaultEditor,
    prompt: String,
}

impl Prompt {
    /// Create a prompt keeping at most `history_size` entries.
    pub fn new(prompt: impl Into<String>, history_size: usize) -> Result<Self> {
        let config = EditorConfig::builder()
            .max_history_size(history_size)?
            .auto_add_history(false)
            .build();
        let editor = DefaultEditor::with_config(config)?;
        Ok(Self {
            editor,
            prompt: prompt.into(),
        })
    }
}

impl LineSource for Prompt {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C drops the current line, Ctrl-D ends the session
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => {
                debug!("end of input at prompt");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Lines from any buffered reader, for piped input and scripts.
pub struct ScriptSource<R> {
    reader: R,
}

impl<R: BufRead> ScriptSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        // bad bytes become U+FFFD and fall through to the unknown-command path
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Split a line at the first whitespace run.
///
/// Returns `None` for a blank line. Otherwise the command word, plus the text
/// after the single separator that ends it, or `None` when nothing follows.
pub fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }

    let Some(end) = line.find(char::is_whitespace) else {
        return Some((line, None));
    };
    let command = &line[..end];
    let separator_len = line[end..].chars().next().map_or(0, char::len_utf8);
    let rest = &line[end + separator_len..];
    Some((command, (!rest.is_empty()).then_some(rest)))
}

/// The first whitespace-separated token of an argument remainder.
pub fn first_arg(args: Option<&str>) -> Option<&str> {
    args.and_then(|args| args.split_whitespace().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_word_only() {
        assert_eq!(split_command("c"), Some(("c", None)));
        assert_eq!(split_command("  help"), Some(("help", None)));
    }

    #[test]
    fn test_split_command_with_args() {
        assert_eq!(split_command("x 2 0x1000"), Some(("x", Some("2 0x1000"))));
        assert_eq!(split_command("si\t5"), Some(("si", Some("5"))));
    }

    #[test]
    fn test_split_command_keeps_remainder_verbatim() {
        assert_eq!(split_command("x  2   0x10 "), Some(("x", Some(" 2   0x10 "))));
    }

    #[test]
    fn test_split_command_trailing_separator_only() {
        assert_eq!(split_command("q "), Some(("q", None)));
    }

    #[test]
    fn test_split_command_blank() {
        assert_eq!(split_command(""), None);
        assert_eq!(split_command("   "), None);
        assert_eq!(split_command("\t \t"), None);
    }

    #[test]
    fn test_first_arg() {
        assert_eq!(first_arg(None), None);
        assert_eq!(first_arg(Some("   ")), None);
        assert_eq!(first_arg(Some(" r extra")), Some("r"));
    }

    #[test]
    fn test_script_source_lines() {
        let input = b"si 2\n\ninfo r\r\nq" as &[u8];
        let mut source = ScriptSource::new(input);
        assert_eq!(source.next_line().unwrap().as_deref(), Some("si 2"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("info r"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("q"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_script_source_invalid_utf8() {
        let input = b"\xff\xfe junk\nsi\n" as &[u8];
        let mut source = ScriptSource::new(input);
        assert_eq!(
            source.next_line().unwrap().as_deref(),
            Some("\u{fffd}\u{fffd} junk")
        );
        assert_eq!(source.next_line().unwrap().as_deref(), Some("si"));
        assert_eq!(source.next_line().unwrap(), None);
    }
}
