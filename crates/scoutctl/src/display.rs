//! Terminal output for the conversation
//!
//! Every line scoutctl shows goes through `Ui` so colour can be switched off
//! for pipes and tests.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy)]
pub struct Ui {
    use_color: bool,
}

impl Ui {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Colour when stdout is a terminal and NO_COLOR is unset
    pub fn auto() -> Self {
        Self::new(should_use_color())
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn bot(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        if self.use_color {
            writeln!(out, "{} {}", "Assistant:".cyan().bold(), text)?;
        } else {
            writeln!(out, "Assistant: {}", text)?;
        }
        writeln!(out)
    }

    pub fn warning(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        if self.use_color {
            writeln!(out, "{} {}", "⚠".yellow(), text.yellow())
        } else {
            writeln!(out, "Warning: {}", text)
        }
    }

    pub fn error(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        if self.use_color {
            writeln!(out, "{} {}", "✗".red(), text.red())
        } else {
            writeln!(out, "Error: {}", text)
        }
    }

    pub fn info(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        if self.use_color {
            writeln!(out, "{}", text.dimmed())
        } else {
            writeln!(out, "{}", text)
        }
    }

    pub fn prompt(&self, out: &mut impl Write) -> io::Result<()> {
        if self.use_color {
            write!(out, "{} ", "You:".green().bold())?;
        } else {
            write!(out, "You: ")?;
        }
        out.flush()
    }

    /// Two-column key/value listing
    pub fn summary(&self, out: &mut impl Write, title: &str, items: &[(&str, &str)]) -> io::Result<()> {
        let width = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        if self.use_color {
            writeln!(out, "{}", title.bold())?;
        } else {
            writeln!(out, "{}", title)?;
        }
        for (key, value) in items {
            writeln!(out, "  {:width$}  {}", key, value, width = width)?;
        }
        writeln!(out)
    }
}

/// Check if color output should be used
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&Ui, &mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&Ui::plain(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_bot_line() {
        let text = render(|ui, out| ui.bot(out, "What is your full name?"));
        assert_eq!(text, "Assistant: What is your full name?\n\n");
    }

    #[test]
    fn test_plain_warning_and_error() {
        assert_eq!(render(|ui, out| ui.warning(out, "w")), "Warning: w\n");
        assert_eq!(render(|ui, out| ui.error(out, "e")), "Error: e\n");
    }

    #[test]
    fn test_summary_aligns_keys() {
        let text = render(|ui, out| ui.summary(out, "Profile", &[("name", "Jane"), ("tech_stack", "Rust")]));
        assert!(text.contains("  name        Jane\n"));
        assert!(text.contains("  tech_stack  Rust\n"));
    }

    #[test]
    fn test_colored_output_has_escape_codes() {
        let mut out = Vec::new();
        Ui::new(true).bot(&mut out, "hi").unwrap();
        assert!(String::from_utf8(out).unwrap().contains('\u{1b}'));
    }
}
