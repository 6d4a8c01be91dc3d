//! Terminal rendering of the core's markdown output.
//!
//! Rich mode styles headings, bold text and inline code with termimad; plain
//! mode prints the markdown untouched, which is what scripts and the CLI
//! tests read.

use std::fmt::Display;

use termimad::{crossterm::style::Color, MadSkin};

/// Prints markdown either styled or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));
        skin.quote_mark.set_fg(Color::DarkGrey);

        Self { rich_enabled, skin }
    }

    /// Renders anything whose `Display` output is markdown.
    pub fn render(&self, content: impl Display) {
        let markdown = content.to_string();
        if !self.rich_enabled {
            print!("{markdown}");
            return;
        }
        for line in markdown.lines() {
            // Headings keep their hashes so the quadrant sections stay
            // recognizable in narrow terminals.
            if line.starts_with('#') {
                println!("\x1b[34m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        assert!(!TerminalRenderer::new(false).rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
