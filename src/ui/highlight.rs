use ratatui::style::{Color, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const THEME: &str = "base16-ocean.dark";

/// Cached syntax highlighting state, loaded once at startup.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Highlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn syntax_for(&self, filename: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_for_file(filename)
            .ok()
            .flatten()
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set.themes.get(THEME)
    }

    /// Highlight a run of consecutive lines from `filename`, one span list per
    /// line. Parser state carries across the run, so multi-line constructs
    /// that start inside it are coloured correctly.
    pub fn highlight_lines<'a>(
        &self,
        lines: &[&'a str],
        filename: &str,
        base_style: Style,
    ) -> Vec<Vec<Span<'a>>> {
        let plain = || -> Vec<Vec<Span<'a>>> {
            lines
                .iter()
                .map(|l| vec![Span::styled(*l, base_style)])
                .collect()
        };
        let Some(theme) = self.theme() else {
            return plain();
        };

        let mut highlighter = HighlightLines::new(self.syntax_for(filename), theme);
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            // syntect needs a trailing newline
            let input = format!("{}\n", line);
            match highlighter.highlight_line(&input, &self.syntax_set) {
                Ok(ranges) => out.push(
                    ranges
                        .into_iter()
                        .map(|(syn_style, text)| {
                            let fg = Color::Rgb(
                                syn_style.foreground.r,
                                syn_style.foreground.g,
                                syn_style.foreground.b,
                            );
                            Span::styled(text.trim_end_matches('\n').to_string(), base_style.fg(fg))
                        })
                        .collect(),
                ),
                Err(_) => return plain(),
            }
        }
        out
    }
}
