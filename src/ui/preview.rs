use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::styles;
use super::utils::viewport_start;

/// Placeholder when nothing is selected
pub fn empty_lines(hint: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", hint), styles::dim_style())),
    ]
}

/// Commit summary: header fields bright, PR block muted
pub fn commit_lines(summary: &[String]) -> Vec<Line<'_>> {
    let mut in_header = true;
    summary
        .iter()
        .map(|text| {
            if text.starts_with("Pull request #") || text.starts_with("No pull request") {
                in_header = false;
            }
            let style = if text.starts_with("commit ") {
                Style::default().fg(styles::YELLOW)
            } else if in_header {
                Style::default().fg(styles::TEXT)
            } else if text.starts_with("Pull request #") {
                Style::default().fg(styles::CYAN)
            } else {
                Style::default().fg(styles::MUTED)
            };
            Line::from(Span::styled(text.as_str(), style))
        })
        .collect()
}

/// Draw `lines` scrolled so `cursor` stays visible; the cursor row is
/// marked while the panel has focus.
pub fn render_scrolled(
    f: &mut Frame,
    area: Rect,
    block: Block<'_>,
    mut lines: Vec<Line<'_>>,
    cursor: usize,
    focused: bool,
) {
    let viewport = area.height.saturating_sub(2) as usize;
    let start = viewport_start(cursor, lines.len(), viewport);
    if focused {
        if let Some(line) = lines.get_mut(cursor) {
            line.style = line.style.bg(styles::CURSOR_BG);
        }
    }
    let visible: Vec<Line> = lines.into_iter().skip(start).take(viewport).collect();
    f.render_widget(Paragraph::new(visible).block(block), area);
}
