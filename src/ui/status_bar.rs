use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::State;

use super::styles;

/// Spans for the bottom status line, left to right
pub fn status_spans(state: &State) -> Vec<Span<'static>> {
    let branch = if state.branch.is_empty() {
        "unknown".to_string()
    } else {
        state.branch.clone()
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", branch),
            Style::default().fg(styles::BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("[{}] ", state.mode.label()),
            Style::default().fg(styles::BLUE),
        ),
        Span::styled(
            format!("{} file{} ", state.files.len(), if state.files.len() == 1 { "" } else { "s" }),
            Style::default().fg(styles::MUTED),
        ),
    ];

    if state.diff_added > 0 || state.diff_removed > 0 {
        spans.push(Span::styled(format!("+{}", state.diff_added), styles::status_added()));
        spans.push(Span::styled(format!(" -{} ", state.diff_removed), styles::status_deleted()));
    }

    if let Some(pr) = &state.pr {
        spans.push(Span::styled(
            format!("PR #{} ({} comments) ", pr.number, pr.comment_count()),
            Style::default().fg(styles::PURPLE),
        ));
    }

    if let Some(msg) = &state.status_message {
        spans.push(Span::styled(format!("{} ", msg), Style::default().fg(styles::CYAN)));
    } else if let Some(err) = &state.error {
        spans.push(Span::styled(format!("{} ", err), Style::default().fg(styles::RED)));
    }

    if state.watching {
        spans.push(Span::styled("● watching ", Style::default().fg(styles::GREEN)));
    }
    spans.push(Span::styled("[?]", styles::key_hint_style()));
    spans
}

pub fn render(f: &mut Frame, area: Rect, state: &State) {
    let line = Line::from(status_spans(state));
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(styles::PANEL)),
        area,
    );
}
