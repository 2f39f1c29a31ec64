use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{Arrangement, LayoutAssignment, Region, WindowId};

use super::window::Windows;

/// Screen rectangles for each assigned window
pub fn regions(
    area: Rect,
    assignment: &LayoutAssignment,
    windows: &Windows,
    left_ratio: u16,
) -> Vec<(WindowId, Rect)> {
    let rect_of = |region: Region, rects: &[(Region, Rect)]| {
        rects.iter().find(|(r, _)| *r == region).map(|(_, rect)| *rect)
    };
    let commit_rows = assignment
        .window_at(Region::LeftBottom)
        .or_else(|| assignment.window_at(Region::Middle))
        .map(|id| windows.min_size(id).1)
        .unwrap_or(3);

    let rects: Vec<(Region, Rect)> = match assignment.arrangement {
        Arrangement::SideBySide => {
            let ratio = left_ratio.clamp(10, 90);
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(ratio), Constraint::Min(1)])
                .split(area);
            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Min(commit_rows)])
                .split(columns[0]);
            vec![
                (Region::LeftTop, left[0]),
                (Region::LeftBottom, left[1]),
                (Region::Right, columns[1]),
            ]
        }
        Arrangement::Stacked => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(30),
                    Constraint::Length(commit_rows.max(6)),
                    Constraint::Min(1),
                ])
                .split(area);
            vec![
                (Region::Top, rows[0]),
                (Region::Middle, rows[1]),
                (Region::Bottom, rows[2]),
            ]
        }
    };

    assignment
        .slots()
        .iter()
        .filter_map(|(region, id)| rect_of(*region, &rects).map(|rect| (*id, rect)))
        .collect()
}
