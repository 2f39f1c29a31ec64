use super::mode::Mode;

/// Identifies one of the dashboard's windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowId {
    FileList,
    CommitList,
    DiffView,
    FileView,
    Help,
}

impl WindowId {
    pub fn title(self) -> &'static str {
        match self {
            WindowId::FileList => "FILES",
            WindowId::CommitList => "COMMITS",
            WindowId::DiffView => "DIFF",
            WindowId::FileView => "FILE",
            WindowId::Help => "HELP",
        }
    }
}

/// Logical screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    // side-by-side
    LeftTop,
    LeftBottom,
    Right,
    // stacked
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Narrow left column split top/bottom, wide right pane
    SideBySide,
    /// Three rows, top to bottom
    Stacked,
}

/// Which window sits in which region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutAssignment {
    pub arrangement: Arrangement,
    slots: [(Region, WindowId); 3],
}

impl LayoutAssignment {
    pub fn compute(width: u16, breakpoint: u16, mode: Mode) -> Self {
        let preview = mode.preview_window();
        if width >= breakpoint {
            LayoutAssignment {
                arrangement: Arrangement::SideBySide,
                slots: [
                    (Region::LeftTop, WindowId::FileList),
                    (Region::LeftBottom, WindowId::CommitList),
                    (Region::Right, preview),
                ],
            }
        } else {
            LayoutAssignment {
                arrangement: Arrangement::Stacked,
                slots: [
                    (Region::Top, WindowId::FileList),
                    (Region::Middle, WindowId::CommitList),
                    (Region::Bottom, preview),
                ],
            }
        }
    }

    pub fn slots(&self) -> &[(Region, WindowId)] {
        &self.slots
    }

    pub fn window_at(&self, region: Region) -> Option<WindowId> {
        self.slots.iter().find(|(r, _)| *r == region).map(|(_, w)| *w)
    }

    pub fn region_of(&self, id: WindowId) -> Option<Region> {
        self.slots.iter().find(|(_, w)| *w == id).map(|(r, _)| *r)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.region_of(id).is_some()
    }

    /// The wide (side-by-side) or bottom (stacked) slot
    pub fn preview_region(&self) -> Region {
        match self.arrangement {
            Arrangement::SideBySide => Region::Right,
            Arrangement::Stacked => Region::Bottom,
        }
    }

    pub fn preview_window(&self) -> WindowId {
        self.window_at(self.preview_region()).unwrap_or(WindowId::DiffView)
    }

    /// Tab order: primary list, secondary list, preview
    pub fn focus_cycle(&self) -> [WindowId; 3] {
        [WindowId::FileList, WindowId::CommitList, self.preview_window()]
    }
}

/// Step through `cycle` from `current`, wrapping. A window outside the
/// cycle restarts from its first entry.
pub fn cycle_step(cycle: &[WindowId], current: WindowId, forward: bool) -> WindowId {
    let len = cycle.len();
    if len == 0 {
        return current;
    }
    match cycle.iter().position(|w| *w == current) {
        Some(idx) if forward => cycle[(idx + 1) % len],
        Some(idx) => cycle[(idx + len - 1) % len],
        None => cycle[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_is_side_by_side() {
        let l = LayoutAssignment::compute(120, 80, Mode::BranchChanges);
        assert_eq!(l.arrangement, Arrangement::SideBySide);
        assert_eq!(l.window_at(Region::LeftTop), Some(WindowId::FileList));
        assert_eq!(l.window_at(Region::LeftBottom), Some(WindowId::CommitList));
        assert_eq!(l.window_at(Region::Right), Some(WindowId::DiffView));
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let l = LayoutAssignment::compute(80, 80, Mode::BranchChanges);
        assert_eq!(l.arrangement, Arrangement::SideBySide);
        let l = LayoutAssignment::compute(79, 80, Mode::BranchChanges);
        assert_eq!(l.arrangement, Arrangement::Stacked);
    }

    #[test]
    fn preview_region_tracks_arrangement_and_mode() {
        let l = LayoutAssignment::compute(60, 80, Mode::BrowseAll);
        assert_eq!(l.preview_region(), Region::Bottom);
        assert_eq!(l.window_at(Region::Bottom), Some(WindowId::FileView));
        assert!(!l.contains(WindowId::DiffView));
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let l = LayoutAssignment::compute(120, 80, Mode::WorkingChanges);
        let cycle = l.focus_cycle();
        for start in cycle {
            let mut w = start;
            for _ in 0..cycle.len() {
                w = cycle_step(&cycle, w, true);
            }
            assert_eq!(w, start);
        }
    }

    #[test]
    fn forward_then_back_is_identity() {
        let l = LayoutAssignment::compute(60, 80, Mode::BrowseDocs);
        let cycle = l.focus_cycle();
        for start in cycle {
            let there = cycle_step(&cycle, start, true);
            assert_eq!(cycle_step(&cycle, there, false), start);
        }
    }

    #[test]
    fn unknown_window_restarts_cycle() {
        let cycle = [WindowId::FileList, WindowId::CommitList, WindowId::FileView];
        assert_eq!(cycle_step(&cycle, WindowId::DiffView, true), WindowId::FileList);
    }
}
