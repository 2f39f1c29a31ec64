/// First visible row for a list of `len` rows in a viewport of `height`,
/// keeping `cursor` centred once the list overflows.
pub(crate) fn viewport_start(cursor: usize, len: usize, height: usize) -> usize {
    if len <= height || cursor < height / 2 {
        0
    } else if cursor > len.saturating_sub(height / 2) {
        len.saturating_sub(height)
    } else {
        cursor.saturating_sub(height / 2)
    }
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fits_without_scrolling() {
        assert_eq!(viewport_start(4, 5, 10), 0);
    }

    #[test]
    fn viewport_centres_cursor() {
        assert_eq!(viewport_start(50, 100, 10), 45);
    }

    #[test]
    fn viewport_pins_to_bottom() {
        assert_eq!(viewport_start(99, 100, 10), 90);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
