/// Line ranges from a hunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

/// Parse a hunk header like "@@ -10,4 +10,15 @@ fn foo()"
pub fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let after_first = line.strip_prefix("@@ ")?;
    let end_idx = after_first.find(" @@")?;
    let range_str = &after_first[..end_idx];

    let parts: Vec<&str> = range_str.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    let (old_start, old_count) = parse_range(parts[0].trim_start_matches('-'))?;
    let (new_start, new_count) = parse_range(parts[1].trim_start_matches('+'))?;

    Some(HunkRange {
        old_start,
        old_count,
        new_start,
        new_count,
    })
}

/// Parse "start,count" or just "start" (count defaults to 1)
fn parse_range(s: &str) -> Option<(usize, usize)> {
    if let Some((start, count)) = s.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        Some((s.parse().ok()?, 1))
    }
}

/// Resolve the file path and new-side line number shown at row `index` of
/// unified diff text. Works for single-file and concatenated multi-file diffs.
///
/// Deleted lines report the new-side position they would sit at; rows before
/// the first hunk of a file have no line number.
pub fn location_at(diff: &str, index: usize) -> (Option<String>, Option<usize>) {
    let mut path: Option<String> = None;
    let mut next_new: Option<usize> = None;
    let mut current: Option<usize> = None;

    for line in diff.lines().take(index + 1) {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            path = rest.rsplit_once(" b/").map(|(_, p)| p.to_string());
            next_new = None;
            current = None;
        } else if let Some(p) = line.strip_prefix("+++ ").filter(|_| next_new.is_none()) {
            if let Some(p) = p.strip_prefix("b/") {
                path = Some(p.to_string());
            }
            current = None;
        } else if line.starts_with("--- ") && next_new.is_none() {
            current = None;
        } else if let Some(range) = parse_hunk_header(line) {
            next_new = Some(range.new_start);
            current = Some(range.new_start);
        } else if let Some(n) = next_new {
            current = Some(n);
            if !line.starts_with('-') && !line.starts_with('\\') {
                next_new = Some(n + 1);
            }
        } else {
            current = None;
        }
    }

    (path, current)
}
