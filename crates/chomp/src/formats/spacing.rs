// ABOUTME: Spacing post-processor guaranteeing blank-line separation between Markdown blocks.
// ABOUTME: Headings always get a following blank line; double spacing separates every line.

use once_cell::sync::Lazy;
use regex::Regex;

// ATX heading line: 1-6 hashes then whitespace or end of line
static HEADING_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}(\s|$)").unwrap());

/// Returns true if the line is an ATX heading.
pub fn is_heading_line(line: &str) -> bool {
    HEADING_LINE_RE.is_match(line)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Normalize blank lines in rendered Markdown.
///
/// A heading immediately followed by content gets one blank line inserted.
/// With `double_space`, every non-blank line is followed by exactly one blank
/// line and pre-existing blank lines are not carried over, so blank lines are
/// never doubled.
pub fn normalize_spacing(markdown: &str, double_space: bool) -> String {
    let lines: Vec<&str> = markdown.lines().collect();

    let mut spaced: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, &line) in lines.iter().enumerate() {
        spaced.push(line);
        let next_is_content = lines.get(i + 1).is_some_and(|next| !is_blank(next));
        if is_heading_line(line) && next_is_content {
            spaced.push("");
        }
    }

    if !double_space {
        return spaced.join("\n");
    }

    let mut out: Vec<&str> = Vec::with_capacity(spaced.len() * 2);
    for line in spaced {
        if is_blank(line) {
            continue;
        }
        out.push(line);
        out.push("");
    }
    out.join("\n")
}
