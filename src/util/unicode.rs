use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` (on grapheme boundaries) that fits in `cells`
pub fn take_width(s: &str, cells: usize) -> &str {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        let w = display_width(g);
        if used + w > cells {
            return &s[..i];
        }
        used += w;
    }
    s
}

/// Fit `s` into `cells`, replacing the overflow with `…`
pub fn fit_to_width(s: &str, cells: usize) -> String {
    if display_width(s) <= cells {
        return s.to_string();
    }
    if cells == 0 {
        return String::new();
    }
    let mut out = take_width(s, cells - 1).to_string();
    out.push(ELLIPSIS);
    out
}

/// Word-wrap a node label into at most `max_lines` lines of `width` cells.
/// Words wider than a line are broken; text past the last line is elided.
pub fn wrap_label(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_w = 0;
    for word in s.split_whitespace() {
        let word_w = display_width(word);
        let sep = usize::from(!current.is_empty());
        if current_w + sep + word_w <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_w += sep + word_w;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut rest = word;
        while display_width(rest) > width {
            let mut head = take_width(rest, width);
            if head.is_empty() {
                // A single grapheme wider than the line
                head = rest.graphemes(true).next().unwrap_or(rest);
            }
            lines.push(head.to_string());
            rest = &rest[head.len()..];
        }
        current = rest.to_string();
        current_w = display_width(rest);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.pop() {
            let mut elided = take_width(&last, width.saturating_sub(1)).to_string();
            elided.push(ELLIPSIS);
            lines.push(elided);
        }
    }
    lines
}

/// Byte offset of the grapheme boundary after `at`, if any
pub fn next_boundary(s: &str, at: usize) -> Option<usize> {
    let tail = s.get(at..)?;
    let g = tail.graphemes(true).next()?;
    Some(at + g.len())
}

/// Byte offset of the grapheme boundary before `at`, if any
pub fn prev_boundary(s: &str, at: usize) -> Option<usize> {
    let head = s.get(..at)?;
    let g = head.graphemes(true).next_back()?;
    Some(at - g.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_counts_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit_to_width("Hello world", 8), "Hello w…");
        assert_eq!(fit_to_width("Hello", 5), "Hello");
        assert_eq!(fit_to_width("Hello", 1), "…");
        assert_eq!(fit_to_width("Hello", 0), "");
        // A wide char never straddles the cut
        assert_eq!(fit_to_width("日本語", 4), "日…");
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_label("Write the quarterly report", 10, 3),
            vec!["Write the", "quarterly", "report"]
        );
    }

    #[test]
    fn wrap_elides_overflow() {
        assert_eq!(
            wrap_label("Write the quarterly report", 10, 2),
            vec!["Write the", "quarterly…"]
        );
    }

    #[test]
    fn wrap_breaks_long_words() {
        assert_eq!(wrap_label("abcdefghijkl", 5, 3), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn wrap_degenerate_sizes() {
        assert!(wrap_label("abc", 0, 2).is_empty());
        assert!(wrap_label("abc", 4, 0).is_empty());
        assert!(wrap_label("   ", 4, 2).is_empty());
        assert_eq!(wrap_label("日本", 1, 3), vec!["日", "本"]);
    }

    #[test]
    fn boundaries_step_over_graphemes() {
        let s = "ae\u{301}b";
        assert_eq!(next_boundary(s, 0), Some(1));
        assert_eq!(next_boundary(s, 1), Some(4));
        assert_eq!(next_boundary(s, 5), None);
        assert_eq!(prev_boundary(s, 4), Some(1));
        assert_eq!(prev_boundary(s, 0), None);
    }
}
