use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ---------------------------------------------------------------------------
// Width-aware wrapping and clipping
// ---------------------------------------------------------------------------

pub const ELLIPSIS: char = '\u{2026}';

/// Result of clipping text to a fixed number of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipped {
    pub lines: Vec<String>,
    /// True when some of the text did not fit.
    pub elided: bool,
}

impl Clipped {
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Word-wrap `text` into lines no wider than `width` display columns.
/// Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0;
        for word in paragraph.split_whitespace() {
            let word_w = word.width();
            if line_w > 0 && line_w + 1 + word_w <= width {
                line.push(' ');
                line.push_str(word);
                line_w += 1 + word_w;
                continue;
            }
            if line_w > 0 {
                lines.push(std::mem::take(&mut line));
                line_w = 0;
            }
            if word_w <= width {
                line.push_str(word);
                line_w = word_w;
            } else {
                for ch in word.chars() {
                    let ch_w = ch.width().unwrap_or(0);
                    if line_w + ch_w > width {
                        lines.push(std::mem::take(&mut line));
                        line_w = 0;
                    }
                    line.push(ch);
                    line_w += ch_w;
                }
            }
        }
        lines.push(line);
    }
    lines
}

/// Fit `text` into at most `max_lines` lines of `width` columns, ending the
/// last visible line with an ellipsis when anything was cut.
pub fn clip_lines(text: &str, width: usize, max_lines: usize) -> Clipped {
    let max_lines = max_lines.max(1);
    let mut lines = wrap(text, width);
    if lines.len() <= max_lines {
        return Clipped {
            lines,
            elided: false,
        };
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = with_ellipsis(last, width);
    }
    Clipped {
        lines,
        elided: true,
    }
}

/// Single-line truncation to `width` columns.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_owned();
    }
    with_ellipsis(text, width)
}

fn with_ellipsis(text: &str, width: usize) -> String {
    let budget = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.truncate(out.trim_end().len());
    out.push(ELLIPSIS);
    out
}
