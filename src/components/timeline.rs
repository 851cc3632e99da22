use crate::components::lines_view::{StyledLine, StyledSpan};
use crate::theme::ResolvedTheme;
use crate::types::Violation;

const FILLED: char = '\u{2501}';
const EMPTY: char = '\u{2500}';
const MARKER: char = '\u{25c6}';

/// `m:ss`, e.g. `0:15` or `3:00`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `"0:15 / 3:00"`.
pub fn format_progress(position: u32, duration: u32) -> String {
    format!("{} / {}", format_clock(position), format_clock(duration))
}

/// Column for `offset` on a bar `width` cells wide covering `duration`.
/// Offsets past the end clamp to the last cell.
pub fn marker_column(offset: u32, duration: u32, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    if duration == 0 {
        return 0;
    }
    let col = (u64::from(offset) * width as u64 / u64::from(duration)) as usize;
    col.min(width - 1)
}

/// Playback bar with violation markers drawn over it.
pub struct Timeline<'a> {
    pub position: u32,
    pub duration: u32,
    pub violations: &'a [Violation],
    pub width: usize,
}

impl Timeline<'_> {
    /// One character per column: filled up to the playhead, markers on top.
    pub fn cells(&self) -> Vec<char> {
        let played = if self.duration == 0 {
            0
        } else {
            marker_column(self.position.min(self.duration), self.duration, self.width + 1)
        };
        let mut cells: Vec<char> = (0..self.width)
            .map(|i| if i < played { FILLED } else { EMPTY })
            .collect();
        for v in self.violations {
            if self.width > 0 {
                cells[marker_column(v.offset_secs, self.duration, self.width)] = MARKER;
            }
        }
        cells
    }

    /// The bar as a styled line; markers take the severity color.
    pub fn to_line(&self, theme: &ResolvedTheme) -> StyledLine {
        let cells = self.cells();
        let mut marker_colors = vec![None; cells.len()];
        for v in self.violations {
            if !cells.is_empty() {
                let col = marker_column(v.offset_secs, self.duration, self.width);
                marker_colors[col] = Some(theme.severity_color(v.severity));
            }
        }
        let mut line = StyledLine::blank();
        for (ch, marker) in cells.into_iter().zip(marker_colors) {
            let span = match (marker, ch) {
                (Some(color), _) => StyledSpan::bold(ch.to_string(), color),
                (None, FILLED) => StyledSpan::text(ch.to_string(), theme.text_accent),
                _ => StyledSpan::text(ch.to_string(), theme.text_faint),
            };
            line.push(span);
        }
        line
    }
}
