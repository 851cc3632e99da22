use std::collections::HashMap;

use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};
use crate::config::keybindings::BuiltinAction;

// ---------------------------------------------------------------------------
// Column definition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub id: String,
    pub header: String,
    /// Share of the width left after fixed columns (0.0..1.0).
    pub default_width_pct: f32,
    /// Exact width in cells; takes precedence over the percentage.
    pub fixed_width: Option<u16>,
    pub align: TextAlign,
}

impl Column {
    pub fn new(id: &str, header: &str, pct: f32) -> Self {
        Self {
            id: id.to_owned(),
            header: header.to_owned(),
            default_width_pct: pct,
            fixed_width: None,
            align: TextAlign::Left,
        }
    }

    pub fn fixed(id: &str, header: &str, width: u16) -> Self {
        Self {
            fixed_width: Some(width),
            ..Self::new(id, header, 0.0)
        }
    }

    pub fn right(mut self) -> Self {
        self.align = TextAlign::Right;
        self
    }
}

/// One cell. `text` may hold several `\n`-separated lines.
#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub color: Option<AppColor>,
    pub bold: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn colored(text: impl Into<String>, color: AppColor) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>, color: Option<AppColor>) -> Self {
        Self {
            text: text.into(),
            color,
            bold: true,
        }
    }
}

/// Cells indexed by column id.
pub type Row = HashMap<String, Cell>;

/// Text for a selection checkbox cell.
pub fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

// ---------------------------------------------------------------------------
// Pre-rendered table data (all owned)
// ---------------------------------------------------------------------------

pub struct RenderedTable {
    pub header_cells: Vec<HeaderCell>,
    pub body_rows: Vec<RenderedRow>,
    pub total_width: u32,
    pub row_height: u32,
    pub header_fg: Color,
    pub border_fg: Color,
    pub empty_fg: Color,
    pub empty_message: Option<String>,
}

pub struct HeaderCell {
    pub text: String,
    pub width: u32,
    pub align: TextAlign,
}

pub struct RenderedRow {
    pub key: usize,
    pub bg: Option<Color>,
    pub cells: Vec<RenderedCell>,
}

pub struct RenderedCell {
    pub text: String,
    pub fg: Color,
    pub weight: Weight,
    pub width: u32,
    pub align: TextAlign,
}

pub struct TableBuildConfig<'a> {
    pub columns: &'a [Column],
    pub rows: &'a [Row],
    pub cursor: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,
    /// Lines per body row; multi-line cells are cut to this.
    pub row_height: u16,
    pub total_width: u16,
    pub depth: ColorDepth,
    pub selected_bg: Option<AppColor>,
    pub header_color: Option<AppColor>,
    pub border_color: Option<AppColor>,
    pub empty_message: Option<&'a str>,
}

impl RenderedTable {
    pub fn build(cfg: &TableBuildConfig<'_>) -> Self {
        let depth = cfg.depth;
        let row_height = cfg.row_height.max(1);
        let col_widths = compute_column_widths(cfg.columns, cfg.total_width);

        let header_fg = cfg
            .header_color
            .map_or(Color::White, |c| c.to_crossterm_color(depth));
        let border_fg = cfg
            .border_color
            .map_or(Color::DarkGrey, |c| c.to_crossterm_color(depth));
        let selected_bg = cfg.selected_bg.map(|c| c.to_crossterm_color(depth));

        let header_cells = cfg
            .columns
            .iter()
            .zip(&col_widths)
            .map(|(col, &w)| HeaderCell {
                text: col.header.clone(),
                width: u32::from(w),
                align: col.align,
            })
            .collect();

        let rows = cfg.rows;
        let start = cfg.scroll_offset.min(rows.len());
        let end = (start + cfg.visible_rows).min(rows.len());

        let body_rows = rows[start..end]
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let absolute_idx = start + i;
                let bg = if absolute_idx == cfg.cursor {
                    selected_bg
                } else {
                    None
                };
                let cells = cfg
                    .columns
                    .iter()
                    .zip(&col_widths)
                    .map(|(col, &w)| {
                        let cell = row.get(&col.id);
                        let text = cell.map_or_else(String::new, |c| {
                            c.text
                                .lines()
                                .take(usize::from(row_height))
                                .collect::<Vec<_>>()
                                .join("\n")
                        });
                        RenderedCell {
                            text,
                            fg: cell
                                .and_then(|c| c.color)
                                .map_or(Color::Reset, |c| c.to_crossterm_color(depth)),
                            weight: if cell.is_some_and(|c| c.bold) {
                                Weight::Bold
                            } else {
                                Weight::Normal
                            },
                            width: u32::from(w),
                            align: col.align,
                        }
                    })
                    .collect();
                RenderedRow {
                    key: absolute_idx,
                    bg,
                    cells,
                }
            })
            .collect();

        let empty_message = if rows.is_empty() {
            cfg.empty_message.map(String::from)
        } else {
            None
        };

        Self {
            header_cells,
            body_rows,
            total_width: u32::from(cfg.total_width),
            row_height: u32::from(row_height),
            header_fg,
            border_fg,
            empty_fg: border_fg,
            empty_message,
        }
    }
}

// ---------------------------------------------------------------------------
// ScrollableTable component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct ScrollableTableProps {
    pub table: Option<RenderedTable>,
}

#[component]
pub fn ScrollableTable(props: &mut ScrollableTableProps) -> impl Into<AnyElement<'static>> {
    let Some(table) = props.table.take() else {
        return element! { View }.into_any();
    };
    let row_height = table.row_height;

    element! {
        View(flex_direction: FlexDirection::Column, width: table.total_width) {
            View(
                border_style: BorderStyle::Single,
                border_edges: Edges::Bottom,
                border_color: table.border_fg,
            ) {
                #(table.header_cells.into_iter().enumerate().map(|(i, hc)| {
                    element! {
                        View(key: i, width: hc.width, padding_right: 1) {
                            Text(
                                content: hc.text,
                                weight: Weight::Bold,
                                color: table.header_fg,
                                wrap: TextWrap::NoWrap,
                                align: hc.align,
                            )
                        }
                    }
                }))
            }

            #(table.empty_message.into_iter().map(|msg| {
                element! {
                    View(padding_top: 1, padding_left: 2) {
                        Text(content: msg, color: table.empty_fg)
                    }
                }
            }))
            #(table.body_rows.into_iter().map(|row| {
                element! {
                    View(key: row.key, height: row_height, background_color: row.bg) {
                        #(row.cells.into_iter().enumerate().map(|(ci, cell)| {
                            element! {
                                View(
                                    key: ci,
                                    width: cell.width,
                                    padding_right: 1,
                                    overflow: Overflow::Hidden,
                                ) {
                                    Text(
                                        content: cell.text,
                                        color: cell.fg,
                                        weight: cell.weight,
                                        wrap: TextWrap::NoWrap,
                                        align: cell.align,
                                    )
                                }
                            }
                        }))
                    }
                }
            }))
        }
    }
    .into_any()
}

// ---------------------------------------------------------------------------
// Column widths and cursor movement
// ---------------------------------------------------------------------------

pub fn compute_column_widths(columns: &[Column], total: u16) -> Vec<u16> {
    let fixed_total: u16 = columns.iter().filter_map(|c| c.fixed_width).sum();
    let remaining = total.saturating_sub(fixed_total);
    let flexible: Vec<&Column> = columns.iter().filter(|c| c.fixed_width.is_none()).collect();
    let pct_sum: f32 = flexible.iter().map(|c| c.default_width_pct).sum();

    columns
        .iter()
        .map(|col| {
            if let Some(w) = col.fixed_width {
                return w;
            }
            let ratio = if pct_sum > 0.0 {
                col.default_width_pct / pct_sum
            } else {
                #[allow(clippy::cast_precision_loss)]
                {
                    1.0 / flexible.len() as f32
                }
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let w = (f32::from(remaining) * ratio).floor() as u16;
            w.max(1)
        })
        .collect()
}

/// Apply a list-navigation action. Returns the new `(cursor, scroll_offset)`,
/// or `None` when `action` is not a navigation action.
pub fn navigate(
    action: BuiltinAction,
    cursor: usize,
    scroll_offset: usize,
    total_rows: usize,
    visible_rows: usize,
) -> Option<(usize, usize)> {
    let visible_rows = visible_rows.max(1);
    let last = total_rows.saturating_sub(1);
    let new_cursor = match action {
        BuiltinAction::MoveDown => (cursor + 1).min(last),
        BuiltinAction::MoveUp => cursor.saturating_sub(1),
        BuiltinAction::First => 0,
        BuiltinAction::Last => last,
        BuiltinAction::PageDown => (cursor + visible_rows).min(last),
        BuiltinAction::PageUp => cursor.saturating_sub(visible_rows),
        _ => return None,
    };
    let new_scroll = if new_cursor < scroll_offset {
        new_cursor
    } else if new_cursor >= scroll_offset + visible_rows {
        new_cursor + 1 - visible_rows
    } else {
        scroll_offset
    };
    Some((new_cursor, new_scroll))
}

/// Keep `cursor` inside a list that may have shrunk.
pub fn clamp_cursor(cursor: usize, total_rows: usize) -> usize {
    cursor.min(total_rows.saturating_sub(1))
}

/// Pull a stale scroll offset back so the window ends at the last row and
/// still contains `cursor`.
pub fn clamp_scroll(
    scroll_offset: usize,
    cursor: usize,
    total_rows: usize,
    visible_rows: usize,
) -> usize {
    let visible_rows = visible_rows.max(1);
    let scroll = scroll_offset.min(total_rows.saturating_sub(visible_rows));
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + visible_rows {
        cursor + 1 - visible_rows
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_columns() -> Vec<Column> {
        vec![
            Column::fixed("select", "", 4),
            Column::new("id", "ID", 0.15),
            Column::new("answer", "QA Answer", 0.60),
            Column::new("score", "Score", 0.10).right(),
        ]
    }

    #[test]
    fn fixed_columns_keep_their_width() {
        let widths = compute_column_widths(&make_columns(), 104);
        assert_eq!(widths[0], 4);
        let flexible: u16 = widths[1..].iter().sum();
        assert!(flexible <= 100, "flexible columns overflow: {flexible}");
        assert!(widths[2] > widths[1]);
    }

    #[test]
    fn cells_are_cut_to_row_height() {
        let cols = make_columns();
        let row: Row = [("answer".to_owned(), Cell::plain("one\ntwo\nthree"))]
            .into_iter()
            .collect();
        let rows = vec![row];
        let table = RenderedTable::build(&TableBuildConfig {
            columns: &cols,
            rows: &rows,
            cursor: 0,
            scroll_offset: 0,
            visible_rows: 10,
            row_height: 2,
            total_width: 80,
            depth: ColorDepth::TrueColor,
            selected_bg: Some(AppColor::Ansi256(237)),
            header_color: None,
            border_color: None,
            empty_message: Some("No conversations found"),
        });
        assert_eq!(table.body_rows[0].cells[2].text, "one\ntwo");
        assert!(table.body_rows[0].bg.is_some());
        assert!(table.empty_message.is_none());
    }

    #[test]
    fn empty_rows_show_message() {
        let cols = make_columns();
        let table = RenderedTable::build(&TableBuildConfig {
            columns: &cols,
            rows: &[],
            cursor: 0,
            scroll_offset: 0,
            visible_rows: 10,
            row_height: 1,
            total_width: 80,
            depth: ColorDepth::TrueColor,
            selected_bg: None,
            header_color: None,
            border_color: None,
            empty_message: Some("No bots found"),
        });
        assert_eq!(table.empty_message.as_deref(), Some("No bots found"));
        assert!(table.body_rows.is_empty());
    }

    #[test]
    fn navigation_scrolls_with_cursor() {
        assert_eq!(navigate(BuiltinAction::MoveDown, 2, 0, 10, 3), Some((3, 1)));
        assert_eq!(navigate(BuiltinAction::MoveUp, 1, 1, 10, 3), Some((0, 0)));
        assert_eq!(navigate(BuiltinAction::Last, 0, 0, 10, 3), Some((9, 7)));
        assert_eq!(navigate(BuiltinAction::First, 9, 7, 10, 3), Some((0, 0)));
        assert_eq!(navigate(BuiltinAction::PageDown, 0, 0, 10, 3), Some((3, 1)));
        assert_eq!(navigate(BuiltinAction::MoveDown, 0, 0, 0, 3), Some((0, 0)));
        assert_eq!(navigate(BuiltinAction::Quit, 0, 0, 10, 3), None);
    }

    #[test]
    fn clamp_handles_shrunk_lists() {
        assert_eq!(clamp_cursor(5, 3), 2);
        assert_eq!(clamp_cursor(5, 0), 0);
    }

    #[test]
    fn stale_scroll_still_shows_the_cursor_row() {
        let cols = make_columns();
        let rows: Vec<Row> = ["a", "b", "c"]
            .iter()
            .map(|id| [("id".to_owned(), Cell::plain(*id))].into_iter().collect())
            .collect();
        let cursor = clamp_cursor(7, rows.len());
        let scroll = clamp_scroll(5, cursor, rows.len(), 10);
        assert_eq!((cursor, scroll), (2, 0));
        let table = RenderedTable::build(&TableBuildConfig {
            columns: &cols,
            rows: &rows,
            cursor,
            scroll_offset: scroll,
            visible_rows: 10,
            row_height: 1,
            total_width: 80,
            depth: ColorDepth::TrueColor,
            selected_bg: Some(AppColor::Ansi256(237)),
            header_color: None,
            border_color: None,
            empty_message: None,
        });
        assert_eq!(table.body_rows.len(), 3);
        assert!(table.body_rows[2].bg.is_some());
    }

    #[test]
    fn scroll_follows_cursor_past_the_window() {
        assert_eq!(clamp_scroll(0, 9, 10, 3), 7);
        assert_eq!(clamp_scroll(6, 2, 10, 3), 2);
        assert_eq!(clamp_scroll(4, 5, 10, 3), 4);
        assert_eq!(clamp_scroll(3, 0, 0, 3), 0);
    }

    #[test]
    fn checkbox_text() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }
}
