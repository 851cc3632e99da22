use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::components::truncate::wrap;
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Popover: the full value behind a clipped cell
// ---------------------------------------------------------------------------

/// Which disclosure is open over the conversation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopoverKind {
    QaAnswer,
    Labels,
}

impl PopoverKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::QaAnswer => "QA Answer",
            Self::Labels => "Labels",
        }
    }
}

pub struct RenderedPopover {
    pub title: String,
    pub lines: Vec<String>,
    pub hint: String,
    pub title_fg: Color,
    pub text_fg: Color,
    pub border_fg: Color,
    pub hint_fg: Color,
}

impl RenderedPopover {
    /// `text` is wrapped to fit a popover about half the screen wide.
    pub fn build(
        title: &str,
        text: &str,
        hint: &str,
        screen_width: u16,
        depth: ColorDepth,
        theme: &ResolvedTheme,
    ) -> Self {
        let inner = (popover_width(u32::from(screen_width)) as usize).saturating_sub(4);
        Self {
            title: title.to_owned(),
            lines: wrap(text, inner),
            hint: hint.to_owned(),
            title_fg: theme.text_primary.to_crossterm_color(depth),
            text_fg: theme.text_primary.to_crossterm_color(depth),
            border_fg: theme.border_primary.to_crossterm_color(depth),
            hint_fg: theme.text_faint.to_crossterm_color(depth),
        }
    }
}

fn popover_width(screen: u32) -> u32 {
    (screen / 2).max(30).min(screen.saturating_sub(4))
}

#[derive(Default, Props)]
pub struct PopoverProps {
    pub popover: Option<RenderedPopover>,
    pub width: u16,
    pub height: u16,
}

#[component]
pub fn Popover(props: &mut PopoverProps) -> impl Into<AnyElement<'static>> {
    let Some(p) = props.popover.take() else {
        return element! { View }.into_any();
    };

    let width = u32::from(props.width);
    let height = u32::from(props.height);

    #[allow(clippy::cast_possible_truncation)]
    let content_height = p.lines.len() as u32 + 4;
    let overlay_width = popover_width(width);
    let overlay_height = content_height.min(height.saturating_sub(2));
    let pad_left = (width.saturating_sub(overlay_width)) / 2;
    let pad_top = (height.saturating_sub(overlay_height)) / 2;

    element! {
        View(width, height, position: Position::Absolute) {
            View(
                margin_left: pad_left,
                margin_top: pad_top,
                width: overlay_width,
                height: overlay_height,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: p.border_fg,
                background_color: Color::Reset,
                overflow: Overflow::Hidden,
            ) {
                View(
                    border_style: BorderStyle::Single,
                    border_edges: Edges::Bottom,
                    border_color: p.border_fg,
                    padding_left: 1,
                    padding_right: 1,
                ) {
                    Text(
                        content: p.title,
                        color: p.title_fg,
                        weight: Weight::Bold,
                        wrap: TextWrap::NoWrap,
                    )
                    View(flex_grow: 1.0)
                    Text(content: p.hint, color: p.hint_fg, wrap: TextWrap::NoWrap)
                }
                View(
                    flex_grow: 1.0,
                    flex_direction: FlexDirection::Column,
                    padding_left: 1,
                    padding_right: 1,
                    overflow: Overflow::Hidden,
                ) {
                    #(p.lines.into_iter().enumerate().map(|(i, line)| {
                        element! {
                            Text(key: i, content: line, color: p.text_fg, wrap: TextWrap::NoWrap)
                        }
                    }))
                }
            }
        }
    }
    .into_any()
}
