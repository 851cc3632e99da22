use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};

// ---------------------------------------------------------------------------
// TabBar component
// ---------------------------------------------------------------------------

/// One tab or chip. Several may be active at once (quick filter chips).
#[derive(Debug, Clone)]
pub struct Tab {
    pub title: String,
    pub count: Option<usize>,
    pub active: bool,
}

impl Tab {
    pub fn new(title: impl Into<String>, active: bool) -> Self {
        Self {
            title: title.into(),
            count: None,
            active,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    fn label(&self) -> String {
        match self.count {
            Some(count) => format!(" {} ({count}) ", self.title),
            None => format!(" {} ", self.title),
        }
    }
}

/// Tabs for a single-choice bar.
pub fn exclusive_tabs<'a>(titles: impl IntoIterator<Item = &'a str>, active: usize) -> Vec<Tab> {
    titles
        .into_iter()
        .enumerate()
        .map(|(i, t)| Tab::new(t, i == active))
        .collect()
}

pub struct RenderedTabBar {
    pub title: Option<String>,
    pub tabs: Vec<RenderedTab>,
    pub title_fg: Color,
    pub active_fg: Color,
    pub active_bg: Color,
    pub inactive_fg: Color,
    pub border_fg: Color,
    pub border: bool,
}

pub struct RenderedTab {
    pub label: String,
    pub is_active: bool,
}

pub struct TabBarBuildConfig<'a> {
    pub title: Option<&'a str>,
    pub tabs: &'a [Tab],
    pub depth: ColorDepth,
    pub title_color: Option<AppColor>,
    pub active_fg: Option<AppColor>,
    pub active_bg: Option<AppColor>,
    pub inactive_color: Option<AppColor>,
    pub border_color: Option<AppColor>,
    /// Draw the bottom rule (header bars); chip rows go without.
    pub border: bool,
}

impl RenderedTabBar {
    pub fn build(cfg: &TabBarBuildConfig<'_>) -> Self {
        let depth = cfg.depth;
        let to_fg = |c: Option<AppColor>, fallback: Color| {
            c.map_or(fallback, |c| c.to_crossterm_color(depth))
        };

        Self {
            title: cfg.title.map(|t| format!(" {t} ")),
            tabs: cfg
                .tabs
                .iter()
                .map(|tab| RenderedTab {
                    label: tab.label(),
                    is_active: tab.active,
                })
                .collect(),
            title_fg: to_fg(cfg.title_color, Color::White),
            active_fg: to_fg(cfg.active_fg, Color::Black),
            active_bg: to_fg(cfg.active_bg, Color::Cyan),
            inactive_fg: to_fg(cfg.inactive_color, Color::DarkGrey),
            border_fg: to_fg(cfg.border_color, Color::DarkGrey),
            border: cfg.border,
        }
    }
}

#[derive(Default, Props)]
pub struct TabBarProps {
    pub tab_bar: Option<RenderedTabBar>,
}

#[component]
pub fn TabBar(props: &mut TabBarProps) -> impl Into<AnyElement<'static>> {
    let Some(tb) = props.tab_bar.take() else {
        return element! { View }.into_any();
    };

    let active_fg = tb.active_fg;
    let active_bg = tb.active_bg;
    let inactive_fg = tb.inactive_fg;

    element! {
        View(
            border_style: if tb.border { BorderStyle::Single } else { BorderStyle::None },
            border_edges: Edges::Bottom,
            border_color: tb.border_fg,
            padding_left: 1,
        ) {
            #(tb.title.into_iter().map(|title| element! {
                View(padding_right: 2) {
                    Text(
                        content: title,
                        color: tb.title_fg,
                        weight: Weight::Bold,
                        wrap: TextWrap::NoWrap,
                    )
                }
            }))
            #(tb.tabs.into_iter().enumerate().map(|(i, tab)| {
                let (fg, bg, weight) = if tab.is_active {
                    (active_fg, active_bg, Weight::Bold)
                } else {
                    (inactive_fg, Color::Reset, Weight::Normal)
                };

                element! {
                    View(key: i, margin_right: 1, background_color: bg) {
                        Text(content: tab.label, color: fg, weight, wrap: TextWrap::NoWrap)
                    }
                }
            }))
        }
    }
    .into_any()
}
