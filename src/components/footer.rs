use iocraft::prelude::*;

use crate::app::ViewKind;
use crate::color::{Color as AppColor, ColorDepth};
use crate::engine::CommandStatus;
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Footer component: view indicators, context, command status
// ---------------------------------------------------------------------------

pub struct FooterView {
    pub label: String,
    pub is_active: bool,
}

pub struct RenderedFooter {
    pub views: Vec<FooterView>,
    pub context_text: String,
    pub status_text: String,
    pub status_fg: Color,
    pub help_hint: String,
    pub active_fg: Color,
    pub active_bg: Color,
    pub inactive_fg: Color,
    pub text_fg: Color,
    pub border_fg: Color,
}

impl RenderedFooter {
    pub fn build(
        active_view: ViewKind,
        context_text: String,
        status: Option<&CommandStatus>,
        depth: ColorDepth,
        theme: &ResolvedTheme,
    ) -> Self {
        let fg = |c: AppColor| c.to_crossterm_color(depth);
        let (status_text, status_color) = match status {
            Some(s @ CommandStatus::Pending(_)) => (s.message().to_owned(), theme.text_warning),
            Some(s @ CommandStatus::Succeeded(_)) => (s.message().to_owned(), theme.text_success),
            Some(s @ CommandStatus::Failed(_)) => (s.message().to_owned(), theme.text_error),
            None => (String::new(), theme.text_faint),
        };

        Self {
            views: ViewKind::ALL
                .iter()
                .map(|v| FooterView {
                    label: v.label().to_owned(),
                    is_active: *v == active_view,
                })
                .collect(),
            context_text,
            status_text,
            status_fg: fg(status_color),
            help_hint: "? help".to_owned(),
            active_fg: fg(theme.text_inverted),
            active_bg: fg(theme.text_accent),
            inactive_fg: fg(theme.text_faint),
            text_fg: fg(theme.text_secondary),
            border_fg: fg(theme.border_faint),
        }
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let mut context_contents = Vec::new();
    if !f.context_text.is_empty() {
        context_contents.push(MixedTextContent::new(&f.context_text).color(f.text_fg));
    }
    if !f.context_text.is_empty() && !f.status_text.is_empty() {
        context_contents.push(MixedTextContent::new("  \u{2022}  ").color(f.text_fg));
    }
    if !f.status_text.is_empty() {
        context_contents.push(MixedTextContent::new(&f.status_text).color(f.status_fg));
    }

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            #(f.views.iter().map(|v| {
                let (fg, bg, weight) = if v.is_active {
                    (f.active_fg, f.active_bg, Weight::Bold)
                } else {
                    (f.inactive_fg, Color::Reset, Weight::Normal)
                };
                element! {
                    View(background_color: bg) {
                        Text(
                            content: format!(" {} ", v.label),
                            color: fg,
                            weight,
                            wrap: TextWrap::NoWrap,
                        )
                    }
                }
            }))
            Text(content: " \u{2502} ", color: f.text_fg, wrap: TextWrap::NoWrap)
            View(flex_grow: 1.0) {
                MixedText(contents: context_contents, wrap: TextWrap::NoWrap)
            }
            Text(content: " \u{2502} ", color: f.text_fg, wrap: TextWrap::NoWrap)
            Text(content: f.help_hint.clone(), color: f.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
