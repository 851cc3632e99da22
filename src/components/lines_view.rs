use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};

// ---------------------------------------------------------------------------
// Styled text model shared by the drawer, popovers and the prompt screen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub color: Option<AppColor>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyledSpan {
    pub fn text(text: impl Into<String>, color: AppColor) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
            italic: false,
            underline: false,
        }
    }

    /// Span in the terminal's default foreground.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub fn bold(text: impl Into<String>, color: AppColor) -> Self {
        Self {
            bold: true,
            ..Self::text(text, color)
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn from_spans(spans: Vec<StyledSpan>) -> Self {
        Self { spans }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn single(span: StyledSpan) -> Self {
        Self { spans: vec![span] }
    }

    /// `label: value` with the label in `label_fg`.
    pub fn field(
        label: &str,
        value: impl Into<String>,
        label_fg: AppColor,
        value_fg: AppColor,
    ) -> Self {
        Self {
            spans: vec![
                StyledSpan::text(format!("{label}: "), label_fg),
                StyledSpan::text(value, value_fg),
            ],
        }
    }

    pub fn push(&mut self, span: StyledSpan) {
        self.spans.push(span);
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Pre-rendered line data (all owned)
// ---------------------------------------------------------------------------

pub struct RenderedLines {
    pub lines: Vec<RenderedLine>,
    pub total_lines: usize,
}

pub struct RenderedLine {
    pub key: usize,
    pub spans: Vec<RenderedSpan>,
}

pub struct RenderedSpan {
    pub text: String,
    pub fg: Option<Color>,
    pub weight: Weight,
    pub italic: bool,
    pub decoration: TextDecoration,
}

impl RenderedLines {
    /// Apply scroll and color depth conversion to a slice of styled lines.
    pub fn build(
        lines: &[StyledLine],
        scroll_offset: usize,
        visible_lines: usize,
        depth: ColorDepth,
    ) -> Self {
        let total_lines = lines.len();
        let start = scroll_offset.min(total_lines);
        let end = (start + visible_lines).min(total_lines);

        let rendered = lines[start..end]
            .iter()
            .enumerate()
            .map(|(i, line)| RenderedLine {
                key: start + i,
                spans: line
                    .spans
                    .iter()
                    .map(|span| RenderedSpan {
                        text: span.text.clone(),
                        fg: span.color.map(|c| c.to_crossterm_color(depth)),
                        weight: if span.bold {
                            Weight::Bold
                        } else {
                            Weight::Normal
                        },
                        italic: span.italic,
                        decoration: if span.underline {
                            TextDecoration::Underline
                        } else {
                            TextDecoration::None
                        },
                    })
                    .collect(),
            })
            .collect();

        Self {
            lines: rendered,
            total_lines,
        }
    }
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll(total_lines: usize, visible_lines: usize) -> usize {
    total_lines.saturating_sub(visible_lines)
}

// ---------------------------------------------------------------------------
// LinesView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct LinesViewProps {
    pub lines: Option<RenderedLines>,
}

#[component]
pub fn LinesView(props: &mut LinesViewProps) -> impl Into<AnyElement<'static>> {
    let Some(rendered) = props.lines.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(flex_direction: FlexDirection::Column) {
            #(rendered.lines.into_iter().map(|line| {
                element! {
                    View(key: line.key) {
                        #(line.spans.into_iter().enumerate().map(|(si, span)| {
                            element! {
                                Text(
                                    key: si,
                                    content: span.text,
                                    color: span.fg,
                                    weight: span.weight,
                                    italic: span.italic,
                                    decoration: span.decoration,
                                    wrap: TextWrap::NoWrap,
                                )
                            }
                        }))
                    }
                }
            }))
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<StyledLine> {
        (0..n)
            .map(|i| StyledLine::single(StyledSpan::plain(format!("line {i}"))))
            .collect()
    }

    #[test]
    fn build_applies_scroll_window() {
        let r = RenderedLines::build(&lines(10), 3, 4, ColorDepth::TrueColor);
        assert_eq!(r.total_lines, 10);
        assert_eq!(r.lines.len(), 4);
        assert_eq!(r.lines[0].key, 3);
        assert_eq!(r.lines[0].spans[0].text, "line 3");
    }

    #[test]
    fn build_past_end_is_empty() {
        let r = RenderedLines::build(&lines(2), 5, 4, ColorDepth::TrueColor);
        assert!(r.lines.is_empty());
    }

    #[test]
    fn plain_span_has_no_color() {
        let r = RenderedLines::build(&lines(1), 0, 1, ColorDepth::Color16);
        assert!(r.lines[0].spans[0].fg.is_none());
    }

    #[test]
    fn field_joins_label_and_value() {
        let line = StyledLine::field("Score", "92", AppColor::Ansi256(8), AppColor::Ansi256(2));
        assert_eq!(line.plain_text(), "Score: 92");
    }

    #[test]
    fn max_scroll_saturates() {
        assert_eq!(max_scroll(3, 10), 0);
        assert_eq!(max_scroll(12, 10), 2);
    }
}
