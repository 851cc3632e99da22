use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};

// ---------------------------------------------------------------------------
// Line editing
// ---------------------------------------------------------------------------

/// What a key press did to an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The buffer changed or the key was ignored; keep editing.
    Editing,
    /// Enter on a single-line input.
    Submit,
    /// Esc: leave the input.
    Done,
}

/// Apply one key to `buf`. With `multiline`, Enter inserts a newline.
pub fn apply_edit_key(buf: &mut String, code: KeyCode, multiline: bool) -> EditOutcome {
    match code {
        KeyCode::Esc => EditOutcome::Done,
        KeyCode::Enter if multiline => {
            buf.push('\n');
            EditOutcome::Editing
        }
        KeyCode::Enter => EditOutcome::Submit,
        KeyCode::Backspace => {
            buf.pop();
            EditOutcome::Editing
        }
        KeyCode::Tab if multiline => {
            buf.push_str("  ");
            EditOutcome::Editing
        }
        KeyCode::Char(ch) => {
            buf.push(ch);
            EditOutcome::Editing
        }
        _ => EditOutcome::Editing,
    }
}

// ---------------------------------------------------------------------------
// Pre-rendered text input
// ---------------------------------------------------------------------------

pub struct RenderedTextInput {
    pub prompt: String,
    pub text: String,
    pub text_fg: Color,
    pub prompt_fg: Color,
    pub border_fg: Color,
}

impl RenderedTextInput {
    /// Multi-line buffers show their last line only.
    pub fn build(
        prompt: &str,
        text: &str,
        depth: ColorDepth,
        text_color: Option<AppColor>,
        prompt_color: Option<AppColor>,
        border_color: Option<AppColor>,
    ) -> Self {
        let text_fg = text_color.map_or(Color::White, |c| c.to_crossterm_color(depth));
        let prompt_fg = prompt_color.map_or(Color::Cyan, |c| c.to_crossterm_color(depth));
        let border_fg = border_color.map_or(Color::DarkGrey, |c| c.to_crossterm_color(depth));
        let last_line = text.rsplit('\n').next().unwrap_or_default();

        Self {
            prompt: prompt.to_owned(),
            text: format!("{last_line}\u{2588}"),
            text_fg,
            prompt_fg,
            border_fg,
        }
    }
}

// ---------------------------------------------------------------------------
// TextInput component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct TextInputProps {
    pub input: Option<RenderedTextInput>,
}

#[component]
pub fn TextInput(props: &mut TextInputProps) -> impl Into<AnyElement<'static>> {
    let Some(input) = props.input.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: input.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: input.prompt, color: input.prompt_fg, wrap: TextWrap::NoWrap)
            Text(content: " ", color: input.text_fg)
            Text(content: input.text, color: input.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace() {
        let mut buf = String::new();
        for ch in "piz".chars() {
            assert_eq!(apply_edit_key(&mut buf, KeyCode::Char(ch), false), EditOutcome::Editing);
        }
        apply_edit_key(&mut buf, KeyCode::Backspace, false);
        apply_edit_key(&mut buf, KeyCode::Char('i'), false);
        assert_eq!(buf, "pii");
    }

    #[test]
    fn enter_submits_single_line() {
        let mut buf = "auth".to_owned();
        assert_eq!(apply_edit_key(&mut buf, KeyCode::Enter, false), EditOutcome::Submit);
        assert_eq!(buf, "auth");
    }

    #[test]
    fn enter_adds_newline_when_multiline() {
        let mut buf = "line one".to_owned();
        assert_eq!(apply_edit_key(&mut buf, KeyCode::Enter, true), EditOutcome::Editing);
        assert_eq!(buf, "line one\n");
        assert_eq!(apply_edit_key(&mut buf, KeyCode::Esc, true), EditOutcome::Done);
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut buf = String::new();
        apply_edit_key(&mut buf, KeyCode::Backspace, false);
        assert!(buf.is_empty());
    }

    #[test]
    fn rendered_input_shows_last_line() {
        let r = RenderedTextInput::build(
            "Notes:",
            "first\nsecond",
            ColorDepth::TrueColor,
            None,
            None,
            None,
        );
        assert_eq!(r.text, "second\u{2588}");
    }
}
