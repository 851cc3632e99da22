use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};
use crate::components::label_chips::LabelWindow;
use crate::components::lines_view::{LinesView, RenderedLines, StyledLine, StyledSpan};
use crate::components::timeline::{Timeline, format_clock, format_progress};
use crate::components::truncate::wrap;
use crate::score::classify;
use crate::theme::ResolvedTheme;
use crate::types::{Conversation, ConversationDetail, CsReview};

// ---------------------------------------------------------------------------
// Drawer session state
// ---------------------------------------------------------------------------

/// Per-open state of the conversation drawer. Edits here are local until
/// the review is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawerState {
    pub conversation_id: String,
    pub detail: Option<ConversationDetail>,
    pub position: u32,
    pub playing: bool,
    pub verdict: Option<CsReview>,
    pub notes: String,
    pub labels_expanded: bool,
    pub scroll: usize,
}

impl DrawerState {
    pub fn open(conv: &Conversation) -> Self {
        Self {
            conversation_id: conv.id.clone(),
            detail: None,
            position: 0,
            playing: false,
            verdict: conv.cs_review,
            notes: String::new(),
            labels_expanded: false,
            scroll: 0,
        }
    }

    pub fn duration(&self) -> u32 {
        self.detail
            .as_ref()
            .map_or_else(|| ConversationDetail::default().duration_secs, |d| d.duration_secs)
    }

    /// Start or pause playback. Playing from the end restarts at zero.
    pub fn toggle_play(&mut self) {
        if !self.playing && self.position >= self.duration() {
            self.position = 0;
        }
        self.playing = !self.playing;
    }

    /// Advance one second of playback; stops at the end.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let duration = self.duration();
        self.position = (self.position + 1).min(duration);
        if self.position >= duration {
            self.playing = false;
        }
    }

    pub fn seek(&mut self, delta_secs: i64) {
        let target = i64::from(self.position) + delta_secs;
        let clamped = target.clamp(0, i64::from(self.duration()));
        self.position = u32::try_from(clamped).unwrap_or(0);
    }

    /// Approve or Need Fix; choosing the current verdict again clears it.
    pub fn set_verdict(&mut self, verdict: CsReview) {
        self.verdict = if self.verdict == Some(verdict) {
            None
        } else {
            Some(verdict)
        };
    }
}

// ---------------------------------------------------------------------------
// Drawer content
// ---------------------------------------------------------------------------

pub struct DrawerContent<'a> {
    pub conversation: &'a Conversation,
    pub bot_name: &'a str,
    pub state: &'a DrawerState,
    pub label_max: usize,
    /// Inner width available for text.
    pub width: usize,
    /// Shown under the header, e.g. `"r run eval  t ticket  x export"`.
    pub action_hint: String,
}

fn section(title: &str, theme: &ResolvedTheme) -> [StyledLine; 2] {
    [
        StyledLine::blank(),
        StyledLine::single(StyledSpan::bold(title, theme.text_accent)),
    ]
}

fn push_wrapped(lines: &mut Vec<StyledLine>, text: &str, width: usize, color: AppColor) {
    for l in wrap(text, width) {
        lines.push(StyledLine::single(StyledSpan::text(l, color)));
    }
}

pub fn build_drawer_lines(content: &DrawerContent<'_>, theme: &ResolvedTheme) -> Vec<StyledLine> {
    let conv = content.conversation;
    let state = content.state;
    let width = content.width.max(10);
    let mut lines = Vec::new();

    lines.push(StyledLine::from_spans(vec![
        StyledSpan::text(
            format!("{} \u{00b7} {}", content.bot_name, conv.date),
            theme.text_secondary,
        ),
    ]));
    let band = classify(conv.score);
    lines.push(StyledLine::from_spans(vec![
        StyledSpan::text("Score: ", theme.text_secondary),
        StyledSpan::bold(conv.score_display(), theme.band_color(band)),
        StyledSpan::text(format!("  ({})", band.label()), theme.text_faint),
    ]));
    lines.push(StyledLine::single(StyledSpan::text(
        content.action_hint.clone(),
        theme.text_faint,
    )));

    // Audio
    lines.extend(section("Audio", theme));
    let duration = state.duration();
    let play_label = if state.playing {
        "\u{23f8} Playing"
    } else {
        "\u{25b6} Paused"
    };
    lines.push(StyledLine::from_spans(vec![
        StyledSpan::text(format!("{play_label}  "), theme.text_primary),
        StyledSpan::text(format_progress(state.position, duration), theme.text_secondary),
    ]));
    match &state.detail {
        Some(detail) => {
            let timeline = Timeline {
                position: state.position,
                duration,
                violations: &detail.violations,
                width,
            };
            lines.push(timeline.to_line(theme));
            for v in &detail.violations {
                lines.push(StyledLine::from_spans(vec![
                    StyledSpan::text(
                        format!("  {} ", format_clock(v.offset_secs)),
                        theme.text_faint,
                    ),
                    StyledSpan::text("\u{25c6} ", theme.severity_color(v.severity)),
                    StyledSpan::text(
                        format!("{} ({})", v.kind, v.severity.label()),
                        theme.text_primary,
                    ),
                ]));
            }
        }
        None => lines.push(StyledLine::single(StyledSpan::text(
            "Loading detail...",
            theme.text_faint,
        ))),
    }

    // Transcript
    lines.extend(section("Transcript", theme));
    match &state.detail {
        Some(detail) if !detail.transcript.is_empty() => {
            for turn in &detail.transcript {
                let speaker_fg = match turn.role {
                    crate::types::Speaker::User => theme.text_accent,
                    crate::types::Speaker::Bot => theme.text_success,
                };
                let prefix = format!("[{}] {}: ", turn.time, turn.role.label());
                let body_width = width.saturating_sub(prefix.len()).max(10);
                for (i, l) in wrap(&turn.text, body_width).into_iter().enumerate() {
                    let lead = if i == 0 {
                        StyledSpan::text(prefix.clone(), speaker_fg)
                    } else {
                        StyledSpan::plain(" ".repeat(prefix.len()))
                    };
                    lines.push(StyledLine::from_spans(vec![
                        lead,
                        StyledSpan::text(l, theme.text_primary),
                    ]));
                }
            }
        }
        Some(_) => lines.push(StyledLine::single(StyledSpan::text(
            "No transcript",
            theme.text_faint,
        ))),
        None => lines.push(StyledLine::single(StyledSpan::text(
            "Loading detail...",
            theme.text_faint,
        ))),
    }

    // QA answer, unclipped
    lines.extend(section("QA Answer", theme));
    push_wrapped(&mut lines, &conv.qa_answer, width, theme.text_primary);

    // CS review
    lines.extend(section("CS Review", theme));
    lines.push(StyledLine::from_spans(vec![
        StyledSpan::text("Verdict: ", theme.text_secondary),
        StyledSpan::bold(
            state.verdict.map_or("\u{2014}", CsReview::label),
            theme.review_color(state.verdict),
        ),
    ]));
    if state.notes.is_empty() {
        lines.push(StyledLine::single(
            StyledSpan::text("No notes", theme.text_faint).italic(),
        ));
    } else {
        push_wrapped(&mut lines, &state.notes, width, theme.text_primary);
    }

    // Labels
    lines.extend(section("Labels", theme));
    if conv.labels.is_empty() {
        lines.push(StyledLine::single(StyledSpan::text("None", theme.text_faint)));
    } else {
        let window = LabelWindow::split(&conv.labels, content.label_max);
        lines.push(StyledLine::from_spans(window.to_spans(
            state.labels_expanded,
            theme.text_accent,
            theme.text_faint,
        )));
    }

    // Policy
    lines.extend(section("Policy Check", theme));
    let policy = if conv.policy_pass {
        "\u{2713} Passed"
    } else {
        "\u{2717} Failed"
    };
    lines.push(StyledLine::single(StyledSpan::bold(
        policy,
        theme.policy_color(conv.policy_pass),
    )));

    lines
}

// ---------------------------------------------------------------------------
// Pre-rendered drawer (all owned)
// ---------------------------------------------------------------------------

pub struct RenderedDrawer {
    pub title: String,
    pub scroll_indicator: String,
    pub lines: RenderedLines,
    pub width: u32,
    pub title_fg: Color,
    pub border_fg: Color,
    pub indicator_fg: Color,
}

impl RenderedDrawer {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        title: &str,
        lines: &[StyledLine],
        scroll_offset: usize,
        visible_lines: usize,
        width: u16,
        depth: ColorDepth,
        theme: &ResolvedTheme,
    ) -> Self {
        let total = lines.len();
        let scroll_indicator = if total > visible_lines {
            format!("{}%", (scroll_offset * 100) / total.saturating_sub(visible_lines).max(1))
        } else {
            String::new()
        };

        Self {
            title: title.to_owned(),
            scroll_indicator,
            lines: RenderedLines::build(lines, scroll_offset, visible_lines, depth),
            width: u32::from(width),
            title_fg: theme.text_primary.to_crossterm_color(depth),
            border_fg: theme.border_primary.to_crossterm_color(depth),
            indicator_fg: theme.text_faint.to_crossterm_color(depth),
        }
    }
}

#[derive(Default, Props)]
pub struct DrawerProps {
    pub drawer: Option<RenderedDrawer>,
}

#[component]
pub fn Drawer(props: &mut DrawerProps) -> impl Into<AnyElement<'static>> {
    let Some(d) = props.drawer.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(
            flex_direction: FlexDirection::Column,
            width: d.width,
            border_style: BorderStyle::Single,
            border_edges: Edges::Left,
            border_color: d.border_fg,
            padding_left: 1,
            padding_right: 1,
            overflow: Overflow::Hidden,
        ) {
            View(margin_bottom: 1) {
                View(flex_grow: 1.0) {
                    Text(
                        content: d.title,
                        color: d.title_fg,
                        weight: Weight::Bold,
                        wrap: TextWrap::NoWrap,
                    )
                }
                Text(content: d.scroll_indicator, color: d.indicator_fg, wrap: TextWrap::NoWrap)
            }
            LinesView(lines: d.lines)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockRepository;

    fn sample() -> (Conversation, ConversationDetail) {
        let repo = MockRepository::embedded().unwrap();
        let conv = repo
            .conversations()
            .iter()
            .find(|c| c.id == "2c81e5a4")
            .cloned()
            .unwrap();
        use crate::repository::Repository;
        let detail = repo.detail(&conv.id).unwrap();
        (conv, detail)
    }

    #[test]
    fn playback_advances_and_stops_at_duration() {
        let (conv, detail) = sample();
        let mut state = DrawerState::open(&conv);
        state.detail = Some(detail);
        state.toggle_play();
        for _ in 0..500 {
            state.tick();
        }
        assert_eq!(state.position, 180);
        assert!(!state.playing);

        // Playing again from the end restarts.
        state.toggle_play();
        assert_eq!(state.position, 0);
        assert!(state.playing);
    }

    #[test]
    fn paused_tick_does_nothing() {
        let (conv, _) = sample();
        let mut state = DrawerState::open(&conv);
        state.tick();
        assert_eq!(state.position, 0);
    }

    #[test]
    fn seek_is_clamped() {
        let (conv, _) = sample();
        let mut state = DrawerState::open(&conv);
        state.seek(-10);
        assert_eq!(state.position, 0);
        state.seek(1_000);
        assert_eq!(state.position, 180);
    }

    #[test]
    fn verdict_toggles_off_when_repeated() {
        let (conv, _) = sample();
        let mut state = DrawerState::open(&conv);
        assert_eq!(state.verdict, Some(CsReview::NeedFix));
        state.set_verdict(CsReview::NeedFix);
        assert_eq!(state.verdict, None);
        state.set_verdict(CsReview::Approved);
        assert_eq!(state.verdict, Some(CsReview::Approved));
    }

    #[test]
    fn content_shows_full_answer_and_policy() {
        let (conv, detail) = sample();
        let mut state = DrawerState::open(&conv);
        state.detail = Some(detail);
        let theme = crate::views::default_theme();
        let lines = build_drawer_lines(
            &DrawerContent {
                conversation: &conv,
                bot_name: "Tech Support AI",
                state: &state,
                label_max: 5,
                width: 200,
                action_hint: String::new(),
            },
            &theme,
        );
        let text: Vec<String> = lines.iter().map(StyledLine::plain_text).collect();
        assert!(text.iter().any(|l| l.contains(&conv.qa_answer)));
        assert!(text.iter().any(|l| l.contains("Failed")));
        assert!(text.iter().any(|l| l.contains("0:00 / 3:00")));
        assert!(text.iter().any(|l| l.contains("Missing Auth (error)")));
    }
}
