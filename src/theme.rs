use crate::color::Color;
use crate::config::types::Theme;
use crate::score::ScoreBand;
use crate::types::{BotStatus, CsReview, ViolationSeverity};

/// Detected terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    /// Read `COLORFGBG` ("fg;bg"); anything unreadable counts as dark.
    pub fn detect() -> Self {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
            .unwrap_or(Background::Dark)
    }

    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.parse().ok()?;
        // 0-6 and 8 are the dark ANSI backgrounds.
        Some(if bg > 6 && bg != 8 {
            Background::Light
        } else {
            Background::Dark
        })
    }
}

/// Every color slot filled in, from config or from the background defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_inverted: Color,
    pub text_faint: Color,
    pub text_success: Color,
    pub text_warning: Color,
    pub text_error: Color,
    pub text_accent: Color,
    pub bg_selected: Color,
    pub bg_chip: Color,
    pub border_primary: Color,
    pub border_faint: Color,
}

impl ResolvedTheme {
    pub fn resolve(theme: &Theme, bg: Background) -> Self {
        let d = Self::defaults(bg);
        let text = &theme.colors.text;
        let back = &theme.colors.background;
        let border = &theme.colors.border;
        Self {
            text_primary: text.primary.unwrap_or(d.text_primary),
            text_secondary: text.secondary.unwrap_or(d.text_secondary),
            text_inverted: text.inverted.unwrap_or(d.text_inverted),
            text_faint: text.faint.unwrap_or(d.text_faint),
            text_success: text.success.unwrap_or(d.text_success),
            text_warning: text.warning.unwrap_or(d.text_warning),
            text_error: text.error.unwrap_or(d.text_error),
            text_accent: text.accent.unwrap_or(d.text_accent),
            bg_selected: back.selected.unwrap_or(d.bg_selected),
            bg_chip: back.chip.unwrap_or(d.bg_chip),
            border_primary: border.primary.unwrap_or(d.border_primary),
            border_faint: border.faint.unwrap_or(d.border_faint),
        }
    }

    fn defaults(bg: Background) -> Self {
        match bg {
            Background::Dark => Self {
                text_primary: Color::Ansi256(7),
                text_secondary: Color::Ansi256(245),
                text_inverted: Color::Ansi256(0),
                text_faint: Color::Ansi256(243),
                text_success: Color::Ansi256(10),
                text_warning: Color::Ansi256(11),
                text_error: Color::Ansi256(9),
                text_accent: Color::Ansi256(12),
                bg_selected: Color::Ansi256(237),
                bg_chip: Color::Ansi256(236),
                border_primary: Color::Ansi256(244),
                border_faint: Color::Ansi256(241),
            },
            Background::Light => Self {
                text_primary: Color::Ansi256(0),
                text_secondary: Color::Ansi256(240),
                text_inverted: Color::Ansi256(15),
                text_faint: Color::Ansi256(248),
                text_success: Color::Ansi256(2),
                text_warning: Color::Ansi256(3),
                text_error: Color::Ansi256(1),
                text_accent: Color::Ansi256(4),
                bg_selected: Color::Ansi256(254),
                bg_chip: Color::Ansi256(253),
                border_primary: Color::Ansi256(240),
                border_faint: Color::Ansi256(252),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Semantic color lookups
    // -----------------------------------------------------------------------

    pub fn band_color(&self, band: ScoreBand) -> Color {
        match band {
            ScoreBand::Good => self.text_success,
            ScoreBand::Warning => self.text_warning,
            ScoreBand::Bad => self.text_error,
            ScoreBand::Unknown => self.text_faint,
        }
    }

    pub fn status_color(&self, status: BotStatus) -> Color {
        match status {
            BotStatus::Active => self.text_success,
            BotStatus::Testing => self.text_warning,
            BotStatus::Inactive => self.text_faint,
        }
    }

    pub fn review_color(&self, review: Option<CsReview>) -> Color {
        match review {
            Some(CsReview::Approved) => self.text_success,
            Some(CsReview::NeedFix) => self.text_error,
            Some(CsReview::ToReview) => self.text_warning,
            None => self.text_faint,
        }
    }

    pub fn policy_color(&self, pass: bool) -> Color {
        if pass { self.text_success } else { self.text_error }
    }

    pub fn severity_color(&self, severity: ViolationSeverity) -> Color {
        match severity {
            ViolationSeverity::Warning => self.text_warning,
            ViolationSeverity::Error => self.text_error,
        }
    }
}
