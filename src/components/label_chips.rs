use crate::color::Color;
use crate::components::lines_view::StyledSpan;

/// Labels split into the chips shown inline and the ones behind "+K".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelWindow<'a> {
    pub visible: &'a [String],
    pub overflow: &'a [String],
}

impl<'a> LabelWindow<'a> {
    /// First `max` labels are visible; the rest overflow, order kept.
    pub fn split(labels: &'a [String], max: usize) -> Self {
        let (visible, overflow) = labels.split_at(max.min(labels.len()));
        Self { visible, overflow }
    }

    pub fn overflow_count(&self) -> usize {
        self.overflow.len()
    }

    /// The disclosure chip text, e.g. `"+2"`.
    pub fn overflow_chip(&self) -> Option<String> {
        (!self.overflow.is_empty()).then(|| format!("+{}", self.overflow.len()))
    }

    /// Labels as one line: `"auth policy +1"`, or all of them when expanded.
    pub fn to_text(&self, expanded: bool) -> String {
        let mut parts: Vec<String> = self.visible.to_vec();
        if expanded {
            parts.extend(self.overflow.iter().cloned());
        } else if let Some(chip) = self.overflow_chip() {
            parts.push(chip);
        }
        parts.join(" ")
    }

    /// Chip spans for a styled line: each label bracketed, overflow faint.
    pub fn to_spans(&self, expanded: bool, chip_fg: Color, overflow_fg: Color) -> Vec<StyledSpan> {
        let mut spans = Vec::new();
        let shown = self
            .visible
            .iter()
            .chain(self.overflow.iter().filter(|_| expanded));
        for label in shown {
            spans.push(StyledSpan::text(format!("[{label}]"), chip_fg));
            spans.push(StyledSpan::plain(" "));
        }
        if !expanded && let Some(chip) = self.overflow_chip() {
            spans.push(StyledSpan::text(chip, overflow_fg));
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn splits_at_max_and_counts_overflow() {
        let all = labels(&["a", "b", "c", "d"]);
        let window = LabelWindow::split(&all, 2);
        assert_eq!(window.visible, &all[..2]);
        assert_eq!(window.overflow_count(), 2);
        assert_eq!(window.overflow, &labels(&["c", "d"])[..]);
    }

    #[test]
    fn visible_plus_overflow_restores_the_list() {
        let all = labels(&["x", "x", "y"]);
        let window = LabelWindow::split(&all, 1);
        let rejoined: Vec<String> = window
            .visible
            .iter()
            .chain(window.overflow)
            .cloned()
            .collect();
        assert_eq!(rejoined, all);
    }

    #[test]
    fn no_chip_when_everything_fits() {
        let all = labels(&["pii"]);
        let window = LabelWindow::split(&all, 5);
        assert_eq!(window.overflow_chip(), None);
        assert_eq!(window.to_text(false), "pii");
    }

    #[test]
    fn text_rendering_collapsed_and_expanded() {
        let all = labels(&["pii", "policy", "security"]);
        let window = LabelWindow::split(&all, 2);
        assert_eq!(window.to_text(false), "pii policy +1");
        assert_eq!(window.to_text(true), "pii policy security");
    }
}
