// ---------------------------------------------------------------------------
// Score classification
// ---------------------------------------------------------------------------

/// Severity band for a QA score or a pass rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    Good,
    Warning,
    Bad,
    Unknown,
}

/// Lower bound (inclusive) of the good band.
pub const GOOD_THRESHOLD: u8 = 85;
/// Lower bound (inclusive) of the warning band.
pub const WARNING_THRESHOLD: u8 = 70;

/// Map a score (or its absence) to a band.
///
/// This is the only place the thresholds live; every view that colors a
/// score or pass rate goes through it.
pub fn classify(score: Option<u8>) -> ScoreBand {
    match score {
        None => ScoreBand::Unknown,
        Some(s) if s >= GOOD_THRESHOLD => ScoreBand::Good,
        Some(s) if s >= WARNING_THRESHOLD => ScoreBand::Warning,
        Some(_) => ScoreBand::Bad,
    }
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representative_scores() {
        assert_eq!(classify(Some(90)), ScoreBand::Good);
        assert_eq!(classify(Some(75)), ScoreBand::Warning);
        assert_eq!(classify(Some(50)), ScoreBand::Bad);
        assert_eq!(classify(None), ScoreBand::Unknown);
    }

    #[test]
    fn lower_bounds_are_inclusive() {
        assert_eq!(classify(Some(85)), ScoreBand::Good);
        assert_eq!(classify(Some(84)), ScoreBand::Warning);
        assert_eq!(classify(Some(70)), ScoreBand::Warning);
        assert_eq!(classify(Some(69)), ScoreBand::Bad);
    }

    #[test]
    fn zero_is_a_score_not_an_absence() {
        assert_eq!(classify(Some(0)), ScoreBand::Bad);
        assert_eq!(classify(Some(100)), ScoreBand::Good);
    }
}
