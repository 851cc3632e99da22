use qa_board::components::label_chips::LabelWindow;
use qa_board::filter::{
    ConversationFilter, QuickFilter, QuickFilterSet, filter_bots, filter_conversations,
};
use qa_board::repository::{BotDirectory, MockRepository, Repository};
use qa_board::score::{ScoreBand, classify};
use qa_board::selection::SelectionSet;

fn repo() -> MockRepository {
    MockRepository::embedded().unwrap()
}

fn ids(repo: &MockRepository, filter: &ConversationFilter) -> Vec<String> {
    repo.list_conversations(filter)
        .into_iter()
        .map(|c| c.id)
        .collect()
}

fn quick(filters: &[QuickFilter]) -> ConversationFilter {
    ConversationFilter {
        quick: filters.iter().copied().collect(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Search and quick filters over the sample data
// ---------------------------------------------------------------------------

#[test]
fn search_pii_finds_one_conversation() {
    let repo = repo();
    let filter = ConversationFilter {
        query: "pii".to_owned(),
        ..Default::default()
    };
    assert_eq!(ids(&repo, &filter), ["2c81e5a4"]);
}

#[test]
fn search_is_case_insensitive_and_covers_bot_names() {
    let repo = repo();
    let filter = ConversationFilter {
        query: "SALES assistant".to_owned(),
        ..Default::default()
    };
    assert_eq!(ids(&repo, &filter), ["3c05e7f8", "8e93f4c2"]);
}

#[test]
fn every_search_hit_contains_the_query() {
    let repo = repo();
    for query in ["bot", "flow", "9", "e"] {
        let filter = ConversationFilter {
            query: query.to_owned(),
            ..Default::default()
        };
        let all = repo.conversations();
        let hits = repo.list_conversations(&filter);
        assert!(hits.len() <= all.len());
        for conv in &hits {
            let haystack = format!(
                "{} {} {}",
                conv.id,
                repo.bot_name(&conv.bot_id),
                conv.qa_answer
            )
            .to_lowercase();
            assert!(haystack.contains(query), "{} lacks {query}", conv.id);
        }
    }
}

#[test]
fn policy_fail_and_need_fix_combined() {
    let repo = repo();
    let filter = quick(&[QuickFilter::PolicyFail, QuickFilter::NeedFix]);
    assert_eq!(ids(&repo, &filter), ["9f7a2b3c", "8e93f4c2", "2c81e5a4"]);
}

#[test]
fn score_low_excludes_75_and_above() {
    let repo = repo();
    let filter = quick(&[QuickFilter::ScoreLow]);
    let hits = repo.list_conversations(&filter);
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|c| c.score.is_some_and(|s| s < 75)));
}

#[test]
fn combined_filters_equal_intersection_of_each() {
    let repo = repo();
    let single = |f: QuickFilter| ids(&repo, &quick(&[f]));
    let policy = single(QuickFilter::PolicyFail);
    let low = single(QuickFilter::ScoreLow);
    let fix = single(QuickFilter::NeedFix);

    let combined = ids(
        &repo,
        &quick(&[QuickFilter::ScoreLow, QuickFilter::NeedFix, QuickFilter::PolicyFail]),
    );
    let expected: Vec<String> = policy
        .iter()
        .filter(|id| low.contains(id) && fix.contains(id))
        .cloned()
        .collect();
    assert_eq!(combined, expected);
}

#[test]
fn activation_order_does_not_change_results() {
    let repo = repo();
    let a = ids(&repo, &quick(&[QuickFilter::NeedFix, QuickFilter::ScoreLow]));
    let b = ids(&repo, &quick(&[QuickFilter::ScoreLow, QuickFilter::NeedFix]));
    assert_eq!(a, b);
}

#[test]
fn double_toggle_restores_previous_results() {
    let repo = repo();
    let mut filter = quick(&[QuickFilter::PolicyFail]);
    let before = ids(&repo, &filter);

    filter.quick.toggle(QuickFilter::ScoreLow);
    filter.quick.toggle(QuickFilter::ScoreLow);

    assert_eq!(ids(&repo, &filter), before);
    assert!(!filter.quick.is_active(QuickFilter::ScoreLow));
}

#[test]
fn bot_scope_combines_with_quick_filters() {
    let repo = repo();
    let mut filter = ConversationFilter::for_bot("bot_123");
    assert_eq!(ids(&repo, &filter), ["9f7a2b3c", "7b21c5d4", "2c81e5a4"]);

    filter.quick = QuickFilterSet::from_iter([QuickFilter::PolicyFail]);
    assert_eq!(ids(&repo, &filter), ["9f7a2b3c", "2c81e5a4"]);
}

#[test]
fn filter_indices_match_repository_listing() {
    let repo = repo();
    let filter = quick(&[QuickFilter::NeedFix]);
    let indices = filter_conversations(repo.conversations(), &repo, &filter);
    let via_indices: Vec<&str> = indices
        .iter()
        .map(|&i| repo.conversations()[i].id.as_str())
        .collect();
    assert_eq!(via_indices, ids(&repo, &filter));
}

#[test]
fn bot_search_matches_tags() {
    let repo = repo();
    let bots = repo.list_bots();
    let hits: Vec<&str> = filter_bots(bots, "tier-1")
        .into_iter()
        .map(|i| bots[i].id.as_str())
        .collect();
    assert_eq!(hits, ["bot_123", "bot_234"]);
    assert_eq!(filter_bots(bots, "").len(), bots.len());
    assert!(filter_bots(bots, "no such bot").is_empty());
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn select_all_then_again_clears() {
    let repo = repo();
    let visible: Vec<&str> = repo.conversations().iter().map(|c| c.id.as_str()).collect();
    let mut selection = SelectionSet::new();

    selection.toggle_all(visible.iter().copied());
    assert!(selection.all_selected(visible.len()));
    assert_eq!(selection.len(), visible.len());

    selection.toggle_all(visible.iter().copied());
    assert!(selection.is_empty());
    assert!(!selection.all_selected(visible.len()));
}

#[test]
fn partial_selection_becomes_full_on_toggle_all() {
    let mut selection = SelectionSet::new();
    selection.toggle("9f7a2b3c");
    selection.toggle_all(["9f7a2b3c", "8e93f4c2", "2c81e5a4"]);
    assert_eq!(selection.ids(), ["9f7a2b3c", "8e93f4c2", "2c81e5a4"]);
}

#[test]
fn selection_survives_filter_changes() {
    let repo = repo();
    let mut selection = SelectionSet::new();
    selection.toggle("7b21c5d4");

    let narrowed = ids(&repo, &quick(&[QuickFilter::PolicyFail]));
    assert!(!narrowed.contains(&"7b21c5d4".to_owned()));
    assert!(selection.contains("7b21c5d4"));
}

// ---------------------------------------------------------------------------
// Labels and score bands
// ---------------------------------------------------------------------------

#[test]
fn label_overflow_keeps_order() {
    let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| (*s).to_owned()).collect();
    let window = LabelWindow::split(&labels, 2);
    assert_eq!(window.visible, ["a", "b"]);
    assert_eq!(window.overflow, ["c", "d"]);
    assert_eq!(window.overflow_chip().as_deref(), Some("+2"));
    assert_eq!(window.to_text(false), "a b +2");
    assert_eq!(window.to_text(true), "a b c d");
}

#[test]
fn short_label_lists_have_no_chip() {
    let labels = vec!["auth".to_owned()];
    let window = LabelWindow::split(&labels, 2);
    assert_eq!(window.overflow_count(), 0);
    assert_eq!(window.overflow_chip(), None);
}

#[test]
fn sample_scores_land_in_expected_bands() {
    let repo = repo();
    let band = |id: &str| classify(repo.conversation(id).and_then(|c| c.score));
    assert_eq!(band("6d42a1b9"), ScoreBand::Good);
    assert_eq!(band("3c05e7f8"), ScoreBand::Warning);
    assert_eq!(band("2c81e5a4"), ScoreBand::Bad);
    assert_eq!(band("missing"), ScoreBand::Unknown);
}
