//! Plain-text listings for the non-interactive subcommands.

use std::fmt::Write as _;

use unicode_width::UnicodeWidthStr;

use crate::components::label_chips::LabelWindow;
use crate::components::truncate::truncate;
use crate::repository::BotDirectory;
use crate::types::{Bot, Conversation, CsReview};

const ANSWER_WIDTH: usize = 48;

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Left-aligned columns sized to their widest cell, separated by two spaces.
fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| pad(c, w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", line(header.to_vec()));
    for row in rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    out
}

pub fn bot_table(bots: &[&Bot]) -> String {
    if bots.is_empty() {
        return "No bots found\n".to_owned();
    }
    let rows: Vec<Vec<String>> = bots
        .iter()
        .map(|b| {
            vec![
                b.id.clone(),
                b.name.clone(),
                b.status.to_string(),
                b.pass_rate_display(),
                b.conv_count_display(),
                b.last_qa_display(),
                b.tags.join(","),
            ]
        })
        .collect();
    render_table(
        &["ID", "NAME", "STATUS", "PASS", "CONVS", "LAST QA", "TAGS"],
        &rows,
    )
}

pub fn conversation_table<D: BotDirectory + ?Sized>(
    conversations: &[&Conversation],
    bots: &D,
    label_max: usize,
) -> String {
    if conversations.is_empty() {
        return "No conversations found\n".to_owned();
    }
    let rows: Vec<Vec<String>> = conversations
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                bots.bot_name(&c.bot_id).to_owned(),
                c.date.clone(),
                c.score_display(),
                c.cs_review.map_or("\u{2014}", CsReview::label).to_owned(),
                if c.policy_pass { "pass" } else { "fail" }.to_owned(),
                LabelWindow::split(&c.labels, label_max).to_text(false),
                truncate(&c.qa_answer, ANSWER_WIDTH),
            ]
        })
        .collect();
    render_table(
        &["ID", "BOT", "DATE", "SCORE", "REVIEW", "POLICY", "LABELS", "QA ANSWER"],
        &rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockRepository, Repository};

    #[test]
    fn columns_line_up() {
        let out = render_table(&["A", "LONG"], &[vec!["xyz".into(), "1".into()]]);
        assert_eq!(out, "A    LONG\nxyz  1\n");
    }

    #[test]
    fn conversation_listing_uses_bot_names() {
        let repo = MockRepository::embedded().unwrap();
        let conv = repo.conversation("2c81e5a4").unwrap();
        let out = conversation_table(&[conv], &repo, 2);
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("2c81e5a4"));
        assert!(row.contains("Customer Support Bot"));
        assert!(row.contains("pii policy +1"));
        assert!(row.contains("fail"));
    }

    #[test]
    fn bot_listing_has_one_row_per_bot() {
        let repo = MockRepository::embedded().unwrap();
        let bots: Vec<&Bot> = repo.list_bots().iter().collect();
        let out = bot_table(&bots);
        assert_eq!(out.lines().count(), bots.len() + 1);
        assert!(out.starts_with("ID"));
    }

    #[test]
    fn empty_listings_print_a_placeholder() {
        let repo = MockRepository::embedded().unwrap();
        assert_eq!(bot_table(&[]), "No bots found\n");
        assert_eq!(conversation_table(&[], &repo, 2), "No conversations found\n");
    }
}
