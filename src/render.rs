use colored::Colorize;

use crate::jira::{Comment, CommentsApi};
use crate::panel::CommentPanel;

const SEPARATOR: &str = "────────────────────────────────────────";

/// Render the whole panel as terminal text
pub fn panel<A: CommentsApi>(panel: &CommentPanel<A>) -> String {
    let mut out = format!(
        "{} {}\n",
        "Comments".bold(),
        format!("({})", panel.issue_key()).bright_cyan()
    );

    if let Some(error) = panel.error() {
        out.push_str(&format!("{}\n", error.red()));
    }

    if panel.comments().is_empty() {
        out.push_str("No comments yet.\n");
    } else {
        for comment in panel.comments() {
            out.push_str(&self::comment(comment));
        }
    }

    if !panel.draft().is_empty() {
        out.push_str(&format!("{}\n{}\n", "Draft:".bold(), panel.draft()));
    }

    if let Some(preview) = panel.adf_preview() {
        out.push('\n');
        out.push_str(&adf_preview(preview));
    }

    out
}

/// A single comment: body, then author (and creation time when known)
pub fn comment(comment: &Comment) -> String {
    let mut byline = comment.author.display_name.clone();
    if let Some(created) = &comment.created {
        byline = format!("{} · {}", byline, created);
    }

    format!(
        "{}\n{}\n{}\n",
        comment.body_text(),
        byline.dimmed(),
        SEPARATOR.dimmed()
    )
}

pub fn adf_preview(preview: &str) -> String {
    format!("{}\n{}\n", "ADF Format:".bold(), preview)
}
