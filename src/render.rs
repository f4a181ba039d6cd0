use crate::board::{IssueExport, IssueState, MilestoneExport, RepositoryExport};
use std::fmt::Write;

fn bucket<'a>(milestone: &'a MilestoneExport, state: IssueState) -> &'a [IssueExport] {
    match state {
        IssueState::Queued => &milestone.issues.queued,
        IssueState::Active => &milestone.issues.active,
        IssueState::Completed => &milestone.issues.completed,
    }
}

/// Render the board as indented plain text.
pub fn render_text(board: &[RepositoryExport]) -> String {
    let mut out = String::new();

    for (index, repository) in board.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", repository.name);
        if let Some(error) = &repository.error {
            let _ = writeln!(out, "  ! failed to fetch: {error}");
        }
        if repository.milestones.is_empty() {
            let _ = writeln!(out, "  (no milestones)");
        }

        for milestone in &repository.milestones {
            let _ = writeln!(
                out,
                "  {} ({}%) {}",
                milestone.title, milestone.progress, milestone.url
            );
            for state in IssueState::ALL {
                let issues = bucket(milestone, state);
                let _ = writeln!(out, "    {} ({}):", state.as_str(), issues.len());
                for issue in issues {
                    let paused = if issue.paused { " [paused]" } else { "" };
                    let _ = writeln!(out, "      - {}{paused}", issue.title);
                }
            }
        }
    }

    out
}

/// Render the board as pretty-printed JSON.
pub fn render_json(board: &[RepositoryExport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(board)
}
