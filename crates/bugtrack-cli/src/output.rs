//! Human-readable rendering of API responses.

use bugtrack_core::{Bug, BugStats, GroupCount, Priority, Status};
use colored::{ColoredString, Colorize};

use crate::client::BugList;

const TITLE_WIDTH: usize = 40;

pub fn status_badge(status: Status) -> ColoredString {
    let label = format!("[{}]", status.label());
    match status {
        Status::Open => label.blue(),
        Status::InProgress => label.yellow(),
        Status::Resolved => label.green(),
        Status::Closed => label.dimmed(),
    }
}

pub fn priority_badge(priority: Priority) -> ColoredString {
    let label = format!("[{}]", priority.label());
    match priority {
        Priority::Low => label.normal(),
        Priority::Medium => label.cyan(),
        Priority::High => label.magenta(),
        Priority::Critical => label.red().bold(),
    }
}

/// Shortens `text` to `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn format_bug_row(bug: &Bug) -> String {
    format!(
        "{}  {:<width$}  {} {}  {}",
        bug.id.to_string().dimmed(),
        truncate(&bug.title, TITLE_WIDTH),
        status_badge(bug.status),
        priority_badge(bug.priority),
        bug.project,
        width = TITLE_WIDTH,
    )
}

pub fn format_page_footer(list: &BugList) -> String {
    format!(
        "Page {} of {} ({} shown, {} total)",
        list.current_page,
        list.total_pages.max(1),
        list.count,
        list.total
    )
}

pub fn format_bug_list(list: &BugList) -> String {
    if list.data.is_empty() {
        return format!("No bugs found.\n{}", format_page_footer(list));
    }

    let mut lines: Vec<String> = list.data.iter().map(format_bug_row).collect();
    lines.push(String::new());
    lines.push(format_page_footer(list));
    lines.join("\n")
}

pub fn format_bug_detail(bug: &Bug) -> String {
    let mut lines = vec![
        format!("{}", bug.title.bold()),
        format!("  ID:          {}", bug.id),
        format!(
            "  Status:      {}  {}",
            status_badge(bug.status),
            priority_badge(bug.priority)
        ),
        format!("  Project:     {}", bug.project),
        format!("  Reported by: {}", bug.reported_by),
        format!("  Assigned to: {}", bug.assigned_to),
        format!("  Created:     {}", bug.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("  Updated:     {}", bug.updated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        bug.description.clone(),
    ];

    if let Some(steps) = &bug.steps_to_reproduce {
        lines.push(String::new());
        lines.push(format!("{}", "Steps to reproduce:".bold()));
        lines.extend(steps.lines().map(|line| format!("  {}", line)));
    }

    lines.join("\n")
}

/// Share of `total` as a whole-number percentage. Zero when there is no total.
pub fn percentage(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (count * 100 + total / 2) / total
}

fn format_group(label: &str, group: &GroupCount, total: i64) -> String {
    format!(
        "  {:<14} {:>5}  {:>3}%",
        label,
        group.count,
        percentage(group.count, total)
    )
}

pub fn format_stats(stats: &BugStats) -> String {
    let total = stats.total();
    let mut lines = vec![format!("{} {}", "Total bugs:".bold(), total), String::new()];

    lines.push(format!("{}", "By status".bold()));
    for group in &stats.status {
        let label = group
            .key
            .parse::<Status>()
            .map(|s| s.label())
            .unwrap_or(group.key.as_str());
        lines.push(format_group(label, group, total));
    }

    lines.push(String::new());
    lines.push(format!("{}", "By priority".bold()));
    for group in &stats.priority {
        let label = group
            .key
            .parse::<Priority>()
            .map(|p| p.label())
            .unwrap_or(group.key.as_str());
        lines.push(format_group(label, group, total));
    }

    lines.push(String::new());
    lines.push(format!("{}", "Top projects".bold()));
    if stats.projects.is_empty() {
        lines.push("  (none)".to_string());
    }
    for group in &stats.projects {
        lines.push(format_group(&group.key, group, total));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugtrack_core::{timestamp_now, BugInput};
    use uuid::Uuid;

    fn plain() {
        colored::control::set_override(false);
    }

    fn sample_bug(status: &str, steps: Option<&str>) -> Bug {
        let new_bug = BugInput {
            title: Some("Checkout total is wrong".to_string()),
            description: Some("Tax is applied twice".to_string()),
            status: Some(status.to_string()),
            priority: Some("critical".to_string()),
            reported_by: Some("Sam".to_string()),
            project: Some("Shop".to_string()),
            steps_to_reproduce: steps.map(str::to_string),
            ..Default::default()
        }
        .validate_new()
        .unwrap();
        Bug::create(new_bug, Uuid::nil(), timestamp_now())
    }

    #[test]
    fn test_badges_use_title_case_labels() {
        plain();
        assert_eq!(status_badge(Status::InProgress).to_string(), "[In Progress]");
        assert_eq!(priority_badge(Priority::Critical).to_string(), "[Critical]");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a longer title here", 10), "a longe...");
    }

    #[test]
    fn test_bug_row_contains_badges() {
        plain();
        let row = format_bug_row(&sample_bug("in-progress", None));
        assert!(row.starts_with("00000000-0000-0000-0000-000000000000"));
        assert!(row.contains("[In Progress] [Critical]"));
        assert!(row.ends_with("Shop"));
    }

    #[test]
    fn test_detail_includes_steps_when_present() {
        plain();
        let with_steps = format_bug_detail(&sample_bug("open", Some("1. Add item\n2. Pay")));
        assert!(with_steps.contains("Assigned to: Unassigned"));
        assert!(with_steps.contains("Steps to reproduce:\n  1. Add item\n  2. Pay"));

        let without = format_bug_detail(&sample_bug("open", None));
        assert!(!without.contains("Steps to reproduce"));
    }

    #[test]
    fn test_list_footer() {
        plain();
        let list = BugList {
            count: 1,
            total: 11,
            total_pages: 2,
            current_page: 2,
            data: vec![sample_bug("open", None)],
        };
        let text = format_bug_list(&list);
        assert!(text.ends_with("Page 2 of 2 (1 shown, 11 total)"));
    }

    #[test]
    fn test_empty_list() {
        plain();
        let list = BugList {
            count: 0,
            total: 0,
            total_pages: 0,
            current_page: 1,
            data: Vec::new(),
        };
        assert_eq!(
            format_bug_list(&list),
            "No bugs found.\nPage 1 of 1 (0 shown, 0 total)"
        );
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3, 5), 60);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_stats_output() {
        plain();
        let stats = BugStats::from_groups(
            vec![("open".to_string(), 3), ("resolved".to_string(), 1)],
            vec![("high".to_string(), 4)],
            vec![("Shop".to_string(), 4)],
        );
        let text = format_stats(&stats);
        assert!(text.starts_with("Total bugs: 4"));
        assert!(text.contains("In Progress"));
        assert!(text.contains(&format!("  {:<14} {:>5}  {:>3}%", "Open", 3, 75)));
        assert!(text.contains(&format!("  {:<14} {:>5}  {:>3}%", "Shop", 4, 100)));
    }
}
