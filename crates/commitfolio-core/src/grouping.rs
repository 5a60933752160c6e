use crate::LedgerRow;
use std::collections::BTreeMap;

/// `YYYY-MM` prefix of an ISO date, if the date starts with one.
pub fn month_key(date: &str) -> Option<&str> {
    let key = date.trim().get(..7)?;
    let bytes = key.as_bytes();
    let well_formed = bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit);
    well_formed.then_some(key)
}

/// Ledger rows bucketed by year-month.
#[derive(Debug, Clone, Default)]
pub struct MonthGroups {
    groups: BTreeMap<String, Vec<LedgerRow>>,
    ungrouped: Vec<LedgerRow>,
}

impl MonthGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows whose date has no `YYYY-MM` prefix.
    pub fn ungrouped(&self) -> &[LedgerRow] {
        &self.ungrouped
    }

    pub fn get(&self, key: &str) -> Option<&[LedgerRow]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Groups, most recent month first.
    pub fn iter_desc(&self) -> impl Iterator<Item = (&str, &[LedgerRow])> {
        self.groups
            .iter()
            .rev()
            .map(|(key, rows)| (key.as_str(), rows.as_slice()))
    }

    pub fn into_desc(self) -> Vec<(String, Vec<LedgerRow>)> {
        self.groups.into_iter().rev().collect()
    }
}

pub fn group_by_month(rows: &[LedgerRow]) -> MonthGroups {
    let mut grouped = MonthGroups::default();

    for row in rows {
        match month_key(&row.date) {
            Some(key) => grouped
                .groups
                .entry(key.to_string())
                .or_default()
                .push(row.clone()),
            None => grouped.ungrouped.push(row.clone()),
        }
    }

    if !grouped.ungrouped.is_empty() {
        tracing::warn!(
            "{} ledger rows have no YYYY-MM date and were left out of monthly grouping",
            grouped.ungrouped.len()
        );
    }

    grouped
}

/// Split a `[repo] activity` line into its repository marker and the rest.
///
/// An optional list bullet (`-`, `*`, `+`) may precede the marker.
pub fn parse_repo_marker(line: &str) -> Option<(&str, &str)> {
    let mut rest = line.trim_start();
    if let Some(stripped) = rest.strip_prefix(['-', '*', '+']) {
        rest = stripped.trim_start();
    }

    let inner = rest.strip_prefix('[')?;
    let close = inner.find(']')?;
    let name = inner[..close].trim();
    if name.is_empty() {
        return None;
    }

    Some((name, inner[close + 1..].trim()))
}

/// Activity lines attributed to repositories via their `[repo]` marker.
#[derive(Debug, Clone, Default)]
pub struct RepoActivities {
    groups: BTreeMap<String, Vec<String>>,
    unattributed: usize,
}

impl RepoActivities {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Non-blank lines that carried no marker.
    pub fn unattributed(&self) -> usize {
        self.unattributed
    }

    pub fn get(&self, repo: &str) -> Option<&[String]> {
        self.groups.get(repo).map(Vec::as_slice)
    }

    /// Repositories in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(repo, lines)| (repo.as_str(), lines.as_slice()))
    }

    pub fn into_groups(self) -> Vec<(String, Vec<String>)> {
        self.groups.into_iter().collect()
    }
}

/// Scan generated section texts line by line and group activities by repository.
pub fn group_by_repo_marker<'a, I>(texts: I) -> RepoActivities
where
    I: IntoIterator<Item = &'a str>,
{
    let mut activities = RepoActivities::default();

    for text in texts {
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_repo_marker(line) {
                Some((repo, activity)) if !activity.is_empty() => activities
                    .groups
                    .entry(repo.to_string())
                    .or_default()
                    .push(activity.to_string()),
                _ => activities.unattributed += 1,
            }
        }
    }

    activities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, repo: &str) -> LedgerRow {
        LedgerRow {
            date: date.to_string(),
            repo: repo.to_string(),
            message: "work".to_string(),
            link: String::new(),
        }
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key("2025-01-15T10:00:00+09:00"), Some("2025-01"));
        assert_eq!(month_key("2025-01"), Some("2025-01"));
        assert_eq!(month_key("2025/01/15"), None);
        assert_eq!(month_key("25-1-1"), None);
        assert_eq!(month_key(""), None);
        assert_eq!(month_key("일시가 없음"), None);
    }

    #[test]
    fn test_group_by_month_descending() {
        let rows = vec![
            row("2025-01-15", "api"),
            row("2025-01-20", "web"),
            row("2025-02-01", "api"),
        ];

        let groups = group_by_month(&rows);

        assert_eq!(groups.len(), 2);
        let keys: Vec<&str> = groups.iter_desc().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2025-02", "2025-01"]);
        assert_eq!(groups.get("2025-01").unwrap().len(), 2);
        assert_eq!(groups.get("2025-02").unwrap().len(), 1);
        assert!(groups.ungrouped().is_empty());
    }

    #[test]
    fn test_undated_rows_are_counted() {
        let rows = vec![row("2025-03-01", "api"), row("unknown", "api")];

        let groups = group_by_month(&rows);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.ungrouped().len(), 1);
        assert_eq!(groups.ungrouped()[0].date, "unknown");
    }

    #[test]
    fn test_parse_repo_marker() {
        assert_eq!(parse_repo_marker("[api] 인증 추가"), Some(("api", "인증 추가")));
        assert_eq!(parse_repo_marker("  - [web-app]  fix"), Some(("web-app", "fix")));
        assert_eq!(parse_repo_marker("* [x]"), Some(("x", "")));
        assert_eq!(parse_repo_marker("## 2025-01"), None);
        assert_eq!(parse_repo_marker("no marker [api] here"), None);
        assert_eq!(parse_repo_marker("[] empty"), None);
    }

    #[test]
    fn test_group_by_repo_marker() {
        let jan = "## 2025-01\n- [api] 로그인 API 구현\n- [web] 대시보드 개선\n\n요약 문장";
        let feb = "- [api] 캐시 도입";

        let activities = group_by_repo_marker([feb, jan]);

        assert_eq!(activities.len(), 2);
        assert_eq!(
            activities.get("api").unwrap(),
            &["캐시 도입".to_string(), "로그인 API 구현".to_string()]
        );
        assert_eq!(activities.get("web").unwrap().len(), 1);
        assert_eq!(activities.unattributed(), 2);
        let repos: Vec<&str> = activities.iter().map(|(r, _)| r).collect();
        assert_eq!(repos, vec!["api", "web"]);
    }
}
