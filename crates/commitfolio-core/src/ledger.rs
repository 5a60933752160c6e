//! Markdown commit ledger: one table row per commit, newest first.

use crate::{Commit, Error, Result};
use serde::{Deserialize, Serialize};

pub const HEADER: [&str; 4] = ["일시", "레포지토리", "커밋 메시지", "링크"];

/// One ledger row. Cells hold unescaped text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: String,
    pub repo: String,
    pub message: String,
    /// Markdown link to the commit, `[short](url)`.
    pub link: String,
}

impl LedgerRow {
    /// URL part of the markdown link, if the cell is a link.
    pub fn link_url(&self) -> Option<&str> {
        let start = self.link.find("](")? + 2;
        let end = self.link[start..].rfind(')')? + start;
        Some(&self.link[start..end])
    }
}

impl From<&Commit> for LedgerRow {
    fn from(commit: &Commit) -> Self {
        Self {
            date: commit.date.clone(),
            repo: commit.repo_name.clone(),
            message: commit.message.clone(),
            link: format!("[{}]({})", commit.short_hash(), commit.url()),
        }
    }
}

pub fn render(rows: &[LedgerRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", HEADER.join(" | ")));
    out.push_str("|------|------------|-------------|------|\n");

    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&row.date),
            escape_cell(&row.repo),
            escape_cell(&row.message),
            escape_cell(&row.link),
        ));
    }

    out
}

pub fn render_commits(commits: &[Commit]) -> String {
    let rows: Vec<LedgerRow> = commits.iter().map(LedgerRow::from).collect();
    render(&rows)
}

/// Parse a ledger back into rows. Lines outside the table are ignored.
pub fn parse(text: &str) -> Result<Vec<LedgerRow>> {
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }

        let cells = split_row(line);
        if is_separator(&cells) || is_header(&cells) {
            continue;
        }

        let [date, repo, message, link]: [String; 4] = cells.try_into().map_err(|cells: Vec<String>| {
            Error::MalformedLedger {
                line: i + 1,
                reason: format!("expected 4 cells, found {}", cells.len()),
            }
        })?;

        rows.push(LedgerRow {
            date,
            repo,
            message,
            link,
        });
    }

    Ok(rows)
}

pub fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    out.push(' ');
                }
            }
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }

    out
}

pub fn unescape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('\\') | Some('|') => {
                    out.push(chars.next().unwrap_or(c));
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }

    out
}

/// Split on unescaped pipes, dropping the outer border cells.
fn split_row(line: &str) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            current.push(c);
            escaped = true;
        } else if c == '|' {
            raw.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    raw.push(current);

    // Leading border yields an empty first cell, trailing border an empty last one.
    if raw.first().is_some_and(|c| c.trim().is_empty()) {
        raw.remove(0);
    }
    if raw.len() > 1 && raw.last().is_some_and(|c| c.trim().is_empty()) {
        raw.pop();
    }

    raw.iter().map(|cell| unescape_cell(cell.trim())).collect()
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

fn is_header(cells: &[String]) -> bool {
    cells.len() == HEADER.len() && cells.iter().zip(HEADER).all(|(c, h)| c == h)
}
