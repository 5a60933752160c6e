use std::collections::HashSet;

/// Unit-separated hash, subject and strict ISO-8601 author date.
pub const LOG_FORMAT: &str = "%H%x1f%s%x1f%aI";

const FIELD_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub hash: String,
    pub subject: String,
    pub date: String,
}

/// Parse `git log --format=LOG_FORMAT` output. Malformed lines are skipped and
/// a hash reachable from several refs is kept once.
pub fn parse_log(output: &str) -> Vec<LogRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, FIELD_SEPARATOR);
        let (Some(hash), Some(subject), Some(date)) = (fields.next(), fields.next(), fields.next())
        else {
            tracing::debug!("Skipping malformed log line: {:?}", line);
            continue;
        };

        let hash = hash.trim();
        if hash.is_empty() || !seen.insert(hash.to_string()) {
            continue;
        }

        records.push(LogRecord {
            hash: hash.to_string(),
            subject: subject.trim().to_string(),
            date: date.trim().to_string(),
        });
    }

    records
}

/// `git log` arguments matching any of `authors` as literal substrings.
///
/// `--fixed-strings` keeps `+`, `.` and friends in emails from being read
/// as regex operators.
pub fn author_args(authors: &[String]) -> Vec<String> {
    let authors: Vec<&str> = authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if authors.is_empty() {
        return Vec::new();
    }

    std::iter::once("--fixed-strings".to_string())
        .chain(authors.iter().map(|a| format!("--author={}", a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log() {
        let output = "abc\u{1f}feat: add login\u{1f}2025-01-15T10:00:00+09:00\n\
                      def\u{1f}fix: handle a | b\u{1f}2025-01-16T10:00:00+09:00\n\
                      \n\
                      broken line\n\
                      abc\u{1f}feat: add login\u{1f}2025-01-15T10:00:00+09:00\n";

        let records = parse_log(output);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hash, "abc");
        assert_eq!(records[0].subject, "feat: add login");
        assert_eq!(records[0].date, "2025-01-15T10:00:00+09:00");
        assert_eq!(records[1].subject, "fix: handle a | b");
    }

    #[test]
    fn test_author_args_are_literal() {
        let args = author_args(&[
            "octo".to_string(),
            "1234+octo@users.noreply.github.com".to_string(),
            "  ".to_string(),
        ]);
        assert_eq!(
            args,
            vec![
                "--fixed-strings",
                "--author=octo",
                "--author=1234+octo@users.noreply.github.com",
            ]
        );
        assert!(author_args(&[]).is_empty());
    }
}
