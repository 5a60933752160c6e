//! Prompt templates. Placeholders are `{{name}}`.

const MONTH_SECTION: &str = include_str!("../prompts/month_section.md");
const REPO_SUMMARY: &str = include_str!("../prompts/repo_summary.md");
const TECH_STACK: &str = include_str!("../prompts/tech_stack.md");

/// One commit as it appears in a monthly prompt.
#[derive(Debug, Clone, Copy)]
pub struct CommitLine<'a> {
    pub repo: &'a str,
    pub date: &'a str,
    pub message: &'a str,
}

pub fn month_section_prompt(month: &str, commits: &[CommitLine<'_>]) -> String {
    let lines: Vec<String> = commits
        .iter()
        .map(|c| format!("[{}] {} {}", c.repo, c.date, c.message))
        .collect();

    MONTH_SECTION
        .replace("{{month}}", month)
        .replace("{{commits}}", &lines.join("\n"))
}

pub fn repo_summary_prompt(repo: &str, activities: &[String]) -> String {
    let lines: Vec<String> = activities.iter().map(|a| format!("- {}", a)).collect();

    REPO_SUMMARY
        .replace("{{repo}}", repo)
        .replace("{{activities}}", &lines.join("\n"))
}

/// `summaries` pairs a repository name with its generated summary.
pub fn tech_stack_prompt(summaries: &[(&str, &str)]) -> String {
    let blocks: Vec<String> = summaries
        .iter()
        .map(|(repo, content)| format!("### {}\n{}", repo, content.trim()))
        .collect();

    TECH_STACK.replace("{{summaries}}", &blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_section_prompt() {
        let prompt = month_section_prompt(
            "2025-01",
            &[
                CommitLine { repo: "api", date: "2025-01-15T10:00:00+09:00", message: "feat: 로그인" },
                CommitLine { repo: "web", date: "2025-01-20T10:00:00+09:00", message: "fix: 버튼" },
            ],
        );

        assert!(prompt.contains("2025-01 한 달"));
        assert!(prompt.contains("[api] 2025-01-15T10:00:00+09:00 feat: 로그인\n[web] 2025-01-20T10:00:00+09:00 fix: 버튼"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_repo_summary_prompt() {
        let prompt = repo_summary_prompt("api", &["로그인 구현".to_string(), "캐시 도입".to_string()]);
        assert!(prompt.contains("`api` 프로젝트"));
        assert!(prompt.contains("- 로그인 구현\n- 캐시 도입"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_tech_stack_prompt() {
        let prompt = tech_stack_prompt(&[("api", " Rust 서버 \n"), ("web", "React 앱")]);
        assert!(prompt.contains("### api\nRust 서버\n\n### web\nReact 앱"));
        assert!(!prompt.contains("{{"));
    }
}
