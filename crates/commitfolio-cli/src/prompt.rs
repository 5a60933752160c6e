use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::preflight::PrerequisiteError;

/// Pick the organization to work on. Several memberships prompt on stdin.
pub async fn select_org(orgs: Vec<String>) -> Result<String> {
    match orgs.len() {
        0 => Err(PrerequisiteError("you do not belong to any organization".to_string()).into()),
        1 => Ok(orgs.into_iter().next().unwrap_or_default()),
        _ => tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            read_choice(&orgs, stdin.lock(), stdout.lock())
        })
        .await
        .context("Organization prompt panicked")?,
    }
}

/// Numbered menu; re-asks until a valid number is entered.
pub fn read_choice<R: BufRead, W: Write>(options: &[String], mut input: R, mut output: W) -> Result<String> {
    writeln!(output, "Select an organization:")?;
    for (i, option) in options.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, option)?;
    }

    loop {
        write!(output, "Number [1-{}]: ", options.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("No organization selected");
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1].clone()),
            _ => writeln!(output, "Please enter a number between 1 and {}", options.len())?,
        }
    }
}
