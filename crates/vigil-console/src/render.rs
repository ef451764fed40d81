//! Terminal rendering of operator output
//!
//! Rendering is a collaborator, not part of the bridge: the app hands it
//! raw text plus a target width and falls back to the raw text when it
//! fails. Nothing in the bridge depends on how styling is done.

use anyhow::Result;
use colored::Colorize;

/// Styles raw text for terminal display at a target width
pub trait Renderer: Send + Sync {
    fn render(&self, text: &str, width: usize) -> Result<String>;
}

/// ANSI renderer for the console's markdown-ish output
///
/// Headings come out bold, list bullets dimmed, and severity tags
/// (`[high]`, `[medium]`, `[low]`) colored. Lines wrap at the target width.
pub struct AnsiRenderer;

impl Renderer for AnsiRenderer {
    fn render(&self, text: &str, width: usize) -> Result<String> {
        anyhow::ensure!(width > 0, "render width must be positive");

        let mut out = String::new();
        for line in text.lines() {
            let styled = style_line(line);
            for wrapped in wrap(&styled, width) {
                out.push_str(&wrapped);
                out.push('\n');
            }
        }
        Ok(out)
    }
}

fn style_line(line: &str) -> String {
    let styled = if let Some(heading) = line.strip_prefix("# ") {
        heading.bold().to_string()
    } else if let Some(item) = line.strip_prefix("- ") {
        format!("{} {}", "•".dimmed(), item)
    } else {
        line.to_string()
    };

    styled
        .replace("[high]", &"[high]".red().bold().to_string())
        .replace("[medium]", &"[medium]".yellow().to_string())
        .replace("[low]", &"[low]".green().to_string())
}

// Word wrap; a single overlong word keeps its own line rather than being split
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
