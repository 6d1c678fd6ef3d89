//! Markdown implementation of [`ContentAnalyzer`].

use regex::Regex;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_entity::document::{DocumentAnalysis, HeadingEntry};

use super::frontmatter;
use super::title::TitleRules;
use crate::traits::ContentAnalyzer;

/// Opening or closing line of a fenced code block.
pub(crate) fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

/// Parse an ATX heading line into `(level, text)`.
pub(crate) fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

/// Heading outline of `body`, skipping lines inside fenced code blocks.
pub(crate) fn heading_outline(body: &str) -> Vec<HeadingEntry> {
    let mut in_fence = false;
    let mut outline = Vec::new();
    for (idx, line) in body.split('\n').enumerate() {
        let line = line.trim_end_matches('\r');
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, text)) = parse_heading(line) {
            outline.push(HeadingEntry {
                level,
                text: text.to_string(),
                line: idx + 1,
            });
        }
    }
    outline
}

fn is_table_row(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn is_table_delimiter(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('|')
        && line.contains('-')
        && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Analyzer for markdown documents.
#[derive(Debug, Clone)]
pub struct MarkdownAnalyzer {
    fence_language: Regex,
    image: Regex,
    titles: TitleRules,
}

impl MarkdownAnalyzer {
    /// Compile the analyzer's patterns.
    pub fn new() -> AppResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AppError::internal(format!("Invalid analysis pattern: {e}")))
        };
        Ok(Self {
            fence_language: compile(r"^```\s*(\w+)")?,
            image: compile(r"!\[[^\]]*\]\([^)]+\)")?,
            titles: TitleRules::new()?,
        })
    }
}

impl ContentAnalyzer for MarkdownAnalyzer {
    fn analyze(&self, filename: &str, content: &str) -> DocumentAnalysis {
        let fm = frontmatter::split(content);
        let body = fm.body;
        let lines: Vec<&str> = body.split('\n').map(|l| l.trim_end_matches('\r')).collect();

        let heading_tree = heading_outline(body);

        let mut fence_lines = 0usize;
        let mut code_languages: Vec<String> = Vec::new();
        let mut table_count = 0usize;
        let mut in_fence = false;
        for (idx, line) in lines.iter().enumerate() {
            if is_fence(line) {
                fence_lines += 1;
                if !in_fence {
                    if let Some(caps) = self.fence_language.captures(line) {
                        let lang = caps[1].to_lowercase();
                        if !code_languages.contains(&lang) {
                            code_languages.push(lang);
                        }
                    }
                }
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            if is_table_row(line)
                && !is_table_delimiter(line)
                && lines.get(idx + 1).is_some_and(|next| is_table_delimiter(next))
            {
                table_count += 1;
            }
        }

        let title = heading_tree
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.clone())
            .unwrap_or_else(|| self.titles.from_filename(filename));

        DocumentAnalysis {
            title,
            line_count: content.split('\n').count(),
            code_block_count: fence_lines / 2,
            code_languages,
            table_count,
            image_count: self.image.find_iter(body).count(),
            has_frontmatter: fm.present,
            heading_tree,
        }
    }
}
