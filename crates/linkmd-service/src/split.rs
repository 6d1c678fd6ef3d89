//! Split planning: partition markdown into chunks at one heading level.

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;

use crate::analysis::frontmatter;
use crate::analysis::markdown::{is_fence, parse_heading};

/// Title used for the text before the first heading.
pub const PREAMBLE_TITLE: &str = "Preamble";

/// One chunk of a split document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Heading text, or `None` for the preamble.
    pub heading: Option<String>,
    /// Lines under the heading, blank edges trimmed.
    pub body: String,
}

impl Chunk {
    /// Title used to name the chunk's file.
    pub fn title(&self) -> &str {
        self.heading.as_deref().unwrap_or(PREAMBLE_TITLE)
    }

    /// Markdown content of the chunk: a heading of `level` followed by the
    /// body. The preamble is emitted as-is.
    pub fn render(&self, level: u8) -> String {
        match &self.heading {
            Some(heading) => {
                let hashes = "#".repeat(usize::from(level));
                if self.body.is_empty() {
                    format!("{hashes} {heading}\n")
                } else {
                    format!("{hashes} {heading}\n\n{}\n", self.body)
                }
            }
            None => format!("{}\n", self.body),
        }
    }
}

fn trim_blank_edges(lines: &[&str]) -> String {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end.max(start)].join("\n")
}

/// Partition `content` at headings of exactly `level`.
///
/// Text before the first such heading becomes a preamble chunk when it is
/// not blank. A front matter block is never scanned for headings and is
/// carried into the preamble verbatim. Fails when fewer than two headings of
/// `level` exist.
pub fn plan(content: &str, level: u8) -> AppResult<Vec<Chunk>> {
    if !(1..=6).contains(&level) {
        return Err(AppError::validation(format!(
            "Heading level must be between 1 and 6, got {level}"
        )));
    }

    let body = frontmatter::split(content).body;
    let header = &content[..content.len() - body.len()];

    let mut preamble: Vec<&str> = header.lines().collect();
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    let mut in_fence = false;

    for line in body.split('\n') {
        let line = line.trim_end_matches('\r');
        let heading = if in_fence { None } else { parse_heading(line) };
        if is_fence(line) {
            in_fence = !in_fence;
        }

        match heading {
            Some((l, text)) if l == level => sections.push((text.to_string(), Vec::new())),
            _ => match sections.last_mut() {
                Some((_, body)) => body.push(line),
                None => preamble.push(line),
            },
        }
    }

    match sections.len() {
        0 => {
            return Err(AppError::split_insufficient(format!(
                "No headings at level {level}"
            )));
        }
        1 => {
            return Err(AppError::split_insufficient(format!(
                "Too few headings at level {level}: at least two are required"
            )));
        }
        _ => {}
    }

    let mut chunks = Vec::with_capacity(sections.len() + 1);
    let preamble = trim_blank_edges(&preamble);
    if !preamble.is_empty() {
        chunks.push(Chunk {
            heading: None,
            body: preamble,
        });
    }
    chunks.extend(sections.into_iter().map(|(heading, body)| Chunk {
        heading: Some(heading),
        body: trim_blank_edges(&body),
    }));
    Ok(chunks)
}
