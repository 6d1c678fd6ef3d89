//! Title derivation from filenames.

use regex::Regex;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;

/// Compiled filename-cleaning rules, applied in order.
#[derive(Debug, Clone)]
pub struct TitleRules {
    extension: Regex,
    project_phase: Regex,
    phase: Regex,
    leading_number: Regex,
    trailing_date: Regex,
    separators: Regex,
    whitespace: Regex,
}

fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| AppError::internal(format!("Invalid title pattern '{pattern}': {e}")))
}

impl TitleRules {
    /// Compile the rule set.
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            extension: compile(r"(?i)\.md$")?,
            project_phase: compile(r"(?i)^[A-Z0-9]+[_\-]PHASE[_\-]?\d+[_\-]?")?,
            phase: compile(r"(?i)^PHASE[_\-]?\d+[_\-]?")?,
            leading_number: compile(r"^\d+[_\-.\s]+")?,
            trailing_date: compile(r"[_\-]?\d{8}$")?,
            separators: compile(r"[_\-]")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Turn a filename such as `PROJ_PHASE02_setup-guide_20240105.md`
    /// into a display title (`setup guide`). Falls back to the bare stem.
    pub fn from_filename(&self, filename: &str) -> String {
        let stem = self.extension.replace(filename, "").into_owned();

        let cleaned = self.project_phase.replace(&stem, "");
        let cleaned = self.phase.replace(&cleaned, "");
        let cleaned = self.leading_number.replace(&cleaned, "");
        let cleaned = self.trailing_date.replace(&cleaned, "");
        let cleaned = self.separators.replace_all(&cleaned, " ");
        let cleaned = self.whitespace.replace_all(&cleaned, " ");
        let cleaned = cleaned.trim();

        if cleaned.is_empty() {
            stem
        } else {
            cleaned.to_string()
        }
    }
}
