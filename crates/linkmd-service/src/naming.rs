//! Name validation and collision-free filename generation.

use std::future::Future;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;

/// Characters replaced in titles used inside generated filenames.
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

fn check_path_segment(name: &str, what: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::validation(format!("{what} cannot be empty")));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AppError::validation(format!(
            "{what} '{name}' is not a valid path segment"
        )));
    }
    Ok(())
}

/// Trim and validate a folder name.
pub fn folder_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    check_path_segment(name, "Folder name")?;
    Ok(name.to_string())
}

/// Trim and validate a document filename, appending `.{extension}` when missing.
pub fn document_filename(raw: &str, extension: &str) -> AppResult<String> {
    let name = raw.trim();
    check_path_segment(name, "Filename")?;

    let dotted = format!(".{extension}");
    if has_extension(name, extension) {
        if name.len() == dotted.len() {
            return Err(AppError::validation("Filename cannot be only an extension"));
        }
        Ok(name.to_string())
    } else {
        Ok(format!("{name}{dotted}"))
    }
}

/// Case-insensitive check for a `.{extension}` suffix.
pub fn has_extension(filename: &str, extension: &str) -> bool {
    let dotted = format!(".{extension}");
    filename.len() >= dotted.len()
        && filename
            .get(filename.len() - dotted.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(&dotted))
}

/// Filename without its `.{extension}` suffix.
pub fn stem<'a>(filename: &'a str, extension: &str) -> &'a str {
    if has_extension(filename, extension) {
        &filename[..filename.len() - extension.len() - 1]
    } else {
        filename
    }
}

/// `stem (n).ext`
pub fn with_counter(stem: &str, counter: u32, extension: &str) -> String {
    format!("{stem} ({counter}).{extension}")
}

/// Make a heading usable inside a filename.
pub fn safe_title(title: &str, max_chars: usize) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if ILLEGAL_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .take(max_chars)
        .collect();
    replaced.trim().to_string()
}

/// `{base}_{NN}_{title}` stem for the chunk at 1-based `index`.
pub fn split_stem(base: &str, index: usize, safe_title: &str) -> String {
    format!("{base}_{index:02}_{safe_title}")
}

/// Find the first free filename, trying `initial` and then
/// `stem (1).ext`, `stem (2).ext`, and so on.
///
/// `is_taken` is queried once per candidate. Nothing is reserved, so two
/// concurrent callers can settle on the same name; the store's unique index
/// rejects the loser.
pub async fn first_free<F, Fut>(
    initial: String,
    stem: &str,
    extension: &str,
    mut is_taken: F,
) -> AppResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    let mut candidate = initial;
    let mut counter = 1u32;
    while is_taken(candidate.clone()).await? {
        candidate = with_counter(stem, counter, extension);
        counter += 1;
    }
    Ok(candidate)
}
