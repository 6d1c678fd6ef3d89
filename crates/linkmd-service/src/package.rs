//! Upload validation and package (zip) extraction.

use std::io::{Cursor, Read};

use bytes::Bytes;
use zip::ZipArchive;

use linkmd_core::config::ArchiveConfig;
use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;

use crate::naming;

/// Extension of multi-document packages.
pub const PACKAGE_EXTENSION: &str = "zip";

/// Directory prefix macOS adds to zip files.
const MACOS_METADATA_DIR: &str = "__MACOSX/";

/// One input to an archive call: a single document or a package.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename as supplied by the caller.
    pub filename: String,
    /// Raw bytes.
    pub data: Bytes,
}

impl UploadFile {
    /// Create an upload from a filename and bytes.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Whether this input is a package.
    pub fn is_package(&self) -> bool {
        naming::has_extension(&self.filename, PACKAGE_EXTENSION)
    }
}

/// Check count, size, and type limits for an archive call.
pub fn validate_uploads(files: &[UploadFile], config: &ArchiveConfig) -> AppResult<()> {
    if files.is_empty() {
        return Err(AppError::validation("No files were provided"));
    }
    if files.len() > config.max_files_per_upload {
        return Err(AppError::validation(format!(
            "Too many files: {} (limit {})",
            files.len(),
            config.max_files_per_upload
        )));
    }

    let extension = config.bare_extension();
    let mut total: u64 = 0;
    for file in files {
        let size = file.data.len() as u64;
        if size > config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File '{}' is {size} bytes (limit {})",
                file.filename, config.max_file_size_bytes
            )));
        }
        if !file.is_package() && !naming::has_extension(&file.filename, extension) {
            return Err(AppError::validation(format!(
                "File '{}' must be a .{extension} document or a .{PACKAGE_EXTENSION} package",
                file.filename
            )));
        }
        total += size;
    }

    if total > config.max_total_size_bytes {
        return Err(AppError::validation(format!(
            "Upload totals {total} bytes (limit {})",
            config.max_total_size_bytes
        )));
    }
    Ok(())
}

/// Base name of an eligible package entry, or `None` to skip it.
fn eligible_name(entry: &str, extension: &str) -> Option<String> {
    if entry.ends_with('/') || entry.starts_with(MACOS_METADATA_DIR) {
        return None;
    }
    let base = entry.rsplit(['/', '\\']).next().unwrap_or(entry);
    if base.is_empty() || base.starts_with('.') {
        return None;
    }
    naming::has_extension(base, extension).then(|| base.to_string())
}

/// Read at most `limit` bytes of a package entry.
///
/// The declared size comes from the archive header and is only a capacity
/// hint; an entry that inflates past `limit` is rejected.
fn read_limited<R: Read>(
    reader: R,
    declared: u64,
    limit: u64,
    entry_name: &str,
) -> AppResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(declared.min(limit) as usize);
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Failed to read '{entry_name}' from package"),
                e,
            )
        })?;
    if buf.len() as u64 > limit {
        return Err(AppError::validation(format!(
            "Package entry '{entry_name}' exceeds {limit} bytes"
        )));
    }
    Ok(buf)
}

/// Extract the eligible documents of a package.
///
/// Directories, `__MACOSX/` metadata, and dot-files are skipped, as is
/// anything without the document extension. Entries keep their base name.
pub fn extract(package: &UploadFile, config: &ArchiveConfig) -> AppResult<Vec<UploadFile>> {
    let extension = config.bare_extension();
    let mut archive = ZipArchive::new(Cursor::new(package.data.clone())).map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Package '{}' is corrupt", package.filename),
            e,
        )
    })?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Package '{}' is corrupt", package.filename),
                e,
            )
        })?;
        if entry.is_dir() {
            continue;
        }
        let entry_name = entry.name().to_string();
        let Some(name) = eligible_name(&entry_name, extension) else {
            continue;
        };
        if entry.size() > config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "Package entry '{entry_name}' exceeds {} bytes",
                config.max_file_size_bytes
            )));
        }

        let declared = entry.size();
        let buf = read_limited(&mut entry, declared, config.max_file_size_bytes, &entry_name)?;
        entries.push(UploadFile::new(name, buf));
    }

    if entries.is_empty() {
        return Err(AppError::validation(format!(
            "Package '{}' has no eligible .{extension} files",
            package.filename
        )));
    }
    Ok(entries)
}
