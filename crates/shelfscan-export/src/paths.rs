//! Output file naming: template rendering, collision-free paths, archiving.

use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Values substituted into an output path template.
#[derive(Debug, Clone, Copy)]
pub struct OutputVars<'a> {
    pub retailer: &'a str,
    pub brand: &'a str,
    pub category: &'a str,
    /// Already formatted, e.g. `2024-03-07`.
    pub date: &'a str,
}

/// Lowercases `value` and replaces every run of characters other than ASCII
/// alphanumerics, `-` and `.` with a single `_`.
///
/// `"Baby Bottle"` → `"baby_bottle"`, `"amazon.de"` → `"amazon.de"`.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_owned()
}

/// Substitutes `{retailer}`, `{brand}`, `{category}` and `{date}` in
/// `template`. Substituted values are slugged so they cannot introduce path
/// separators. Unknown placeholders are left as written.
#[must_use]
pub fn render_output_path(template: &str, vars: &OutputVars<'_>) -> PathBuf {
    let rendered = template
        .replace("{retailer}", &slugify(vars.retailer))
        .replace("{brand}", &slugify(vars.brand))
        .replace("{category}", &slugify(vars.category))
        .replace("{date}", &slugify(vars.date));
    PathBuf::from(rendered)
}

/// Returns `path` if nothing exists there yet, otherwise the first free
/// `{stem}_{n}{.ext}` for `n = 1, 2, …` in the same directory.
#[must_use]
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u32..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Creates the parent directory of `path` if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Copies `src` to `dest`, or to the next free numbered variant of `dest`
/// when it is taken. Returns the path actually written.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if `src` does not exist or the copy fails.
pub fn archive_copy(src: &Path, dest: &Path) -> Result<PathBuf, ExportError> {
    if !src.is_file() {
        return Err(ExportError::io(
            src,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source file does not exist"),
        ));
    }

    ensure_parent_dir(dest)?;
    let target = unique_path(dest);
    std::fs::copy(src, &target).map_err(|e| ExportError::io(&target, e))?;
    tracing::info!(src = %src.display(), dest = %target.display(), "archived file");
    Ok(target)
}

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;
