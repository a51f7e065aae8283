use std::fs;

use anyhow::{Context, Result, anyhow};

use crate::documents::{DocumentKind, read_uploaded_file};

/// Extracted text for a file on disk, the same way an upload would be
/// read into context.
pub fn extract_file(path: &str) -> Result<String> {
    let kind = DocumentKind::from_file_name(path)
        .ok_or_else(|| anyhow!("Unsupported file type (expected pdf, txt or csv): {}", path))?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path))?;
    Ok(read_uploaded_file(kind, &bytes))
}

pub fn run(path: &str) -> Result<()> {
    println!("{}", extract_file(path)?);
    Ok(())
}
