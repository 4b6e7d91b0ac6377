//! Write downloaded attachments to disk.

use std::path::{Path, PathBuf};

use crate::error::{AttachError, Result};
use crate::model::attachment::AttachmentId;

/// Save `data` for an attachment called `filename`.
///
/// If `output` is an existing directory (or has no extension), the file is
/// created inside it under a sanitized name, never overwriting an existing
/// file. Otherwise `output` is used as the file path as given.
pub fn save_content(data: &[u8], filename: &str, output: &Path) -> Result<PathBuf> {
    let target = if output.is_dir() || output.extension().is_none() {
        std::fs::create_dir_all(output).map_err(|e| AttachError::io(output, e))?;
        unique_path(&output.join(sanitize_filename_part(filename, 150)))
    } else {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AttachError::io(parent, e))?;
        }
        output.to_path_buf()
    };

    std::fs::write(&target, data).map_err(|e| AttachError::io(&target, e))?;
    tracing::info!(path = %target.display(), bytes = data.len(), "Saved attachment");
    Ok(target)
}

/// Replace characters that are unsafe in filenames and cap the length.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();

    // A name made only of dots would escape the target directory.
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "unknown".to_string()
    } else {
        sanitized
    }
}

/// File name for a downloaded body.
///
/// Prefers the server-supplied `filename`. Otherwise falls back to
/// `attachment-<id>` with an extension derived from `content_type`.
pub fn download_name(
    id: &AttachmentId,
    filename: Option<&str>,
    content_type: Option<&str>,
) -> String {
    if let Some(name) = filename.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match content_type.and_then(extension_for) {
        Some(ext) => format!("attachment-{id}.{ext}"),
        None => format!("attachment-{id}"),
    }
}

/// Common file extension for a MIME type. Parameters and case are ignored.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let ext = match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/svg+xml" => "svg",
        "image/heic" => "heic",
        "application/pdf" => "pdf",
        "application/zip" => "zip",
        "application/gzip" => "gz",
        "application/json" => "json",
        "application/msword" => "doc",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.ms-powerpoint" => "ppt",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",
        "text/plain" => "txt",
        "text/html" => "html",
        "text/csv" => "csv",
        "text/calendar" => "ics",
        "message/rfc822" => "eml",
        "audio/mpeg" => "mp3",
        "video/mp4" => "mp4",
        _ => return None,
    };
    Some(ext)
}

/// If `path` already exists, append a counter to make it unique.
fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for i in 1..1000 {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return candidate;
        }
    }

    parent.join(format!("{stem}_dup.{ext}"))
}
