//! Filenames for saved files: `Content-Disposition` names, extensions from
//! MIME types, and collision-free paths in the output directory.

use std::path::{Component, Path, PathBuf};

use crate::blob::DEFAULT_FILE_NAME;

/// MIME essence to extension, for names that arrive without one.
const EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpeg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("text/plain", "txt"),
    ("text/csv", "csv"),
    ("text/html", "html"),
    ("text/xml", "xml"),
    ("application/xml", "xml"),
    ("application/json", "json"),
    ("application/pdf", "pdf"),
    ("application/zip", "zip"),
];

/// Extension for a content type, ignoring parameters and case.
pub(crate) fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Appends the extension for `content_type` when `name` has none.
pub(crate) fn with_extension_for(name: &str, content_type: &str) -> String {
    if Path::new(name).extension().is_some() {
        return name.to_string();
    }
    match extension_for(content_type) {
        Some(ext) => format!("{name}.{ext}"),
        None => name.to_string(),
    }
}

/// Extracts the filename from a `Content-Disposition` header value.
///
/// `filename*=` (RFC 5987, percent-encoded) wins over `filename=` unless it
/// decodes to nothing.
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.trim().rsplit("''").next().unwrap_or_default();
                match urlencoding::decode(encoded) {
                    Ok(decoded) if !decoded.is_empty() => return Some(decoded.into_owned()),
                    _ => {}
                }
            }
            "filename" => {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    plain = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}

/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and controls) with `_`. Dot-only names are
/// rewritten so they cannot name a directory.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if is_plain_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

/// Picks a path in `dir` for `name` that does not exist yet:
/// `qr_code.png`, then `qr_code_1.png`, `qr_code_2.png`, ...
pub(crate) fn resolve_unique_path(dir: &Path, name: &str) -> PathBuf {
    let mut file_name = sanitize_filename(name);
    if file_name.trim_matches('_').is_empty() {
        file_name = DEFAULT_FILE_NAME.to_string();
    }

    let candidate = dir.join(&file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name.as_str(), ""),
    };
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}{ext}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn is_plain_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
