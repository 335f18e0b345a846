//! In-memory byte buffers handed to the save dispatcher.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;

/// Name used when neither the caller nor the blob supplies one.
pub const DEFAULT_FILE_NAME: &str = "download";

/// MIME type that marks a blob as opaque bytes the host should not render.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// An immutable byte buffer with an associated MIME type.
///
/// The optional `name` is the blob's own filename (for example one announced
/// by a `Content-Disposition` header). It is only used when the caller does
/// not suggest a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    content_type: String,
    name: Option<String>,
}

impl Blob {
    /// Creates a blob from bytes and a MIME type.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            name: None,
        }
    }

    /// Attaches an intrinsic filename to the blob.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.trim().is_empty()).then_some(name);
        self
    }

    /// Returns the blob's bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the blob's MIME type, exactly as supplied.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the blob's intrinsic filename, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the byte length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the blob holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the type is `application/octet-stream` (parameters ignored).
    #[must_use]
    pub fn is_octet_stream(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(OCTET_STREAM))
    }

    /// Encodes the blob as a `data:` URL, the way a FileReader would.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        let mime = if self.content_type.trim().is_empty() {
            OCTET_STREAM
        } else {
            self.content_type.trim()
        };
        format!("data:{mime};base64,{}", BASE64.encode(&self.bytes))
    }

    /// Returns a copy of this blob with `prefix` prepended to its bytes.
    pub(crate) fn prepended(&self, prefix: &[u8]) -> Self {
        let mut joined = Vec::with_capacity(prefix.len() + self.bytes.len());
        joined.extend_from_slice(prefix);
        joined.extend_from_slice(&self.bytes);
        Self {
            bytes: Bytes::from(joined),
            content_type: self.content_type.clone(),
            name: self.name.clone(),
        }
    }
}

/// What a caller asks to save: raw bytes, or a URL to be fetched or opened.
///
/// Strings are always URLs, never file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveContent {
    /// In-memory bytes.
    Blob(Blob),
    /// Absolute URL, or a URL relative to the current page.
    Url(String),
}

impl From<Blob> for SaveContent {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<String> for SaveContent {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl From<&str> for SaveContent {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

/// Treats blank names as missing.
pub(crate) fn non_blank(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.trim().is_empty())
}

/// Picks the filename for a blob save: suggestion, then the blob's own name,
/// then [`DEFAULT_FILE_NAME`].
#[must_use]
pub fn file_name_for(suggested: Option<&str>, blob: &Blob) -> String {
    non_blank(suggested)
        .or_else(|| blob.name())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}

/// Rewrites the media type of a `data:` URL so hosts treat it as a download.
pub(crate) fn as_attachment_data_url(data_url: &str) -> String {
    match data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(';'))
    {
        Some((_, rest)) => format!("data:attachment/file;{rest}"),
        None => data_url.to_string(),
    }
}
