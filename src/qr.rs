//! QR image requests against the remote image-generation API.
//!
//! The QR image itself is produced by an external HTTP service; this module
//! only builds the request URLs and the filenames each format is saved as.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Default image-generation endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default edge length in pixels.
pub const DEFAULT_SIZE: u32 = 250;

/// Default quiet-zone margin in pixels.
pub const DEFAULT_MARGIN: u32 = 30;

/// Edge lengths the API accepts.
pub const SIZE_RANGE: std::ops::RangeInclusive<u32> = 10..=1000;

/// Margins the API accepts.
pub const MARGIN_RANGE: std::ops::RangeInclusive<u32> = 0..=50;

/// Errors building a QR request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QrError {
    /// Input was empty or whitespace only.
    #[error("nothing to encode: input is empty")]
    EmptyInput,

    /// Size outside [`SIZE_RANGE`].
    #[error("invalid QR size {size}: expected {}..={}", SIZE_RANGE.start(), SIZE_RANGE.end())]
    InvalidSize {
        /// Requested size.
        size: u32,
    },

    /// Margin outside [`MARGIN_RANGE`].
    #[error("invalid QR margin {margin}: expected {}..={}", MARGIN_RANGE.start(), MARGIN_RANGE.end())]
    InvalidMargin {
        /// Requested margin.
        margin: u32,
    },

    /// API base is not an absolute http(s) URL.
    #[error("invalid QR API URL: {url}")]
    InvalidApiBase {
        /// The rejected URL.
        url: String,
    },
}

/// Image formats offered for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Svg,
}

impl ImageFormat {
    /// Every format, in the order they are offered.
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Png, Self::Svg];

    /// Value of the API's `format` parameter (also the file extension).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// Name the image is saved under.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("qr_code.{}", self.as_str())
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request for a QR image.
///
/// # Example
///
/// ```
/// use qrsave_core::{ImageFormat, QrRequest};
///
/// let request = QrRequest::new("  hello world ").unwrap();
/// assert_eq!(
///     request.format_url(ImageFormat::Png).as_str(),
///     "https://api.qrserver.com/v1/create-qr-code/?size=250x250&margin=30&data=hello+world&format=png"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    data: String,
    size: u32,
    margin: u32,
    api_base: Url,
}

impl QrRequest {
    /// Builds a request with default size, margin and API.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::EmptyInput`] when `input` is blank after trimming.
    pub fn new(input: &str) -> Result<Self, QrError> {
        let data = input.trim();
        if data.is_empty() {
            return Err(QrError::EmptyInput);
        }
        Ok(Self {
            data: data.to_string(),
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            api_base: default_api_base(),
        })
    }

    /// Sets the edge length in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidSize`] outside [`SIZE_RANGE`].
    pub fn with_size(mut self, size: u32) -> Result<Self, QrError> {
        if !SIZE_RANGE.contains(&size) {
            return Err(QrError::InvalidSize { size });
        }
        self.size = size;
        Ok(self)
    }

    /// Sets the quiet-zone margin in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidMargin`] outside [`MARGIN_RANGE`].
    pub fn with_margin(mut self, margin: u32) -> Result<Self, QrError> {
        if !MARGIN_RANGE.contains(&margin) {
            return Err(QrError::InvalidMargin { margin });
        }
        self.margin = margin;
        Ok(self)
    }

    /// Points the request at another API endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidApiBase`] unless `api_base` is an absolute
    /// http or https URL.
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, QrError> {
        let url = Url::parse(api_base)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| QrError::InvalidApiBase {
                url: api_base.to_string(),
            })?;
        self.api_base = url;
        Ok(self)
    }

    /// Text being encoded (trimmed).
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// URL of the image in the API's default format.
    #[must_use]
    pub fn image_url(&self) -> Url {
        let mut url = self.api_base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("size", &format!("{0}x{0}", self.size))
            .append_pair("margin", &self.margin.to_string())
            .append_pair("data", &self.data);
        url
    }

    /// URL of the image in a specific format.
    #[must_use]
    pub fn format_url(&self, format: ImageFormat) -> Url {
        let mut url = self.image_url();
        url.query_pairs_mut().append_pair("format", format.as_str());
        url
    }
}

#[allow(clippy::expect_used)]
fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default QR API URL is valid") // Static URL, safe to panic
}
