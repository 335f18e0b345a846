//! Save options and the UTF-8 byte-order-mark adapter.
//!
//! Some consumers (spreadsheet tools in particular) only detect UTF-8 text
//! when the file starts with a BOM. [`apply_bom`] prepends one to text and
//! XML blobs that explicitly declare `charset=utf-8`, when asked to.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::blob::Blob;

/// UTF-8 encoding of U+FEFF.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Content types eligible for a BOM: `text/*`, `application/xml`, `*/*+xml`,
/// each with an explicit UTF-8 charset parameter.
#[allow(clippy::expect_used)]
static BOM_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:text/\S*|application/xml|\S*/\S*\+xml)\s*;.*charset\s*=\s*utf-8")
        .expect("BOM content-type regex is valid") // Static pattern, safe to panic
});

/// Options recognized by [`Saver::save`](crate::Saver::save).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Prepend a UTF-8 BOM to eligible text/XML blobs.
    #[serde(rename = "autoBomPrefix", alias = "autoBom", default)]
    pub auto_bom: bool,
}

impl SaveOptions {
    /// Options with the BOM step enabled.
    #[must_use]
    pub fn with_auto_bom() -> Self {
        Self { auto_bom: true }
    }

    /// Interprets a loosely-typed options argument.
    ///
    /// Objects are read as options. `null` means defaults. Anything else is
    /// the legacy positional flag, whose meaning was "disable auto BOM", so a
    /// truthy value turns the BOM off and a falsy one turns it on.
    #[must_use]
    pub fn coerce(value: &Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::Object(obj) => {
                let flag = obj.get("autoBomPrefix").or_else(|| obj.get("autoBom"));
                if let Some(other) = flag.filter(|v| !v.is_boolean()) {
                    warn!(value = %other, "ignoring non-boolean autoBomPrefix");
                }
                Self {
                    auto_bom: flag.and_then(Value::as_bool).unwrap_or(false),
                }
            }
            other => {
                warn!(
                    value = %other,
                    "deprecated: expected save options to be an object"
                );
                Self {
                    auto_bom: !is_truthy(other),
                }
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns true if a BOM would be prepended to a blob of this type.
#[must_use]
pub fn wants_bom(content_type: &str) -> bool {
    BOM_CONTENT_TYPE.is_match(content_type)
}

/// Prepends a UTF-8 BOM when `options.auto_bom` is set and the blob's type is
/// an eligible UTF-8 text/XML type. Otherwise returns the blob unchanged.
#[must_use]
pub fn apply_bom(blob: Blob, options: &SaveOptions) -> Blob {
    if options.auto_bom && wants_bom(blob.content_type()) {
        debug!(content_type = %blob.content_type(), "prepending UTF-8 BOM");
        blob.prepended(&UTF8_BOM)
    } else {
        blob
    }
}
