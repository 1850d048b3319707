//! Content-type policy for relayed API description documents.
//!
//! A backend's declared type is kept verbatim when it is JSON-compatible,
//! problem+JSON-compatible, or a YAML-family subtype. Everything else,
//! including a missing or unparsable header, becomes `application/json`.

use axum::http::HeaderValue;

/// Media type used when the backend's declared type is not relayable.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub fn default_content_type() -> HeaderValue {
    HeaderValue::from_static(DEFAULT_CONTENT_TYPE)
}

/// Picks the `Content-Type` for a relayed document.
///
/// Total and idempotent: the result is either the declared value unchanged or
/// exactly [`DEFAULT_CONTENT_TYPE`].
pub fn negotiate_content_type(declared: Option<&HeaderValue>) -> HeaderValue {
    declared
        .filter(|value| is_relayable(value))
        .cloned()
        .unwrap_or_else(default_content_type)
}

fn is_relayable(value: &HeaderValue) -> bool {
    let Some(media_type) = value.to_str().ok().and_then(MediaType::parse) else {
        return false;
    };

    let json = MediaType::new("application", "json");
    let problem_json = MediaType::new("application", "problem+json");

    media_type.is_compatible_with(&json)
        || media_type.is_compatible_with(&problem_json)
        || media_type.subtype.contains("yaml")
}

/// RFC 2045 separators that may not appear in a type or subtype token.
const TSPECIALS: [char; 15] = [
    '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=',
];

/// `type/subtype` with parameters stripped and both parts lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MediaType {
    kind: String,
    subtype: String,
}

impl MediaType {
    const WILDCARD: &'static str = "*";

    fn new(kind: &str, subtype: &str) -> Self {
        Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let essence = raw.split(';').next()?.trim();
        let (kind, subtype) = essence.split_once('/')?;
        let (kind, subtype) = (kind.trim(), subtype.trim());

        let is_token = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_graphic() && !TSPECIALS.contains(&c))
        };
        if !is_token(kind) || !is_token(subtype) {
            return None;
        }

        Some(Self::new(kind, subtype))
    }

    fn is_wildcard_subtype(&self) -> bool {
        self.subtype == Self::WILDCARD || self.subtype.starts_with("*+")
    }

    /// Structured-syntax suffix, e.g. `json` for `problem+json`.
    fn suffix(&self) -> Option<&str> {
        self.subtype.rsplit_once('+').map(|(_, suffix)| suffix)
    }

    /// Symmetric compatibility with wildcard and `*+suffix` handling.
    fn is_compatible_with(&self, other: &MediaType) -> bool {
        if self.kind == Self::WILDCARD || other.kind == Self::WILDCARD {
            return true;
        }
        if self.kind != other.kind {
            return false;
        }
        if self.subtype == other.subtype {
            return true;
        }
        if !self.is_wildcard_subtype() && !other.is_wildcard_subtype() {
            return false;
        }
        if self.subtype == Self::WILDCARD || other.subtype == Self::WILDCARD {
            return true;
        }

        let (this_suffix, other_suffix) = (self.suffix(), other.suffix());
        if self.is_wildcard_subtype() {
            if let Some(suffix) = this_suffix {
                return suffix == other.subtype || Some(suffix) == other_suffix;
            }
        }
        if other.is_wildcard_subtype() {
            if let Some(suffix) = other_suffix {
                return self.subtype == suffix || Some(suffix) == this_suffix;
            }
        }
        false
    }
}
