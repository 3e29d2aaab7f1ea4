use super::types::{EndpointInfo, HttpMethod};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Why a path could not be turned into an endpoint key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Path does not begin with `/`
    NotAbsolute { path: String },
    /// Path contains `//`
    EmptySegment { path: String },
    /// A segment opens or closes a placeholder without its partner, or
    /// mixes literal text with a placeholder
    MalformedPlaceholder { path: String, segment: String },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::NotAbsolute { path } => {
                write!(f, "path '{}' does not start with '/'", path)
            }
            KeyError::EmptySegment { path } => {
                write!(f, "path '{}' contains an empty segment", path)
            }
            KeyError::MalformedPlaceholder { path, segment } => {
                write!(
                    f,
                    "path '{}' has a malformed placeholder segment '{}'",
                    path, segment
                )
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// Identity of an endpoint: method plus normalized path.
///
/// Placeholder segments are positional wildcards, so `/users/{user_id}` and
/// `/users/{id}` produce equal keys. The path as written is kept for display
/// but takes no part in equality or hashing.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointKey {
    method: HttpMethod,
    path: String,
    #[serde(skip)]
    normalized: String,
}

impl EndpointKey {
    pub fn new(method: HttpMethod, path: &str) -> Result<Self, KeyError> {
        Ok(EndpointKey {
            method,
            path: path.to_string(),
            normalized: normalize_path(path)?,
        })
    }

    pub fn for_endpoint(endpoint: &EndpointInfo) -> Result<Self, KeyError> {
        EndpointKey::new(endpoint.method, &endpoint.path)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path as written by whichever model produced the key
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path with every placeholder replaced by `{}`
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl PartialEq for EndpointKey {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.normalized == other.normalized
    }
}

impl Eq for EndpointKey {}

impl Hash for EndpointKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.hash(state);
        self.normalized.hash(state);
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Normalize a path template for matching.
///
/// A trailing slash is ignored (except for the root path) and each `{name}`
/// segment becomes `{}`.
pub fn normalize_path(path: &str) -> Result<String, KeyError> {
    if !path.starts_with('/') {
        return Err(KeyError::NotAbsolute {
            path: path.to_string(),
        });
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok("/".to_string());
    }

    let mut out = String::with_capacity(trimmed.len());
    for segment in trimmed[1..].split('/') {
        if segment.is_empty() {
            return Err(KeyError::EmptySegment {
                path: path.to_string(),
            });
        }
        out.push('/');
        if is_placeholder(segment) {
            out.push_str("{}");
        } else if segment.contains('{') || segment.contains('}') {
            return Err(KeyError::MalformedPlaceholder {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        } else {
            out.push_str(segment);
        }
    }
    Ok(out)
}

fn is_placeholder(segment: &str) -> bool {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .map(|inner| !inner.is_empty() && !inner.contains(['{', '}']))
        .unwrap_or(false)
}
