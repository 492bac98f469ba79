//! Path pattern compilation and segment matching.
//!
//! A pattern such as `/sum/{a:int}/{b:int}` is split on `/` once, at
//! registration, into literal and placeholder segments. Matching a request path
//! walks both segment lists in lockstep, so no regex runs on the hot path.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use super::error::RegisterError;

/// Maximum number of path parameters kept inline before spilling to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

// `{name}` or `{name:type}`
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_]*)(?::([A-Za-z]+))?\}$")
        .expect("placeholder regex is valid")
});

/// Declared type of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
}

impl ParamKind {
    fn parse(annotation: &str) -> Option<ParamKind> {
        match annotation {
            "str" | "s" => Some(ParamKind::Str),
            "int" | "d" => Some(ParamKind::Int),
            _ => None,
        }
    }

    fn convert(self, raw: &str) -> Option<ParamValue> {
        match self {
            ParamKind::Str => Some(ParamValue::Str(raw.to_owned())),
            ParamKind::Int => raw.parse::<i64>().ok().map(ParamValue::Int),
        }
    }
}

/// A typed value bound from the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl ParamValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            ParamValue::Int(_) => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            ParamValue::Str(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_owned())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

/// Parameters extracted from a matched path, in pattern order.
///
/// Names are `Arc<str>` shared with the compiled pattern so a match only
/// allocates for the values themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: SmallVec<[(Arc<str>, ParamValue); MAX_INLINE_PARAMS]>,
}

impl PathParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<Arc<str>>, value: impl Into<ParamValue>) {
        self.inner.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// String parameter by name; `None` if absent or declared as an integer.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Integer parameter by name; `None` if absent or declared as a string.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.inner.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

impl<'a, V: Into<ParamValue>> FromIterator<(&'a str, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let mut params = PathParams::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: Arc<str>, kind: ParamKind },
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile pattern source text.
    ///
    /// Rejects patterns that do not start with `/`, stray braces, unknown type
    /// annotations and placeholder names used twice.
    pub fn parse(source: &str) -> Result<Self, RegisterError> {
        let invalid = |reason: String| RegisterError::InvalidPattern {
            pattern: source.to_owned(),
            reason,
        };

        if !source.starts_with('/') {
            return Err(invalid("pattern must start with '/'".into()));
        }

        let mut segments = Vec::new();
        for raw in source.split('/').skip(1) {
            if !raw.contains(['{', '}']) {
                segments.push(Segment::Literal(raw.to_owned()));
                continue;
            }

            let caps = PLACEHOLDER
                .captures(raw)
                .ok_or_else(|| invalid(format!("malformed placeholder segment '{raw}'")))?;
            let name = &caps[1];
            let kind = match caps.get(2) {
                None => ParamKind::Str,
                Some(ann) => ParamKind::parse(ann.as_str()).ok_or_else(|| {
                    invalid(format!("unknown type '{}' for '{name}'", ann.as_str()))
                })?,
            };

            let duplicate = segments
                .iter()
                .any(|s| matches!(s, Segment::Param { name: n, .. } if n.as_ref() == name));
            if duplicate {
                return Err(invalid(format!("placeholder '{name}' appears twice")));
            }

            segments.push(Segment::Param {
                name: Arc::from(name),
                kind,
            });
        }

        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    /// The text the pattern was registered with.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the placeholders, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_ref()),
            Segment::Literal(_) => None,
        })
    }

    /// Structurally match `path` against this pattern.
    ///
    /// Returns `None` when the segment counts differ, a literal differs, a
    /// placeholder would bind an empty segment, or an integer placeholder sees
    /// a non-integer segment.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let mut parts = rest.split('/');
        let mut params = PathParams::new();

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param { name, kind } => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = kind.convert(part)?;
                    params.inner.push((Arc::clone(name), value));
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
