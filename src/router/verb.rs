use std::fmt;

use http::Method;

/// The HTTP verbs a route can be registered for.
///
/// `HEAD`, `TRACE`, `CONNECT` and extension methods have no counterpart here;
/// a request using one of them never resolves to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Verb {
    /// Every verb, in the order used for display and iteration.
    pub const ALL: [Verb; 6] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Options,
    ];

    /// Map an `http::Method` onto a verb, if it is one of the supported six.
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Verb> {
        match *method {
            Method::GET => Some(Verb::Get),
            Method::POST => Some(Verb::Post),
            Method::PUT => Some(Verb::Put),
            Method::PATCH => Some(Verb::Patch),
            Method::DELETE => Some(Verb::Delete),
            Method::OPTIONS => Some(Verb::Options),
            _ => None,
        }
    }

    /// Lower-cased verb name, the key resource handlers are looked up by.
    #[must_use]
    pub fn as_lower(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
            Verb::Options => "options",
        }
    }

    /// Parse a verb name in any letter case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Verb> {
        Verb::ALL
            .into_iter()
            .find(|v| v.as_lower().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn to_method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
            Verb::Options => Method::OPTIONS,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_method().as_str())
    }
}

/// Compact set of verbs a plain handler accepts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerbSet(u8);

impl VerbSet {
    #[must_use]
    pub const fn empty() -> Self {
        VerbSet(0)
    }

    /// All six verbs; the default for plain handlers.
    #[must_use]
    pub const fn all() -> Self {
        VerbSet(0b0011_1111)
    }

    pub fn insert(&mut self, verb: Verb) {
        self.0 |= verb.bit();
    }

    #[must_use]
    pub fn contains(&self, verb: Verb) -> bool {
        self.0 & verb.bit() != 0
    }

    /// Whether a request method is admitted by this set.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        Verb::from_method(method).is_some_and(|v| self.contains(v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Verb> + '_ {
        Verb::ALL.into_iter().filter(|v| self.contains(*v))
    }
}

impl Default for VerbSet {
    fn default() -> Self {
        VerbSet::all()
    }
}

impl FromIterator<Verb> for VerbSet {
    fn from_iter<I: IntoIterator<Item = Verb>>(iter: I) -> Self {
        let mut set = VerbSet::empty();
        for verb in iter {
            set.insert(verb);
        }
        set
    }
}

impl<const N: usize> From<[Verb; N]> for VerbSet {
    fn from(verbs: [Verb; N]) -> Self {
        verbs.into_iter().collect()
    }
}

impl fmt::Debug for VerbSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_from_method() {
        assert_eq!(Verb::from_method(&Method::PATCH), Some(Verb::Patch));
        assert_eq!(Verb::from_method(&Method::HEAD), None);
        assert_eq!(Verb::from_method(&Method::TRACE), None);
    }

    #[test]
    fn test_verb_parse_is_case_insensitive() {
        assert_eq!(Verb::parse("DELETE"), Some(Verb::Delete));
        assert_eq!(Verb::parse("options"), Some(Verb::Options));
        assert_eq!(Verb::parse("head"), None);
    }

    #[test]
    fn test_verb_set_membership() {
        let set = VerbSet::from([Verb::Get, Verb::Post]);
        assert!(set.allows(&Method::GET));
        assert!(set.allows(&Method::POST));
        assert!(!set.allows(&Method::PUT));
        assert!(!set.allows(&Method::HEAD));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Verb::Get, Verb::Post]);
    }

    #[test]
    fn test_default_set_is_all_verbs() {
        let set = VerbSet::default();
        for verb in Verb::ALL {
            assert!(set.contains(verb));
        }
        assert!(VerbSet::empty().is_empty());
    }
}
