//! Event-name argument polymorphism.
//!
//! Anywhere an event name is expected, callers may pass a bare name, a
//! sequence of names, or the `"*"` sentinel. That duck typing becomes a
//! closed set of shapes here: [`EventNames`], resolved through one
//! normalization routine ([`EventNames::for_each_name`]). Anything outside
//! the set simply does not convert; empty names log a warning and are
//! skipped.

use std::sync::OnceLock;

/// Reserved sentinel meaning "all events" in removal/clear contexts and
/// "every named list" in dispatch.
pub const WILDCARD: &str = "*";

static SEPARATOR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

fn separator_regex() -> &'static regex::Regex {
    SEPARATOR_REGEX
        .get_or_init(|| regex::Regex::new(r"[\s,]+").expect("separator regex is valid"))
}

/// The closed set of accepted event-name shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventNames {
    /// A single scalar. A scalar containing whitespace or commas resolves to
    /// multiple names (`"change save"` is two registrations).
    One(String),
    /// An explicit sequence; elements are used verbatim, without splitting.
    Many(Vec<String>),
    /// The [`WILDCARD`] sentinel.
    All,
}

impl EventNames {
    /// Whether this is the wildcard sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Invoke `f` once per resolved name, in order.
    ///
    /// An empty scalar or an empty sequence element logs a warning and is
    /// skipped; remaining siblings in the same call are still processed.
    /// Empty fragments produced by scalar splitting (leading or trailing
    /// separators) are dropped silently. `All` resolves to no names — callers
    /// handle the sentinel before normalizing.
    pub fn for_each_name(&self, mut f: impl FnMut(&str)) {
        match self {
            Self::One(raw) => {
                if raw.is_empty() {
                    log::warn!("unknown event name {raw:?}");
                    return;
                }
                for name in separator_regex().split(raw) {
                    if !name.is_empty() {
                        f(name);
                    }
                }
            }
            Self::Many(names) => {
                for name in names {
                    if name.is_empty() {
                        log::warn!("unknown event name {name:?}");
                        continue;
                    }
                    f(name);
                }
            }
            Self::All => {}
        }
    }
}

impl From<&str> for EventNames {
    fn from(name: &str) -> Self {
        if name == WILDCARD {
            Self::All
        } else {
            Self::One(name.to_string())
        }
    }
}

impl From<String> for EventNames {
    fn from(name: String) -> Self {
        if name == WILDCARD {
            Self::All
        } else {
            Self::One(name)
        }
    }
}

impl From<&[&str]> for EventNames {
    fn from(names: &[&str]) -> Self {
        Self::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<&str>> for EventNames {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for EventNames {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}
