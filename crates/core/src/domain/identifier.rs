// Queue Identifier Domain Model
//
// Sigils are parsed once here; nothing downstream inspects `!`, `@` or `*` again.

use std::fmt;

/// Leading marker that inverts a pattern
pub const NEGATION_MARKER: char = '!';

/// Leading marker for an identifier-group reference
pub const GROUP_MARKER: char = '@';

/// Wildcard character inside a pattern body
pub const WILDCARD: char = '*';

/// Classification of a queue identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// Plain queue name, always considered even if the queue does not exist yet
    Literal,
    /// Positive pattern containing `*`
    Wildcard,
    /// `!`-prefixed pattern (with or without `*`)
    Negated,
    /// `@group` or `!@group`
    GroupRef { negated: bool },
}

/// An operator-supplied token naming or matching one or more queues
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueIdentifier {
    raw: String,
    kind: IdentifierKind,
}

impl QueueIdentifier {
    /// Parse a raw identifier into its tagged form
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = classify(&raw);
        Self { raw, kind }
    }

    /// Wrap a concrete queue name reported by the engine (no sigil parsing)
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            raw: name.into(),
            kind: IdentifierKind::Literal,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn is_negated(&self) -> bool {
        matches!(
            self.kind,
            IdentifierKind::Negated | IdentifierKind::GroupRef { negated: true }
        )
    }

    /// No negation and no wildcard: kept verbatim during matching
    pub fn is_static(&self) -> bool {
        matches!(
            self.kind,
            IdentifierKind::Literal | IdentifierKind::GroupRef { negated: false }
        )
    }

    /// Group name for `@name` / `!@name`
    pub fn group_name(&self) -> Option<&str> {
        match self.kind {
            IdentifierKind::GroupRef { .. } => {
                let body = self.pattern_body();
                Some(&body[GROUP_MARKER.len_utf8()..])
            }
            _ => None,
        }
    }

    /// Raw text with a leading negation marker removed
    pub fn pattern_body(&self) -> &str {
        if self.is_negated() {
            &self.raw[NEGATION_MARKER.len_utf8()..]
        } else {
            &self.raw
        }
    }

    /// Toggle negation: `a` -> `!a`, `!b` -> `b`
    pub fn negate(&self) -> Self {
        if self.is_negated() {
            Self::parse(self.pattern_body())
        } else {
            Self::parse(format!("{}{}", NEGATION_MARKER, self.raw))
        }
    }
}

fn classify(raw: &str) -> IdentifierKind {
    let (negated, rest) = match raw.strip_prefix(NEGATION_MARKER) {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if rest.starts_with(GROUP_MARKER) {
        IdentifierKind::GroupRef { negated }
    } else if negated {
        IdentifierKind::Negated
    } else if rest.contains(WILDCARD) {
        IdentifierKind::Wildcard
    } else {
        IdentifierKind::Literal
    }
}

impl fmt::Display for QueueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for QueueIdentifier {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for QueueIdentifier {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(QueueIdentifier::parse("jobs").kind(), IdentifierKind::Literal);
        assert_eq!(QueueIdentifier::parse("jobs-*").kind(), IdentifierKind::Wildcard);
        assert_eq!(QueueIdentifier::parse("!jobs").kind(), IdentifierKind::Negated);
        assert_eq!(QueueIdentifier::parse("!jobs-*").kind(), IdentifierKind::Negated);
        assert_eq!(
            QueueIdentifier::parse("@grp").kind(),
            IdentifierKind::GroupRef { negated: false }
        );
        assert_eq!(
            QueueIdentifier::parse("!@grp").kind(),
            IdentifierKind::GroupRef { negated: true }
        );
    }

    #[test]
    fn test_group_name_strips_markers() {
        assert_eq!(QueueIdentifier::parse("@grp").group_name(), Some("grp"));
        assert_eq!(QueueIdentifier::parse("!@grp").group_name(), Some("grp"));
        assert_eq!(QueueIdentifier::parse("grp").group_name(), None);
    }

    #[test]
    fn test_negate_toggles_marker() {
        let a = QueueIdentifier::parse("a").negate();
        assert_eq!(a.as_str(), "!a");
        assert_eq!(a.kind(), IdentifierKind::Negated);

        let b = QueueIdentifier::parse("!b*").negate();
        assert_eq!(b.as_str(), "b*");
        assert_eq!(b.kind(), IdentifierKind::Wildcard);
    }

    #[test]
    fn test_static_means_no_bang_no_star() {
        assert!(QueueIdentifier::parse("queueA").is_static());
        assert!(QueueIdentifier::parse("@nested").is_static());
        assert!(!QueueIdentifier::parse("queue*").is_static());
        assert!(!QueueIdentifier::parse("!queueA").is_static());
    }

    #[test]
    fn test_literal_skips_parsing() {
        let id = QueueIdentifier::literal("odd*name");
        assert_eq!(id.kind(), IdentifierKind::Literal);
        assert_eq!(id.to_string(), "odd*name");
    }
}
