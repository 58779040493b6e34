// Identifier Group Domain Model

use crate::domain::identifier::QueueIdentifier;
use std::collections::{BTreeMap, HashMap};

/// Wire shape: group name -> ordered member patterns
pub type IdentifierGroupPatterns = BTreeMap<String, Vec<String>>;

/// Parsed snapshot of all identifier groups (immutable per refresh)
#[derive(Debug, Clone, Default)]
pub struct IdentifierGroups {
    groups: HashMap<String, Vec<QueueIdentifier>>,
}

impl IdentifierGroups {
    pub fn from_patterns(patterns: IdentifierGroupPatterns) -> Self {
        let groups = patterns
            .into_iter()
            .map(|(name, members)| {
                let members = members.into_iter().map(QueueIdentifier::parse).collect();
                (name, members)
            })
            .collect();
        Self { groups }
    }

    /// Members of a group in declared order (None if the group is unknown)
    pub fn members(&self, name: &str) -> Option<&[QueueIdentifier]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
