//! Authorization gate for interactions.

use crate::core::{command::acting_identity, interaction::Interaction};
use std::collections::HashSet;

/// Set of user ids allowed to act on something (a menu, an owner-only command).
///
/// An empty set permits nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedActors(HashSet<u64>);

impl AllowedActors {
    /// Allows exactly the given ids.
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Allows a single id.
    #[must_use]
    pub fn only(id: u64) -> Self {
        Self::new([id])
    }

    /// Whether the acting identity of `interaction` is allowed.
    #[must_use]
    pub fn permits(&self, interaction: &Interaction) -> bool {
        self.contains(acting_identity(interaction).id())
    }

    /// Whether `id` is allowed.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }
}

impl FromIterator<u64> for AllowedActors {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{command_interaction, in_guild};

    #[test]
    fn test_permits_listed_user_only() {
        let allowed = AllowedActors::new([1, 2]);
        assert!(allowed.permits(&command_interaction("stats", 1)));
        assert!(allowed.permits(&in_guild(command_interaction("stats", 2), 99)));
        assert!(!allowed.permits(&command_interaction("stats", 3)));
    }

    #[test]
    fn test_empty_set_permits_nobody() {
        let allowed = AllowedActors::default();
        assert!(!allowed.permits(&command_interaction("stats", 1)));
    }
}
