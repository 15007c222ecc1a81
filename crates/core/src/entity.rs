//! Entity trait: records compared by identity rather than by value.

/// A record whose identity survives a snapshot refresh.
///
/// Two fetches may return the same product with a different price or image
/// list; lookups across snapshots go through the identifier, never through
/// field equality.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` denotes the same catalog entry.
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
