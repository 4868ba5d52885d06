//! Entity trait: identity + continuity across snapshots.

/// Entity marker + minimal interface.
///
/// Families and students are entities: two snapshots with the same id describe
/// the same family even if every other field changed in between.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
