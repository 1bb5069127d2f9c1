//! Entity trait: records that keep their identity for their whole stored life.

/// A persisted domain record with a store-assigned identifier.
///
/// Unsaved values (drafts, form data) deliberately do not implement this.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
