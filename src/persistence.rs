//! Persistence collaborator consumed by the empty-item removal pass.

/// Receives deletion requests for removed translation items.
///
/// The reconciler itself never talks to storage. When the removal pass drops
/// an item that the persistence layer already knows, it asks this
/// collaborator to delete it; items that were never persisted are dropped
/// from the collection only.
pub trait Persistence<T> {
    /// Whether the item is a managed, persisted instance.
    fn is_managed(&self, item: &T) -> bool;

    /// Requests deletion of a managed item from storage.
    fn request_delete(&mut self, item: &T);
}
