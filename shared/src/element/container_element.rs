use crate::{container::container_ref::ContainerRef, ElementKey};

/// Lifecycle callbacks an entity may implement to learn about its
/// membership in a container. Both are invoked by the diff pass; entities
/// which don't expose this capability are simply not told.
pub trait ContainerElement<E: ElementKey> {
    fn on_added_to_container(&mut self, _container: ContainerRef<'_, E>) {}
    fn on_removed_from_container(&mut self, _container: ContainerRef<'_, E>) {}
}
