use crate::{ContainerElement, ElementKey, ElementKind};

/// Read access to the host world that owns the entities behind element keys
pub trait ElementWorldRef<E: ElementKey> {
    /// The kind of the entity, if it exists
    fn element_kind(&self, element: &E) -> Option<ElementKind>;
}

/// Mutable access to the host world
pub trait ElementWorldMut<E: ElementKey>: ElementWorldRef<E> {
    /// Instantiate a default entity of the given kind
    fn spawn_element(&mut self, kind: &ElementKind) -> Option<E>;
    fn despawn_element(&mut self, element: &E);
    /// Capability query: `None` if the entity doesn't exist or doesn't implement the hooks
    fn container_element(&mut self, element: &E) -> Option<&mut dyn ContainerElement<E>>;
}
