use std::{any::TypeId, fmt};

/// The kind of an external entity, used for default population and
/// kind-based lookups.
#[derive(Eq, PartialEq, Clone, Copy, Hash)]
pub struct ElementKind {
    type_id: TypeId,
    name: &'static str,
}

impl ElementKind {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementKind({})", self.name)
    }
}
