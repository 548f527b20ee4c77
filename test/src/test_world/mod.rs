use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use slotsync_shared::{
    ContainerElement, ContainerKey, ContainerRef, ElementKey, ElementKind, ElementWorldMut,
    ElementWorldRef,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestEntity(pub u64);

impl ElementKey for TestEntity {
    fn to_u64(&self) -> u64 {
        self.0
    }

    fn from_u64(value: u64) -> Self {
        TestEntity(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookEvent {
    Added {
        element: TestEntity,
        container: ContainerKey,
    },
    Removed {
        element: TestEntity,
        container: ContainerKey,
    },
}

/// Hook events from every entity of a world, in firing order
#[derive(Clone, Default)]
struct HookLog {
    events: Arc<Mutex<Vec<HookEvent>>>,
}

impl HookLog {
    fn push(&self, event: HookEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn take(&self) -> Vec<HookEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

struct TestRecord {
    entity: TestEntity,
    kind: ElementKind,
    hook_capable: bool,
    log: HookLog,
}

impl ContainerElement<TestEntity> for TestRecord {
    fn on_added_to_container(&mut self, container: ContainerRef<'_, TestEntity>) {
        assert!(
            container.has_element(&self.entity),
            "added hook must observe the element as a member"
        );
        self.log.push(HookEvent::Added {
            element: self.entity,
            container: container.key(),
        });
    }

    fn on_removed_from_container(&mut self, container: ContainerRef<'_, TestEntity>) {
        assert!(
            !container.has_element(&self.entity),
            "removed hook must observe the element as gone"
        );
        self.log.push(HookEvent::Removed {
            element: self.entity,
            container: container.key(),
        });
    }
}

/// In-memory entity store. Entities spawned by a container get ids from a
/// range well above the ones tests pick by hand.
pub struct TestWorld {
    records: HashMap<TestEntity, TestRecord>,
    next_spawned_id: u64,
    log: HookLog,
    despawned: Vec<TestEntity>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            next_spawned_id: 1_000,
            log: HookLog::default(),
            despawned: Vec::new(),
        }
    }

    /// Inserts a hook-capable entity with a caller-chosen id
    pub fn insert(&mut self, id: u64, kind: ElementKind) -> TestEntity {
        self.insert_record(TestEntity(id), kind, true)
    }

    /// Inserts an entity which receives no container hooks
    pub fn insert_plain(&mut self, id: u64, kind: ElementKind) -> TestEntity {
        self.insert_record(TestEntity(id), kind, false)
    }

    fn insert_record(
        &mut self,
        entity: TestEntity,
        kind: ElementKind,
        hook_capable: bool,
    ) -> TestEntity {
        self.records.insert(
            entity,
            TestRecord {
                entity,
                kind,
                hook_capable,
                log: self.log.clone(),
            },
        );
        entity
    }

    pub fn exists(&self, entity: &TestEntity) -> bool {
        self.records.contains_key(entity)
    }

    pub fn take_hooks(&self) -> Vec<HookEvent> {
        self.log.take()
    }

    pub fn despawned(&self) -> &[TestEntity] {
        &self.despawned
    }
}

impl ElementWorldRef<TestEntity> for TestWorld {
    fn element_kind(&self, element: &TestEntity) -> Option<ElementKind> {
        self.records.get(element).map(|record| record.kind)
    }
}

impl ElementWorldMut<TestEntity> for TestWorld {
    fn spawn_element(&mut self, kind: &ElementKind) -> Option<TestEntity> {
        let entity = TestEntity(self.next_spawned_id);
        self.next_spawned_id += 1;
        Some(self.insert_record(entity, *kind, true))
    }

    fn despawn_element(&mut self, element: &TestEntity) {
        self.records.remove(element);
        self.despawned.push(*element);
    }

    fn container_element(
        &mut self,
        element: &TestEntity,
    ) -> Option<&mut dyn ContainerElement<TestEntity>> {
        match self.records.get_mut(element) {
            Some(record) if record.hook_capable => Some(record),
            _ => None,
        }
    }
}
