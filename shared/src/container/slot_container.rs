use log::{debug, info};

use crate::{
    container::{
        authority::{AuthorityMut, SlotAuthority},
        container_config::ContainerConfig,
        container_ref::ContainerRef,
        container_state::ContainerState,
        error::SlotError,
        notifier::SubscriptionKey,
        replication::ContainerUpdate,
        slot_array::SlotArray,
    },
    gateway::RemoteInvocationGateway,
    messages::container_request::ContainerRequest,
    ContainerKey, ContainerRole, ElementKey, ElementKind, ElementWorldMut, ElementWorldRef,
    SlotIndex,
};

enum ContainerNode<E: ElementKey> {
    Authority(SlotAuthority<E>),
    Proxy(Box<dyn RemoteInvocationGateway<E>>),
}

/// A fixed-capacity array of element slots, replicated from one authority
/// to any number of proxies.
///
/// The mutation methods (`try_*`) are role-transparent: on the authority
/// they are validated and applied immediately, on a proxy they are
/// forwarded unevaluated to the authority. Neither path reports success to
/// the caller; the effect shows up later through element hooks and update
/// subscribers. Queries always read the local copy, which on a proxy may
/// lag behind the authority.
pub struct SlotContainer<E: ElementKey> {
    state: ContainerState<E>,
    node: ContainerNode<E>,
}

impl<E: ElementKey> SlotContainer<E> {
    pub fn new_authority(key: ContainerKey, config: &ContainerConfig) -> Result<Self, SlotError> {
        config.validate()?;
        let slots = SlotArray::new(config.slot_count)?;
        Ok(Self {
            state: ContainerState::new(key, slots),
            node: ContainerNode::Authority(SlotAuthority::new(config.default_elements.clone())),
        })
    }

    /// Creates an empty proxy. Its contents arrive through [`Self::apply_update`].
    pub fn new_proxy(
        key: ContainerKey,
        slot_count: SlotIndex,
        gateway: Box<dyn RemoteInvocationGateway<E>>,
    ) -> Result<Self, SlotError> {
        let slots = SlotArray::new(slot_count)?;
        Ok(Self {
            state: ContainerState::new(key, slots),
            node: ContainerNode::Proxy(gateway),
        })
    }

    pub fn key(&self) -> ContainerKey {
        self.state.key
    }

    pub fn role(&self) -> ContainerRole {
        match self.node {
            ContainerNode::Authority(_) => ContainerRole::Authority,
            ContainerNode::Proxy(_) => ContainerRole::Proxy,
        }
    }

    // Mutations

    pub fn try_add_element<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        element: E,
        index: Option<SlotIndex>,
    ) {
        self.dispatch(world, ContainerRequest::AddElement { element, index });
    }

    pub fn try_remove_element<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        element: E,
        index: SlotIndex,
    ) {
        self.dispatch(world, ContainerRequest::RemoveElement { element, index });
    }

    pub fn try_remove_element_by_index<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        index: SlotIndex,
    ) {
        self.dispatch(world, ContainerRequest::RemoveElementByIndex { index });
    }

    pub fn try_swap_element<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        index_a: SlotIndex,
        index_b: SlotIndex,
    ) {
        self.dispatch(world, ContainerRequest::SwapElement { index_a, index_b });
    }

    pub fn try_set_slot_count<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        slot_count: SlotIndex,
    ) {
        self.dispatch(world, ContainerRequest::SetSlotCount { slot_count });
    }

    /// Applies `request` here if this is the authority, otherwise forwards
    /// it. Rejections are logged and otherwise silent.
    pub fn dispatch<W: ElementWorldMut<E>>(&mut self, world: &mut W, request: ContainerRequest<E>) {
        match &mut self.node {
            ContainerNode::Authority(authority) => {
                let key = self.state.key;
                let name = request.name();
                let mut authority_mut = AuthorityMut::new(authority, &mut self.state);
                if let Err(error) = authority_mut.apply(world, request) {
                    debug!("Container {:?}: rejected {}, {}", key, name, error);
                }
            }
            ContainerNode::Proxy(gateway) => {
                gateway.forward(&self.state.key, request);
            }
        }
    }

    /// Direct access to the validator, with typed outcomes. `None` on a proxy.
    pub fn authority_mut(&mut self) -> Option<AuthorityMut<'_, E>> {
        match &mut self.node {
            ContainerNode::Authority(authority) => {
                Some(AuthorityMut::new(authority, &mut self.state))
            }
            ContainerNode::Proxy(_) => None,
        }
    }

    /// Populates configured default elements. Runs once, on the authority.
    pub fn init_default_elements<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
    ) -> Result<usize, SlotError> {
        let Some(mut authority_mut) = self.authority_mut() else {
            return Err(SlotError::NotAuthority {
                operation: "init_default_elements",
            });
        };
        authority_mut.init_default_elements(world)
    }

    /// Fires the update notification without changing membership, for when
    /// a held element's own state changed. Only elements this container
    /// holds are accepted.
    pub fn notify_element_updated(&mut self, element: &E) -> Result<(), SlotError> {
        if !self.state.slots.contains(element) {
            return Err(SlotError::ElementNotHeld {
                element: format!("{:?}", element),
            });
        }
        self.state.notifier.notify(&self.state.key);
        Ok(())
    }

    // Replication

    /// Whether the authority has changes not yet taken for replication
    pub fn is_dirty(&self) -> bool {
        match &self.node {
            ContainerNode::Authority(authority) => !authority.dirty().is_clear(),
            ContainerNode::Proxy(_) => false,
        }
    }

    /// Takes the parts of the state changed since the last call. Always
    /// `None` on a proxy.
    pub fn take_update(&mut self) -> Option<ContainerUpdate<E>> {
        let ContainerNode::Authority(authority) = &mut self.node else {
            return None;
        };
        let dirty = authority.take_dirty();
        if dirty.is_clear() {
            return None;
        }
        Some(ContainerUpdate::from_dirty(&dirty, &self.state.slots))
    }

    pub fn full_update(&self) -> ContainerUpdate<E> {
        ContainerUpdate::full(&self.state.slots)
    }

    /// Replaces a proxy's copy with replicated state and runs one diff pass.
    /// Returns whether anything changed.
    pub fn apply_update<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        update: ContainerUpdate<E>,
    ) -> Result<bool, SlotError> {
        match self.node {
            ContainerNode::Authority(_) => Err(SlotError::NotProxy {
                operation: "apply_update",
            }),
            ContainerNode::Proxy(_) => self.state.apply_update(world, update),
        }
    }

    /// Tears the container down. Defaults it still owns are despawned; no
    /// hooks or notifications fire.
    pub fn destroy<W: ElementWorldMut<E>>(self, world: &mut W) {
        let Self { state, node } = self;
        if let ContainerNode::Authority(mut authority) = node {
            // an owned default is always still held, possibly in several slots
            let owned = authority.take_owned_defaults();
            for element in owned.iter() {
                world.despawn_element(element);
            }
            info!(
                "Container {:?}: destroyed, despawned {} owned default elements",
                state.key,
                owned.len()
            );
        }
    }

    pub fn owns_element(&self, element: &E) -> bool {
        match &self.node {
            ContainerNode::Authority(authority) => authority.owns_element(element),
            ContainerNode::Proxy(_) => false,
        }
    }

    // Observers

    pub fn subscribe(&mut self, subscriber: impl FnMut() + Send + 'static) -> SubscriptionKey {
        self.state.notifier.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, key: &SubscriptionKey) -> bool {
        self.state.notifier.unsubscribe(key)
    }

    // Queries

    pub fn container_ref(&self) -> ContainerRef<'_, E> {
        self.state.container_ref()
    }

    pub fn has_element(&self, element: &E) -> bool {
        self.state.slots.contains(element)
    }

    pub fn has_element_of_kind<W: ElementWorldRef<E>>(
        &self,
        world: &W,
        kind: &ElementKind,
    ) -> bool {
        self.element_of_kind(world, kind).is_some()
    }

    pub fn element(&self, index: SlotIndex) -> Option<E> {
        self.state.slots.get(index)
    }

    /// The lowest-indexed element of the given kind
    pub fn element_of_kind<W: ElementWorldRef<E>>(
        &self,
        world: &W,
        kind: &ElementKind,
    ) -> Option<E> {
        self.state
            .slots
            .as_slice()
            .iter()
            .flatten()
            .find(|element| world.element_kind(element).as_ref() == Some(kind))
            .copied()
    }

    /// Copy of every slot, in index order
    pub fn elements(&self) -> Vec<Option<E>> {
        self.state.slots.as_slice().to_vec()
    }

    pub fn slot_count(&self) -> SlotIndex {
        self.state.slots.slot_count()
    }

    pub fn element_index(&self, element: &E) -> Option<SlotIndex> {
        self.state.slots.index_of(element)
    }
}
