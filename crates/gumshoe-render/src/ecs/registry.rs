use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use crate::camera::PositionSource;
use crate::coords::Vec2;
use crate::events::{self, EventBus, EventData};

use super::{EntityId, Transform};

/// Data attachable to an entity.
pub trait Component: Any {
    /// Stable name used in diagnostics.
    const TYPE_NAME: &'static str;
}

/// Read-only component lookup, the only store interface the render pass needs.
pub trait ComponentSource {
    fn get_component<C: Component>(&self, entity: EntityId) -> Option<&C>;
}

/// Typed key-value component store keyed by `(EntityId, TypeId)`.
///
/// When an [`EventBus`] is attached, `insert` and `remove` announce
/// `component-added` / `component-removed` with the entity id.
#[derive(Default)]
pub struct ComponentRegistry {
    next_id: u32,
    alive: BTreeSet<EntityId>,
    components: HashMap<(EntityId, TypeId), Box<dyn Any>>,
    bus: Option<EventBus>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("entities", &self.alive.len())
            .field("components", &self.components.len())
            .field("has_bus", &self.bus.is_some())
            .finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(bus: EventBus) -> Self {
        Self { bus: Some(bus), ..Self::default() }
    }

    pub fn attach_events(&mut self, bus: EventBus) {
        self.bus = Some(bus);
    }

    /// Allocates a fresh entity id.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.alive.insert(id);
        id
    }

    #[inline]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.alive.len()
    }

    /// Attaches `component`, returning the one it replaced.
    ///
    /// Inserting on an id that was never spawned makes it alive.
    pub fn insert<C: Component>(&mut self, entity: EntityId, component: C) -> Option<C> {
        self.alive.insert(entity);
        let prev = self
            .components
            .insert((entity, TypeId::of::<C>()), Box::new(component))
            .and_then(|b| b.downcast::<C>().ok())
            .map(|b| *b);

        self.notify(events::COMPONENT_ADDED, entity);
        prev
    }

    pub fn remove<C: Component>(&mut self, entity: EntityId) -> Option<C> {
        let removed = self
            .components
            .remove(&(entity, TypeId::of::<C>()))
            .and_then(|b| b.downcast::<C>().ok())
            .map(|b| *b);

        if removed.is_some() {
            self.notify(events::COMPONENT_REMOVED, entity);
        }
        removed
    }

    #[inline]
    pub fn has<C: Component>(&self, entity: EntityId) -> bool {
        self.components.contains_key(&(entity, TypeId::of::<C>()))
    }

    pub fn get_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut C> {
        self.components
            .get_mut(&(entity, TypeId::of::<C>()))
            .and_then(|b| b.downcast_mut::<C>())
    }

    /// Removes the entity and every component it carries.
    ///
    /// Emits one `component-removed` per dropped component.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }

        let before = self.components.len();
        self.components.retain(|(id, _), _| *id != entity);
        for _ in self.components.len()..before {
            self.notify(events::COMPONENT_REMOVED, entity);
        }
        true
    }

    /// Entities carrying a `C`, in ascending id order.
    pub fn entities_with<C: Component>(&self) -> Vec<EntityId> {
        let ty = TypeId::of::<C>();
        let mut ids: Vec<EntityId> = self
            .components
            .keys()
            .filter(|(_, t)| *t == ty)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn notify(&self, event: &str, entity: EntityId) {
        if let Some(bus) = &self.bus {
            bus.emit(event, EventData::Entity(entity));
        }
    }
}

impl ComponentSource for ComponentRegistry {
    #[inline]
    fn get_component<C: Component>(&self, entity: EntityId) -> Option<&C> {
        self.components
            .get(&(entity, TypeId::of::<C>()))
            .and_then(|b| b.downcast_ref::<C>())
    }
}

/// Follow targets resolve through the entity's `Transform`.
impl PositionSource for ComponentRegistry {
    fn position_of(&self, target: EntityId) -> Option<Vec2> {
        self.get_component::<Transform>(target).map(Transform::position)
    }
}
