use crate::coords::Vec2;
use crate::ecs::EntityId;

/// Resolves a follow target to its current world position.
pub trait PositionSource {
    fn position_of(&self, target: EntityId) -> Option<Vec2>;
}

impl<F> PositionSource for F
where
    F: Fn(EntityId) -> Option<Vec2>,
{
    #[inline]
    fn position_of(&self, target: EntityId) -> Option<Vec2> {
        self(target)
    }
}

/// No lookup available: following is suspended, shake still decays.
impl PositionSource for () {
    #[inline]
    fn position_of(&self, _target: EntityId) -> Option<Vec2> {
        None
    }
}
