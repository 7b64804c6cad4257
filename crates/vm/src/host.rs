//! The host runtime boundary.
//!
//! [`HostApi`] is the entire surface the VM calls outward through. The
//! embedding application supplies the implementation; the core never
//! assumes a particular entity-component representation, only the opaque
//! [`EntityHandle`].
//!
//! Read contract: every query about a dead, null, or otherwise unreadable
//! entity answers with that method's documented default instead of
//! failing, so graphs keep executing on stale data rather than aborting
//! mid-flight.

use hexweave_common::{EntityHandle, HexCoord, TeamRelation, Vec2};

/// Capability surface supplied by the embedding application.
///
/// Shape queries fill the caller-supplied buffer from index 0 and return
/// how many entries they wrote, never more than the buffer holds.
pub trait HostApi {
    /// World position, or `None` for a dead or positionless entity.
    fn position(&self, entity: EntityHandle) -> Option<Vec2>;

    /// Hex-grid coordinate, or `None` for a dead or off-grid entity.
    fn hex_position(&self, entity: EntityHandle) -> Option<HexCoord>;

    /// Whether the handle currently resolves to a live entity.
    fn is_alive(&self, entity: EntityHandle) -> bool;

    /// Whether the entity carries `tag`. Dead entities carry nothing.
    fn has_tag(&self, entity: EntityHandle, tag: &str) -> bool;

    /// Current (modifier-inclusive) attribute value, or `None` when the
    /// entity is dead or the attribute undefined.
    fn attribute(&self, entity: EntityHandle, attribute: &str) -> Option<f32>;

    /// Team id; 0 for teamless or dead entities.
    fn team(&self, entity: EntityHandle) -> u32;

    /// Layer-category bitmask; 0 for dead entities.
    fn layer_mask(&self, entity: EntityHandle) -> u32;

    /// Relationship of `to` as seen from `from`.
    fn relationship(&self, from: EntityHandle, to: EntityHandle) -> TeamRelation;

    fn query_circle(&self, center: Vec2, radius: f32, out: &mut [EntityHandle]) -> usize;

    /// Cone with apex at `apex`, opening toward `toward`.
    fn query_cone(
        &self,
        apex: Vec2,
        toward: Vec2,
        radius: f32,
        half_angle_deg: f32,
        out: &mut [EntityHandle],
    ) -> usize;

    /// Rectangle extending `length` from `origin` toward `toward`.
    fn query_rect(
        &self,
        origin: Vec2,
        toward: Vec2,
        length: f32,
        half_width: f32,
        out: &mut [EntityHandle],
    ) -> usize;

    /// Capsule of the given radius along the segment from `start` toward
    /// `toward`, clipped to `length`.
    fn query_line(
        &self,
        start: Vec2,
        toward: Vec2,
        length: f32,
        radius: f32,
        out: &mut [EntityHandle],
    ) -> usize;

    fn query_hex_range(&self, center: HexCoord, radius: i32, out: &mut [EntityHandle]) -> usize;

    fn query_hex_ring(&self, center: HexCoord, radius: i32, out: &mut [EntityHandle]) -> usize;

    fn query_hex_neighbors(&self, center: HexCoord, out: &mut [EntityHandle]) -> usize;

    /// Apply the named effect template to `target`, attributed to
    /// `source`, with up to two float arguments.
    fn apply_effect(
        &mut self,
        target: EntityHandle,
        template: &str,
        source: EntityHandle,
        args: &[f32],
    );

    /// Direct attribute delta, routed through the host's modifier
    /// pipeline.
    fn modify_attribute(&mut self, entity: EntityHandle, attribute: &str, delta: f32);

    /// Fire a tagged gameplay event at `entity`.
    fn send_event(&mut self, entity: EntityHandle, tag: &str, magnitude: f32);

    /// Per-entity scratch reads; `None` when the key was never written.
    fn scratch_float(&self, entity: EntityHandle, key: &str) -> Option<f32>;
    fn scratch_int(&self, entity: EntityHandle, key: &str) -> Option<i32>;
    fn scratch_entity(&self, entity: EntityHandle, key: &str) -> Option<EntityHandle>;

    fn set_scratch_float(&mut self, entity: EntityHandle, key: &str, value: f32);
    fn set_scratch_int(&mut self, entity: EntityHandle, key: &str, value: i32);
    fn set_scratch_entity(&mut self, entity: EntityHandle, key: &str, value: EntityHandle);

    /// Config parameter reads, scoped to an effect-template id.
    fn config_float(&self, scope: &str, key: &str) -> Option<f32>;
    fn config_int(&self, scope: &str, key: &str) -> Option<i32>;

    /// Base attribute value, bypassing the modifier pipeline.
    fn self_attribute(&self, entity: EntityHandle, attribute: &str) -> Option<f32>;

    /// Base attribute write, bypassing the modifier pipeline.
    fn set_self_attribute(&mut self, entity: EntityHandle, attribute: &str, value: f32);
}

/// An inert host: every read answers its default, every query finds
/// nothing, every side effect is dropped. Useful for headless execution
/// of pure programs and as a test scaffold.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl HostApi for NullHost {
    fn position(&self, _: EntityHandle) -> Option<Vec2> {
        None
    }
    fn hex_position(&self, _: EntityHandle) -> Option<HexCoord> {
        None
    }
    fn is_alive(&self, _: EntityHandle) -> bool {
        false
    }
    fn has_tag(&self, _: EntityHandle, _: &str) -> bool {
        false
    }
    fn attribute(&self, _: EntityHandle, _: &str) -> Option<f32> {
        None
    }
    fn team(&self, _: EntityHandle) -> u32 {
        0
    }
    fn layer_mask(&self, _: EntityHandle) -> u32 {
        0
    }
    fn relationship(&self, _: EntityHandle, _: EntityHandle) -> TeamRelation {
        TeamRelation::Neutral
    }
    fn query_circle(&self, _: Vec2, _: f32, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn query_cone(&self, _: Vec2, _: Vec2, _: f32, _: f32, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn query_rect(&self, _: Vec2, _: Vec2, _: f32, _: f32, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn query_line(&self, _: Vec2, _: Vec2, _: f32, _: f32, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn query_hex_range(&self, _: HexCoord, _: i32, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn query_hex_ring(&self, _: HexCoord, _: i32, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn query_hex_neighbors(&self, _: HexCoord, _: &mut [EntityHandle]) -> usize {
        0
    }
    fn apply_effect(&mut self, _: EntityHandle, _: &str, _: EntityHandle, _: &[f32]) {}
    fn modify_attribute(&mut self, _: EntityHandle, _: &str, _: f32) {}
    fn send_event(&mut self, _: EntityHandle, _: &str, _: f32) {}
    fn scratch_float(&self, _: EntityHandle, _: &str) -> Option<f32> {
        None
    }
    fn scratch_int(&self, _: EntityHandle, _: &str) -> Option<i32> {
        None
    }
    fn scratch_entity(&self, _: EntityHandle, _: &str) -> Option<EntityHandle> {
        None
    }
    fn set_scratch_float(&mut self, _: EntityHandle, _: &str, _: f32) {}
    fn set_scratch_int(&mut self, _: EntityHandle, _: &str, _: i32) {}
    fn set_scratch_entity(&mut self, _: EntityHandle, _: &str, _: EntityHandle) {}
    fn config_float(&self, _: &str, _: &str) -> Option<f32> {
        None
    }
    fn config_int(&self, _: &str, _: &str) -> Option<i32> {
        None
    }
    fn self_attribute(&self, _: EntityHandle, _: &str) -> Option<f32> {
        None
    }
    fn set_self_attribute(&mut self, _: EntityHandle, _: &str, _: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_host_answers_defaults() {
        let host = NullHost;
        let e = EntityHandle::from_raw(1);
        assert_eq!(host.position(e), None);
        assert!(!host.is_alive(e));
        assert!(!host.has_tag(e, "undead"));
        assert_eq!(host.relationship(e, e), TeamRelation::Neutral);
        let mut buffer = [EntityHandle::NONE; 4];
        assert_eq!(host.query_circle(Vec2::new(0.0, 0.0), 5.0, &mut buffer), 0);
        assert_eq!(host.config_float("scope", "key"), None);
    }
}
