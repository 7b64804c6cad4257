//! The bounded target list.
//!
//! Spatial queries fill it, filters compact it in place, reducers and
//! fan-out actions consume it. It never grows past its backing capacity;
//! all mutation moves the live prefix of the fixed buffer.

use hexweave_common::{EntityHandle, Vec2};

/// Most entities one execution can hold as targets. Query scratch buffers
/// share this bound.
pub const MAX_TARGETS: usize = 32;

/// A bounded, in-place-mutable sequence of entity handles.
#[derive(Debug, Clone, Copy)]
pub struct TargetList {
    entries: [EntityHandle; MAX_TARGETS],
    len: usize,
}

impl TargetList {
    pub fn new() -> Self {
        TargetList {
            entries: [EntityHandle::NONE; MAX_TARGETS],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one handle. Returns false (and drops the handle) when full.
    pub fn push(&mut self, entity: EntityHandle) -> bool {
        if self.len >= MAX_TARGETS {
            return false;
        }
        self.entries[self.len] = entity;
        self.len += 1;
        true
    }

    /// Replace the contents with `entities`, capped at capacity.
    pub fn fill_from(&mut self, entities: &[EntityHandle]) {
        let count = entities.len().min(MAX_TARGETS);
        self.entries[..count].copy_from_slice(&entities[..count]);
        self.len = count;
    }

    /// Element at `index`, or `None` past the live prefix.
    pub fn get(&self, index: usize) -> Option<EntityHandle> {
        if index < self.len {
            Some(self.entries[index])
        } else {
            None
        }
    }

    /// The live prefix.
    pub fn as_slice(&self) -> &[EntityHandle] {
        &self.entries[..self.len]
    }

    /// Destructive filter: keep entities for which `keep` returns true,
    /// compacting the survivors to the front in their original order.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityHandle) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let entity = self.entries[read];
            if keep(entity) {
                self.entries[write] = entity;
                write += 1;
            }
        }
        self.len = write;
    }

    /// Stable sort by raw handle id, then drop adjacent duplicates.
    pub fn sort_dedup(&mut self) {
        let live = &mut self.entries[..self.len];
        live.sort();
        let mut write = 0;
        for read in 0..self.len {
            if write == 0 || self.entries[read] != self.entries[write - 1] {
                self.entries[write] = self.entries[read];
                write += 1;
            }
        }
        self.len = write;
    }

    /// Keep at most the first `limit` entries.
    pub fn truncate(&mut self, limit: usize) {
        if limit < self.len {
            self.len = limit;
        }
    }

    /// The entity nearest to `origin` by squared distance, resolving
    /// positions through `position`. Entities without a position are
    /// skipped; ties keep the earliest entry.
    pub fn nearest_by(
        &self,
        origin: Vec2,
        position: impl Fn(EntityHandle) -> Option<Vec2>,
    ) -> Option<EntityHandle> {
        let mut best: Option<(EntityHandle, f32)> = None;
        for &entity in self.as_slice() {
            let Some(pos) = position(entity) else {
                continue;
            };
            let dist = origin.distance_sq(pos);
            match best {
                Some((_, best_dist)) if best_dist <= dist => {}
                _ => best = Some((entity, dist)),
            }
        }
        best.map(|(entity, _)| entity)
    }
}

impl Default for TargetList {
    fn default() -> Self {
        Self::new()
    }
}
