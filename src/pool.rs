//! Fixed-capacity entity pool.
//!
//! Slots are visited in index order for the update+render pass, while spawns
//! fill the highest free slot first.  An entity spawned during a pass
//! therefore usually lands behind the cursor and first moves next frame.

use rand::Rng;

use crate::compute::FrameContext;
use crate::entities::{Entity, Fate};
use crate::surface::Surface;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Entities whose `update` ran this pass.
    pub updated: usize,
    /// Entities that reported their own death (defeated players included).
    pub removed: usize,
    /// Players whose health ran out.
    pub defeated: usize,
}

#[derive(Clone, Debug)]
pub struct EntityPool {
    slots: Vec<Option<Entity>>,
    /// Slot whose entity is currently lifted out for its update.  It reads
    /// as empty but must not be handed out to a spawn.
    visiting: Option<usize>,
}

impl EntityPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            visiting: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.free_slot().is_none()
    }

    fn free_slot(&self) -> Option<usize> {
        (0..self.slots.len())
            .rev()
            .find(|&i| self.slots[i].is_none() && self.visiting != Some(i))
    }

    /// Puts `entity` into the highest free slot and returns its index.
    /// A full pool silently drops the entity.
    pub fn spawn(&mut self, entity: impl Into<Entity>) -> Option<usize> {
        let Some(slot) = self.free_slot() else {
            log::debug!("entity pool full ({} slots), spawn dropped", self.capacity());
            return None;
        };
        self.slots[slot] = Some(entity.into());
        Some(slot)
    }

    pub fn get(&self, slot: usize) -> Option<&Entity> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Entity> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Empties `slot`, handing back whatever was there.
    pub fn remove(&mut self, slot: usize) -> Option<Entity> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    /// Runs one update on every occupied slot, low index to high, and
    /// renders the survivors.  Entities removed by someone else's update
    /// earlier in the pass are simply not visited.
    pub fn update_and_render<S, R>(
        &mut self,
        ctx: &FrameContext,
        surface: &mut S,
        rng: &mut R,
    ) -> PassReport
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let mut report = PassReport::default();

        for i in 0..self.slots.len() {
            let Some(mut entity) = self.slots[i].take() else {
                continue;
            };

            self.visiting = Some(i);
            let fate = entity.update(ctx, self, rng);
            self.visiting = None;
            report.updated += 1;

            match fate {
                Fate::Alive => {
                    entity.render(surface, ctx.config);
                    self.slots[i] = Some(entity);
                }
                Fate::Dead => report.removed += 1,
                Fate::Defeated => {
                    report.removed += 1;
                    report.defeated += 1;
                }
            }
        }

        log::trace!(
            "pass: {} updated, {} removed, {} live",
            report.updated,
            report.removed,
            self.len()
        );
        report
    }

    /// Draws every live entity without advancing anything.
    pub fn render_all<S>(&self, ctx: &FrameContext, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        for (_, entity) in self.iter() {
            entity.render(surface, ctx.config);
        }
    }
}
