//! Generator → door power lines.
//!
//! Generators and doors never reference each other. Powered generators
//! energize their id on the bus; doors read the bus and latch on. Several
//! generators may drive the same id, and one generator drives every door
//! that shares its id. Lines only ever switch on.

use std::collections::HashMap;

use crate::entities::EntitySet;

#[derive(Debug, Clone, Default)]
pub struct PowerBus {
    lines: HashMap<u32, bool>,
}

impl PowerBus {
    /// Declare every id present in the level so unpowered lines are visible.
    pub fn from_entities(entities: &EntitySet) -> Self {
        let mut bus = Self::default();
        for id in entities
            .generators()
            .map(|generator| generator.id)
            .chain(entities.doors().map(|door| door.id))
        {
            bus.lines.entry(id).or_insert(false);
        }
        bus
    }

    /// Returns true when the line was not already live.
    pub fn energize(&mut self, id: u32) -> bool {
        let line = self.lines.entry(id).or_insert(false);
        let newly = !*line;
        *line = true;
        newly
    }

    pub fn is_powered(&self, id: u32) -> bool {
        self.lines.get(&id).copied().unwrap_or(false)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Push generator state onto the bus, then latch every door whose line
    /// is live.
    pub fn propagate(&mut self, entities: &mut EntitySet) {
        for generator in entities.generators() {
            if generator.is_powered() && self.energize(generator.id) {
                log::info!("Power line {} energized", generator.id);
            }
        }
        for door in entities.doors_mut() {
            if self.is_powered(door.id) && door.power() {
                log::debug!("Door on line {} powered at y={}", door.id, door.rect.y);
            }
        }
    }
}
