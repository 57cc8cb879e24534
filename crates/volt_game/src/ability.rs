use std::time::Duration;

use crate::collision::{drop_onto_floor, Rect};
use crate::config::GameConfig;
use crate::entities::EntitySet;

/// Everything a cast needs from the level at the moment of casting.
#[derive(Debug, Clone, Copy)]
pub struct CastContext<'a> {
    /// Target x in world space (cursor x plus camera offset).
    pub target_x: f32,
    pub solids: &'a [Rect],
    pub now: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningSpell {
    pub width: f32,
    pub lifetime: Duration,
    pub display_height: f32,
    /// Solids whose top is above this are the ceiling row and never stop a bolt.
    pub ceiling_floor: f32,
}

impl LightningSpell {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            width: config.bolt.width,
            lifetime: Duration::from_millis(config.bolt.lifetime_ms),
            display_height: config.display_height as f32,
            ceiling_floor: config.tile_size,
        }
    }

    pub fn cast(&self, ctx: &CastContext<'_>) -> LightningBolt {
        let mut rect = Rect::new(0.0, 0.0, self.width, self.display_height);
        rect.set_center_x(ctx.target_x);
        drop_onto_floor(&mut rect, ctx.solids, self.ceiling_floor);
        log::debug!(
            "Lightning cast at x={:.1}, bottom={:.1}",
            ctx.target_x,
            rect.bottom()
        );
        LightningBolt {
            rect,
            born_at: ctx.now,
            lifetime: self.lifetime,
        }
    }
}

/// What the player can do besides moving. The player owns one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ability {
    Lightning(LightningSpell),
}

impl Ability {
    pub fn cast(&self, ctx: &CastContext<'_>) -> LightningBolt {
        match self {
            Ability::Lightning(spell) => spell.cast(ctx),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningBolt {
    pub rect: Rect,
    born_at: Duration,
    lifetime: Duration,
}

impl LightningBolt {
    pub fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.born_at) >= self.lifetime
    }

    /// Power every generator the bolt touches. Returns how many switched on.
    pub fn strike(&self, entities: &mut EntitySet) -> usize {
        let mut newly_powered = 0;
        for generator in entities.generators_mut() {
            if generator.rect.overlaps(&self.rect) && generator.power() {
                log::info!("Generator {} powered", generator.id);
                newly_powered += 1;
            }
        }
        newly_powered
    }
}
