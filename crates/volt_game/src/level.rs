use std::time::Duration;

use volt_core::input::FrameInput;
use volt_render::Camera2D;

use crate::ability::LightningBolt;
use crate::config::{DoorConfig, GameConfig};
use crate::collision::Rect;
use crate::entities::{EntitySet, StaticEntity};
use crate::player::Player;
use crate::power::PowerBus;
use crate::tiles::{build_entities, LevelDefinition, TileLayout};

/// Discrete outcome of an input edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// Enter was pressed while standing in an exit.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Running,
    /// The player dropped below the screen; the level must be rebuilt.
    FellOut,
}

/// One live instance of a level definition.
#[derive(Debug)]
pub struct Level {
    pub id: String,
    pub entities: EntitySet,
    pub bus: PowerBus,
    pub bolts: Vec<LightningBolt>,
    pub player: Player,
    pub camera: Camera2D,
    width_px: f32,
    display_height: f32,
    door: DoorConfig,
    shake_decay: f32,
}

impl Level {
    pub fn new(definition: &LevelDefinition, config: &GameConfig) -> Self {
        let layout = TileLayout {
            tile_size: config.tile_size,
            viewport_rows: config.viewport_rows(),
        };
        let width_px = definition.grid.width_px(config.tile_size);
        let mut entities = build_entities(&definition.grid, &layout);
        for wall in border_walls(width_px, config.display_height as f32) {
            entities.push(StaticEntity::Wall(wall));
        }
        let bus = PowerBus::from_entities(&entities);
        let player = Player::spawn(config);

        let mut camera = Camera2D::new(config.display_width);
        camera.add_shake(config.camera.initial_shake);
        camera.follow(player.rect.x, width_px);

        log::info!(
            "Level '{}' built: {} entities, {} power lines, {}px wide",
            definition.id,
            entities.len(),
            bus.line_count(),
            width_px
        );

        Self {
            id: definition.id.clone(),
            entities,
            bus,
            bolts: Vec::new(),
            player,
            camera,
            width_px,
            display_height: config.display_height as f32,
            door: config.door,
            shake_decay: config.camera.shake_decay,
        }
    }

    pub fn width_px(&self) -> f32 {
        self.width_px
    }

    /// Feed one step of input to the player. Edges (jump, attack, enter) are
    /// acted on here; held state drives the next `update`.
    pub fn handle_input(&mut self, input: &FrameInput, now: Duration) -> Option<LevelEvent> {
        self.player.apply_input(input);

        if input.jump_pressed {
            let solids = self.entities.solids();
            self.player.press_jump(&solids);
        }

        if input.attack_pressed {
            let target_x = self.camera.screen_to_world_x(input.cursor_x);
            let solids = self.entities.solids();
            self.bolts.push(self.player.cast(target_x, &solids, now));
        }

        if input.enter_pressed && self.player.in_exit {
            log::info!("Level '{}' completed", self.id);
            return Some(LevelEvent::Completed);
        }
        None
    }

    pub fn update(&mut self, now: Duration) -> LevelStatus {
        let solids = self.entities.solids();
        self.player.step(&solids);

        self.bolts.retain(|bolt| !bolt.is_expired(now));
        for bolt in &self.bolts {
            bolt.strike(&mut self.entities);
        }

        let door = self.door;
        for entity in self.entities.doors_mut() {
            entity.retract(door.step, door.travel);
        }
        self.bus.propagate(&mut self.entities);

        self.camera.follow(self.player.rect.x, self.width_px);
        self.camera.decay_shake(self.shake_decay);

        if self.player.rect.top() > self.display_height {
            log::info!("Player fell out of level '{}'", self.id);
            return LevelStatus::FellOut;
        }

        let body = self.player.rect;
        self.player.in_exit = self.entities.exits().any(|exit| exit.overlaps(&body));
        LevelStatus::Running
    }
}

/// One-unit walls just outside each side of the level, spanning the screen.
fn border_walls(width_px: f32, display_height: f32) -> [Rect; 2] {
    [
        Rect::new(-1.0, 0.0, 1.0, display_height),
        Rect::new(width_px, 0.0, 1.0, display_height),
    ]
}
