//! World composition: flat-colored rectangles into a level-sized buffer,
//! then one blit onto the screen at the camera origin plus shake jitter.

use glam::IVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use volt_render::{FrameBuffer, Rgba};

use crate::collision::Rect;
use crate::level::Level;

pub const WHITE: Rgba = [255, 255, 255, 255];
pub const BLACK: Rgba = [0, 0, 0, 255];
pub const GREEN: Rgba = [0, 200, 0, 255];
pub const RED: Rgba = [220, 0, 0, 255];
pub const ORANGE: Rgba = [255, 150, 0, 255];
pub const BLUE: Rgba = [0, 0, 255, 255];

pub struct WorldRenderer {
    world: FrameBuffer,
    screen: FrameBuffer,
    rng: StdRng,
}

impl WorldRenderer {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self::with_rng(screen_width, screen_height, StdRng::from_entropy())
    }

    pub fn with_rng(screen_width: u32, screen_height: u32, rng: StdRng) -> Self {
        Self {
            world: FrameBuffer::new(screen_width, screen_height),
            screen: FrameBuffer::new(screen_width, screen_height),
            rng,
        }
    }

    #[allow(dead_code)]
    pub fn world(&self) -> &FrameBuffer {
        &self.world
    }

    /// Draw the level and place it on screen. Returns the screen buffer.
    pub fn render(&mut self, level: &Level) -> &FrameBuffer {
        let world_width = level.width_px().ceil().max(1.0) as u32;
        self.world.ensure_size(world_width, self.screen.height());
        compose_world(level, &mut self.world);

        let jitter = level.camera.jitter(&mut self.rng);
        let origin = level.camera.blit_origin(jitter);
        present_world(&self.world, &mut self.screen, origin);
        &self.screen
    }
}

/// Draw order: exits, bolts, walls, doors, generators, player.
pub fn compose_world(level: &Level, world: &mut FrameBuffer) {
    world.fill(WHITE);
    for exit in level.entities.exits() {
        draw_rect(world, exit, GREEN);
    }
    for bolt in &level.bolts {
        draw_rect(world, &bolt.rect, RED);
    }
    for wall in level.entities.walls() {
        draw_rect(world, wall, BLACK);
    }
    for door in level.entities.doors() {
        draw_rect(world, &door.rect, BLACK);
    }
    for generator in level.entities.generators() {
        let color = if generator.is_powered() { ORANGE } else { RED };
        draw_rect(world, &generator.rect, color);
    }
    draw_rect(world, &level.player.render_rect, BLUE);
}

pub fn present_world(world: &FrameBuffer, screen: &mut FrameBuffer, origin: IVec2) {
    screen.fill(WHITE);
    screen.blit(world, origin.x, origin.y);
}

fn draw_rect(target: &mut FrameBuffer, rect: &Rect, color: Rgba) {
    let x = rect.x.floor() as i32;
    let y = rect.y.floor() as i32;
    let right = rect.right().ceil() as i32;
    let bottom = rect.bottom().ceil() as i32;
    target.fill_rect(x, y, right - x, bottom - y, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::tiles::{LevelDefinition, RawCell, TileGrid};

    fn level(cells: &str) -> Level {
        let raw: Vec<Vec<RawCell>> = serde_json::from_str(cells).expect("cells json");
        let definition = LevelDefinition {
            id: "render".to_string(),
            next: None,
            quit_on_exit: false,
            grid: TileGrid::from_raw(&raw).expect("grid"),
            source: None,
        };
        Level::new(&definition, &GameConfig::default())
    }

    #[test]
    fn compose_draws_entities_in_their_colors() {
        let mut level = level(r#"[[1, -1, 0, "g1"], [0, 0, 0, 0], [0, 0, 0, 0]]"#);
        level.player.render_rect = Rect::new(40.0, 40.0, 8.0, 8.0);
        let mut world = FrameBuffer::new(128, 640);
        compose_world(&level, &mut world);

        assert_eq!(world.pixel(5, 5), Some(BLACK));
        assert_eq!(world.pixel(40, 5), Some(GREEN));
        assert_eq!(world.pixel(70, 5), Some(WHITE));
        assert_eq!(world.pixel(100, 50), Some(RED));
        assert_eq!(world.pixel(44, 44), Some(BLUE));

        for generator in level.entities.generators_mut() {
            generator.power();
        }
        compose_world(&level, &mut world);
        assert_eq!(world.pixel(100, 50), Some(ORANGE));
    }

    #[test]
    fn settled_camera_blits_at_negative_offset() {
        let row = vec!["0"; 35].join(",");
        let mut level = level(&format!("[[{row}], [{row}]]"));
        level.camera.shake = 0.0;
        level.camera.offset_x = 320.0;
        level.player.render_rect = Rect::new(330.0, 0.0, 10.0, 10.0);

        let mut renderer = WorldRenderer::with_rng(800, 640, StdRng::seed_from_u64(3));
        let screen = renderer.render(&level);
        assert_eq!(screen.pixel(10, 5), Some(BLUE));
        assert_eq!(screen.pixel(9, 5), Some(WHITE));
        assert_eq!(renderer.world().width(), 1120);
    }

    #[test]
    fn shaking_camera_stays_within_shake_bounds() {
        let mut level = level("[[0]]");
        level.player.render_rect = Rect::new(4.0, 4.0, 1.0, 1.0);
        level.camera.shake = 3.0;
        let mut renderer = WorldRenderer::with_rng(64, 64, StdRng::seed_from_u64(11));
        for _ in 0..20 {
            let screen = renderer.render(&level);
            let mut found = None;
            for y in 0..12 {
                for x in 0..12 {
                    if screen.pixel(x, y) == Some(BLUE) {
                        found = Some((x, y));
                    }
                }
            }
            let (x, y) = found.expect("player pixel on screen within jitter");
            assert!((1..=7).contains(&x) && (1..=7).contains(&y));
        }
    }
}
