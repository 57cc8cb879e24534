use glam::Vec2;
use volt_core::input::FrameInput;

use crate::ability::{Ability, CastContext, LightningBolt, LightningSpell};
use crate::collision::{resolve_horizontal, resolve_vertical, Facing, Rect, VerticalContact};
use crate::config::{GameConfig, PhysicsConfig};

/// The wizard. Velocities are in pixels per fixed step; y grows downward.
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Drawn rectangle, bottom-center aligned to `rect`.
    pub render_rect: Rect,
    pub velocity: Vec2,
    pub jumping: bool,
    /// Thin box under the feet used to buffer a jump just before landing.
    pub jump_sensor: Rect,
    pub facing: Facing,
    pub in_exit: bool,
    pub ability: Ability,
    should_jump: bool,
    left_lock: bool,
    right_lock: bool,
    jump_held: bool,
    moving: bool,
    physics: PhysicsConfig,
}

impl Player {
    pub fn spawn(config: &GameConfig) -> Self {
        Self::new(config.player.spawn_x, config.player.spawn_y, config)
    }

    pub fn new(x: f32, y: f32, config: &GameConfig) -> Self {
        let body = &config.player;
        let mut player = Self {
            rect: Rect::new(x, y, body.width, body.height),
            render_rect: Rect::new(x, y, body.sprite_width, body.sprite_height),
            velocity: Vec2::ZERO,
            jumping: false,
            jump_sensor: Rect::new(0.0, 0.0, body.sensor_width, body.sensor_height),
            facing: Facing::default(),
            in_exit: false,
            ability: Ability::Lightning(LightningSpell::from_config(config)),
            should_jump: false,
            left_lock: false,
            right_lock: false,
            jump_held: false,
            moving: false,
            physics: config.physics,
        };
        player.sync_attachments();
        player
    }

    #[allow(dead_code)]
    pub fn is_jump_buffered(&self) -> bool {
        self.should_jump
    }

    #[allow(dead_code)]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Turn held directions into horizontal acceleration. The first of two
    /// opposing keys to be held keeps control until it is released.
    pub fn apply_input(&mut self, input: &FrameInput) {
        self.moving = false;
        let accel = self.physics.acceleration;

        if input.move_left && !self.left_lock {
            self.right_lock = true;
            self.moving = true;
            self.accelerate(-accel);
        } else {
            self.right_lock = false;
        }

        if input.move_right && !self.right_lock {
            self.left_lock = true;
            self.moving = true;
            self.accelerate(accel);
        } else {
            self.left_lock = false;
        }

        if !input.move_left && !input.move_right {
            if self.velocity.x != 0.0 {
                self.moving = true;
            }
            self.accelerate(0.0);
        }

        self.jump_held = input.jump_held;
    }

    /// Positive or negative `accel` pushes toward that direction, clamped to
    /// the top speed. Zero decays toward rest at the deceleration rate.
    pub fn accelerate(&mut self, accel: f32) {
        let top = self.physics.x_top_speed;
        if accel != 0.0 {
            self.velocity.x = (self.velocity.x + accel).clamp(-top, top);
            return;
        }
        let decel = self.physics.acceleration * self.physics.deceleration_factor;
        if self.velocity.x.abs() > decel {
            self.velocity.x -= decel * self.velocity.x.signum();
        } else {
            self.velocity.x = 0.0;
        }
    }

    pub fn jump(&mut self) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.velocity.y = -self.physics.jump_impulse;
        true
    }

    /// Remember a jump pressed in the air if the feet are about to touch down.
    pub fn buffer_jump(&mut self, solids: &[Rect]) -> bool {
        if solids.iter().any(|solid| self.jump_sensor.overlaps(solid)) {
            self.should_jump = true;
            log::trace!("Jump buffered at y={:.1}", self.rect.y);
        }
        self.should_jump
    }

    /// Jump key edge: jump from the ground, otherwise try to buffer.
    pub fn press_jump(&mut self, solids: &[Rect]) {
        if self.jumping {
            self.buffer_jump(solids);
        } else {
            self.jump();
        }
    }

    pub fn cast(&self, target_x: f32, solids: &[Rect], now: std::time::Duration) -> LightningBolt {
        self.ability.cast(&CastContext {
            target_x,
            solids,
            now,
        })
    }

    /// One fixed step of motion: x move and resolve, then gravity, y move and
    /// resolve against the same solids.
    pub fn step(&mut self, solids: &[Rect]) {
        let physics = self.physics;

        if self.velocity.x > 0.0 {
            self.facing = Facing::Right;
        } else if self.velocity.x < 0.0 {
            self.facing = Facing::Left;
        }

        if self.moving {
            self.rect.x += self.velocity.x;
        }
        if resolve_horizontal(&mut self.rect, self.facing, solids) {
            // Keep a nudge toward the wall so speed never builds up against it.
            self.velocity.x = match self.facing {
                Facing::Right => physics.acceleration,
                Facing::Left => -physics.acceleration,
            };
        }

        if self.velocity.y < physics.y_top_speed {
            self.velocity.y += physics.gravity;
        }
        self.rect.y += self.velocity.y;

        if self.velocity.y < -physics.ascent_cap && !self.jump_held {
            self.velocity.y = -physics.ascent_cap;
        }

        match resolve_vertical(&mut self.rect, self.velocity.y, solids) {
            VerticalContact::Landed => {
                // Resting velocity equals gravity so the next step re-detects the floor.
                self.velocity.y = physics.gravity;
                self.jumping = false;
                if self.should_jump {
                    self.should_jump = false;
                    self.jump();
                }
            }
            VerticalContact::Ceiling => {
                self.velocity.y = 0.0;
                self.jumping = true;
            }
            VerticalContact::Airborne => self.jumping = true,
        }

        self.sync_attachments();
    }

    fn sync_attachments(&mut self) {
        self.jump_sensor.set_center_x(self.rect.center_x());
        self.jump_sensor.set_top(self.rect.bottom());
        self.render_rect.set_center_x(self.rect.center_x());
        self.render_rect.set_bottom(self.rect.bottom());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Rect {
        Rect::new(0.0, 480.0, 800.0, 32.0)
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(x, y, &GameConfig::default())
    }

    fn held(move_left: bool, move_right: bool) -> FrameInput {
        FrameInput {
            move_left,
            move_right,
            ..FrameInput::default()
        }
    }

    #[test]
    fn running_into_wall_leaves_edge_flush_and_rebound_speed() {
        let wall = Rect::new(320.0, 416.0, 32.0, 64.0);
        let solids = [floor(), wall];
        let mut player = player_at(320.0 - 32.0 - 2.0, 416.0);
        player.velocity.x = 6.0;
        player.apply_input(&held(false, true));
        player.step(&solids);

        assert_eq!(player.rect.right(), wall.left());
        assert_eq!(player.velocity.x, 0.5);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn running_left_into_wall_rebounds_negative() {
        let wall = Rect::new(100.0, 416.0, 32.0, 64.0);
        let solids = [floor(), wall];
        let mut player = player_at(136.0, 416.0);
        player.velocity.x = -6.0;
        player.apply_input(&held(true, false));
        player.step(&solids);

        assert_eq!(player.rect.left(), wall.right());
        assert_eq!(player.velocity.x, -0.5);
        assert_eq!(player.facing, Facing::Left);
        assert!(!player.jumping);
    }

    #[test]
    fn rising_into_ceiling_stops_and_stays_airborne() {
        let ceiling = Rect::new(0.0, 0.0, 800.0, 32.0);
        let mut player = player_at(100.0, 40.0);
        assert!(player.jump());
        player.apply_input(&FrameInput {
            jump_held: true,
            ..FrameInput::default()
        });
        player.step(&[ceiling, floor()]);

        assert_eq!(player.rect.top(), ceiling.bottom());
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.jumping);
    }

    #[test]
    fn speed_is_clamped_and_decays_to_exact_zero() {
        let mut player = player_at(100.0, 100.0);
        for _ in 0..40 {
            player.apply_input(&held(false, true));
        }
        assert_eq!(player.velocity.x, 6.0);

        player.apply_input(&held(false, false));
        assert!(player.is_moving());
        assert_eq!(player.velocity.x, 4.5);

        player.velocity.x = 1.0;
        player.apply_input(&held(false, false));
        assert_eq!(player.velocity.x, 0.0);
        player.apply_input(&held(false, false));
        assert!(!player.is_moving());
    }

    #[test]
    fn first_held_direction_keeps_control() {
        let mut player = player_at(100.0, 100.0);
        player.apply_input(&held(true, false));
        player.apply_input(&held(true, true));
        player.apply_input(&held(true, true));
        assert!(player.velocity.x < 0.0);

        let mut player = player_at(100.0, 100.0);
        player.apply_input(&held(false, true));
        player.apply_input(&held(true, true));
        player.apply_input(&held(true, true));
        assert!(player.velocity.x > 0.0);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let solids = [floor()];
        let mut player = player_at(100.0, 416.0);
        player.step(&solids);
        assert!(!player.jumping, "resting on the floor after one step");
        assert_eq!(player.rect.bottom(), 480.0);

        assert!(player.jump());
        assert_eq!(player.velocity.y, -15.0);
        assert!(!player.jump(), "no double jump");
    }

    #[test]
    fn released_jump_cuts_the_ascent() {
        let solids = [floor()];
        let mut player = player_at(100.0, 416.0);
        player.step(&solids);
        player.jump();

        let mut held_input = FrameInput {
            jump_held: true,
            ..FrameInput::default()
        };
        player.apply_input(&held_input);
        player.step(&solids);
        assert_eq!(player.velocity.y, -14.5);

        held_input.jump_held = false;
        player.apply_input(&held_input);
        player.step(&solids);
        assert_eq!(player.velocity.y, -5.0);
    }

    #[test]
    fn buffered_jump_fires_on_landing_frame() {
        let solids = [floor()];
        let mut player = player_at(100.0, 480.0 - 64.0 - 10.0);
        player.step(&solids);
        assert!(player.jumping);

        player.press_jump(&solids);
        assert!(player.is_jump_buffered());

        let mut landed_on = None;
        for frame in 0..30 {
            player.step(&solids);
            if player.velocity.y < 0.0 {
                landed_on = Some(frame);
                break;
            }
        }
        assert!(landed_on.is_some(), "buffered jump never fired");
        assert_eq!(player.rect.bottom(), 480.0);
        assert_eq!(player.velocity.y, -15.0);
        assert!(player.jumping);
        assert!(!player.is_jump_buffered());
    }

    #[test]
    fn jump_press_far_above_ground_is_not_buffered() {
        let solids = [floor()];
        let mut player = player_at(100.0, 100.0);
        player.step(&solids);
        player.press_jump(&solids);
        assert!(!player.is_jump_buffered());
    }

    #[test]
    fn sensor_and_sprite_follow_the_body() {
        let mut player = player_at(100.0, 100.0);
        player.step(&[]);
        assert_eq!(player.jump_sensor.top(), player.rect.bottom());
        assert_eq!(player.jump_sensor.center_x(), player.rect.center_x());
        assert_eq!(player.render_rect.bottom(), player.rect.bottom());
    }
}
