use glam::IVec2;
use rand::Rng;

/// Side-scrolling camera: a horizontal world-space offset plus a
/// screen-shake magnitude that is turned into integer jitter at blit time.
/// Levels never scroll vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub offset_x: f32,
    pub shake: f32,
    pub viewport_width: u32,
}

impl Camera2D {
    pub fn new(viewport_width: u32) -> Self {
        Self {
            offset_x: 0.0,
            shake: 0.0,
            viewport_width,
        }
    }

    /// Center horizontally on `target_x`, never showing anything outside
    /// `[0, world_width)`.
    pub fn follow(&mut self, target_x: f32, world_width: f32) {
        self.offset_x = clamp_scroll(target_x, self.viewport_width as f32, world_width);
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.shake = self.shake.max(amount);
    }

    pub fn decay_shake(&mut self, step: f32) {
        self.shake = (self.shake - step).max(0.0);
    }

    /// Random offset in `[-shake, shake]` on both axes, zero once the shake
    /// has settled.
    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> IVec2 {
        if self.shake <= 0.0 {
            return IVec2::ZERO;
        }
        let magnitude = self.shake as i32;
        IVec2::new(
            rng.gen_range(-magnitude..=magnitude),
            rng.gen_range(-magnitude..=magnitude),
        )
    }

    /// Where the world buffer's origin lands on screen.
    pub fn blit_origin(&self, jitter: IVec2) -> IVec2 {
        IVec2::new(-(self.offset_x as i32), 0) + jitter
    }

    pub fn screen_to_world_x(&self, screen_x: f32) -> f32 {
        screen_x + self.offset_x
    }
}

pub fn clamp_scroll(target_x: f32, viewport_width: f32, world_width: f32) -> f32 {
    let max_scroll = (world_width - viewport_width).max(0.0);
    (target_x - viewport_width / 2.0).clamp(0.0, max_scroll)
}
