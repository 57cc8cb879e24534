//! Axis-separated rectangle collision against static solids.
//!
//! Movers integrate one axis at a time: move on X, push out of whatever they
//! now overlap on X, then do the same on Y with the corrected X. Resolving
//! per axis gives the usual "slide along walls" feel without any sweep.
//!
//! Overlap means positive area. Rectangles that merely share an edge do not
//! collide, so a body resting flush on a floor does not register that floor
//! during its horizontal pass.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_center_x(&mut self, center_x: f32) {
        self.x = center_x - self.w / 2.0;
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    /// Came down onto a solid; bottom now rests on its top.
    Landed,
    /// Went up into a solid; top now sits under its bottom.
    Ceiling,
    Airborne,
}

pub fn overlapping<'a>(rect: &'a Rect, solids: &'a [Rect]) -> impl Iterator<Item = &'a Rect> + 'a {
    solids.iter().filter(move |solid| rect.overlaps(solid))
}

/// Push `rect` out of every solid it overlaps, backing it off along `facing`.
/// Returns whether anything was hit.
pub fn resolve_horizontal(rect: &mut Rect, facing: Facing, solids: &[Rect]) -> bool {
    match facing {
        Facing::Right => {
            let Some(wall_left) = overlapping(rect, solids).map(Rect::left).reduce(f32::min) else {
                return false;
            };
            rect.set_right(wall_left);
        }
        Facing::Left => {
            let Some(wall_right) = overlapping(rect, solids).map(Rect::right).reduce(f32::max)
            else {
                return false;
            };
            rect.set_left(wall_right);
        }
    }
    true
}

/// Resolve the vertical pass for a body that just moved with `velocity_y`.
/// A body with zero vertical velocity is never considered supported.
pub fn resolve_vertical(rect: &mut Rect, velocity_y: f32, solids: &[Rect]) -> VerticalContact {
    if velocity_y > 0.0 {
        if let Some(floor_top) = overlapping(rect, solids).map(Rect::top).reduce(f32::min) {
            rect.set_bottom(floor_top);
            return VerticalContact::Landed;
        }
    } else if velocity_y < 0.0 {
        if let Some(ceiling_bottom) = overlapping(rect, solids).map(Rect::bottom).reduce(f32::max) {
            rect.set_top(ceiling_bottom);
            return VerticalContact::Ceiling;
        }
    }
    VerticalContact::Airborne
}

/// Slide a falling beam up so its bottom stops on the nearest solid it
/// crosses. Solids whose top is above `min_top` (the world's ceiling row)
/// never stop it.
pub fn drop_onto_floor(beam: &mut Rect, solids: &[Rect], min_top: f32) -> bool {
    let bottom = beam.bottom();
    let floor = overlapping(beam, solids)
        .map(Rect::top)
        .filter(|&top| top >= min_top && top < bottom)
        .reduce(f32::min);
    match floor {
        Some(top) => {
            beam.set_bottom(top);
            true
        }
        None => false,
    }
}
