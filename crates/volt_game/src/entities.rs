use crate::collision::Rect;

/// Doors are one tile wide and three tall.
const DOOR_HEIGHT_TILES: f32 = 3.0;
/// Generators are one tile wide and two tall.
const GENERATOR_HEIGHT_TILES: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Door {
    pub rect: Rect,
    pub id: u32,
    pub origin_y: f32,
    powered: bool,
}

impl Door {
    pub fn new(x: f32, y: f32, tile_size: f32, id: u32) -> Self {
        Self {
            rect: Rect::new(x, y, tile_size, tile_size * DOOR_HEIGHT_TILES),
            id,
            origin_y: y,
            powered: false,
        }
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Latch power on. There is no way back.
    pub fn power(&mut self) -> bool {
        let newly = !self.powered;
        self.powered = true;
        newly
    }

    /// Rise by `step` while powered, stopping `travel` above the origin.
    pub fn retract(&mut self, step: f32, travel: f32) {
        if self.powered {
            self.rect.y = (self.rect.y - step).max(self.origin_y - travel);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Generator {
    pub rect: Rect,
    pub id: u32,
    powered: bool,
}

impl Generator {
    pub fn new(x: f32, y: f32, tile_size: f32, id: u32) -> Self {
        Self {
            rect: Rect::new(x, y, tile_size, tile_size * GENERATOR_HEIGHT_TILES),
            id,
            powered: false,
        }
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Returns true on the first call only.
    pub fn power(&mut self) -> bool {
        let newly = !self.powered;
        self.powered = true;
        newly
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticEntity {
    Wall(Rect),
    Exit(Rect),
    Door(Door),
    Generator(Generator),
}

impl StaticEntity {
    pub fn rect(&self) -> &Rect {
        match self {
            StaticEntity::Wall(rect) | StaticEntity::Exit(rect) => rect,
            StaticEntity::Door(door) => &door.rect,
            StaticEntity::Generator(generator) => &generator.rect,
        }
    }

    /// Walls and doors block movement; exits and generators are zones.
    pub fn is_solid(&self) -> bool {
        matches!(self, StaticEntity::Wall(_) | StaticEntity::Door(_))
    }
}

/// Every static entity of one level, in load order.
#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    entities: Vec<StaticEntity>,
}

impl EntitySet {
    pub fn new(entities: Vec<StaticEntity>) -> Self {
        Self { entities }
    }

    pub fn push(&mut self, entity: StaticEntity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Snapshot of the current solid rectangles. Doors move, so callers take
    /// a fresh snapshot each step.
    pub fn solids(&self) -> Vec<Rect> {
        self.entities
            .iter()
            .filter(|entity| entity.is_solid())
            .map(|entity| *entity.rect())
            .collect()
    }

    pub fn walls(&self) -> impl Iterator<Item = &Rect> {
        self.entities.iter().filter_map(|entity| match entity {
            StaticEntity::Wall(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn exits(&self) -> impl Iterator<Item = &Rect> {
        self.entities.iter().filter_map(|entity| match entity {
            StaticEntity::Exit(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn doors(&self) -> impl Iterator<Item = &Door> {
        self.entities.iter().filter_map(|entity| match entity {
            StaticEntity::Door(door) => Some(door),
            _ => None,
        })
    }

    pub fn doors_mut(&mut self) -> impl Iterator<Item = &mut Door> {
        self.entities.iter_mut().filter_map(|entity| match entity {
            StaticEntity::Door(door) => Some(door),
            _ => None,
        })
    }

    pub fn generators(&self) -> impl Iterator<Item = &Generator> {
        self.entities.iter().filter_map(|entity| match entity {
            StaticEntity::Generator(generator) => Some(generator),
            _ => None,
        })
    }

    pub fn generators_mut(&mut self) -> impl Iterator<Item = &mut Generator> {
        self.entities.iter_mut().filter_map(|entity| match entity {
            StaticEntity::Generator(generator) => Some(generator),
            _ => None,
        })
    }
}
