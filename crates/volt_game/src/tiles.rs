use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::collision::Rect;
use crate::entities::{Door, EntitySet, Generator, StaticEntity};
use crate::error::LevelError;

/// On-disk level document.
#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub quit_on_exit: bool,
    pub cells: Vec<Vec<RawCell>>,
}

/// A cell exactly as authored: a number or a tagged string.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawCell {
    Code(i64),
    Tag(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileCell {
    Empty,
    Solid,
    Exit,
    Door(u32),
    Generator(u32),
}

impl TileCell {
    pub fn parse(raw: &RawCell, row: usize, col: usize) -> Result<Self, LevelError> {
        match raw {
            RawCell::Code(0) => Ok(TileCell::Empty),
            RawCell::Code(1) => Ok(TileCell::Solid),
            RawCell::Code(-1) => Ok(TileCell::Exit),
            RawCell::Code(other) => Err(LevelError::UnknownTag {
                row,
                col,
                tag: other.to_string(),
            }),
            RawCell::Tag(tag) => {
                let malformed = || LevelError::MalformedTag {
                    row,
                    col,
                    tag: tag.clone(),
                };
                if let Some(id) = tag.strip_prefix('d') {
                    id.parse().map(TileCell::Door).map_err(|_| malformed())
                } else if let Some(id) = tag.strip_prefix('g') {
                    id.parse().map(TileCell::Generator).map_err(|_| malformed())
                } else {
                    Err(LevelError::UnknownTag {
                        row,
                        col,
                        tag: tag.clone(),
                    })
                }
            }
        }
    }
}

/// Rectangular, fully parsed grid. Row 0 is the top of the level.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    cells: Vec<TileCell>,
}

impl TileGrid {
    pub fn from_raw(raw: &[Vec<RawCell>]) -> Result<Self, LevelError> {
        let cols = raw.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(raw.len() * cols);
        for (row, raw_row) in raw.iter().enumerate() {
            if raw_row.len() != cols {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: cols,
                    found: raw_row.len(),
                });
            }
            for (col, raw_cell) in raw_row.iter().enumerate() {
                cells.push(TileCell::parse(raw_cell, row, col)?);
            }
        }
        Ok(Self {
            rows: raw.len(),
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TileCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    pub fn width_px(&self, tile_size: f32) -> f32 {
        self.cols as f32 * tile_size
    }

    /// Grids taller than the viewport are shifted up so their last row sits
    /// on the bottom of the screen.
    pub fn origin_y(&self, tile_size: f32, viewport_rows: usize) -> f32 {
        if self.rows <= viewport_rows {
            0.0
        } else {
            -tile_size * (self.rows - viewport_rows) as f32
        }
    }
}

/// A validated level ready to be instantiated any number of times.
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    pub id: String,
    pub next: Option<String>,
    pub quit_on_exit: bool,
    pub grid: TileGrid,
    pub source: Option<PathBuf>,
}

impl LevelDefinition {
    pub fn from_file(file: LevelFile, source: Option<PathBuf>) -> Result<Self, LevelError> {
        let grid = TileGrid::from_raw(&file.cells)?;
        Ok(Self {
            id: file.level_id,
            next: file.next,
            quit_on_exit: file.quit_on_exit,
            grid,
            source,
        })
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelDefinition, LevelError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: LevelFile = serde_json::from_str(&raw).map_err(|source| LevelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let version = file.version.clone();
    let definition = LevelDefinition::from_file(file, Some(path.to_path_buf()))?;
    log::debug!(
        "Parsed level '{}' v{} ({}x{} tiles) from {}",
        definition.id,
        version,
        definition.grid.cols(),
        definition.grid.rows(),
        path.display()
    );
    Ok(definition)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    pub tile_size: f32,
    pub viewport_rows: usize,
}

/// Place one entity per non-empty cell.
pub fn build_entities(grid: &TileGrid, layout: &TileLayout) -> EntitySet {
    let tile = layout.tile_size;
    let origin_y = grid.origin_y(tile, layout.viewport_rows);
    let mut entities = Vec::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let x = col as f32 * tile;
            let y = origin_y + row as f32 * tile;
            let entity = match grid.get(row, col) {
                Some(TileCell::Solid) => StaticEntity::Wall(Rect::new(x, y, tile, tile)),
                Some(TileCell::Exit) => StaticEntity::Exit(Rect::new(x, y, tile, tile)),
                Some(TileCell::Door(id)) => StaticEntity::Door(Door::new(x, y, tile, id)),
                Some(TileCell::Generator(id)) => {
                    StaticEntity::Generator(Generator::new(x, y, tile, id))
                }
                Some(TileCell::Empty) | None => continue,
            };
            entities.push(entity);
        }
    }
    EntitySet::new(entities)
}
