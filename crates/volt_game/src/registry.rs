use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::LevelError;
use crate::tiles::{load_level_from_path, LevelDefinition};

/// Ordered, validated set of levels. Built once at startup and handed to the
/// game controller.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<LevelDefinition>,
    index_by_id: HashMap<String, usize>,
}

impl LevelRegistry {
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }

        let mut index_by_id = HashMap::with_capacity(levels.len());
        for (index, level) in levels.iter().enumerate() {
            if index_by_id.insert(level.id.clone(), index).is_some() {
                return Err(LevelError::DuplicateLevel(level.id.clone()));
            }
        }
        for level in &levels {
            if let Some(next) = &level.next {
                if !index_by_id.contains_key(next) {
                    return Err(LevelError::UnknownNext {
                        level: level.id.clone(),
                        next: next.clone(),
                    });
                }
            }
        }

        Ok(Self {
            levels,
            index_by_id,
        })
    }

    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self, LevelError> {
        let levels = paths
            .iter()
            .map(|path| load_level_from_path(path))
            .collect::<Result<Vec<_>, _>>()?;
        let registry = Self::new(levels)?;
        log::info!("Loaded {} levels", registry.len());
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// The level that follows `index`: its explicit `next` if set, otherwise
    /// the following entry, wrapping to the first.
    pub fn next_index(&self, index: usize) -> usize {
        self.levels
            .get(index)
            .and_then(|level| level.next.as_deref())
            .and_then(|next| self.index_of(next))
            .unwrap_or((index + 1) % self.levels.len())
    }

    /// Swap in a freshly loaded definition for an existing id.
    pub fn replace(&mut self, definition: LevelDefinition) -> Result<usize, LevelError> {
        let index = self
            .index_of(&definition.id)
            .ok_or_else(|| LevelError::UnknownLevel(definition.id.clone()))?;
        if let Some(next) = &definition.next {
            if !self.index_by_id.contains_key(next) {
                return Err(LevelError::UnknownNext {
                    level: definition.id.clone(),
                    next: next.clone(),
                });
            }
        }
        self.levels[index] = definition;
        Ok(index)
    }
}
