use std::path::Path;
use std::time::Duration;

use volt_core::input::FrameInput;

use crate::config::GameConfig;
use crate::error::LevelError;
use crate::level::{Level, LevelEvent, LevelStatus};
use crate::registry::LevelRegistry;
use crate::tiles::load_level_from_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFlow {
    Continue,
    Quit,
}

/// Owns the registry and exactly one live level.
#[derive(Debug)]
pub struct Game {
    registry: LevelRegistry,
    config: GameConfig,
    current: usize,
    level: Level,
    quit: bool,
}

impl Game {
    pub fn new(registry: LevelRegistry, config: GameConfig) -> Result<Self, LevelError> {
        let level = instantiate(&registry, 0, &config)?;
        Ok(Self {
            registry,
            config,
            current: 0,
            level,
            quit: false,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    #[allow(dead_code)]
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.quit
    }

    /// File the current level was loaded from, if any.
    pub fn current_source(&self) -> Option<&Path> {
        self.registry
            .get(self.current)
            .and_then(|definition| definition.source.as_deref())
    }

    /// One fixed step: input edges, then simulation, then any transition.
    pub fn step(&mut self, input: &FrameInput, now: Duration) -> GameFlow {
        if self.quit {
            return GameFlow::Quit;
        }
        if let Some(LevelEvent::Completed) = self.level.handle_input(input, now) {
            self.complete_level();
            return self.flow();
        }
        if self.level.update(now) == LevelStatus::FellOut {
            self.restart();
        }
        self.flow()
    }

    /// Rebuild the current level from its definition.
    pub fn restart(&mut self) {
        match instantiate(&self.registry, self.current, &self.config) {
            Ok(level) => {
                log::info!("Restarting level '{}'", level.id);
                self.level = level;
            }
            Err(err) => log::error!("Failed to restart level: {err}"),
        }
    }

    /// Re-read the current level's file. On failure the live level is kept.
    pub fn reload_current(&mut self) -> Result<(), LevelError> {
        let Some(path) = self.current_source().map(Path::to_path_buf) else {
            log::warn!("Level '{}' has no source file to reload", self.level.id);
            return Ok(());
        };
        let definition = load_level_from_path(&path)?;
        let index = self.registry.replace(definition)?;
        self.current = index;
        self.restart();
        log::info!("Reloaded level from {}", path.display());
        Ok(())
    }

    fn complete_level(&mut self) {
        let quit_on_exit = self
            .registry
            .get(self.current)
            .is_some_and(|definition| definition.quit_on_exit);
        if quit_on_exit {
            log::info!("Final level '{}' finished, quitting", self.level.id);
            self.quit = true;
            return;
        }
        self.current = self.registry.next_index(self.current);
        self.restart();
    }

    fn flow(&self) -> GameFlow {
        if self.quit {
            GameFlow::Quit
        } else {
            GameFlow::Continue
        }
    }
}

fn instantiate(
    registry: &LevelRegistry,
    index: usize,
    config: &GameConfig,
) -> Result<Level, LevelError> {
    let definition = registry.get(index).ok_or(LevelError::NoLevels)?;
    Ok(Level::new(definition, config))
}
