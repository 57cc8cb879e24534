//! Keyboard and pointer state, sampled once per simulation step.
//!
//! Window events feed `key_down`/`key_up`/`mouse_down`/`mouse_up` as they
//! arrive. The simulation never reads raw keys: it asks for a [`FrameInput`]
//! snapshot, which folds the bindings (A or Left, D or Right, ...) into the
//! handful of intents the player controller understands.
//!
//! Edge-triggered presses survive until `end_frame()`, which the main loop
//! calls only after at least one fixed step has consumed them. A press on a
//! frame with zero simulation steps is therefore never lost.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Escape,
    Space,
    W,
    A,
    D,
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
}

/// Everything the simulation needs from the input devices for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump key went down this step.
    pub jump_pressed: bool,
    /// Jump key is held; releasing it cuts the ascent short.
    pub jump_held: bool,
    /// Enter key (W / Up) went down this step.
    pub enter_pressed: bool,
    /// Primary button went down this step.
    pub attack_pressed: bool,
    pub cursor_x: f32,
    pub cursor_y: f32,
}

impl FrameInput {
    /// Same held state with every edge cleared, for the second and later
    /// steps of a frame that runs several.
    pub fn without_edges(self) -> Self {
        Self {
            jump_pressed: false,
            enter_pressed: false,
            attack_pressed: false,
            ..self
        }
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,

    /// Cursor in logical window coordinates.
    pub cursor: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    /// Fold the current device state into the per-step intents.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            move_left: self.is_held(Key::A) || self.is_held(Key::Left),
            move_right: self.is_held(Key::D) || self.is_held(Key::Right),
            jump_pressed: self.is_just_pressed(Key::Space),
            jump_held: self.is_held(Key::Space),
            enter_pressed: self.is_just_pressed(Key::W) || self.is_just_pressed(Key::Up),
            attack_pressed: self.is_mouse_just_pressed(MouseBtn::Left),
            cursor_x: self.cursor.0,
            cursor_y: self.cursor.1,
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
    }
}
