//! Sampled input state
//!
//! Hosts push key and pointer transitions as they arrive; the game reads
//! the current state once per frame.

use std::collections::HashMap;

/// Pointer position in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub clicked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<String, bool>,
    pub pointer: Pointer,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase(), true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase(), false);
    }

    /// Whether `key` (lowercased name) is currently held
    pub fn is_held(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.x = x;
        self.pointer.y = y;
    }

    pub fn clicked_at(&mut self, x: f64, y: f64) {
        self.pointer_moved(x, y);
        self.pointer.clicked = true;
    }

    /// The click flag covers the frame it arrived in
    pub fn end_frame(&mut self) {
        self.pointer.clicked = false;
    }

    /// Drop all held keys, e.g. when the host loses focus
    pub fn release_all(&mut self) {
        self.keys.clear();
    }
}
