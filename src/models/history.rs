// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Redo history for undone shapes.
//!
//! Undo always removes the last shape from the list; the removed shape is
//! kept here so it can be re-appended until a new edit invalidates it.

use super::shape::Shape;

/// Bounded stack of undone shapes.
#[derive(Debug, Clone)]
pub struct RedoHistory {
    /// Undone shapes, most recent last
    redo_stack: Vec<Shape>,
    /// Maximum history size
    max_size: usize,
}

impl RedoHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Remember a shape removed by undo.
    pub fn push(&mut self, shape: Shape) {
        if self.max_size == 0 {
            return;
        }
        self.redo_stack.push(shape);
        if self.redo_stack.len() > self.max_size {
            self.redo_stack.remove(0);
        }
    }

    /// Take the most recently undone shape.
    pub fn pop(&mut self) -> Option<Shape> {
        self.redo_stack.pop()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all undone shapes (after a new edit).
    pub fn clear(&mut self) {
        self.redo_stack.clear();
    }
}
