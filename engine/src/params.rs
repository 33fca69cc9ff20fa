//! Argument bag passed to every helper activation.
//!
//! The bag is built once by the caller and never mutated by the engine.
//! Each helper declares which fields it reads; any other field must be left
//! empty, otherwise the activation is rejected.

use serde::{Deserialize, Serialize};

use crate::types::Color;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectParams {
    pub island: Option<usize>,
    pub color: Option<Color>,
    /// Indices into the helper's own student pool.
    pub card_students: Vec<usize>,
    /// Indices into the acting player's entrance.
    pub entrance_students: Vec<usize>,
    /// Hall rows to take students from.
    pub hall_colors: Vec<Color>,
}

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn island(mut self, index: usize) -> Self {
        self.island = Some(index);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn card_students(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.card_students = indices.into();
        self
    }

    pub fn entrance_students(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.entrance_students = indices.into();
        self
    }

    pub fn hall_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        self.hall_colors = colors.into();
        self
    }

    /// Total number of scalar values supplied.
    pub fn arg_count(&self) -> usize {
        usize::from(self.island.is_some())
            + usize::from(self.color.is_some())
            + self.card_students.len()
            + self.entrance_students.len()
            + self.hall_colors.len()
    }
}

/// True when `indices` holds no repeated value.
pub(crate) fn all_distinct(indices: &[usize]) -> bool {
    indices
        .iter()
        .enumerate()
        .all(|(i, a)| indices[i + 1..].iter().all(|b| a != b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_count() {
        assert_eq!(EffectParams::new().arg_count(), 0);
        let p = EffectParams::new()
            .island(2)
            .color(Color::Red)
            .entrance_students([0, 1])
            .hall_colors([Color::Blue]);
        assert_eq!(p.arg_count(), 5);
    }

    #[test]
    fn test_all_distinct() {
        assert!(all_distinct(&[]));
        assert!(all_distinct(&[0, 2, 1]));
        assert!(!all_distinct(&[1, 0, 1]));
    }
}
