//! Palette index ranges

use crate::core::rng::Rng;

/// Non-empty ordered set of palette indices a tool draws from.
///
/// Indices are 0-based entries of the 255-entry palette; the value written
/// to the grid is `index + 1` (0 is reserved for empty).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteRange {
    indices: Vec<u8>,
}

impl Default for PaletteRange {
    fn default() -> Self {
        Self { indices: vec![0] }
    }
}

impl PaletteRange {
    pub fn single(index: u8) -> Self {
        Self {
            indices: vec![index],
        }
    }

    /// Inclusive span of palette indices
    pub fn span(start: u8, end: u8) -> Self {
        Self {
            indices: (start..=end).collect(),
        }
    }

    /// Remove the index if present, add it otherwise. The range always
    /// keeps at least one index.
    pub fn toggle(&mut self, index: u8) {
        if let Some(pos) = self.indices.iter().position(|&i| i == index) {
            if self.indices.len() > 1 {
                self.indices.remove(pos);
            }
            return;
        }
        self.indices.push(index);
    }

    pub fn contains(&self, index: u8) -> bool {
        self.indices.contains(&index)
    }

    pub fn first(&self) -> u8 {
        self.indices[0]
    }

    pub fn random(&self, rng: &mut Rng) -> u8 {
        self.indices[rng.next_u64() as usize % self.indices.len()]
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_index_zero() {
        let range = PaletteRange::default();
        assert_eq!(range.indices(), &[0]);
    }

    #[test]
    fn test_span() {
        let range = PaletteRange::span(3, 6);
        assert_eq!(range.indices(), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_toggle_keeps_one() {
        let mut range = PaletteRange::single(5);
        range.toggle(5);
        assert_eq!(range.indices(), &[5]);

        range.toggle(9);
        assert!(range.contains(9));
        range.toggle(5);
        assert_eq!(range.indices(), &[9]);
    }

    #[test]
    fn test_random_stays_in_range() {
        let range = PaletteRange::span(10, 12);
        let mut rng = Rng::new(3);
        for _ in 0..64 {
            assert!(range.contains(range.random(&mut rng)));
        }
    }
}
