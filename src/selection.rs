use hashbrown::HashSet;

/// Indices of the images ticked in the grid.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    indices: HashSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_all(&mut self, n: usize) {
        self.indices = (0..n).collect();
    }

    pub fn deselect_all(&mut self) {
        self.indices.clear();
    }

    pub fn invert(&mut self, n: usize) {
        self.indices = (0..n).filter(|idx| !self.indices.contains(idx)).collect();
    }

    /// Flips membership of `idx` and returns the new state.
    pub fn toggle(&mut self, idx: usize) -> bool {
        if self.indices.remove(&idx) {
            false
        } else {
            self.indices.insert(idx);
            true
        }
    }

    pub fn set(&mut self, idx: usize, selected: bool) {
        if selected {
            self.indices.insert(idx);
        } else {
            self.indices.remove(&idx);
        }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.indices.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.indices.iter().copied().collect();
        indices.sort_unstable();
        indices
    }
}
