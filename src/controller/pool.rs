//! Bounded pool of reusable cells

use std::sync::{Arc, Weak};

use crate::model::{Cell, CellDelegate, CellId, FeedContext};

pub struct CellPool {
    cells: Vec<Cell>,
    /// Feed index each cell is bound to
    assignments: Vec<Option<usize>>,
}

impl CellPool {
    pub fn new(size: usize, context: &FeedContext, delegate: &Arc<dyn CellDelegate>) -> Self {
        let weak: Weak<dyn CellDelegate> = Arc::downgrade(delegate);
        let cells = (0..size)
            .map(|i| Cell::new(CellId(i), context.clone(), weak.clone()))
            .collect();
        Self {
            cells,
            assignments: vec![None; size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.0)
    }

    /// First cell not bound to any clip
    pub fn free_cell(&self) -> Option<CellId> {
        self.assignments
            .iter()
            .position(Option::is_none)
            .map(CellId)
    }

    pub fn cell_for(&self, clip_index: usize) -> Option<CellId> {
        self.assignments
            .iter()
            .position(|assigned| *assigned == Some(clip_index))
            .map(CellId)
    }

    pub fn assign(&mut self, id: CellId, clip_index: Option<usize>) {
        if let Some(slot) = self.assignments.get_mut(id.0) {
            *slot = clip_index;
        }
    }

    /// Cells currently bound, with their feed index
    pub fn bound(&self) -> Vec<(CellId, usize)> {
        self.assignments
            .iter()
            .enumerate()
            .filter_map(|(i, assigned)| assigned.map(|index| (CellId(i), index)))
            .collect()
    }
}
