use crate::{
    algorithm::cache::SupportCache,
    model::{AdjacencyModel, Side},
    spatial::{Coord, Grid},
};
use bitvec::prelude::*;
use std::collections::VecDeque;

/// FIFO worklist of cells whose domains changed
///
/// A cell is held at most once: pushing a cell that is already waiting is a
/// no-op until it has been popped.
#[derive(Debug, Clone)]
pub struct PropagationQueue {
    queue: VecDeque<Coord>,
    queued: BitVec,
    width: usize,
}

impl PropagationQueue {
    /// Create an empty queue for a `width` x `height` grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: bitvec![0; width * height],
            width,
        }
    }

    fn slot(&self, coord: Coord) -> Option<usize> {
        let index = coord.y.checked_mul(self.width)?.checked_add(coord.x)?;
        (coord.x < self.width && index < self.queued.len()).then_some(index)
    }

    /// Enqueue a cell, returning whether it was added
    pub fn push(&mut self, coord: Coord) -> bool {
        let Some(index) = self.slot(coord) else {
            return false;
        };
        if self.queued.get(index).as_deref() == Some(&true) {
            return false;
        }
        self.queued.set(index, true);
        self.queue.push_back(coord);
        true
    }

    /// Remove and return the oldest queued cell
    pub fn pop(&mut self) -> Option<Coord> {
        let coord = self.queue.pop_front()?;
        if let Some(index) = self.slot(coord) {
            self.queued.set(index, false);
        }
        Some(coord)
    }

    /// Drop every pending cell
    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued.fill(false);
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the number of pending cells
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// How a propagation pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// The queue drained without emptying any domain
    FixedPoint,
    /// The given cell lost its last tile; the pass stopped there
    Contradiction(Coord),
}

/// Summary of one propagation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationReport {
    /// How the pass ended
    pub outcome: PropagationOutcome,
    /// Cells whose domains shrank, in row-major order without repeats
    pub changed: Vec<Coord>,
    /// Cells pushed onto the queue by the pass itself
    pub enqueued: usize,
    /// Cells popped and examined
    pub processed: usize,
}

/// Enqueue every cell of the grid for a full consistency pass
pub fn seed_all(grid: &Grid, queue: &mut PropagationQueue) {
    for coord in grid.coords() {
        queue.push(coord);
    }
}

/// Remove now-impossible tiles from neighbours until a fixed point is reached
///
/// For each popped cell and each side, the neighbour's domain is intersected
/// with the union of tiles the cell's remaining tiles permit on that side.
/// Neighbours that shrink are queued in turn. The first emptied domain stops
/// the pass immediately and the queue is cleared; a grid already in
/// contradiction is left untouched.
pub fn propagate(
    grid: &mut Grid,
    model: &AdjacencyModel,
    queue: &mut PropagationQueue,
    cache: &mut SupportCache,
) -> PropagationReport {
    let mut report = PropagationReport {
        outcome: PropagationOutcome::FixedPoint,
        changed: Vec::new(),
        enqueued: 0,
        processed: 0,
    };

    if let Some(cell) = grid.contradiction() {
        queue.clear();
        report.outcome = PropagationOutcome::Contradiction(cell);
        return report;
    }

    while let Some(cell) = queue.pop() {
        report.processed += 1;
        let Some(tiles) = grid.domain(cell).map(|domain| domain.tiles().clone()) else {
            continue;
        };

        for side in Side::ALL {
            let Some(neighbor) = grid.neighbor(cell, side) else {
                continue;
            };
            let allowed = cache.support(model, &tiles, side);
            if !grid.restrict(neighbor, allowed) {
                continue;
            }

            report.changed.push(neighbor);
            if grid.contradiction().is_some() {
                tracing::trace!(%cell, %neighbor, %side, "propagation emptied a domain");
                queue.clear();
                report.outcome = PropagationOutcome::Contradiction(neighbor);
                finish(&mut report);
                return report;
            }
            if queue.push(neighbor) {
                report.enqueued += 1;
            }
        }
    }

    finish(&mut report);
    tracing::trace!(
        processed = report.processed,
        changed = report.changed.len(),
        "propagation reached fixed point"
    );
    report
}

fn finish(report: &mut PropagationReport) {
    report.changed.sort_unstable();
    report.changed.dedup();
}
