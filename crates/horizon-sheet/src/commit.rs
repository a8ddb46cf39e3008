//! Commit coordination.
//!
//! When the active cell enters edit mode its current value is snapshotted.
//! When editing ends (back to view mode, or the active point moves away) the
//! snapshot is compared with the cell as it was just before that transition,
//! and a [`CommitRecord`] is produced if they differ. The record lands in the
//! same state transition that closed the edit, so subscribers see the mode
//! change and its commit together.
//!
//! Dependency tracking is left to the host through [`BindingResolver`].

use std::sync::Arc;

use horizon_sheet_core::logging::targets;

use crate::model::{Cell, Matrix, Point};
use crate::state::{CommitRecord, Mode, StoreState};

/// Reports which cells a cell's formula depends on.
pub trait BindingResolver: Send + Sync {
    fn bindings_for_cell(&self, cell: &Cell, data: &Matrix<Cell>) -> Vec<Point>;
}

impl<F> BindingResolver for F
where
    F: Fn(&Cell, &Matrix<Cell>) -> Vec<Point> + Send + Sync,
{
    fn bindings_for_cell(&self, cell: &Cell, data: &Matrix<Cell>) -> Vec<Point> {
        self(cell, data)
    }
}

/// Collects the bindings of every changed cell, without duplicates, in
/// first-seen order. A missing resolver yields no bindings.
pub fn bindings_for_changes(
    resolver: Option<&dyn BindingResolver>,
    changes: &[CommitRecord],
    data: &Matrix<Cell>,
) -> Vec<Point> {
    let Some(resolver) = resolver else {
        return Vec::new();
    };
    let mut bindings: Vec<Point> = Vec::new();
    for change in changes {
        for point in resolver.bindings_for_cell(&change.next_cell, data) {
            if !bindings.contains(&point) {
                bindings.push(point);
            }
        }
    }
    bindings
}

#[derive(Debug, Clone)]
struct Snapshot {
    point: Point,
    cell: Option<Cell>,
}

/// Tracks the edit session of the active cell across transitions.
#[derive(Debug, Default)]
pub struct CommitTracker {
    snapshot: Option<Snapshot>,
}

impl CommitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an edit session is open.
    pub fn is_editing(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Forgets any open edit session.
    pub fn reset(&mut self) {
        self.snapshot = None;
    }

    /// Observes one transition and returns the records it commits.
    pub fn observe(&mut self, prev: &StoreState, next: &StoreState) -> Vec<CommitRecord> {
        let mut changes = Vec::new();

        let closes = prev.mode == Mode::Edit
            && (next.mode == Mode::View || next.active != prev.active);
        if closes {
            if let Some(snapshot) = self.snapshot.take() {
                // The value just before the mode change.
                let current = prev.data.get(snapshot.point);
                match current {
                    Some(current) if snapshot.cell.as_ref() != Some(current) => {
                        tracing::debug!(
                            target: targets::COMMIT,
                            point = %snapshot.point,
                            "edit committed"
                        );
                        changes.push(CommitRecord {
                            prev_cell: snapshot.cell,
                            next_cell: current.clone(),
                        });
                    }
                    _ => {
                        tracing::trace!(target: targets::COMMIT, point = %snapshot.point, "edit closed unchanged");
                    }
                }
            }
        }

        let opens = next.mode == Mode::Edit && (prev.mode != Mode::Edit || closes);
        if opens {
            if let Some(point) = next.active {
                self.snapshot = Some(Snapshot {
                    point,
                    cell: prev.data.get(point).cloned(),
                });
            }
        }

        changes
    }

    /// Folds the records committed by `prev -> next` into `next`.
    ///
    /// Records already carried by the transition (a clear or a paste) are
    /// kept after the edit commit.
    pub fn settle(&mut self, prev: &StoreState, mut next: StoreState) -> StoreState {
        let mut changes = self.observe(prev, &next);
        if changes.is_empty() {
            return next;
        }
        let carried = match (&prev.last_commit, &next.last_commit) {
            (Some(before), Some(after)) if Arc::ptr_eq(before, after) => None,
            (_, Some(after)) => Some(after.clone()),
            _ => None,
        };
        if let Some(carried) = carried {
            changes.extend(carried.iter().cloned());
        }
        next.last_commit = Some(Arc::new(changes));
        next
    }
}
