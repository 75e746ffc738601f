use crate::surface::Snapshot;

/// Linear undo/redo history over surface snapshots.
///
/// Holds every committed state of the canvas plus an index into them. The
/// history never restores anything itself: `undo` and `redo` hand back the
/// snapshot the caller should load into its surface.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
    /// Oldest entries are dropped once this many snapshots are held
    max_depth: Option<usize>,
}

impl History {
    /// Creates a history whose first entry is `initial`
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            max_depth: None,
        }
    }

    /// Like [`History::new`], keeping at most `max_depth` snapshots (at least one)
    pub fn with_max_depth(initial: Snapshot, max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth.max(1)),
            ..Self::new(initial)
        }
    }

    /// Append a snapshot after the current one.
    ///
    /// Anything that could have been redone is discarded first.
    pub fn record(&mut self, snapshot: Snapshot) {
        if self.index + 1 < self.snapshots.len() {
            log::debug!(
                "Discarding {} redo entries",
                self.snapshots.len() - self.index - 1
            );
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;

        if let Some(max_depth) = self.max_depth {
            if self.snapshots.len() > max_depth {
                let excess = self.snapshots.len() - max_depth;
                self.snapshots.drain(..excess);
                self.index -= excess;
            }
        }
    }

    /// Step back one entry, returning the snapshot to restore
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward one entry, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history starts with its initial snapshot
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Move the index without touching the entries. Used to roll back an
    /// undo/redo whose snapshot failed to restore.
    pub(crate) fn set_index(&mut self, index: usize) {
        if index < self.snapshots.len() {
            self.index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use image::Rgba;

    /// Distinct snapshots: a 4x1 surface with pixel `n % 4` darkened
    fn snapshot(n: u8) -> Snapshot {
        let mut surface = RasterSurface::new(4, 1);
        surface.write_pixel(i64::from(n % 4), 0, Rgba([n, n, n, 255]));
        surface.export_snapshot().unwrap()
    }

    #[test]
    fn test_new_history_has_one_entry() {
        let history = History::new(snapshot(0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), &snapshot(0));
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut history = History::new(snapshot(0));
        assert!(history.undo().is_none());
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_redo_at_tail_is_noop() {
        let mut history = History::new(snapshot(0));
        history.record(snapshot(1));
        assert!(history.redo().is_none());
        assert_eq!(history.index(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(snapshot(0));
        history.record(snapshot(1));
        history.record(snapshot(2));

        assert_eq!(history.undo(), Some(&snapshot(1)));
        assert_eq!(history.undo(), Some(&snapshot(0)));
        assert_eq!(history.redo(), Some(&snapshot(1)));
        assert_eq!(history.current(), &snapshot(1));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut history = History::new(snapshot(0));
        history.record(snapshot(1));
        history.record(snapshot(2));
        history.undo();
        history.undo();

        history.record(snapshot(3));
        assert_eq!(history.snapshots(), &[snapshot(0), snapshot(3)]);
        assert_eq!(history.index(), 1);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = History::with_max_depth(snapshot(0), 3);
        for n in 1..=4 {
            history.record(snapshot(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.snapshots()[0], snapshot(2));

        history.undo();
        history.undo();
        assert!(history.undo().is_none());
        assert_eq!(history.current(), &snapshot(2));
    }
}
