//! Per-node shared log.
//!
//! The whiteboard is the only medium agents use to talk to each other. It is
//! an ordered log: the order of `Round` markers is the history of work
//! reallocations at that node.
//!
//! There is no locking here. The harness guarantees that only the agent
//! standing on a node touches its whiteboard, one event at a time.

use crate::{PortId, Record};
use im::Vector;

/// Errors raised when an append would break the record invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WhiteboardError {
    /// An `Active` record already exists for the port.
    #[error("{0} already has an active claim")]
    AlreadyClaimed(PortId),

    /// The port is already confirmed safe; it cannot be claimed again.
    #[error("{0} is already confirmed safe")]
    AlreadySafe(PortId),

    /// A raw `Safe` append over a pending claim; use `mark_safe` instead.
    #[error("{0} has a pending active claim")]
    PendingClaim(PortId),
}

/// Result of [`Whiteboard::mark_safe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeMark {
    /// A new `Safe` record was appended.
    Added,
    /// A pending `Active` record was replaced by `Safe`.
    Promoted,
    /// The port was already safe; nothing changed.
    AlreadySafe,
}

/// Ordered log of [`Record`]s kept on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whiteboard {
    records: Vector<Record>,
    /// Bumped on every mutation.
    version: u64,
}

impl Whiteboard {
    /// Create an empty whiteboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in write order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter()
    }

    /// Cheap structural-sharing copy of the current log.
    pub fn snapshot(&self) -> Vector<Record> {
        self.records.clone()
    }

    /// Records collected into a plain vector.
    pub fn to_vec(&self) -> Vec<Record> {
        self.records.iter().copied().collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the board has never been written (or was emptied).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mutation counter; changes whenever the log changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Append a record to the end of the log.
    ///
    /// Rejects an `Active` claim on a port that is already claimed or safe,
    /// and a `Safe` record on a port with a pending claim.
    pub fn append(&mut self, record: Record) -> Result<(), WhiteboardError> {
        match record {
            Record::Active { port } => {
                if self.is_active(port) {
                    return Err(WhiteboardError::AlreadyClaimed(port));
                }
                if self.is_safe(port) {
                    return Err(WhiteboardError::AlreadySafe(port));
                }
            }
            Record::Safe { port } => {
                if self.is_active(port) {
                    return Err(WhiteboardError::PendingClaim(port));
                }
            }
            Record::Round { .. } => {}
        }
        self.push(record);
        Ok(())
    }

    /// Remove the first record equal to `record`. Returns whether one was found.
    pub fn remove(&mut self, record: &Record) -> bool {
        match self.records.index_of(record) {
            Some(index) => {
                self.records.remove(index);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Confirm `port` as safe.
    ///
    /// A pending `Active` claim on the port is replaced; a port that is
    /// already safe is left untouched so the two never coexist and `Safe`
    /// never repeats.
    pub fn mark_safe(&mut self, port: PortId) -> SafeMark {
        if self.is_safe(port) {
            return SafeMark::AlreadySafe;
        }
        let promoted = self.remove(&Record::Active { port });
        self.push(Record::Safe { port });
        if promoted {
            SafeMark::Promoted
        } else {
            SafeMark::Added
        }
    }

    /// Whether the edge behind `port` is confirmed safe.
    pub fn is_safe(&self, port: PortId) -> bool {
        self.records.contains(&Record::Safe { port })
    }

    /// Whether `port` carries a pending claim.
    pub fn is_active(&self, port: PortId) -> bool {
        self.records.contains(&Record::Active { port })
    }

    /// Ports with a pending claim, in write order.
    pub fn active_ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.records.iter().filter_map(|r| match r {
            Record::Active { port } => Some(*port),
            _ => None,
        })
    }

    /// Remove every `Round` marker and return `(round, share)` pairs in
    /// write order.
    pub fn take_round_markers(&mut self) -> Vec<(u64, u64)> {
        let markers: Vec<(u64, u64)> = self
            .records
            .iter()
            .filter_map(|r| match r {
                Record::Round { round, share } => Some((*round, *share)),
                _ => None,
            })
            .collect();
        if !markers.is_empty() {
            self.records.retain(|r| !matches!(r, Record::Round { .. }));
            self.version += 1;
        }
        markers
    }

    /// First port that is both claimed and safe, if any.
    ///
    /// Always `None` for boards written through this API; used by invariant
    /// checks over whole runs.
    pub fn conflicting_port(&self) -> Option<PortId> {
        self.active_ports().find(|port| self.is_safe(*port))
    }

    fn push(&mut self, record: Record) {
        self.records.push_back(record);
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(p: u32) -> Record {
        Record::Active { port: PortId(p) }
    }

    fn safe(p: u32) -> Record {
        Record::Safe { port: PortId(p) }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut board = Whiteboard::new();
        board.append(active(0)).unwrap();
        board.append(Record::Round { round: 2, share: 1 }).unwrap();
        board.append(safe(4)).unwrap();

        assert_eq!(
            board.to_vec(),
            vec![active(0), Record::Round { round: 2, share: 1 }, safe(4)]
        );
        assert_eq!(board.version(), 3);
    }

    #[test]
    fn test_append_rejects_conflicting_claims() {
        let mut board = Whiteboard::new();
        board.append(active(1)).unwrap();

        assert_eq!(
            board.append(active(1)),
            Err(WhiteboardError::AlreadyClaimed(PortId(1)))
        );
        assert_eq!(
            board.append(safe(1)),
            Err(WhiteboardError::PendingClaim(PortId(1)))
        );

        board.mark_safe(PortId(1));
        assert_eq!(
            board.append(active(1)),
            Err(WhiteboardError::AlreadySafe(PortId(1)))
        );
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut board = Whiteboard::new();
        board.append(Record::Round { round: 2, share: 1 }).unwrap();
        board.append(Record::Round { round: 2, share: 1 }).unwrap();

        assert!(board.remove(&Record::Round { round: 2, share: 1 }));
        assert_eq!(board.len(), 1);
        assert!(!board.remove(&safe(9)));
    }

    #[test]
    fn test_mark_safe_promotes_active() {
        let mut board = Whiteboard::new();
        board.append(safe(3)).unwrap();
        board.append(active(2)).unwrap();

        assert_eq!(board.mark_safe(PortId(2)), SafeMark::Promoted);
        assert!(!board.is_active(PortId(2)));
        assert_eq!(board.to_vec(), vec![safe(3), safe(2)]);

        let version = board.version();
        assert_eq!(board.mark_safe(PortId(2)), SafeMark::AlreadySafe);
        assert_eq!(board.version(), version);

        assert_eq!(board.mark_safe(PortId(7)), SafeMark::Added);
        assert_eq!(board.conflicting_port(), None);
    }

    #[test]
    fn test_is_safe_is_idempotent() {
        let mut board = Whiteboard::new();
        board.mark_safe(PortId(0));
        let version = board.version();

        for _ in 0..5 {
            assert!(board.is_safe(PortId(0)));
            assert!(!board.is_safe(PortId(1)));
        }
        assert_eq!(board.version(), version);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_take_round_markers() {
        let mut board = Whiteboard::new();
        board.append(safe(0)).unwrap();
        board.append(Record::Round { round: 2, share: 3 }).unwrap();
        board.append(active(1)).unwrap();
        board.append(Record::Round { round: 3, share: 1 }).unwrap();

        assert_eq!(board.take_round_markers(), vec![(2, 3), (3, 1)]);
        assert_eq!(board.to_vec(), vec![safe(0), active(1)]);

        let version = board.version();
        assert!(board.take_round_markers().is_empty());
        assert_eq!(board.version(), version);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut board = Whiteboard::new();
        board.append(active(0)).unwrap();
        let snapshot = board.snapshot();
        board.mark_safe(PortId(0));

        assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![active(0)]);
        assert_eq!(board.to_vec(), vec![safe(0)]);
    }
}
