use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::common::config::{FrameId, Timestamp};

/// Advisory hint describing why a frame was touched. The LRU-K replacer accepts and logs
/// this value but never lets it influence eviction order — see the core ordering rule in
/// [`LRUKReplacer::evict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessType {
    #[default]
    Unknown,
    Lookup,
    Scan,
    Index,
}

/// Per-frame bookkeeping: access history and evictability.
///
/// History holds up to `k` timestamps, oldest at the front. Once `k` entries are present,
/// `history.front()` is exactly the frame's K-th most recent access.
#[derive(Debug)]
struct FrameNode {
    history: VecDeque<Timestamp>,
    evictable: bool,
}

impl FrameNode {
    fn new() -> Self {
        Self {
            history: VecDeque::new(),
            evictable: false,
        }
    }
}

/// Ordering key for a single evictable frame.
///
/// `kth_access = None` means the frame has fewer than `k` recorded accesses and therefore
/// has backward k-distance `+inf`; such frames always outrank ones with a finite distance.
/// `first_access` is the frame's oldest recorded timestamp, used only to break ties among
/// `+inf` frames (classic LRU over first-seen order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EvictionKey {
    kth_access: Option<Timestamp>,
    first_access: Timestamp,
}

impl Ord for EvictionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.kth_access, other.kth_access) {
            (None, None) => other.first_access.cmp(&self.first_access),
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => b.cmp(&a),
        }
    }
}

impl PartialOrd for EvictionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A heap slot tagged with the version it was pushed under. `LRUKReplacer` never mutates a
/// heap entry in place (`BinaryHeap` can't support that); instead every update to an
/// evictable frame mints a fresh version and pushes a new entry. Stale entries (version no
/// longer current) are discarded lazily when popped in `evict`. This is the version-tagged
/// realization of the lazy strategy described for this replacer: apply updates cheaply at
/// record time, pay the cleanup cost only at eviction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    frame_id: FrameId,
    key: EvictionKey,
    version: u64,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct EvictableState {
    heap: BinaryHeap<HeapEntry>,
    /// `frame_id -> version`, present iff the frame is currently evictable. This is both the
    /// membership test and the staleness oracle for heap entries.
    current: HashMap<FrameId, u64>,
    /// `frame_id -> last minted version`. Unlike `current`, entries here are never removed:
    /// a frame can cycle through evictable/non-evictable/removed/recreated many times over
    /// its life, and the counter must keep climbing across all of it so two heap entries for
    /// the same frame are never mistaken for each other just because the frame was briefly
    /// dropped from `current` in between.
    next_version: HashMap<FrameId, u64>,
}

impl EvictableState {
    fn push(&mut self, frame_id: FrameId, key: EvictionKey) {
        let counter = self.next_version.entry(frame_id).or_insert(0);
        *counter += 1;
        let version = *counter;
        self.current.insert(frame_id, version);
        self.heap.push(HeapEntry {
            frame_id,
            key,
            version,
        });
    }
}

/// Implements the LRU-K page replacement policy.
///
/// The LRU-K algorithm evicts the frame whose backward k-distance is the largest of all
/// evictable frames. Backward k-distance is the difference between the current logical time
/// and the timestamp of the frame's K-th most recent access; a frame with fewer than K
/// recorded accesses is given `+inf` backward k-distance, and ties among `+inf` frames are
/// broken by classic LRU (oldest first-seen wins).
///
/// `record_access`/`set_evictable`/`remove` touch a per-frame store guarded by one lock;
/// the set of currently-evictable frames (and the heap used to find the eviction victim) is
/// guarded by a second, independent lock. `evict` is the only operation that needs both, and
/// always acquires them store-then-evictable to avoid deadlock.
#[derive(Debug)]
pub struct LRUKReplacer {
    store: Mutex<HashMap<FrameId, FrameNode>>,
    evictable: Mutex<EvictableState>,
    timestamp: AtomicU64,
    k: usize,
    num_frames: usize,
}

impl LRUKReplacer {
    /// Creates a new replacer tracking up to `num_frames` frames, each ranked by its `k`
    /// most recent accesses. `k` must be at least 1.
    pub fn new(num_frames: usize, k: usize) -> Self {
        assert!(k >= 1, "LRUKReplacer: k must be at least 1, got {k}");
        Self {
            store: Mutex::new(HashMap::new()),
            evictable: Mutex::new(EvictableState::default()),
            timestamp: AtomicU64::new(0),
            k,
            num_frames,
        }
    }

    /// Creates a new replacer tracking up to `num_frames` frames, using
    /// [`crate::common::LRUK_REPLACER_K`] as `k` when the caller has no more specific value
    /// in mind — mirrors how BUSTUB callers default to its own `LRUK_REPLACER_K` constant.
    pub fn with_default_k(num_frames: usize) -> Self {
        Self::new(num_frames, crate::common::LRUK_REPLACER_K)
    }

    fn next_timestamp(&self) -> Timestamp {
        self.timestamp.fetch_add(1, AtomicOrdering::SeqCst)
    }

    fn eviction_key(node: &FrameNode, k: usize) -> EvictionKey {
        let first_access = *node
            .history
            .front()
            .expect("a tracked frame always has at least one recorded access");
        let kth_access = if node.history.len() == k {
            Some(first_access)
        } else {
            None
        };
        EvictionKey {
            kth_access,
            first_access,
        }
    }

    /// Records that `frame_id` was accessed at the current logical time. Creates the
    /// frame's history if this is its first ever access (or first access since it was last
    /// removed/evicted). If the frame is currently evictable, its position in the eviction
    /// order is refreshed so a subsequent `evict()` sees up-to-date state.
    ///
    /// Panics if `frame_id` is not a legal frame id (i.e. `frame_id >= num_frames` given to
    /// `new`) — this is a caller bug, not a recoverable condition.
    pub fn record_access(&self, frame_id: FrameId, access_type: AccessType) {
        assert!(
            (frame_id as usize) < self.num_frames,
            "LRUKReplacer::record_access: frame id {frame_id} is out of bounds (num_frames = {})",
            self.num_frames
        );

        let ts = self.next_timestamp();
        trace!(frame_id, ?access_type, timestamp = ts, "record_access");

        let mut store = self.store.lock();
        let node = store.entry(frame_id).or_insert_with(FrameNode::new);
        node.history.push_back(ts);
        if node.history.len() > self.k {
            node.history.pop_front();
        }

        if node.evictable {
            let key = Self::eviction_key(node, self.k);
            self.evictable.lock().push(frame_id, key);
        }
    }

    /// Toggles whether `frame_id` is a candidate for eviction. Silently does nothing if the
    /// frame is untracked, or if its evictability already equals `evictable`.
    pub fn set_evictable(&self, frame_id: FrameId, evictable: bool) {
        let mut store = self.store.lock();
        let node = match store.get_mut(&frame_id) {
            Some(node) => node,
            None => {
                warn!(frame_id, "set_evictable on untracked frame, ignoring");
                return;
            }
        };
        if node.evictable == evictable {
            return;
        }
        node.evictable = evictable;
        let key = Self::eviction_key(node, self.k);

        let mut ev = self.evictable.lock();
        if evictable {
            ev.push(frame_id, key);
        } else {
            ev.current.remove(&frame_id);
        }
        debug!(frame_id, evictable, "set_evictable");
    }

    /// Removes a tracked frame and discards its access history, regardless of its backward
    /// k-distance. Does nothing if the frame is untracked.
    ///
    /// Panics if the frame is tracked but not currently evictable — removing a pinned frame
    /// is a caller bug.
    pub fn remove(&self, frame_id: FrameId) {
        let mut store = self.store.lock();
        let node = match store.get(&frame_id) {
            Some(node) => node,
            None => return,
        };
        assert!(
            node.evictable,
            "LRUKReplacer::remove: frame {frame_id} is not evictable"
        );
        store.remove(&frame_id);

        let mut ev = self.evictable.lock();
        ev.current.remove(&frame_id);
        debug!(frame_id, "remove");
    }

    /// Picks the evictable frame with the largest backward k-distance, removes it from both
    /// the evictable set and the tracked-frame store, and returns its id. Returns `None` if
    /// no frame is currently evictable.
    pub fn evict(&self) -> Option<FrameId> {
        let mut store = self.store.lock();
        let mut ev = self.evictable.lock();
        loop {
            let entry = ev.heap.pop()?;
            if ev.current.get(&entry.frame_id) == Some(&entry.version) {
                ev.current.remove(&entry.frame_id);
                store.remove(&entry.frame_id);
                debug!(frame_id = entry.frame_id, "evict");
                return Some(entry.frame_id);
            }
            // Stale entry left behind by a since-superseded record_access/set_evictable; the
            // frame's current state (if any) is represented by a later entry still in the
            // heap, or it is no longer evictable at all. Either way, skip and keep looking.
        }
    }

    /// Returns the number of frames currently marked evictable.
    pub fn size(&self) -> usize {
        self.evictable.lock().current.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(replacer: &LRUKReplacer, frame_id: FrameId) {
        replacer.record_access(frame_id, AccessType::Unknown);
    }

    /// Scenario from the CMU 15-445 LRU-K handout: walks through interleaved accesses,
    /// evictability toggles and evictions, checking both the victim chosen and the
    /// resulting size at each step.
    #[test]
    fn test_lru_k_cmu_sample() {
        let replacer = LRUKReplacer::new(7, 2);

        access(&replacer, 1);
        access(&replacer, 2);
        access(&replacer, 3);
        access(&replacer, 4);
        access(&replacer, 5);
        access(&replacer, 6);
        replacer.set_evictable(1, true);
        replacer.set_evictable(2, true);
        replacer.set_evictable(3, true);
        replacer.set_evictable(4, true);
        replacer.set_evictable(5, true);
        replacer.set_evictable(6, false);
        assert_eq!(5, replacer.size());

        access(&replacer, 1);

        assert_eq!(Some(2), replacer.evict());
        assert_eq!(Some(3), replacer.evict());
        assert_eq!(Some(4), replacer.evict());
        assert_eq!(2, replacer.size());

        access(&replacer, 3);
        access(&replacer, 4);
        access(&replacer, 5);
        access(&replacer, 4);
        replacer.set_evictable(3, true);
        replacer.set_evictable(4, true);
        assert_eq!(4, replacer.size());

        assert_eq!(Some(3), replacer.evict());
        assert_eq!(3, replacer.size());

        replacer.set_evictable(6, true);
        assert_eq!(4, replacer.size());
        assert_eq!(Some(6), replacer.evict());
        assert_eq!(3, replacer.size());

        replacer.set_evictable(1, false);
        assert_eq!(2, replacer.size());
        assert_eq!(Some(5), replacer.evict());
        assert_eq!(1, replacer.size());

        access(&replacer, 1);
        access(&replacer, 1);
        replacer.set_evictable(1, true);
        assert_eq!(2, replacer.size());
        assert_eq!(Some(4), replacer.evict());

        assert_eq!(1, replacer.size());
        assert_eq!(Some(1), replacer.evict());
        assert_eq!(0, replacer.size());

        assert_eq!(None, replacer.evict());
        assert_eq!(0, replacer.size());
    }

    #[test]
    fn fewer_than_k_accesses_tiebreak_by_oldest_first_seen() {
        let replacer = LRUKReplacer::new(4, 3);
        access(&replacer, 1);
        access(&replacer, 2);
        access(&replacer, 3);
        replacer.set_evictable(1, true);
        replacer.set_evictable(2, true);
        replacer.set_evictable(3, true);

        // All three frames have fewer than k=3 accesses (+inf distance); the oldest
        // first-seen frame (1) must be evicted first.
        assert_eq!(Some(1), replacer.evict());
        assert_eq!(Some(2), replacer.evict());
        assert_eq!(Some(3), replacer.evict());
    }

    #[test]
    fn non_evictable_frame_is_skipped_until_reenabled() {
        let replacer = LRUKReplacer::new(7, 2);
        for id in 1..=6 {
            access(&replacer, id);
        }
        for id in [1, 2, 4, 5] {
            replacer.set_evictable(id, true);
        }
        // 3 stays pinned.
        access(&replacer, 1);

        assert_eq!(Some(2), replacer.evict());
        assert_eq!(Some(4), replacer.evict());

        replacer.set_evictable(3, true);
        assert_eq!(Some(3), replacer.evict());

        assert_eq!(Some(5), replacer.evict());
        assert_eq!(Some(1), replacer.evict());
        assert_eq!(None, replacer.evict());
    }

    #[test]
    fn with_default_k_uses_the_shared_k_constant() {
        let replacer = LRUKReplacer::with_default_k(4);
        access(&replacer, 1);
        access(&replacer, 1);
        replacer.set_evictable(1, true);
        // LRUK_REPLACER_K is 2, so two accesses give frame 1 a finite backward k-distance.
        assert_eq!(Some(1), replacer.evict());
    }

    #[test]
    fn retoggling_evictability_reverts_cleanly() {
        let replacer = LRUKReplacer::new(2, 2);
        access(&replacer, 1);

        replacer.set_evictable(1, true);
        assert_eq!(1, replacer.size());
        replacer.set_evictable(1, false);
        assert_eq!(0, replacer.size());

        // idempotent toggles are no-ops
        replacer.set_evictable(1, false);
        replacer.set_evictable(1, false);
        assert_eq!(0, replacer.size());

        assert_eq!(None, replacer.evict());

        replacer.set_evictable(1, true);
        replacer.set_evictable(1, true);
        assert_eq!(1, replacer.size());
        assert_eq!(Some(1), replacer.evict());
    }

    #[test]
    #[should_panic(expected = "is not evictable")]
    fn remove_on_pinned_frame_panics() {
        let replacer = LRUKReplacer::new(2, 2);
        access(&replacer, 1);
        replacer.remove(1);
    }

    #[test]
    fn remove_on_untracked_frame_is_a_silent_no_op() {
        let replacer = LRUKReplacer::new(2, 2);
        replacer.remove(1);
        assert_eq!(0, replacer.size());
    }

    #[test]
    fn removal_purges_history_so_a_later_access_starts_fresh() {
        let replacer = LRUKReplacer::new(2, 2);
        access(&replacer, 1);
        access(&replacer, 1);
        replacer.set_evictable(1, true);
        // Frame 1 now has k=2 accesses -> finite backward k-distance.
        replacer.remove(1);

        // A fresh access recreates the node with empty history and evictable=false.
        access(&replacer, 1);
        assert_eq!(0, replacer.size());
        replacer.set_evictable(1, true);
        assert_eq!(1, replacer.size());
        // Only one access so far post-removal: +inf distance, same as a brand new frame.
        assert_eq!(Some(1), replacer.evict());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn record_access_rejects_out_of_range_frame_id() {
        let replacer = LRUKReplacer::new(2, 2);
        access(&replacer, 5);
    }

    #[test]
    fn size_tracks_large_mixed_workloads() {
        let replacer = LRUKReplacer::new(1000, 3);
        for j in 0..4 {
            for i in (j * 250)..1000 {
                access(&replacer, i);
                replacer.set_evictable(i, true);
            }
        }
        assert_eq!(1000, replacer.size());

        for i in 250..500 {
            replacer.set_evictable(i, false);
        }
        assert_eq!(750, replacer.size());

        for i in 0..100 {
            replacer.remove(i);
        }
        assert_eq!(650, replacer.size());

        for i in 100..600 {
            if i < 250 || i >= 500 {
                assert_eq!(Some(i), replacer.evict());
            }
        }
        assert_eq!(400, replacer.size());
    }
}
