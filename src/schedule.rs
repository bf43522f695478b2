use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Deferred work that the simulation applies at the start of a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// Take back the speed a dash added. Stores the delta, not the old speed,
    /// so upgrades bought mid-dash are kept.
    EndDash { delta: f64 },
    ShowUpgrades { level: u32 },
}

#[derive(Debug)]
struct Entry {
    due_ms: f64,
    seq: u64,
    effect: Pending,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we want the earliest entry on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of pending effects keyed by due time, FIFO among equal times.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn schedule(&mut self, due_ms: f64, effect: Pending) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due_ms, seq, effect });
    }

    /// Remove and return every effect due at or before `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<Pending> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|e| e.due_ms <= now_ms) {
            if let Some(entry) = self.heap.pop() {
                due.push(entry.effect);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_due_order() {
        let mut s = Scheduler::default();
        s.schedule(300.0, Pending::ShowUpgrades { level: 10 });
        s.schedule(100.0, Pending::EndDash { delta: 8.0 });
        s.schedule(200.0, Pending::ShowUpgrades { level: 5 });

        assert_eq!(
            s.drain_due(250.0),
            vec![Pending::EndDash { delta: 8.0 }, Pending::ShowUpgrades { level: 5 }]
        );
        assert_eq!(s.drain_due(300.0), vec![Pending::ShowUpgrades { level: 10 }]);
    }

    #[test]
    fn equal_due_times_keep_insertion_order() {
        let mut s = Scheduler::default();
        s.schedule(50.0, Pending::ShowUpgrades { level: 5 });
        s.schedule(50.0, Pending::EndDash { delta: 1.0 });
        assert_eq!(
            s.drain_due(50.0),
            vec![Pending::ShowUpgrades { level: 5 }, Pending::EndDash { delta: 1.0 }]
        );
    }

    #[test]
    fn nothing_due_leaves_queue_untouched() {
        let mut s = Scheduler::default();
        s.schedule(1000.0, Pending::EndDash { delta: 2.0 });
        assert!(s.drain_due(999.0).is_empty());
        assert_eq!(s.drain_due(1000.0), vec![Pending::EndDash { delta: 2.0 }]);
    }
}
