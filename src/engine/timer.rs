//! Timer collaborator and a deterministic scheduler.
//!
//! Timers do not hold callbacks. Each one carries a tag that is handed back
//! to the driver when it fires, and the driver routes it to its owner.

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer firing returned by [`TimerQueue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<Tag> {
    pub handle: TimerHandle,
    pub tag: Tag,
}

/// Scheduling operations used by the game session.
pub trait Timer<Tag> {
    /// Fire `tag` every `interval_ms`, `times` times in total.
    fn schedule_repeating(&mut self, interval_ms: u64, times: u32, tag: Tag) -> TimerHandle;

    /// Fire `tag` once after `delay_ms`.
    fn schedule_once(&mut self, delay_ms: u64, tag: Tag) -> TimerHandle;

    /// Cancel a timer. A cancelled timer never fires again. Returns false if
    /// the handle was unknown or already finished.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone)]
struct Entry<Tag> {
    handle: TimerHandle,
    due_ms: u64,
    interval_ms: u64,
    remaining: u32,
    tag: Tag,
}

/// Millisecond scheduler advanced explicitly by the game loop.
#[derive(Debug, Clone)]
pub struct TimerQueue<Tag> {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry<Tag>>,
}

impl<Tag: Copy> Default for TimerQueue<Tag> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tag: Copy> TimerQueue<Tag> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still scheduled.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Move the clock forward and return every firing that became due, in
    /// chronological order (ties in scheduling order).
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Fired<Tag>> {
        self.now_ms += elapsed_ms;
        let mut fired = Vec::new();

        loop {
            let next = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due_ms <= self.now_ms)
                .min_by_key(|(_, e)| (e.due_ms, e.handle.0))
                .map(|(i, _)| i);

            let Some(index) = next else {
                break;
            };

            let entry = &mut self.entries[index];
            fired.push(Fired {
                handle: entry.handle,
                tag: entry.tag,
            });
            entry.remaining -= 1;
            if entry.remaining == 0 {
                self.entries.remove(index);
            } else {
                entry.due_ms += entry.interval_ms;
            }
        }

        fired
    }

    /// Drop every scheduled timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, delay_ms: u64, interval_ms: u64, times: u32, tag: Tag) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        if times > 0 {
            self.entries.push(Entry {
                handle,
                due_ms: self.now_ms + delay_ms,
                interval_ms: interval_ms.max(1),
                remaining: times,
                tag,
            });
        }
        handle
    }
}

impl<Tag: Copy> Timer<Tag> for TimerQueue<Tag> {
    fn schedule_repeating(&mut self, interval_ms: u64, times: u32, tag: Tag) -> TimerHandle {
        self.push(interval_ms, interval_ms, times, tag)
    }

    fn schedule_once(&mut self, delay_ms: u64, tag: Tag) -> TimerHandle {
        self.push(delay_ms, delay_ms, 1, tag)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }
}
