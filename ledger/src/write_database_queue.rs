use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex},
};

/// Distinct areas write locking is done, order is irrelevant
#[derive(FromPrimitive, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Writer {
    ConfirmationHeight,
    Testing, // Used in tests to emulate a write lock
}

pub struct WriteGuard {
    guard_finish_callback: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl WriteGuard {
    pub fn new(guard_finish_callback: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            guard_finish_callback: Some(guard_finish_callback),
        }
    }

    pub fn release(&mut self) {
        if let Some(callback) = self.guard_finish_callback.take() {
            callback();
        }
    }

    pub fn null() -> Self {
        Self {
            guard_finish_callback: None,
        }
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct WriteDatabaseQueue {
    data: Arc<WriteDatabaseQueueData>,
    guard_finish_callback: Arc<dyn Fn() + Send + Sync>,
}

struct WriteDatabaseQueueData {
    queue: Mutex<VecDeque<Writer>>,
    condition: Condvar,
}

impl WriteDatabaseQueue {
    pub fn new() -> Self {
        let data = Arc::new(WriteDatabaseQueueData {
            queue: Mutex::new(VecDeque::new()),
            condition: Condvar::new(),
        });

        let data_clone = data.clone();

        Self {
            data,
            guard_finish_callback: Arc::new(move || {
                data_clone.queue.lock().unwrap().pop_front();
                data_clone.condition.notify_all();
            }),
        }
    }

    /// Blocks until we are at the head of the queue
    pub fn wait(&self, writer: Writer) -> WriteGuard {
        let mut lk = self.data.queue.lock().unwrap();
        // Add writer to the end of the queue if it's not already waiting
        if !lk.contains(&writer) {
            lk.push_back(writer);
        }

        while let Some(&w) = lk.front() {
            if w != writer {
                lk = self.data.condition.wait(lk).unwrap();
            } else {
                break;
            }
        }

        WriteGuard::new(Arc::clone(&self.guard_finish_callback))
    }

    /// Returns true if this writer is anywhere in the queue. Currently only used in tests
    pub fn contains(&self, writer: Writer) -> bool {
        self.data.queue.lock().unwrap().contains(&writer)
    }
}

impl Default for WriteDatabaseQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn guard_release_unblocks_next_writer() {
        let queue = Arc::new(WriteDatabaseQueue::new());
        let guard = queue.wait(Writer::Testing);
        assert!(queue.contains(Writer::Testing));

        let queue2 = Arc::clone(&queue);
        let handle = std::thread::spawn(move || {
            let _guard = queue2.wait(Writer::ConfirmationHeight);
        });

        // The second writer queues up behind the first one
        std::thread::sleep(Duration::from_millis(10));
        assert!(queue.contains(Writer::ConfirmationHeight));
        assert!(!handle.is_finished());

        drop(guard);
        handle.join().unwrap();
        assert!(!queue.contains(Writer::Testing));
    }
}
