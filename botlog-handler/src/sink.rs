use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use botlog_protocol::{Log, TaggedResource};
use botlog_queue::BatchQueue;

/// Turns a log into a payload ready for persistence
pub trait Normalizer {
    fn normalize(&self, log: &Log) -> TaggedResource;
}

impl<F> Normalizer for F
where
    F: Fn(&Log) -> TaggedResource,
{
    fn normalize(&self, log: &Log) -> TaggedResource {
        self(log)
    }
}

/// Accepts normalized payloads for deferred persistence
pub trait PayloadSink {
    fn push(&self, payload: TaggedResource);
}

/// A batch queue shared by the handler and the flushing loop on the same thread
pub type SharedQueue = Rc<RefCell<BatchQueue<TaggedResource>>>;

impl PayloadSink for Rc<RefCell<BatchQueue<TaggedResource>>> {
    fn push(&self, payload: TaggedResource) {
        if let Some(evicted) = self.borrow_mut().push(payload) {
            warn!("Batch queue full, dropped {}", evicted.uuid);
        }
    }
}

impl PayloadSink for Arc<Mutex<BatchQueue<TaggedResource>>> {
    fn push(&self, payload: TaggedResource) {
        let mut queue = self.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(evicted) = queue.push(payload) {
            warn!("Batch queue full, dropped {}", evicted.uuid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botlog_protocol::init_log;
    use serde_json::json;
    use std::thread;

    fn resource(message: &str) -> TaggedResource {
        init_log(&Log::from_value(&json!({ "message": message })).unwrap())
    }

    #[test]
    fn test_shared_queue_push() {
        let queue: SharedQueue = Rc::new(RefCell::new(BatchQueue::new(2)));
        let sink: Box<dyn PayloadSink> = Box::new(queue.clone());
        sink.push(resource("a"));
        sink.push(resource("b"));
        sink.push(resource("c"));

        let flushed: Vec<String> = queue
            .borrow_mut()
            .flush()
            .into_iter()
            .map(|r| r.body.message)
            .collect();
        assert_eq!(flushed, vec!["b", "c"]);
    }

    #[test]
    fn test_mutex_queue_push_from_another_thread() {
        let queue = Arc::new(Mutex::new(BatchQueue::new(10)));
        let sink = queue.clone();
        thread::spawn(move || sink.push(resource("remote")))
            .join()
            .unwrap();
        assert_eq!(queue.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_fn_normalizer() {
        let log = Log::from_value(&json!({ "message": "x" })).unwrap();
        let normalizer: Box<dyn Normalizer> = Box::new(init_log);
        assert!(normalizer.normalize(&log).is_log());
    }
}
