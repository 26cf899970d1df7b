use std::cell::{Cell, RefCell};
use std::rc::Rc;

use botlog_handler::{
    make_handler, AppState, Collaborators, Connectivity, Edge, LogHandler, LogUi, SharedQueue,
    ToastLevel,
};
use botlog_protocol::{generate_uuid, init_log, Log, ResourceKind, TaggedResource};
use botlog_queue::BatchQueue;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Records every UI side effect
#[derive(Default)]
pub struct RecordingUi {
    toasts: RefCell<Vec<(String, ToastLevel)>>,
    speech: RefCell<Vec<(String, String)>>,
}

impl RecordingUi {
    pub fn toasts(&self) -> Vec<(String, ToastLevel)> {
        self.toasts.borrow().clone()
    }

    pub fn speech(&self) -> Vec<(String, String)> {
        self.speech.borrow().clone()
    }
}

impl LogUi for RecordingUi {
    fn toast(&self, log: &Log, level: ToastLevel) {
        self.toasts.borrow_mut().push((log.message.clone(), level));
    }

    fn speak(&self, text: &str, lang: &str) {
        self.speech
            .borrow_mut()
            .push((text.to_owned(), lang.to_owned()));
    }
}

/// Records every connectivity notification, without throttling
#[derive(Default)]
pub struct RecordingConnectivity {
    downs: RefCell<Vec<(Edge, Option<DateTime<Utc>>, String)>>,
}

impl RecordingConnectivity {
    pub fn downs(&self) -> Vec<(Edge, Option<DateTime<Utc>>, String)> {
        self.downs.borrow().clone()
    }
}

impl Connectivity for RecordingConnectivity {
    fn network_down(&self, edge: Edge, at: Option<DateTime<Utc>>, why: &str) {
        self.downs.borrow_mut().push((edge, at, why.to_owned()));
    }
}

/// A handler wired to recording collaborators
pub struct HandlerHarness {
    pub ui: Rc<RecordingUi>,
    pub connectivity: Rc<RecordingConnectivity>,
    pub queue: SharedQueue,
    pub state: Rc<RefCell<AppState>>,
    pub state_reads: Rc<Cell<usize>>,
    pub handler: LogHandler,
}

impl HandlerHarness {
    /// A harness using the default normalizer
    pub fn new() -> HandlerHarness {
        Self::with_normalizer(Box::new(init_log))
    }

    /// A harness whose normalizer tags every log with the specified kind
    pub fn retagging(kind: ResourceKind) -> HandlerHarness {
        Self::with_normalizer(Box::new(move |log: &Log| retag(init_log(log), kind.clone())))
    }

    fn with_normalizer(normalizer: Box<dyn botlog_handler::Normalizer>) -> HandlerHarness {
        let ui = Rc::new(RecordingUi::default());
        let connectivity = Rc::new(RecordingConnectivity::default());
        let queue: SharedQueue = Rc::new(RefCell::new(BatchQueue::new(100)));
        let state = Rc::new(RefCell::new(AppState::default()));
        let state_reads = Rc::new(Cell::new(0));

        let state_for_handler = state.clone();
        let reads_for_handler = state_reads.clone();
        let handler = make_handler(
            Collaborators {
                ui: ui.clone(),
                connectivity: connectivity.clone(),
                normalizer,
                sink: Box::new(queue.clone()),
            },
            Rc::new(move || {
                reads_for_handler.set(reads_for_handler.get() + 1);
                state_for_handler.borrow().clone()
            }),
        );

        HandlerHarness {
            ui,
            connectivity,
            queue,
            state,
            state_reads,
            handler,
        }
    }

    /// Drains the batch queue
    pub fn flushed(&self) -> Vec<TaggedResource> {
        self.queue.borrow_mut().flush()
    }
}

impl Default for HandlerHarness {
    fn default() -> Self {
        HandlerHarness::new()
    }
}

fn retag(mut resource: TaggedResource, kind: ResourceKind) -> TaggedResource {
    resource.uuid = generate_uuid(&kind, resource.body.id);
    resource.kind = kind;
    resource
}

/// A log payload with the specified type, message and channels
pub fn log_payload(log_type: &str, message: &str, channels: &[&str]) -> Value {
    json!({
        "type": log_type,
        "message": message,
        "channels": channels,
    })
}
