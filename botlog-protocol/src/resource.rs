use crate::messages::logs::Log;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The kind of a tagged resource
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResourceKind {
    /// A device log
    Log,

    /// Any other resource kind
    Other(String),
}

impl ResourceKind {
    /// The kind's name, as used in resource UUIDs
    pub fn name(&self) -> &str {
        match self {
            ResourceKind::Log => "Log",
            ResourceKind::Other(name) => name,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Local persistence status of a tagged resource
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpecialStatus {
    /// In sync with the server
    Saved,

    /// Created or modified locally, not yet saved
    Dirty,
}

/// A resource ready for persistence, tagged with its kind and a local UUID
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaggedResource {
    /// The resource kind
    pub kind: ResourceKind,

    /// Local identifier: "<kind>.<id or 0>.<random uuid>"
    pub uuid: String,

    /// Persistence status
    #[serde(rename = "specialStatus")]
    pub special_status: SpecialStatus,

    /// The resource itself
    pub body: Log,
}

impl TaggedResource {
    /// TRUE if the resource is a log
    pub fn is_log(&self) -> bool {
        self.kind == ResourceKind::Log
    }
}

/// Builds the local UUID of a resource
pub fn generate_uuid(kind: &ResourceKind, id: Option<i64>) -> String {
    format!("{}.{}.{}", kind, id.unwrap_or(0), Uuid::new_v4())
}

/// Normalizes a log into a tagged resource.
/// Logs arriving from the device are already persisted by it, so they are tagged as saved
pub fn init_log(log: &Log) -> TaggedResource {
    let mut body = log.clone();
    if body.created_at.is_none() {
        body.created_at = Some(Utc::now().timestamp());
    }

    TaggedResource {
        uuid: generate_uuid(&ResourceKind::Log, body.id),
        kind: ResourceKind::Log,
        special_status: SpecialStatus::Saved,
        body,
    }
}
