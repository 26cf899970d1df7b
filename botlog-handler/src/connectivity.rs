use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Minimal delay between two transitions of the same edge
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

/// A network link whose reachability is tracked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Device to broker
    BotMqtt,
    /// Browser to broker
    UserMqtt,
    /// Browser to REST API
    UserApi,
    /// Browser's own MQTT connection status
    BrowserMqtt,
}

impl Edge {
    pub fn name(self) -> &'static str {
        match self {
            Edge::BotMqtt => "bot.mqtt",
            Edge::UserMqtt => "user.mqtt",
            Edge::UserApi => "user.api",
            Edge::BrowserMqtt => "browser.mqtt",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkState {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStatus {
    pub state: NetworkState,
    pub at: DateTime<Utc>,
    pub why: String,
}

/// Receives connectivity transitions.
/// `at` is the time of the transition; None means now.
pub trait Connectivity {
    fn network_down(&self, edge: Edge, at: Option<DateTime<Utc>>, why: &str);
}

/// Keeps the last known state of every edge.
/// Transitions arriving sooner than the throttle delay after the previous one on the same edge are ignored.
#[derive(Debug)]
pub struct ConnectivityTracker {
    throttle: chrono::Duration,
    edges: RefCell<HashMap<Edge, EdgeStatus>>,
}

impl ConnectivityTracker {
    pub fn new(throttle: Duration) -> ConnectivityTracker {
        ConnectivityTracker {
            throttle: chrono::Duration::from_std(throttle)
                .unwrap_or_else(|_| chrono::Duration::zero()),
            edges: RefCell::new(HashMap::new()),
        }
    }

    pub fn status(&self, edge: Edge) -> Option<EdgeStatus> {
        self.edges.borrow().get(&edge).cloned()
    }

    pub fn network_up(&self, edge: Edge, at: Option<DateTime<Utc>>, why: &str) -> bool {
        self.record(edge, NetworkState::Up, at.unwrap_or_else(Utc::now), why)
    }

    /// Records a transition. Returns TRUE if it was applied, FALSE if throttled.
    pub fn record(&self, edge: Edge, state: NetworkState, at: DateTime<Utc>, why: &str) -> bool {
        let mut edges = self.edges.borrow_mut();
        if let Some(previous) = edges.get(&edge) {
            if at.signed_duration_since(previous.at) < self.throttle {
                trace!("Throttled {:?} transition of {}", state, edge);
                return false;
            }
        }

        match state {
            NetworkState::Down => warn!("{} is down: {}", edge, why),
            NetworkState::Up => info!("{} is up: {}", edge, why),
        }

        edges.insert(
            edge,
            EdgeStatus {
                state,
                at,
                why: why.to_owned(),
            },
        );
        true
    }
}

impl Default for ConnectivityTracker {
    fn default() -> Self {
        ConnectivityTracker::new(DEFAULT_THROTTLE)
    }
}

impl Connectivity for ConnectivityTracker {
    fn network_down(&self, edge: Edge, at: Option<DateTime<Utc>>, why: &str) {
        let _applied = self.record(edge, NetworkState::Down, at.unwrap_or_else(Utc::now), why);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_600_000_000_000 + millis).unwrap()
    }

    #[test]
    fn test_edge_names() {
        assert_eq!(Edge::BotMqtt.to_string(), "bot.mqtt");
        assert_eq!(Edge::UserApi.name(), "user.api");
    }

    #[test]
    fn test_network_down_recorded() {
        let sut = ConnectivityTracker::default();
        assert_eq!(sut.status(Edge::BotMqtt), None);

        sut.network_down(Edge::BotMqtt, Some(at(0)), "Got offline message");

        let status = sut.status(Edge::BotMqtt).unwrap();
        assert_eq!(status.state, NetworkState::Down);
        assert_eq!(status.at, at(0));
        assert_eq!(status.why, "Got offline message");
        assert_eq!(sut.status(Edge::UserMqtt), None);
    }

    #[test]
    fn test_network_down_defaults_to_now() {
        let before = Utc::now();
        let sut = ConnectivityTracker::default();
        sut.network_down(Edge::BotMqtt, None, "gone");
        assert!(sut.status(Edge::BotMqtt).unwrap().at >= before);
    }

    #[test]
    fn test_transitions_throttled_per_edge() {
        let sut = ConnectivityTracker::new(Duration::from_millis(500));
        assert!(sut.record(Edge::BotMqtt, NetworkState::Down, at(0), "a"));
        assert!(!sut.network_up(Edge::BotMqtt, Some(at(100)), "b"));
        assert_eq!(sut.status(Edge::BotMqtt).unwrap().state, NetworkState::Down);

        assert!(sut.record(Edge::UserApi, NetworkState::Down, at(100), "c"));

        assert!(sut.network_up(Edge::BotMqtt, Some(at(600)), "d"));
        assert_eq!(sut.status(Edge::BotMqtt).unwrap().state, NetworkState::Up);
    }
}
