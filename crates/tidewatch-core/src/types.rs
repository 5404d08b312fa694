use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Well-known event type tags emitted by the capture agents.
pub mod kind {
    pub const POLLUTION_EVENT: &str = "pollution_event";
    pub const TANK_READY: &str = "tank_ready";
    pub const DELIVERED_TO_PORT: &str = "delivered_to_port";
    pub const INJECTION_REPORT: &str = "injection_report";
    pub const GUARDIAN_ALERT: &str = "guardian_alert";
}

/// Event kind. Unknown tags are kept verbatim in `Other` and never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    PollutionDetected,
    TankSealed,
    TankDelivered,
    InjectionCompleted,
    GuardianAlert,
    Other(String),
}

impl EventKind {
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            kind::POLLUTION_EVENT => EventKind::PollutionDetected,
            kind::TANK_READY => EventKind::TankSealed,
            kind::DELIVERED_TO_PORT => EventKind::TankDelivered,
            kind::INJECTION_REPORT => EventKind::InjectionCompleted,
            kind::GUARDIAN_ALERT => EventKind::GuardianAlert,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// The tag as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::PollutionDetected => kind::POLLUTION_EVENT,
            EventKind::TankSealed => kind::TANK_READY,
            EventKind::TankDelivered => kind::DELIVERED_TO_PORT,
            EventKind::InjectionCompleted => kind::INJECTION_REPORT,
            EventKind::GuardianAlert => kind::GUARDIAN_ALERT,
            EventKind::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }

    /// The agent responsible for emitting this kind of event.
    pub fn agent(&self) -> Agent {
        match self {
            EventKind::PollutionDetected => Agent::Sentinel,
            EventKind::TankSealed => Agent::Compressor,
            EventKind::TankDelivered => Agent::Hauler,
            EventKind::InjectionCompleted => Agent::Geologist,
            EventKind::GuardianAlert => Agent::Guardian,
            EventKind::Other(_) => Agent::System,
        }
    }
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        match EventKind::from_wire(&tag) {
            EventKind::Other(_) => EventKind::Other(tag),
            known => known,
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage that emits events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Agent {
    Sentinel,
    Compressor,
    Hauler,
    Geologist,
    Guardian,
    System,
}

impl Agent {
    pub fn as_str(self) -> &'static str {
        match self {
            Agent::Sentinel => "Sentinel",
            Agent::Compressor => "Compressor",
            Agent::Hauler => "Hauler",
            Agent::Geologist => "Geologist",
            Agent::Guardian => "Guardian",
            Agent::System => "System",
        }
    }
}

/// Schema-free event payload.
///
/// Lookups never fail: an absent key, a JSON `null`, a value of the wrong
/// type, or a payload that is not an object all read as `None` ("unknown").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Value);

impl Payload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key).filter(|v| !v.is_null())
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// String or number field rendered as text (identifiers arrive as either).
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Compact JSON, cut to at most `max_chars` characters. A missing
    /// payload renders as `{}`.
    pub fn compact(&self, max_chars: usize) -> String {
        let json = if self.0.is_null() {
            "{}".to_string()
        } else {
            self.0.to_string()
        };
        json.chars().take(max_chars).collect()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One observation emitted by an agent, as delivered by the drain endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub payload: Payload,
    #[serde(
        default,
        deserialize_with = "de_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            kind,
            payload: Payload(payload),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    /// The event's own timestamp if non-empty, else `payload.timestamp`.
    pub fn resolved_timestamp(&self) -> Option<String> {
        match self.timestamp.as_deref() {
            Some(ts) if !ts.is_empty() => Some(ts.to_string()),
            _ => self.payload.text("timestamp").filter(|ts| !ts.is_empty()),
        }
    }
}

/// Body of `GET /debug/drain_events?limit=N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrainResponse {
    /// Number of events the backend removed from its queue. Informational.
    #[serde(default)]
    pub drained: u64,
    /// Events in the order the backend queued them (oldest first).
    #[serde(default, deserialize_with = "de_events")]
    pub events: Vec<Event>,
}

impl DrainResponse {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            drained: events.len() as u64,
            events,
        }
    }
}

/// Outcome of the most recent retrieval attempt. No hysteresis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Offline,
    Online,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        self == Connectivity::Online
    }

    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Online => "Backend connected",
            Connectivity::Offline => "Backend offline",
        }
    }
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_events<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Event>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_kind_round_trips() {
        let ev: Event =
            serde_json::from_value(json!({"type": "sensor_reading", "payload": {"x": 1}}))
                .unwrap();
        assert_eq!(ev.kind, EventKind::Other("sensor_reading".into()));
        assert!(!ev.kind.is_known());
        assert_eq!(ev.kind.agent(), Agent::System);
        let back = serde_json::to_value(&ev).unwrap();
        assert_eq!(back["type"], "sensor_reading");
    }

    #[test]
    fn known_kinds_map_to_agents() {
        let cases = [
            ("pollution_event", Agent::Sentinel),
            ("tank_ready", Agent::Compressor),
            ("delivered_to_port", Agent::Hauler),
            ("injection_report", Agent::Geologist),
            ("guardian_alert", Agent::Guardian),
        ];
        for (tag, agent) in cases {
            let kind = EventKind::from(tag.to_string());
            assert!(kind.is_known(), "{tag}");
            assert_eq!(kind.as_str(), tag);
            assert_eq!(kind.agent(), agent);
        }
    }

    #[test]
    fn missing_type_fails_decode() {
        let res: Result<Event, _> = serde_json::from_value(json!({"payload": {}}));
        assert!(res.is_err());
    }

    #[test]
    fn payload_absent_or_null_reads_unknown() {
        let ev: Event = serde_json::from_value(json!({"type": "tank_ready"})).unwrap();
        assert_eq!(ev.payload.str("tank_id"), None);
        assert_eq!(ev.payload.compact(120), "{}");

        let ev: Event =
            serde_json::from_value(json!({"type": "tank_ready", "payload": null})).unwrap();
        assert_eq!(ev.payload.f64("mass_co2_kg"), None);
    }

    #[test]
    fn payload_accessors_are_defensive() {
        let p = Payload::new(json!({
            "tank_id": 17,
            "mass_co2_kg": 0,
            "pressure_psi": "high",
            "sealed": true,
            "origin": null,
        }));
        assert_eq!(p.text("tank_id").as_deref(), Some("17"));
        assert_eq!(p.f64("mass_co2_kg"), Some(0.0));
        assert_eq!(p.f64("pressure_psi"), None);
        assert_eq!(p.bool("sealed"), Some(true));
        assert_eq!(p.str("origin"), None);

        let scalar = Payload::new(json!("just text"));
        assert_eq!(scalar.get("anything"), None);
    }

    #[test]
    fn timestamp_accepts_string_number_or_null() {
        let ev: Event =
            serde_json::from_value(json!({"type": "x", "payload": {}, "timestamp": 1700000000.5}))
                .unwrap();
        assert_eq!(ev.timestamp.as_deref(), Some("1700000000.5"));

        let ev: Event =
            serde_json::from_value(json!({"type": "x", "payload": {}, "timestamp": null}))
                .unwrap();
        assert_eq!(ev.timestamp, None);
    }

    #[test]
    fn resolved_timestamp_falls_back_to_payload() {
        let ev = Event::new(
            EventKind::TankSealed,
            json!({"timestamp": "2025-01-01T00:00:00Z"}),
        );
        assert_eq!(
            ev.resolved_timestamp().as_deref(),
            Some("2025-01-01T00:00:00Z")
        );

        let ev = ev.with_timestamp("");
        assert_eq!(
            ev.resolved_timestamp().as_deref(),
            Some("2025-01-01T00:00:00Z")
        );

        let ev = Event::new(EventKind::TankSealed, json!({})).with_timestamp("outer");
        assert_eq!(ev.resolved_timestamp().as_deref(), Some("outer"));
    }

    #[test]
    fn drain_response_tolerates_missing_or_null_events() {
        let r: DrainResponse = serde_json::from_value(json!({"drained": 0})).unwrap();
        assert!(r.events.is_empty());
        let r: DrainResponse =
            serde_json::from_value(json!({"drained": 0, "events": null})).unwrap();
        assert!(r.events.is_empty());
    }

    #[test]
    fn drain_response_rejects_malformed_items() {
        let res: Result<DrainResponse, _> = serde_json::from_value(json!({
            "drained": 2,
            "events": [{"type": "tank_ready", "payload": {}}, {"payload": {}}],
        }));
        assert!(res.is_err());
    }

    #[test]
    fn connectivity_defaults_offline() {
        assert_eq!(Connectivity::default(), Connectivity::Offline);
        assert!(!Connectivity::default().is_online());
        assert_eq!(Connectivity::Online.label(), "Backend connected");
    }
}
