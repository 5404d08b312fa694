//! Typed reading of an [`Event`] by kind.
//!
//! Every field is optional: the agents never promise a schema, so a missing
//! or mistyped field is "unknown" rather than an error. Zero is a real
//! reading and stays distinct from `None`.

use crate::types::{Event, EventKind, Payload};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollutionDetected {
    pub event_id: Option<String>,
    pub source_id: Option<String>,
    pub source_type: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankSealed {
    pub tank_id: Option<String>,
    pub origin: Option<String>,
    pub mass_co2_kg: Option<f64>,
    pub pressure_psi: Option<f64>,
    pub sealed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankDelivered {
    pub manifest_id: Option<String>,
    pub tank_id: Option<String>,
    pub assigned_vehicle: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectionCompleted {
    pub well_id: Option<String>,
    pub tank_id: Option<String>,
    pub status: Option<String>,
    pub mass_tonnes: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardianAlert {
    pub alert_level: Option<String>,
    pub message: Option<String>,
    pub location: Option<String>,
    pub reason: Option<String>,
}

impl GuardianAlert {
    /// Short text for an alert chip: reason, then message.
    pub fn headline(&self) -> Option<&str> {
        self.reason.as_deref().or(self.message.as_deref())
    }
}

/// Tagged union over the known event kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation<'a> {
    Pollution(PollutionDetected),
    TankSealed(TankSealed),
    TankDelivered(TankDelivered),
    Injection(InjectionCompleted),
    Alert(GuardianAlert),
    Unknown { kind: &'a str, payload: &'a Payload },
}

impl Event {
    pub fn observation(&self) -> Observation<'_> {
        let p = &self.payload;
        match &self.kind {
            EventKind::PollutionDetected => Observation::Pollution(PollutionDetected {
                event_id: p.text("event_id"),
                source_id: p.text("source_id"),
                source_type: p.text("source_type"),
                confidence: p.f64("confidence"),
            }),
            EventKind::TankSealed => Observation::TankSealed(TankSealed {
                tank_id: p.text("tank_id"),
                origin: p.text("origin"),
                mass_co2_kg: p.f64("mass_co2_kg"),
                pressure_psi: p.f64("pressure_psi"),
                sealed: p.bool("sealed"),
            }),
            EventKind::TankDelivered => Observation::TankDelivered(TankDelivered {
                manifest_id: p.text("manifest_id"),
                tank_id: p.text("tank_id"),
                assigned_vehicle: p.text("assigned_vehicle"),
                from: p.text("from"),
                to: p.text("to"),
            }),
            EventKind::InjectionCompleted => Observation::Injection(InjectionCompleted {
                well_id: p.text("well_id"),
                tank_id: p.text("tank_id"),
                status: p.text("status"),
                mass_tonnes: p.f64("mass_tonnes"),
            }),
            EventKind::GuardianAlert => Observation::Alert(GuardianAlert {
                alert_level: p.text("alert_level"),
                message: p.text("message"),
                location: p.text("location"),
                reason: p.text("reason"),
            }),
            EventKind::Other(kind) => Observation::Unknown { kind, payload: p },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tank_ready_reads_all_fields() {
        let ev = Event::new(
            EventKind::TankSealed,
            json!({
                "tank_id": "TANK-R-0001",
                "origin": "refinery-koyali-01",
                "mass_co2_kg": 5000.0,
                "pressure_psi": 2950,
                "sealed": true,
            }),
        );
        let Observation::TankSealed(t) = ev.observation() else {
            panic!("expected tank");
        };
        assert_eq!(t.tank_id.as_deref(), Some("TANK-R-0001"));
        assert_eq!(t.origin.as_deref(), Some("refinery-koyali-01"));
        assert_eq!(t.mass_co2_kg, Some(5000.0));
        assert_eq!(t.pressure_psi, Some(2950.0));
        assert_eq!(t.sealed, Some(true));
    }

    #[test]
    fn missing_fields_stay_unknown() {
        let ev = Event::new(EventKind::TankSealed, json!({"tank_id": "T-1"}));
        let Observation::TankSealed(t) = ev.observation() else {
            panic!("expected tank");
        };
        assert_eq!(t.mass_co2_kg, None);
        assert_eq!(t.sealed, None);
    }

    #[test]
    fn alert_headline_prefers_reason() {
        let ev = Event::new(
            EventKind::GuardianAlert,
            json!({"alert_level": "CRITICAL", "message": "Leak detected!", "reason": "leak"}),
        );
        let Observation::Alert(a) = ev.observation() else {
            panic!("expected alert");
        };
        assert_eq!(a.headline(), Some("leak"));
        assert_eq!(a.alert_level.as_deref(), Some("CRITICAL"));

        let ev = Event::new(EventKind::GuardianAlert, json!({"message": "Leak detected!"}));
        let Observation::Alert(a) = ev.observation() else {
            panic!("expected alert");
        };
        assert_eq!(a.headline(), Some("Leak detected!"));
    }

    #[test]
    fn unknown_kind_keeps_opaque_payload() {
        let ev = Event::new(EventKind::Other("sensor_reading".into()), json!({"co2": 412}));
        match ev.observation() {
            Observation::Unknown { kind, payload } => {
                assert_eq!(kind, "sensor_reading");
                assert_eq!(payload.f64("co2"), Some(412.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
