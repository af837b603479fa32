// Spacecraft events overlay - one axis row per event type
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::discrete::AxisBreak;
use super::error::EventsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub type_id: i64,
    /// Index of the event type, which is also its y row on the events axis.
    pub row: usize,
    pub start: f64,
    pub end: f64,
}

impl Event {
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventsData {
    pub types: Vec<EventType>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventMarker {
    Line { type_id: i64, x: f64 },
    Band { type_id: i64, from: f64, to: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventsOverlay {
    /// Visible type ids that actually occur in the data.
    pub type_ids: Vec<i64>,
    pub min: Option<usize>,
    /// Exclusive upper bound of the events axis.
    pub max: Option<usize>,
    pub breaks: Vec<AxisBreak>,
    pub markers: Vec<EventMarker>,
}

fn column(parameters: &[String], name: &'static str) -> Result<usize, EventsError> {
    parameters
        .iter()
        .position(|p| p == name)
        .ok_or(EventsError::MissingParameter(name))
}

impl EventsData {
    /// Build from the rows of a LaTiS events dataset. Events whose type is not
    /// in `types` are dropped.
    pub fn from_rows(parameters: &[String], rows: &[Vec<Value>], types: Vec<EventType>) -> Result<Self, EventsError> {
        let id_idx = column(parameters, "id")?;
        let type_idx = column(parameters, "typeId")?;
        let start_idx = column(parameters, "startTime")?;
        let end_idx = column(parameters, "endTime")?;

        let mut events = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let number = |idx: usize, column: &'static str| {
                row.get(idx)
                    .and_then(Value::as_f64)
                    .ok_or(EventsError::MalformedValue { row: i, column })
            };
            let type_id = row
                .get(type_idx)
                .and_then(Value::as_i64)
                .ok_or(EventsError::MalformedValue { row: i, column: "typeId" })?;
            let start = number(start_idx, "startTime")?;
            let end = number(end_idx, "endTime")?;
            let id = match row.get(id_idx) {
                Some(Value::String(s)) => s.clone(),
                Some(v) if !v.is_null() => v.to_string(),
                _ => return Err(EventsError::MalformedValue { row: i, column: "id" }),
            };

            let Some(type_row) = types.iter().position(|t| t.id == type_id) else {
                tracing::warn!("Dropping event {} with unknown type {}", id, type_id);
                continue;
            };
            events.push(Event {
                id,
                type_id,
                row: type_row,
                start,
                end,
            });
        }

        Ok(Self { types, events })
    }

    /// Lay out the events axis for the requested type ids. Types with no
    /// events are hidden along with the ones not requested.
    pub fn overlay(&self, visible_type_ids: &[i64]) -> EventsOverlay {
        let present: HashSet<i64> = self.events.iter().map(|e| e.type_id).collect();
        let type_ids: Vec<i64> = visible_type_ids
            .iter()
            .copied()
            .filter(|id| present.contains(id))
            .collect();
        let shown = |id: i64| type_ids.contains(&id);

        let rows: Vec<usize> = self
            .types
            .iter()
            .enumerate()
            .filter(|(_, t)| shown(t.id))
            .map(|(i, _)| i)
            .collect();
        let (Some(&min), Some(&last)) = (rows.iter().min(), rows.iter().max()) else {
            return EventsOverlay::default();
        };
        let max = last + 1;

        let breaks = self
            .types
            .iter()
            .enumerate()
            .filter(|(i, t)| !shown(t.id) && *i >= min && *i < max)
            .map(|(i, _)| AxisBreak {
                from: i as f64 - 0.00001,
                to: i as f64 + 0.99999,
            })
            .collect();

        let markers = self
            .events
            .iter()
            .filter(|e| shown(e.type_id))
            .map(|e| {
                if e.is_instant() {
                    EventMarker::Line { type_id: e.type_id, x: e.start }
                } else {
                    EventMarker::Band {
                        type_id: e.type_id,
                        from: e.start,
                        to: e.end,
                    }
                }
            })
            .collect();

        EventsOverlay {
            type_ids,
            min: Some(min),
            max: Some(max),
            breaks,
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EventsData {
        let parameters: Vec<String> = ["id", "typeId", "startTime", "endTime"].iter().map(|s| s.to_string()).collect();
        let rows = vec![
            vec![json!(1), json!(10), json!(100.0), json!(200.0)],
            vec![json!("2"), json!(30), json!(150.0), json!(150.0)],
            vec![json!(3), json!(40), json!(300.0), json!(400.0)],
            vec![json!(4), json!(99), json!(500.0), json!(600.0)],
        ];
        let types = vec![
            EventType { id: 10, name: "Eclipse shadow".into(), label: "Shadow".into() },
            EventType { id: 20, name: "Ground contact".into(), label: "Contact".into() },
            EventType { id: 30, name: "Thruster firing".into(), label: "Thrust".into() },
            EventType { id: 40, name: "Safe mode".into(), label: "Safe".into() },
        ];
        EventsData::from_rows(&parameters, &rows, types).unwrap()
    }

    #[test]
    fn test_from_rows() {
        let data = sample();
        // the event with an unknown type is dropped
        assert_eq!(data.events.len(), 3);
        assert_eq!(data.events[0].id, "1");
        assert_eq!(data.events[1].id, "2");
        assert_eq!(data.events[1].row, 2);
        assert!(data.events[1].is_instant());
    }

    #[test]
    fn test_missing_parameter() {
        let parameters = vec!["id".to_string(), "typeId".to_string()];
        assert_eq!(
            EventsData::from_rows(&parameters, &[], Vec::new()),
            Err(EventsError::MissingParameter("startTime"))
        );
    }

    #[test]
    fn test_overlay_hides_absent_and_unrequested_rows() {
        let data = sample();
        // type 20 has no events, type 30 is not requested
        let overlay = data.overlay(&[10, 20, 40]);

        assert_eq!(overlay.type_ids, vec![10, 40]);
        assert_eq!((overlay.min, overlay.max), (Some(0), Some(4)));
        let hidden: Vec<f64> = overlay.breaks.iter().map(|b| (b.from + 0.00001).round()).collect();
        assert_eq!(hidden, vec![1.0, 2.0]);
        assert_eq!(
            overlay.markers,
            vec![
                EventMarker::Band { type_id: 10, from: 100.0, to: 200.0 },
                EventMarker::Band { type_id: 40, from: 300.0, to: 400.0 },
            ]
        );
    }

    #[test]
    fn test_overlay_instant_event_is_line() {
        let overlay = sample().overlay(&[30]);
        assert_eq!((overlay.min, overlay.max), (Some(2), Some(3)));
        assert!(overlay.breaks.is_empty());
        assert_eq!(overlay.markers, vec![EventMarker::Line { type_id: 30, x: 150.0 }]);
    }

    #[test]
    fn test_overlay_nothing_visible() {
        assert_eq!(sample().overlay(&[20]), EventsOverlay::default());
    }
}
