//! Pre-analysis event filtering by type and confidence

use std::collections::HashSet;

use crate::analytics::UNKNOWN_EVENT_TYPE;
use crate::model::EventRecord;

/// Allowed event types plus a minimum confidence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub event_types: HashSet<String>,
    pub min_confidence: f64,
}

impl EventFilter {
    pub fn new(event_types: HashSet<String>, min_confidence: f64) -> Self {
        Self {
            event_types,
            min_confidence,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.event_types.is_empty() || self.min_confidence > 0.0
    }

    pub fn matches(&self, ev: &EventRecord) -> bool {
        if !self.event_types.is_empty() {
            let label = ev.event_type().unwrap_or(UNKNOWN_EVENT_TYPE);
            if !self.event_types.contains(label) {
                return false;
            }
        }
        if self.min_confidence > 0.0 {
            // Events without a numeric confidence cannot meet a positive minimum
            return ev
                .f64("confidence")
                .is_some_and(|c| c >= self.min_confidence);
        }
        true
    }
}

/// Parse a comma-separated set, trimming items and skipping empties
pub fn parse_set<'a>(items: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    items
        .into_iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep the events the filter accepts; an inactive filter returns the input untouched
pub fn filter_events(events: Vec<EventRecord>, filter: &EventFilter) -> Vec<EventRecord> {
    if !filter.is_active() {
        return events;
    }
    events.into_iter().filter(|ev| filter.matches(ev)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ev(value: serde_json::Value) -> EventRecord {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Vec<EventRecord> {
        vec![
            ev(json!({"event_type": "person_tracked", "confidence": 0.9})),
            ev(json!({"event_type": "frame_tick", "confidence": 0.2})),
            ev(json!({"event_type": "person_tracked"})),
            ev(json!({"type": "role_assigned", "confidence": 0.7})),
        ]
    }

    #[test]
    fn test_parse_set() {
        let set = parse_set([" a, b ,,", "c"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("a") && set.contains("b") && set.contains("c"));
        assert!(parse_set([""]).is_empty());
    }

    #[test]
    fn test_inactive_filter_keeps_everything() {
        let events = sample();
        let kept = filter_events(events.clone(), &EventFilter::default());
        assert_eq!(kept, events);
    }

    #[test]
    fn test_filter_by_type() {
        let filter = EventFilter::new(parse_set(["person_tracked,role_assigned"]), 0.0);
        let kept = filter_events(sample(), &filter);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_filter_by_confidence_drops_missing() {
        let filter = EventFilter::new(HashSet::new(), 0.5);
        let kept = filter_events(sample(), &filter);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.f64("confidence").is_some()));
    }

    #[test]
    fn test_filter_combined() {
        let filter = EventFilter::new(parse_set(["person_tracked"]), 0.5);
        let kept = filter_events(sample(), &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].f64("confidence"), Some(0.9));
    }
}
