//! Structural and per-event-type validation rules
//!
//! Rules never short-circuit each other: every rule that applies to an event
//! is evaluated and each violation becomes one issue.

use crate::model::EventRecord;

use super::models::{IssueCode, ValidationIssue};

/// Event types describing a single tracked person
pub const PERSON_EVENT_TYPES: [&str; 7] = [
    "person_tracked",
    "person_detected",
    "person_lost",
    "head_orientation_changed",
    "posture_changed",
    "sleeping_suspected",
    "role_assigned",
];

pub const PROXIMITY_EVENT: &str = "proximity_event";
pub const FRAME_TICK_EVENT: &str = "frame_tick";

pub fn is_person_event(event_type: &str) -> bool {
    PERSON_EVENT_TYPES.contains(&event_type)
}

/// Collects issues for one event at a fixed position in the input
pub struct IssueSink<'a> {
    issues: &'a mut Vec<ValidationIssue>,
    event_index: usize,
    event_type: &'a str,
}

impl<'a> IssueSink<'a> {
    pub fn new(
        issues: &'a mut Vec<ValidationIssue>,
        event_index: usize,
        event_type: &'a str,
    ) -> Self {
        Self {
            issues,
            event_index,
            event_type,
        }
    }

    pub fn push(&mut self, code: IssueCode, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(
            code,
            message,
            self.event_index,
            self.event_type,
        ));
    }
}

/// Range checks on the numeric common fields, when they are present
pub fn validate_ranges(ev: &EventRecord, sink: &mut IssueSink<'_>) {
    if let Some(confidence) = ev.f64("confidence") {
        if !(0.0..=1.0).contains(&confidence) {
            sink.push(
                IssueCode::ConfidenceOutOfRange,
                format!("confidence {confidence:.3} out of [0,1]"),
            );
        }
    }
    if ev.f64("frame_age_seconds").is_some_and(|v| v < 0.0) {
        sink.push(IssueCode::NegativeFrameAge, "frame_age_seconds must be >= 0");
    }
    if ev
        .f64("frame_transport_delay_seconds")
        .is_some_and(|v| v < 0.0)
    {
        sink.push(
            IssueCode::NegativeTransportDelay,
            "frame_transport_delay_seconds must be >= 0",
        );
    }
}

/// Type-independent shape rules
pub fn validate_shape(ev: &EventRecord, sink: &mut IssueSink<'_>) {
    if !ev.has("bbox") {
        return;
    }
    if ev.array_len("bbox") != Some(4) {
        sink.push(IssueCode::InvalidBbox, "bbox must contain 4 numbers");
        return;
    }
    let Some(bbox) = ev.f64_array("bbox") else {
        sink.push(IssueCode::InvalidBbox, "bbox values must be numeric");
        return;
    };
    let (x1, y1, x2, y2) = (bbox[0], bbox[1], bbox[2], bbox[3]);
    if x1 >= x2 || y1 >= y2 {
        sink.push(IssueCode::InvalidBboxOrder, "bbox requires x1<x2 and y1<y2");
    }
}

/// Rules specific to the event's declared type
pub fn validate_event_specific(ev: &EventRecord, event_type: &str, sink: &mut IssueSink<'_>) {
    if is_person_event(event_type) {
        validate_person(ev, sink);
    }
    match event_type {
        PROXIMITY_EVENT => validate_proximity(ev, sink),
        FRAME_TICK_EVENT => validate_frame_tick(ev, sink),
        _ => {}
    }
}

fn validate_person(ev: &EventRecord, sink: &mut IssueSink<'_>) {
    if ev.i64("track_id").is_none() {
        sink.push(IssueCode::MissingTrackId, "person event missing track_id");
    }
    if ev.has("person_id") && ev.nullable_string("person_id").is_none() {
        sink.push(IssueCode::InvalidPersonId, "person_id has invalid type");
    }
}

fn validate_proximity(ev: &EventRecord, sink: &mut IssueSink<'_>) {
    let track_ids = ev.i64_array("track_ids");
    let global_ids = ev.i64_array("global_ids");
    let person_ids = ev.string_array("person_ids");

    let well_formed = matches!(
        (&track_ids, &global_ids, &person_ids),
        (Some(t), Some(g), Some(p)) if t.len() >= 2 && !g.is_empty() && !p.is_empty()
    );
    if !well_formed {
        sink.push(
            IssueCode::InvalidProximityIds,
            "proximity_event requires track_ids (at least two) and non-empty global_ids/person_ids",
        );
    }

    if let (Some(t), Some(g)) = (&track_ids, &global_ids) {
        if t.len() != g.len() {
            sink.push(
                IssueCode::ProximityIdLengthMismatch,
                format!("track_ids ({}) and global_ids ({}) length mismatch", t.len(), g.len()),
            );
        }
    }
    if let (Some(t), Some(p)) = (&track_ids, &person_ids) {
        if t.len() != p.len() {
            sink.push(
                IssueCode::ProximityPersonLengthMismatch,
                format!("track_ids ({}) and person_ids ({}) length mismatch", t.len(), p.len()),
            );
        }
    }

    if !ev.f64("distance").is_some_and(|d| d >= 0.0) {
        sink.push(IssueCode::InvalidDistance, "distance must be >= 0");
    }
    if !ev.f64("duration_seconds").is_some_and(|d| d >= 0.0) {
        sink.push(IssueCode::InvalidDuration, "duration_seconds must be >= 0");
    }
}

fn validate_frame_tick(ev: &EventRecord, sink: &mut IssueSink<'_>) {
    let valid = ev
        .f64("detections_count")
        .is_some_and(|v| v >= 0.0 && v.fract() == 0.0);
    if !valid {
        sink.push(
            IssueCode::InvalidDetectionsCount,
            "detections_count must be a non-negative integer",
        );
    }
}
