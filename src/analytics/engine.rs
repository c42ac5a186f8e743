//! Single-pass analysis over a batch of events
//!
//! [`run`] is a pure function: every counter lives in an [`Accumulator`]
//! owned by one call, so independent batches can be analyzed in parallel
//! without any shared state.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::model::EventRecord;

use super::models::{Analysis, IssueCode, Severity, ValidationIssue};
use super::stats::{pair_keys, summarize, to_key_counts, to_pair_counts};
use super::validation::{
    validate_event_specific, validate_ranges, validate_shape, IssueSink, PROXIMITY_EVENT,
};

/// Maximum entries kept in the top-N tables
pub const TOP_N: usize = 10;

/// Label used when an event carries no usable type
pub const UNKNOWN_EVENT_TYPE: &str = "unknown";

/// Analyze a batch of events
pub fn run(events: &[EventRecord]) -> Analysis {
    let mut acc = Accumulator::with_capacity(events.len());
    for (index, ev) in events.iter().enumerate() {
        acc.observe(index, ev);
    }
    let analysis = acc.finish(events.len());

    info!(
        "Analyzed {} events: {} errors, {} warnings",
        analysis.total_events, analysis.error_count, analysis.warning_count
    );
    analysis
}

#[derive(Default)]
struct Accumulator {
    type_counts: HashMap<String, usize>,
    room_counts: HashMap<String, usize>,
    camera_counts: HashMap<String, usize>,
    role_counts: HashMap<String, usize>,
    orientation_counts: HashMap<String, usize>,
    stream_class_counts: HashMap<String, usize>,
    stream_camera_counts: HashMap<String, usize>,
    person_event_counts: HashMap<String, usize>,
    proximity_counts: HashMap<String, usize>,
    unique_person: HashSet<String>,
    unique_global: HashSet<i64>,
    unique_track: HashSet<i64>,
    confidence: Vec<f64>,
    frame_age: Vec<f64>,
    transport_delay: Vec<f64>,
    timestamp_offset: Vec<f64>,
    stabilizer_skew: Vec<f64>,
    issues: Vec<ValidationIssue>,
}

impl Accumulator {
    fn with_capacity(n: usize) -> Self {
        Self {
            confidence: Vec::with_capacity(n),
            frame_age: Vec::with_capacity(n),
            transport_delay: Vec::with_capacity(n),
            timestamp_offset: Vec::with_capacity(n),
            stabilizer_skew: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    fn observe(&mut self, index: usize, ev: &EventRecord) {
        let (common, problems) = ev.common_fields();
        let event_type = ev.event_type().unwrap_or(UNKNOWN_EVENT_TYPE);

        bump(&mut self.type_counts, event_type);
        if !common.room_id.is_empty() {
            bump(&mut self.room_counts, &common.room_id);
        }
        if !common.camera_id.is_empty() {
            bump(&mut self.camera_counts, &common.camera_id);
        }
        for (key, counts) in [
            ("role", &mut self.role_counts),
            ("orientation", &mut self.orientation_counts),
            ("stream_class_id", &mut self.stream_class_counts),
            ("stream_camera_id", &mut self.stream_camera_counts),
        ] {
            if let Some(value) = ev.non_empty_string(key) {
                bump(counts, value);
            }
        }

        if let Some(person_id) = common.person_id.as_deref().filter(|id| !id.is_empty()) {
            bump(&mut self.person_event_counts, person_id);
            self.unique_person.insert(person_id.to_string());
        }
        if let Some(global_id) = common.global_person_id {
            self.unique_global.insert(global_id);
        }
        if let Some(track_id) = common.track_id {
            self.unique_track.insert(track_id);
        }

        for (key, sample) in [
            ("confidence", &mut self.confidence),
            ("frame_age_seconds", &mut self.frame_age),
            ("frame_transport_delay_seconds", &mut self.transport_delay),
            ("timestamp_offset_seconds", &mut self.timestamp_offset),
            ("timestamp_stabilizer_skew_seconds", &mut self.stabilizer_skew),
        ] {
            if let Some(value) = ev.f64(key) {
                sample.push(value);
            }
        }

        let mut sink = IssueSink::new(&mut self.issues, index, event_type);
        for problem in problems {
            sink.push(IssueCode::MissingCommonField, problem);
        }
        validate_ranges(ev, &mut sink);
        validate_shape(ev, &mut sink);
        validate_event_specific(ev, event_type, &mut sink);

        if event_type == PROXIMITY_EVENT {
            if let Some(track_ids) = ev.i64_array("track_ids") {
                for key in pair_keys(&track_ids) {
                    *self.proximity_counts.entry(key).or_insert(0) += 1;
                }
            }
        }

        debug!(index, event_type, "observed event");
    }

    fn finish(self, total_events: usize) -> Analysis {
        let error_count = self
            .issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count();
        let warning_count = self.issues.len() - error_count;

        let mut top_person_event_counts = to_key_counts(self.person_event_counts);
        top_person_event_counts.truncate(TOP_N);
        let mut top_proximity_pairs = to_pair_counts(self.proximity_counts);
        top_proximity_pairs.truncate(TOP_N);

        Analysis {
            total_events,
            event_type_counts: to_key_counts(self.type_counts),
            room_counts: to_key_counts(self.room_counts),
            camera_counts: to_key_counts(self.camera_counts),
            role_counts: to_key_counts(self.role_counts),
            orientation_counts: to_key_counts(self.orientation_counts),
            stream_class_counts: to_key_counts(self.stream_class_counts),
            stream_camera_counts: to_key_counts(self.stream_camera_counts),
            top_person_event_counts,
            top_proximity_pairs,
            unique_person_ids: self.unique_person.len(),
            unique_global_ids: self.unique_global.len(),
            unique_track_ids: self.unique_track.len(),
            confidence: summarize(&self.confidence),
            frame_age_seconds: summarize(&self.frame_age),
            transport_delay: summarize(&self.transport_delay),
            timestamp_offset: summarize(&self.timestamp_offset),
            stabilizer_skew: summarize(&self.stabilizer_skew),
            issues: self.issues,
            error_count,
            warning_count,
        }
    }
}

fn bump(counts: &mut HashMap<String, usize>, key: &str) {
    match counts.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            counts.insert(key.to_string(), 1);
        }
    }
}
