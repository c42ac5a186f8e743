//! Fields shared by nearly every event type

use super::EventRecord;

/// Normalized view of the fields present on nearly all events.
///
/// Missing strings stay empty and missing numbers stay zero; the problems
/// returned alongside describe what was absent or malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonFields {
    pub event_type: String,
    pub room_id: String,
    pub camera_id: String,
    pub pipeline: String,
    pub confidence: f64,
    pub timestamp: f64,
    pub frame_timestamp: f64,
    pub frame_source_timestamp: f64,
    pub emitted_at: f64,
    pub timestamp_offset_seconds: f64,
    pub timestamp_stabilizer_skew_seconds: f64,
    pub frame_age_seconds: f64,
    pub frame_transport_delay_seconds: f64,
    pub person_id: Option<String>,
    pub global_person_id: Option<i64>,
    pub track_id: Option<i64>,
}

impl EventRecord {
    /// Extract the common fields, collecting every problem instead of
    /// stopping at the first one.
    pub fn common_fields(&self) -> (CommonFields, Vec<String>) {
        let mut problems = Vec::new();

        let mut read_string = |key: &str| match self.non_empty_string(key) {
            Some(value) => value.to_string(),
            None => {
                problems.push(format!("missing {key}"));
                String::new()
            }
        };
        let event_type = read_string("event_type");
        let room_id = read_string("room_id");
        let camera_id = read_string("camera_id");
        let pipeline = read_string("pipeline");

        let mut read_f64 = |key: &str| match self.f64(key) {
            Some(value) => value,
            None => {
                problems.push(format!("invalid or missing {key}"));
                0.0
            }
        };
        let confidence = read_f64("confidence");
        let timestamp = read_f64("timestamp");
        let frame_timestamp = read_f64("frame_timestamp");
        let frame_source_timestamp = read_f64("frame_source_timestamp");
        let emitted_at = read_f64("emitted_at");
        let timestamp_offset_seconds = read_f64("timestamp_offset_seconds");
        let timestamp_stabilizer_skew_seconds = read_f64("timestamp_stabilizer_skew_seconds");
        let frame_age_seconds = read_f64("frame_age_seconds");
        let frame_transport_delay_seconds = read_f64("frame_transport_delay_seconds");

        // Identifiers are validated per event type, not here.
        let fields = CommonFields {
            event_type,
            room_id,
            camera_id,
            pipeline,
            confidence,
            timestamp,
            frame_timestamp,
            frame_source_timestamp,
            emitted_at,
            timestamp_offset_seconds,
            timestamp_stabilizer_skew_seconds,
            frame_age_seconds,
            frame_transport_delay_seconds,
            person_id: self.nullable_string("person_id").flatten().map(str::to_string),
            global_person_id: self.nullable_i64("global_person_id").flatten(),
            track_id: self.nullable_i64("track_id").flatten(),
        };

        (fields, problems)
    }
}
