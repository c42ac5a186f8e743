//! Data models for event stream analysis

use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The event is semantically broken for its declared type
    Error,
    /// A quality concern that does not invalidate the event
    Warn,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable machine-readable validation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    MissingCommonField,
    ConfidenceOutOfRange,
    NegativeFrameAge,
    NegativeTransportDelay,
    InvalidBbox,
    InvalidBboxOrder,
    MissingTrackId,
    InvalidPersonId,
    InvalidProximityIds,
    ProximityIdLengthMismatch,
    ProximityPersonLengthMismatch,
    InvalidDistance,
    InvalidDuration,
    InvalidDetectionsCount,
}

impl IssueCode {
    pub const ALL: [IssueCode; 14] = [
        Self::MissingCommonField,
        Self::ConfidenceOutOfRange,
        Self::NegativeFrameAge,
        Self::NegativeTransportDelay,
        Self::InvalidBbox,
        Self::InvalidBboxOrder,
        Self::MissingTrackId,
        Self::InvalidPersonId,
        Self::InvalidProximityIds,
        Self::ProximityIdLengthMismatch,
        Self::ProximityPersonLengthMismatch,
        Self::InvalidDistance,
        Self::InvalidDuration,
        Self::InvalidDetectionsCount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCommonField => "missing_common_field",
            Self::ConfidenceOutOfRange => "confidence_out_of_range",
            Self::NegativeFrameAge => "negative_frame_age",
            Self::NegativeTransportDelay => "negative_transport_delay",
            Self::InvalidBbox => "invalid_bbox",
            Self::InvalidBboxOrder => "invalid_bbox_order",
            Self::MissingTrackId => "missing_track_id",
            Self::InvalidPersonId => "invalid_person_id",
            Self::InvalidProximityIds => "invalid_proximity_ids",
            Self::ProximityIdLengthMismatch => "proximity_id_length_mismatch",
            Self::ProximityPersonLengthMismatch => "proximity_person_length_mismatch",
            Self::InvalidDistance => "invalid_distance",
            Self::InvalidDuration => "invalid_duration",
            Self::InvalidDetectionsCount => "invalid_detections_count",
        }
    }

    /// Every code carries a fixed severity
    pub fn severity(self) -> Severity {
        match self {
            Self::ConfidenceOutOfRange | Self::InvalidPersonId => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding tied to an event position in the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub event_index: usize,
    pub event_type: String,
}

impl ValidationIssue {
    pub fn new(
        code: IssueCode,
        message: impl Into<String>,
        event_index: usize,
        event_type: &str,
    ) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            event_index,
            event_type: event_type.to_string(),
        }
    }
}

/// Distribution summary of a numeric sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCount {
    pub key: String,
    pub count: usize,
}

/// Occurrences of an unordered track-id pair, keyed `"a-b"` with `a <= b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub pair: String,
    pub count: usize,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub total_events: usize,
    pub event_type_counts: Vec<KeyCount>,
    pub room_counts: Vec<KeyCount>,
    pub camera_counts: Vec<KeyCount>,
    pub role_counts: Vec<KeyCount>,
    pub orientation_counts: Vec<KeyCount>,
    pub stream_class_counts: Vec<KeyCount>,
    pub stream_camera_counts: Vec<KeyCount>,
    pub top_person_event_counts: Vec<KeyCount>,
    pub top_proximity_pairs: Vec<PairCount>,
    pub unique_person_ids: usize,
    pub unique_global_ids: usize,
    pub unique_track_ids: usize,
    pub confidence: StatSummary,
    pub frame_age_seconds: StatSummary,
    #[serde(rename = "transport_delay_seconds")]
    pub transport_delay: StatSummary,
    #[serde(rename = "timestamp_offset_seconds")]
    pub timestamp_offset: StatSummary,
    #[serde(rename = "timestamp_stabilizer_skew_seconds")]
    pub stabilizer_skew: StatSummary,
    pub issues: Vec<ValidationIssue>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl Analysis {
    /// Issues carrying the given code, in discovery order
    pub fn issues_with_code(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
