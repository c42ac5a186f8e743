//! Unit tests for the analytics engine

use super::*;
use crate::model::{parse_events, EventRecord};
use proptest::prelude::*;
use serde_json::{json, Value};

fn base_event(event_type: &str) -> Value {
    json!({
        "event_type": event_type,
        "room_id": "r1",
        "camera_id": "c1",
        "pipeline": "p1",
        "confidence": 0.5,
        "timestamp": 1,
        "frame_timestamp": 1,
        "frame_source_timestamp": 1,
        "emitted_at": 1,
        "timestamp_offset_seconds": 0,
        "timestamp_stabilizer_skew_seconds": 0,
        "frame_age_seconds": 0,
        "frame_transport_delay_seconds": 0
    })
}

fn with(mut value: Value, extra: Value) -> Value {
    let obj = value.as_object_mut().unwrap();
    for (k, v) in extra.as_object().unwrap() {
        obj.insert(k.clone(), v.clone());
    }
    value
}

fn events(values: Vec<Value>) -> Vec<EventRecord> {
    let doc = Value::Array(values).to_string();
    parse_events(doc.as_bytes()).unwrap()
}

fn codes(analysis: &Analysis) -> Vec<IssueCode> {
    analysis.issues.iter().map(|issue| issue.code).collect()
}

#[test]
fn test_run_finds_invalid_proximity() {
    let input = events(vec![with(
        base_event("proximity_event"),
        json!({
            "track_ids": [1],
            "global_ids": [1, 2],
            "person_ids": ["a"],
            "distance": -1,
            "duration_seconds": -2
        }),
    )]);

    let res = run(&input);
    let found = codes(&res);
    assert!(found.contains(&IssueCode::InvalidProximityIds));
    assert!(found.contains(&IssueCode::ProximityIdLengthMismatch));
    assert!(!found.contains(&IssueCode::ProximityPersonLengthMismatch));
    assert!(found.contains(&IssueCode::InvalidDistance));
    assert!(found.contains(&IssueCode::InvalidDuration));
    assert!(res.error_count >= 4);
    assert_eq!(res.warning_count, 0);
}

#[test]
fn test_missing_event_type_is_bucketed_unknown() {
    let mut value = base_event("x");
    value.as_object_mut().unwrap().remove("event_type");
    let res = run(&events(vec![value]));

    assert_eq!(res.issues.len(), 1);
    let issue = &res.issues[0];
    assert_eq!(issue.code, IssueCode::MissingCommonField);
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.message, "missing event_type");
    assert_eq!(issue.event_type, "unknown");
    assert_eq!(
        res.event_type_counts,
        vec![KeyCount {
            key: "unknown".into(),
            count: 1
        }]
    );
}

#[test]
fn test_legacy_type_field_labels_event() {
    let mut value = with(base_event("x"), json!({"type": "frame_tick", "detections_count": 1}));
    value.as_object_mut().unwrap().remove("event_type");
    let res = run(&events(vec![value]));

    assert_eq!(res.event_type_counts[0].key, "frame_tick");
    assert_eq!(codes(&res), vec![IssueCode::MissingCommonField]);
    assert_eq!(res.issues[0].event_type, "frame_tick");
}

#[test]
fn test_frame_tick_detections() {
    let input = events(vec![
        with(base_event("frame_tick"), json!({"detections_count": 2.5})),
        with(base_event("frame_tick"), json!({"detections_count": -1})),
        with(base_event("frame_tick"), json!({"detections_count": 3})),
    ]);
    let res = run(&input);
    let indices: Vec<_> = res
        .issues_with_code(IssueCode::InvalidDetectionsCount)
        .map(|issue| issue.event_index)
        .collect();
    assert_eq!(indices, vec![0, 1]);
    assert_eq!(res.issues.len(), 2);
}

#[test]
fn test_bbox_scenarios() {
    let input = events(vec![
        with(base_event("person_detected"), json!({"track_id": 1, "bbox": [10, 10, 5, 5]})),
        with(base_event("person_detected"), json!({"track_id": 1, "bbox": ["a", "b", "c", "d"]})),
        with(base_event("person_detected"), json!({"track_id": 1, "bbox": [1, 2, 3]})),
    ]);
    let res = run(&input);
    assert_eq!(
        codes(&res),
        vec![
            IssueCode::InvalidBboxOrder,
            IssueCode::InvalidBbox,
            IssueCode::InvalidBbox,
        ]
    );
}

#[test]
fn test_issue_index_locates_event() {
    let input = events(vec![
        base_event("frame_summary"),
        with(base_event("person_tracked"), json!({"person_id": "p"})),
        base_event("frame_summary"),
        with(base_event("frame_summary"), json!({"confidence": 1.7})),
    ]);
    let res = run(&input);
    assert_eq!(res.issues.len(), 2);
    for issue in &res.issues {
        let ev = &input[issue.event_index];
        assert_eq!(ev.event_type(), Some(issue.event_type.as_str()));
    }
    assert_eq!(res.issues[0].code, IssueCode::MissingTrackId);
    assert_eq!(res.issues[0].event_index, 1);
    assert_eq!(res.issues[1].code, IssueCode::ConfidenceOutOfRange);
    assert_eq!(res.issues[1].severity, Severity::Warn);
    assert_eq!(res.issues[1].event_index, 3);
    assert_eq!(res.issues[1].message, "confidence 1.700 out of [0,1]");
    assert_eq!(res.warning_count, 1);
    assert_eq!(res.error_count, 1);
}

#[test]
fn test_counts_and_uniqueness() {
    let input = events(vec![
        with(
            base_event("person_tracked"),
            json!({
                "track_id": 1,
                "global_person_id": 10,
                "person_id": "alice",
                "role": "staff",
                "orientation": "left"
            }),
        ),
        with(
            base_event("person_tracked"),
            json!({
                "track_id": 2,
                "global_person_id": 10,
                "person_id": "bob",
                "role": "",
                "camera_id": "c2"
            }),
        ),
        with(
            base_event("posture_changed"),
            json!({"track_id": 1, "global_person_id": 11, "person_id": "alice", "room_id": "r2"}),
        ),
        with(
            base_event("person_lost"),
            json!({"track_id": 3, "person_id": null, "global_person_id": null}),
        ),
    ]);
    let res = run(&input);

    assert_eq!(res.total_events, 4);
    assert!(res.issues.is_empty(), "{:?}", res.issues);
    assert_eq!(res.event_type_counts[0].key, "person_tracked");
    assert_eq!(res.event_type_counts[0].count, 2);
    // tie between person_lost and posture_changed resolves alphabetically
    assert_eq!(res.event_type_counts[1].key, "person_lost");
    assert_eq!(res.event_type_counts[2].key, "posture_changed");
    assert_eq!(res.room_counts[0], KeyCount { key: "r1".into(), count: 3 });
    assert_eq!(res.camera_counts.len(), 2);
    assert_eq!(res.role_counts, vec![KeyCount { key: "staff".into(), count: 1 }]);
    assert_eq!(res.orientation_counts.len(), 1);
    assert_eq!(res.unique_person_ids, 2);
    assert_eq!(res.unique_global_ids, 2);
    assert_eq!(res.unique_track_ids, 3);
    assert_eq!(res.top_person_event_counts[0], KeyCount { key: "alice".into(), count: 2 });
    assert!(res.stream_class_counts.is_empty());
}

#[test]
fn test_proximity_pairs_ranked_and_capped() {
    let mut values = Vec::new();
    // 12 distinct pairs, "2-5" appears twice through reversed order
    for i in 0..12i64 {
        values.push(with(
            base_event("proximity_event"),
            json!({
                "track_ids": [100 + i, 200 + i],
                "global_ids": [1, 2],
                "person_ids": ["a", "b"],
                "distance": 1.0,
                "duration_seconds": 2.0
            }),
        ));
    }
    for ids in [json!([5, 2]), json!([2, 5])] {
        values.push(with(
            base_event("proximity_event"),
            json!({
                "track_ids": ids,
                "global_ids": [1, 2],
                "person_ids": ["a", "b"],
                "distance": 1.0,
                "duration_seconds": 2.0
            }),
        ));
    }
    let res = run(&events(values));

    assert!(res.issues.is_empty());
    assert_eq!(res.top_proximity_pairs.len(), TOP_N);
    assert_eq!(res.top_proximity_pairs[0].pair, "2-5");
    assert_eq!(res.top_proximity_pairs[0].count, 2);
    assert_eq!(res.top_proximity_pairs[1].pair, "100-200");
    assert!(res.top_proximity_pairs.iter().all(|p| p.pair != "5-2"));
}

#[test]
fn test_top_person_counts_capped_at_cut() {
    // p01..p03 appear three times, p04..p12 once each
    let mut values = Vec::new();
    for i in 1..=12 {
        let repeats = if i <= 3 { 3 } else { 1 };
        for _ in 0..repeats {
            values.push(with(
                base_event("person_tracked"),
                json!({"person_id": format!("p{i:02}"), "track_id": i}),
            ));
        }
    }
    // Insert in reverse so ordering comes from ranking, not input order
    values.reverse();
    let res = run(&events(values));

    assert_eq!(res.unique_person_ids, 12);
    assert_eq!(res.top_person_event_counts.len(), TOP_N);
    let keys: Vec<_> = res
        .top_person_event_counts
        .iter()
        .map(|kc| kc.key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec!["p01", "p02", "p03", "p04", "p05", "p06", "p07", "p08", "p09", "p10"]
    );
    assert_eq!(res.top_person_event_counts[2].count, 3);
    assert_eq!(res.top_person_event_counts[3].count, 1);
    assert!(res
        .top_person_event_counts
        .iter()
        .all(|kc| kc.key != "p11" && kc.key != "p12"));
}

#[test]
fn test_stat_samples_only_from_valid_fields() {
    let input = events(vec![
        with(base_event("x"), json!({"confidence": 0.2, "frame_age_seconds": 0.5})),
        with(base_event("x"), json!({"confidence": "bad", "frame_age_seconds": 1.5})),
        with(base_event("x"), json!({"confidence": 0.8, "frame_transport_delay_seconds": -1})),
    ]);
    let res = run(&input);

    assert_eq!(res.confidence.count, 2);
    assert!((res.confidence.avg - 0.5).abs() < 1e-12);
    assert_eq!(res.frame_age_seconds.count, 3);
    assert_eq!(res.frame_age_seconds.max, 1.5);
    assert_eq!(res.transport_delay.min, -1.0);
    assert_eq!(
        res.issues_with_code(IssueCode::NegativeTransportDelay).count(),
        1
    );
    assert_eq!(
        res.issues_with_code(IssueCode::MissingCommonField)
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>(),
        vec!["invalid or missing confidence"]
    );
}

#[test]
fn test_stream_fields_counted() {
    let input: Vec<EventRecord> = events(vec![base_event("x"), base_event("x")])
        .into_iter()
        .zip(["front", "back"])
        .map(|(ev, cam)| {
            ev.with_field("stream_class_id", "class-a")
                .with_field("stream_camera_id", cam)
        })
        .collect();
    let res = run(&input);
    assert_eq!(res.stream_class_counts, vec![KeyCount { key: "class-a".into(), count: 2 }]);
    let cams: Vec<_> = res.stream_camera_counts.iter().map(|kc| kc.key.as_str()).collect();
    assert_eq!(cams, vec!["back", "front"]);
}

#[test]
fn test_empty_batch() {
    let res = run(&[]);
    assert_eq!(res.total_events, 0);
    assert_eq!(res.confidence, StatSummary::default());
    assert!(res.issues.is_empty());
}

#[test]
fn test_engine_is_stateless() {
    let input = events(vec![
        with(base_event("person_tracked"), json!({"person_id": 3})),
        base_event("frame_tick"),
    ]);
    assert_eq!(run(&input), run(&input));
}

fn arbitrary_event() -> impl Strategy<Value = Value> {
    let types = prop::sample::select(vec![
        "person_tracked",
        "proximity_event",
        "frame_tick",
        "role_assigned",
        "",
    ]);
    (
        types,
        prop::option::of(-1.0f64..2.0),
        prop::option::of(prop::collection::vec(-3i64..6, 0..4)),
        prop::option::of(-2.0f64..3.0),
        prop::option::of(prop::collection::vec(-5.0f64..5.0, 0..6)),
    )
        .prop_map(|(event_type, confidence, track_ids, detections, bbox)| {
            let mut obj = serde_json::Map::new();
            obj.insert("event_type".into(), json!(event_type));
            if let Some(c) = confidence {
                obj.insert("confidence".into(), json!(c));
            }
            if let Some(ids) = track_ids {
                obj.insert("track_ids".into(), json!(ids));
            }
            if let Some(d) = detections {
                obj.insert("detections_count".into(), json!(d));
            }
            if let Some(b) = bbox {
                obj.insert("bbox".into(), json!(b));
            }
            Value::Object(obj)
        })
}

proptest! {
    #[test]
    fn prop_totals_are_consistent(values in prop::collection::vec(arbitrary_event(), 0..30)) {
        let input = events(values);
        let res = run(&input);

        prop_assert_eq!(res.total_events, input.len());
        prop_assert_eq!(res.error_count + res.warning_count, res.issues.len());
        prop_assert!(res.top_person_event_counts.len() <= TOP_N);
        prop_assert!(res.top_proximity_pairs.len() <= TOP_N);
        let counted: usize = res.event_type_counts.iter().map(|kc| kc.count).sum();
        prop_assert_eq!(counted, input.len());
        for issue in &res.issues {
            prop_assert!(issue.event_index < input.len());
            prop_assert_eq!(issue.severity, issue.code.severity());
        }
        for pair in &res.top_proximity_pairs {
            let (a, b) = pair.pair.split_once('-').unwrap_or(("", ""));
            if let (Ok(a), Ok(b)) = (a.parse::<i64>(), b.parse::<i64>()) {
                prop_assert!(a <= b);
            }
        }
    }
}
