//! Human and machine renderings of an analysis run

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::analytics::{Analysis, KeyCount, StatSummary};
use crate::error::Result;
use crate::input::StreamSummary;

const HEADLINE: &str = "AI JSON Analysis Report";

/// Render the plain-text report.
///
/// `max_issues` limits how many issues are listed (0 lists all); the
/// analysis itself is never altered.
pub fn render_text(
    analysis: &Analysis,
    files: &[PathBuf],
    stream: Option<&StreamSummary>,
    max_issues: usize,
) -> String {
    TextReport {
        analysis,
        files,
        stream,
        max_issues,
    }
    .to_string()
}

/// Render `{ files, stream?, result }` as pretty JSON
pub fn render_json(
    analysis: &Analysis,
    files: &[PathBuf],
    stream: Option<&StreamSummary>,
) -> Result<String> {
    let report = JsonReport {
        files,
        stream,
        result: analysis,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render only the stream inventory
pub fn render_inventory(stream: &StreamSummary) -> String {
    let mut out = String::new();
    for line in inventory_lines(stream) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [PathBuf],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<&'a StreamSummary>,
    result: &'a Analysis,
}

struct TextReport<'a> {
    analysis: &'a Analysis,
    files: &'a [PathBuf],
    stream: Option<&'a StreamSummary>,
    max_issues: usize,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.analysis;

        writeln!(f, "{HEADLINE}")?;
        writeln!(f, "{}", "=".repeat(HEADLINE.len()))?;
        writeln!(f, "Files: {}", self.files.len())?;
        for file in self.files {
            writeln!(f, "- {}", file.display())?;
        }
        writeln!(f)?;

        if let Some(stream) = self.stream {
            for line in inventory_lines(stream) {
                writeln!(f, "{line}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Total Events: {}", a.total_events)?;
        writeln!(
            f,
            "Unique Person IDs: {} | Global IDs: {} | Track IDs: {}",
            a.unique_person_ids, a.unique_global_ids, a.unique_track_ids
        )?;
        writeln!(
            f,
            "Validation: {} errors, {} warnings",
            a.error_count, a.warning_count
        )?;
        writeln!(f)?;

        write_counts(f, "Event Types", &a.event_type_counts, true)?;
        write_counts(f, "Stream Classes", &a.stream_class_counts, false)?;
        write_counts(f, "Stream Cameras", &a.stream_camera_counts, false)?;
        write_counts(f, "Rooms", &a.room_counts, false)?;
        write_counts(f, "Cameras", &a.camera_counts, false)?;

        write_stats(f, "Confidence Stats", &a.confidence)?;
        write_stats(f, "Frame Age Seconds", &a.frame_age_seconds)?;
        write_stats(f, "Transport Delay Seconds", &a.transport_delay)?;

        write_counts(f, "Top Person Event Counts", &a.top_person_event_counts, false)?;
        if !a.top_proximity_pairs.is_empty() {
            writeln!(f, "Top Proximity Pairs")?;
            for pc in &a.top_proximity_pairs {
                writeln!(f, "- {:<28} {}", pc.pair, pc.count)?;
            }
            writeln!(f)?;
        }

        if a.issues.is_empty() {
            return Ok(());
        }
        writeln!(f, "Issues")?;
        let limit = match self.max_issues {
            0 => a.issues.len(),
            n => n.min(a.issues.len()),
        };
        for issue in &a.issues[..limit] {
            writeln!(
                f,
                "- [{}] {} (event #{}, type={}): {}",
                issue.severity.as_str().to_uppercase(),
                issue.code,
                issue.event_index,
                issue.event_type,
                issue.message
            )?;
        }
        if limit < a.issues.len() {
            writeln!(f, "- ... {} more issues not shown", a.issues.len() - limit)?;
        }
        Ok(())
    }
}

fn write_counts(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    counts: &[KeyCount],
    always: bool,
) -> fmt::Result {
    if counts.is_empty() && !always {
        return Ok(());
    }
    writeln!(f, "{title}")?;
    for kc in counts {
        writeln!(f, "- {:<28} {}", kc.key, kc.count)?;
    }
    writeln!(f)
}

fn write_stats(f: &mut fmt::Formatter<'_>, title: &str, s: &StatSummary) -> fmt::Result {
    writeln!(f, "{title} (min/avg/p50/p95/max)")?;
    writeln!(
        f,
        "- {:.4} / {:.4} / {:.4} / {:.4} / {:.4}",
        s.min, s.avg, s.p50, s.p95, s.max
    )?;
    writeln!(f)
}

fn inventory_lines(stream: &StreamSummary) -> Vec<String> {
    let mut lines = vec![
        "Stream Inventory".to_string(),
        format!("- Config: {}", stream.config_path.display()),
        format!(
            "- Classes: {} | Images: {} | Event Files: {}",
            stream.total_classes, stream.total_images, stream.total_event_files
        ),
    ];
    for class in &stream.classes {
        lines.push(format!("- Class {} ({})", class.class_id, class.name));
        for cam in &class.cameras {
            lines.push(format!(
                "  camera={} images={} event_files={} events={}",
                cam.id, cam.image_count, cam.event_file_count, cam.event_count
            ));
        }
    }
    lines
}
