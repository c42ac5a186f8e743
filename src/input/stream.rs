//! Stream inventory: classes of front/back camera recordings
//!
//! A `stream.json` file lists classes, each with a front and a back camera
//! whose images and event files live under a base directory. Loading a
//! stream tags every event with `stream_class_id` and `stream_camera_id`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{read_events, resolve_files, split_csv, Dataset};
use crate::error::{Error, Result};

pub const CAMERA_FRONT: &str = "front";
pub const CAMERA_BACK: &str = "back";

const DEFAULT_FILE_PATTERN: &str = "*.json";

/// Top-level `stream.json` layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassConfig {
    #[serde(default)]
    pub class_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_dir: String,
    #[serde(default)]
    pub cameras: Vec<CameraConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub images_dir: String,
    #[serde(default)]
    pub events_dir: String,
    #[serde(default)]
    pub file_pattern: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_globs: Vec<String>,
}

/// Stream config with every directory made absolute and checked
#[derive(Debug, Clone)]
pub struct ResolvedStream {
    pub config_path: PathBuf,
    pub config_dir: PathBuf,
    pub classes: Vec<ResolvedClass>,
}

#[derive(Debug, Clone)]
pub struct ResolvedClass {
    pub class_id: String,
    pub name: String,
    pub base_dir: PathBuf,
    pub cameras: Vec<ResolvedCamera>,
}

#[derive(Debug, Clone)]
pub struct ResolvedCamera {
    pub id: String,
    pub images_dir: PathBuf,
    pub events_dir: PathBuf,
    pub file_pattern: String,
    pub event_files: Vec<String>,
    pub event_globs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub config_path: PathBuf,
    pub total_classes: usize,
    pub total_images: usize,
    pub total_event_files: usize,
    pub classes: Vec<ClassSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub class_id: String,
    pub name: String,
    pub base_dir: PathBuf,
    pub cameras: Vec<CameraSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSummary {
    pub id: String,
    pub images_dir: PathBuf,
    pub event_dir: PathBuf,
    pub image_count: usize,
    pub event_files: Vec<PathBuf>,
    pub event_file_count: usize,
    pub event_count: usize,
}

/// Load every event file of every class and camera named by a stream config
pub async fn load_from_stream_config(path: &Path) -> Result<Dataset> {
    let resolved = resolve_stream_config(path)?;

    let mut events = Vec::new();
    let mut files = Vec::new();
    let mut summary = StreamSummary {
        config_path: resolved.config_path.clone(),
        total_classes: resolved.classes.len(),
        ..StreamSummary::default()
    };

    for class in &resolved.classes {
        let mut class_summary = ClassSummary {
            class_id: class.class_id.clone(),
            name: class.name.clone(),
            base_dir: class.base_dir.clone(),
            cameras: Vec::with_capacity(class.cameras.len()),
        };

        for camera in &class.cameras {
            let image_count = count_images(&camera.images_dir).map_err(|e| {
                Error::StreamConfig(format!(
                    "class {} camera {} images scan: {}",
                    class.class_id, camera.id, e
                ))
            })?;
            let event_files = resolve_camera_event_files(&resolved.config_dir, camera)?;

            let mut event_count = 0;
            for file in &event_files {
                let tagged = read_events(file).await?.into_iter().map(|ev| {
                    ev.with_field("stream_class_id", class.class_id.as_str())
                        .with_field("stream_camera_id", camera.id.as_str())
                });
                let before = events.len();
                events.extend(tagged);
                event_count += events.len() - before;
            }
            debug!(
                "Class {} camera {}: {} images, {} event files, {} events",
                class.class_id,
                camera.id,
                image_count,
                event_files.len(),
                event_count
            );

            summary.total_images += image_count;
            summary.total_event_files += event_files.len();
            files.extend(event_files.iter().cloned());
            class_summary.cameras.push(CameraSummary {
                id: camera.id.clone(),
                images_dir: camera.images_dir.clone(),
                event_dir: camera.events_dir.clone(),
                image_count,
                event_file_count: event_files.len(),
                event_files,
                event_count,
            });
        }
        summary.classes.push(class_summary);
    }

    info!(
        "Loaded stream {}: {} classes, {} images, {} event files",
        summary.config_path.display(),
        summary.total_classes,
        summary.total_images,
        summary.total_event_files
    );

    files.sort();
    Ok(Dataset {
        files,
        events,
        stream: Some(summary),
    })
}

/// Read a stream config and resolve every class and camera against disk
pub fn resolve_stream_config(path: &Path) -> Result<ResolvedStream> {
    let config_path = std::path::absolute(path)?;
    let data = std::fs::read(&config_path).map_err(|source| Error::Read {
        path: config_path.clone(),
        source,
    })?;
    let config: StreamConfig = serde_json::from_slice(&data).map_err(|e| {
        Error::StreamConfig(format!(
            "decode stream config {}: {}",
            config_path.display(),
            e
        ))
    })?;
    if config.classes.is_empty() {
        return Err(Error::StreamConfig(
            "stream config must contain at least one class".to_string(),
        ));
    }

    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut seen = HashSet::new();
    let mut classes = Vec::with_capacity(config.classes.len());
    for class in &config.classes {
        if class.class_id.trim().is_empty() {
            return Err(Error::StreamConfig(
                "class_id is required for each class".to_string(),
            ));
        }
        if !seen.insert(class.class_id.as_str()) {
            return Err(Error::StreamConfig(format!(
                "duplicate class_id {:?}",
                class.class_id
            )));
        }
        classes.push(resolve_class(&config_dir, class)?);
    }

    Ok(ResolvedStream {
        config_path,
        config_dir,
        classes,
    })
}

fn resolve_class(config_dir: &Path, class: &ClassConfig) -> Result<ResolvedClass> {
    let base_dir = or_default(&class.base_dir, || PathBuf::from(&class.class_id));
    let base_dir = join_relative(config_dir, base_dir);
    require_exists(&base_dir, || {
        format!("class {} base_dir {}", class.class_id, base_dir.display())
    })?;

    let mut camera_ids = HashSet::new();
    for camera in &class.cameras {
        if camera.id.trim().is_empty() {
            return Err(Error::StreamConfig(format!(
                "class {} has camera with empty id",
                class.class_id
            )));
        }
        if !camera_ids.insert(camera.id.as_str()) {
            return Err(Error::StreamConfig(format!(
                "class {} has duplicate camera id {}",
                class.class_id, camera.id
            )));
        }
    }

    let mut cameras = Vec::with_capacity(2);
    for camera_id in [CAMERA_FRONT, CAMERA_BACK] {
        let Some(camera) = class.cameras.iter().find(|c| c.id == camera_id) else {
            return Err(Error::StreamConfig(format!(
                "class {} must define {:?} and {:?} cameras",
                class.class_id, CAMERA_FRONT, CAMERA_BACK
            )));
        };

        let images_dir = or_default(&camera.images_dir, || base_dir.join(camera_id).join("images"));
        let images_dir = join_relative(config_dir, images_dir);
        require_exists(&images_dir, || {
            format!(
                "class {} camera {} images_dir {}",
                class.class_id,
                camera_id,
                images_dir.display()
            )
        })?;

        let events_dir = or_default(&camera.events_dir, || base_dir.join(camera_id).join("events"));
        let events_dir = join_relative(config_dir, events_dir);
        require_exists(&events_dir, || {
            format!(
                "class {} camera {} events_dir {}",
                class.class_id,
                camera_id,
                events_dir.display()
            )
        })?;

        let file_pattern = if camera.file_pattern.trim().is_empty() {
            DEFAULT_FILE_PATTERN.to_string()
        } else {
            camera.file_pattern.clone()
        };

        cameras.push(ResolvedCamera {
            id: camera_id.to_string(),
            images_dir,
            events_dir,
            file_pattern,
            event_files: camera.event_files.clone(),
            event_globs: camera.event_globs.clone(),
        });
    }

    Ok(ResolvedClass {
        class_id: class.class_id.clone(),
        name: class.name.clone(),
        base_dir,
        cameras,
    })
}

/// Explicit event files, extra globs, and the events directory pattern
pub fn resolve_camera_event_files(
    config_dir: &Path,
    camera: &ResolvedCamera,
) -> Result<Vec<PathBuf>> {
    let relative = |item: &str| {
        join_relative(config_dir, PathBuf::from(item))
            .to_string_lossy()
            .into_owned()
    };

    let paths: Vec<String> = camera
        .event_files
        .iter()
        .flat_map(|f| split_csv(f))
        .map(relative)
        .collect();
    let mut globs: Vec<String> = camera
        .event_globs
        .iter()
        .flat_map(|g| split_csv(g))
        .map(relative)
        .collect();
    globs.push(
        camera
            .events_dir
            .join(&camera.file_pattern)
            .to_string_lossy()
            .into_owned(),
    );

    resolve_files(&paths, &globs)
}

/// Count `.jpg`/`.jpeg` files below `root`, case-insensitively
pub fn count_images(root: &Path) -> std::result::Result<usize, walkdir::Error> {
    let mut count = 0;
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(".jpg") || name.ends_with(".jpeg") {
            count += 1;
        }
    }
    Ok(count)
}

fn or_default(value: &str, default: impl FnOnce() -> PathBuf) -> PathBuf {
    if value.trim().is_empty() {
        default()
    } else {
        PathBuf::from(value)
    }
}

fn join_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn require_exists(path: &Path, describe: impl FnOnce() -> String) -> Result<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|e| Error::StreamConfig(format!("{}: {}", describe(), e)))
}
