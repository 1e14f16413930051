use crate::utils::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Container formats accepted for inline submission.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov", ".mkv", ".flv", ".wmv", ".webm"];

/// Prefix shared by every per-request scratch directory.
pub const SCRATCH_PREFIX: &str = "zai-video-";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Lowercased extension including the leading dot, e.g. `.mp4`.
pub fn extension_with_dot(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Size in megabytes rounded to two decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let size = bytes as f64;
    let unit_index = (size.log(THRESHOLD) as usize).min(UNITS.len() - 1);
    let size_in_unit = size / THRESHOLD.powi(unit_index as i32);

    format!("{:.2} {}", size_in_unit, UNITS[unit_index])
}

/// A fresh, collision-free scratch directory path under `root`.
pub fn generate_scratch_dir<P: AsRef<Path>>(root: P) -> PathBuf {
    root.as_ref()
        .join(format!("{}{}", SCRATCH_PREFIX, Uuid::new_v4()))
}

/// Scratch directories left behind under `root` by interrupted runs.
pub fn find_leftover_scratch<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut leftovers = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(SCRATCH_PREFIX) && entry.path().is_dir() {
            leftovers.push(entry.path());
        }
    }
    leftovers.sort();

    Ok(leftovers)
}
