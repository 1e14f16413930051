use super::strategy::Strategy;
use crate::utils::filesystem::{bytes_to_mb, extension_with_dot, VIDEO_EXTENSIONS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .expect("URL pattern is a valid regex")
});

/// True for `http(s)` URLs with a domain, `localhost` or IPv4 host, or any
/// string that parses with both a scheme and a host. No network access.
pub fn is_url(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }

    if URL_REGEX.is_match(input) {
        return true;
    }

    match reqwest::Url::parse(input) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    File,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::File => "file",
        }
    }
}

/// What a single `stat` tells the router about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFacts {
    pub is_file: bool,
    pub len: u64,
}

/// Filesystem access used while routing.
pub trait FileProbe: Send + Sync {
    fn stat(&self, path: &Path) -> io::Result<FileFacts>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFiles;

impl FileProbe for LocalFiles {
    fn stat(&self, path: &Path) -> io::Result<FileFacts> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileFacts {
            is_file: metadata.is_file(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotFound { path: String },
    NotAFile { path: String },
    UnsupportedFormat { extension: String },
    /// Returned by `validate_file` only; `classify` turns it into an
    /// `UploadRecommend` decision and the router reuses the text as its warning.
    Oversize { size_mb: f64, max_mb: f64 },
    Unreadable { path: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file not found: {}", path),
            Self::NotAFile { path } => write!(f, "path is not a file: {}", path),
            Self::UnsupportedFormat { extension } => write!(
                f,
                "unsupported file format: '{}' (supported: {})",
                extension,
                VIDEO_EXTENSIONS.join(", ")
            ),
            Self::Oversize { size_mb, max_mb } => write!(
                f,
                "file too large: {} MB (maximum {} MB)",
                size_mb, max_mb
            ),
            Self::Unreadable { path, reason } => {
                write!(f, "cannot read file metadata for {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks existence, type, container extension and size with one `stat`.
pub fn validate_file(
    probe: &dyn FileProbe,
    path: &Path,
    max_file_size_mb: f64,
) -> Result<FileFacts, ValidationError> {
    let display = path.display().to_string();

    let facts = probe.stat(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ValidationError::NotFound {
            path: display.clone(),
        },
        _ => ValidationError::Unreadable {
            path: display.clone(),
            reason: e.to_string(),
        },
    })?;

    if !facts.is_file {
        return Err(ValidationError::NotAFile { path: display });
    }

    let extension = extension_with_dot(path).unwrap_or_default();
    if !VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedFormat { extension });
    }

    let size_mb = bytes_to_mb(facts.len);
    if size_mb > max_file_size_mb {
        return Err(ValidationError::Oversize {
            size_mb,
            max_mb: max_file_size_mb,
        });
    }

    Ok(facts)
}

/// Size thresholds, in MB, separating the inline strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingThresholds {
    pub small_file_mb: f64,
    pub large_file_mb: f64,
}

impl Default for RoutingThresholds {
    fn default() -> Self {
        Self {
            small_file_mb: 5.0,
            large_file_mb: 100.0,
        }
    }
}

impl RoutingThresholds {
    pub fn select(&self, size_mb: f64) -> Strategy {
        if size_mb <= self.small_file_mb {
            Strategy::Base64Small
        } else if size_mb <= self.large_file_mb {
            Strategy::Base64Large
        } else {
            Strategy::UploadRecommend
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputAnalysis {
    pub input: String,
    pub kind: InputKind,
    pub valid: bool,
    pub error: Option<String>,
    pub file_size_mb: Option<f64>,
    pub recommended_strategy: Option<Strategy>,
}

impl InputAnalysis {
    fn url(input: &str) -> Self {
        Self {
            input: input.to_string(),
            kind: InputKind::Url,
            valid: true,
            error: None,
            file_size_mb: None,
            recommended_strategy: Some(Strategy::UrlDirect),
        }
    }

    fn file(input: &str, size_mb: f64, strategy: Strategy) -> Self {
        Self {
            input: input.to_string(),
            kind: InputKind::File,
            valid: true,
            error: None,
            file_size_mb: Some(size_mb),
            recommended_strategy: Some(strategy),
        }
    }

    fn rejected(input: &str, error: &ValidationError) -> Self {
        Self {
            input: input.to_string(),
            kind: InputKind::File,
            valid: false,
            error: Some(error.to_string()),
            file_size_mb: None,
            recommended_strategy: None,
        }
    }
}

/// Classifies and validates one video reference.
///
/// Surrounding whitespace is dropped; the trimmed form is what the analysis
/// records and what is later read or sent.
pub fn classify(
    probe: &dyn FileProbe,
    thresholds: &RoutingThresholds,
    max_file_size_mb: f64,
    input: &str,
) -> InputAnalysis {
    let input = input.trim();
    if is_url(input) {
        return InputAnalysis::url(input);
    }

    match validate_file(probe, Path::new(input), max_file_size_mb) {
        Ok(facts) => {
            let size_mb = bytes_to_mb(facts.len);
            InputAnalysis::file(input, size_mb, thresholds.select(size_mb))
        }
        // Too big to inline is a recommendation, not a rejection
        Err(ValidationError::Oversize { size_mb, .. }) => {
            InputAnalysis::file(input, size_mb, Strategy::UploadRecommend)
        }
        Err(e) => InputAnalysis::rejected(input, &e),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory filesystem that counts every `stat`.
    #[derive(Default)]
    pub(crate) struct FakeFiles {
        entries: HashMap<String, FileFacts>,
        pub(crate) stats: AtomicUsize,
    }

    impl FakeFiles {
        pub(crate) fn with_file(mut self, path: &str, len: u64) -> Self {
            self.entries
                .insert(path.to_string(), FileFacts { is_file: true, len });
            self
        }

        pub(crate) fn with_dir(mut self, path: &str) -> Self {
            self.entries
                .insert(path.to_string(), FileFacts { is_file: false, len: 0 });
            self
        }

        pub(crate) fn stat_count(&self) -> usize {
            self.stats.load(Ordering::SeqCst)
        }
    }

    impl FileProbe for FakeFiles {
        fn stat(&self, path: &Path) -> io::Result<FileFacts> {
            self.stats.fetch_add(1, Ordering::SeqCst);
            self.entries
                .get(&path.display().to_string())
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    pub(crate) const MB: u64 = 1024 * 1024;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://cdn.example.com/clip.mp4"));
        assert!(is_url("http://example.com/video.mp4"));
        assert!(is_url("HTTP://EXAMPLE.COM"));
        assert!(is_url("http://localhost:8080/v.mp4"));
        assert!(is_url("http://192.168.1.10/v.mp4?sig=abc"));
        assert!(is_url("ftp://files.example.org/v.mp4"));

        assert!(!is_url(""));
        assert!(!is_url("clip.mp4"));
        assert!(!is_url("/home/user/videos/clip.mp4"));
        assert!(!is_url("C:\\Users\\test\\large_video.mp4"));
        assert!(!is_url("file:///tmp/clip.mp4"));
    }

    #[test]
    fn test_thresholds_boundaries() {
        let t = RoutingThresholds::default();
        assert_eq!(t.select(0.0), Strategy::Base64Small);
        assert_eq!(t.select(5.0), Strategy::Base64Small);
        assert_eq!(t.select(5.01), Strategy::Base64Large);
        assert_eq!(t.select(100.0), Strategy::Base64Large);
        assert_eq!(t.select(100.01), Strategy::UploadRecommend);
    }

    #[test]
    fn test_validate_file_errors() {
        let probe = FakeFiles::default()
            .with_file("notes.txt", 10)
            .with_dir("videos.mp4")
            .with_file("big.mp4", 200 * MB);

        assert!(matches!(
            validate_file(&probe, Path::new("missing.mp4"), 100.0),
            Err(ValidationError::NotFound { .. })
        ));
        assert!(matches!(
            validate_file(&probe, Path::new("videos.mp4"), 100.0),
            Err(ValidationError::NotAFile { .. })
        ));
        assert_eq!(
            validate_file(&probe, Path::new("notes.txt"), 100.0),
            Err(ValidationError::UnsupportedFormat {
                extension: ".txt".to_string()
            })
        );
        assert_eq!(
            validate_file(&probe, Path::new("big.mp4"), 100.0),
            Err(ValidationError::Oversize {
                size_mb: 200.0,
                max_mb: 100.0
            })
        );
    }

    #[test]
    fn test_validate_file_stats_once() {
        let probe = FakeFiles::default().with_file("clip.MOV", 3 * MB);
        let facts = validate_file(&probe, Path::new("clip.MOV"), 100.0).unwrap();
        assert_eq!(facts.len, 3 * MB);
        assert_eq!(probe.stat_count(), 1);
    }

    #[test]
    fn test_classify_url_never_touches_filesystem() {
        let probe = FakeFiles::default();
        let analysis = classify(
            &probe,
            &RoutingThresholds::default(),
            100.0,
            "https://cdn.example.com/clip.mp4",
        );

        assert_eq!(analysis.kind, InputKind::Url);
        assert!(analysis.valid);
        assert_eq!(analysis.recommended_strategy, Some(Strategy::UrlDirect));
        assert_eq!(probe.stat_count(), 0);
    }

    #[test]
    fn test_classify_trims_input() {
        let probe = FakeFiles::default().with_file("clip.mp4", 3 * MB);
        let t = RoutingThresholds::default();

        let url = classify(&probe, &t, 100.0, "\t https://cdn.example.com/clip.mp4 \r\n");
        assert_eq!(url.input, "https://cdn.example.com/clip.mp4");
        assert_eq!(url.kind, InputKind::Url);

        let file = classify(&probe, &t, 100.0, " clip.mp4\n");
        assert_eq!(file.input, "clip.mp4");
        assert_eq!(file.recommended_strategy, Some(Strategy::Base64Small));
    }

    #[test]
    fn test_classify_by_size() {
        let probe = FakeFiles::default()
            .with_file("small.mp4", 3 * MB)
            .with_file("medium.mkv", 40 * MB)
            .with_file("huge.mp4", 150 * MB);
        let t = RoutingThresholds::default();

        let small = classify(&probe, &t, 100.0, "small.mp4");
        assert_eq!(small.recommended_strategy, Some(Strategy::Base64Small));
        assert_eq!(small.file_size_mb, Some(3.0));

        let medium = classify(&probe, &t, 100.0, "medium.mkv");
        assert_eq!(medium.recommended_strategy, Some(Strategy::Base64Large));

        let huge = classify(&probe, &t, 100.0, "huge.mp4");
        assert!(huge.valid);
        assert_eq!(huge.recommended_strategy, Some(Strategy::UploadRecommend));
        assert_eq!(huge.file_size_mb, Some(150.0));
    }

    #[test]
    fn test_classify_rejects_invalid_file() {
        let probe = FakeFiles::default();
        let analysis = classify(&probe, &RoutingThresholds::default(), 100.0, "gone.mp4");

        assert_eq!(analysis.kind, InputKind::File);
        assert!(!analysis.valid);
        assert!(analysis.error.unwrap().contains("file not found"));
        assert_eq!(analysis.recommended_strategy, None);
    }

    #[test]
    fn test_lower_size_cap_routes_to_upload() {
        let probe = FakeFiles::default().with_file("medium.mp4", 60 * MB);
        let analysis = classify(&probe, &RoutingThresholds::default(), 50.0, "medium.mp4");
        assert_eq!(analysis.recommended_strategy, Some(Strategy::UploadRecommend));
    }
}
