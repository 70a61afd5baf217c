use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::domain::detector_loader::{DetectorLoadError, DetectorLoader};
use crate::detection::domain::object_detector::ObjectDetector;
use crate::shared::constants::{APP_DIR_NAME, CASCADE_FILE_NAME};

use super::haar_cascade::{CascadeError, HaarCascade};

/// Locate a cascade file by name.
///
/// Resolution order:
/// 1. `explicit`, when given (must exist, no fallback)
/// 2. The running executable's directory
/// 3. Per-user data directory (`<data dir>/FaceWatch/`)
pub fn resolve_cascade_path(
    name: &str,
    explicit: Option<&Path>,
) -> Result<PathBuf, DetectorLoadError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DetectorLoadError::NotFound {
            name: name.to_string(),
            searched: vec![path.to_path_buf()],
        });
    }

    let candidates: Vec<PathBuf> = search_dirs().into_iter().map(|d| d.join(name)).collect();
    find_first(name, candidates)
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs_to_search.push(exe_dir);
    }
    if let Some(data_dir) = dirs::data_dir() {
        dirs_to_search.push(data_dir.join(APP_DIR_NAME));
    }
    dirs_to_search
}

fn find_first(name: &str, candidates: Vec<PathBuf>) -> Result<PathBuf, DetectorLoadError> {
    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(DetectorLoadError::NotFound {
            name: name.to_string(),
            searched: candidates,
        }),
    }
}

/// Loads a Haar cascade from disk the first time the loop starts.
pub struct CascadeFileLoader {
    explicit: Option<PathBuf>,
    name: String,
}

impl CascadeFileLoader {
    /// Loader for the default frontal-face cascade, optionally at a fixed path.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            name: CASCADE_FILE_NAME.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn load_cascade(&self) -> Result<HaarCascade, DetectorLoadError> {
        let path = resolve_cascade_path(&self.name, self.explicit.as_deref())?;
        load_cascade_file(&path)
    }
}

impl DetectorLoader for CascadeFileLoader {
    fn load(&mut self) -> Result<Box<dyn ObjectDetector>, DetectorLoadError> {
        Ok(Box::new(self.load_cascade()?))
    }
}

/// Read and parse one cascade file.
pub fn load_cascade_file(path: &Path) -> Result<HaarCascade, DetectorLoadError> {
    let xml = fs::read_to_string(path).map_err(|e| DetectorLoadError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let cascade = HaarCascade::from_xml(&xml).map_err(|e| match e {
        CascadeError::Unsupported(reason) => DetectorLoadError::Unsupported {
            path: path.to_path_buf(),
            reason,
        },
        other => DetectorLoadError::Parse {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;
    log::info!(
        "Loaded cascade {} ({}x{} window, {} stages)",
        path.display(),
        cascade.window_size().0,
        cascade.window_size().1,
        cascade.stage_count()
    );
    Ok(cascade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TINY_CASCADE: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<cascade type_id="opencv-cascade-classifier">
  <stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>4</height>
  <width>4</width>
  <stages>
    <_>
      <stageThreshold>0.</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>0 -1 0 0.</internalNodes>
          <leafValues>-1. 1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>0 0 4 4 -1.</_>
        <_>0 0 2 4 2.</_></rects></_></features></cascade>
</opencv_storage>
"#;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "custom.xml", TINY_CASCADE);
        let resolved = resolve_cascade_path(CASCADE_FILE_NAME, Some(&path)).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn test_missing_explicit_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.xml");
        let err = resolve_cascade_path(CASCADE_FILE_NAME, Some(&missing)).unwrap_err();
        match err {
            DetectorLoadError::NotFound { searched, .. } => assert_eq!(searched, vec![missing]),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_find_first_prefers_earlier_candidates() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let a = write_file(first.path(), "c.xml", TINY_CASCADE);
        let b = write_file(second.path(), "c.xml", TINY_CASCADE);
        assert_eq!(find_first("c.xml", vec![a.clone(), b]).unwrap(), a);
    }

    #[test]
    fn test_find_first_falls_through_missing_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_file(dir.path(), "c.xml", TINY_CASCADE);
        let missing = dir.path().join("missing").join("c.xml");
        assert_eq!(
            find_first("c.xml", vec![missing, present.clone()]).unwrap(),
            present
        );
    }

    #[test]
    fn test_find_first_reports_every_searched_path() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![dir.path().join("a/c.xml"), dir.path().join("b/c.xml")];
        match find_first("c.xml", candidates.clone()).unwrap_err() {
            DetectorLoadError::NotFound { name, searched } => {
                assert_eq!(name, "c.xml");
                assert_eq!(searched, candidates);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_loader_builds_detector_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "tiny.xml", TINY_CASCADE);
        let mut loader = CascadeFileLoader::new(Some(path));
        assert!(loader.load().is_ok());
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.xml", "<opencv_storage><oops>");
        match load_cascade_file(&path).unwrap_err() {
            DetectorLoadError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_lbp_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let lbp = TINY_CASCADE.replace("HAAR", "LBP");
        let path = write_file(dir.path(), "lbp.xml", &lbp);
        assert!(matches!(
            load_cascade_file(&path).unwrap_err(),
            DetectorLoadError::Unsupported { .. }
        ));
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_cascade_file(dir.path()).unwrap_err(),
            DetectorLoadError::Read { .. }
        ));
    }

    #[test]
    fn test_default_name_is_frontal_face() {
        let loader = CascadeFileLoader::new(None);
        assert_eq!(loader.name, "haarcascade_frontalface_default.xml");
        let renamed = loader.with_name("haarcascade_eye.xml");
        assert_eq!(renamed.name, "haarcascade_eye.xml");
    }
}
