use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Digits used for zero-padded frame identifiers
pub const FRAME_ID_WIDTH: usize = 8;

/// File extension shared by extracted frames and synthesized masks
pub const FRAME_EXTENSION: &str = "png";

/// 1-based frame number, rendered as a fixed-width file name like `00000042.png`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

impl FrameId {
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn file_name(&self) -> String {
        format!("{:0width$}.{}", self.0, FRAME_EXTENSION, width = FRAME_ID_WIDTH)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = FRAME_ID_WIDTH)
    }
}

/// A directory of numbered still images
#[derive(Debug, Clone)]
pub struct FrameStore {
    dir: PathBuf,
}

impl FrameStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// printf-style output pattern handed to the frame extractor
    pub fn output_pattern(&self) -> PathBuf {
        self.dir
            .join(format!("%0{}d.{}", FRAME_ID_WIDTH, FRAME_EXTENSION))
    }

    /// All images in the store, sorted by file name
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(FRAME_EXTENSION))
                .unwrap_or(false);

            if path.is_file() && is_image {
                entries.push(path);
            }
        }

        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(entries)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_id_file_name() {
        assert_eq!(FrameId::new(1).file_name(), "00000001.png");
        assert_eq!(FrameId::new(12345).to_string(), "00012345");
    }

    #[test]
    fn test_output_pattern() {
        let store = FrameStore::new("/tmp/frames");
        assert_eq!(store.output_pattern(), PathBuf::from("/tmp/frames/%08d.png"));
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["00000003.png", "00000001.png", "00000002.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("00000004.png")).unwrap();

        let store = FrameStore::new(dir.path());
        let names: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["00000001.png", "00000002.png", "00000003.png"]);
        assert_eq!(store.len().unwrap(), 3);
    }
}
