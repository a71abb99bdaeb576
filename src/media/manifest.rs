use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{MediaError, Result};

/// Ordered list of per-batch clips, stored in ffmpeg concat-demuxer syntax
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipManifest {
    clips: Vec<PathBuf>,
}

impl ClipManifest {
    pub fn new(clips: Vec<PathBuf>) -> Self {
        Self { clips }
    }

    pub fn clips(&self) -> &[PathBuf] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Render as `file '<path>'` lines
    pub fn render(&self) -> String {
        self.clips
            .iter()
            .map(|clip| format!("file '{}'\n", quote(&clip.display().to_string())))
            .collect()
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path.as_ref())?);
        file.write_all(self.render().as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Parse a manifest previously produced by [`ClipManifest::render`]
    pub fn parse(text: &str) -> Result<Self> {
        let mut clips = Vec::new();

        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let quoted = line
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .ok_or_else(|| MediaError::EncodeFailed {
                    reason: format!("manifest line {} is not a file entry: {}", n + 1, line),
                })?;
            clips.push(PathBuf::from(quoted.replace("'\\''", "'")));
        }

        Ok(Self { clips })
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }
}

fn quote(path: &str) -> String {
    path.replace('\'', "'\\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_in_order() {
        let manifest = ClipManifest::new(vec![
            PathBuf::from("/work/export/00000001.mp4"),
            PathBuf::from("/work/export/00000002.mp4"),
        ]);
        assert_eq!(
            manifest.render(),
            "file '/work/export/00000001.mp4'\nfile '/work/export/00000002.mp4'\n"
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let manifest = ClipManifest::new(vec![PathBuf::from("/tmp/it's/00000001.mp4")]);
        assert_eq!(manifest.render(), "file '/tmp/it'\\''s/00000001.mp4'\n");
        assert_eq!(ClipManifest::parse(&manifest.render()).unwrap(), manifest);
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("concat.txt");
        let manifest = ClipManifest::new((1..=3).map(|i| dir.path().join(format!("{:08}.mp4", i))).collect());

        manifest.write(&path).unwrap();
        let loaded = ClipManifest::read(&path).unwrap();
        assert_eq!(loaded.clips(), manifest.clips());
    }

    #[test]
    fn test_parse_rejects_other_directives() {
        assert!(ClipManifest::parse("duration 0.5\n").is_err());
    }
}
