use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::media::tool::MediaTool;

/// Joins per-batch clips and puts the source audio back on top
pub struct Reassembler<'a> {
    media: &'a dyn MediaTool,
}

impl<'a> Reassembler<'a> {
    pub fn new(media: &'a dyn MediaTool) -> Self {
        Self { media }
    }

    /// Concatenate the clips listed in `manifest` into `work_dir/joined.mp4`,
    /// then mux the audio of `source` over it into `work_dir/result.mp4`.
    pub fn reassemble(&self, source: &Path, manifest: &Path, work_dir: &Path) -> Result<PathBuf> {
        let joined = work_dir.join("joined.mp4");
        self.media.concat(manifest, &joined)?;
        info!("Concatenated batch clips into {:?}", joined);

        let result = work_dir.join("result.mp4");
        self.media.mux(source, &joined, &result)?;
        info!("Muxed source audio into {:?}", result);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMedia;
    use tempfile::tempdir;

    #[test]
    fn test_concat_then_mux() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("concat.txt");
        std::fs::write(&manifest, "file 'a.mp4'\n").unwrap();
        let source = dir.path().join("source.mp4");

        let media = FakeMedia::new(4, 8, 8);
        let result = Reassembler::new(&media)
            .reassemble(&source, &manifest, dir.path())
            .unwrap();

        assert_eq!(result, dir.path().join("result.mp4"));
        assert_eq!(
            media.calls(),
            vec![
                format!("concat {}", manifest.display()),
                format!("mux {} {}", source.display(), dir.path().join("joined.mp4").display()),
            ]
        );
    }

    #[test]
    fn test_concat_failure_skips_mux() {
        let dir = tempdir().unwrap();
        let media = FakeMedia::new(4, 8, 8).failing_concat();

        let result = Reassembler::new(&media).reassemble(
            &dir.path().join("source.mp4"),
            &dir.path().join("concat.txt"),
            dir.path(),
        );

        assert!(result.is_err());
        assert!(media.calls().iter().all(|c| !c.starts_with("mux")));
    }
}
