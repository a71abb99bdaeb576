use std::path::Path;

use tracing::debug;

use crate::error::{Result, SpecError};
use crate::spec::types::Spec;

/// Parse and validate a spec document.
///
/// The document is a JSON array of
/// `{"startAt": int, "endWith": int, "regions": [{"x","y","w","h"}]}`.
/// Frame bounds are not checked here; masks clip regions to the frame.
pub fn parse_spec(document: &str) -> Result<Spec> {
    let spec: Spec = serde_json::from_str(document).map_err(|e| SpecError::Malformed {
        reason: e.to_string(),
    })?;

    for (i, item) in spec.items().iter().enumerate() {
        if item.start_frame == 0 {
            return Err(SpecError::ZeroStart { item: i }.into());
        }
        if item.start_frame > item.end_frame {
            return Err(SpecError::InvertedRange {
                item: i,
                start: item.start_frame,
                end: item.end_frame,
            }
            .into());
        }
        for (j, region) in item.regions.iter().enumerate() {
            if region.w == 0 || region.h == 0 {
                return Err(SpecError::EmptyRegion {
                    item: i,
                    region: j,
                    w: region.w,
                    h: region.h,
                }
                .into());
            }
        }
    }

    debug!("Parsed spec with {} items", spec.len());
    Ok(spec)
}

/// Read a spec document from disk and parse it
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<Spec> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|_| SpecError::ReadFailed {
        path: path.display().to_string(),
    })?;
    parse_spec(&content)
}
