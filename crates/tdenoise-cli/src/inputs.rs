use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tdenoise_core::frame::{FrameId, Sequence};
use tdenoise_core::io::ser::SerReader;
use tdenoise_core::io::{is_frame_file, is_ser_file};

/// Expand command-line inputs into a frame sequence.
///
/// Files keep the order given. A directory contributes its image and raw
/// files sorted by name; a SER file contributes every frame it holds.
pub fn collect_sequence(inputs: &[PathBuf]) -> Result<Sequence> {
    let mut ids = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_frame_file(path))
                .collect();
            files.sort();
            ids.extend(files.into_iter().map(FrameId::File));
        } else if is_ser_file(input) {
            let reader = SerReader::open(input)
                .with_context(|| format!("Failed to open SER file {}", input.display()))?;
            ids.extend((0..reader.frame_count()).map(|frame| FrameId::SerFrame {
                path: input.clone(),
                frame,
            }));
        } else if input.is_file() {
            ids.push(FrameId::File(input.clone()));
        } else {
            bail!("Input not found: {}", input.display());
        }
    }

    if ids.is_empty() {
        bail!("No frames found in the given inputs");
    }
    Ok(Sequence::new(ids))
}
