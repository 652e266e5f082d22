use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdenoise_core::io::ser::SerReader;
use tdenoise_core::io::{is_ser_file, FileFrameSource, FrameSource};

use crate::inputs::collect_sequence;

/// Frame ids listed before the rest are elided.
const LISTED_FRAMES: usize = 10;

#[derive(Args)]
pub struct InfoArgs {
    /// Input files, directories or SER videos
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let sequence = collect_sequence(&args.inputs)?;

    for input in args.inputs.iter().filter(|p| is_ser_file(p)) {
        let reader = SerReader::open(input)?;
        let header = &reader.header;
        println!("SER:         {}", input.display());
        println!("  Layout:    {}", header.layout);
        println!("  Bit depth: {}", header.pixel_depth);
        println!("  Frames:    {}", header.frame_count);
        if !header.observer.is_empty() {
            println!("  Observer:  {}", header.observer);
        }
        if !header.telescope.is_empty() {
            println!("  Telescope: {}", header.telescope);
        }
        if !header.instrument.is_empty() {
            println!("  Camera:    {}", header.instrument);
        }
    }

    println!("Frames:      {}", sequence.len());

    if let Some(first) = sequence.get(0) {
        let color = FileFrameSource
            .decode(first)
            .with_context(|| format!("Failed to decode {first}"))?;
        let (h, w, _) = color.dim();
        println!("Dimensions:  {}x{}", w, h);
    }

    for (index, id) in sequence.iter().enumerate().take(LISTED_FRAMES) {
        println!("  {:>5}  {}", index, id);
    }
    if sequence.len() > LISTED_FRAMES {
        println!("  ...    {} more", sequence.len() - LISTED_FRAMES);
    }

    Ok(())
}
