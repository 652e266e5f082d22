use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdenoise_core::io::image_io::save_color_tiff;
use tdenoise_core::pipeline::Denoiser;

use super::params::ParamArgs;
use crate::inputs::collect_sequence;
use crate::summary::print_denoise_summary;

#[derive(Args)]
pub struct PreviewArgs {
    /// Input files, directories or SER videos
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Frame to preview; defaults to the middle of the sequence
    #[arg(short, long)]
    pub index: Option<usize>,

    /// Directory for the before/after TIFF pair
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub params: ParamArgs,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config = args.params.resolve()?;
    let sequence = collect_sequence(&args.inputs)?;
    let output_dir = args
        .output
        .clone()
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    print_denoise_summary("Preview", sequence.len(), &config.params, &output_dir);

    let index = args.index.unwrap_or(sequence.len() / 2);
    let preview = Denoiser::default()
        .preview(&sequence, index, &config.params)
        .context("Preview failed")?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let stem = sequence
        .get(preview.index)
        .map(|id| id.stem())
        .unwrap_or_else(|| format!("frame_{:05}", preview.index));
    let original_path = output_dir.join(format!("{stem}_original.tiff"));
    let denoised_path = output_dir.join(format!("{stem}_denoised.tiff"));
    save_color_tiff(&preview.original, &original_path)?;
    save_color_tiff(&preview.denoised, &denoised_path)?;

    println!("Frame {} of {}", preview.index, sequence.len());
    println!("  Original:  {}", original_path.display());
    println!("  Denoised:  {}", denoised_path.display());

    Ok(())
}
