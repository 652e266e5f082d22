use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tdenoise_core::error::{DenoiseError, Result as DenoiseResult};
use tdenoise_core::pipeline::{CancelToken, Denoiser, ExportSummary};
use tracing::debug;

use super::params::ParamArgs;
use crate::inputs::collect_sequence;
use crate::summary::{print_denoise_summary, print_export_result};

#[derive(Args)]
pub struct ExportArgs {
    /// Input files, directories or SER videos
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory; falls back to the config file, then `denoised`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub params: ParamArgs,
}

/// Messages relayed from the export worker to the progress bar.
enum WorkerMessage {
    Progress { done: usize, total: usize },
    Finished(DenoiseResult<ExportSummary>),
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let config = args.params.resolve()?;
    let sequence = collect_sequence(&args.inputs)?;
    let output_dir = args
        .output
        .clone()
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from("denoised"));
    let params = config.params;

    print_denoise_summary("Temporal Denoise", sequence.len(), &params, &output_dir);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("Failed to install Ctrl-C handler")?;

    let pb = ProgressBar::new(sequence.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}/{len} ({eta})")?
            .progress_chars("=> "),
    );
    pb.set_message("Denoising");

    let (tx, rx) = mpsc::channel();
    let worker_dir = output_dir.clone();
    let worker = std::thread::Builder::new()
        .name("tdenoise-export".into())
        .spawn(move || {
            let progress_tx = tx.clone();
            let result = Denoiser::default().export(
                &sequence,
                &worker_dir,
                &params,
                &cancel,
                |done, total| {
                    let _ = progress_tx.send(WorkerMessage::Progress { done, total });
                },
            );
            let _ = tx.send(WorkerMessage::Finished(result));
        })
        .context("Failed to spawn export worker")?;
    debug!(frames = pb.length().unwrap_or(0), "export worker started");

    let mut outcome = None;
    for message in rx {
        match message {
            WorkerMessage::Progress { done, total } => {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            }
            WorkerMessage::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }
    worker
        .join()
        .map_err(|_| anyhow!("Export worker panicked"))?;

    match outcome {
        Some(Ok(summary)) => {
            pb.finish_with_message("Done");
            print_export_result(&summary, &output_dir);
            Ok(())
        }
        Some(Err(DenoiseError::Cancelled { completed, total })) => {
            pb.abandon_with_message("Cancelled");
            Err(anyhow!(
                "Export cancelled after {completed} of {total} frames; written files kept in {}",
                output_dir.display()
            ))
        }
        Some(Err(e)) => {
            pb.abandon_with_message("Failed");
            Err(e).context("Export failed")
        }
        None => {
            pb.abandon();
            Err(anyhow!("Export worker exited without a result"))
        }
    }
}
