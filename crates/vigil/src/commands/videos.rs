//! Video session detail and processing progress.

use vigil_api::models::{ProcessingStatus, VideoDetail};
use vigil_core::{Console, ConsoleConfig};

use crate::cli::{GlobalOpts, VideosArgs, VideosCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    config: ConsoleConfig,
    args: VideosArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VideosCommand::Show { id } => {
            let detail = Console::oneshot(config, |console| async move {
                console.video(&id).await
            })
            .await?;

            let out = output::render_single(
                &global.output(),
                &detail,
                video_detail,
                |v| v.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VideosCommand::Processing { id } => {
            let status = Console::oneshot(config, |console| async move {
                console.processing(&id).await
            })
            .await?;

            let out = output::render_single(
                &global.output(),
                &status,
                processing_detail,
                |s| format!("{:.0}", s.progress),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn video_detail(v: &VideoDetail) -> String {
    let mut lines = vec![format!("Video:     {}", v.id)];
    if let Some(ref name) = v.original_name {
        lines.push(format!("Name:      {name}"));
    }
    if let Some(ref use_case) = v.use_case {
        lines.push(format!("Use case:  {use_case}"));
    }
    if let Some(ref status) = v.status {
        lines.push(format!("Status:    {status}"));
    }
    if let Some(duration) = v.duration_seconds {
        lines.push(format!("Duration:  {duration:.0}s"));
    }
    if let (Some(done), Some(total)) = (v.chunks_processed, v.chunk_count) {
        lines.push(format!("Chunks:    {done}/{total}"));
    }
    lines.join("\n")
}

fn processing_detail(s: &ProcessingStatus) -> String {
    format!(
        "Progress: {:.0}%\nChunks:   {} analyzed, {} total, {} failed",
        s.progress, s.chunks_analyzed, s.total_chunks, s.failed_chunks,
    )
}
