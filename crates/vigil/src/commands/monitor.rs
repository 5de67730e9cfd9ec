//! Monitoring pipeline control: start, stop, status.

use vigil_api::models::{PipelineStatus, StartMonitoring};
use vigil_core::{Console, ConsoleConfig};

use crate::cli::{GlobalOpts, MonitorArgs, MonitorCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    config: ConsoleConfig,
    args: MonitorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MonitorCommand::Start {
            video_id,
            use_case,
            chunk_seconds,
        } => {
            let request = StartMonitoring {
                video_id: video_id.clone(),
                use_case,
                chunk_duration_seconds: chunk_seconds,
            };
            let receipt = Console::oneshot(config, |console| async move {
                console.start_monitoring(&request).await
            })
            .await?;

            if !global.quiet {
                eprintln!("✓ Monitoring {video_id}: {}", receipt.status);
                eprintln!("  Follow along: vigil alerts watch {video_id}");
            }
            Ok(())
        }

        MonitorCommand::Stop { video_id } => {
            if !util::confirm(
                &format!("Stop analysis for '{video_id}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            let id = video_id.clone();
            let receipt = Console::oneshot(config, |console| async move {
                console.stop_monitoring(&id).await
            })
            .await?;

            if !global.quiet {
                eprintln!("✓ Monitoring {video_id}: {}", receipt.status);
            }
            Ok(())
        }

        MonitorCommand::Status => {
            let status = Console::oneshot(config, |console| async move {
                console.pipeline_status().await
            })
            .await?;

            render_status(&status, global);
            Ok(())
        }
    }
}

fn render_status(status: &PipelineStatus, global: &GlobalOpts) {
    let format = global.output();

    if matches!(format, OutputFormat::Plain) {
        let out = status.active_jobs.join("\n");
        output::print_output(&out, global.quiet);
        return;
    }

    let out = output::render_single(
        &format,
        status,
        |s| {
            let jobs = if s.active_jobs.is_empty() {
                "(none)".to_string()
            } else {
                s.active_jobs.join(", ")
            };
            format!("Queue: {}\nActive: {jobs}", s.queue_size)
        },
        |s| s.queue_size.to_string(),
    );
    output::print_output(&out, global.quiet);
}
