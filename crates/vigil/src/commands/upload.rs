//! Video upload with a progress spinner.

use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};

use vigil_core::{Console, ConsoleConfig};

use crate::cli::{GlobalOpts, OutputFormat, UploadArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    config: ConsoleConfig,
    args: UploadArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let metadata = std::fs::metadata(&args.path).map_err(|_| CliError::Validation {
        field: "path".into(),
        reason: format!("file not found: {}", args.path.display()),
    })?;
    if !metadata.is_file() {
        return Err(CliError::Validation {
            field: "path".into(),
            reason: format!("not a file: {}", args.path.display()),
        });
    }

    let spinner = upload_spinner(global, &args, metadata.len());

    let receipt = Console::oneshot(config, |console| async move {
        console.upload(&args.path, &args.use_case).await
    })
    .await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let receipt = receipt?;

    match global.output() {
        OutputFormat::Table => {
            if !global.quiet {
                eprintln!("✓ Uploaded as {} ({})", receipt.video_id, receipt.status);
                eprintln!("  Start analysis: vigil monitor start {}", receipt.video_id);
            }
        }
        format => {
            let out = output::render_single(
                &format,
                &receipt,
                |_| String::new(),
                |r| r.video_id.clone(),
            );
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}

/// A steady-tick spinner for interactive table output; suppressed for
/// quiet mode and structured formats.
fn upload_spinner(global: &GlobalOpts, args: &UploadArgs, size: u64) -> Option<ProgressBar> {
    if global.quiet || !matches!(global.output(), OutputFormat::Table) {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Uploading {} ({})",
        args.path.display(),
        ByteSize(size)
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
