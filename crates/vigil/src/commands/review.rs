//! Review lifecycle handlers: confirm, dismiss, detailed review.

use vigil_core::{Alert, Console, ConsoleConfig, ReviewOutcome};

use crate::cli::{GlobalOpts, OutputFormat, ReviewArgs, ReviewCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    config: ConsoleConfig,
    args: ReviewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReviewCommand::Confirm { id } => {
            let resolved = Console::oneshot(config, |console| async move {
                console.confirm(&id).await
            })
            .await?;
            report(&resolved, "confirmed", global);
            Ok(())
        }

        ReviewCommand::Dismiss { id } => {
            let resolved = Console::oneshot(config, |console| async move {
                console.dismiss(&id).await
            })
            .await?;
            report(&resolved, "dismissed", global);
            Ok(())
        }

        ReviewCommand::Submit {
            id,
            correct,
            incorrect,
            severity,
            notes,
        } => {
            if !correct && !incorrect {
                return Err(CliError::Validation {
                    field: "verdict".into(),
                    reason: "pass --correct or --incorrect".into(),
                });
            }

            let outcome = ReviewOutcome {
                was_correct: correct,
                severity: severity.map(util::severity),
                notes,
            };
            let resolved = Console::oneshot(config, |console| async move {
                console.submit_review(&id, &outcome).await
            })
            .await?;

            let verdict = if correct { "confirmed" } else { "dismissed" };
            report(&resolved, verdict, global);
            Ok(())
        }
    }
}

/// Print the resolved alert (structured formats) or a status line.
fn report(alert: &Alert, verdict: &str, global: &GlobalOpts) {
    match global.output() {
        OutputFormat::Table => {
            if !global.quiet {
                eprintln!("✓ Alert {} {verdict}", alert.id);
            }
        }
        OutputFormat::Plain => output::print_output(&alert.id, global.quiet),
        format => {
            let out = output::render_single(&format, alert, |_| String::new(), |a| a.id.clone());
            output::print_output(&out, global.quiet);
        }
    }
}
