//! Service liveness probe.

use vigil_core::{Console, ConsoleConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(config: ConsoleConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let url = config.url.clone();
    let health = Console::oneshot(config, |console| async move {
        console.health().await
    })
    .await?;

    match global.output() {
        OutputFormat::Table => {
            if !global.quiet {
                println!("✓ {url} is {}", health.status);
            }
        }
        format => {
            let out = output::render_single(
                &format,
                &health,
                |_| String::new(),
                |h| h.status.clone(),
            );
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}
