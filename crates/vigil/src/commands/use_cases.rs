//! Monitoring preset catalog.

use tabled::Tabled;

use vigil_api::models::UseCase;
use vigil_core::{Console, ConsoleConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UseCaseRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Events")]
    events: String,
    #[tabled(rename = "Context")]
    context: String,
}

impl From<&UseCase> for UseCaseRow {
    fn from(uc: &UseCase) -> Self {
        Self {
            key: uc.key.clone(),
            name: uc.name.clone(),
            events: uc.events.join(", "),
            context: util::truncate(&uc.context, 48),
        }
    }
}

pub async fn handle(config: ConsoleConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let presets = Console::oneshot(config, |console| async move {
        console.use_cases().await
    })
    .await?;

    let out = output::render_list(
        &global.output(),
        &presets,
        |uc| UseCaseRow::from(uc),
        |uc| uc.key.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
