//! Alert listing and live streaming.

use tabled::Tabled;
use tokio::sync::broadcast::error::RecvError;

use vigil_api::models::EventQuery;
use vigil_core::{Alert, Console, ConsoleConfig, TriageView};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Conf")]
    confidence: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            severity: a.severity.to_string(),
            timestamp: a.timestamp.clone(),
            kind: a.kind.clone(),
            confidence: format!("{}%", a.confidence),
            status: a.status.to_string(),
            id: a.id.clone(),
            description: util::truncate(&a.description, 48),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: ConsoleConfig,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List {
            severity,
            status,
            video,
            limit,
        } => {
            let view = Console::oneshot(config, |console| async move {
                let query = EventQuery {
                    status: status.map(|s| util::status_wire(s).to_string()),
                    video_id: video,
                    limit,
                    ..EventQuery::default()
                };
                console
                    .fetch_ranked(
                        &query,
                        &util::severity_filter(severity),
                        &util::status_filter(status),
                    )
                    .await
            })
            .await?;

            render_view(&view, global);
            Ok(())
        }

        AlertsCommand::Watch { video_id } => watch(config, &video_id, global).await,
    }
}

fn render_view(view: &TriageView, global: &GlobalOpts) {
    let format = global.output();

    // Table/plain get human messages for the empty cases; structured
    // formats always serialize the (possibly empty) list.
    if matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        match view {
            TriageView::Empty => {
                if !global.quiet {
                    eprintln!("No alerts.");
                }
                return;
            }
            TriageView::NoMatches { total } => {
                if !global.quiet {
                    eprintln!("No alerts match the filters ({total} total).");
                }
                return;
            }
            TriageView::Ranked(_) => {}
        }
    }

    let out = output::render_list(&format, view.alerts(), |a| AlertRow::from(a), |a| a.id.clone());
    output::print_output(&out, global.quiet);
}

/// Activate a live session and print alerts as they survive the merge.
async fn watch(
    config: ConsoleConfig,
    video_id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let console = Console::new(config)?;
    let mut merged = console.merged_alerts();
    console.activate(video_id).await?;

    let color = output::should_color(&global.color());
    let format = global.output();
    if !global.quiet {
        eprintln!("Watching alerts for {video_id} (Ctrl-C to stop)");
    }

    // Seed with the current ranked view so the operator starts with context.
    let seeded = console.triage_view(
        &vigil_core::SeverityFilter::All,
        &vigil_core::StatusFilter::All,
    );
    for alert in seeded.alerts() {
        print_live(alert, &format, color);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            alert = merged.recv() => match alert {
                Ok(alert) => print_live(&alert, &format, color),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "alert stream consumer lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    console.deactivate().await;
    Ok(())
}

fn print_live(alert: &Alert, format: &OutputFormat, color: bool) {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            println!("{}", output::render_json_compact(alert));
        }
        OutputFormat::Yaml => print!("{}", output::render_yaml(alert)),
        OutputFormat::Plain => println!("{}", alert.id),
        OutputFormat::Table => println!("{}", util::alert_line(alert, color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{AlertStatus, Severity};

    fn sample() -> Alert {
        Alert {
            id: "1".into(),
            kind: "Fight Detected".into(),
            timestamp: "0:42".into(),
            confidence: 82,
            severity: Severity::High,
            status: AlertStatus::Pending,
            description: "fight near entrance".into(),
            video_id: Some("vid1".into()),
            chunk_filename: None,
        }
    }

    #[test]
    fn list_renders_in_every_format() {
        let alerts = vec![sample()];
        for format in [
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::JsonCompact,
            OutputFormat::Yaml,
            OutputFormat::Plain,
        ] {
            let out =
                output::render_list(&format, &alerts, |a| AlertRow::from(a), |a| a.id.clone());
            assert!(out.contains('1'), "{format:?} output misses the id");
        }
    }

    #[test]
    fn table_rows_carry_the_display_fields() {
        let row = AlertRow::from(&sample());
        assert_eq!(row.severity, "HIGH");
        assert_eq!(row.confidence, "82%");
        assert_eq!(row.timestamp, "0:42");
    }
}
