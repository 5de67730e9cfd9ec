//! Detection analytics: summary plus per-type accuracy table.

use chrono::NaiveDate;
use tabled::Tabled;

use vigil_api::models::{AnalyticsQuery, AnalyticsReport, EventTypeStat};
use vigil_core::{Console, ConsoleConfig};

use crate::cli::{AnalyticsArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Event Type")]
    event_type: String,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "Confirmed")]
    confirmed: u64,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
}

impl From<&EventTypeStat> for StatRow {
    fn from(stat: &EventTypeStat) -> Self {
        Self {
            event_type: stat.event_type.clone(),
            count: stat.count,
            confirmed: stat.confirmed,
            accuracy: format!("{:.0}%", stat.accuracy),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: ConsoleConfig,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = AnalyticsQuery {
        from_date: parse_date(args.from.as_deref(), "from")?,
        to_date: parse_date(args.to.as_deref(), "to")?,
        video_id: args.video,
    };

    let report = Console::oneshot(config, |console| async move {
        console.analytics(&query).await
    })
    .await?;

    render(&report, global);
    Ok(())
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, CliError> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("expected YYYY-MM-DD, got '{s}'"),
        })
    })
    .transpose()
}

fn render(report: &AnalyticsReport, global: &GlobalOpts) {
    let format = global.output();

    if matches!(format, OutputFormat::Plain) {
        let out = report
            .event_stats
            .iter()
            .map(|stat| format!("{}\t{}", stat.event_type, stat.count))
            .collect::<Vec<_>>()
            .join("\n");
        output::print_output(&out, global.quiet);
        return;
    }

    if !matches!(format, OutputFormat::Table) {
        let out = output::render_single(&format, report, |_| String::new(), |_| String::new());
        output::print_output(&out, global.quiet);
        return;
    }

    let s = &report.summary;
    let summary = format!(
        "Events: {}  Confirmed: {}  Dismissed: {}  AI accuracy: {:.0}%  Avg confidence: {:.0}%",
        s.total_events, s.confirmed, s.dismissed, s.ai_accuracy, s.avg_confidence,
    );
    output::print_output(&summary, global.quiet);

    if !report.event_stats.is_empty() {
        let out = output::render_list(
            &format,
            &report.event_stats,
            |stat| StatRow::from(stat),
            |stat| stat.event_type.clone(),
        );
        output::print_output(&out, global.quiet);
    }
}
