//! Footage search: monitor-mode event search and Q&A (`--ask`).

use tabled::Tabled;

use vigil_api::models::{SearchMode, SearchRequest};
use vigil_core::{Console, ConsoleConfig, SearchOutcome, SearchRow};

use crate::cli::{GlobalOpts, OutputFormat, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Conf")]
    confidence: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&SearchRow> for ResultRow {
    fn from(row: &SearchRow) -> Self {
        Self {
            timestamp: row.timestamp.clone(),
            kind: row.kind.clone(),
            // Context summaries carry no meaningful confidence.
            confidence: if row.is_context {
                "-".into()
            } else {
                format!("{}%", row.confidence)
            },
            description: util::truncate(&row.description, 64),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: ConsoleConfig,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = args.query.join(" ");
    let mode = if args.ask {
        SearchMode::Ask
    } else {
        SearchMode::Monitor
    };

    let outcome = Console::oneshot(config, |console| async move {
        console
            .search(&SearchRequest {
                query: Some(query),
                video_id: args.video,
                mode: Some(mode),
                limit: args.limit,
                ..SearchRequest::default()
            })
            .await
    })
    .await?;

    render(&outcome, args.ask, global);
    Ok(())
}

fn render(outcome: &SearchOutcome, ask: bool, global: &GlobalOpts) {
    let format = global.output();

    match format {
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            let doc = serde_json::json!({
                "answer": outcome.answer,
                "results": outcome.rows,
            });
            let out = output::render_single(&format, &doc, |_| String::new(), |_| String::new());
            output::print_output(&out, global.quiet);
        }

        OutputFormat::Plain => {
            let out = outcome
                .rows
                .iter()
                .map(|r| format!("{}\t{}", r.timestamp, r.description))
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&out, global.quiet);
        }

        OutputFormat::Table => {
            // Q&A mode leads with the prose answer.
            if ask && !outcome.answer.is_empty() {
                output::print_output(&outcome.answer, global.quiet);
            }
            if outcome.rows.is_empty() {
                if !ask && !global.quiet {
                    eprintln!("No matches.");
                }
                return;
            }
            let out = output::render_list(
                &OutputFormat::Table,
                &outcome.rows,
                |r| ResultRow::from(r),
                |r| r.timestamp.clone(),
            );
            output::print_output(&out, global.quiet);
        }
    }
}
