use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use stride_core::feed::LocalFeed;
use stride_core::report;

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Generate and show the monthly report
    Show {
        tenant: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Strategy slug (default: the active strategy)
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Share a stored monthly score to the feed
    Share {
        tenant: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        strategy: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: ReportSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ReportSubcommand::Show {
            tenant,
            year,
            month,
            strategy,
        } => {
            let report = report::generate(root, &tenant, strategy.as_deref(), year, month)?;
            if json {
                return print_json(&report);
            }

            println!(
                "{} — {year:04}-{month:02} — overall {}",
                report.strategy_title, report.score.overall
            );
            match report.trend {
                Some(delta) => println!("trend: {delta:+} vs previous month"),
                None => println!("trend: first report"),
            }
            print_table(
                &["FACTOR", "SCORE"],
                vec![
                    vec!["completion".into(), report.score.factors.completion.to_string()],
                    vec!["on_time".into(), report.score.factors.on_time.to_string()],
                    vec!["consistency".into(), report.score.factors.consistency.to_string()],
                    vec!["adherence".into(), report.score.factors.adherence.to_string()],
                    vec!["production".into(), report.score.factors.production.to_string()],
                ],
            );
            println!(
                "remaining: {} todo, {} in progress",
                report.remaining.todo, report.remaining.in_progress
            );
            if !report.new_milestones.is_empty() {
                for m in &report.new_milestones {
                    println!("new milestone: {} — {}", m.title, m.description);
                }
            }
            Ok(())
        }
        ReportSubcommand::Share {
            tenant,
            year,
            month,
            strategy,
        } => {
            let feed = LocalFeed::new(root);
            let score =
                report::share_score(root, &tenant, strategy.as_deref(), year, month, &feed)?;
            if json {
                print_json(&score)?;
            } else {
                println!(
                    "Shared {year:04}-{month:02} score ({}) to feed",
                    score.overall
                );
            }
            Ok(())
        }
    }
}
