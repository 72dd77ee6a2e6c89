use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use stride_core::feed::LocalFeed;
use stride_core::milestone::{self, Milestone};

#[derive(Subcommand)]
pub enum MilestoneSubcommand {
    /// List earned milestones
    List { tenant: String },
    /// Share a milestone to the feed
    Share { tenant: String, id: String },
}

pub fn run(root: &Path, subcmd: MilestoneSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        MilestoneSubcommand::List { tenant } => {
            let milestones = Milestone::list(root, &tenant)?;
            if json {
                return print_json(&milestones);
            }
            let rows = milestones
                .iter()
                .map(|m| {
                    vec![
                        m.id.clone(),
                        m.title.clone(),
                        m.achieved_at.format("%Y-%m-%d").to_string(),
                        if m.shared_to_feed { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "TITLE", "ACHIEVED", "SHARED"], rows);
            Ok(())
        }
        MilestoneSubcommand::Share { tenant, id } => {
            let feed = LocalFeed::new(root);
            let milestone = milestone::share(root, &tenant, &id, &feed)?;
            if json {
                print_json(&milestone)?;
            } else {
                println!("Shared '{}' to feed", milestone.title);
            }
            Ok(())
        }
    }
}
