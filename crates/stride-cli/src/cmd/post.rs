use crate::output::{print_json, print_table};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::path::Path;
use stride_core::activity::{self, NewPost};
use stride_core::types::TaskCategory;

#[derive(Subcommand)]
pub enum PostSubcommand {
    /// Record a published post
    Record {
        tenant: String,
        /// Post title
        #[arg(long)]
        title: String,
        /// Publication instant (RFC 3339, default: now)
        #[arg(long)]
        published_at: Option<DateTime<Utc>>,
        /// Categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<TaskCategory>,
        /// Keywords (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Strategy slug the classifier matched this post to
        #[arg(long)]
        strategy: Option<String>,
    },
    /// List recorded posts
    List { tenant: String },
}

pub fn run(root: &Path, subcmd: PostSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PostSubcommand::Record {
            tenant,
            title,
            published_at,
            categories,
            keywords,
            strategy,
        } => {
            let id = activity::record_post(
                root,
                &tenant,
                NewPost {
                    title,
                    published_at: published_at.unwrap_or_else(Utc::now),
                    categories,
                    keywords,
                    strategy,
                },
            )?;
            if json {
                print_json(&serde_json::json!({ "post_id": id }))?;
            } else {
                println!("Recorded post {id}");
            }
            Ok(())
        }
        PostSubcommand::List { tenant } => {
            let posts = activity::list_posts(root, &tenant)?;
            if json {
                return print_json(&posts);
            }
            let rows = posts
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.title.clone(),
                        p.published_at.format("%Y-%m-%d").to_string(),
                        p.strategy.clone().unwrap_or_else(|| "-".into()),
                    ]
                })
                .collect();
            print_table(&["ID", "TITLE", "PUBLISHED", "STRATEGY"], rows);
            Ok(())
        }
    }
}
