use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use stride_core::strategy::Strategy;
use stride_core::types::TaskCategory;

#[derive(Subcommand)]
pub enum StrategySubcommand {
    /// Create a new strategy
    Create {
        tenant: String,
        slug: String,
        /// Strategy title
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Covered categories (repeatable: --category content --category email)
        #[arg(long = "category")]
        categories: Vec<TaskCategory>,
        /// Keywords (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// List a tenant's strategies
    List { tenant: String },
    /// Show strategy details and its tasks
    Info { tenant: String, slug: String },
    /// Activate a strategy (archives any other active one)
    Activate { tenant: String, slug: String },
    /// Pause a strategy
    Pause { tenant: String, slug: String },
}

pub fn run(root: &Path, subcmd: StrategySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        StrategySubcommand::Create {
            tenant,
            slug,
            title,
            description,
            categories,
            keywords,
        } => {
            let mut strategy = Strategy::create(root, &tenant, slug, title)?;
            strategy.description = description;
            strategy.categories = categories;
            strategy.keywords = keywords;
            strategy.touch();
            strategy.save(root, &tenant)?;
            if json {
                print_json(&strategy)?;
            } else {
                println!("Created strategy '{}' for tenant '{tenant}'", strategy.slug);
            }
            Ok(())
        }
        StrategySubcommand::List { tenant } => {
            let strategies = Strategy::list(root, &tenant)?;
            if json {
                return print_json(&strategies);
            }
            let rows = strategies
                .iter()
                .map(|s| {
                    vec![
                        s.slug.clone(),
                        s.title.clone(),
                        s.status.to_string(),
                        stride_core::task::summarize(&s.tasks),
                    ]
                })
                .collect();
            print_table(&["SLUG", "TITLE", "STATUS", "TASKS"], rows);
            Ok(())
        }
        StrategySubcommand::Info { tenant, slug } => {
            let strategy = Strategy::load(root, &tenant, &slug)?;
            if json {
                return print_json(&strategy);
            }
            println!("{} — {} [{}]", strategy.slug, strategy.title, strategy.status);
            if let Some(desc) = &strategy.description {
                println!("{desc}");
            }
            println!("{}", stride_core::task::summarize(&strategy.tasks));
            let mut tasks = strategy.tasks.clone();
            tasks.sort_by_key(|t| t.sort_order);
            let rows = tasks
                .iter()
                .map(|t| {
                    vec![
                        t.sort_order.to_string(),
                        t.id.clone(),
                        t.title.clone(),
                        t.category.to_string(),
                        t.status.to_string(),
                        t.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                        format!("{}%", t.progress),
                    ]
                })
                .collect();
            print_table(&["#", "ID", "TITLE", "CATEGORY", "STATUS", "DUE", "PROGRESS"], rows);
            Ok(())
        }
        StrategySubcommand::Activate { tenant, slug } => {
            let strategy = Strategy::activate(root, &tenant, &slug)?;
            if json {
                print_json(&strategy)?;
            } else {
                println!("Activated '{}' (other active strategies archived)", strategy.slug);
            }
            Ok(())
        }
        StrategySubcommand::Pause { tenant, slug } => {
            let strategy = Strategy::pause(root, &tenant, &slug)?;
            if json {
                print_json(&strategy)?;
            } else {
                println!("Paused '{}'", strategy.slug);
            }
            Ok(())
        }
    }
}
