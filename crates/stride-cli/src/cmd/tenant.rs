use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use stride_core::tenant::Tenant;

#[derive(Subcommand)]
pub enum TenantSubcommand {
    /// Create a new tenant
    Create {
        slug: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Offset from UTC in minutes for month windows
        #[arg(long, default_value = "0")]
        utc_offset_minutes: i32,
    },
    /// List all tenants
    List,
}

pub fn run(root: &Path, subcmd: TenantSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TenantSubcommand::Create {
            slug,
            name,
            utc_offset_minutes,
        } => {
            let mut tenant = Tenant::create(root, slug, name)?;
            if utc_offset_minutes != 0 {
                tenant.utc_offset_minutes = utc_offset_minutes;
                tenant.save(root)?;
            }
            if json {
                print_json(&tenant)?;
            } else {
                println!("Created tenant '{}'", tenant.slug);
            }
            Ok(())
        }
        TenantSubcommand::List => {
            let tenants = Tenant::list(root)?;
            if json {
                return print_json(&tenants);
            }
            let rows = tenants
                .iter()
                .map(|t| {
                    vec![
                        t.slug.clone(),
                        t.name.clone(),
                        t.utc_offset_minutes.to_string(),
                        t.created_at.format("%Y-%m-%d").to_string(),
                    ]
                })
                .collect();
            print_table(&["SLUG", "NAME", "UTC_OFFSET", "CREATED"], rows);
            Ok(())
        }
    }
}
