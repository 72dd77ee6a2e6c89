use crate::output::{print_json, print_table};
use std::path::Path;
use stride_core::strategy::Strategy;
use stride_core::tenant::Tenant;
use stride_core::types::StrategyStatus;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let tenants = Tenant::list(root)?;

    if json {
        let mut entries = Vec::new();
        for tenant in &tenants {
            let strategies = Strategy::list(root, &tenant.slug)?;
            let active = strategies
                .iter()
                .find(|s| s.status == StrategyStatus::Active)
                .map(|s| s.slug.clone());
            entries.push(serde_json::json!({
                "slug": tenant.slug,
                "name": tenant.name,
                "strategies": strategies.len(),
                "active_strategy": active,
            }));
        }
        return print_json(&entries);
    }

    let mut rows = Vec::new();
    for tenant in &tenants {
        let strategies = Strategy::list(root, &tenant.slug)?;
        let active = strategies
            .iter()
            .find(|s| s.status == StrategyStatus::Active)
            .map(|s| s.slug.clone())
            .unwrap_or_else(|| "-".to_string());
        rows.push(vec![
            tenant.slug.clone(),
            tenant.name.clone(),
            strategies.len().to_string(),
            active,
        ]);
    }
    print_table(&["TENANT", "NAME", "STRATEGIES", "ACTIVE"], rows);
    Ok(())
}
