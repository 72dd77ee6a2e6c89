use crate::output::print_json;
use std::path::Path;
use stride_core::config::Config;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let project_name = match name {
        Some(n) => n.to_string(),
        None => root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stride".to_string()),
    };

    if stride_core::paths::config_path(root).exists() {
        anyhow::bail!("already initialized: {}", root.display());
    }

    stride_core::io::ensure_dir(&stride_core::paths::tenants_dir(root))?;
    let config = Config::new(&project_name);
    config.save(root)?;

    if json {
        print_json(&serde_json::json!({
            "project": project_name,
            "root": root.display().to_string(),
        }))?;
    } else {
        println!("Initialized stride project '{project_name}' in {}", root.display());
    }
    Ok(())
}
