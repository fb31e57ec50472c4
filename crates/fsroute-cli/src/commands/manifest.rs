use anyhow::{Context, Result};
use fsroute::{get_server_manifest, load_static_params};

use crate::project::Project;

/// Print the server manifest as JSON
pub async fn execute(project: &Project, static_params: bool) -> Result<()> {
    let mut root = project.routes()?;

    if static_params {
        root = load_static_params(root)
            .await
            .context("Failed to expand static params")?;
    }

    let manifest = get_server_manifest(&root);
    println!("{}", serde_json::to_string_pretty(&manifest)?);

    Ok(())
}
