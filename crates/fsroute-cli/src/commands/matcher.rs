use anyhow::{Context, Result};
use colored::Colorize;
use fsroute::{get_server_manifest, load_static_params, CompiledManifest, MatchKind};

use crate::project::Project;

/// Resolve a request path the way a server would dispatch it
pub async fn execute(project: &Project, path: &str, static_params: bool) -> Result<()> {
    let mut root = project.routes()?;

    if static_params {
        root = load_static_params(root)
            .await
            .context("Failed to expand static params")?;
    }

    let matcher = CompiledManifest::new(&get_server_manifest(&root))
        .context("Failed to compile route matchers")?;

    let Some(found) = matcher.match_path(path) else {
        println!("{} {}", "No route matches".red().bold(), path);
        return Ok(());
    };

    let kind = match found.kind {
        MatchKind::Api => "api".green(),
        MatchKind::Html => "html".normal(),
        MatchKind::Rewrite => "rewrite".yellow(),
        MatchKind::NotFound => "not-found".red(),
    };

    println!("{} {}", "Matched".green().bold(), path);
    println!("  kind:   {}", kind);
    println!("  page:   {}", found.route.page);
    println!("  file:   {}", found.route.source_key);
    if let Some(destination) = &found.route.destination_source_key {
        println!("  serves: {}", destination.cyan());
    }
    for (name, value) in &found.params {
        println!("  {} = {}", name.cyan(), value);
    }

    Ok(())
}
