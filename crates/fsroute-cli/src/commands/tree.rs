use anyhow::Result;
use colored::Colorize;
use fsroute::{RouteKind, RouteNode};

use crate::project::Project;

pub fn execute(project: &Project, json: bool) -> Result<()> {
    let root = project.routes()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&root)?);
        return Ok(());
    }

    println!("{} {}", "Routes in".green().bold(), project.app_dir.display());
    println!();
    print_node(&root, 0);

    if let Some(middleware) = &root.middleware {
        println!();
        println!("{} {}", "middleware".magenta(), middleware.source_key);
    }

    Ok(())
}

fn print_node(node: &RouteNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = if node.name.is_empty() { "/" } else { node.name.as_str() };

    let label = match node.kind {
        RouteKind::Layout => name.blue().bold(),
        RouteKind::Route => name.normal(),
        RouteKind::Api => name.green(),
        RouteKind::Rewrite => name.yellow(),
    };
    let label = if node.is_generated { label.dimmed() } else { label };

    let mut line = format!("{}{} {}", indent, label, node.source_key.dimmed());
    if let Some(destination) = &node.destination_source_key {
        line.push_str(&format!(" -> {}", destination.cyan()));
    }
    if let Some(initial) = &node.initial_route_name {
        line.push_str(&format!(" (initial: {})", initial.cyan()));
    }
    println!("{}", line);

    for child in &node.children {
        print_node(child, depth + 1);
    }
}
