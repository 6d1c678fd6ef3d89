//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use linkmd_entity::folder::TreeNode;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

fn print_json<T: Serialize + ?Sized>(value: &T, fallback: &str) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string());
    println!("{json}");
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items, "[]"),
    }
}

/// Print a single row in the selected format
pub fn print_item<T: Serialize + Tabled>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", Table::new(std::iter::once(item))),
        OutputFormat::Json => print_json(item, "{}"),
    }
}

/// Print any serializable value; tables fall back to pretty JSON.
pub fn print_value<T: Serialize>(value: &T) {
    print_json(value, "null");
}

/// Print a project tree as an indented outline, or as JSON.
pub fn print_tree(nodes: &[TreeNode], format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(nodes, "[]");
        return;
    }
    if nodes.is_empty() {
        println!("(empty)");
        return;
    }

    let mut stack: Vec<(&TreeNode, usize)> = nodes.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match node {
            TreeNode::Folder(folder) => {
                println!("{indent}{}/  [{}]", folder.name, folder.id);
                stack.extend(folder.children.iter().rev().map(|c| (c, depth + 1)));
            }
            TreeNode::File(doc) => {
                println!("{indent}{}  [{}]", doc.filename, doc.id);
            }
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
