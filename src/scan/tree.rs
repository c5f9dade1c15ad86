//! Directory tree rendering.

use std::cmp::Ordering;
use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;

/// One visible entry below the root, in walk order.
struct Node {
    depth: usize,
    name: String,
    is_last: bool,
}

/// Render `root` as an indented tree with box-drawing connectors.
///
/// Directories come before files, then names sort case-insensitively.
/// Entries whose name is in the ignore list are omitted entirely, and
/// directories that cannot be read are shown without children.
pub fn render(root: &Path, config: &ScanConfig) -> String {
    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string());

    let mut lines = vec![format!("{}/", name)];

    // One flag per open ancestor: was it the last child at its depth
    let mut ancestors_last: Vec<bool> = Vec::new();
    for node in collect_nodes(root, config) {
        ancestors_last.truncate(node.depth - 1);
        let mut line: String = ancestors_last
            .iter()
            .map(|&last| if last { "    " } else { "│   " })
            .collect();
        line.push_str(if node.is_last { "└── " } else { "├── " });
        line.push_str(&node.name);
        lines.push(line);
        ancestors_last.push(node.is_last);
    }

    lines.join("\n")
}

fn tree_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_name = a.file_name().to_string_lossy();
    let b_name = b.file_name().to_string_lossy();
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
        .then_with(|| a_name.cmp(&b_name))
}

fn collect_nodes(root: &Path, config: &ScanConfig) -> Vec<Node> {
    // Symlinks are not followed so the tree cannot cycle
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(tree_order)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !config.is_ignored_dir(&e.file_name().to_string_lossy())
        });

    let mut nodes = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.depth() > 0 => nodes.push(Node {
                depth: entry.depth(),
                name: entry.file_name().to_string_lossy().into_owned(),
                is_last: false,
            }),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "skipping unreadable entry in tree"),
        }
    }

    mark_last_children(&mut nodes);
    nodes
}

/// Walking backwards, a node is the last child when no sibling was seen
/// since the walk last left its depth.
fn mark_last_children(nodes: &mut [Node]) {
    let mut sibling_follows: Vec<bool> = Vec::new();
    for node in nodes.iter_mut().rev() {
        sibling_follows.resize(node.depth + 1, false);
        node.is_last = !sibling_follows[node.depth];
        sibling_follows[node.depth] = true;
    }
}
