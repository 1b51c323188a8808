//! Text rendering of layer trees.
//!
//! One line per node, indented two spaces per level:
//!
//! ```text
//! - [ ] Roads  (root/roads)
//!     [x] Highways  (root/roads/highways)
//! + [ ] Rivers  (root/rivers)
//! ```
//!
//! `-` marks an expanded folder, `+` a collapsed one.

use std::fmt::Write;

use layercatalog::node::DEFAULT_OPACITY;
use layercatalog::{LayerNode, LayerTree};

/// Render every node of `tree`.
pub fn render_tree(tree: &LayerTree) -> String {
    let mut out = String::new();
    for root in tree.children() {
        render_subtree(root, 0, &mut out);
    }
    out
}

fn render_subtree(node: &LayerNode, depth: usize, out: &mut String) {
    out.push_str(&format_node(node, depth));
    out.push('\n');
    for child in node.children() {
        render_subtree(child, depth + 1, out);
    }
}

/// Format a single node line at `depth`.
pub fn format_node(node: &LayerNode, depth: usize) -> String {
    let fold = match (node.is_folder(), node.is_expanded()) {
        (true, true) => '-',
        (true, false) => '+',
        (false, _) => ' ',
    };
    let mark = if node.is_selected() { "[x]" } else { "[ ]" };

    let mut line = format!(
        "{:indent$}{} {} {}  ({})",
        "",
        fold,
        mark,
        node.display_name(),
        node.key(),
        indent = depth * 2
    );
    if node.opacity() != DEFAULT_OPACITY {
        let _ = write!(line, " opacity={:.2}", node.opacity());
    }
    line
}
