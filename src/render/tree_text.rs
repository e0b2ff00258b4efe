// src/render/tree_text.rs
// =============================================================================
// Draws a FileTreeNode sequence as box-drawing text:
//
//   ├── 📁 src
//   │   ├── 🦀 lib.rs
//   │   └── 🦀 main.rs
//   └── 📖 README.md
//
// Every sibling except the last gets "├── " and passes "│   " down to its
// children; the last gets "└── " and passes plain spaces. Sibling order is
// whatever the tree already has.
// =============================================================================

use std::fmt::Write;

use crate::github::FileTreeNode;

const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// Renders the whole tree, one line per node, each line ending in '\n'
pub fn render_tree(nodes: &[FileTreeNode]) -> String {
    let mut out = String::new();
    write_level(&mut out, nodes, "");
    out
}

fn write_level(out: &mut String, nodes: &[FileTreeNode], prefix: &str) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let connector = if last { CORNER } else { BRANCH };

        // Writing into a String cannot fail
        let _ = write!(out, "{}{}{} {}", prefix, connector, icon_for(node), node.name);
        if node.partial {
            out.push_str(" (partial)");
        }
        out.push('\n');

        if !node.children().is_empty() {
            let child_prefix = format!("{}{}", prefix, if last { BLANK } else { PIPE });
            write_level(out, node.children(), &child_prefix);
        }
    }
}

/// Picks an icon from the node kind, the README name, or the file extension
pub fn icon_for(node: &FileTreeNode) -> &'static str {
    if node.is_dir() {
        return "📁";
    }

    let lower = node.name.to_ascii_lowercase();
    if lower == "readme" || lower == "readme.md" {
        return "📖";
    }

    // A leading dot (".gitignore") is not an extension
    match lower.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => icon_for_extension(ext),
        _ => "📄",
    }
}

fn icon_for_extension(ext: &str) -> &'static str {
    match ext {
        "rs" => "🦀",
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => "📜",
        "py" => "🐍",
        "go" => "🐹",
        "java" | "kt" | "scala" => "☕",
        "rb" => "💎",
        "c" | "h" | "cpp" | "hpp" | "cc" => "🔧",
        "md" | "mdx" | "txt" | "rst" => "📝",
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "lock" => "⚙️",
        "html" | "css" | "scss" | "sass" => "🎨",
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" => "🖼️",
        "sh" | "bash" | "zsh" | "ps1" => "💻",
        _ => "📄",
    }
}
