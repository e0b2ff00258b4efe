// src/render/markdown.rs
// =============================================================================
// Builds the Markdown document for one repository.
//
// The document is a fixed list of sections. Each section is its own small
// function that returns Some(text) when it applies and None when it should
// be left out, e.g. the Description section only exists when the repository
// has a description. render_markdown_at() runs them in order and joins the
// results.
//
// No network, no storage, no clock: the generation time is passed in, so
// the same inputs always give the same text.
// =============================================================================

use std::collections::HashSet;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use super::format::{badge_text, long_date, thousands, timestamp};
use super::tree_text::render_tree;
use crate::error::{Result, ScribeError};
use crate::github::{walk, FileTreeNode, RepositoryMetadata};

/// How many distinct extensions the overview lists
const MAX_EXTENSIONS: usize = 10;

/// Everything a section may look at
pub struct RenderContext<'a> {
    pub meta: &'a RepositoryMetadata,
    pub tree: &'a [FileTreeNode],
    pub generated_at: DateTime<Utc>,
}

type Section = fn(&RenderContext) -> Option<String>;

// Order here is the order in the document
const SECTIONS: [(&str, Section); 8] = [
    ("header", header),
    ("description", description),
    ("badges", badges),
    ("info", info_table),
    ("structure", project_structure),
    ("overview", technical_overview),
    ("getting_started", getting_started),
    ("footer", footer),
];

/// Renders with the current time in the footer
pub fn render_markdown(meta: &RepositoryMetadata, tree: &[FileTreeNode]) -> Result<String> {
    render_markdown_at(meta, tree, Utc::now())
}

pub fn render_markdown_at(
    meta: &RepositoryMetadata,
    tree: &[FileTreeNode],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    if meta.name.trim().is_empty() || meta.html_url.trim().is_empty() {
        error!(full_name = %meta.full_name, "Metadata is missing a name or URL");
        return Err(ScribeError::RenderingFailure(
            "repository metadata has no name or URL".to_string(),
        ));
    }

    let ctx = RenderContext {
        meta,
        tree,
        generated_at,
    };

    let mut parts = Vec::with_capacity(SECTIONS.len());
    for (name, section) in SECTIONS {
        match section(&ctx) {
            Some(text) => parts.push(text),
            None => debug!(section = name, "Section omitted"),
        }
    }

    Ok(parts.join("\n"))
}

fn header(ctx: &RenderContext) -> Option<String> {
    let quote = ctx
        .meta
        .description
        .as_deref()
        .unwrap_or("No description provided.");
    // Every line is quoted; an unquoted line ends the blockquote
    let mut quoted: Vec<String> = quote
        .lines()
        .map(|line| format!("> {}", line).trim_end().to_string())
        .collect();
    if quoted.is_empty() {
        quoted.push(">".to_string());
    }
    Some(format!("# {}\n\n{}\n", ctx.meta.name, quoted.join("\n")))
}

fn description(ctx: &RenderContext) -> Option<String> {
    let text = ctx.meta.description.as_deref()?;
    Some(format!("## 📋 Description\n\n{}\n", text))
}

fn badges(ctx: &RenderContext) -> Option<String> {
    let meta = ctx.meta;
    let mut line = format!(
        "![Stars](https://img.shields.io/badge/stars-{}-yellow?style=flat-square) \
         ![Forks](https://img.shields.io/badge/forks-{}-blue?style=flat-square)",
        meta.stars_count, meta.forks_count
    );
    if let Some(language) = &meta.language {
        let _ = write!(
            line,
            " ![Language](https://img.shields.io/badge/language-{}-green?style=flat-square)",
            badge_text(language)
        );
    }
    Some(format!("## 🏷️ Badges\n\n{}\n", line))
}

fn info_table(ctx: &RenderContext) -> Option<String> {
    let meta = ctx.meta;
    let rows = [
        ("Full Name", format!("[{}]({})", meta.full_name, meta.html_url)),
        ("Default Branch", format!("`{}`", meta.default_branch)),
        (
            "Primary Language",
            meta.language.clone().unwrap_or_else(|| "Not specified".to_string()),
        ),
        ("Stars", thousands(meta.stars_count)),
        ("Forks", thousands(meta.forks_count)),
        ("Created", long_date(&meta.created_at)),
        ("Last Updated", long_date(&meta.updated_at)),
    ];

    let mut out = String::from("## 📊 Repository Information\n\n| Property | Value |\n|----------|-------|\n");
    for (label, value) in rows {
        let _ = writeln!(out, "| {} | {} |", label, value);
    }
    Some(out)
}

fn project_structure(ctx: &RenderContext) -> Option<String> {
    let body = if ctx.tree.is_empty() {
        "_No files were found in this repository._\n".to_string()
    } else {
        format!("```text\n{}/\n{}```\n", ctx.meta.name, render_tree(ctx.tree))
    };
    Some(format!("## 📁 Project Structure\n\n{}", body))
}

fn technical_overview(ctx: &RenderContext) -> Option<String> {
    if ctx.tree.is_empty() {
        return None;
    }

    let stats = TreeStats::collect(ctx.tree);
    let types = if stats.extensions.is_empty() {
        "none detected".to_string()
    } else {
        stats
            .extensions
            .iter()
            .map(|ext| format!("`.{}`", ext))
            .collect::<Vec<_>>()
            .join(", ")
    };

    Some(format!(
        "## 🔍 Technical Overview\n\n\
         - **Total files:** {}\n\
         - **Total directories:** {}\n\
         - **File types:** {}\n",
        thousands(stats.files as u64),
        thousands(stats.directories as u64),
        types
    ))
}

fn getting_started(ctx: &RenderContext) -> Option<String> {
    let meta = ctx.meta;
    Some(format!(
        "## 🚀 Getting Started\n\n\
         ```bash\n\
         git clone {url}.git\n\
         cd {name}\n\
         ```\n\n\
         Check the repository's own README for build and usage instructions.\n\n\
         ## 🤝 Contributing\n\n\
         1. Fork the repository\n\
         2. Create a feature branch (`git checkout -b feature/my-change`)\n\
         3. Commit your changes\n\
         4. Open a pull request against `{branch}`\n",
        url = meta.html_url.trim_end_matches('/'),
        name = meta.name,
        branch = meta.default_branch,
    ))
}

fn footer(ctx: &RenderContext) -> Option<String> {
    Some(format!(
        "---\n\n*Generated on {} from [{}]({})*\n",
        timestamp(&ctx.generated_at),
        ctx.meta.full_name,
        ctx.meta.html_url
    ))
}

/// Counts gathered by one full traversal of the tree
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub files: usize,
    pub directories: usize,
    /// First MAX_EXTENSIONS distinct extensions, in traversal order
    pub extensions: Vec<String>,
}

impl TreeStats {
    pub fn collect(tree: &[FileTreeNode]) -> Self {
        let mut stats = TreeStats::default();
        let mut seen = HashSet::new();

        for node in walk(tree) {
            if node.is_dir() {
                stats.directories += 1;
                continue;
            }
            stats.files += 1;

            if stats.extensions.len() < MAX_EXTENSIONS {
                if let Some(ext) = extension_of(&node.name) {
                    if seen.insert(ext.clone()) {
                        stats.extensions.push(ext);
                    }
                }
            }
        }
        stats
    }
}

fn extension_of(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}
