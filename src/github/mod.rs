// src/github/mod.rs
// =============================================================================
// Everything that knows about GitHub.
//
// Submodules:
// - repo_url: Parsing repository URLs into owner/repo
// - metadata: The repository record we render from
// - tree: Rebuilding a nested file tree from the flat recursive listing
// - client: The HTTP client and the RepositoryHost trait
// =============================================================================

mod client;
mod metadata;
mod tree;
mod repo_url;

pub use client::{GithubClient, RepositoryHost};
pub use metadata::RepositoryMetadata;
pub use repo_url::parse_github_url;
pub use tree::{walk, FileTreeNode};

#[cfg(test)]
pub use client::MockRepositoryHost;
#[cfg(test)]
pub use tree::{build_tree, EntryKind, NodeKind, TreeEntry};
