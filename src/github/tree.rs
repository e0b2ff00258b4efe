// src/github/tree.rs
// =============================================================================
// Rebuilds a nested file tree from GitHub's flat recursive listing.
//
// GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1 returns every
// entry as { path, type, size } with no parent links, e.g.
//
//   src            tree
//   src/main.rs    blob
//   README.md      blob
//
// How the rebuild works:
// 1. Very large listings are cut down to MAX_TREE_ENTRIES (reduce_entries)
// 2. Entries are sorted: all `tree` entries before all `blob` entries, then
//    by path. A directory's own entry therefore always comes before anything
//    inside it.
// 3. One pass over the sorted list. Each directory we create is remembered
//    in a map keyed by its full path; every later entry looks up its parent
//    there. Entries whose parent directory was never listed are dropped.
//
// Nodes live in a flat Vec (an arena) while building and refer to their
// children by index, so no node ever needs a mutable borrow of another.
// =============================================================================

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Listings longer than this are reduced before the rebuild
pub const MAX_TREE_ENTRIES: usize = 1000;

/// Root-level files that survive the reduction no matter what
pub const PRIORITY_FILES: &[&str] = &[
    "README.md",
    "README",
    "LICENSE",
    "LICENSE.md",
    ".gitignore",
    ".dockerignore",
    "package.json",
    "Cargo.toml",
    "go.mod",
    "pyproject.toml",
    "requirements.txt",
    "setup.py",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "composer.json",
    "Makefile",
    "Dockerfile",
    "tsconfig.json",
];

/// Entries this shallow (in path segments) are always kept
const PRIORITY_DEPTH: usize = 2;

/// Upstream entry type. Declaration order is the sort order: trees first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Tree,
    Blob,
    /// Submodule `commit` entries and anything GitHub adds later
    #[serde(other)]
    Other,
}

/// One raw entry of the flat listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
}

impl TreeEntry {
    #[cfg(test)]
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
            size: None,
        }
    }

    fn depth(&self) -> usize {
        self.path.split('/').filter(|s| !s.is_empty()).count()
    }

    fn is_priority(&self) -> bool {
        PRIORITY_FILES.contains(&self.path.as_str()) || self.depth() <= PRIORITY_DEPTH
    }
}

/// Body of the recursive tree endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// GitHub withheld entries because the response was too large
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// A node of the rebuilt tree.
///
/// `path` is always the parent's path + "/" + `name` (or just `name` at the
/// root). `children` is `None` for files and for directories nothing was
/// attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
    /// File size in bytes, when GitHub reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Some children were cut by the size reduction
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

impl FileTreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn children(&self) -> &[FileTreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Pre-order, depth-first iterator over a node sequence
pub struct Walk<'a> {
    stack: Vec<&'a FileTreeNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FileTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

pub fn walk(nodes: &[FileTreeNode]) -> Walk<'_> {
    Walk {
        stack: nodes.iter().rev().collect(),
    }
}

/// Result of reduce_entries
#[derive(Debug, Default)]
pub struct ReducedEntries {
    pub kept: Vec<TreeEntry>,
    pub dropped: Vec<TreeEntry>,
}

// Cuts a listing down to `ceiling` entries.
//
// Priority entries (well-known root files, anything at depth <= 2) are kept
// even if they alone exceed the ceiling. Remaining slots are filled with the
// other entries in the order GitHub returned them.
pub fn reduce_entries(entries: Vec<TreeEntry>, ceiling: usize) -> ReducedEntries {
    if entries.len() <= ceiling {
        return ReducedEntries {
            kept: entries,
            dropped: Vec::new(),
        };
    }

    let (mut kept, mut rest): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(TreeEntry::is_priority);

    let room = ceiling.saturating_sub(kept.len()).min(rest.len());
    let dropped = rest.split_off(room);
    kept.append(&mut rest);

    ReducedEntries { kept, dropped }
}

// Rebuilds the nested tree from a flat, unordered entry list.
//
// The output depends only on the set of entries, not on their input order.
pub fn build_tree(entries: &[TreeEntry]) -> Vec<FileTreeNode> {
    assemble(entries, &HashSet::new())
}

/// Full pipeline for one listing: reduce, rebuild, flag partial directories.
pub fn reconstruct(listing: TreeListing) -> Vec<FileTreeNode> {
    if listing.truncated {
        warn!(
            returned = listing.tree.len(),
            "GitHub truncated the tree listing; the rendered structure is incomplete"
        );
    }

    let total = listing.tree.len();
    let reduced = reduce_entries(listing.tree, MAX_TREE_ENTRIES);
    if !reduced.dropped.is_empty() {
        warn!(
            total,
            kept = reduced.kept.len(),
            dropped = reduced.dropped.len(),
            "Large repository: reduced the tree listing"
        );
    }

    // The immediate parent of a dropped entry lost at least one child
    let partial_dirs: HashSet<&str> = reduced
        .dropped
        .iter()
        .filter_map(|e| e.path.rsplit_once('/').map(|(parent, _)| parent))
        .collect();

    if partial_dirs.is_empty() {
        build_tree(&reduced.kept)
    } else {
        assemble(&reduced.kept, &partial_dirs)
    }
}

// Arena slot used while building
struct Slot<'a> {
    name: &'a str,
    path: &'a str,
    kind: NodeKind,
    size: Option<u64>,
    children: Vec<usize>,
}

fn assemble(entries: &[TreeEntry], partial_dirs: &HashSet<&str>) -> Vec<FileTreeNode> {
    let mut sorted: Vec<&TreeEntry> = entries
        .iter()
        .filter(|e| {
            let usable = e.kind != EntryKind::Other;
            if !usable {
                debug!(path = %e.path, "Skipping non file/directory entry");
            }
            usable
        })
        .collect();

    sorted.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.path.cmp(&b.path)));
    sorted.dedup_by(|a, b| a.kind == b.kind && a.path == b.path);

    let mut arena: Vec<Slot> = Vec::with_capacity(sorted.len());
    let mut roots: Vec<usize> = Vec::new();
    let mut directories: HashMap<&str, usize> = HashMap::new();

    for entry in sorted {
        let path = entry.path.as_str();
        if path.is_empty() || path.split('/').any(str::is_empty) {
            debug!(path, "Skipping malformed path");
            continue;
        }

        let kind = match entry.kind {
            EntryKind::Tree => NodeKind::Directory,
            _ => NodeKind::File,
        };
        let index = arena.len();

        let name = match path.rsplit_once('/') {
            None => {
                roots.push(index);
                path
            }
            Some((parent, name)) => match directories.get(parent) {
                Some(&parent_index) => {
                    arena[parent_index].children.push(index);
                    name
                }
                None => {
                    debug!(path, parent, "Dropping entry whose parent directory is not listed");
                    continue;
                }
            },
        };

        arena.push(Slot {
            name,
            path,
            kind,
            size: entry.size.filter(|_| kind == NodeKind::File),
            children: Vec::new(),
        });
        if kind == NodeKind::Directory {
            directories.insert(path, index);
        }
    }

    roots
        .into_iter()
        .map(|index| materialize(&arena, index, partial_dirs))
        .collect()
}

fn materialize(arena: &[Slot], index: usize, partial_dirs: &HashSet<&str>) -> FileTreeNode {
    let slot = &arena[index];
    let children = if slot.children.is_empty() {
        None
    } else {
        Some(
            slot.children
                .iter()
                .map(|&child| materialize(arena, child, partial_dirs))
                .collect(),
        )
    };

    FileTreeNode {
        name: slot.name.to_string(),
        kind: slot.kind,
        path: slot.path.to_string(),
        children,
        size: slot.size,
        partial: slot.kind == NodeKind::Directory && partial_dirs.contains(slot.path),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an arena (Vec<Slot>) instead of building FileTreeNode directly?
//    - A parent is still being filled in while we attach children to it
//    - Holding `&mut` into a growing tree is not allowed by the borrow checker
//    - Indices (usize) are plain values, so they can be stored anywhere
//
// 2. Why does the sort put trees before blobs?
//    - A directory path is a prefix of everything inside it, so among trees
//      a parent always sorts before its children
//    - Putting every tree first means all directories exist before any file
//      looks for its parent
//
// 3. What does #[serde(other)] do?
//    - Any `type` string we don't know (like "commit") becomes EntryKind::Other
//      instead of failing the whole response
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn blob(path: &str) -> TreeEntry {
        TreeEntry::new(path, EntryKind::Blob)
    }

    fn tree(path: &str) -> TreeEntry {
        TreeEntry::new(path, EntryKind::Tree)
    }

    fn names(nodes: &[FileTreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    fn sample() -> Vec<TreeEntry> {
        vec![
            blob("src/lib/util.rs"),
            blob("README.md"),
            tree("docs"),
            blob("src/main.rs"),
            tree("src/lib"),
            blob("docs/guide.md"),
            tree("src"),
            blob("Cargo.toml"),
            blob("src/lib/mod.rs"),
            tree("assets"),
        ]
    }

    fn assert_paths_consistent(nodes: &[FileTreeNode], parent: Option<&str>) {
        for node in nodes {
            let expected = match parent {
                Some(p) => format!("{}/{}", p, node.name),
                None => node.name.clone(),
            };
            assert_eq!(node.path, expected);
            assert_paths_consistent(node.children(), Some(&node.path));
        }
    }

    #[test]
    fn test_directories_sort_before_files() {
        let entries = vec![
            blob("README.md"),
            tree("src"),
            blob("src/index.ts"),
            blob("package.json"),
        ];
        let roots = build_tree(&entries);

        assert_eq!(names(&roots), vec!["src", "README.md", "package.json"]);
        assert_eq!(roots[0].kind, NodeKind::Directory);
        assert_eq!(names(roots[0].children()), vec!["index.ts"]);
        assert_eq!(roots[0].children()[0].path, "src/index.ts");
        assert_eq!(roots[1].kind, NodeKind::File);
        assert!(roots[1].children.is_none());
    }

    #[test]
    fn test_nested_structure_and_order() {
        let roots = build_tree(&sample());

        assert_eq!(names(&roots), vec!["assets", "docs", "src", "Cargo.toml", "README.md"]);
        let src = &roots[2];
        assert_eq!(names(src.children()), vec!["lib", "main.rs"]);
        assert_eq!(names(src.children()[0].children()), vec!["mod.rs", "util.rs"]);
        assert_paths_consistent(&roots, None);
    }

    #[test]
    fn test_output_is_independent_of_input_order() {
        let forward = sample();
        let mut backward = sample();
        backward.reverse();
        let mut rotated = sample();
        rotated.rotate_left(4);

        let expected = serde_json::to_string(&build_tree(&forward)).unwrap();
        assert_eq!(serde_json::to_string(&build_tree(&backward)).unwrap(), expected);
        assert_eq!(serde_json::to_string(&build_tree(&rotated)).unwrap(), expected);
    }

    #[test]
    fn test_every_leaf_appears_exactly_once() {
        let entries = sample();
        let roots = build_tree(&entries);

        for entry in entries.iter().filter(|e| e.kind == EntryKind::Blob) {
            let hits = walk(&roots).filter(|n| n.path == entry.path).count();
            assert_eq!(hits, 1, "{} should appear once", entry.path);
        }
        assert_eq!(walk(&roots).count(), entries.len());
    }

    #[test]
    fn test_empty_input_gives_empty_tree() {
        assert!(build_tree(&[]).is_empty());
        assert!(reconstruct(TreeListing::default()).is_empty());
    }

    #[test]
    fn test_orphans_are_dropped() {
        let entries = vec![tree("src"), blob("src/main.rs"), blob("lost/dir/file.txt"), blob("src/missing/x.rs")];
        let roots = build_tree(&entries);

        assert_eq!(names(&roots), vec!["src"]);
        assert_eq!(names(roots[0].children()), vec!["main.rs"]);
        assert!(walk(&roots).all(|n| !n.path.contains("lost") && !n.path.contains("missing")));
    }

    #[test]
    fn test_empty_directory_has_no_children_field() {
        let roots = build_tree(&[tree("empty")]);
        assert_eq!(roots[0].kind, NodeKind::Directory);
        assert!(roots[0].children.is_none());

        let json = serde_json::to_string(&roots).unwrap();
        assert_eq!(json, r#"[{"name":"empty","type":"directory","path":"empty"}]"#);
    }

    #[test]
    fn test_file_sizes_are_carried_over() {
        let mut entry = blob("big.bin");
        entry.size = Some(4096);
        let roots = build_tree(&[entry, tree("dir")]);

        assert_eq!(roots[1].size, Some(4096));
        assert_eq!(roots[0].size, None);
        let json = serde_json::to_string(&roots[1]).unwrap();
        assert_eq!(json, r#"{"name":"big.bin","type":"file","path":"big.bin","size":4096}"#);
    }

    #[test]
    fn test_submodules_and_duplicates_are_skipped() {
        let entries = vec![
            tree("vendor"),
            TreeEntry::new("vendor/lib", EntryKind::Other),
            blob("a.txt"),
            blob("a.txt"),
        ];
        let roots = build_tree(&entries);
        assert_eq!(names(&roots), vec!["vendor", "a.txt"]);
        assert!(roots[0].children.is_none());
    }

    #[test]
    fn test_unknown_entry_type_deserializes_as_other() {
        let body = r#"{"tree":[{"path":"sub","type":"commit"},{"path":"a","type":"blob","size":3}],"truncated":false}"#;
        let listing: TreeListing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.tree[0].kind, EntryKind::Other);
        assert_eq!(listing.tree[1].size, Some(3));
    }

    #[test]
    fn test_reduce_leaves_small_listings_alone() {
        let entries = sample();
        let reduced = reduce_entries(entries.clone(), MAX_TREE_ENTRIES);
        assert_eq!(reduced.kept, entries);
        assert!(reduced.dropped.is_empty());
    }

    #[test]
    fn test_reduce_keeps_priority_entries_and_fills_in_order() {
        let mut entries = vec![tree("deep"), tree("deep/a")];
        for i in 0..20 {
            entries.push(blob(&format!("deep/a/file{:02}.txt", i)));
        }
        entries.push(blob("Cargo.toml"));

        let reduced = reduce_entries(entries, 10);

        // 3 priority entries plus the first 7 deep files
        assert_eq!(reduced.kept.len(), 10);
        assert!(reduced.kept.iter().any(|e| e.path == "Cargo.toml"));
        assert!(reduced.kept.iter().any(|e| e.path == "deep/a"));
        assert!(reduced.kept.iter().any(|e| e.path == "deep/a/file06.txt"));
        assert!(!reduced.kept.iter().any(|e| e.path == "deep/a/file07.txt"));
        assert_eq!(reduced.dropped.len(), 13);
    }

    #[test]
    fn test_reduce_never_drops_priority_entries() {
        let entries: Vec<TreeEntry> = (0..15).map(|i| blob(&format!("file{}.txt", i))).collect();
        let reduced = reduce_entries(entries, 10);
        assert_eq!(reduced.kept.len(), 15);
        assert!(reduced.dropped.is_empty());
    }

    #[test]
    fn test_reconstruct_marks_partial_directories() {
        let mut entries = vec![tree("src"), tree("src/deep"), tree("docs"), tree("docs/inner")];
        for i in 0..(MAX_TREE_ENTRIES + 5) {
            entries.push(blob(&format!("src/deep/f{:04}.rs", i)));
        }
        entries.push(blob("docs/inner/late.md"));

        let roots = reconstruct(TreeListing { tree: entries, truncated: false });

        let deep = walk(&roots).find(|n| n.path == "src/deep").unwrap();
        assert!(deep.partial);
        assert!(deep.children().len() < MAX_TREE_ENTRIES + 5);
        let src = walk(&roots).find(|n| n.path == "src").unwrap();
        assert!(!src.partial);
        // Listed after the ceiling was reached, so its directory is partial too
        let inner = walk(&roots).find(|n| n.path == "docs/inner").unwrap();
        assert!(inner.partial);
        assert!(inner.children.is_none());
        assert!(walk(&roots).count() <= MAX_TREE_ENTRIES);
    }

    #[test]
    fn test_truncated_listing_still_returns_tree() {
        let roots = reconstruct(TreeListing {
            tree: vec![tree("src"), blob("src/main.rs")],
            truncated: true,
        });
        assert_eq!(names(&roots), vec!["src"]);
    }

    #[test]
    fn test_walk_is_depth_first_preorder() {
        let roots = build_tree(&sample());
        let paths: Vec<&str> = walk(&roots).map(|n| n.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "assets",
                "docs",
                "docs/guide.md",
                "src",
                "src/lib",
                "src/lib/mod.rs",
                "src/lib/util.rs",
                "src/main.rs",
                "Cargo.toml",
                "README.md",
            ]
        );
    }

    // Random listings where every intermediate directory is present.
    // Directory names never contain a dot and file names always do, so a
    // path is never both a file and a directory.
    fn listing() -> impl Strategy<Value = Vec<TreeEntry>> {
        let path = (prop::collection::vec("[a-c]{1,2}", 0..3), "[a-d]{1,3}\\.(rs|md)");
        prop::collection::vec(path, 0..24).prop_map(|files| {
            let mut seen = BTreeSet::new();
            for (dirs, file) in files {
                let mut prefix = String::new();
                for dir in dirs {
                    if !prefix.is_empty() {
                        prefix.push('/');
                    }
                    prefix.push_str(&dir);
                    seen.insert((EntryKind::Tree, prefix.clone()));
                }
                let full = if prefix.is_empty() { file } else { format!("{}/{}", prefix, file) };
                seen.insert((EntryKind::Blob, full));
            }
            seen.into_iter().map(|(kind, path)| TreeEntry::new(path, kind)).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_shuffled_listing_builds_same_tree(
            (entries, shuffled) in listing().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(build_tree(&entries), build_tree(&shuffled));
        }

        #[test]
        fn prop_every_entry_appears_once(entries in listing()) {
            let roots = build_tree(&entries);

            prop_assert_eq!(walk(&roots).count(), entries.len());
            for entry in &entries {
                prop_assert_eq!(walk(&roots).filter(|n| n.path == entry.path).count(), 1);
            }
            assert_paths_consistent(&roots, None);
        }

        #[test]
        fn prop_tree_survives_json_round_trip(entries in listing()) {
            let roots = build_tree(&entries);
            let json = serde_json::to_string(&roots).unwrap();
            let back: Vec<FileTreeNode> = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, roots);
        }

        #[test]
        fn prop_orphans_never_appear(entries in listing(), orphan in "[a-d]{1,3}\\.rs") {
            let mut with_orphan = entries.clone();
            with_orphan.push(blob(&format!("zz/{}", orphan)));

            let roots = build_tree(&with_orphan);
            prop_assert!(walk(&roots).all(|n| !n.path.starts_with("zz")));
            prop_assert_eq!(roots, build_tree(&entries));
        }
    }

}
