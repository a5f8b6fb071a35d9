//! Parsing of `git status --porcelain` output.

/// Short-status pairs git uses for unmerged paths.
pub const UNMERGED_MARKERS: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

/// Whether porcelain output reports any change at all.
pub fn is_dirty(porcelain: &str) -> bool {
    porcelain.lines().any(|line| !line.trim().is_empty())
}

/// Whether porcelain output contains unresolved merge conflicts.
pub fn has_conflicts(porcelain: &str) -> bool {
    porcelain
        .lines()
        .filter_map(|line| line.get(..2))
        .any(|xy| UNMERGED_MARKERS.contains(&xy))
}

/// Paths with unresolved conflicts, in porcelain order.
pub fn conflicted_paths(porcelain: &str) -> Vec<String> {
    porcelain
        .lines()
        .filter(|line| line.get(..2).is_some_and(|xy| UNMERGED_MARKERS.contains(&xy)))
        .filter_map(|line| line.get(3..))
        .map(str::to_string)
        .collect()
}
