use crate::model::thread::DisplayThread;

/// Filter the thread index by project name.
///
/// An empty or whitespace-only query returns the full index unchanged.
/// Otherwise keeps entries whose project name contains the trimmed query,
/// case-insensitively, in their original order.
pub fn filter_threads(query: &str, full: &[DisplayThread]) -> Vec<DisplayThread> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return full.to_vec();
    }
    full.iter()
        .filter(|t| t.project_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
