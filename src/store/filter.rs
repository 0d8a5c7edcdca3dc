use std::cmp::Ordering;

use crate::domain::SavedArticle;

/// Narrowing applied to the bookmark list before display.
#[derive(Debug, Clone, Default)]
pub struct SavedFilter {
    /// Category name, compared case-insensitively; `None` or "All" keeps all
    pub category: Option<String>,
    /// Substring searched in title and description, case-insensitive
    pub text: Option<String>,
}

impl SavedFilter {
    pub fn apply(&self, saved: &[SavedArticle]) -> Vec<SavedArticle> {
        let category = self
            .category
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty() && c != "all");
        let text = self
            .text
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let mut matched: Vec<SavedArticle> = saved
            .iter()
            .filter(|s| {
                category
                    .as_ref()
                    .is_none_or(|c| s.category.to_lowercase() == *c)
            })
            .filter(|s| {
                text.as_ref().is_none_or(|t| {
                    s.title.to_lowercase().contains(t)
                        || s.description
                            .as_deref()
                            .unwrap_or("")
                            .to_lowercase()
                            .contains(t)
                })
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        matched
    }
}

/// Category names as offered when choosing where to save: "General" first,
/// the rest alphabetically.
pub fn picker_order(names: &[String]) -> Vec<String> {
    let mut ordered = names.to_vec();
    ordered.sort_by(|a, b| match (a == "General", b == "General") {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    });
    ordered
}
