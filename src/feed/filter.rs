use crate::api::Item;

/// Returns the visible subsequence of `items`.
///
/// An item is visible when the query is empty or is a case-insensitive
/// substring of its title or body, and the category is unset or is one of the
/// item's categories. The query is not trimmed: `" "` matches only items
/// containing a space.
///
/// ```
/// use chrono::Utc;
/// use lexfeed::api::Item;
/// use lexfeed::feed::filter;
///
/// let post = |id: &str, title: &str| Item {
///     id: id.into(),
///     title: title.into(),
///     body: String::new(),
///     categories: vec![],
///     author: None,
///     created_at: Utc::now(),
///     anonymous: None,
///     engagement: None,
///     summary: None,
///     read_time: None,
/// };
/// let items = vec![post("1", "Tenant Rights"), post("2", "Court Fees")];
///
/// let titles: Vec<_> = filter(&items, "court", None)
///     .iter()
///     .map(|i| i.title.as_str())
///     .collect();
/// assert_eq!(titles, ["Court Fees"]);
/// ```
pub fn filter<'a>(items: &'a [Item], query: &str, category: Option<&str>) -> Vec<&'a Item> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| category.map_or(true, |c| item.in_category(c)))
        .filter(|item| needle.is_empty() || matches_query(item, &needle))
        .collect()
}

fn matches_query(item: &Item, needle_lower: &str) -> bool {
    item.title.to_lowercase().contains(needle_lower)
        || item.body.to_lowercase().contains(needle_lower)
}

/// Single-select category toggle.
///
/// Selecting the active category clears it; selecting another replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: Option<String>,
}

impl CategoryFilter {
    pub fn toggle(&mut self, category: &str) {
        if self.selected.as_deref() == Some(category) {
            self.selected = None;
        } else {
            self.selected = Some(category.to_owned());
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
