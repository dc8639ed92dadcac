use crate::api::Item;

/// An ordered list of items with unique ids, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    /// Wraps items, keeping the first occurrence of each id.
    ///
    /// Server responses with repeated ids never get here, since
    /// `decode_collection` rejects them as malformed. `Collection` is public and
    /// `App::apply_load_result` takes any item list, so the unique-id invariant
    /// is enforced here as well rather than trusted to every caller.
    pub fn new(items: Vec<Item>) -> Self {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Puts a newly created item at the front.
    ///
    /// An existing item with the same id is removed so ids stay unique. Returns
    /// true when such an item was replaced.
    pub fn prepend(&mut self, item: Item) -> bool {
        let existing = self.items.iter().position(|i| i.id == item.id);
        if let Some(idx) = existing {
            self.items.remove(idx);
        }
        self.items.insert(0, item);
        existing.is_some()
    }

    /// Distinct categories across all items, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for category in self.items.iter().flat_map(|i| i.categories.iter()) {
            if !out.contains(&category.as_str()) {
                out.push(category);
            }
        }
        out
    }
}

/// Load lifecycle of the displayed collection.
///
/// `Loading` is entered on every fetch; only the result of the most recent fetch
/// may move it to `Loaded` or `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded(Collection),
    Failed(String),
}

impl LoadState {
    /// Displayed items. Empty unless loaded.
    pub fn items(&self) -> &[Item] {
        match self {
            LoadState::Loaded(collection) => collection.items(),
            _ => &[],
        }
    }

    pub fn collection(&self) -> Option<&Collection> {
        match self {
            LoadState::Loaded(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            LoadState::Loaded(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn item(id: &str, categories: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            title: format!("Post {id}"),
            body: String::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            author: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            anonymous: Some(true),
            engagement: None,
            summary: None,
            read_time: None,
        }
    }

    fn ids(c: &Collection) -> Vec<&str> {
        c.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_prepend_new_item_goes_first() {
        let mut c = Collection::new(vec![item("a", &[]), item("b", &[])]);
        assert!(!c.prepend(item("n", &[])));
        assert_eq!(ids(&c), vec!["n", "a", "b"]);
    }

    #[test]
    fn test_prepend_existing_id_moves_to_front() {
        let mut c = Collection::new(vec![item("a", &[]), item("b", &[]), item("c", &[])]);
        assert!(c.prepend(item("b", &[])));
        assert_eq!(ids(&c), vec!["b", "a", "c"]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_prepend_into_empty() {
        let mut c = Collection::default();
        c.prepend(item("only", &[]));
        assert_eq!(ids(&c), vec!["only"]);
    }

    #[test]
    fn test_new_drops_later_duplicates() {
        let c = Collection::new(vec![item("a", &["X"]), item("a", &["Y"]), item("b", &[])]);
        assert_eq!(ids(&c), vec!["a", "b"]);
        assert_eq!(c.items()[0].categories, vec!["X"]);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let c = Collection::new(vec![
            item("1", &["Housing", "Rights"]),
            item("2", &["Family"]),
            item("3", &["Rights", "Housing", "Tax"]),
        ]);
        assert_eq!(c.categories(), vec!["Housing", "Rights", "Family", "Tax"]);
    }

    #[test]
    fn test_failed_state_shows_no_items() {
        let state = LoadState::Failed("HTTP error: status 500".to_string());
        assert!(state.items().is_empty());
        assert_eq!(state.error(), Some("HTTP error: status 500"));
        assert!(LoadState::Loading.items().is_empty());
        assert!(LoadState::Loading.is_loading());
    }
}
