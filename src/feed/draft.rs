use thiserror::Error;

use crate::api::{Category, NewPost};

/// Reasons a draft cannot be submitted yet.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Content is required")]
    MissingBody,
    #[error("Choose a category")]
    MissingCategory,
}

impl DraftError {
    /// Name of the field at fault, as shown in the composer.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingBody => "content",
            Self::MissingCategory => "category",
        }
    }
}

/// Unsubmitted community post.
///
/// Fields are checked for emptiness only; surrounding whitespace is kept and
/// sent to the server as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub body: String,
    pub category: Option<Category>,
    pub anonymous: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            category: None,
            anonymous: true,
        }
    }
}

impl Draft {
    /// Every unmet precondition, in form order.
    pub fn missing_fields(&self) -> Vec<DraftError> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(DraftError::MissingTitle);
        }
        if self.body.is_empty() {
            missing.push(DraftError::MissingBody);
        }
        if self.category.is_none() {
            missing.push(DraftError::MissingCategory);
        }
        missing
    }

    pub fn can_submit(&self) -> bool {
        self.to_new_post().is_ok()
    }

    /// Builds the request body, or the first unmet precondition.
    pub fn to_new_post(&self) -> Result<NewPost, DraftError> {
        if self.title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.body.is_empty() {
            return Err(DraftError::MissingBody);
        }
        let category = self.category.ok_or(DraftError::MissingCategory)?;

        Ok(NewPost {
            title: self.title.clone(),
            content: self.body.clone(),
            category,
            anonymous: self.anonymous,
        })
    }

    /// Steps through the fixed category list, wrapping at either end.
    ///
    /// From no selection, forward picks the first category and backward the last.
    pub fn cycle_category(&mut self, forward: bool) {
        let all = Category::ALL;
        let next = match self.category.and_then(|c| all.iter().position(|&x| x == c)) {
            None if forward => 0,
            None => all.len() - 1,
            Some(idx) if forward => (idx + 1) % all.len(),
            Some(idx) => (idx + all.len() - 1) % all.len(),
        };
        self.category = Some(all[next]);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete() -> Draft {
        Draft {
            title: "Eviction".to_string(),
            body: "Got a notice today".to_string(),
            category: Some(Category::LegalAdvice),
            anonymous: true,
        }
    }

    #[test]
    fn test_new_draft_is_empty_and_anonymous() {
        let draft = Draft::default();
        assert!(draft.anonymous);
        assert!(!draft.can_submit());
        assert_eq!(
            draft.missing_fields(),
            vec![
                DraftError::MissingTitle,
                DraftError::MissingBody,
                DraftError::MissingCategory
            ]
        );
    }

    #[test]
    fn test_each_missing_field_blocks_submit() {
        let mut d = complete();
        d.title.clear();
        assert_eq!(d.to_new_post(), Err(DraftError::MissingTitle));

        let mut d = complete();
        d.body.clear();
        assert_eq!(d.to_new_post(), Err(DraftError::MissingBody));

        let mut d = complete();
        d.category = None;
        assert_eq!(d.to_new_post(), Err(DraftError::MissingCategory));
    }

    #[test]
    fn test_whitespace_only_fields_count_as_filled() {
        let mut d = complete();
        d.title = "   ".to_string();
        assert!(d.can_submit());
        assert_eq!(d.to_new_post().unwrap().title, "   ");
    }

    #[test]
    fn test_to_new_post_copies_fields() {
        let mut d = complete();
        d.anonymous = false;
        let post = d.to_new_post().unwrap();
        assert_eq!(
            post,
            NewPost {
                title: "Eviction".to_string(),
                content: "Got a notice today".to_string(),
                category: Category::LegalAdvice,
                anonymous: false,
            }
        );
    }

    #[test]
    fn test_cycle_category_wraps() {
        let mut d = Draft::default();
        d.cycle_category(true);
        assert_eq!(d.category, Some(Category::LegalAdvice));
        d.cycle_category(false);
        assert_eq!(d.category, Some(Category::GeneralDiscussion));
        d.cycle_category(true);
        assert_eq!(d.category, Some(Category::LegalAdvice));

        let mut d = Draft::default();
        d.cycle_category(false);
        assert_eq!(d.category, Some(Category::GeneralDiscussion));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut d = complete();
        d.anonymous = false;
        d.reset();
        assert_eq!(d, Draft::default());
    }
}
