use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use thiserror::Error;

use crate::util::{excerpt, strip_control_chars};

/// Listing previews show at most this many characters of the body.
pub const PREVIEW_CHARS: usize = 120;

// ============================================================================
// Feed Kind
// ============================================================================

/// The two collections the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Blogs,
    Community,
}

impl FeedKind {
    /// Endpoint path relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Blogs => "api/blogs",
            Self::Community => "api/community",
        }
    }

    /// Heading shown above the listing.
    pub fn title(self) -> &'static str {
        match self {
            Self::Blogs => "Legal Insights Blog",
            Self::Community => "Legal Community Forum",
        }
    }

    /// Short name used in config files and CLI flags.
    pub fn name(self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Community => "community",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blogs" | "blog" => Some(Self::Blogs),
            "community" | "forum" => Some(Self::Community),
            _ => None,
        }
    }

    /// Only the community forum accepts new posts.
    pub fn supports_posting(self) -> bool {
        matches!(self, Self::Community)
    }

    pub fn other(self) -> Self {
        match self {
            Self::Blogs => Self::Community,
            Self::Community => Self::Blogs,
        }
    }
}

// ============================================================================
// Community Categories
// ============================================================================

/// Fixed category set offered by the community composer and chip bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Legal Advice")]
    LegalAdvice,
    #[serde(rename = "Personal Experience")]
    PersonalExperience,
    #[serde(rename = "Court Proceedings")]
    CourtProceedings,
    #[serde(rename = "Rights & Regulations")]
    RightsAndRegulations,
    #[serde(rename = "Success Stories")]
    SuccessStories,
    #[serde(rename = "General Discussion")]
    GeneralDiscussion,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::LegalAdvice,
        Category::PersonalExperience,
        Category::CourtProceedings,
        Category::RightsAndRegulations,
        Category::SuccessStories,
        Category::GeneralDiscussion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LegalAdvice => "Legal Advice",
            Self::PersonalExperience => "Personal Experience",
            Self::CourtProceedings => "Court Proceedings",
            Self::RightsAndRegulations => "Rights & Regulations",
            Self::SuccessStories => "Success Stories",
            Self::GeneralDiscussion => "General Discussion",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

// ============================================================================
// Item Model
// ============================================================================

/// A comment attached to a community post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub anonymous: bool,
}

/// Engagement counters carried by community posts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Engagement {
    pub likes: u64,
    pub comments: Vec<Comment>,
}

/// A blog article or community post, validated at the network boundary.
///
/// Items are immutable once loaded: the view replaces or prepends whole items
/// and never edits one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Blog posts carry a list; community posts carry exactly one.
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    /// `Some` for community posts, whose author may choose anonymity.
    pub anonymous: Option<bool>,
    pub engagement: Option<Engagement>,
    /// Blog-only extras.
    pub summary: Option<String>,
    pub read_time: Option<String>,
}

impl Item {
    /// True if the selected category is one of this item's categories.
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Name shown next to the post.
    pub fn author_label(&self) -> Cow<'_, str> {
        match (self.anonymous, &self.author) {
            (Some(true), _) => Cow::Borrowed("Anonymous User"),
            (Some(false), None) => Cow::Borrowed("User"),
            (_, Some(name)) => Cow::Borrowed(name.as_str()),
            (None, None) => Cow::Borrowed("Unknown"),
        }
    }

    /// Listing preview: the clipped body, else the summary, else nothing.
    pub fn preview(&self) -> &str {
        if !self.body.is_empty() {
            excerpt(&self.body, PREVIEW_CHARS)
        } else {
            self.summary.as_deref().unwrap_or("")
        }
    }

    /// Every category, comma separated, or "General" when there are none.
    pub fn category_list(&self) -> String {
        if self.categories.is_empty() {
            "General".to_string()
        } else {
            self.categories.join(", ")
        }
    }

    /// Badge text: first category, or "General" for uncategorized blog posts.
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(String::as_str)
            .unwrap_or("General")
    }
}

// ============================================================================
// Wire Schemas
// ============================================================================

/// Drops terminal control sequences from server-supplied display text.
fn clean(s: String) -> String {
    let stripped = match strip_control_chars(&s) {
        Cow::Owned(stripped) => Some(stripped),
        Cow::Borrowed(_) => None,
    };
    stripped.unwrap_or(s)
}

/// Mongo documents carry `_id`, and serialized virtuals add `id` next to it.
/// Either is accepted. A record with neither decodes to an empty id, which
/// `decode_collection` rejects.
#[derive(Debug, Deserialize)]
struct RecordId {
    #[serde(default, rename = "_id")]
    mongo: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl RecordId {
    fn resolve(self) -> String {
        self.mongo
            .filter(|id| !id.is_empty())
            .or(self.id)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct CommentRecord {
    #[serde(flatten)]
    id: RecordId,
    content: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    anonymous: bool,
}

impl From<CommentRecord> for Comment {
    fn from(r: CommentRecord) -> Self {
        Comment {
            id: r.id.resolve(),
            content: clean(r.content),
            timestamp: r.timestamp,
            anonymous: r.anonymous,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Name(String),
    Profile {
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogRecord {
    #[serde(flatten)]
    id: RecordId,
    title: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, alias = "excerpt")]
    summary: Option<String>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    author: Option<AuthorField>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    read_time: Option<String>,
}

impl From<BlogRecord> for Item {
    fn from(r: BlogRecord) -> Self {
        let author = r.author.and_then(|a| match a {
            AuthorField::Name(name) => Some(name),
            AuthorField::Profile { name } => name,
        });
        Item {
            id: r.id.resolve(),
            title: clean(r.title),
            body: clean(r.content.unwrap_or_default()),
            categories: r
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(clean)
                .collect(),
            author: author.map(clean).filter(|n| !n.is_empty()),
            created_at: r.created_at,
            anonymous: None,
            engagement: None,
            summary: r.summary.map(clean),
            read_time: r.read_time.map(clean).filter(|t| !t.is_empty()),
        }
    }
}

fn default_anonymous() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CommunityRecord {
    #[serde(flatten)]
    id: RecordId,
    title: String,
    content: String,
    category: String,
    #[serde(alias = "createdAt")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    comments: Vec<CommentRecord>,
    #[serde(default = "default_anonymous")]
    anonymous: bool,
}

impl From<CommunityRecord> for Item {
    fn from(r: CommunityRecord) -> Self {
        Item {
            id: r.id.resolve(),
            title: clean(r.title),
            body: clean(r.content),
            categories: vec![clean(r.category)],
            author: None,
            created_at: r.timestamp,
            anonymous: Some(r.anonymous),
            engagement: Some(Engagement {
                likes: r.likes,
                comments: r.comments.into_iter().map(Comment::from).collect(),
            }),
            summary: None,
            read_time: None,
        }
    }
}

/// Request body for `POST /api/community`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub anonymous: bool,
}

// ============================================================================
// Decoding
// ============================================================================

/// Ways a response body can fail schema validation.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Item at position {0} has an empty id")]
    EmptyId(usize),
    #[error("Duplicate item id: {0}")]
    DuplicateId(String),
}

/// Decode a collection response for `kind`.
///
/// The body must be a JSON array whose elements all match the kind's schema,
/// with non-empty, unique identifiers. Order is preserved.
pub fn decode_collection(kind: FeedKind, body: &[u8]) -> Result<Vec<Item>, DecodeError> {
    let items: Vec<Item> = match kind {
        FeedKind::Blogs => serde_json::from_slice::<Vec<BlogRecord>>(body)?
            .into_iter()
            .map(Item::from)
            .collect(),
        FeedKind::Community => serde_json::from_slice::<Vec<CommunityRecord>>(body)?
            .into_iter()
            .map(Item::from)
            .collect(),
    };

    let mut seen = HashSet::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if item.id.is_empty() {
            return Err(DecodeError::EmptyId(idx));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(DecodeError::DuplicateId(item.id.clone()));
        }
    }

    Ok(items)
}

/// Decode the created post returned by `POST /api/community`.
pub fn decode_created_post(body: &[u8]) -> Result<Item, DecodeError> {
    let item = Item::from(serde_json::from_slice::<CommunityRecord>(body)?);
    if item.id.is_empty() {
        return Err(DecodeError::EmptyId(0));
    }
    Ok(item)
}
