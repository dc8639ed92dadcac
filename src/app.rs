use crate::api::{ApiClient, ApiError, Category, FeedKind, Item, NewPost};
use crate::feed::{filter, CategoryFilter, Collection, Draft, LoadState};
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::{display_width, MAX_SEARCH_QUERY_LENGTH};
use ratatui::style::Style;
use ratatui::text::Line;
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Status messages disappear after this many seconds.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// View Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Listing, // Chip bar, search line and item list
    Reader,  // Full-screen single item
}

// ============================================================================
// Composer State
// ============================================================================

/// Field that receives keystrokes in the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerField {
    #[default]
    Title,
    Body,
    Category,
    Anonymous,
}

impl ComposerField {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Body,
            Self::Body => Self::Category,
            Self::Category => Self::Anonymous,
            Self::Anonymous => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Anonymous,
            Self::Body => Self::Title,
            Self::Category => Self::Body,
            Self::Anonymous => Self::Category,
        }
    }
}

/// Open composer dialog: the draft plus editing and submission state.
#[derive(Debug, Clone, Default)]
pub struct ComposerState {
    pub draft: Draft,
    pub field: ComposerField,
    /// A POST for this draft is in flight.
    pub submitting: bool,
    /// Message from the last failed submission.
    pub error: Option<String>,
}

impl ComposerState {
    /// Type a character into the focused field.
    ///
    /// On the category field `h`/`l` and space step through categories; on
    /// the anonymity field space toggles. Other characters are ignored there.
    pub fn insert_char(&mut self, c: char) {
        match self.field {
            ComposerField::Title => self.draft.title.push(c),
            ComposerField::Body => self.draft.body.push(c),
            ComposerField::Category => match c {
                'l' | ' ' => self.draft.cycle_category(true),
                'h' => self.draft.cycle_category(false),
                _ => {}
            },
            ComposerField::Anonymous => {
                if c == ' ' {
                    self.draft.anonymous = !self.draft.anonymous;
                }
            }
        }
    }

    /// Enter adds a line break in the body and moves on from single-line fields.
    pub fn insert_newline(&mut self) {
        match self.field {
            ComposerField::Body => self.draft.body.push('\n'),
            ComposerField::Anonymous => self.draft.anonymous = !self.draft.anonymous,
            _ => self.field = self.field.next(),
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            ComposerField::Title => {
                self.draft.title.pop();
            }
            ComposerField::Body => {
                self.draft.body.pop();
            }
            ComposerField::Category => self.draft.category = None,
            ComposerField::Anonymous => {}
        }
    }

    /// Left/Right on the category or anonymity field.
    pub fn step(&mut self, forward: bool) {
        match self.field {
            ComposerField::Category => self.draft.cycle_category(forward),
            ComposerField::Anonymous => self.draft.anonymous = !self.draft.anonymous,
            _ => {}
        }
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// Events from background tasks
pub enum AppEvent {
    /// A collection fetch finished.
    ///
    /// Applied only if `kind` and `generation` still match the active view.
    CollectionLoaded {
        kind: FeedKind,
        generation: u64,
        result: Result<Vec<Item>, ApiError>,
    },
    /// A post submission finished.
    PostSubmitted {
        generation: u64,
        result: Result<Item, ApiError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked ("load", "submit")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub api: ApiClient,
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    /// Active feed view and its collection.
    pub kind: FeedKind,
    pub collection: LoadState,

    pub view: View,
    /// Index into `visible_items()`.
    pub selected: usize,
    /// Reader scroll position.
    pub scroll_offset: usize,

    pub search_mode: bool,
    /// Live query; the listing is refiltered on every keystroke.
    pub search_input: String,
    pub category_filter: CategoryFilter,

    /// Open composer dialog, if any. Community view only.
    pub composer: Option<ComposerState>,

    pub reader_item: Option<Item>,
    /// Rendered body of `reader_item`, cached on reader entry.
    pub reader_lines: Vec<Line<'static>>,
    pub reader_visible_lines: usize,
    pub reader_viewport_width: usize,

    /// Status message with timestamp (auto-expires)
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Set when state changed and the next loop iteration must redraw.
    pub needs_redraw: bool,

    /// Bumped on every load; results tagged with an older value are stale.
    pub load_generation: u64,
    pub load_handle: Option<JoinHandle<()>>,
    pub submit_generation: u64,
    pub submit_handle: Option<JoinHandle<()>>,

    pub spinner_frame: usize,
    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(api: ApiClient, kind: FeedKind) -> Self {
        Self {
            api,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            kind,
            collection: LoadState::Unloaded,
            view: View::Listing,
            selected: 0,
            scroll_offset: 0,
            search_mode: false,
            search_input: String::new(),
            category_filter: CategoryFilter::default(),
            composer: None,
            reader_item: None,
            reader_lines: Vec::new(),
            reader_visible_lines: 0,
            reader_viewport_width: 0,
            status_message: None,
            needs_redraw: true,
            load_generation: 0,
            load_handle: None,
            submit_generation: 0,
            submit_handle: None,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        if let Some(item) = &self.reader_item {
            self.reader_lines = crate::ui::reader::body_lines(item, self.kind, &self.theme);
        }
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------------

    /// Items that pass the current query and category, in collection order.
    pub fn visible_items(&self) -> Vec<&Item> {
        filter(
            self.collection.items(),
            &self.search_input,
            self.category_filter.selected(),
        )
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.visible_items().get(self.selected).copied()
    }

    /// Chips offered in the filter bar.
    ///
    /// The community forum uses its fixed category set; the blog offers the
    /// categories present in the loaded posts.
    pub fn category_choices(&self) -> Vec<&str> {
        match self.kind {
            FeedKind::Community => Category::ALL.iter().map(|c| c.label()).collect(),
            FeedKind::Blogs => self
                .collection
                .collection()
                .map(Collection::categories)
                .unwrap_or_default(),
        }
    }

    /// Toggle the n-th chip (1-based). Returns false if there is no such chip.
    pub fn toggle_category(&mut self, n: usize) -> bool {
        let Some(label) = n
            .checked_sub(1)
            .and_then(|idx| self.category_choices().get(idx).map(|c| c.to_string()))
        else {
            return false;
        };
        self.category_filter.toggle(&label);
        self.clamp_selection();
        true
    }

    /// Step the category selection through every chip, then back to none.
    ///
    /// Digit keys only reach the first nine chips; this reaches the rest.
    /// Returns the newly selected label, or `None` when the selection cleared
    /// or there are no chips.
    pub fn cycle_category(&mut self, forward: bool) -> Option<String> {
        let choices: Vec<String> = self
            .category_choices()
            .into_iter()
            .map(str::to_owned)
            .collect();
        if choices.is_empty() {
            return None;
        }

        let current = self
            .category_filter
            .selected()
            .and_then(|sel| choices.iter().position(|c| c == sel));
        let last = choices.len() - 1;
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(last),
            (Some(i), true) if i < last => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };

        self.category_filter.clear();
        let label = next.map(|i| choices[i].clone());
        if let Some(label) = &label {
            self.category_filter.toggle(label);
        }
        self.clamp_selection();
        label
    }

    /// Clear query and category. Returns true if anything was active.
    pub fn clear_filters(&mut self) -> bool {
        let active = !self.search_input.is_empty() || self.category_filter.selected().is_some();
        self.search_input.clear();
        self.category_filter.clear();
        self.clamp_selection();
        active
    }

    /// Append to the search query, respecting the length cap.
    pub fn push_search_char(&mut self, c: char) -> bool {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            return false;
        }
        self.search_input.push(c);
        self.selected = 0;
        true
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.clamp_selection();
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Keep `selected` inside the visible list.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.visible_items().len();
        if len > 0 {
            self.selected = self.selected.saturating_add(1).min(len - 1);
        }
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Enter `Loading` for the active view and return the new generation.
    ///
    /// Any in-flight load is aborted; a late result from it is ignored anyway.
    pub fn begin_load(&mut self) -> u64 {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous load task");
        }
        self.load_generation = self.load_generation.wrapping_add(1);
        self.collection = LoadState::Loading;
        self.selected = 0;
        self.spinner_frame = 0;
        tracing::debug!(kind = self.kind.name(), generation = self.load_generation, "Load started");
        self.load_generation
    }

    /// Apply a finished fetch. Returns false if the result was stale and dropped.
    pub fn apply_load_result(
        &mut self,
        kind: FeedKind,
        generation: u64,
        result: Result<Vec<Item>, ApiError>,
    ) -> bool {
        if kind != self.kind || generation != self.load_generation {
            tracing::debug!(
                kind = kind.name(),
                generation,
                current = self.load_generation,
                "Discarding stale load result"
            );
            return false;
        }

        self.load_handle = None;
        match result {
            Ok(items) => {
                tracing::info!(kind = kind.name(), count = items.len(), "View loaded");
                self.collection = LoadState::Loaded(Collection::new(items));
            }
            Err(e) => {
                tracing::warn!(kind = kind.name(), error = %e, "View load failed");
                self.collection = LoadState::Failed(format!("Failed to load posts: {}", e));
            }
        }
        self.clamp_selection();
        true
    }

    /// Discard the current view and make `kind` active.
    ///
    /// Filters, composer, reader and selection are reset and in-flight work is
    /// aborted. The caller starts the new view's load.
    pub fn switch_kind(&mut self, kind: FeedKind) {
        for handle in [self.load_handle.take(), self.submit_handle.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
        self.load_generation = self.load_generation.wrapping_add(1);
        self.submit_generation = self.submit_generation.wrapping_add(1);

        self.kind = kind;
        self.collection = LoadState::Unloaded;
        self.view = View::Listing;
        self.selected = 0;
        self.search_mode = false;
        self.search_input.clear();
        self.category_filter.clear();
        self.composer = None;
        self.clear_reader();
        tracing::info!(kind = kind.name(), "Switched view");
    }

    // ------------------------------------------------------------------------
    // Composer
    // ------------------------------------------------------------------------

    /// Open an empty composer. Returns false where posting is not available.
    pub fn open_composer(&mut self) -> bool {
        if !self.kind.supports_posting() {
            return false;
        }
        if self.composer.is_none() {
            self.composer = Some(ComposerState::default());
        }
        true
    }

    /// Close the composer and discard the draft.
    ///
    /// Refused while a submission is in flight. Returns true if closed.
    pub fn cancel_composer(&mut self) -> bool {
        match &self.composer {
            Some(c) if c.submitting => false,
            Some(_) => {
                self.composer = None;
                true
            }
            None => false,
        }
    }

    /// Validate the draft and mark it as submitting.
    ///
    /// Returns the generation and request body to send, or `None` when there is
    /// no composer, a submission is already in flight, or a field is missing.
    pub fn begin_submit(&mut self) -> Option<(u64, NewPost)> {
        let composer = self.composer.as_mut()?;
        if composer.submitting {
            tracing::debug!("Submit ignored, already in flight");
            return None;
        }
        let post = composer.draft.to_new_post().ok()?;

        composer.submitting = true;
        composer.error = None;
        self.submit_generation = self.submit_generation.wrapping_add(1);
        Some((self.submit_generation, post))
    }

    /// Apply a finished submission. Returns false if it was stale and dropped.
    ///
    /// On success the confirmed item goes to the front of a loaded collection
    /// and the composer closes with its draft reset. On failure the composer
    /// stays open with the draft intact and the error shown.
    pub fn apply_submit_result(&mut self, generation: u64, result: Result<Item, ApiError>) -> bool {
        if generation != self.submit_generation {
            tracing::debug!(generation, "Discarding stale submit result");
            return false;
        }
        self.submit_handle = None;

        match result {
            Ok(item) => {
                tracing::info!(id = %item.id, "Post published");
                if let Some(collection) = self.collection.collection_mut() {
                    collection.prepend(item);
                    self.selected = 0;
                    self.clamp_selection();
                }
                if let Some(composer) = self.composer.as_mut() {
                    composer.draft.reset();
                }
                self.composer = None;
                self.set_status("Post published");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create post");
                let message = format!("Failed to create post: {}", e);
                if let Some(composer) = self.composer.as_mut() {
                    composer.submitting = false;
                    composer.error = Some(message.clone());
                }
                self.set_status(message);
            }
        }
        true
    }

    // ------------------------------------------------------------------------
    // Reader
    // ------------------------------------------------------------------------

    /// Open the selected item full-screen. Returns false if nothing is selected.
    pub fn enter_reader(&mut self) -> bool {
        let Some(item) = self.selected_item().cloned() else {
            return false;
        };
        self.reader_lines = crate::ui::reader::body_lines(&item, self.kind, &self.theme);
        self.reader_item = Some(item);
        self.view = View::Reader;
        self.scroll_offset = 0;
        true
    }

    pub fn exit_reader(&mut self) {
        self.view = View::Listing;
        self.clear_reader();
    }

    fn clear_reader(&mut self) {
        self.reader_item = None;
        self.reader_lines.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Display lines of the reader body after wrapping to the viewport width.
    pub fn reader_content_lines(&self) -> usize {
        let width = self.reader_viewport_width.max(1);
        self.reader_lines
            .iter()
            .map(|line| {
                let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
                w.max(1).div_ceil(width)
            })
            .sum()
    }

    /// Keep the reader from scrolling past the end of its content.
    pub fn clamp_reader_scroll(&mut self) {
        let max_scroll = self
            .reader_content_lines()
            .saturating_sub(self.reader_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// True while a spinner should animate.
    pub fn is_busy(&self) -> bool {
        self.collection.is_loading() || self.composer.as_ref().is_some_and(|c| c.submitting)
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort in-flight tasks so nothing outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted load task on App drop");
        }
        if let Some(handle) = self.submit_handle.take() {
            handle.abort();
            tracing::debug!("Aborted submit task on App drop");
        }
    }
}
