//! Input handling for the TUI.
//!
//! Keys are routed by mode, highest priority first: help overlay, composer,
//! search line, then the listing or reader view.

use crate::app::{App, AppEvent, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{start_load, start_submit};
use super::Action;

/// Lines moved by a page scroll when the viewport height is not yet known.
const DEFAULT_PAGE: usize = 20;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.composer.is_some() {
        return handle_composer_input(app, code, modifiers, event_tx);
    }

    if app.search_mode {
        return handle_search_input(app, code, modifiers);
    }

    match app.view {
        View::Listing => handle_listing_input(app, code, modifiers, event_tx),
        View::Reader => handle_reader_input(app, code, modifiers),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Commands shared by the listing and reader views.
///
/// Returns `None` when the action was handled here.
fn handle_common_action(app: &mut App, action: KbAction) -> Option<Action> {
    match action {
        KbAction::Quit => Some(Action::Quit),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            None
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
            None
        }
        _ => Some(Action::Continue),
    }
}

/// Handle input in the listing view.
fn handle_listing_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Listing)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Select => {
            app.enter_reader();
        }
        KbAction::Back | KbAction::ClearFilters => {
            if app.clear_filters() {
                app.set_status("Filters cleared");
            }
        }
        KbAction::Reload => start_load(app, event_tx),
        KbAction::SwitchView => {
            app.switch_kind(app.kind.other());
            start_load(app, event_tx);
        }
        KbAction::NewPost => {
            if !app.open_composer() {
                app.set_status("Posting is only available in the community forum");
            }
        }
        KbAction::EnterSearch => app.search_mode = true,
        KbAction::ToggleCategory(n) => {
            if !app.toggle_category(usize::from(n)) {
                app.set_status(format!("No category {}", n));
            }
        }
        KbAction::NextCategory | KbAction::PrevCategory => {
            match app.cycle_category(action == KbAction::NextCategory) {
                Some(label) => app.set_status(format!("Category: {}", label)),
                None => app.set_status("All categories"),
            }
        }
        other => {
            if let Some(result) = handle_common_action(app, other) {
                return result;
            }
        }
    }
    Action::Continue
}

/// Handle input in the reader view.
fn handle_reader_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Reader)
    else {
        return Action::Continue;
    };

    let page = match app.reader_visible_lines {
        0 => DEFAULT_PAGE,
        n => n,
    };

    match action {
        KbAction::ExitReader => app.exit_reader(),
        KbAction::ScrollDown => {
            app.scroll_down(1);
            app.clamp_reader_scroll();
        }
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => {
            app.scroll_down(page);
            app.clamp_reader_scroll();
        }
        KbAction::PageUp => app.scroll_up(page),
        other => {
            if let Some(result) = handle_common_action(app, other) {
                return result;
            }
        }
    }
    Action::Continue
}

/// Handle input while the search line has focus.
///
/// The listing is refiltered as the query changes; Enter keeps the query and
/// returns focus to the list, Esc clears it.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => {
            app.search_mode = false;
            app.search_input.clear();
            app.clamp_selection();
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            app.search_mode = false;
            return Action::Continue;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if !app.push_search_char(c) {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the composer dialog is open.
fn handle_composer_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Composer);

    match action {
        Some(KbAction::SubmitPost) => {
            submit_composer(app, event_tx);
            return Action::Continue;
        }
        Some(KbAction::CancelComposer) => {
            if !app.cancel_composer() {
                app.set_status("Submitting, please wait");
            }
            return Action::Continue;
        }
        _ => {}
    }

    let Some(composer) = app.composer.as_mut() else {
        return Action::Continue;
    };

    // Navigation stays available while a submission is in flight
    match action {
        Some(KbAction::NextField) => composer.field = composer.field.next(),
        Some(KbAction::PrevField) => composer.field = composer.field.prev(),
        _ if composer.submitting => {}
        _ => match code {
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                composer.insert_char(c)
            }
            KeyCode::Enter => composer.insert_newline(),
            KeyCode::Backspace => composer.backspace(),
            KeyCode::Left => composer.step(false),
            KeyCode::Right => composer.step(true),
            _ => {}
        },
    }
    Action::Continue
}

fn submit_composer(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(composer) = app.composer.as_ref() else {
        return;
    };
    if composer.submitting {
        return;
    }

    if let Some(first) = composer.draft.missing_fields().first() {
        app.set_status(format!("Cannot submit: {} is required", first.field_name()));
        return;
    }

    if start_submit(app, event_tx) {
        app.set_status("Publishing post...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, Category, FeedKind, Item};
    use crate::app::ComposerField;
    use chrono::Utc;
    use std::time::Duration;

    fn test_app(kind: FeedKind) -> (App, mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (tx, rx) = mpsc::channel(16);
        (App::new(api, kind), tx, rx)
    }

    fn item(id: &str, title: &str, category: &str) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            body: "body".to_string(),
            categories: vec![category.to_string()],
            author: None,
            created_at: Utc::now(),
            anonymous: None,
            engagement: None,
            summary: None,
            read_time: None,
        }
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    fn type_str(app: &mut App, tx: &mpsc::Sender<AppEvent>, s: &str) {
        for c in s.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    fn load(app: &mut App, items: Vec<Item>) {
        let generation = app.begin_load();
        app.apply_load_result(app.kind, generation, Ok(items));
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut app, tx, _rx) = test_app(FeedKind::Blogs);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_search_typing_filters_and_esc_clears() {
        let (mut app, tx, _rx) = test_app(FeedKind::Blogs);
        load(
            &mut app,
            vec![item("1", "Tenant rights", "Housing"), item("2", "Wills", "Family")],
        );

        press(&mut app, &tx, KeyCode::Char('/'));
        assert!(app.search_mode);
        type_str(&mut app, &tx, "q");
        // 'q' is text while searching, not quit
        assert_eq!(app.search_input, "q");
        press(&mut app, &tx, KeyCode::Backspace);
        type_str(&mut app, &tx, "wills");
        assert_eq!(app.visible_items().len(), 1);

        press(&mut app, &tx, KeyCode::Esc);
        assert!(!app.search_mode);
        assert!(app.search_input.is_empty());
        assert_eq!(app.visible_items().len(), 2);
    }

    #[tokio::test]
    async fn test_search_enter_keeps_query() {
        let (mut app, tx, _rx) = test_app(FeedKind::Blogs);
        press(&mut app, &tx, KeyCode::Char('/'));
        type_str(&mut app, &tx, "lease");
        press(&mut app, &tx, KeyCode::Enter);
        assert!(!app.search_mode);
        assert_eq!(app.search_input, "lease");
    }

    #[tokio::test]
    async fn test_digit_toggles_chip() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        load(
            &mut app,
            vec![item("1", "A", "Legal Advice"), item("2", "B", "Success Stories")],
        );
        press(&mut app, &tx, KeyCode::Char('5'));
        assert_eq!(app.category_filter.selected(), Some("Success Stories"));
        assert_eq!(app.visible_items().len(), 1);

        press(&mut app, &tx, KeyCode::Char('0'));
        assert_eq!(app.category_filter.selected(), None);

        press(&mut app, &tx, KeyCode::Char('9'));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_new_post_only_in_community() {
        let (mut app, tx, _rx) = test_app(FeedKind::Blogs);
        press(&mut app, &tx, KeyCode::Char('n'));
        assert!(app.composer.is_none());
        assert!(app.status_message.is_some());

        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        press(&mut app, &tx, KeyCode::Char('n'));
        assert!(app.composer.is_some());
    }

    #[tokio::test]
    async fn test_composer_typing_and_fields() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        press(&mut app, &tx, KeyCode::Char('n'));
        type_str(&mut app, &tx, "Eviction");
        press(&mut app, &tx, KeyCode::Tab);
        type_str(&mut app, &tx, "q?");
        press(&mut app, &tx, KeyCode::Tab);
        press(&mut app, &tx, KeyCode::Right);
        press(&mut app, &tx, KeyCode::Right);

        let composer = app.composer.as_ref().unwrap();
        assert_eq!(composer.draft.title, "Eviction");
        assert_eq!(composer.draft.body, "q?");
        assert_eq!(composer.field, ComposerField::Category);
        assert_eq!(composer.draft.category, Some(Category::PersonalExperience));

        press(&mut app, &tx, KeyCode::Esc);
        assert!(app.composer.is_none());
    }

    #[tokio::test]
    async fn test_incomplete_submit_names_missing_field() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        press(&mut app, &tx, KeyCode::Char('n'));
        type_str(&mut app, &tx, "Title only");
        handle_input(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL, &tx);

        let composer = app.composer.as_ref().unwrap();
        assert!(!composer.submitting);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("content"));
    }

    #[tokio::test]
    async fn test_edits_ignored_while_submitting() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        press(&mut app, &tx, KeyCode::Char('n'));
        if let Some(composer) = app.composer.as_mut() {
            composer.submitting = true;
        }
        type_str(&mut app, &tx, "abc");
        press(&mut app, &tx, KeyCode::Esc);

        let composer = app.composer.as_ref().unwrap();
        assert!(composer.draft.title.is_empty());
    }

    #[tokio::test]
    async fn test_switch_view_starts_load() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        press(&mut app, &tx, KeyCode::Tab);
        assert_eq!(app.kind, FeedKind::Blogs);
        assert!(app.collection.is_loading());
    }

    #[tokio::test]
    async fn test_reader_navigation() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        load(&mut app, vec![item("1", "A", "Legal Advice")]);
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.view, View::Reader);

        press(&mut app, &tx, KeyCode::Char('k'));
        assert_eq!(app.scroll_offset, 0);
        press(&mut app, &tx, KeyCode::Char('b'));
        assert_eq!(app.view, View::Listing);
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let (mut app, tx, _rx) = test_app(FeedKind::Community);
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        assert!(matches!(
            press(&mut app, &tx, KeyCode::Char('q')),
            Action::Continue
        ));
        assert!(!app.show_help);
    }
}
