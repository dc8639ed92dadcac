//! Application event handling.
//!
//! Applies results from background loads and submissions to `App`.

use crate::app::{App, AppEvent};
use crate::feed::LoadState;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CollectionLoaded {
            kind,
            generation,
            result,
        } => {
            let failed = result.is_err();
            if app.apply_load_result(kind, generation, result) && failed {
                app.set_status("Failed to load posts");
            }
        }
        AppEvent::PostSubmitted { generation, result } => {
            app.apply_submit_result(generation, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            recover_from_panic(app, task);
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

/// Leave no state stuck in flight after its task died.
fn recover_from_panic(app: &mut App, task: &str) {
    match task {
        "load" if app.collection.is_loading() => {
            app.load_handle = None;
            app.collection = LoadState::Failed("Failed to load posts: internal error".to_string());
        }
        "submit" => {
            app.submit_handle = None;
            if let Some(composer) = app.composer.as_mut() {
                composer.submitting = false;
                composer.error = Some("Failed to create post: internal error".to_string());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiError, FeedKind};
    use std::time::Duration;

    fn test_app() -> App {
        let api = ApiClient::new("http://localhost:5000", Duration::from_secs(5)).unwrap();
        App::new(api, FeedKind::Community)
    }

    #[tokio::test]
    async fn test_failed_load_sets_status() {
        let mut app = test_app();
        let generation = app.begin_load();
        handle_app_event(
            &mut app,
            AppEvent::CollectionLoaded {
                kind: FeedKind::Community,
                generation,
                result: Err(ApiError::HttpStatus(500)),
            },
        );
        assert!(app.collection.error().is_some());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_stale_failure_is_silent() {
        let mut app = test_app();
        let stale = app.begin_load();
        app.begin_load();
        handle_app_event(
            &mut app,
            AppEvent::CollectionLoaded {
                kind: FeedKind::Community,
                generation: stale,
                result: Err(ApiError::Timeout(30)),
            },
        );
        assert!(app.collection.is_loading());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_load_panic_leaves_failed_state() {
        let mut app = test_app();
        app.begin_load();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "load",
                error: "boom".to_string(),
            },
        );
        assert!(!app.collection.is_loading());
        assert!(app.collection.error().is_some());
    }

    #[tokio::test]
    async fn test_submit_panic_unlocks_composer() {
        let mut app = test_app();
        app.open_composer();
        if let Some(composer) = app.composer.as_mut() {
            composer.submitting = true;
        }
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "submit",
                error: "boom".to_string(),
            },
        );
        let composer = app.composer.as_ref().unwrap();
        assert!(!composer.submitting);
        assert!(composer.error.is_some());
    }
}
