//! Helper functions for UI operations.
//!
//! Background work (collection loads and post submissions) is spawned from
//! here. Each task reports back over the `AppEvent` channel and is tagged with
//! the generation it was started under so late results can be discarded.

use crate::api::{ApiClient, FeedKind, NewPost};
use crate::app::{App, AppEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Report a caught panic to the event loop.
async fn report_panic(tx: &mpsc::Sender<AppEvent>, task: &'static str, error: String) {
    tracing::error!(task, error = %error, "Background task panicked");
    let _ = tx.send(AppEvent::TaskPanicked { task, error }).await;
}

/// Put the active view into `Loading` and fetch its collection.
pub(super) fn start_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_load();
    app.load_handle = Some(spawn_load(
        app.api.clone(),
        app.kind,
        generation,
        event_tx.clone(),
    ));
}

/// Submit the composer's draft if it is complete and nothing is in flight.
///
/// Returns false when the submission was not started.
pub(super) fn start_submit(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    let Some((generation, post)) = app.begin_submit() else {
        return false;
    };
    app.submit_handle = Some(spawn_submit(
        app.api.clone(),
        post,
        generation,
        event_tx.clone(),
    ));
    true
}

/// Spawn a background fetch of `kind`'s collection.
///
/// Sends `AppEvent::CollectionLoaded` on completion (success or failure).
/// The returned handle lets the caller abort the fetch when the view changes.
pub(super) fn spawn_load(
    api: ApiClient,
    kind: FeedKind,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        let outcome = catch_task_panic(async {
            let result = api.fetch_collection(kind).await;
            if let Err(e) = tx
                .send(AppEvent::CollectionLoaded {
                    kind,
                    generation,
                    result,
                })
                .await
            {
                tracing::warn!(error = %e, event = "CollectionLoaded", "Channel send failed (receiver dropped)");
            }
        })
        .await;

        if let Err(panic_msg) = outcome {
            report_panic(&tx_panic, "load", panic_msg).await;
        }
    })
}

/// Spawn a background POST of a new community post.
///
/// Sends `AppEvent::PostSubmitted` on completion (success or failure).
pub(super) fn spawn_submit(
    api: ApiClient,
    post: NewPost,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        let outcome = catch_task_panic(async {
            let result = api.create_post(&post).await;
            if let Err(e) = tx
                .send(AppEvent::PostSubmitted { generation, result })
                .await
            {
                tracing::warn!(error = %e, event = "PostSubmitted", "Channel send failed (receiver dropped)");
            }
        })
        .await;

        if let Err(panic_msg) = outcome {
            report_panic(&tx_panic, "submit", panic_msg).await;
        }
    })
}
