use crate::app::{App, View};
use crate::keybindings::{Action, Context};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    f.render_widget(
        Paragraph::new(status_text(app)).style(app.style("status_bar")),
        area,
    );
}

/// The toast if one is showing, else key hints for the active context.
fn status_text(app: &App) -> String {
    if let Some((msg, _)) = &app.status_message {
        return msg.to_string();
    }

    if app.composer.is_some() {
        return hints(
            app,
            Context::Composer,
            &[
                (Action::NextField, "next field"),
                (Action::SubmitPost, "submit"),
                (Action::CancelComposer, "discard"),
            ],
        );
    }
    if app.search_mode {
        return format!(
            "Type to filter {}",
            hints(
                app,
                Context::Search,
                &[(Action::ExitSearch, "clear"), (Action::CommitSearch, "keep")],
            )
        );
    }

    match app.view {
        View::Listing => {
            let switch_label = if app.kind.supports_posting() {
                "blog"
            } else {
                "community"
            };
            let mut listing = vec![
                (Action::EnterSearch, "search"),
                (Action::ToggleCategory(1), "category"),
                (Action::ClearFilters, "clear"),
            ];
            if app.kind.supports_posting() {
                listing.push((Action::NewPost, "new post"));
            }
            listing.extend([
                (Action::SwitchView, switch_label),
                (Action::Reload, "reload"),
                (Action::ShowHelp, "help"),
                (Action::Quit, "quit"),
            ]);
            hints(app, Context::Listing, &listing)
        }
        View::Reader => hints(
            app,
            Context::Reader,
            &[
                (Action::ExitReader, "back"),
                (Action::ScrollDown, "scroll"),
                (Action::PageDown, "page"),
                (Action::Quit, "quit"),
            ],
        ),
    }
}

/// `[key]label` pairs from the live bindings. Unbound actions are skipped.
fn hints(app: &App, context: Context, actions: &[(Action, &str)]) -> String {
    actions
        .iter()
        .filter_map(|&(action, label)| {
            let key = match action {
                Action::ToggleCategory(_) => Some("1-9".to_string()),
                _ => app.keybindings.key_label(action, context),
            };
            key.map(|key| format!("[{}]{}", key, label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
