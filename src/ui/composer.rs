//! Post composer overlay.
//!
//! Four fields stacked vertically: title, body, category and anonymity. The
//! focused field is highlighted; the footer shows what is still missing.

use crate::app::{App, ComposerField, ComposerState};
use crate::feed::DraftError;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::feed_list::SPINNER;
use super::help::centered_rect;

/// Render the composer dialog if one is open.
pub fn render(f: &mut Frame, app: &App) {
    let Some(composer) = app.composer.as_ref() else {
        return;
    };

    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 30 || overlay.height < 12 {
        return;
    }
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("composer_border"))
        .title(" New community post ");
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(3),    // body
            Constraint::Length(1), // category
            Constraint::Length(1), // anonymous
            Constraint::Length(2), // footer
        ])
        .split(inner);

    let field_style = |field: ComposerField| {
        if composer.field == field {
            app.style("composer_field_active")
        } else {
            app.style("composer_label")
        }
    };
    let cursor = |field: ComposerField| if composer.field == field { "_" } else { "" };

    let title = Paragraph::new(format!("{}{}", composer.draft.title, cursor(ComposerField::Title)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(field_style(ComposerField::Title))
                .title(" Title "),
        );
    f.render_widget(title, rows[0]);

    let body = Paragraph::new(format!("{}{}", composer.draft.body, cursor(ComposerField::Body)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(field_style(ComposerField::Body))
                .title(" Content "),
        );
    f.render_widget(body, rows[1]);

    let category = composer
        .draft
        .category
        .map(|c| c.label())
        .unwrap_or("(choose with ←/→)");
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Category:  ", field_style(ComposerField::Category)),
            Span::styled(format!("◀ {} ▶", category), app.style("reader_body")),
        ])),
        rows[2],
    );

    let checkbox = if composer.draft.anonymous { "[x]" } else { "[ ]" };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Anonymous: ", field_style(ComposerField::Anonymous)),
            Span::styled(
                format!("{} post without your name", checkbox),
                app.style("reader_body"),
            ),
        ])),
        rows[3],
    );

    f.render_widget(
        Paragraph::new(footer(app, composer)).wrap(Wrap { trim: true }),
        rows[4],
    );
}

fn footer(app: &App, composer: &ComposerState) -> Line<'static> {
    if composer.submitting {
        return Line::from(Span::styled(
            format!(
                " {} Publishing...",
                SPINNER[app.spinner_frame % SPINNER.len()]
            ),
            app.style("loading"),
        ));
    }
    if let Some(error) = &composer.error {
        return Line::from(Span::styled(format!(" {}", error), app.style("composer_error")));
    }

    let missing: Vec<&str> = composer
        .draft
        .missing_fields()
        .into_iter()
        .map(DraftError::field_name)
        .collect();

    let text = if missing.is_empty() {
        publish_hint(app)
    } else {
        format!(" Needs {}", missing.join(", "))
    };
    Line::from(Span::styled(text, app.style("composer_hint")))
}

fn publish_hint(app: &App) -> String {
    let key = |action| {
        app.keybindings
            .key_label(action, Context::Composer)
            .unwrap_or_else(|| "?".to_string())
    };
    format!(
        " {} to publish, {} to discard",
        key(Action::SubmitPost),
        key(Action::CancelComposer)
    )
}
