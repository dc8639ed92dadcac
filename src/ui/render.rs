//! Render functions for the TUI.
//!
//! Screen layout, top to bottom: header, chip bar and search line (listing
//! only), listing or reader body, status bar. Composer and help draw on top.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{composer, feed_list, filters, help, reader, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Listing => render_listing(f, app, area),
        View::Reader => render_reader(f, app, area),
    }

    composer::render(f, app);

    if app.show_help {
        help::render(f, app);
    }
}

fn render_listing(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(2), // chips + search
            Constraint::Min(0),
            Constraint::Length(1), // status
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    filters::render(f, app, chunks[1]);
    feed_list::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);
}

fn render_reader(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    reader::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);
}

/// View title with the other view's name as a switch hint.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.kind.title()), app.style("reader_heading")),
        Span::styled(
            format!("  Tab: {}", app.kind.other().title()),
            app.style("item_meta"),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
