use crate::app::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the category chips and the search line (two rows).
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 2 {
        return;
    }

    let chip_row = Rect { height: 1, ..area };
    let search_row = Rect {
        y: area.y + 1,
        height: 1,
        ..area
    };

    f.render_widget(Paragraph::new(chip_line(app)), chip_row);
    f.render_widget(Paragraph::new(search_line(app)), search_row);
}

/// One chip per category, numbered for the digit shortcuts.
fn chip_line(app: &App) -> Line<'static> {
    let selected = app.category_filter.selected();
    let mut spans = vec![Span::styled(
        " 0 All ",
        if selected.is_none() {
            app.style("chip_active")
        } else {
            app.style("chip")
        },
    )];

    for (i, label) in app.category_choices().into_iter().enumerate() {
        let role = if selected == Some(label) {
            "chip_active"
        } else {
            "chip"
        };
        spans.push(Span::raw(" "));
        let text = if i < 9 {
            format!(" {} {} ", i + 1, label)
        } else {
            format!(" {} ", label)
        };
        spans.push(Span::styled(text, app.style(role)));
    }
    Line::from(spans)
}

fn search_line(app: &App) -> Line<'static> {
    let prompt = Span::styled(" / ", app.style("search_prompt"));
    if app.search_mode {
        Line::from(vec![
            prompt,
            Span::styled(format!("{}_", app.search_input), app.style("reader_body")),
        ])
    } else if app.search_input.is_empty() {
        Line::from(vec![
            prompt,
            Span::styled("Search posts...", app.style("item_meta")),
        ])
    } else {
        Line::from(vec![
            prompt,
            Span::styled(app.search_input.clone(), app.style("reader_body")),
        ])
    }
}
