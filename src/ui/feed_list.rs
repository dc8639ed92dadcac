use crate::app::App;
use crate::feed::LoadState;
use crate::util::truncate_to_width;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Braille spinner, one glyph per tick.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Format timestamp as relative time
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();

    // Clock skew between client and server
    if diff < 60 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    timestamp.format("%b %d").to_string()
}

/// Render the item list
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style(if app.composer.is_some() {
            "panel_border"
        } else {
            "panel_border_focused"
        }));

    let placeholder = match &app.collection {
        LoadState::Unloaded => Some(("".to_string(), "item_meta")),
        LoadState::Loading => Some((
            format!("{} Loading posts...", SPINNER[app.spinner_frame % SPINNER.len()]),
            "loading",
        )),
        LoadState::Failed(error) => Some((format!("{}\n\nPress r to retry.", error), "error_text")),
        LoadState::Loaded(_) => None,
    };
    if let Some((text, role)) = placeholder {
        let paragraph = Paragraph::new(text)
            .style(app.style(role))
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let visible = app.visible_items();
    if visible.is_empty() {
        let msg = if app.collection.items().is_empty() {
            "No posts yet"
        } else {
            "No posts match the current filters"
        };
        f.render_widget(
            Paragraph::new(msg).style(app.style("item_meta")).block(block),
            area,
        );
        return;
    }

    let now = Utc::now();
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let title_style = if i == app.selected {
                app.style("item_selected")
            } else {
                app.style("item_title")
            };

            let mut meta = vec![
                Span::styled(
                    format!("[{}] ", item.primary_category()),
                    app.style("item_category"),
                ),
                Span::styled(
                    format!(
                        "{} • {}",
                        item.author_label(),
                        format_relative_time(item.created_at, now)
                    ),
                    app.style("item_meta"),
                ),
            ];
            if let Some(engagement) = &item.engagement {
                meta.push(Span::styled(
                    format!(
                        "  ♥ {}  💬 {}",
                        engagement.likes,
                        engagement.comments.len()
                    ),
                    app.style("item_engagement"),
                ));
            } else if let Some(read_time) = &item.read_time {
                meta.push(Span::styled(format!("  {}", read_time), app.style("item_meta")));
            }

            // Previews are single-line; newlines in the body would break the row
            let preview = item.preview().replace('\n', " ");

            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate_to_width(&item.title, width).into_owned(),
                    title_style,
                )),
                Line::from(meta),
                Line::from(Span::styled(
                    truncate_to_width(&preview, width).into_owned(),
                    app.style("item_preview"),
                )),
                Line::from(""),
            ])
        })
        .collect();

    let title = format!(" {} of {} ", visible.len(), app.collection.items().len());
    let list = List::new(items).block(block.title(title));
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(now, now), "now");
        assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5m");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3h");
        assert_eq!(format_relative_time(now - Duration::days(2), now), "2d");
        assert_eq!(format_relative_time(now - Duration::days(30), now), "May 16");
    }

    #[test]
    fn test_future_timestamp_is_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(now + Duration::hours(1), now), "now");
    }
}
