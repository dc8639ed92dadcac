use crate::api::{FeedKind, Item};
use crate::app::{App, MAX_SCROLL};
use crate::theme::StyleMap;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the full-screen reader view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Layout may produce zero-sized rects during extreme terminal resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Inner area excludes the borders
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_viewport_width = area.width.saturating_sub(2) as usize;
    app.clamp_reader_scroll();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(app.kind.title());

    if app.reader_item.is_none() {
        f.render_widget(Paragraph::new("No post selected").block(block), area);
        return;
    }

    let text = Text::from_iter(app.reader_lines.iter().cloned());
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

/// Build the reader's lines for an item: header, body and, for community
/// posts, engagement and comments.
///
/// Blog bodies are markdown; community bodies are shown as typed.
pub fn body_lines(item: &Item, kind: FeedKind, theme: &StyleMap) -> Vec<Line<'static>> {
    let meta = theme.resolve("reader_metadata");
    let mut meta_parts = vec![
        item.author_label().into_owned(),
        item.created_at.format("%b %d, %Y").to_string(),
        item.category_list(),
    ];
    if let Some(read_time) = &item.read_time {
        meta_parts.push(read_time.clone());
    }

    let mut lines = vec![
        Line::from(Span::styled(item.title.clone(), theme.resolve("reader_heading"))),
        Line::from(Span::styled(meta_parts.join(" • "), meta)),
        Line::from(""),
    ];

    match kind {
        FeedKind::Blogs => lines.extend(render_markdown(&item.body, theme)),
        FeedKind::Community => {
            let body = theme.resolve("reader_body");
            lines.extend(
                item.body
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), body))),
            );
        }
    }

    if let Some(engagement) = &item.engagement {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "♥ {} likes • {} comments",
                engagement.likes,
                engagement.comments.len()
            ),
            theme.resolve("item_engagement"),
        )));

        if !engagement.comments.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Comments",
                theme.resolve("reader_heading"),
            )));
        }
        for comment in &engagement.comments {
            let who = if comment.anonymous {
                "Anonymous User"
            } else {
                "User"
            };
            let when = comment
                .timestamp
                .map(|t| format!(" • {}", t.format("%b %d, %Y")))
                .unwrap_or_default();
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("{}{}", who, when), meta)));
            lines.extend(comment.content.lines().map(|l| {
                Line::from(Span::styled(
                    format!("  {}", l),
                    theme.resolve("reader_comment"),
                ))
            }));
        }
    }

    lines
}

/// Convert markdown to styled ratatui Lines.
pub fn render_markdown(md: &str, theme: &StyleMap) -> Vec<Line<'static>> {
    let parser = Parser::new(md);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;

    let flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut current_spans, &mut lines);
                lines.push(Line::from(""));
                in_heading = false;
            }
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current_spans, &mut lines);
                lines.push(Line::from(""));
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::Item) => current_spans.push(Span::raw("• ")),
            Event::End(TagEnd::Item) => flush(&mut current_spans, &mut lines),
            Event::End(TagEnd::List(_)) => lines.push(Line::from("")),
            Event::Start(Tag::Emphasis) => in_emphasis = true,
            Event::End(TagEnd::Emphasis) => in_emphasis = false,
            Event::Start(Tag::Strong) => in_strong = true,
            Event::End(TagEnd::Strong) => in_strong = false,
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    theme.resolve("reader_image"),
                ));
            }
            Event::Text(text) if in_code_block => {
                // Code blocks arrive as one text event with embedded newlines
                let style = theme.resolve("reader_code_block");
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(line.to_string(), style)));
                }
            }
            Event::Text(text) => {
                let role = if in_heading {
                    "reader_heading"
                } else if in_strong {
                    "reader_strong"
                } else if in_emphasis {
                    "reader_emphasis"
                } else {
                    "reader_body"
                };
                current_spans.push(Span::styled(text.into_string(), theme.resolve(role)));
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    theme.resolve("reader_inline_code"),
                ));
            }
            Event::SoftBreak => current_spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut current_spans, &mut lines),
            _ => {}
        }
    }

    flush(&mut current_spans, &mut lines);
    lines
}
