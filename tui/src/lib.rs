//! TUI rendering for bulletin using ratatui.
//!
//! The page has three regions: an employee selector pane, the post content
//! pane, and a status bar. All widget state is read from
//! [`bulletin_engine::App`]; nothing here mutates the page.

mod input;
mod theme;

pub use input::handle_events;
pub use theme::{Palette, palette};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use bulletin_engine::{App, PageState, Pane, RenderedPost, placeholder};
use bulletin_types::Tag;

const SELECTOR_WIDTH: u16 = 30;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = palette();

    let bg = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Selector + posts
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], &palette);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SELECTOR_WIDTH), Constraint::Min(1)])
        .split(chunks[1]);

    draw_selector(frame, app, panes[0], &palette);
    draw_content(frame, app, panes[1], &palette);
    draw_status_bar(frame, app, chunks[2], &palette);
}

fn draw_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let line = Line::from(vec![
        Span::styled(
            " bulletin ",
            Style::default()
                .fg(palette.bg_dark)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  employee posts",
            Style::default().fg(palette.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn pane_block<'a>(title: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    let border = if focused {
        palette.accent
    } else {
        palette.bg_border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_panel))
}

fn draw_selector(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused = app.focus() == Pane::Selector;
    let block = pane_block(" Employees ", focused, palette);
    let inner_width = area.width.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    if app.state() == PageState::LoadingUsers {
        lines.push(Line::styled(
            "loading…",
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let item_style = if app.selector_disabled() {
        Style::default().fg(palette.text_disabled)
    } else {
        Style::default().fg(palette.text_primary)
    };

    for (index, option) in app.options().iter().enumerate() {
        let highlighted = index == app.cursor();
        let marker = if highlighted { "› " } else { "  " };
        let label = truncate_to_width(&option.label, inner_width.saturating_sub(2));
        let mut style = item_style;
        if highlighted && !app.selector_disabled() {
            style = style.bg(palette.bg_highlight).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::styled(format!("{marker}{label}"), style));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused = app.focus() == Pane::Posts;
    let block = pane_block(" Posts ", focused, palette);

    let Some(posts) = app.content() else {
        // No post data was ever requested; show the placeholder.
        let node = placeholder();
        let line = Line::styled(
            node.text,
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        );
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut focused_start = 0;
    for (index, post) in posts.iter().enumerate() {
        if index == app.focused_post() {
            focused_start = lines.len();
        }
        lines.extend(post_lines(post, focused && index == app.focused_post(), palette));
    }

    // Keep the focused post in view; wrapping may shift this by a few
    // lines, which is acceptable for this page.
    let viewport = area.height.saturating_sub(2) as usize;
    let scroll = if focused_start + 1 > viewport {
        (focused_start + 1 - viewport) as u16
    } else {
        0
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

/// Lines for one post article: body nodes, the comment toggle, and the
/// comment section when expanded. The toggle label and section visibility
/// both come from the post's visibility enum.
fn post_lines(post: &RenderedPost, focused: bool, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for node in &post.body {
        let style = match node.tag {
            Tag::Heading => Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(palette.text_primary),
        };
        let marker = if focused && node.tag == Tag::Heading {
            "› "
        } else {
            "  "
        };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(palette.accent)),
            Span::styled(node.text.clone(), style),
        ]));
    }

    let button_style = if focused {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.primary)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("[ {} ]", post.button_label()), button_style),
    ]));

    if !post.comments_hidden() {
        for article in &post.section.children {
            for node in &article.children {
                let style = match node.tag {
                    Tag::Subheading => Style::default()
                        .fg(palette.text_secondary)
                        .add_modifier(Modifier::BOLD),
                    _ if node.text.starts_with("From: ") => {
                        Style::default().fg(palette.text_muted)
                    }
                    _ => Style::default().fg(palette.text_primary),
                };
                lines.push(Line::from(vec![
                    Span::styled("  │ ".to_string(), Style::default().fg(palette.bg_border)),
                    Span::styled(node.text.clone(), style),
                ]));
            }
        }
        if post.section.children.is_empty() {
            lines.push(Line::styled(
                "  │ no comments",
                Style::default()
                    .fg(palette.text_muted)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
    }

    lines.push(Line::raw(""));
    lines
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let (text, color) = status_text(app, palette);
    let hints = Span::styled(
        " Tab panes · ↑/↓ move · Enter select/toggle · q quit ",
        Style::default().fg(palette.text_muted),
    );
    let line = Line::from(vec![Span::styled(text, Style::default().fg(color)), hints]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(palette.bg_panel)),
        area,
    );
}

fn status_text(app: &App, palette: &Palette) -> (String, ratatui::style::Color) {
    if let Some(error) = app.last_error() {
        return (format!(" error: {error} "), palette.error);
    }
    let text = match app.state() {
        PageState::Uninitialized => " starting ".to_string(),
        PageState::LoadingUsers => " loading employees… ".to_string(),
        PageState::Idle { selected: None } => " select an employee ".to_string(),
        PageState::LoadingPosts { selected } => format!(" loading posts for {selected}… "),
        PageState::Idle {
            selected: Some(user),
        } => {
            let name = app
                .options()
                .iter()
                .find(|option| option.value == user)
                .map_or_else(|| user.to_string(), |option| option.label.clone());
            format!(" posts by {name} ")
        }
    };
    let color = if app.state().is_loading() {
        palette.warning
    } else {
        palette.success
    };
    (text, color)
}

fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletin_types::{CommentVisibility, Fragment, Node, PostId};

    fn rendered_post(expanded: bool) -> RenderedPost {
        let mut body = Fragment::new();
        body.push(Node::element(Some(Tag::Heading), Some("Title"), None));
        body.push(Node::element(None, Some("body"), None));

        let comment = Node::element(Some(Tag::Article), None, None).with_children(vec![
            Node::element(Some(Tag::Subheading), Some("Ann"), None),
            Node::element(None, Some("hi"), None),
            Node::element(None, Some("From: ann@x.dev"), None),
        ]);
        let section = Node::element(Some(Tag::Section), None, Some("comments"))
            .with_post_id(PostId::new(1))
            .with_children(vec![comment]);

        RenderedPost {
            id: PostId::new(1),
            body,
            section,
            visibility: if expanded {
                CommentVisibility::Expanded
            } else {
                CommentVisibility::Collapsed
            },
        }
    }

    fn rendered_text(lines: &[Line<'static>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn collapsed_post_shows_the_toggle_but_no_comments() {
        let palette = palette();
        let lines = rendered_text(&post_lines(&rendered_post(false), false, &palette));
        assert!(lines.iter().any(|l| l.contains("[ Show Comments ]")));
        assert!(!lines.iter().any(|l| l.contains("ann@x.dev")));
    }

    #[test]
    fn expanded_post_shows_comments_and_the_hide_label() {
        let palette = palette();
        let lines = rendered_text(&post_lines(&rendered_post(true), false, &palette));
        assert!(lines.iter().any(|l| l.contains("[ Hide Comments ]")));
        assert!(lines.iter().any(|l| l.contains("Ann")));
        assert!(lines.iter().any(|l| l.contains("From: ann@x.dev")));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a very long label", 8), "a very …");
    }
}
