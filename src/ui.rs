//! Widget helpers shared by the draw functions in `main.rs`

use ratatui::{prelude::*, widgets::*};

use crate::messages::render::NoticeLevel;
use crate::messages::ui_events::RowField;
use crate::models::{HttpMethod, KeyValue};

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Renders a params/headers table. The selected row is highlighted and, while
/// editing, the cell under the cursor is underlined.
pub fn render_key_value_table<'a>(
    rows: &'a [KeyValue],
    selected: usize,
    editing: Option<RowField>,
    is_focused: bool,
) -> Table<'a> {
    let rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, kv)| {
            let is_selected = is_focused && i == selected;
            let cell = |text: &'a str, field: RowField| {
                let mut style = if text.is_empty() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                if is_selected && editing == Some(field) {
                    style = style.fg(Color::Yellow).underlined();
                }
                let shown = if text.is_empty() { "·" } else { text };
                Cell::from(shown).style(style)
            };

            let row = Row::new(vec![cell(&kv.key, RowField::Key), cell(&kv.value, RowField::Value)]);
            if is_selected {
                row.style(Style::default().bold())
            } else {
                row
            }
        })
        .collect();

    Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
        .header(
            Row::new(vec!["Key", "Value"])
                .style(Style::default().fg(Color::DarkGray).italic()),
        )
        .column_spacing(2)
}

/// Simple JSON syntax highlighting, one `Line` per input line
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| Line::from(highlight_json_line(line)))
        .collect()
}

fn highlight_json_line(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut chars = line.char_indices().peekable();

    let flush = |plain: &mut String, spans: &mut Vec<Span<'static>>| {
        if !plain.is_empty() {
            spans.push(Span::raw(std::mem::take(plain)));
        }
    };

    while let Some((start, c)) = chars.next() {
        match c {
            '"' => {
                flush(&mut plain, &mut spans);
                let mut end = line.len();
                let mut escaped = false;
                for (i, ch) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        end = i + 1;
                        break;
                    }
                }
                // A string directly followed by ':' is an object key
                let is_key = line[end..].trim_start().starts_with(':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(
                    line[start..end].to_string(),
                    Style::default().fg(color),
                ));
            }
            '{' | '}' | '[' | ']' => {
                flush(&mut plain, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            '-' | '0'..='9' => {
                flush(&mut plain, &mut spans);
                let mut number = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_digit() || matches!(next, '.' | 'e' | 'E' | '+' | '-') {
                        number.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                spans.push(Span::styled(number, Style::default().fg(Color::LightYellow)));
            }
            _ => {
                let rest = &line[start..];
                let literal = ["true", "false", "null"]
                    .into_iter()
                    .find(|lit| rest.starts_with(lit));
                match literal {
                    Some(lit) => {
                        flush(&mut plain, &mut spans);
                        spans.push(Span::styled(lit, Style::default().fg(Color::Magenta)));
                        for _ in 1..lit.len() {
                            chars.next();
                        }
                    }
                    None => plain.push(c),
                }
            }
        }
    }
    flush(&mut plain, &mut spans);
    spans
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        HttpMethod::HEAD | HttpMethod::OPTIONS => Color::Gray,
    }
}

pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(line: &Line, text: &str) -> Option<Color> {
        line.spans
            .iter()
            .find(|s| s.content == text)
            .and_then(|s| s.style.fg)
    }

    #[test]
    fn test_highlight_keys_and_values() {
        let lines = highlight_json("{\n  \"id\": 7,\n  \"name\": \"a:b\",\n  \"ok\": true\n}");
        assert_eq!(lines.len(), 5);
        assert_eq!(styled(&lines[1], "\"id\""), Some(Color::Cyan));
        assert_eq!(styled(&lines[1], "7"), Some(Color::LightYellow));
        assert_eq!(styled(&lines[2], "\"a:b\""), Some(Color::Green));
        assert_eq!(styled(&lines[3], "true"), Some(Color::Magenta));
    }

    #[test]
    fn test_highlight_keeps_text() {
        let src = "  \"say \\\"hi\\\"\": [null, -1.5e3]";
        let lines = highlight_json(src);
        let joined: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, src);
        assert_eq!(styled(&lines[0], "-1.5e3"), Some(Color::LightYellow));
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(204), Color::Green);
        assert_eq!(status_color(404), Color::Red);
        assert_eq!(status_color(503), Color::Magenta);
    }
}
