//! Lightweight inline formatting for chat bubbles.
//!
//! Supports newline → line break, `**text**` → strong and `*text*` → emphasis.
//! Strong spans are matched first; emphasis is then matched inside each plain
//! or strong segment. A lone `*` with no partner stays literal, but the two
//! stars of an unclosed `**` pair up as an empty emphasis.

use chrono::{ DateTime, Local, Utc };

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(String),
}

pub fn parse(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    for (segment, is_delimited) in split_delimited(text, "**") {
        if is_delimited {
            out.push(Inline::Strong(parse_emphasis(segment)));
        } else {
            out.extend(parse_emphasis(segment));
        }
    }
    out
}

fn parse_emphasis(text: &str) -> Vec<Inline> {
    split_delimited(text, "*")
        .into_iter()
        .filter(|(segment, is_delimited)| *is_delimited || !segment.is_empty())
        .map(|(segment, is_delimited)| {
            if is_delimited {
                Inline::Emphasis(segment.to_string())
            } else {
                Inline::Text(segment.to_string())
            }
        })
        .collect()
}

/// Splits `text` into alternating runs, flagging the runs enclosed by a pair
/// of `delim`. Matching is non-greedy.
fn split_delimited<'a>(text: &'a str, delim: &str) -> Vec<(&'a str, bool)> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(delim) {
        let after_open = &rest[open + delim.len()..];
        match after_open.find(delim) {
            Some(close) => {
                if open > 0 {
                    parts.push((&rest[..open], false));
                }
                parts.push((&after_open[..close], true));
                rest = &after_open[close + delim.len()..];
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        parts.push((rest, false));
    }
    parts
}

/// Escapes untrusted text before it is placed into markup.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_safe(text).into_owned()
}

fn text_to_html(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

pub fn to_html(spans: &[Inline]) -> String {
    let mut html = String::new();
    for span in spans {
        match span {
            Inline::Text(text) => html.push_str(&text_to_html(text)),
            Inline::Strong(children) => {
                html.push_str("<strong>");
                html.push_str(&to_html(children));
                html.push_str("</strong>");
            }
            Inline::Emphasis(text) => {
                html.push_str("<em>");
                html.push_str(&text_to_html(text));
                html.push_str("</em>");
            }
        }
    }
    html
}

pub fn to_ansi(spans: &[Inline]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) => {
                out.push_str("\x1b[1m");
                out.push_str(&to_ansi(children));
                out.push_str("\x1b[22m");
            }
            Inline::Emphasis(text) => {
                out.push_str("\x1b[3m");
                out.push_str(text);
                out.push_str("\x1b[23m");
            }
        }
    }
    out
}

pub fn to_plain(spans: &[Inline]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Inline::Text(text) | Inline::Emphasis(text) => out.push_str(text),
            Inline::Strong(children) => out.push_str(&to_plain(children)),
        }
    }
    out
}

pub fn format_message_html(text: &str) -> String {
    to_html(&parse(text))
}

/// Local wall-clock time as `HH:MM`.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(format_message_html("one\ntwo"), "one<br>two");
    }

    #[test]
    fn test_strong_and_emphasis() {
        assert_eq!(
            format_message_html("**Smart Home** is *easy*"),
            "<strong>Smart Home</strong> is <em>easy</em>"
        );
        assert_eq!(
            format_message_html("**bold *and* italic**"),
            "<strong>bold <em>and</em> italic</strong>"
        );
    }

    #[test]
    fn test_unpaired_delimiters() {
        assert_eq!(format_message_html("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(format_message_html("**open"), "<em></em>open");
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let html = format_message_html("<script>alert(\"x\")</script> & **hi**");
        assert!(html.starts_with("&lt;script&gt;alert(&quot;x&quot;)"));
        assert!(!html.contains("<script>"));
        assert!(html.ends_with(" &amp; <strong>hi</strong>"));
    }

    #[test]
    fn test_ansi_rendering() {
        assert_eq!(to_ansi(&parse("a **b** *c*")), "a \x1b[1mb\x1b[22m \x1b[3mc\x1b[23m");
        assert_eq!(to_plain(&parse("a **b** *c*")), "a b c");
    }

    #[test]
    fn test_time_is_hours_and_minutes() {
        let formatted = format_time(&Utc::now());
        assert_eq!(formatted.len(), 5);
        assert_eq!(&formatted[2..3], ":");
    }
}
