use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates `s` to at most `max_width` terminal columns, appending "..." when
/// text is cut.
///
/// Widths of 3 or less have no room for an ellipsis, so the string is simply
/// clipped. Returns `Cow::Borrowed` whenever the input already fits.
///
/// ```
/// use lexfeed::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Court Fees", 20), "Court Fees");
/// assert_eq!(truncate_to_width("Court Fees", 8), "Court...");
/// assert_eq!(truncate_to_width("Court Fees", 2), "Co");
/// assert_eq!(truncate_to_width("Court Fees", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    let mut out = String::with_capacity(end + suffix.len());
    out.push_str(&s[..end]);
    out.push_str(suffix);
    Cow::Owned(out)
}

/// First `max_chars` characters of `s`, without an ellipsis.
///
/// Used for listing previews where the body is clipped to a fixed length.
pub fn excerpt(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn is_stripped_control(c: char) -> bool {
    (c.is_control() && !matches!(c, '\t' | '\n' | '\r')) && c != '\u{1b}'
}

/// Removes ANSI escape sequences and control characters from server text.
///
/// Post titles and bodies come from other users of the forum, so they are
/// sanitized before reaching the terminal. Handles CSI (`ESC [ ... final`) and
/// OSC (`ESC ] ... BEL|ESC \`) sequences and drops a bare ESC. Tab, newline
/// and carriage return are kept.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '\u{1b}' || is_stripped_control(c)) {
        return Cow::Borrowed(s);
    }

    enum State {
        Text,
        Escape,
        Csi,
        Osc,
        OscEscape,
    }

    let mut out = String::with_capacity(s.len());
    let mut state = State::Text;

    for c in s.chars() {
        state = match state {
            State::Text => match c {
                '\u{1b}' => State::Escape,
                c if is_stripped_control(c) => State::Text,
                c => {
                    out.push(c);
                    State::Text
                }
            },
            State::Escape => match c {
                '[' => State::Csi,
                ']' => State::Osc,
                '\u{1b}' => State::Escape,
                c if is_stripped_control(c) => State::Text,
                c => {
                    out.push(c);
                    State::Text
                }
            },
            State::Csi => {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    State::Text
                } else {
                    State::Csi
                }
            }
            State::Osc => match c {
                '\u{07}' => State::Text,
                '\u{1b}' => State::OscEscape,
                _ => State::Osc,
            },
            State::OscEscape => match c {
                '\\' => State::Text,
                '\u{1b}' => State::OscEscape,
                _ => State::Osc,
            },
        };
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fits_is_borrowed() {
        assert!(matches!(truncate_to_width("Tenant Rights", 13), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Rights & Regulations", 10), "Rights ...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is 2 columns; budget 7 - 3 = 4 → two chars
        assert_eq!(truncate_to_width("法律咨询服务", 7), "法律...");
    }

    #[test]
    fn test_truncate_narrow_widths_clip_without_ellipsis() {
        assert_eq!(truncate_to_width("Legal", 3), "Leg");
        assert_eq!(truncate_to_width("Legal", 1), "L");
        assert_eq!(truncate_to_width("法律", 1), "");
    }

    #[test]
    fn test_excerpt_char_boundaries() {
        assert_eq!(excerpt("abcdef", 3), "abc");
        assert_eq!(excerpt("abc", 120), "abc");
        assert_eq!(excerpt("éèê", 2), "éè");
        assert_eq!(excerpt("", 5), "");
    }

    #[test]
    fn test_strip_clean_text_borrowed() {
        let s = "Court Fees\n\tand waivers";
        assert!(matches!(strip_control_chars(s), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_csi_sequence() {
        assert_eq!(strip_control_chars("\u{1b}[31mred\u{1b}[0m text"), "red text");
    }

    #[test]
    fn test_strip_osc_sequence_bel_and_st() {
        assert_eq!(
            strip_control_chars("a\u{1b}]0;title\u{07}b\u{1b}]8;;x\u{1b}\\c"),
            "abc"
        );
    }

    #[test]
    fn test_strip_bare_escape_and_controls() {
        assert_eq!(strip_control_chars("x\u{1b}y\u{00}z\u{7f}"), "xyz");
    }

    #[test]
    fn test_strip_keeps_whitespace_controls() {
        assert_eq!(strip_control_chars("a\tb\r\nc\u{08}"), "a\tb\r\nc");
    }
}
