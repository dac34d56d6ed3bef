// ABOUTME: Plain-text helpers for feed titles and descriptions.
// ABOUTME: Strips markup, decodes entities, collapses whitespace, and truncates with an ellipsis.

/// Marker appended to text cut by [`truncate_text`].
pub const ELLIPSIS: &str = "...";

/// Longest entity name we try to decode (`&thetasym;` is the longest HTML4 name).
const MAX_ENTITY_LEN: usize = 10;

/// Strips HTML tags, decodes entities and collapses whitespace.
///
/// Tags are removed without inserting separators; whitespace runs
/// (including newlines) become single spaces and the result is trimmed.
pub fn strip_html(s: &str) -> String {
    let mut text = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    collapse_whitespace(&decode_entities(&text))
}

/// Decodes named and numeric HTML entities. Unknown entities are left as-is.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&end| end > 1 && end <= MAX_ENTITY_LEN + 1)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" | "rsquo" => '\'',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "deg" => '\u{00B0}',
        "euro" => '\u{20AC}',
        "pound" => '\u{00A3}',
        _ => return None,
    };
    Some(c)
}

/// Collapses whitespace runs into single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `s` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was removed. Counts chars, not bytes.
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}{}", &s[..cut], ELLIPSIS),
    }
}

/// Strips markup and bounds the length in one step.
pub fn clean_text(s: &str, max_chars: usize) -> String {
    truncate_text(&strip_html(s), max_chars)
}
