//! Everyday string helpers.
//!
//! Lengths and positions are counted in `char`s, not bytes, so multi-byte text is
//! padded, grouped and masked the way a reader would count it.

use std::fmt::Display;

/// Returns `true` if `value` is empty or contains only whitespace.
///
/// ```
/// use replay_text::strings::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank(" \t\n"));
/// assert!(!is_blank(" abc "));
/// ```
pub fn is_blank(value: &str) -> bool {
    value.chars().all(char::is_whitespace)
}

pub fn is_not_blank(value: &str) -> bool {
    !is_blank(value)
}

/// Returns `true` only if there is at least one value and none of them is blank.
pub fn are_not_blank(values: &[&str]) -> bool {
    !values.is_empty() && values.iter().all(|value| is_not_blank(value))
}

/// Maps an absent value, or the literal text `null` in any letter case, to `""`.
pub fn null_to_empty(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.eq_ignore_ascii_case("null") => value,
        _ => "",
    }
}

/// Returns `true` for an optional leading `-` followed by one or more ASCII digits.
pub fn is_numeric(value: &str) -> bool {
    let digits = match value.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => rest,
        _ => value,
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn join<I>(items: I, separator: &str) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut joined = String::new();
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            joined.push_str(separator);
        }
        joined.push_str(&item.to_string());
    }
    joined
}

/// Splits `text` on the literal `separator`.
///
/// Blank text yields no segments and a blank separator yields the whole text. Empty
/// segments between consecutive separators, and at either end, are kept.
///
/// ```
/// use replay_text::strings::split;
///
/// assert_eq!(split("a,,b,", ","), vec!["a", "", "b", ""]);
/// assert!(split("  ", ",").is_empty());
/// assert_eq!(split("a,b", " "), vec!["a,b"]);
/// ```
pub fn split<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if is_blank(text) {
        return Vec::new();
    }
    if is_blank(separator) {
        return vec![text];
    }
    text.split(separator).collect()
}

/// Prepends `pad` until `text` is at least `len` characters long.
///
/// A multi-character `pad` is always prepended whole, so the result can overshoot `len`.
pub fn lpad(text: &str, len: usize, pad: &str) -> String {
    let count = pad_count(text, len, pad);
    let mut padded = pad.repeat(count);
    padded.push_str(text);
    padded
}

/// Appends `pad` until `text` is at least `len` characters long.
pub fn rpad(text: &str, len: usize, pad: &str) -> String {
    let count = pad_count(text, len, pad);
    let mut padded = String::from(text);
    padded.push_str(&pad.repeat(count));
    padded
}

fn pad_count(text: &str, len: usize, pad: &str) -> usize {
    let text_len = text.chars().count();
    let pad_len = pad.chars().count();
    if pad_len == 0 || text_len >= len {
        return 0;
    }
    (len - text_len).div_ceil(pad_len)
}

/// Converts `camelCase` to `camel_case`.
///
/// Every upper-case character is lowered and, unless it starts the text, preceded by
/// an underscore.
pub fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (index, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if index > 0 {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces every `token` with `replacement` and upper-cases the character that
/// followed the token.
///
/// ```
/// use replay_text::strings::replace_and_capitalize;
///
/// assert_eq!(replace_and_capitalize("user_name_id", "_", ""), "userNameId");
/// ```
pub fn replace_and_capitalize(text: &str, token: &str, replacement: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }

    let mut pieces = text.split(token);
    let mut result = pieces.next().unwrap_or_default().to_string();
    for piece in pieces {
        result.push_str(replacement);
        result.push_str(&capitalize(piece));
    }
    result
}

/// Returns `true` if `value`, trimmed, parses as an `f64`.
///
/// Exponents and the special values `inf` and `NaN` are accepted.
pub fn is_double(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<f64>().is_ok()
}

/// Display width of `c`: Latin-1 characters take one column, everything above takes two.
pub fn char_width(c: char) -> usize {
    if u32::from(c) > 0xff { 2 } else { 1 }
}

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Truncates `text` to at most `max_width` display columns, see [`char_width`].
///
/// Text that already fits is returned unchanged. Otherwise the longest prefix that fits
/// is kept; with a `hint` the prefix is shortened further so that the prefix plus the
/// hint, counted one column per character, still fits.
///
/// ```
/// use replay_text::strings::string_cut;
///
/// assert_eq!(string_cut("hello world", 8, Some("...")), "hello...");
/// assert_eq!(string_cut("中文标题", 5, None), "中文");
/// assert_eq!(string_cut("short", 8, Some("...")), "short");
/// ```
pub fn string_cut(text: &str, max_width: usize, hint: Option<&str>) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = match hint {
        Some(hint) => max_width.saturating_sub(hint.chars().count()),
        None => max_width,
    };

    let mut width = 0;
    let mut end = 0;
    for (index, c) in text.char_indices() {
        width += char_width(c);
        if width > budget {
            break;
        }
        end = index + c.len_utf8();
    }

    let mut cut = text[..end].to_string();
    if let Some(hint) = hint {
        cut.push_str(hint);
    }
    cut
}

/// Inserts `separator` after every `section_len` characters.
///
/// Blank data and a zero section length leave the data unchanged.
///
/// ```
/// use replay_text::strings::group_digits;
///
/// assert_eq!(group_digits("1234567890", 3, "-"), "123-456-789-0");
/// ```
pub fn group_digits(data: &str, section_len: usize, separator: &str) -> String {
    if is_blank(data) || section_len == 0 {
        return data.to_string();
    }

    let mut grouped = String::with_capacity(data.len() + data.len() / section_len * separator.len());
    for (index, c) in data.chars().enumerate() {
        if index > 0 && index % section_len == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }
    grouped
}

/// Masks the 4th through the 12th character of an account number with `*`.
///
/// ```
/// use replay_text::strings::mask_account;
///
/// assert_eq!(mask_account("23465789456123"), "234*********23");
/// ```
pub fn mask_account(account: &str) -> String {
    account
        .chars()
        .enumerate()
        .map(|(index, c)| if (3..12).contains(&index) { '*' } else { c })
        .collect()
}

/// Trims surrounding whitespace and reverses the remaining characters.
pub fn reverse_trimmed(text: &str) -> String {
    text.trim().chars().rev().collect()
}

/// Returns `true` if `text` contains at least one of `needles`.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
