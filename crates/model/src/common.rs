//! Display helpers shared by every entity kind

/// `true` for `skip_serializing_if`
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_true(value: &bool) -> bool {
    *value
}

pub(crate) fn yes() -> bool {
    true
}

pub(crate) fn is_zero(value: &i32) -> bool {
    *value == 0
}

pub(crate) fn is_one(value: &u32) -> bool {
    *value == 1
}

pub(crate) fn one() -> u32 {
    1
}

pub(crate) fn new_id() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}

/// Tags as shown in a cell: `Advantage, Physical`
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Whole-number thousands separators, up to four decimals, trailing zeros
/// trimmed: `1234.50` -> `1,234.5`
pub fn format_number(value: f64) -> String {
    let mut text = format!("{:.4}", value.abs());
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    // Negative values that round to zero print without a sign
    if value < 0.0 && (value * 10_000.0).round() != 0.0 {
        grouped.insert(0, '-');
    }
    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// Signed integer as a modifier: `+2`, `-1`, `+0`
pub fn format_signed(value: i32) -> String {
    format!("{value:+}")
}

/// Weight in pounds: `12.5 lb`
pub fn format_weight(pounds: f64) -> String {
    format!("{} lb", format_number(pounds))
}
