//! Scalar rendering. A plain scalar is only written when every YAML reader
//! resolves it back to the same value: strings that YAML 1.1 (PyYAML) or
//! YAML 1.2 would load as a bool, null, number or timestamp are single-quoted.

use crate::legacy::LegacyValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Block,
    /// Inside `[...]`, where `,[]{}` are indicators.
    Flow,
}

pub fn render_scalar(value: &LegacyValue, context: Context) -> String {
    match value {
        LegacyValue::None => "null".to_string(),
        LegacyValue::Bool(value) => value.to_string(),
        LegacyValue::Int(value) => value.to_string(),
        LegacyValue::Float(value) => render_float(*value),
        LegacyValue::Str(value) => render_string(value, context),
        LegacyValue::List(items) | LegacyValue::Tuple(items) => {
            let items = items
                .iter()
                .map(|item| render_scalar(item, Context::Flow))
                .collect::<Vec<_>>();
            format!("[{}]", items.join(", "))
        }
        LegacyValue::Dict(dict) => {
            let entries = dict
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}: {}",
                        render_scalar(key, Context::Flow),
                        render_scalar(value, Context::Flow)
                    )
                })
                .collect::<Vec<_>>();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Floats always carry a `.`, and exponents a sign, as YAML 1.1 requires.
fn render_float(value: f64) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }
    let text = format!("{value:?}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let dot = if mantissa.contains('.') { "" } else { ".0" };
    let sign = if exponent.starts_with('-') { "" } else { "+" };
    format!("{mantissa}{dot}e{sign}{exponent}")
}

pub fn render_string(value: &str, context: Context) -> String {
    if value.chars().any(needs_escape) {
        double_quoted(value)
    } else if is_plain_safe(value, context) && !resolves_to_non_string(value) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn double_quoted(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if needs_escape(c) => match u32::from(c) {
                code @ 0..=0xff => quoted.push_str(&format!("\\x{code:02X}")),
                code => quoted.push_str(&format!("\\u{code:04X}")),
            },
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Whether the string can be written without quotes and still parse as this exact text.
fn is_plain_safe(value: &str, context: Context) -> bool {
    if value.is_empty()
        || value.starts_with(' ')
        || value.ends_with(' ')
        || value.starts_with("---")
        || value.starts_with("...")
    {
        return false;
    }
    let flow = context == Context::Flow;
    let chars = value.chars().collect::<Vec<_>>();
    for (index, &c) in chars.iter().enumerate() {
        let followed_by_space = chars.get(index + 1).is_none_or(|next| *next == ' ');
        if index == 0 {
            match c {
                '#' | ',' | '[' | ']' | '{' | '}' | '&' | '*' | '!' | '|' | '>' | '\'' | '"'
                | '%' | '@' | '`' => return false,
                '-' | '?' | ':' if followed_by_space => return false,
                '?' | ':' if flow => return false,
                _ => {}
            }
        } else {
            match c {
                ',' | '[' | ']' | '{' | '}' | '?' if flow => return false,
                ':' if followed_by_space || flow => return false,
                '#' if chars[index - 1] == ' ' => return false,
                _ => {}
            }
        }
    }
    true
}

fn resolves_to_non_string(value: &str) -> bool {
    resolves_in_yaml_1_1(value)
        || !matches!(
            serde_yaml::from_str::<serde_yaml::Value>(value),
            Ok(serde_yaml::Value::String(_))
        )
}

/// The implicit resolvers of PyYAML's `SafeLoader`, plus YAML 1.1's `y`/`n` booleans.
fn resolves_in_yaml_1_1(value: &str) -> bool {
    is_bool(value)
        || is_null(value)
        || is_int(value)
        || is_float(value)
        || is_timestamp(value)
        || matches!(value, "<<" | "=")
}

fn is_bool(value: &str) -> bool {
    matches!(
        value,
        "yes" | "Yes" | "YES" | "no" | "No" | "NO" | "true" | "True" | "TRUE" | "false"
            | "False" | "FALSE" | "on" | "On" | "ON" | "off" | "Off" | "OFF" | "y" | "Y"
            | "n" | "N"
    )
}

fn is_null(value: &str) -> bool {
    matches!(value, "" | "~" | "null" | "Null" | "NULL")
}

fn strip_sign(value: &str) -> &str {
    value.strip_prefix(['-', '+']).unwrap_or(value)
}

fn non_empty_all(value: &str, allowed: impl Fn(char) -> bool) -> bool {
    !value.is_empty() && value.chars().all(allowed)
}

fn is_digit_or_underscore(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

/// `[0-5]?[0-9]`
fn is_sexagesimal_part(part: &str) -> bool {
    match part.as_bytes() {
        [digit] => digit.is_ascii_digit(),
        [tens, digit] => (b'0'..=b'5').contains(tens) && digit.is_ascii_digit(),
        _ => false,
    }
}

/// `[0-9][0-9_]*` followed by any number of `:[0-5]?[0-9]` groups.
fn is_sexagesimal(value: &str) -> bool {
    let mut parts = value.split(':');
    let head = parts.next().unwrap_or_default();
    head.starts_with(|c: char| c.is_ascii_digit())
        && head.chars().all(is_digit_or_underscore)
        && parts.all(is_sexagesimal_part)
}

fn is_int(value: &str) -> bool {
    let body = strip_sign(value);
    if let Some(binary) = body.strip_prefix("0b") {
        return non_empty_all(binary, |c| matches!(c, '0' | '1' | '_'));
    }
    if let Some(hex) = body.strip_prefix("0x") {
        return non_empty_all(hex, |c| c.is_ascii_hexdigit() || c == '_');
    }
    if body == "0" {
        return true;
    }
    if let Some(octal) = body.strip_prefix('0') {
        return non_empty_all(octal, |c| matches!(c, '0'..='7' | '_'));
    }
    is_sexagesimal(body)
}

fn is_float(value: &str) -> bool {
    let body = strip_sign(value);
    if matches!(body, ".inf" | ".Inf" | ".INF" | ".nan" | ".NaN" | ".NAN") {
        return true;
    }
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(index) => (&body[..index], Some(&body[index + 1..])),
        None => (body, None),
    };
    if let Some(exponent) = exponent {
        let Some(digits) = exponent.strip_prefix(['-', '+']) else {
            return false;
        };
        if !non_empty_all(digits, |c| c.is_ascii_digit()) {
            return false;
        }
    }
    let Some((whole, fraction)) = mantissa.split_once('.') else {
        return false;
    };
    if !fraction.chars().all(is_digit_or_underscore) {
        return false;
    }
    if whole.is_empty() {
        return !fraction.is_empty();
    }
    is_sexagesimal(whole)
}

/// `YYYY-M-D`, optionally followed by a time.
fn is_timestamp(value: &str) -> bool {
    let mut parts = value.splitn(3, '-');
    let (Some(year), Some(month), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let day_length = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let after_day = &rest[day_length..];
    year.len() == 4
        && year.chars().all(|c| c.is_ascii_digit())
        && (1..=2).contains(&month.len())
        && month.chars().all(|c| c.is_ascii_digit())
        && (1..=2).contains(&day_length)
        && (after_day.is_empty() || after_day.starts_with(['T', 't', ' ', '\t']))
}
