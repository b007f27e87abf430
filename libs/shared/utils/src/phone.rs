use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

// National numbers without a country code belong to the clinic's home
// region (Israel).
const DEFAULT_COUNTRY_CODE: &str = "972";

fn e164_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+[1-9]\d{6,14}$").expect("valid E.164 pattern"))
}

/// Normalize a phone number to E.164 before transmission.
///
/// Lenient by contract: if the input cannot be normalized it is returned
/// unchanged and the server decides what to do with it. Never an error.
pub fn normalize_phone(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    let candidate = if let Some(rest) = compact.strip_prefix("00") {
        format!("+{}", rest)
    } else if let Some(rest) = compact.strip_prefix('0') {
        format!("+{}{}", DEFAULT_COUNTRY_CODE, rest)
    } else if compact.starts_with('+') {
        compact
    } else {
        debug!("Phone number {:?} not normalizable, sending as-is", raw);
        return raw.to_string();
    };

    if e164_pattern().is_match(&candidate) {
        candidate
    } else {
        debug!("Phone number {:?} not normalizable, sending as-is", raw);
        raw.to_string()
    }
}
