//! Small string helpers shared by the login form, stats blocks and layout code.

const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Shape check equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
///
/// Exactly one `@`, no whitespace, and a dot in the domain with at least one
/// character on each side of it.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, ch)| ch == '.' && idx > 0 && idx + 1 < domain.len())
}

/// Format an integer with French digit grouping (`12 345`, narrow no-break space).
#[must_use]
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('\u{202F}');
        }
        out.push(ch);
    }
    out
}

#[must_use]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}
