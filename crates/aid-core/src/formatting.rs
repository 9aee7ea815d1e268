use regex::Regex;
use std::sync::OnceLock;

/// Width of a normalized zip code.
pub const ZIP_WIDTH: usize = 5;

fn zip_plus_four() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{5})-\d{4}$").expect("regex is valid"))
}

/// Normalize a free-text zip code to exactly five characters.
///
/// Spreadsheet exports often carry zips as floats (`"30301.0"`) or in ZIP+4
/// form; both are reduced to the five-digit code. Short codes are left-padded
/// with zeros and anything still longer than five characters is cut.
///
/// # Examples
///
/// ```
/// use aid_core::formatting::normalize_zip;
///
/// assert_eq!(normalize_zip(" 30301 "), "30301");
/// assert_eq!(normalize_zip("2134"), "02134");
/// assert_eq!(normalize_zip("30301.0"), "30301");
/// assert_eq!(normalize_zip("30301-1234"), "30301");
/// assert_eq!(normalize_zip(""), "00000");
/// ```
pub fn normalize_zip(raw: &str) -> String {
    let mut zip = raw.trim();
    if let Some(stripped) = zip.strip_suffix(".0") {
        zip = stripped;
    }
    if let Some(five) = zip_plus_four().captures(zip).and_then(|c| c.get(1)) {
        zip = five.as_str();
    }

    let padded = format!("{:0>width$}", zip, width = ZIP_WIDTH);
    padded.chars().take(ZIP_WIDTH).collect()
}

/// Title-case a name: the first letter of every alphabetic run is upper-cased
/// and the rest lower-cased.
///
/// # Examples
///
/// ```
/// use aid_core::formatting::title_case;
///
/// assert_eq!(title_case("ATLANTA"), "Atlanta");
/// assert_eq!(title_case("east point"), "East Point");
/// assert_eq!(title_case("o'fallon"), "O'Fallon");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(ch);
            prev_is_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zip_always_five_chars() {
        for raw in ["", "1", "123", "30301", "303011", "30301.0", "abc", " 30 "] {
            assert_eq!(
                normalize_zip(raw).chars().count(),
                ZIP_WIDTH,
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_normalize_zip_pads_after_trimming() {
        assert_eq!(normalize_zip("  501 "), "00501");
    }

    #[test]
    fn test_normalize_zip_truncates_long_values() {
        assert_eq!(normalize_zip("303011234"), "30301");
    }

    #[test]
    fn test_normalize_zip_keeps_non_numeric_text() {
        assert_eq!(normalize_zip("n/a"), "00n/a");
    }

    #[test]
    fn test_title_case_mixed_input() {
        assert_eq!(title_case("sandy SPRINGS"), "Sandy Springs");
        assert_eq!(title_case("winston-salem"), "Winston-Salem");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_sentinel_is_stable() {
        assert_eq!(title_case("Unmatched Zip"), "Unmatched Zip");
    }
}
