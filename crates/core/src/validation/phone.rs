//! Live formatting for mobile-number inputs.

/// Digits in a national number, `(XXX) XXX-XXXX`.
const NATIONAL_DIGITS: usize = 10;

/// Longest country code accepted after a leading `+`.
const MAX_COUNTRY_DIGITS: usize = 2;

/// Format raw keyboard input as `(XXX) XXX-XXXX`, or `+XX (XXX) XXX-XXXX`
/// when it starts with `+`.
///
/// Only digits are kept. A national number of three digits or fewer is
/// returned as cleaned; longer input is grouped as area code, prefix and
/// line number, with the last group taking whatever remains.
///
/// The country code is the run of one or two digits typed right after the
/// `+` when a separator follows it. Without a separator, the digits beyond
/// the ten national ones are the country code.
pub fn format_mobile_number(input: &str) -> String {
    match input.trim_start().strip_prefix('+') {
        Some(rest) => format_international(rest),
        None => format_national(&digits(input)),
    }
}

fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

fn format_national(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let slice = |from: usize, to: usize| {
        let to = to.min(digits.len());
        &digits[from.min(to)..to]
    };
    format!(
        "({}) {}-{}",
        slice(0, 3),
        slice(3, 6),
        slice(6, digits.len())
    )
}

fn format_international(rest: &str) -> String {
    let all = digits(rest);
    let leading = rest.chars().take_while(char::is_ascii_digit).count();
    let separated = leading < rest.len();

    let country_len = if separated && (1..=MAX_COUNTRY_DIGITS).contains(&leading) {
        leading
    } else {
        all.len()
            .saturating_sub(NATIONAL_DIGITS)
            .clamp(1, MAX_COUNTRY_DIGITS)
    };
    let (country, national) = all.split_at(country_len.min(all.len()));

    if national.is_empty() {
        format!("+{country}")
    } else {
        format!("+{country} {}", format_national(national))
    }
}
