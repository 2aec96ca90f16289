use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

// ── AmountParser ──────────────────────────────────────────────────────────────

/// Parses currency amounts written with either comma or dot decimal
/// conventions, as found in European and US bank exports.
pub struct AmountParser;

impl AmountParser {
    /// Parse `raw` into an exact [`Decimal`], or `None` when it is not a number.
    ///
    /// Accepted shapes include `1000,00`, `-1.234,56`, `1,234.56`, `1234.5`,
    /// `+12`, `12,50 €`, `€ -3,10` and a trailing minus (`400,00-`).
    /// The euro sign is also stripped when it arrives as `U+0080`, which is
    /// what a Windows-1252 `€` byte becomes under ISO-8859-1 decoding.
    ///
    /// Separator rules:
    /// * both `,` and `.` present → the last one is the decimal separator;
    /// * a single `,` or a single `.` → decimal separator;
    /// * several of the same separator → thousands grouping.
    pub fn parse(raw: &str) -> Option<Decimal> {
        let mut s: String = raw
            .trim()
            .trim_start_matches("EUR")
            .trim_end_matches("EUR")
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '\u{80}' | '\u{a0}' | '\''))
            .collect();

        if s.is_empty() {
            return None;
        }

        let trailing_minus = s.len() > 1 && s.ends_with('-');
        if trailing_minus {
            s.pop();
            if s.starts_with('-') || s.starts_with('+') {
                return None;
            }
            s.insert(0, '-');
        }

        let commas = s.matches(',').count();
        let dots = s.matches('.').count();

        let normalised = match (commas, dots) {
            (0, 0) => s,
            (0, 1) => s,
            (1, 0) => s.replace(',', "."),
            (_, 0) => Self::strip_grouping(&s, ',')?,
            (0, _) => Self::strip_grouping(&s, '.')?,
            _ => {
                let last_comma = s.rfind(',')?;
                let last_dot = s.rfind('.')?;
                if last_comma > last_dot {
                    // 1.234,56
                    if commas != 1 {
                        return None;
                    }
                    s.replace('.', "").replace(',', ".")
                } else {
                    // 1,234.56
                    if dots != 1 {
                        return None;
                    }
                    s.replace(',', "")
                }
            }
        };

        if !number_regex().is_match(&normalised) {
            return None;
        }

        Self::to_decimal(&normalised)
    }

    /// Convert a validated `[+-]digits[.digits]` string, filling in the
    /// digits a bare `.75` or `12.` leaves out.
    fn to_decimal(s: &str) -> Option<Decimal> {
        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let mut digits = String::with_capacity(unsigned.len() + 2);
        if unsigned.starts_with('.') {
            digits.push('0');
        }
        digits.push_str(unsigned.strip_suffix('.').unwrap_or(unsigned));

        let value = Decimal::from_str(&digits).ok()?;
        Some(if negative { -value } else { value })
    }

    /// Remove a repeated thousands separator, requiring groups of three digits.
    fn strip_grouping(s: &str, sep: char) -> Option<String> {
        let mut parts = s.split(sep);
        let head = parts.next()?;
        let digits_in_head = head.trim_start_matches(['+', '-']).len();
        if digits_in_head == 0 || digits_in_head > 3 {
            return None;
        }
        let mut out = head.to_string();
        for group in parts {
            if group.len() != 3 {
                return None;
            }
            out.push_str(group);
        }
        Some(out)
    }
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("regex is valid"))
}

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses calendar dates written day-first (`dd/mm/yyyy`).
pub struct DateParser;

impl DateParser {
    /// Parse a day-first date.
    ///
    /// Handles `/`, `-` and `.` separators, one- or two-digit day and month,
    /// two- or four-digit years, an ISO `yyyy-mm-dd` form and an optional
    /// trailing time component (`01/02/2024 10:30`), which is ignored.
    ///
    /// Two-digit years below 70 map to 20xx, the rest to 19xx.
    /// Impossible dates (`31/13/2024`, `30/02/2024`) return `None`.
    pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
        let token = raw.split_whitespace().next()?;
        let token = token.split('T').next()?;

        let caps = date_regex().captures(token)?;
        let first = &caps[1];
        let second: u32 = caps[2].parse().ok()?;
        let third = &caps[3];

        if first.len() == 4 {
            let year: i32 = first.parse().ok()?;
            let day: u32 = third.parse().ok()?;
            if third.len() > 2 {
                return None;
            }
            return NaiveDate::from_ymd_opt(year, second, day);
        }

        if first.len() > 2 {
            return None;
        }
        let day: u32 = first.parse().ok()?;
        let year = match third.len() {
            4 => third.parse::<i32>().ok()?,
            2 => {
                let yy: i32 = third.parse().ok()?;
                if yy < 70 {
                    2000 + yy
                } else {
                    1900 + yy
                }
            }
            _ => return None,
        };

        NaiveDate::from_ymd_opt(year, second, day)
    }
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$").expect("regex is valid")
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
