//! Date/time pattern conversion
//!
//! Descriptors declare patterns in two dialects: ICU-style runs (`yyyy-MM-dd`)
//! as used by form/field metadata, and single-letter PHP-style tokens
//! (`Y-m-d`) as used by route parameter converters. Both are translated to a
//! `chrono` strftime string. Unknown letters pass through as literals.

use chrono::NaiveDateTime;

/// Pattern used when a temporal field declares none
pub const DEFAULT_PATTERN: &str = "Y-m-d";

/// Convert an ICU or PHP style pattern into a strftime format string
#[must_use]
pub fn to_strftime(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // quoted literal, '' inside quotes is not supported
            let mut j = i + 1;
            while j < chars.len() && chars[j] != '\'' {
                push_literal(&mut out, chars[j]);
                j += 1;
            }
            i = j + 1;
            continue;
        }

        if c == '\\' && i + 1 < chars.len() {
            push_literal(&mut out, chars[i + 1]);
            i += 2;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        match token(c, run) {
            Some(spec) => out.push_str(spec),
            None => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
            }
        }
        i += run;
    }

    out
}

fn token(c: char, run: usize) -> Option<&'static str> {
    let spec = match (c, run) {
        ('y', 2) => "%y",
        ('y' | 'Y', _) => "%Y",
        ('M', 1) | ('n', 1) => "%-m",
        ('M', 2) | ('m', 1) => "%m",
        ('M', 3) => "%b",
        ('M', _) | ('F', 1) => "%B",
        ('d', _) => "%d",
        ('j', 1) => "%-d",
        ('H', _) | ('G', 1) => "%H",
        ('h', _) => "%I",
        ('m', 2) | ('i', 1) => "%M",
        ('s', _) => "%S",
        ('D', 1) => "%a",
        ('l', 1) => "%A",
        ('a', 1) => "%P",
        _ => return None,
    };
    Some(spec)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Format `now` with a declared pattern, or [`DEFAULT_PATTERN`]
#[must_use]
pub fn format_with_pattern(now: &NaiveDateTime, pattern: Option<&str>) -> String {
    let strftime = to_strftime(pattern.unwrap_or(DEFAULT_PATTERN));
    now.format(&strftime).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    #[test]
    fn icu_patterns() {
        assert_eq!(to_strftime("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(to_strftime("yyyy-MM-dd'T'HH:mm:ss"), "%Y-%m-%dT%H:%M:%S");
        assert_eq!(to_strftime("dd/MM/yy"), "%d/%m/%y");
    }

    #[test]
    fn php_patterns() {
        assert_eq!(to_strftime("Y-m-d"), "%Y-%m-%d");
        assert_eq!(to_strftime("Y-m-d H:i:s"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(to_strftime("Y-m-d\\TH:i"), "%Y-%m-%dT%H:%M");
    }

    #[test]
    fn percent_is_escaped() {
        assert_eq!(to_strftime("Y%"), "%Y%%");
    }

    #[test]
    fn formats_fixed_clock() {
        assert_eq!(format_with_pattern(&fixed(), None), "2026-10-16");
        assert_eq!(format_with_pattern(&fixed(), Some("yyyy-MM-dd")), "2026-10-16");
        assert_eq!(
            format_with_pattern(&fixed(), Some("yyyy-MM-dd'T'HH:mm:ss")),
            "2026-10-16T09:05:07"
        );
        assert_eq!(format_with_pattern(&fixed(), Some("d/m/Y")), "16/10/2026");
    }

    #[test]
    fn unknown_letters_pass_through() {
        assert_eq!(format_with_pattern(&fixed(), Some("Q Y")), "Q 2026");
    }
}
