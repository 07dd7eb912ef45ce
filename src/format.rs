//! Number formatting for page text, tables and axis ticks.

use crate::dataset::{Column, ColumnData};

/// Insert `,` thousands separators into the integer part of `digits`.
fn group_thousands(digits: &str) -> String {
    let (sign, body) = digits.strip_prefix('-').map_or(("", digits), |rest| ("-", rest));
    let (int_part, frac_part) = body.split_once('.').map_or((body, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Integer with thousands separators: `10302` -> `10,302`.
#[must_use]
pub fn count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Fixed precision with thousands separators: `(1234.5, 2)` -> `1,234.50`.
#[must_use]
pub fn number(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "nan".to_string();
    }
    group_thousands(&format!("{value:.precision$}"))
}

/// Currency amount: `$1,234.50`.
#[must_use]
pub fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", number(-value, 2))
    } else {
        format!("${}", number(value, 2))
    }
}

/// Currency amount without cents: `$1,235`.
#[must_use]
pub fn money_whole(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", number(-value, 0))
    } else {
        format!("${}", number(value, 0))
    }
}

/// Percentage with one decimal: `12.3%`.
#[must_use]
pub fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// Short axis tick label: `1.5M`, `50k`, `12`, `0.25`.
#[must_use]
pub fn tick(value: f64) -> String {
    let abs = value.abs();
    let trim = |s: String| {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    };
    if abs >= 1e6 {
        format!("{}M", trim(format!("{:.2}", value / 1e6)))
    } else if abs >= 1e3 {
        format!("{}k", trim(format!("{:.1}", value / 1e3)))
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        trim(format!("{value:.2}"))
    }
}

/// Table cell as displayed: integers plain, floats to at most six
/// decimals, missing cells as `NaN`.
#[must_use]
pub fn cell(column: &Column, row: usize) -> String {
    match column.data() {
        ColumnData::Numeric { values, integer: false } => match values.get(row).copied().flatten() {
            Some(v) if v.is_finite() => {
                let fixed = format!("{v:.6}");
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            }
            Some(v) => v.to_string(),
            None => "NaN".to_string(),
        },
        _ => column.label(row).unwrap_or_else(|| "NaN".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(10_302), "10,302");
        assert_eq!(count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(1234.5, 2), "1,234.50");
        assert_eq!(number(-98_765.432, 1), "-98,765.4");
        assert_eq!(number(12.0, 0), "12");
        assert_eq!(number(f64::NAN, 2), "nan");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(1234.5), "$1,234.50");
        assert_eq!(money(-5.0), "-$5.00");
        assert_eq!(money_whole(61_898.4), "$61,898");
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(61.234), "61.2%");
        assert_eq!(pct(0.0), "0.0%");
    }

    #[test]
    fn test_tick() {
        assert_eq!(tick(1_500_000.0), "1.5M");
        assert_eq!(tick(50_000.0), "50k");
        assert_eq!(tick(2_500.0), "2.5k");
        assert_eq!(tick(12.0), "12");
        assert_eq!(tick(0.25), "0.25");
        assert_eq!(tick(-20_000.0), "-20k");
    }

    #[test]
    fn test_cell() {
        let floats = Column::numeric_opt("x", vec![Some(75.5), Some(1.0 / 3.0), None, Some(4.0)]);
        assert_eq!(cell(&floats, 0), "75.5");
        assert_eq!(cell(&floats, 1), "0.333333");
        assert_eq!(cell(&floats, 2), "NaN");
        assert_eq!(cell(&floats, 3), "4");

        let ints = Column::numeric("n", vec![10.0, 2.0]);
        assert_eq!(cell(&ints, 0), "10");
        let text = Column::categorical("g", ["M"]);
        assert_eq!(cell(&text, 0), "M");
    }
}
