use super::model::ColumnKind;

/// Cell texts read as "no value", matching the usual dataframe readers.
pub const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA",
];

pub fn is_missing(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty() || MISSING_TOKENS.contains(&s)
}

/// Parse a cell as a finite number. Missing tokens, non-numeric text and
/// non-finite values (`inf`, `-infinity`, `1e999`) give `None`, so a column
/// holding any of the latter is categorical.
pub fn parse_number(raw: &str) -> Option<f64> {
    if is_missing(raw) {
        return None;
    }
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decide a column's kind from its raw cells.
///
/// * every non-missing cell parses as a number → `Numeric`
/// * no non-missing cells at all → `Numeric` (an all-missing column)
/// * anything else → `Categorical`
pub fn infer_kind<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let all_numeric = cells
        .into_iter()
        .filter(|c| !is_missing(c))
        .all(|c| parse_number(c).is_some());
    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens() {
        for token in ["", "  ", "NA", "NaN", "null", "None", "#N/A"] {
            assert!(is_missing(token), "{token:?} should be missing");
        }
        assert!(!is_missing("0"));
        assert!(!is_missing("none of the above"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("-1.5e3"), Some(-1500.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_infinite_values_are_not_numbers() {
        for raw in ["inf", "-inf", "Infinity", "-infinity", "1e999"] {
            assert_eq!(parse_number(raw), None, "{raw:?} should not parse");
        }
        assert_eq!(infer_kind(["1", "inf", "3"]), ColumnKind::Categorical);
    }

    #[test]
    fn test_integers_and_floats_are_numeric() {
        assert_eq!(infer_kind(["1", "2.5", "-3"]), ColumnKind::Numeric);
    }

    #[test]
    fn test_missing_cells_do_not_break_numeric() {
        assert_eq!(infer_kind(["1", "", "NA", "4"]), ColumnKind::Numeric);
    }

    #[test]
    fn test_any_text_makes_categorical() {
        assert_eq!(infer_kind(["1", "two", "3"]), ColumnKind::Categorical);
        assert_eq!(infer_kind(["true", "false"]), ColumnKind::Categorical);
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        assert_eq!(infer_kind(["", "NA"]), ColumnKind::Numeric);
        assert_eq!(infer_kind(std::iter::empty()), ColumnKind::Numeric);
    }
}
