//! Sort Evaluator
//!
//! Typed, stable ordering over records. Nulls sort last; other values are
//! ranked numbers before dates before text, each class compared on its own
//! terms (numeric, temporal, case-insensitive lexical).

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Record, stringify};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort: no column means input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    /// Header click: same column flips, a new column starts ascending
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Direction shown on `key`'s header, if it is the sort column
    pub fn indicator(&self, key: &str) -> Option<SortDirection> {
        (self.column.as_deref() == Some(key)).then_some(self.direction)
    }
}

/// Order `indices` (into `records`) by `column`, stable for equal keys
pub fn sort_indices(
    records: &[Record],
    indices: &mut [usize],
    column: Option<&str>,
    direction: SortDirection,
) {
    let Some(column) = column else {
        return;
    };
    // `sort_by` is a stable merge sort
    indices.sort_by(|&a, &b| {
        compare_cells(records[a].get(column), records[b].get(column), direction)
    });
}

/// Records ordered by `column`; `None` keeps input order
pub fn sort<'a>(records: &'a [Record], column: Option<&str>, direction: SortDirection) -> Vec<&'a Record> {
    let mut indices: Vec<usize> = (0..records.len()).collect();
    sort_indices(records, &mut indices, column, direction);
    indices.into_iter().map(|i| &records[i]).collect()
}

/// Compare two cells; nulls sort last in either direction
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = compare_values(a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Comparison class of a non-null value, in ascending rank
#[derive(Debug, Clone)]
enum SortKey {
    Number(f64),
    Timestamp(i64),
    Text(String),
}

impl SortKey {
    fn of(value: &Value) -> Self {
        if let Some(n) = as_number(value) {
            SortKey::Number(n)
        } else if let Some(ts) = as_timestamp(value) {
            SortKey::Timestamp(ts)
        } else {
            SortKey::Text(stringify(Some(value)).to_lowercase())
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Timestamp(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Ascending comparison of two non-null values; a total order, so mixed
/// columns rank numbers, then dates, then text
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    SortKey::of(a).compare(&SortKey::of(b))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Milliseconds since the epoch for strings that look like dates
pub fn as_timestamp(value: &Value) -> Option<i64> {
    let Value::String(s) = value else {
        return None;
    };
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Record::new().with("id", i).with("v", v))
            .collect()
    }

    fn ids(sorted: &[&Record]) -> Vec<String> {
        sorted.iter().map(|r| r.text("id")).collect()
    }

    #[test]
    fn test_numeric_not_lexical() {
        let records = rows(vec![json!(10), json!(9), json!(100)]);
        let sorted = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["1", "0", "2"]);
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let records = rows(vec![json!(3), Value::Null, json!(1), json!(2)]);
        let asc = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["2", "3", "0", "1"]);

        let desc = sort(&records, Some("v"), SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["0", "3", "2", "1"]);
    }

    #[test]
    fn test_missing_field_counts_as_null() {
        let mut records = rows(vec![json!("b"), json!("a")]);
        records.push(Record::new().with("id", 2));
        let sorted = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["1", "0", "2"]);
    }

    #[test]
    fn test_temporal_comparison() {
        let records = rows(vec![
            json!("2024-03-01T08:00:00Z"),
            json!("2023-12-31"),
            json!("2024-01-15 09:30:00"),
        ]);
        let sorted = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["1", "2", "0"]);
    }

    #[test]
    fn test_lexical_is_case_insensitive_and_stable() {
        let records = rows(vec![json!("beta"), json!("Alpha"), json!("alpha"), json!("ALPHA")]);
        let asc = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["1", "2", "3", "0"]);

        // Equal keys keep their prior relative order under desc as well
        let desc = sort(&records, Some("v"), SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_mixed_numeric_and_alphanumeric_is_total() {
        let (two, ten, code) = (json!("2"), json!("10"), json!("1a"));
        assert_eq!(compare_values(&two, &ten), Ordering::Less);
        assert_eq!(compare_values(&ten, &code), Ordering::Less);
        assert_eq!(compare_values(&two, &code), Ordering::Less);
        assert_eq!(compare_values(&code, &two), Ordering::Greater);

        // House numbers next to lettered units
        let values = (0..34)
            .map(|i| {
                let n = i * 7 % 31;
                if i % 2 == 0 { json!(n.to_string()) } else { json!(format!("{n}a")) }
            })
            .collect();
        let records = rows(values);
        let sorted = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(sorted.len(), 34);

        let texts: Vec<String> = sorted.iter().map(|r| r.text("v")).collect();
        let first_code = texts.iter().position(|t| t.ends_with('a')).expect("lettered value");
        assert_eq!(first_code, 17);
        assert!(texts[first_code..].iter().all(|t| t.ends_with('a')));
        let numbers: Vec<f64> = texts[..first_code]
            .iter()
            .map(|t| t.parse().expect("number"))
            .collect();
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        assert!(texts[first_code..].windows(2).all(|w| w[0] <= w[1]));

        let desc = sort(&records, Some("v"), SortDirection::Desc);
        assert!(desc[0].text("v").ends_with('a'));
    }

    #[test]
    fn test_dates_rank_between_numbers_and_text() {
        let records = rows(vec![json!("pending"), json!("2024-01-15"), json!(42)]);
        let sorted = sort(&records, Some("v"), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["2", "1", "0"]);
    }

    #[test]
    fn test_no_column_preserves_input() {
        let records = rows(vec![json!(3), json!(1), json!(2)]);
        let sorted = sort(&records, None, SortDirection::Desc);
        assert_eq!(ids(&sorted), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_toggle_twice_restores_ascending_order() {
        let records = rows(vec![json!(5), json!(2), json!(2), json!(9), Value::Null]);
        let mut state = SortState::default();
        state.toggle("v");
        let first = ids(&sort(&records, state.column.as_deref(), state.direction));

        state.toggle("v");
        assert_eq!(state.direction, SortDirection::Desc);
        state.toggle("v");
        assert_eq!(state.direction, SortDirection::Asc);

        let again = ids(&sort(&records, state.column.as_deref(), state.direction));
        assert_eq!(first, again);
    }

    #[test]
    fn test_new_column_resets_to_ascending() {
        let mut state = SortState::by("fee", SortDirection::Desc);
        state.toggle("status");
        assert_eq!(state, SortState::by("status", SortDirection::Asc));
        assert_eq!(state.indicator("status"), Some(SortDirection::Asc));
        assert_eq!(state.indicator("fee"), None);
    }
}
