//! Local sorting and selection summary for the loaded page of records.
use std::cmp::Ordering;

use crate::model::BookRecord;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Score,
    Price,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Descend,
    Ascend,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortState {
    /// Next state when the user activates `column`: descend, ascend, then unsorted.
    pub fn cycle(current: Option<SortState>, column: SortColumn) -> Option<SortState> {
        match current {
            Some(s) if s.column == column => match s.order {
                SortOrder::Descend => Some(SortState { column, order: SortOrder::Ascend }),
                SortOrder::Ascend => None,
            },
            _ => Some(SortState { column, order: SortOrder::Descend }),
        }
    }

    /// Marker shown next to the column title.
    pub fn arrow(self) -> &'static str {
        match self.order {
            SortOrder::Descend => "▼",
            SortOrder::Ascend => "▲",
        }
    }
}

fn sort_key(column: SortColumn, rec: &BookRecord) -> f64 {
    match column {
        SortColumn::Score => rec.score(),
        SortColumn::Price => rec.price_value(),
    }
}

/// Stable numeric sort. Rows whose key is NaN go last in either direction.
pub fn sort_rows(rows: &mut [BookRecord], sort: SortState) {
    rows.sort_by(|a, b| {
        let (x, y) = (sort_key(sort.column, a), sort_key(sort.column, b));
        match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match sort.order {
                SortOrder::Ascend => x.total_cmp(&y),
                SortOrder::Descend => y.total_cmp(&x),
            },
        }
    });
}

/// Sum of the coerced price values of `rows`. An empty selection sums to `0`.
pub fn price_total<'a>(rows: impl IntoIterator<Item = &'a BookRecord>) -> f64 {
    rows.into_iter()
        .fold(0.0, |acc, r| acc + r.price.as_ref().map(|p| p.value.as_number()).unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookMeta, FieldValue, LabeledField};

    fn priced(key: u64, price: &str) -> BookRecord {
        BookRecord {
            key,
            price: Some(LabeledField::new("Price", FieldValue::Text(price.to_string()))),
            ..Default::default()
        }
    }

    fn scored(key: u64, score: f64) -> BookRecord {
        BookRecord {
            key,
            book: Some(BookMeta {
                score: Some(FieldValue::Number(score)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn cycle_goes_descend_ascend_off() {
        let s = SortState::cycle(None, SortColumn::Score);
        assert_eq!(s.unwrap().order, SortOrder::Descend);
        let s = SortState::cycle(s, SortColumn::Score);
        assert_eq!(s.unwrap().order, SortOrder::Ascend);
        assert_eq!(SortState::cycle(s, SortColumn::Score), None);
        let s = SortState::cycle(s, SortColumn::Price);
        assert_eq!(s.unwrap().column, SortColumn::Price);
    }

    #[test]
    fn score_sort_orders_both_ways() {
        let mut rows = vec![scored(1, 7.5), scored(2, 9.1), scored(3, 8.0)];
        sort_rows(&mut rows, SortState { column: SortColumn::Score, order: SortOrder::Ascend });
        assert!(rows.windows(2).all(|w| w[0].score() <= w[1].score()));
        sort_rows(&mut rows, SortState { column: SortColumn::Score, order: SortOrder::Descend });
        assert!(rows.windows(2).all(|w| w[0].score() >= w[1].score()));
        assert_eq!(rows[0].key, 2);
    }

    #[test]
    fn price_sort_is_numeric_not_lexical() {
        let mut rows = vec![priced(1, "9"), priced(2, "100"), priced(3, "25.5")];
        sort_rows(&mut rows, SortState { column: SortColumn::Price, order: SortOrder::Ascend });
        let keys: Vec<u64> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![1, 3, 2]);
    }

    #[test]
    fn unparsable_price_sorts_last() {
        let mut rows = vec![priced(1, "30"), priced(2, "n/a"), priced(3, "10")];
        sort_rows(&mut rows, SortState { column: SortColumn::Price, order: SortOrder::Ascend });
        let keys: Vec<u64> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![3, 1, 2]);
        sort_rows(&mut rows, SortState { column: SortColumn::Price, order: SortOrder::Descend });
        let keys: Vec<u64> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![1, 3, 2]);
    }

    #[test]
    fn price_total_sums_selected_rows() {
        let rows = [priced(1, "10"), priced(2, "25.5")];
        assert_eq!(price_total(rows.iter()), 35.5);
        assert_eq!(price_total(std::iter::empty()), 0.0);
    }

    #[test]
    fn price_total_has_no_nan_guard() {
        let rows = [priced(1, "10"), priced(2, "n/a")];
        assert!(price_total(rows.iter()).is_nan());
    }
}
