use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FilterOrderInfo, Listable, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `"due_date desc, title"` into column/direction pairs, rejecting
    /// columns the record type cannot sort on
    pub fn validate_and_parse<T: Listable>(order: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in order.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                if !T::sort_columns().iter().any(|c| *c == col) {
                    return Err(FilterError::InvalidColumn(col.to_string()));
                }
                let sort = match it.next() {
                    None => SortDirection::Asc,
                    Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                    Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                    Some(dir) => {
                        return Err(FilterError::InvalidValue { field: "order", value: dir.to_string() })
                    }
                };
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        Ok(out)
    }

    /// Stable sort. With no explicit order, records sort ascending by their
    /// list date; undated records go last.
    pub fn sort<T: Listable>(items: &mut [T], infos: &[FilterOrderInfo]) {
        if infos.is_empty() {
            items.sort_by(|a, b| Self::by_date(a, b));
            return;
        }

        items.sort_by(|a, b| {
            for info in infos {
                let ordering = match (a.sort_value(&info.column), b.sort_value(&info.column)) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                let ordering = match info.sort {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    fn by_date<T: Listable>(a: &T, b: &T) -> Ordering {
        match (a.list_date(), b.list_date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
