use crate::types::{DisplayTable, ItemWindowSummary};

/// Wraps ranked rows for the presentation layer. Row order is kept as is.
pub fn project(rows: Vec<ItemWindowSummary>, title: &str, hours: i64) -> DisplayTable {
    DisplayTable {
        title: title.to_string(),
        rows,
        hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn row(id: &str, avg: f64) -> ItemWindowSummary {
        ItemWindowSummary {
            item_id: id.to_string(),
            last_observed_at: DateTime::<Utc>::UNIX_EPOCH,
            avg_price: avg,
            min_price: avg,
            max_price: avg,
            total_volume: 1,
        }
    }

    #[test]
    fn keeps_rows_untouched() {
        // Deliberately not sorted: projection must not reorder.
        let rows = vec![row("b", 1.0), row("a", 99_000.0), row("c", 50.0)];
        let table = project(rows.clone(), "Best Performing", 336);
        assert_eq!(table.title, "Best Performing");
        assert_eq!(table.hours, 336);
        assert_eq!(table.rows, rows);
    }

    #[test]
    fn empty_rows_make_empty_table() {
        let table = project(Vec::new(), "Top Seller", 24);
        assert!(table.rows.is_empty());
    }
}
