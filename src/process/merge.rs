use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use super::{Table, DATE_COLUMN, NUMERIC_COLUMN_MARKERS, UNIT_COLUMN};

/// Date format used both for parsing sheet values (chrono tolerates
/// unpadded month/day here) and for the canonical rewrite.
const DATE_FMT: &str = "%Y/%m/%d";

/// Run the full merge pipeline over the previously stored table and the
/// freshly scraped one: align columns, drop duplicates (new data wins),
/// sort chronologically, coerce numeric columns.
pub fn merge(existing: Table, new: Table) -> Table {
    let mut merged = concat(existing, new);
    dedup(&mut merged);
    sort_by_date(&mut merged);
    coerce_numeric_columns(&mut merged);
    merged
}

/// Concatenate two tables, reconciling columns by name. The result header
/// is the union in first-seen order; cells for columns a row never had are
/// empty strings.
pub fn concat(existing: Table, new: Table) -> Table {
    let mut headers = existing.headers.clone();
    for h in &new.headers {
        if !headers.contains(h) {
            headers.push(h.clone());
        }
    }

    let mut rows = Vec::with_capacity(existing.rows.len() + new.rows.len());
    for (source, count) in [(&existing, existing.rows.len()), (&new, new.rows.len())] {
        let mapping: Vec<Option<usize>> = headers
            .iter()
            .map(|h| source.column_index(h))
            .collect();
        for i in 0..count {
            let row = mapping
                .iter()
                .map(|col| match col {
                    Some(c) => source.cell(i, *c).to_string(),
                    None => String::new(),
                })
                .collect();
            rows.push(row);
        }
    }

    Table::new(headers, rows)
}

/// Drop duplicate rows, keeping the last occurrence so newly scraped data
/// overrides what was already in the sheet. Keyed on (date, unit number)
/// when both columns exist, else on whole-row equality. Surviving rows keep
/// their relative order.
pub fn dedup(table: &mut Table) {
    let key_cols = match (
        table.column_index(DATE_COLUMN),
        table.column_index(UNIT_COLUMN),
    ) {
        (Some(d), Some(u)) => Some((d, u)),
        _ => None,
    };

    let mut last_for_key: HashMap<Vec<String>, usize> = HashMap::new();
    for (i, _) in table.rows.iter().enumerate() {
        let key = match key_cols {
            Some((d, u)) => vec![
                table.cell(i, d).to_string(),
                table.cell(i, u).to_string(),
            ],
            None => table.rows[i].clone(),
        };
        last_for_key.insert(key, i);
    }

    let mut i = 0;
    table.rows.retain(|row| {
        let key = match key_cols {
            Some((d, u)) => vec![
                row.get(d).cloned().unwrap_or_default(),
                row.get(u).cloned().unwrap_or_default(),
            ],
            None => row.clone(),
        };
        let keep = last_for_key.get(&key) == Some(&i);
        i += 1;
        keep
    });
}

/// Sort rows ascending by the date column and rewrite it in canonical
/// zero-padded form. Rows whose date does not parse (including the
/// "date unknown" sentinel) are dropped outright. No-op without a date
/// column.
pub fn sort_by_date(table: &mut Table) {
    let Some(date_col) = table.column_index(DATE_COLUMN) else {
        return;
    };

    let mut dated: Vec<(NaiveDate, Vec<String>)> = Vec::with_capacity(table.rows.len());
    let before = table.rows.len();
    for row in table.rows.drain(..) {
        let cell = row.get(date_col).map(String::as_str).unwrap_or("");
        if let Ok(date) = NaiveDate::parse_from_str(cell, DATE_FMT) {
            dated.push((date, row));
        }
    }
    let dropped = before - dated.len();
    if dropped > 0 {
        warn!(dropped, "rows without a parseable date were discarded");
    }

    dated.sort_by_key(|(date, _)| *date);
    table.rows = dated
        .into_iter()
        .map(|(date, mut row)| {
            row[date_col] = date.format(DATE_FMT).to_string();
            row
        })
        .collect();
}

/// Rewrite numeric-semantic columns as integers so the sheet stores real
/// numbers instead of quoted text. Thousands separators and a leading `+`
/// are stripped; anything that still fails to parse becomes 0 and is
/// reported once per column.
pub fn coerce_numeric_columns(table: &mut Table) {
    let targets: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| NUMERIC_COLUMN_MARKERS.iter().any(|m| h.contains(m)))
        .map(|(i, _)| i)
        .collect();

    for col in targets {
        let mut misses = 0usize;
        for row in &mut table.rows {
            if let Some(cell) = row.get_mut(col) {
                let cleaned = cell.replace(',', "");
                let cleaned = cleaned.trim().trim_start_matches('+');
                let value = match cleaned.parse::<f64>() {
                    Ok(v) => v as i64,
                    Err(_) => {
                        if !cleaned.is_empty() {
                            misses += 1;
                        }
                        0
                    }
                };
                *cell = value.to_string();
            }
        }
        if misses > 0 {
            warn!(
                column = %table.headers[col],
                misses,
                "unparseable numeric cells defaulted to 0"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,minrepo_sync::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn concat_unions_headers_and_fills_missing() {
        let a = table(&["日付", "台番号"], &[&["2024/03/05", "5"]]);
        let b = table(&["台番号", "G数"], &[&["6", "100"]]);
        let c = concat(a, b);
        assert_eq!(c.headers, vec!["日付", "台番号", "G数"]);
        assert_eq!(c.rows[0], vec!["2024/03/05", "5", ""]);
        assert_eq!(c.rows[1], vec!["", "6", "100"]);
    }

    #[test]
    fn merge_with_self_does_not_grow() {
        let t = table(
            &["日付", "台番号", "総差枚"],
            &[
                &["2024/03/05", "5", "100"],
                &["2024/03/05", "6", "-50"],
            ],
        );
        let merged = merge(t.clone(), t.clone());
        assert_eq!(merged.rows.len(), 2);
    }

    #[test]
    fn new_row_wins_on_key_conflict() {
        let old = table(&["日付", "台番号", "総差枚"], &[&["2024/03/05", "5", "100"]]);
        let new = table(&["日付", "台番号", "総差枚"], &[&["2024/03/05", "5", "999"]]);
        let merged = merge(old, new);
        assert_eq!(merged.rows.len(), 1);
        assert_eq!(merged.rows[0][2], "999");
    }

    #[test]
    fn dedup_without_key_columns_uses_whole_row() {
        let mut t = table(
            &["機種", "台番号"],
            &[&["X", "5"], &["X", "5"], &["Y", "6"]],
        );
        dedup(&mut t);
        assert_eq!(t.rows, vec![vec!["X", "5"], vec!["Y", "6"]]);
    }

    #[test]
    fn sort_drops_unparseable_dates_and_orders_ascending() {
        init_test_logging();
        let mut t = table(
            &["日付", "台番号"],
            &[
                &["2024/3/7", "1"],
                &["日付不明", "2"],
                &["2024/03/05", "3"],
            ],
        );
        sort_by_date(&mut t);
        assert_eq!(
            t.rows,
            vec![vec!["2024/03/05", "3"], vec!["2024/03/07", "1"]]
        );
    }

    #[test]
    fn numeric_coercion_cleans_and_defaults() {
        init_test_logging();
        let mut t = table(
            &["機種", "総差枚", "G数"],
            &[&["X", "1,234", "+500"], &["Y", "n/a", ""]],
        );
        coerce_numeric_columns(&mut t);
        assert_eq!(t.rows[0], vec!["X", "1234", "500"]);
        assert_eq!(t.rows[1], vec!["Y", "0", "0"]);
    }

    #[test]
    fn machine_name_column_is_left_alone() {
        let mut t = table(&["機種"], &[&["ジャグラー123"]]);
        coerce_numeric_columns(&mut t);
        assert_eq!(t.rows[0], vec!["ジャグラー123"]);
    }
}
