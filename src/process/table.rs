/// A scraped table: one header row plus positional data rows. Cells stay
/// strings until the merge step decides which columns are numeric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Prepend a column where every row carries the same value. Used to tag
    /// each detail page's rows with the date inferred from its title.
    pub fn prepend_column(&mut self, name: &str, value: &str) {
        self.headers.insert(0, name.to_string());
        for row in &mut self.rows {
            row.insert(0, value.to_string());
        }
    }

    /// Cell at (row, column), padding ragged rows with the empty string.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Build a table from the store's raw shape: first row is the header.
    /// An empty payload yields an empty table.
    pub fn from_raw_rows(mut raw: Vec<Vec<String>>) -> Self {
        if raw.is_empty() {
            return Table::default();
        }
        let headers = raw.remove(0);
        Table { headers, rows: raw }
    }

    /// Flatten back to the store's shape: header row followed by data rows,
    /// every row padded out to the header width.
    pub fn to_raw_rows(&self) -> Vec<Vec<String>> {
        let width = self.headers.len();
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.headers.clone());
        for row in &self.rows {
            let mut row = row.clone();
            row.resize(width, String::new());
            out.push(row);
        }
        out
    }
}
