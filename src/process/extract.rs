use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{Table, TABLE_MARKER};

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static CELL_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("cell selector"));
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("title selector"));

/// The page `<title>` text, or empty when the page has none.
pub fn page_title(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extract the per-unit results table from a detail page.
///
/// Scans every `<table>` and takes the first whose text mentions the
/// [`TABLE_MARKER`] keyword. Cells are trimmed with embedded newlines
/// stripped; rows with no content at all are dropped. Returns `None` when
/// no table matches or fewer than two non-empty rows survive (a header with
/// no data is as good as no table). The first surviving row is the header.
pub fn extract_machine_table(html: &str) -> Option<Table> {
    let doc = Html::parse_document(html);

    let target = doc
        .select(&TABLE_SEL)
        .find(|table| table.text().collect::<String>().contains(TABLE_MARKER))?;

    let mut raw: Vec<Vec<String>> = Vec::new();
    for row in target.select(&ROW_SEL) {
        let cells: Vec<String> = row.select(&CELL_SEL).map(cell_text).collect();
        if cells.iter().any(|c| !c.is_empty()) {
            raw.push(cells);
        }
    }

    if raw.len() < 2 {
        return None;
    }
    let headers = raw.remove(0);
    Some(Table::new(headers, raw))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().replace('\n', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
        <html><head><title>ダイナム 2024/3/5 結果</title></head><body>
        <table><tr><td>ナビ</td><td>リンク</td></tr></table>
        <table>
          <tr><th>機種</th><th>台番号</th><th>総差枚</th></tr>
          <tr><td> X
          </td><td>5</td><td>+1,200</td></tr>
          <tr><td></td><td></td><td></td></tr>
        </table>
        </body></html>"#;

    #[test]
    fn picks_table_containing_marker() {
        let t = extract_machine_table(DETAIL_PAGE).expect("table");
        assert_eq!(t.headers, vec!["機種", "台番号", "総差枚"]);
        assert_eq!(t.rows, vec![vec!["X", "5", "+1,200"]]);
    }

    #[test]
    fn no_marker_table_is_none() {
        let html = "<table><tr><td>a</td></tr></table>";
        assert!(extract_machine_table(html).is_none());
    }

    #[test]
    fn header_only_table_is_none() {
        let html = "<table><tr><th>機種</th><th>台番号</th></tr></table>";
        assert!(extract_machine_table(html).is_none());
    }

    #[test]
    fn title_text_is_trimmed() {
        assert_eq!(page_title(DETAIL_PAGE), "ダイナム 2024/3/5 結果");
        assert_eq!(page_title("<html><body></body></html>"), "");
    }
}
