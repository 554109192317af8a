pub mod extract;
pub mod index;
pub mod schema;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use schema::{Coerce, Row, TableSchema, Value};

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?(?:\d+(?:\.\d*)?|\.\d+)").unwrap());

/// Turns a markup document plus a table schema into ordered rows.
pub trait TableParser {
    fn parse(&self, html: &str, schema: &TableSchema) -> Result<Vec<Row>, ExtractError>;
}

/// `TableParser` over real HTML, backed by the `scraper` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTableParser;

impl TableParser for HtmlTableParser {
    fn parse(&self, html: &str, schema: &TableSchema) -> Result<Vec<Row>, ExtractError> {
        let doc = Html::parse_document(html);
        let table_sel = selector(schema.table)?;
        let row_sel = selector("tr")?;
        let td_sel = selector("td")?;
        let cells = schema
            .columns
            .iter()
            .map(|c| Ok((c, selector(c.cell)?)))
            .collect::<Result<Vec<_>, ExtractError>>()?;

        let mut rows = Vec::new();
        let tables = doc
            .select(&table_sel)
            .filter(|t| element_text(t).contains(schema.sentinel));

        for table in tables {
            for tr in table.select(&row_sel) {
                if tr.select(&td_sel).next().is_none() {
                    continue;
                }
                let index = rows.len() + 1;
                let mut values = Vec::with_capacity(cells.len());
                for (column, sel) in &cells {
                    let text = tr.select(sel).next().map(|cell| element_text(&cell));
                    let value = coerce(text.as_deref(), column.coerce).ok_or_else(|| {
                        match text.filter(|t| !t.is_empty()) {
                            Some(text) => ExtractError::InvalidNumber {
                                table: schema.name,
                                row: index,
                                column: column.name,
                                text,
                            },
                            None => ExtractError::MissingCell {
                                table: schema.name,
                                row: index,
                                column: column.name,
                            },
                        }
                    })?;
                    values.push((column.name, value));
                }
                rows.push(Row {
                    table: schema.name,
                    index,
                    cells: values,
                });
            }
        }

        Ok(rows)
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Apply a coercion to a cell's trimmed text (`None` = locator matched nothing).
/// Returns `None` when a required value can't be produced.
fn coerce(text: Option<&str>, how: Coerce) -> Option<Value> {
    let text = text.filter(|t| !t.is_empty());
    match (how, text) {
        (Coerce::Text | Coerce::OptionalText, Some(t)) => Some(Value::Text(t.to_string())),
        (Coerce::Number | Coerce::OptionalNumber, Some(t)) => match parse_number(t) {
            Some(n) => Some(Value::Number(n)),
            None if how.is_optional() => Some(Value::Absent),
            None => None,
        },
        (how, None) if how.is_optional() => Some(Value::Absent),
        (_, None) => None,
    }
}

/// First decimal number in `text`, ignoring thousands separators and decoration.
pub fn parse_number(text: &str) -> Option<f64> {
    let plain = text.replace(',', "");
    NUMBER_RE.find(&plain)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::Column;

    const COLUMNS: &[Column] = &[
        Column::text("name", "td:nth-child(1)"),
        Column::number("xp", "td:nth-child(3)"),
        Column::optional_text("note", "td:nth-child(4)"),
        Column::optional_number("bonus", "td:nth-child(5)"),
    ];

    const SCHEMA: TableSchema = TableSchema {
        name: "test",
        table: "table.wikitable",
        sentinel: "Street Rat I",
        columns: COLUMNS,
    };

    fn parse(html: &str) -> Result<Vec<Row>, ExtractError> {
        HtmlTableParser.parse(html, &SCHEMA)
    }

    #[test]
    fn sentinel_picks_the_right_table() {
        let html = r#"<html><body>
            <table class="wikitable"><tr><th>Other</th></tr><tr><td>Decoy</td><td></td><td>1</td></tr></table>
            <table class="navbox"><tr><td>Street Rat I</td><td></td><td>9</td></tr></table>
            <table class="wikitable">
              <tr><th>Rank</th><th>Tier</th><th>XP</th></tr>
              <tr><td> Street Rat I </td><td>1</td><td>0</td><td>first</td><td>x2</td></tr>
              <tr><td>Hoodlum I</td><td>2</td><td>1,200</td></tr>
            </table>
        </body></html>"#;
        let rows = parse(html).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("name").unwrap(), "Street Rat I");
        assert_eq!(rows[0].opt_text("note"), Some("first"));
        assert_eq!(rows[0].opt_number("bonus"), Some(2.0));
        assert_eq!(rows[1].number("xp").unwrap(), 1200.0);
        assert_eq!(rows[1].opt_text("note"), None);
        assert_eq!(rows[1].opt_number("bonus"), None);
        assert_eq!(rows[1].index, 2);
    }

    #[test]
    fn no_matching_table_yields_no_rows() {
        let html = r#"<table class="wikitable"><tr><td>Nothing</td><td></td><td>1</td></tr></table>"#;
        assert!(parse(html).unwrap().is_empty());
    }

    #[test]
    fn missing_required_cell() {
        let html = r#"<table class="wikitable"><tr><td>Street Rat I</td></tr></table>"#;
        let err = parse(html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingCell { column: "xp", row: 1, .. }));
    }

    #[test]
    fn non_numeric_required_cell() {
        let html = r#"<table class="wikitable"><tr><td>Street Rat I</td><td></td><td>lots</td></tr></table>"#;
        let err = parse(html).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidNumber { ref text, .. } if text == "lots"));
    }

    #[test]
    fn nested_span_locator() {
        const SPAN: &[Column] = &[Column::text("name", "td:nth-child(1) span[style]")];
        let schema = TableSchema { columns: SPAN, ..SCHEMA };
        let html = r#"<table class="wikitable"><tr>
            <td><img alt="icon"><span style="color:#fff">Anti-Gravity</span></td>
            <td>Street Rat I</td></tr></table>"#;
        let rows = HtmlTableParser.parse(html, &schema).unwrap();
        assert_eq!(rows[0].text("name").unwrap(), "Anti-Gravity");
    }

    #[test]
    fn bad_selector() {
        const BAD: &[Column] = &[Column::text("name", "td:::")];
        let schema = TableSchema { columns: BAD, ..SCHEMA };
        let err = HtmlTableParser.parse("<table></table>", &schema).unwrap_err();
        assert!(matches!(err, ExtractError::Selector { .. }));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("$35"), Some(35.0));
        assert_eq!(parse_number("1,500 XP"), Some(1500.0));
        assert_eq!(parse_number(" 0.44 "), Some(0.44));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("x.44"), Some(0.44));
        assert_eq!(parse_number("2."), Some(2.0));
        assert_eq!(parse_number("none"), None);
    }
}
