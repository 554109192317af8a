pub mod drugs;
pub mod effects;
pub mod ingredients;
pub mod ranks;
pub mod rules;

use super::schema::{Row, TableSchema};
use super::TableParser;
use crate::error::ExtractError;

/// Parse `html` against `schema`, failing when the table yields nothing.
fn rows(
    html: &str,
    parser: &impl TableParser,
    schema: &TableSchema,
) -> Result<Vec<Row>, ExtractError> {
    let rows = parser.parse(html, schema)?;
    if rows.is_empty() {
        return Err(ExtractError::EmptyExtraction { table: schema.name });
    }
    Ok(rows)
}

/// Ids are 1-based row positions.
fn row_id(position: usize) -> u32 {
    position as u32 + 1
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Effect, Rank};

    /// Wrap table rows in a page with a decoy table ahead of the real one.
    pub fn page(class: &str, rows: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><body>
            <table class="{class}"><tr><th>Unrelated</th></tr><tr><td>noise</td></tr></table>
            <table class="{class}"><tbody><tr><th>A</th><th>B</th><th>C</th></tr>{rows}</tbody></table>
            </body></html>"#
        )
    }

    pub fn ranks() -> Vec<Rank> {
        ["Street Rat I", "Street Rat II", "Hoodlum I"]
            .iter()
            .enumerate()
            .map(|(i, name)| Rank { name: name.to_string(), level: i as u32 + 1 })
            .collect()
    }

    pub fn effects() -> Vec<Effect> {
        ["Anti-Gravity", "Calming", "Energizing", "Munchies", "Cyclopean", "Foggy", "Athletic"]
            .iter()
            .enumerate()
            .map(|(i, name)| Effect {
                name: name.to_string(),
                id: i as u32 + 1,
                description: None,
                is_ability: false,
                is_cosmetic: false,
                multiplier: 0.1,
            })
            .collect()
    }
}
