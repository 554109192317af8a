use crate::error::ExtractError;
use crate::model::Effect;
use crate::parser::TableParser;
use crate::sources::EFFECTS;

const ABILITY: &str = "Ability";
const COSMETIC: &str = "Cosmetic";

pub fn extract(html: &str, parser: &impl TableParser) -> Result<Vec<Effect>, ExtractError> {
    let rows = super::rows(html, parser, &EFFECTS.schema)?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let category = row.opt_text("type");
            Ok(Effect {
                name: row.text("name")?.to_string(),
                id: super::row_id(i),
                description: row.opt_text("description").map(str::to_string),
                is_ability: category == Some(ABILITY),
                is_cosmetic: category == Some(COSMETIC),
                multiplier: row.number("multiplier")?,
            })
        })
        .collect()
}
