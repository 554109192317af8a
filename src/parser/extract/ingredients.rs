use crate::error::ExtractError;
use crate::model::{EffectId, Ingredient};
use crate::parser::index::NameIndex;
use crate::parser::TableParser;
use crate::sources::INGREDIENTS;

/// Ingredients with an empty replacement set; mixing rules fill it in later.
pub fn extract(
    html: &str,
    parser: &impl TableParser,
    ranks: &NameIndex<u32>,
    effects: &NameIndex<EffectId>,
) -> Result<Vec<Ingredient>, ExtractError> {
    let rows = super::rows(html, parser, &INGREDIENTS.schema)?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let unlock_rank = ranks.resolve(row.text("rank")?)?;
            let adds_effect = effects.resolve(row.text("base_effect")?)?;
            Ok(Ingredient::new(
                super::row_id(i),
                row.text("name")?.to_string(),
                row.number("buy_price")?,
                unlock_rank,
                adds_effect,
            ))
        })
        .collect()
}
