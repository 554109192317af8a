use crate::error::ExtractError;
use crate::model::{Drug, EffectId};
use crate::parser::index::NameIndex;
use crate::parser::TableParser;
use crate::sources::DRUGS;

/// Effect cell text meaning "this drug has no base effect".
const NO_EFFECT: &str = "None";

pub fn extract(
    html: &str,
    parser: &impl TableParser,
    ranks: &NameIndex<u32>,
    effects: &NameIndex<EffectId>,
) -> Result<Vec<Drug>, ExtractError> {
    let rows = super::rows(html, parser, &DRUGS.schema)?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let unlock_rank = ranks.resolve(row.text("rank")?)?;
            let base_effect_id = match row.text("base_effect")? {
                NO_EFFECT => None,
                name => Some(effects.resolve(name)?),
            };
            Ok(Drug {
                name: row.text("name")?.to_string(),
                id: super::row_id(i),
                base_effect_id,
                base_sell_value: row.number("base_sell_value")?,
                unlock_rank,
            })
        })
        .collect()
}
