use crate::error::ExtractError;
use crate::model::Rank;
use crate::parser::TableParser;
use crate::sources::RANKS;

/// Ranks in ascending experience order. Level is the 1-based position in that
/// order; experience itself is dropped.
pub fn extract(html: &str, parser: &impl TableParser) -> Result<Vec<Rank>, ExtractError> {
    let rows = super::rows(html, parser, &RANKS.schema)?;

    let mut ranks = rows
        .iter()
        .map(|row| Ok((row.text("name")?.to_string(), row.number("total_xp")?)))
        .collect::<Result<Vec<_>, ExtractError>>()?;

    // stable: equal experience keeps page order
    ranks.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(ranks
        .into_iter()
        .enumerate()
        .map(|(i, (name, _))| Rank {
            name,
            level: super::row_id(i),
        })
        .collect())
}
