use tracing::{debug, info};

use crate::error::ExtractError;
use crate::fetch::Fetch;
use crate::model::{Dataset, Drug, Effect, Ingredient, Rank};
use crate::parser::extract::{drugs, effects, ingredients, ranks, rules};
use crate::parser::{index, TableParser};
use crate::sources::{Source, DRUGS, EFFECTS, INGREDIENTS, MIXING, RANKS};

/// One full scrape: fetch each page in dependency order, extract, cross-reference,
/// assemble. The first failure aborts; nothing partial is returned.
pub async fn run(fetcher: &impl Fetch, parser: &impl TableParser) -> Result<Dataset, ExtractError> {
    let ranks = ranks::extract(&fetch(fetcher, &RANKS).await?, parser)?;
    info!("Extracted {} ranks", ranks.len());

    let effects = effects::extract(&fetch(fetcher, &EFFECTS).await?, parser)?;
    info!("Extracted {} effects", effects.len());

    let rank_index = index::ranks(&ranks);
    let effect_index = index::effects(&effects);
    debug!(
        "Indexed {} rank names, {} effect names",
        rank_index.len(),
        effect_index.len()
    );

    let drugs = drugs::extract(
        &fetch(fetcher, &DRUGS).await?,
        parser,
        &rank_index,
        &effect_index,
    )?;
    info!("Extracted {} drugs", drugs.len());

    let mut ingredients = ingredients::extract(
        &fetch(fetcher, &INGREDIENTS).await?,
        parser,
        &rank_index,
        &effect_index,
    )?;
    info!("Extracted {} ingredients", ingredients.len());

    rules::extract(
        &fetch(fetcher, &MIXING).await?,
        parser,
        &mut ingredients,
        &effect_index,
    )?;

    Ok(assemble(ranks, effects, drugs, ingredients))
}

async fn fetch(fetcher: &impl Fetch, source: &Source) -> Result<String, ExtractError> {
    let url = source.url();
    fetcher
        .fetch(&url)
        .await
        .map_err(|cause| ExtractError::Fetch { url, cause })
}

/// Key the id-bearing collections by id.
pub fn assemble(
    ranks: Vec<Rank>,
    effects: Vec<Effect>,
    drugs: Vec<Drug>,
    ingredients: Vec<Ingredient>,
) -> Dataset {
    Dataset {
        ranks,
        effects: effects.into_iter().map(|e| (e.id, e)).collect(),
        drugs: drugs.into_iter().map(|d| (d.id, d)).collect(),
        ingredients: ingredients.into_iter().map(|i| (i.id, i)).collect(),
    }
}
