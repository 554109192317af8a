use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::model::{EffectId, Ingredient};
use crate::parser::index::{MatchPolicy, NameIndex};
use crate::parser::TableParser;
use crate::sources::MIXING;

/// Capability for writing `Ingredient::replaces_effects`. Only this module can make one.
#[derive(Debug)]
pub struct RulePhase(());

/// Annotate `ingredients` with the replacement rules from the mixing table.
///
/// Each row reads "adding `product` to a mix that has `effect` turns it into
/// `replaces`". Rows without a replacement are skipped; what they mean is not
/// modeled. A later row for the same product and effect overwrites an earlier one.
pub fn extract(
    html: &str,
    parser: &impl TableParser,
    ingredients: &mut [Ingredient],
    effects: &NameIndex<EffectId>,
) -> Result<(), ExtractError> {
    let rows = super::rows(html, parser, &MIXING.schema)?;
    let products = NameIndex::build(
        "product",
        MatchPolicy::Exact,
        ingredients.iter().enumerate().map(|(pos, i)| (i.name.as_str(), pos)),
    );
    let phase = RulePhase(());
    let mut skipped = 0;

    for row in &rows {
        let product = products.resolve(row.text("product")?)?;
        let effect_name = row.text("effect")?;

        let Some(replacement_name) = row.opt_text("replaces") else {
            debug!(
                "Skipping rule {} for {}: no replacement effect",
                effect_name, ingredients[product].name
            );
            skipped += 1;
            continue;
        };

        let present = effects.resolve(effect_name)?;
        let becomes = effects.resolve(replacement_name)?;
        ingredients[product]
            .replacements_mut(&phase)
            .insert(present, becomes);
    }

    info!("Applied {} mixing rules", rows.len() - skipped);
    if skipped > 0 {
        warn!("Skipped {} mixing rules without a replacement effect", skipped);
    }
    Ok(())
}

/// Test helper: an ingredient that already carries the given replacements.
#[cfg(test)]
pub(crate) fn with_rules(mut ingredient: Ingredient, rules: &[(EffectId, EffectId)]) -> Ingredient {
    let phase = RulePhase(());
    for &(present, becomes) in rules {
        ingredient.replacements_mut(&phase).insert(present, becomes);
    }
    ingredient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract::fixtures;
    use crate::parser::{index, HtmlTableParser};

    const NOTE: &str = "Adds the effect only when Paranoia isn't already in the mix";

    fn row(effect: &str, product: &str, replaces: Option<&str>) -> String {
        let third = match replaces {
            Some(r) => format!(r#"<span style="color:red">{r}</span>"#),
            None => NOTE.to_string(),
        };
        format!(r#"<tr><td><span style="color:blue">{effect}</span></td><td>{product}</td><td>{third}</td></tr>"#)
    }

    fn ingredients() -> Vec<Ingredient> {
        vec![
            Ingredient::new(1, "Cuke".into(), 2.0, 1, 3),
            Ingredient::new(2, "Banana".into(), 2.0, 2, 2),
        ]
    }

    fn run(ingredients: &mut [Ingredient], rows: &[String]) -> Result<(), ExtractError> {
        // the sentinel note always rides along on a no-op row
        let mut rows = rows.to_vec();
        rows.push(row("Calming", "Banana", None));
        let html = fixtures::page("fandom-table", &rows.concat());
        extract(&html, &HtmlTableParser, ingredients, &index::effects(&fixtures::effects()))
    }

    #[test]
    fn records_replacement_on_product() {
        let mut ingredients = ingredients();
        run(&mut ingredients, &[row("Energizing", "Cuke", Some("Athletic"))]).unwrap();
        assert_eq!(ingredients[0].replaces_effects().get(3), Some(7));
        assert_eq!(ingredients[0].replaces_effects().len(), 1);
        assert!(ingredients[1].replaces_effects().is_empty());
    }

    #[test]
    fn row_without_replacement_changes_nothing() {
        let mut ingredients = ingredients();
        run(&mut ingredients, &[row("Munchies", "Cuke", None)]).unwrap();
        assert_eq!(ingredients, self::ingredients());
    }

    #[test]
    fn later_rule_overwrites_earlier() {
        let mut ingredients = ingredients();
        run(
            &mut ingredients,
            &[
                row("Energizing", "Cuke", Some("Athletic")),
                row("Energizing", "Cuke", Some("Foggy")),
                row("Calming", "Cuke", Some("Anti-Gravity")),
            ],
        )
        .unwrap();
        let pairs: Vec<_> = ingredients[0].replaces_effects().iter().collect();
        assert_eq!(pairs, vec![(2, 1), (3, 6)]);
    }

    #[test]
    fn unknown_product_halts_even_without_replacement() {
        let mut ingredients = ingredients();
        let err = run(&mut ingredients, &[row("Calming", "Mega Bean", None)]).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnresolvedReference { kind: "product", ref name } if name == "Mega Bean"
        ));
    }

    #[test]
    fn product_match_is_exact() {
        let mut ingredients = ingredients();
        let err = run(&mut ingredients, &[row("Energizing", "cuke", Some("Athletic"))]).unwrap_err();
        assert!(matches!(err, ExtractError::UnresolvedReference { kind: "product", .. }));
    }

    #[test]
    fn unknown_replacement_effect() {
        let mut ingredients = ingredients();
        let err = run(&mut ingredients, &[row("Energizing", "Cuke", Some("Zombifying"))]).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnresolvedReference { kind: "effect", ref name } if name == "Zombifying"
        ));
    }

    #[test]
    fn empty_mixing_table() {
        let mut ingredients = ingredients();
        let html = format!(r#"<table class="fandom-table"><tr><th>{NOTE}</th></tr></table>"#);
        let err = extract(
            &html,
            &HtmlTableParser,
            &mut ingredients,
            &index::effects(&fixtures::effects()),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::EmptyExtraction { table: "mixing" }));
    }
}
