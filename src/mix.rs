use std::collections::BTreeSet;

use crate::model::{Dataset, Drug, Effect, EffectId, Ingredient};

/// A product never carries more effects than this; extra ingredient effects are dropped.
pub const MAX_EFFECTS: usize = 8;

pub type EffectSet = BTreeSet<EffectId>;

/// Effects of `drug` after adding `ingredients` in order.
pub fn mix(drug: &Drug, ingredients: &[&Ingredient]) -> EffectSet {
    let mut current: EffectSet = drug.base_effect_id.into_iter().collect();

    for ingredient in ingredients {
        let mut next = current.clone();
        let mut deferred = Vec::new();

        for (present, becomes) in ingredient.replaces_effects().iter() {
            if !current.contains(&present) {
                continue;
            }
            if current.contains(&becomes) {
                deferred.push((present, becomes));
            } else {
                next.remove(&present);
                next.insert(becomes);
            }
        }

        if next.len() < MAX_EFFECTS {
            next.insert(ingredient.adds_effect);
        }

        // a replacement blocked by an existing effect may fire once that effect moved on
        for (present, becomes) in deferred {
            if next.contains(&present) && !next.contains(&becomes) {
                next.remove(&present);
                next.insert(becomes);
            }
        }

        current = next;
    }

    current
}

#[derive(Debug)]
pub struct MixOutcome<'a> {
    pub drug: &'a Drug,
    pub ingredients: Vec<&'a Ingredient>,
    pub effects: Vec<&'a Effect>,
    pub multiplier: f64,
    pub cost: f64,
    pub sell_price: f64,
    pub profit: f64,
}

/// Run a mix and price it.
pub fn evaluate<'a>(
    data: &'a Dataset,
    drug: &'a Drug,
    ingredients: Vec<&'a Ingredient>,
) -> MixOutcome<'a> {
    let effects = mix(drug, &ingredients);
    price(data, drug, ingredients, effects)
}

/// Price a mix whose effects are already known.
pub fn price<'a>(
    data: &'a Dataset,
    drug: &'a Drug,
    ingredients: Vec<&'a Ingredient>,
    effects: EffectSet,
) -> MixOutcome<'a> {
    let effects: Vec<&Effect> = effects
        .into_iter()
        .filter_map(|id| data.effect(id))
        .collect();
    let multiplier: f64 = effects.iter().map(|e| e.multiplier).sum();
    let cost: f64 = ingredients.iter().map(|i| i.buy_price).sum();
    let sell_price = (drug.base_sell_value * (1.0 + multiplier)).round();
    let profit = (sell_price - cost).max(0.0);

    MixOutcome {
        drug,
        ingredients,
        effects,
        multiplier,
        cost,
        sell_price,
        profit,
    }
}
