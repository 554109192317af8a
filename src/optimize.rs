use std::cmp::Ordering;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use rayon::prelude::*;
use tracing::info;

use crate::mix::{self, MixOutcome, MAX_EFFECTS};
use crate::model::{Dataset, DrugId, EffectId, IngredientId};

/// What makes one mix better than another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptimizeTarget {
    Profit,
    SellPrice,
    /// Cheaper is better
    Cost,
    FewestEffects,
    MostEffects,
    Multiplier,
    /// Fewer ingredients is better
    Ingredients,
}

pub const DEFAULT_TARGETS: &[OptimizeTarget] = &[
    OptimizeTarget::Profit,
    OptimizeTarget::Cost,
    OptimizeTarget::Ingredients,
];

impl OptimizeTarget {
    /// `Greater` when `a` is the better mix.
    pub fn compare(self, a: &MixOutcome, b: &MixOutcome) -> Ordering {
        match self {
            Self::Profit => a.profit.total_cmp(&b.profit),
            Self::SellPrice => a.sell_price.total_cmp(&b.sell_price),
            Self::Cost => b.cost.total_cmp(&a.cost),
            Self::FewestEffects => b.effects.len().cmp(&a.effects.len()),
            Self::MostEffects => a.effects.len().cmp(&b.effects.len()),
            Self::Multiplier => a.multiplier.total_cmp(&b.multiplier),
            Self::Ingredients => b.ingredients.len().cmp(&a.ingredients.len()),
        }
    }
}

/// Lexicographic comparison over `targets`: the first non-equal target decides.
pub fn compare(targets: &[OptimizeTarget], a: &MixOutcome, b: &MixOutcome) -> Ordering {
    targets
        .iter()
        .map(|t| t.compare(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Search space and ranking for `find_optimal_mix`. Names are resolved
/// against the dataset when added, so a typo fails before the search starts.
#[derive(Debug)]
pub struct Filter<'a> {
    pub targets: Vec<OptimizeTarget>,
    pub drugs: Vec<DrugId>,
    pub ingredients: Vec<IngredientId>,
    pub required_effects: Vec<EffectId>,
    pub blocked_effects: Vec<EffectId>,
    pub max_ingredients: usize,
    data: &'a Dataset,
}

impl<'a> Filter<'a> {
    pub fn new(data: &'a Dataset) -> Self {
        Self {
            targets: DEFAULT_TARGETS.to_vec(),
            drugs: Vec::new(),
            ingredients: Vec::new(),
            required_effects: Vec::new(),
            blocked_effects: Vec::new(),
            max_ingredients: MAX_EFFECTS,
            data,
        }
    }

    pub fn with_targets(&mut self, targets: Vec<OptimizeTarget>) -> &mut Self {
        self.targets = targets;
        self
    }

    pub fn with_max_ingredients(&mut self, max: usize) -> &mut Self {
        self.max_ingredients = max;
        self
    }

    pub fn add_drug(&mut self, name: &str) -> Result<&mut Self> {
        let drug = self
            .data
            .drug_by_name(name)
            .ok_or_else(|| anyhow!("Drug '{}' not found in dataset", name))?;
        push_unique(&mut self.drugs, drug.id);
        Ok(self)
    }

    pub fn add_all_drugs(&mut self) -> &mut Self {
        self.drugs = self.data.drugs.keys().copied().collect();
        self
    }

    pub fn add_ingredient(&mut self, name: &str) -> Result<&mut Self> {
        let ingredient = self
            .data
            .ingredient_by_name(name)
            .ok_or_else(|| anyhow!("Ingredient '{}' not found in dataset", name))?;
        push_unique(&mut self.ingredients, ingredient.id);
        Ok(self)
    }

    pub fn add_all_ingredients(&mut self) -> &mut Self {
        self.ingredients = self.data.ingredients.keys().copied().collect();
        self
    }

    pub fn add_required_effect(&mut self, name: &str) -> Result<&mut Self> {
        let id = self.effect_id(name)?;
        push_unique(&mut self.required_effects, id);
        Ok(self)
    }

    pub fn add_blocked_effect(&mut self, name: &str) -> Result<&mut Self> {
        let id = self.effect_id(name)?;
        push_unique(&mut self.blocked_effects, id);
        Ok(self)
    }

    fn effect_id(&self, name: &str) -> Result<EffectId> {
        self.data
            .effect_by_name(name)
            .map(|e| e.id)
            .ok_or_else(|| anyhow!("Effect '{}' not found in dataset", name))
    }

    /// Number of ingredient sequences tried across all drugs.
    pub fn combinations(&self) -> u64 {
        let n = self.ingredients.len() as u64;
        let per_drug = (1..=self.max_ingredients as u32)
            .map(|k| n.saturating_pow(k))
            .fold(0u64, u64::saturating_add);
        per_drug.saturating_mul(self.drugs.len() as u64)
    }
}

fn push_unique<T: PartialEq>(ids: &mut Vec<T>, id: T) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Best mix over every drug and every ingredient sequence (repeats allowed)
/// up to `max_ingredients` long that passes the effect filters. Ties keep the
/// mix found first: drugs, then shorter sequences, then ingredient order.
pub fn find_optimal_mix<'a>(filter: &Filter<'a>) -> Option<MixOutcome<'a>> {
    let data = filter.data;
    let total = filter.combinations();
    info!("Testing {} possible combinations", total);

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%, eta {eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    // split on (drug, length, first ingredient); the tails run sequentially
    let seeds: Vec<(DrugId, usize, IngredientId)> = filter
        .drugs
        .iter()
        .flat_map(|&drug| {
            (1..=filter.max_ingredients).flat_map(move |len| {
                filter.ingredients.iter().map(move |&first| (drug, len, first))
            })
        })
        .collect();

    let best = seeds
        .par_iter()
        .filter_map(|&(drug_id, len, first)| {
            let drug = data.drug(drug_id)?;
            tails(&filter.ingredients, len - 1)
                .filter_map(|tail| {
                    pb.inc(1);
                    let ingredients = std::iter::once(first)
                        .chain(tail)
                        .map(|id| data.ingredient(id))
                        .collect::<Option<Vec<_>>>()?;
                    let effects = mix::mix(drug, &ingredients);
                    if !filter.required_effects.iter().all(|e| effects.contains(e))
                        || filter.blocked_effects.iter().any(|e| effects.contains(e))
                    {
                        return None;
                    }
                    Some(mix::price(data, drug, ingredients, effects))
                })
                .reduce(|kept, found| better(&filter.targets, kept, found))
        })
        .reduce_with(|kept, found| better(&filter.targets, kept, found));

    pb.finish_and_clear();
    best
}

fn better<'a>(targets: &[OptimizeTarget], kept: MixOutcome<'a>, found: MixOutcome<'a>) -> MixOutcome<'a> {
    match compare(targets, &found, &kept) {
        Ordering::Greater => found,
        _ => kept,
    }
}

/// Every ingredient sequence of length `len`, in lexicographic order.
fn tails(ingredients: &[IngredientId], len: usize) -> Box<dyn Iterator<Item = Vec<IngredientId>> + '_> {
    if len == 0 {
        Box::new(std::iter::once(Vec::new()))
    } else {
        Box::new(
            (0..len)
                .map(|_| ingredients.iter().copied())
                .multi_cartesian_product(),
        )
    }
}
