use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};

use crate::parser::extract::rules::RulePhase;

pub type EffectId = u32;
pub type DrugId = u32;
pub type IngredientId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    pub id: EffectId,
    pub description: Option<String>,
    pub is_ability: bool,
    pub is_cosmetic: bool,
    #[serde(serialize_with = "decimal")]
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub name: String,
    pub id: DrugId,
    pub base_effect_id: Option<EffectId>,
    #[serde(serialize_with = "decimal")]
    pub base_sell_value: f64,
    pub unlock_rank: u32,
}

/// Effect replacements an ingredient causes: effect already present → effect it becomes.
///
/// Ingredients are built with an empty set; only mixing-rule extraction can write to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Replacements(BTreeMap<EffectId, EffectId>);

impl Replacements {
    pub fn get(&self, present: EffectId) -> Option<EffectId> {
        self.0.get(&present).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectId, EffectId)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, present: EffectId, becomes: EffectId) -> Option<EffectId> {
        self.0.insert(present, becomes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub id: IngredientId,
    #[serde(serialize_with = "decimal")]
    pub buy_price: f64,
    pub unlock_rank: u32,
    pub adds_effect: EffectId,
    replaces_effects: Replacements,
}

impl Ingredient {
    pub fn new(
        id: IngredientId,
        name: String,
        buy_price: f64,
        unlock_rank: u32,
        adds_effect: EffectId,
    ) -> Self {
        Self {
            name,
            id,
            buy_price,
            unlock_rank,
            adds_effect,
            replaces_effects: Replacements::default(),
        }
    }

    pub fn replaces_effects(&self) -> &Replacements {
        &self.replaces_effects
    }

    /// Write access to the annex, gated on the rule-phase token.
    pub fn replacements_mut(&mut self, _phase: &RulePhase) -> &mut Replacements {
        &mut self.replaces_effects
    }
}

/// The whole snapshot, as written to `data.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub ranks: Vec<Rank>,
    pub effects: BTreeMap<EffectId, Effect>,
    pub drugs: BTreeMap<DrugId, Drug>,
    pub ingredients: BTreeMap<IngredientId, Ingredient>,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse dataset JSON")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize dataset")
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write dataset {}", path.display()))
    }

    pub fn effect(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(&id)
    }

    pub fn drug(&self, id: DrugId) -> Option<&Drug> {
        self.drugs.get(&id)
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    pub fn effect_by_name(&self, name: &str) -> Option<&Effect> {
        self.effects.values().find(|e| e.name == name)
    }

    pub fn drug_by_name(&self, name: &str) -> Option<&Drug> {
        self.drugs.values().find(|d| d.name == name)
    }

    pub fn ingredient_by_name(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.values().find(|i| i.name == name)
    }
}

/// Integral decimals go out as JSON integers (`35`, not `35.0`).
fn decimal<S: Serializer>(value: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        s.serialize_i64(*value as i64)
    } else {
        s.serialize_f64(*value)
    }
}
