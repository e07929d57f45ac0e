//! Meta progression carried between runs: the profile shape, its legacy
//! migration, reward conversion and the run-start package.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::province::Province;
use super::MAX_MORALE;

pub const PROFILE_VERSION: &str = "1.0";
const DEFAULT_SEALS: u64 = 50;
const MAX_LOADOUT_CARDS: usize = 20;
const MAX_HQ_BUILDINGS: usize = 20;
const MAX_UNLOCKS: usize = 200;
const SCORE_PER_SEAL: f64 = 600.0;
const MIN_DIFFICULTY: f64 = 0.5;
const MAX_DIFFICULTY: f64 = 3.0;
const SEAL_BONUS_STEP: u32 = 10;
const SEAL_BONUS_CAP: u32 = 20;
const BUILD_LIMIT_CAP: usize = 2;
const INTEL_UNCERTAINTY_FLOOR: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaProfile {
    pub version: String,
    pub seals: u64,
    pub hq: Headquarters,
    pub loadout: Loadout,
    pub unlocks: Vec<String>,
    pub realm: Realm,
}

impl Default for MetaProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION.to_string(),
            seals: DEFAULT_SEALS,
            hq: Headquarters::default(),
            loadout: Loadout::default(),
            unlocks: Vec::new(),
            realm: Realm::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headquarters {
    pub level: u32,
    #[serde(default)]
    pub buildings: Vec<HqBuilding>,
}

impl Default for Headquarters {
    fn default() -> Self {
        Self {
            level: 1,
            buildings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HqBuilding {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loadout {
    #[serde(default)]
    pub cards: Vec<String>,
}

impl Loadout {
    fn count(&self, card: &str) -> usize {
        self.cards.iter().filter(|id| id.as_str() == card).count()
    }

    fn contains(&self, card: &str) -> bool {
        self.cards.iter().any(|id| id == card)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Realm {
    pub terraform_stage: i64,
    pub start_bonuses: RealmStart,
    pub event_weights: BTreeMap<String, f64>,
}

/// Additive start values for the player's province.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealmStart {
    pub food: f64,
    pub workers: f64,
    pub morale: f64,
    pub food_cap_delta: f64,
    pub base_g: f64,
}

impl MetaProfile {
    /// Normalizes any stored profile, current or legacy, into the current shape.
    ///
    /// Legacy profiles kept their currency in `currency` and their cards in
    /// `upgrades`; both are still honoured when the new fields are absent.
    pub fn migrate(raw: &Value) -> Self {
        let mut profile = Self::default();
        if raw.is_null() {
            return profile;
        }

        if let Some(seals) = raw
            .get("seals")
            .and_then(Value::as_f64)
            .or_else(|| raw.get("currency").and_then(Value::as_f64))
        {
            profile.seals = seals.floor().max(0.0) as u64;
        }

        let cards = raw
            .get("loadout")
            .and_then(|loadout| loadout.get("cards"))
            .and_then(Value::as_array)
            .or_else(|| raw.get("upgrades").and_then(Value::as_array));
        if let Some(cards) = cards {
            profile.loadout.cards = strings(cards, MAX_LOADOUT_CARDS);
        }

        if let Some(hq) = raw.get("hq") {
            if let Some(level) = hq.get("level").and_then(Value::as_f64) {
                profile.hq.level = level.floor().max(1.0) as u32;
            }
            if let Some(buildings) = hq.get("buildings").and_then(Value::as_array) {
                profile.hq.buildings = buildings
                    .iter()
                    .take(MAX_HQ_BUILDINGS)
                    .filter_map(|building| serde_json::from_value(building.clone()).ok())
                    .collect();
            }
        }

        if let Some(realm) = raw.get("realm") {
            let has_stage = realm
                .get("terraformStage")
                .is_some_and(|stage| !stage.is_null());
            if has_stage {
                match serde_json::from_value::<Realm>(realm.clone()) {
                    Ok(parsed) => profile.realm = parsed,
                    Err(err) => log::warn!("Reichsdaten im Profil ignoriert: {}", err),
                }
            }
        }

        if let Some(unlocks) = raw.get("unlocks").and_then(Value::as_array) {
            profile.unlocks = strings(unlocks, MAX_UNLOCKS);
        }

        profile
    }

    /// Bonus on seal income in percent, 10 per archive card up to 20.
    pub fn seals_bonus_percent(&self) -> u32 {
        let cards = self.loadout.count("seal_bonus_10") as u32;
        (cards * SEAL_BONUS_STEP).min(SEAL_BONUS_CAP)
    }

    pub fn export_run_start(&self) -> RunStart {
        let cards = &self.loadout;
        let mut realm_start = self.realm.start_bonuses;
        let stage = terraform_stage(self.realm.terraform_stage);

        realm_start.food += stage.start_bonuses.food;
        realm_start.workers += stage.start_bonuses.workers;
        realm_start.morale += stage.start_bonuses.morale;

        if cards.contains("granary-I") {
            realm_start.food_cap_delta += 50.0;
        }
        if cards.contains("piety-I") {
            realm_start.morale += 5.0;
        }
        if cards.contains("stewardship-I") {
            realm_start.base_g += 10.0;
        }

        let availability = [
            ("throne_vassal", "king_diplomacy"),
            ("war_spy", "intel_recon"),
            ("seals_archive", "seal_economy"),
        ]
        .into_iter()
        .filter(|(building, _)| self.hq.buildings.iter().any(|b| b.id == *building))
        .map(|(_, token)| token.to_string())
        .collect();

        let mut event_weights = self.realm.event_weights.clone();
        for (event, weight) in stage.event_weights {
            event_weights.insert((*event).to_string(), *weight);
        }

        RunStart {
            realm_start,
            build_limit_delta: cards.count("build_limit_plus_1").min(BUILD_LIMIT_CAP),
            intel: Intel {
                uncertainty_floor: INTEL_UNCERTAINTY_FLOOR,
            },
            availability,
            event_weights,
        }
    }
}

fn strings(values: &[Value], limit: usize) -> Vec<String> {
    values
        .iter()
        .take(limit)
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intel {
    pub uncertainty_floor: u32,
}

/// Everything a new run inherits from the meta profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStart {
    pub realm_start: RealmStart,
    pub build_limit_delta: usize,
    pub intel: Intel,
    pub availability: Vec<String>,
    pub event_weights: BTreeMap<String, f64>,
}

impl RunStart {
    pub fn apply_to(&self, input: &Province) -> Province {
        let bonus = &self.realm_start;
        let mut province = input.clone();
        province.food += bonus.food;
        province.workers += bonus.workers.round() as i64;
        province.morale = (province.morale + bonus.morale.round() as i32).min(MAX_MORALE);
        province.food_cap += bonus.food_cap_delta;
        province.base_g += bonus.base_g;
        province.building_slots += self.build_limit_delta;
        province
    }
}

/// Seals earned for a final score. Difficulty scales the result within 0.5..=3.
pub fn compute_rewards(total_score: f64, difficulty: Option<f64>) -> u64 {
    let score = total_score.floor().max(0.0);
    let difficulty = difficulty
        .filter(|value| !value.is_nan())
        .map(|value| value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY))
        .unwrap_or(1.0);
    (score / SCORE_PER_SEAL * difficulty).floor() as u64
}

/// Applies the simple start cards to a province without touching the input.
pub fn apply_meta_bonuses<S: AsRef<str>>(input: &Province, upgrades: &[S]) -> Province {
    let has = |id: &str| upgrades.iter().any(|upgrade| upgrade.as_ref() == id);
    let mut province = input.clone();
    if has("granary-I") {
        province.food_cap += 50.0;
    }
    if has("piety-I") {
        province.morale = (province.morale + 5).min(MAX_MORALE);
    }
    if has("stewardship-I") {
        province.base_g += 10.0;
    }
    province
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Throne,
    Logistics,
    War,
    Archive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeCard {
    pub id: &'static str,
    pub label: &'static str,
    pub cost: u32,
    pub slot_type: SlotType,
    pub requires: &'static [&'static str],
}

pub const UPGRADE_CATALOG: [UpgradeCard; 6] = [
    UpgradeCard {
        id: "granary-I",
        label: "Baukunst I – +50 Nahrungskapazität",
        cost: 0,
        slot_type: SlotType::Logistics,
        requires: &[],
    },
    UpgradeCard {
        id: "piety-I",
        label: "Frömmigkeit I – +5 Startmoral",
        cost: 1,
        slot_type: SlotType::Archive,
        requires: &[],
    },
    UpgradeCard {
        id: "stewardship-I",
        label: "Verwaltung I – +10 Basisgold",
        cost: 2,
        slot_type: SlotType::Logistics,
        requires: &[],
    },
    UpgradeCard {
        id: "build_limit_plus_1",
        label: "Baukontingent +1 (Cap +2)",
        cost: 5,
        slot_type: SlotType::Logistics,
        requires: &["tree:workshop.limit.plus1"],
    },
    UpgradeCard {
        id: "intel_shrink_10pp",
        label: "Intel-Unsicherheit −10 %-Punkte (Floor 10%)",
        cost: 15,
        slot_type: SlotType::War,
        requires: &["tree:spycraft.intel.shrink1"],
    },
    UpgradeCard {
        id: "seal_bonus_10",
        label: "Siegel-Ertrag +10% (Cap +20%)",
        cost: 20,
        slot_type: SlotType::Archive,
        requires: &["tree:sealsarchive.bonus10"],
    },
];

pub fn card_slot_type(card_id: &str) -> Option<SlotType> {
    UPGRADE_CATALOG
        .iter()
        .find(|card| card.id == card_id)
        .map(|card| card.slot_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockNode {
    pub id: &'static str,
    pub label: &'static str,
    pub cost: u32,
}

pub const UNLOCK_CATALOG: [UnlockNode; 3] = [
    UnlockNode {
        id: "tree:workshop.limit.plus1",
        label: "Werkstatt: Baukontingent-Freigabe (+1)",
        cost: 8,
    },
    UnlockNode {
        id: "tree:spycraft.intel.shrink1",
        label: "Spionage: Spähernetz I (−10 %-Punkte)",
        cost: 12,
    },
    UnlockNode {
        id: "tree:sealsarchive.bonus10",
        label: "Siegel-Archiv: Ertragsbonus +10%",
        cost: 15,
    },
];

/// Palace slots unlocked at an HQ level; levels outside 1..=3 are clamped.
pub fn slot_types_for_level(level: u32) -> Vec<SlotType> {
    let all = [
        SlotType::Throne,
        SlotType::Logistics,
        SlotType::War,
        SlotType::Archive,
    ];
    let count = level.clamp(1, 3) as usize + 1;
    all[..count].to_vec()
}

pub fn max_slots(level: u32) -> usize {
    slot_types_for_level(level).len()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerraformStage {
    pub stage: u8,
    pub id: &'static str,
    pub label: &'static str,
    pub cost: u32,
    pub start_bonuses: RealmStart,
    pub event_weights: &'static [(&'static str, f64)],
}

const fn start_bonus(food: f64, workers: f64, morale: f64) -> RealmStart {
    RealmStart {
        food,
        workers,
        morale,
        food_cap_delta: 0.0,
        base_g: 0.0,
    }
}

pub const TERRAFORM_STAGES: [TerraformStage; 5] = [
    TerraformStage {
        stage: 0,
        id: "wasteland",
        label: "Ödland",
        cost: 0,
        start_bonuses: start_bonus(0.0, 0.0, 0.0),
        event_weights: &[],
    },
    TerraformStage {
        stage: 1,
        id: "steppe",
        label: "Steppe",
        cost: 5,
        start_bonuses: start_bonus(1.0, 0.0, 0.0),
        event_weights: &[],
    },
    TerraformStage {
        stage: 2,
        id: "farmland",
        label: "Ackerland",
        cost: 10,
        start_bonuses: start_bonus(2.0, 1.0, 0.0),
        event_weights: &[],
    },
    TerraformStage {
        stage: 3,
        id: "meadow",
        label: "Aue",
        cost: 15,
        start_bonuses: start_bonus(4.0, 1.0, 1.0),
        event_weights: &[("harvest_fest", 2.0), ("flood", 1.0)],
    },
    TerraformStage {
        stage: 4,
        id: "eden",
        label: "Eden",
        cost: 25,
        start_bonuses: start_bonus(6.0, 2.0, 2.0),
        event_weights: &[("harvest_fest", 3.0)],
    },
];

pub fn terraform_stage(stage: i64) -> &'static TerraformStage {
    let last = TERRAFORM_STAGES.len() as i64 - 1;
    &TERRAFORM_STAGES[stage.clamp(0, last) as usize]
}

pub fn terraform_label(stage: i64) -> &'static str {
    terraform_stage(stage).label
}
