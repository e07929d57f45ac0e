use std::fmt;

use serde::{Deserialize, Serialize};

use super::province::{Building, Province};
use super::{
    DEFAULT_MAX_MONTHS, DEFAULT_MONTH, TROOP_RECRUIT_COST, WORKER_RECRUIT_COST,
    WORKER_RECRUIT_GAIN,
};

const GRANARY_FILL_RATIO: f64 = 0.8;
const BARRACKS_TROOP_LIMIT: i64 = 200;
const TEMPLE_MORALE_LIMIT: i32 = 75;
const FORT_TROOP_THRESHOLD: i64 = 200;
const FOOD_LOW_RATIO: f64 = 0.25;
const FOOD_PURCHASE_COST: f64 = 15.0;
const FOOD_PURCHASE_AMOUNT: f64 = 20.0;
const MORALE_LOW: i32 = 40;
const MORALE_BOOST_COST: f64 = 10.0;
const MORALE_BOOST: i32 = 5;
const BASE_TROOP_TARGET: i64 = 150;
const TROOP_TARGET_GROWTH_START: u32 = 6;
const TROOP_TARGET_GROWTH: i64 = 2;
const WORKER_LOW: i64 = 50;

/// Timing information for one AI month. Zero means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiContext {
    pub month: u32,
    pub max_months: u32,
}

impl AiContext {
    pub fn new(month: u32, max_months: u32) -> Self {
        Self { month, max_months }
    }

    pub fn month(&self) -> u32 {
        if self.month == 0 {
            DEFAULT_MONTH
        } else {
            self.month
        }
    }

    pub fn max_months(&self) -> u32 {
        if self.max_months == 0 {
            DEFAULT_MAX_MONTHS
        } else {
            self.max_months
        }
    }

    fn late_game(&self) -> bool {
        f64::from(self.month()) > f64::from(self.max_months()) / 2.0
    }

    /// Troop level below which the AI keeps recruiting; rises after month 6.
    pub fn troop_threshold(&self) -> i64 {
        let growth_months = self.month().saturating_sub(TROOP_TARGET_GROWTH_START);
        BASE_TROOP_TARGET + i64::from(growth_months) * TROOP_TARGET_GROWTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    Built(Building),
    BoughtFood,
    RaisedMorale,
    RecruitedTroops(i64),
    RecruitedWorkers(i64),
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiAction::Built(building) => write!(f, "baut {}", building),
            AiAction::BoughtFood => write!(f, "kauft {} Nahrung", FOOD_PURCHASE_AMOUNT),
            AiAction::RaisedMorale => write!(f, "hebt die Moral um {}", MORALE_BOOST),
            AiAction::RecruitedTroops(gain) => write!(f, "rekrutiert {} Truppen", gain),
            AiAction::RecruitedWorkers(gain) => write!(f, "wirbt {} Arbeiter an", gain),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiOutcome {
    pub province: Province,
    pub actions: Vec<AiAction>,
}

/// Applies one month of AI decisions and returns the new province.
pub fn apply_ai(province: &Province, context: &AiContext) -> Province {
    decide_ai(province, context).province
}

/// Same as [`apply_ai`], but also reports which decisions were taken.
///
/// At most one building is started per month, chosen by fixed priority.
/// Buying food, lifting morale and both recruitment steps are checked
/// afterwards, one after another, each against the gold that is left.
pub fn decide_ai(input: &Province, context: &AiContext) -> AiOutcome {
    let mut province = input.clone();
    let mut actions = Vec::new();

    if province.free_building_slots() > 0 {
        if let Some(building) = choose_building(&province, context) {
            province.construct(building);
            actions.push(AiAction::Built(building));
        }
    }

    if province.food < province.food_cap * FOOD_LOW_RATIO && province.gold >= FOOD_PURCHASE_COST {
        province.gold -= FOOD_PURCHASE_COST;
        province.food += FOOD_PURCHASE_AMOUNT;
        actions.push(AiAction::BoughtFood);
    }

    if province.morale < MORALE_LOW && province.gold >= MORALE_BOOST_COST {
        province.gold -= MORALE_BOOST_COST;
        province.morale += MORALE_BOOST;
        actions.push(AiAction::RaisedMorale);
    }

    if province.troops < context.troop_threshold() && province.gold >= TROOP_RECRUIT_COST {
        let gain = province.troop_recruit_gain();
        province.gold -= TROOP_RECRUIT_COST;
        province.troops += gain;
        actions.push(AiAction::RecruitedTroops(gain));
    }

    if province.workers < WORKER_LOW && province.gold >= WORKER_RECRUIT_COST {
        province.gold -= WORKER_RECRUIT_COST;
        province.workers += WORKER_RECRUIT_GAIN;
        actions.push(AiAction::RecruitedWorkers(WORKER_RECRUIT_GAIN));
    }

    for action in &actions {
        log::debug!("KI {} (Monat {}): {}", province.name, context.month(), action);
    }

    AiOutcome { province, actions }
}

fn choose_building(province: &Province, context: &AiContext) -> Option<Building> {
    let gold = province.gold;
    if !province.buildings.contains(&Building::Kornspeicher)
        && gold >= Building::Kornspeicher.gold_cost()
        && province.food > province.food_cap * GRANARY_FILL_RATIO
    {
        Some(Building::Kornspeicher)
    } else if !province.has_market && gold >= Building::Markt.gold_cost() {
        Some(Building::Markt)
    } else if !province.has_barracks
        && gold >= Building::Kaserne.gold_cost()
        && province.troops < BARRACKS_TROOP_LIMIT
    {
        Some(Building::Kaserne)
    } else if province.temples < 1
        && gold >= Building::Tempel.gold_cost()
        && province.morale < TEMPLE_MORALE_LIMIT
    {
        Some(Building::Tempel)
    } else if !province.has_fort
        && gold >= Building::Fort.gold_cost()
        && (context.late_game() || province.troops > FORT_TROOP_THRESHOLD)
    {
        Some(Building::Fort)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn province(json: &str) -> Province {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_granary_when_near_cap_and_enough_gold() {
        let input = province(
            r#"{ "food": 210, "foodCap": 250, "gold": 100, "buildings": [], "buildingSlots": 3,
                 "morale": 80, "troops": 300, "workers": 100 }"#,
        );
        let out = apply_ai(&input, &AiContext::new(5, 24));
        assert_eq!(out.food_cap, 350.0);
        assert_eq!(out.gold, 20.0);
        assert!(out.buildings.contains(&Building::Kornspeicher));
        assert_eq!(out.buildings.len(), 1);
    }

    #[test]
    fn buys_food_when_low() {
        let input = province(r#"{ "food": 10, "foodCap": 200, "gold": 20, "buildings": [], "buildingSlots": 3 }"#);
        let outcome = decide_ai(&input, &AiContext::new(3, 24));
        assert_eq!(outcome.province.food, 30.0);
        assert_eq!(outcome.province.gold, 5.0);
        assert_eq!(outcome.actions, vec![AiAction::BoughtFood]);
    }

    #[test]
    fn recruits_troops_below_threshold() {
        let input = province(r#"{ "troops": 120, "gold": 15, "hasBarracks": false, "morale": 80, "buildingSlots": 0 }"#);
        let context = AiContext::new(8, 24);
        assert_eq!(context.troop_threshold(), 154);
        let out = apply_ai(&input, &context);
        assert_eq!(out.troops, 130);
        assert_eq!(out.gold, 5.0);
        assert_eq!(out.workers, 0);
    }

    #[test]
    fn barracks_increase_recruit_gain() {
        let input = province(r#"{ "troops": 100, "gold": 10, "hasBarracks": true, "morale": 80 }"#);
        let out = apply_ai(&input, &AiContext::default());
        assert_eq!(out.troops, 115);
    }

    #[test]
    fn market_comes_before_barracks() {
        let input = province(r#"{ "food": 10, "foodCap": 300, "gold": 130, "buildingSlots": 3, "morale": 80, "troops": 100, "workers": 60 }"#);
        let outcome = decide_ai(&input, &AiContext::new(2, 24));
        assert_eq!(outcome.actions[0], AiAction::Built(Building::Markt));
        assert!(outcome.province.has_market);
        assert!(!outcome.province.has_barracks);
    }

    #[test]
    fn fort_waits_for_late_game_or_large_army() {
        let input = province(
            r#"{ "food": 100, "foodCap": 300, "gold": 200, "buildingSlots": 5, "morale": 80,
                 "troops": 180, "workers": 60, "hasMarket": true, "hasBarracks": true, "temples": 1,
                 "buildings": ["Kornspeicher", "Markt", "Kaserne", "Tempel"] }"#,
        );
        let early = decide_ai(&input, &AiContext::new(12, 24));
        assert!(!early.province.has_fort);
        let late = decide_ai(&input, &AiContext::new(13, 24));
        assert!(late.province.has_fort);
        assert_eq!(late.province.buildings.last(), Some(&Building::Fort));
    }

    #[test]
    fn temple_requires_low_morale() {
        let base = r#"{ "gold": 150, "buildingSlots": 3, "troops": 250, "workers": 60,
                        "hasMarket": true, "hasBarracks": true, "foodCap": 100, "food": 50, "morale": MORALE }"#;
        let content = apply_ai(&province(&base.replace("MORALE", "80")), &AiContext::new(2, 24));
        assert_eq!(content.temples, 0);
        let unhappy = apply_ai(&province(&base.replace("MORALE", "60")), &AiContext::new(2, 24));
        assert_eq!(unhappy.temples, 1);
        assert_eq!(unhappy.gold, 10.0);
    }

    #[test]
    fn full_slots_block_construction() {
        let input = province(r#"{ "gold": 500, "buildingSlots": 1, "buildings": ["Fort"], "hasFort": true, "morale": 80, "troops": 300, "workers": 60 }"#);
        let outcome = decide_ai(&input, &AiContext::new(2, 24));
        assert_eq!(outcome.province.buildings.len(), 1);
        assert!(!outcome.province.has_market);
    }

    #[test]
    fn missing_context_uses_defaults() {
        let context: AiContext = serde_json::from_str("{}").unwrap();
        assert_eq!(context.month(), 1);
        assert_eq!(context.max_months(), 24);
        assert_eq!(context.troop_threshold(), 150);
    }

    #[test]
    fn low_morale_is_bought_back() {
        let input = province(r#"{ "morale": 30, "gold": 10, "troops": 200 }"#);
        let out = apply_ai(&input, &AiContext::new(1, 24));
        assert_eq!(out.morale, 35);
        assert_eq!(out.gold, 0.0);
    }

    #[test]
    fn input_is_left_untouched() {
        let input = province(r#"{ "food": 210, "foodCap": 250, "gold": 100, "buildingSlots": 3 }"#);
        let copy = input.clone();
        let out = apply_ai(&input, &AiContext::new(5, 24));
        assert_eq!(input, copy);
        assert_ne!(out, input);
    }

    fn arb_province() -> impl Strategy<Value = Province> {
        (
            (0..400i64, 0..400i64, 0..400i64, 0..400i64, 0..120i64),
            (0..=100i32, 0..5usize, any::<bool>(), any::<bool>(), any::<bool>(), 0..2u32),
        )
            .prop_map(
                |((food, gold, cap, troops, workers), (morale, slots, market, barracks, fort, temples))| {
                    Province {
                        food: food as f64,
                        gold: gold as f64,
                        food_cap: cap as f64,
                        troops,
                        workers,
                        morale,
                        building_slots: slots,
                        has_market: market,
                        has_barracks: barracks,
                        has_fort: fort,
                        temples,
                        ..Province::default()
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn prop_at_most_one_building_and_flags_stick(
            province in arb_province(),
            month in 1..30u32,
        ) {
            let out = apply_ai(&province, &AiContext::new(month, 24));
            prop_assert!(out.buildings.len() <= province.buildings.len() + 1);
            prop_assert!(!province.has_market || out.has_market);
            prop_assert!(!province.has_barracks || out.has_barracks);
            prop_assert!(!province.has_fort || out.has_fort);
            prop_assert!(out.temples >= province.temples);
            prop_assert!(out.gold >= 0.0);
        }
    }
}
