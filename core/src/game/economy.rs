use serde::{Deserialize, Serialize};

use super::math::{compute_harvest_factor, compute_tax_factor, round_half_up};
use super::province::Province;
use super::{
    DEFICIT_MORALE_PENALTY, DESERTERS_PER_STEP, FOOD_PER_DESERTION, MARKET_GOLD_BONUS, MAX_MORALE,
    MIN_MORALE, TEMPLE_MORALE_BONUS, TROOP_UNIT_FOOD, TROOP_UNIT_GOLD, UNPAID_TROOP_LOSS,
    UPKEEP_UNIT_SIZE, WORKER_UNIT_FOOD, WORKER_UNIT_GOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Upkeep {
    pub food: f64,
    pub gold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Production {
    pub food: f64,
    pub gold: f64,
}

/// Change caused by applying production, clamping and rounding; upkeep and
/// deficit penalties happen earlier and are not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceDeltas {
    pub food: f64,
    pub gold: f64,
    pub morale: i32,
    pub troops: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyResolution {
    #[serde(rename = "prov")]
    pub province: Province,
    pub deltas: ResourceDeltas,
    pub upkeep: Upkeep,
    pub production: Production,
}

/// Every started block of 100 troops or workers costs one unit of upkeep.
pub fn compute_upkeep(province: &Province) -> Upkeep {
    let troop_units = (province.troops as f64 / UPKEEP_UNIT_SIZE).ceil();
    let worker_units = (province.workers as f64 / UPKEEP_UNIT_SIZE).ceil();
    Upkeep {
        food: troop_units * TROOP_UNIT_FOOD + worker_units * WORKER_UNIT_FOOD,
        gold: troop_units * TROOP_UNIT_GOLD + worker_units * WORKER_UNIT_GOLD,
    }
}

pub fn compute_production(province: &Province) -> Production {
    let morale = f64::from(province.morale);
    let food = province.base_f * compute_harvest_factor(morale);
    let mut gold = province.base_g * compute_tax_factor(morale);
    if province.has_market {
        gold += MARKET_GOLD_BONUS;
    }
    Production { food, gold }
}

/// Resolves one month for a single province without touching the input.
///
/// Order: upkeep, food deficit, gold deficit, temple morale, production,
/// then clamping and rounding. Temple morale is added before the morale
/// clamp, so it can push this month's factors to their maximum.
pub fn apply_monthly_economy(input: &Province) -> MonthlyResolution {
    let mut province = input.clone();

    let upkeep = compute_upkeep(&province);
    province.food -= upkeep.food;
    province.gold -= upkeep.gold;

    if province.food < 0.0 {
        let deficit = -province.food;
        let deserters = (deficit / FOOD_PER_DESERTION).floor() as i64 * DESERTERS_PER_STEP;
        province.troops = (province.troops - deserters).max(0);
        province.morale -= DEFICIT_MORALE_PENALTY;
        province.food = 0.0;
        log::debug!(
            "{}: Nahrungsmangel {:.0}, {} Deserteure",
            province.name,
            deficit,
            deserters
        );
    }
    if province.gold < 0.0 {
        province.gold = 0.0;
        province.morale -= DEFICIT_MORALE_PENALTY;
        if province.troops > 0 {
            province.troops = (province.troops - UNPAID_TROOP_LOSS).max(0);
        }
        log::debug!("{}: Sold kann nicht gezahlt werden", province.name);
    }

    if province.temples > 0 {
        province.morale += TEMPLE_MORALE_BONUS * province.temples as i32;
    }

    let production = compute_production(&province);
    let before = (province.food, province.gold, province.morale, province.troops);

    let food_cap = if province.food_cap == 0.0 {
        f64::INFINITY
    } else {
        province.food_cap
    };
    province.food = (province.food + production.food).min(food_cap);
    province.gold += production.gold;
    province.morale = province.morale.clamp(MIN_MORALE, MAX_MORALE);
    province.food = round_half_up(province.food);
    province.gold = round_half_up(province.gold);

    let deltas = ResourceDeltas {
        food: province.food - before.0,
        gold: province.gold - before.1,
        morale: province.morale - before.2,
        troops: province.troops - before.3,
    };

    log::trace!(
        "{}: Unterhalt {:?}, Produktion {:?}, Änderung {:?}",
        province.name,
        upkeep,
        production,
        deltas
    );

    MonthlyResolution {
        province,
        deltas,
        upkeep,
        production,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base_province() -> Province {
        serde_json::from_str(
            r#"{
                "name": "Test",
                "food": 100,
                "gold": 100,
                "troops": 180,
                "morale": 60,
                "foodCap": 300,
                "baseF": 80,
                "baseG": 60,
                "workers": 50,
                "hasMarket": false,
                "hasBarracks": false,
                "temples": 0,
                "hasFort": false
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn upkeep_accounts_for_troops_and_workers() {
        let upkeep = compute_upkeep(&base_province());
        assert_eq!(upkeep.food, 16.0);
        assert_eq!(upkeep.gold, 22.0);
    }

    #[test]
    fn upkeep_is_zero_without_population() {
        let upkeep = compute_upkeep(&Province::default());
        assert_eq!(upkeep, Upkeep::default());
    }

    #[test]
    fn market_adds_flat_gold() {
        let without = compute_production(&base_province());
        let with = compute_production(&Province {
            has_market: true,
            ..base_province()
        });
        assert!(without.gold > 0.0);
        assert!((with.gold - without.gold - 10.0).abs() < 1e-9);
    }

    #[test]
    fn typical_month_increases_resources() {
        let resolution = apply_monthly_economy(&base_province());
        let province = &resolution.province;
        assert_eq!(province.food, 170.0);
        assert_eq!(province.gold, 142.0);
        assert_eq!(resolution.deltas.food, 86.0);
        assert_eq!(resolution.deltas.gold, 64.0);
        assert_eq!(resolution.deltas.morale, 0);
        assert_eq!(resolution.deltas.troops, 0);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = base_province();
        let copy = input.clone();
        let _ = apply_monthly_economy(&input);
        assert_eq!(input, copy);
    }

    #[test]
    fn food_deficit_causes_deserters_and_morale_drop() {
        let input = Province {
            food: 1.0,
            troops: 200,
            ..base_province()
        };
        let province = apply_monthly_economy(&input).province;
        assert!(province.morale < input.morale);
        assert!(province.troops < input.troops);
        assert_eq!(province.troops, 170);
        assert!(province.food >= 0.0);
    }

    #[test]
    fn both_deficits_stack_their_penalties() {
        let input = Province {
            name: "Leer".into(),
            troops: 300,
            morale: 50,
            ..Province::default()
        };
        let province = apply_monthly_economy(&input).province;
        assert_eq!(province.troops, 300 - 45 - 10);
        assert_eq!(province.morale, 40);
        assert_eq!(province.food, 0.0);
        assert_eq!(province.gold, 0.0);
    }

    #[test]
    fn temples_raise_morale_and_clamp() {
        let input = Province {
            temples: 1,
            morale: 98,
            ..base_province()
        };
        let resolution = apply_monthly_economy(&input);
        assert_eq!(resolution.province.morale, 100);
        assert_eq!(resolution.deltas.morale, -1);
        let expected_food = (84.0 + 80.0 * 1.4_f64).min(300.0).round();
        assert_eq!(resolution.province.food, expected_food);
    }

    #[test]
    fn stored_food_above_cap_is_cut_back() {
        let input = Province {
            food: 400.0,
            food_cap: 300.0,
            base_f: 10.0,
            morale: 50,
            ..Province::default()
        };
        let resolution = apply_monthly_economy(&input);
        assert_eq!(resolution.province.food, 300.0);
        assert_eq!(resolution.deltas.food, -100.0);
    }

    #[test]
    fn zero_food_cap_means_uncapped() {
        let input = Province {
            food: 100.0,
            base_f: 50.0,
            morale: 50,
            ..Province::default()
        };
        assert_eq!(apply_monthly_economy(&input).province.food, 150.0);
    }

    #[test]
    fn resolution_serializes_with_prov_key() {
        let value = serde_json::to_value(apply_monthly_economy(&base_province())).unwrap();
        assert!(value.get("prov").is_some());
        assert_eq!(value["upkeep"]["food"], serde_json::json!(16.0));
    }

    fn arb_province() -> impl Strategy<Value = Province> {
        (
            (0..600i64, 0..600i64, 0..700i64, 0..800i64, 0..300i64),
            (0..=100i32, 0..150i64, 0..150i64, 0..3u32, any::<bool>()),
        )
            .prop_map(
                |((food, gold, cap, troops, workers), (morale, base_f, base_g, temples, market))| {
                    Province {
                        name: "Prop".into(),
                        food: food as f64,
                        gold: gold as f64,
                        food_cap: cap as f64,
                        troops,
                        workers,
                        morale,
                        base_f: base_f as f64,
                        base_g: base_g as f64,
                        temples,
                        has_market: market,
                        building_slots: 3,
                        ..Province::default()
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn prop_resolution_keeps_bounds(province in arb_province()) {
            let out = apply_monthly_economy(&province).province;
            prop_assert!((0..=100).contains(&out.morale));
            prop_assert!(out.food >= 0.0);
            prop_assert!(out.gold >= 0.0);
            prop_assert!(out.troops >= 0);
            if province.food_cap > 0.0 {
                prop_assert!(out.food <= province.food_cap);
            }
        }

        #[test]
        fn prop_output_is_valid_input(province in arb_province(), months in 1..24usize) {
            let mut current = province;
            for _ in 0..months {
                current = apply_monthly_economy(&current).province;
                prop_assert!((0..=100).contains(&current.morale));
                prop_assert!(current.food >= 0.0 && current.gold >= 0.0);
                prop_assert_eq!(current.food, current.food.round());
                prop_assert_eq!(current.gold, current.gold.round());
            }
        }
    }
}
