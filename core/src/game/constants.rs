pub(crate) const MIN_MORALE: i32 = 0;
pub(crate) const MAX_MORALE: i32 = 100;
pub(crate) const NEUTRAL_MORALE: f64 = 50.0;
pub(crate) const HARVEST_MORALE_SWING: f64 = 0.4;
pub(crate) const TAX_MORALE_SWING: f64 = 0.3;

pub(crate) const UPKEEP_UNIT_SIZE: f64 = 100.0;
pub(crate) const TROOP_UNIT_FOOD: f64 = 6.0;
pub(crate) const TROOP_UNIT_GOLD: f64 = 8.0;
pub(crate) const WORKER_UNIT_FOOD: f64 = 4.0;
pub(crate) const WORKER_UNIT_GOLD: f64 = 6.0;
pub(crate) const FOOD_PER_DESERTION: f64 = 6.0;
pub(crate) const DESERTERS_PER_STEP: i64 = 15;
pub(crate) const DEFICIT_MORALE_PENALTY: i32 = 5;
pub(crate) const UNPAID_TROOP_LOSS: i64 = 10;
pub(crate) const TEMPLE_MORALE_BONUS: i32 = 3;
pub(crate) const MARKET_GOLD_BONUS: f64 = 10.0;

pub(crate) const DEFAULT_MONTH: u32 = 1;
pub(crate) const DEFAULT_MAX_MONTHS: u32 = 24;

pub(crate) const TROOP_RECRUIT_COST: f64 = 10.0;
pub(crate) const TROOP_RECRUIT_GAIN: i64 = 10;
pub(crate) const BARRACKS_RECRUIT_GAIN: i64 = 15;
pub(crate) const WORKER_RECRUIT_COST: f64 = 20.0;
pub(crate) const WORKER_RECRUIT_GAIN: i64 = 50;
