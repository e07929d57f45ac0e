mod ai;
mod bootstrap;
mod constants;
pub(crate) use constants::*;
mod economy;
mod event_cards;
mod math;
mod meta;
mod province;
mod score;
mod state;
pub(crate) mod systems;
mod text;

pub use ai::{AiAction, AiContext, AiOutcome, apply_ai, decide_ai};
pub use bootstrap::{
    Controller, GameBuilder, ProvinceEntry, default_province_definitions,
    parse_province_definitions,
};
pub use economy::{
    MonthlyResolution, Production, ResourceDeltas, Upkeep, apply_monthly_economy,
    compute_production, compute_upkeep,
};
pub use event_cards::{EventCard, EventDeck, EventEffect, EventOption};
pub use math::{clamp, compute_harvest_factor, compute_tax_factor};
pub use meta::{
    Headquarters, HqBuilding, Intel, Loadout, MetaProfile, PROFILE_VERSION, Realm, RealmStart,
    RunStart, SlotType, TERRAFORM_STAGES, TerraformStage, UNLOCK_CATALOG, UPGRADE_CATALOG,
    UnlockNode, UpgradeCard, apply_meta_bonuses, card_slot_type, compute_rewards, max_slots,
    slot_types_for_level, terraform_label, terraform_stage,
};
pub use province::{Building, Province, Resource};
pub use score::{
    Rating, ScoreEntry, ScoreSummary, compute_all_scores, compute_province_score, rate_total,
    scoreboard,
};
pub use state::{GameState, Snapshot};
pub use systems::construction::{BuildOption, Recruitment, TurnBudget};
pub use text::{label_to_html, score_option_label};
