mod game;
mod season;
mod time;

pub use game::{
    AiAction, AiContext, AiOutcome, BuildOption, Building, Controller, EventCard, EventDeck,
    EventEffect, EventOption, GameBuilder, GameState, Headquarters, HqBuilding, Intel, Loadout,
    MetaProfile, MonthlyResolution, PROFILE_VERSION, Production, Province, ProvinceEntry, Rating,
    Realm, RealmStart, Recruitment, Resource, ResourceDeltas, RunStart, ScoreEntry, ScoreSummary,
    SlotType, Snapshot, TERRAFORM_STAGES, TerraformStage, TurnBudget, UNLOCK_CATALOG,
    UPGRADE_CATALOG, UnlockNode, UpgradeCard, Upkeep, apply_ai, apply_meta_bonuses,
    apply_monthly_economy, card_slot_type, clamp, compute_all_scores, compute_harvest_factor,
    compute_production, compute_province_score, compute_rewards, compute_tax_factor,
    compute_upkeep, decide_ai, default_province_definitions, label_to_html, max_slots,
    parse_province_definitions, rate_total, score_option_label, scoreboard, slot_types_for_level,
    terraform_label, terraform_stage,
};
pub use season::{DEFAULT_BANNER_PATH, Season, season_image, season_image_for_date};
pub use time::{CalendarDate, days_in_month};
