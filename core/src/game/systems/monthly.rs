use crate::game::ai::{AiContext, decide_ai};
use crate::game::bootstrap::{Controller, ProvinceEntry};
use crate::game::economy::{ResourceDeltas, apply_monthly_economy};

/// Resolves upkeep and production for every province in roster order.
pub(crate) fn resolve_economy(roster: &mut [ProvinceEntry]) -> Vec<String> {
    let mut reports = Vec::with_capacity(roster.len());
    for entry in roster.iter_mut() {
        let resolution = apply_monthly_economy(&entry.province);
        reports.push(format!(
            "{}: {}",
            resolution.province.name,
            describe_deltas(&resolution.deltas)
        ));
        entry.province = resolution.province;
    }
    reports
}

/// Lets every AI-controlled province take its monthly decisions.
pub(crate) fn run_ai(roster: &mut [ProvinceEntry], context: &AiContext) -> Vec<String> {
    let mut reports = Vec::new();
    for entry in roster
        .iter_mut()
        .filter(|entry| entry.controller == Controller::Ai)
    {
        let outcome = decide_ai(&entry.province, context);
        if outcome.actions.is_empty() {
            reports.push(format!("{} wartet ab.", outcome.province.name));
        } else {
            let actions: Vec<String> = outcome.actions.iter().map(ToString::to_string).collect();
            reports.push(format!("{} {}.", outcome.province.name, actions.join(", ")));
        }
        entry.province = outcome.province;
    }
    reports
}

fn describe_deltas(deltas: &ResourceDeltas) -> String {
    format!(
        "Nahrung {:+}, Gold {:+}, Moral {:+}, Truppen {:+}",
        deltas.food, deltas.gold, deltas.morale, deltas.troops
    )
}
