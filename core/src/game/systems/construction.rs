use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow, ensure};
use serde::{Deserialize, Serialize};

use crate::game::province::{Building, Province};
use crate::game::{TROOP_RECRUIT_COST, WORKER_RECRUIT_COST, WORKER_RECRUIT_GAIN};

/// What the player has already spent of this month's construction allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnBudget {
    pub building_used: bool,
    pub workers_used: i64,
}

impl TurnBudget {
    pub fn available_workers(&self, province: &Province) -> i64 {
        (province.workers - self.workers_used).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOption {
    pub building: Building,
    /// Not built yet and enough free workers this month.
    pub available: bool,
    pub affordable: bool,
}

impl BuildOption {
    pub fn can_build(&self) -> bool {
        self.available && self.affordable
    }
}

/// Reason why nothing at all can be built this month, if any.
pub(crate) fn build_blocker(province: &Province, budget: &TurnBudget) -> Option<&'static str> {
    if province.free_building_slots() == 0 {
        Some("Keine Bauslots mehr verfügbar.")
    } else if budget.building_used {
        Some("Du hast diesen Monat bereits gebaut.")
    } else {
        None
    }
}

pub(crate) fn build_options(province: &Province, budget: &TurnBudget) -> Vec<BuildOption> {
    let workers = budget.available_workers(province);
    Building::ALL
        .into_iter()
        .map(|building| BuildOption {
            building,
            available: !province.has_building(building) && workers >= building.required_workers(),
            affordable: province.gold >= building.gold_cost(),
        })
        .collect()
}

pub(crate) fn build(
    province: &mut Province,
    budget: &mut TurnBudget,
    building: Building,
) -> Result<String> {
    if let Some(reason) = build_blocker(province, budget) {
        return Err(anyhow!(reason));
    }
    ensure!(
        !province.has_building(building),
        "{} ist bereits errichtet.",
        building
    );
    let workers = budget.available_workers(province);
    ensure!(
        workers >= building.required_workers(),
        "{} benötigt {} freie Arbeiter, verfügbar sind {}.",
        building,
        building.required_workers(),
        workers
    );
    ensure!(
        province.gold >= building.gold_cost(),
        "{} kostet {} Gold, vorhanden sind {}.",
        building,
        building.gold_cost(),
        province.gold
    );

    province.construct(building);
    budget.building_used = true;
    budget.workers_used += building.required_workers();
    log::info!("{} errichtet {}", province.name, building);
    Ok(format!(
        "{} errichtet: {}.",
        building,
        building.description()
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recruitment {
    Troops,
    Workers,
}

impl Recruitment {
    pub fn cost(self) -> f64 {
        match self {
            Recruitment::Troops => TROOP_RECRUIT_COST,
            Recruitment::Workers => WORKER_RECRUIT_COST,
        }
    }

    pub fn gain(self, province: &Province) -> i64 {
        match self {
            Recruitment::Troops => province.troop_recruit_gain(),
            Recruitment::Workers => WORKER_RECRUIT_GAIN,
        }
    }

    /// Button text, e.g. `10 Gold → +15 Truppen` once barracks stand.
    pub fn label(self, province: &Province) -> String {
        let unit = match self {
            Recruitment::Troops => "Truppen",
            Recruitment::Workers => "Arbeiter",
        };
        format!("{} Gold → +{} {}", self.cost(), self.gain(province), unit)
    }
}

impl FromStr for Recruitment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "troops" | "truppen" => Ok(Recruitment::Troops),
            "workers" | "arbeiter" => Ok(Recruitment::Workers),
            other => Err(anyhow!(
                "Unbekannte Rekrutierung '{}'. troops oder workers angeben.",
                other
            )),
        }
    }
}

impl fmt::Display for Recruitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recruitment::Troops => f.write_str("troops"),
            Recruitment::Workers => f.write_str("workers"),
        }
    }
}

/// Recruitment has no monthly limit; only gold restricts it.
pub(crate) fn recruit(province: &mut Province, kind: Recruitment) -> Result<String> {
    let cost = kind.cost();
    ensure!(
        province.gold >= cost,
        "Nicht genug Gold: {} benötigt, {} vorhanden.",
        cost,
        province.gold
    );
    let gain = kind.gain(province);
    province.gold -= cost;
    match kind {
        Recruitment::Troops => province.troops += gain,
        Recruitment::Workers => province.workers += gain,
    }
    log::debug!("{} rekrutiert ({}): +{}", province.name, kind, gain);
    Ok(match kind {
        Recruitment::Troops => format!("{} neue Truppen rekrutiert.", gain),
        Recruitment::Workers => format!("{} neue Arbeiter angeworben.", gain),
    })
}
