use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BARRACKS_RECRUIT_GAIN, MAX_MORALE, MIN_MORALE, TROOP_RECRUIT_GAIN};

/// Snapshot of one governed territory.
///
/// Missing fields deserialize to zero/`false`/empty, so partial snapshots are
/// valid input for every resolver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Province {
    pub name: String,
    pub food: f64,
    pub gold: f64,
    /// Caps food after production is added. `0` means uncapped.
    pub food_cap: f64,
    pub troops: i64,
    pub workers: i64,
    pub morale: i32,
    pub base_f: f64,
    pub base_g: f64,
    pub buildings: Vec<Building>,
    pub building_slots: usize,
    pub has_market: bool,
    pub has_barracks: bool,
    pub has_fort: bool,
    pub temples: u32,
}

impl Province {
    pub fn free_building_slots(&self) -> usize {
        self.building_slots.saturating_sub(self.buildings.len())
    }

    pub fn has_building(&self, building: Building) -> bool {
        match building {
            Building::Kornspeicher => self.buildings.contains(&Building::Kornspeicher),
            Building::Markt => self.has_market,
            Building::Kaserne => self.has_barracks,
            Building::Tempel => self.temples >= 1,
            Building::Fort => self.has_fort,
        }
    }

    pub fn troop_recruit_gain(&self) -> i64 {
        if self.has_barracks {
            BARRACKS_RECRUIT_GAIN
        } else {
            TROOP_RECRUIT_GAIN
        }
    }

    /// Pays for `building`, applies its effect and records it.
    pub(crate) fn construct(&mut self, building: Building) {
        self.gold -= building.gold_cost();
        match building {
            Building::Kornspeicher => self.food_cap += 100.0,
            Building::Markt => self.has_market = true,
            Building::Kaserne => self.has_barracks = true,
            Building::Tempel => self.temples += 1,
            Building::Fort => self.has_fort = true,
        }
        self.buildings.push(building);
    }

    pub fn amount_of(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Food => self.food,
            Resource::Gold => self.gold,
            Resource::Morale => f64::from(self.morale),
            Resource::Troops => self.troops as f64,
            Resource::Workers => self.workers as f64,
        }
    }

    /// Adds `amount`; losses floor at zero and morale gains stop at 100.
    pub(crate) fn adjust(&mut self, resource: Resource, amount: f64) {
        match resource {
            Resource::Food => self.food = floor_or_add(self.food, amount),
            Resource::Gold => self.gold = floor_or_add(self.gold, amount),
            Resource::Morale => {
                let delta = amount.round() as i32;
                self.morale = if delta < 0 {
                    (self.morale + delta).max(MIN_MORALE)
                } else {
                    (self.morale + delta).min(MAX_MORALE)
                };
            }
            Resource::Troops => {
                self.troops = floor_or_add(self.troops as f64, amount).round() as i64;
            }
            Resource::Workers => {
                self.workers = floor_or_add(self.workers as f64, amount).round() as i64;
            }
        }
    }
}

fn floor_or_add(current: f64, amount: f64) -> f64 {
    if amount < 0.0 {
        (current + amount).max(0.0)
    } else {
        current + amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Building {
    Kornspeicher,
    Markt,
    Kaserne,
    Tempel,
    Fort,
}

impl Building {
    pub const ALL: [Building; 5] = [
        Building::Kornspeicher,
        Building::Markt,
        Building::Kaserne,
        Building::Tempel,
        Building::Fort,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Building::Kornspeicher => "Kornspeicher",
            Building::Markt => "Markt",
            Building::Kaserne => "Kaserne",
            Building::Tempel => "Tempel",
            Building::Fort => "Fort",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Building::Kornspeicher => "+100 Nahrungskapazität",
            Building::Markt => "+10 Gold pro Monat",
            Building::Kaserne => "Rekrutierungen bringen +50 % Truppen",
            Building::Tempel => "+3 Moral pro Monat",
            Building::Fort => "WarScore‑Bonus im Finale",
        }
    }

    pub fn gold_cost(self) -> f64 {
        match self {
            Building::Kornspeicher => 80.0,
            Building::Markt => 100.0,
            Building::Kaserne => 120.0,
            Building::Tempel => 140.0,
            Building::Fort => 160.0,
        }
    }

    pub fn required_workers(self) -> i64 {
        match self {
            Building::Kaserne => 60,
            Building::Fort => 100,
            _ => 50,
        }
    }

    /// Case-insensitive lookup by German name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|building| building.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Food,
    Gold,
    Morale,
    Troops,
    Workers,
}

impl Resource {
    /// German label used in option texts.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Food => "Nahrung",
            Resource::Gold => "Gold",
            Resource::Morale => "Moral",
            Resource::Troops => "Truppen",
            Resource::Workers => "Arbeiter",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Nahrung" => Some(Resource::Food),
            "Gold" => Some(Resource::Gold),
            "Moral" => Some(Resource::Morale),
            "Truppen" => Some(Resource::Troops),
            "Arbeiter" => Some(Resource::Workers),
            _ => None,
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            Resource::Food => "icon-food",
            Resource::Gold => "icon-gold",
            Resource::Morale => "icon-morale",
            Resource::Troops => "icon-troops",
            Resource::Workers => "icon-workers",
        }
    }
}
