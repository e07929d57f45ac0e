use std::collections::HashSet;

use anyhow::{Context, Result, ensure};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_MAX_MONTHS, event_cards::EventDeck, meta::RunStart, province::Province,
    state::GameState,
};

const BUILTIN_PROVINCES: &str = include_str!("../../../config/provinces.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Player,
    Ai,
}

/// One roster slot: a stable key, who governs it and the province itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceEntry {
    pub key: String,
    pub controller: Controller,
    pub province: Province,
}

/// The player's realm and the two vassals of the standard campaign.
pub fn default_province_definitions() -> Result<Vec<ProvinceEntry>> {
    parse_province_definitions(BUILTIN_PROVINCES)
        .context("eingebettete Provinzdefinitionen sind ungültig")
}

pub fn parse_province_definitions(body: &str) -> Result<Vec<ProvinceEntry>> {
    let entries: Vec<ProvinceEntry> =
        serde_json::from_str(body).context("Provinzdefinitionen konnten nicht gelesen werden")?;
    Ok(entries)
}

pub struct GameBuilder {
    definitions: Vec<ProvinceEntry>,
    rng: StdRng,
    max_months: u32,
    deck: Option<EventDeck>,
    run_start: Option<RunStart>,
}

impl GameBuilder {
    pub fn new(definitions: Vec<ProvinceEntry>) -> Self {
        Self {
            definitions,
            rng: StdRng::from_entropy(),
            max_months: DEFAULT_MAX_MONTHS,
            deck: None,
            run_start: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }

    pub fn with_event_deck(mut self, deck: EventDeck) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Applies the run-start package to the player's province when built.
    pub fn with_run_start(mut self, run_start: RunStart) -> Self {
        self.run_start = Some(run_start);
        self
    }

    pub fn build(self) -> Result<GameState> {
        let bootstrap = self.into_bootstrap()?;
        Ok(GameState::new(bootstrap))
    }

    pub(crate) fn into_bootstrap(self) -> Result<GameBootstrap> {
        self.validate_definitions()?;
        let GameBuilder {
            mut definitions,
            rng,
            max_months,
            deck,
            run_start,
        } = self;

        if let Some(run_start) = run_start {
            for entry in definitions
                .iter_mut()
                .filter(|entry| entry.controller == Controller::Player)
            {
                entry.province = run_start.apply_to(&entry.province);
            }
        }

        let deck = match deck {
            Some(deck) => deck,
            None => EventDeck::builtin()?,
        };

        Ok(GameBootstrap {
            rng,
            roster: definitions,
            max_months,
            deck,
        })
    }

    fn validate_definitions(&self) -> Result<()> {
        ensure!(
            !self.definitions.is_empty(),
            "Es ist keine Provinz definiert. Mindestens eine Provinz wird benötigt."
        );
        let players = self
            .definitions
            .iter()
            .filter(|entry| entry.controller == Controller::Player)
            .count();
        ensure!(
            players == 1,
            "Genau eine Provinz muss vom Spieler regiert werden, gefunden: {}",
            players
        );
        let mut keys = HashSet::new();
        for entry in &self.definitions {
            ensure!(
                keys.insert(entry.key.as_str()),
                "Provinzschlüssel '{}' ist doppelt vergeben",
                entry.key
            );
        }
        ensure!(
            self.max_months >= 1,
            "Die Spieldauer muss mindestens einen Monat betragen"
        );
        Ok(())
    }
}

pub(crate) struct GameBootstrap {
    pub(crate) rng: StdRng,
    pub(crate) roster: Vec<ProvinceEntry>,
    pub(crate) max_months: u32,
    pub(crate) deck: EventDeck,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::meta::MetaProfile;

    #[test]
    fn builtin_roster_has_player_and_two_vassals() {
        let roster = default_province_definitions().unwrap();
        let keys: Vec<&str> = roster.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["player", "ai1", "ai2"]);
        assert_eq!(roster[0].controller, Controller::Player);
        assert_eq!(roster[0].province.name, "Dein Land");
        assert_eq!(roster[0].province.food_cap, 300.0);
        assert_eq!(roster[2].province.troops, 160);
    }

    #[test]
    fn rejects_missing_player() {
        let mut roster = default_province_definitions().unwrap();
        roster[0].controller = Controller::Ai;
        assert!(GameBuilder::new(roster).build().is_err());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut roster = default_province_definitions().unwrap();
        roster[2].key = "ai1".into();
        let err = GameBuilder::new(roster).build().err().unwrap();
        assert!(err.to_string().contains("doppelt"));
    }

    #[test]
    fn rejects_empty_roster_and_zero_months() {
        assert!(GameBuilder::new(Vec::new()).build().is_err());
        let roster = default_province_definitions().unwrap();
        assert!(GameBuilder::new(roster).with_max_months(0).build().is_err());
    }

    #[test]
    fn run_start_only_touches_the_player() {
        let roster = default_province_definitions().unwrap();
        let profile = MetaProfile::migrate(&serde_json::json!({ "upgrades": ["granary-I"] }));
        let bootstrap = GameBuilder::new(roster)
            .with_run_start(profile.export_run_start())
            .into_bootstrap()
            .unwrap();
        assert_eq!(bootstrap.roster[0].province.food_cap, 350.0);
        assert_eq!(bootstrap.roster[1].province.food_cap, 250.0);
    }
}
