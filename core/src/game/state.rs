use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, ensure};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ai::AiContext,
    bootstrap::{Controller, GameBootstrap, ProvinceEntry},
    event_cards::{EventCard, EventDeck},
    province::{Building, Province},
    score::{ScoreSummary, compute_all_scores},
    systems::{
        construction::{self, BuildOption, Recruitment, TurnBudget},
        events, monthly,
    },
};
use crate::CalendarDate;
use crate::season::{Season, season_image_for_date};

pub struct GameState {
    rng: StdRng,
    roster: Vec<ProvinceEntry>,
    player_idx: usize,
    month: u32,
    max_months: u32,
    calendar: CalendarDate,
    deck: EventDeck,
    pending_event: Option<EventCard>,
    budget: TurnBudget,
    final_summary: Option<ScoreSummary>,
}

/// Saved game: the month plus every province keyed by its roster key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub provinces: BTreeMap<String, Value>,
}

impl GameState {
    pub(crate) fn new(bootstrap: GameBootstrap) -> Self {
        let player_idx = bootstrap
            .roster
            .iter()
            .position(|entry| entry.controller == Controller::Player)
            .unwrap_or(0);
        let mut game = Self {
            rng: bootstrap.rng,
            roster: bootstrap.roster,
            player_idx,
            month: 1,
            max_months: bootstrap.max_months,
            calendar: CalendarDate::from_start(),
            deck: bootstrap.deck,
            pending_event: None,
            budget: TurnBudget::default(),
            final_summary: None,
        };
        game.start_month();
        game
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn max_months(&self) -> u32 {
        self.max_months
    }

    pub fn calendar_date(&self) -> CalendarDate {
        self.calendar
    }

    pub fn season(&self) -> Season {
        Season::from_month_index(self.calendar.month_index())
    }

    pub fn banner_image(&self, base_path: Option<&str>) -> String {
        season_image_for_date(&self.calendar, base_path)
    }

    pub fn is_finished(&self) -> bool {
        self.final_summary.is_some()
    }

    pub fn final_summary(&self) -> Option<&ScoreSummary> {
        self.final_summary.as_ref()
    }

    pub fn provinces(&self) -> &[ProvinceEntry] {
        &self.roster
    }

    pub fn province(&self, idx: usize) -> Result<&Province> {
        self.roster
            .get(idx)
            .map(|entry| &entry.province)
            .ok_or_else(|| anyhow!("Ungültige Provinznummer: {}", idx + 1))
    }

    pub fn player(&self) -> &Province {
        &self.roster[self.player_idx].province
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut Province {
        &mut self.roster[self.player_idx].province
    }

    /// Accepts a 1-based number, a roster key or a province name.
    pub fn find_province_index(&self, name_or_index: &str) -> Option<usize> {
        if let Ok(id) = name_or_index.parse::<usize>() {
            if id > 0 && id <= self.roster.len() {
                return Some(id - 1);
            }
        }

        let needle = name_or_index.to_lowercase();
        self.roster.iter().position(|entry| {
            entry.key.to_lowercase() == needle || entry.province.name.to_lowercase() == needle
        })
    }

    pub fn pending_event(&self) -> Option<&EventCard> {
        self.pending_event.as_ref()
    }

    pub fn turn_budget(&self) -> TurnBudget {
        self.budget
    }

    pub fn current_scores(&self) -> ScoreSummary {
        compute_all_scores(self.roster.iter().map(|entry| &entry.province))
    }

    pub fn build_blocker(&self) -> Option<&'static str> {
        construction::build_blocker(self.player(), &self.budget)
    }

    pub fn build_options(&self) -> Vec<BuildOption> {
        construction::build_options(self.player(), &self.budget)
    }

    pub fn build(&mut self, building: Building) -> Result<String> {
        self.ensure_running()?;
        let province = &mut self.roster[self.player_idx].province;
        construction::build(province, &mut self.budget, building)
    }

    pub fn recruit(&mut self, kind: Recruitment) -> Result<String> {
        self.ensure_running()?;
        construction::recruit(&mut self.roster[self.player_idx].province, kind)
    }

    /// Answers the pending event and closes the month.
    pub fn choose_event_option(&mut self, index: usize) -> Result<Vec<String>> {
        self.ensure_running()?;
        let card = self
            .pending_event
            .take()
            .ok_or_else(|| anyhow!("Derzeit steht keine Entscheidung an."))?;
        let province = &mut self.roster[self.player_idx].province;
        let report = match events::resolve_option(&card, index, province) {
            Ok(report) => report,
            Err(err) => {
                self.pending_event = Some(card);
                return Err(err);
            }
        };
        let mut reports = vec![report];
        reports.extend(self.advance_month()?);
        Ok(reports)
    }

    pub fn advance_month(&mut self) -> Result<Vec<String>> {
        self.ensure_running()?;
        let reports = self.roll_over_month()?;
        self.calendar.advance_to_next_month();
        Ok(reports)
    }

    /// Advances the calendar day by day; each new month closes the previous one.
    pub fn tick_days(&mut self, days: u64) -> Result<Vec<String>> {
        self.ensure_running()?;
        let mut reports = Vec::new();
        for _ in 0..days {
            let month_before = self.calendar.month();
            self.calendar.advance_days(1);
            if self.calendar.month() != month_before {
                reports.extend(self.roll_over_month()?);
                if self.is_finished() {
                    break;
                }
            }
        }
        Ok(reports)
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut provinces = BTreeMap::new();
        for entry in &self.roster {
            let value = serde_json::to_value(&entry.province)
                .with_context(|| format!("Provinz {} konnte nicht gespeichert werden", entry.key))?;
            provinces.insert(entry.key.clone(), value);
        }
        Ok(Snapshot {
            month: self.month,
            provinces,
        })
    }

    /// Loads a snapshot over the running game.
    ///
    /// Only keys already in the roster are restored, and only the fields a
    /// stored province carries replace the current ones. Unknown keys are
    /// skipped.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        let mut restored = self.roster.clone();
        for (key, stored) in &snapshot.provinces {
            let Some(entry) = restored.iter_mut().find(|entry| &entry.key == key) else {
                log::warn!("Unbekannte Provinz '{}' im Spielstand ignoriert", key);
                continue;
            };
            entry.province = merge_province(&entry.province, stored)
                .with_context(|| format!("Provinz '{}' im Spielstand ist ungültig", key))?;
        }
        self.roster = restored;

        self.month = snapshot.month.max(1);
        self.calendar = CalendarDate::from_start();
        self.calendar
            .advance_months(self.month.min(self.max_months.saturating_add(1)) - 1);
        self.final_summary = None;
        self.pending_event = None;
        if self.month > self.max_months {
            self.finish();
        } else {
            self.start_month();
        }
        log::info!("Spielstand geladen: Monat {}", self.month);
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        ensure!(
            !self.is_finished(),
            "Das Spiel ist beendet. Nur noch Anzeigebefehle sind möglich."
        );
        Ok(())
    }

    fn roll_over_month(&mut self) -> Result<Vec<String>> {
        let mut reports = Vec::new();

        if let Some(card) = self.pending_event.take() {
            let province = &mut self.roster[self.player_idx].province;
            reports.push(events::auto_resolve(&card, province)?);
        }

        reports.extend(monthly::resolve_economy(&mut self.roster));
        let context = AiContext::new(self.month, self.max_months);
        reports.extend(monthly::run_ai(&mut self.roster, &context));

        self.month += 1;
        if self.month > self.max_months {
            self.finish();
            reports.push("Die Zeit ist abgelaufen. Die Endbilanz steht fest.".to_string());
        } else {
            self.start_month();
            log::info!("Monat {} von {} beginnt", self.month, self.max_months);
        }
        Ok(reports)
    }

    fn start_month(&mut self) {
        self.budget = TurnBudget::default();
        self.pending_event = Some(self.deck.draw(&mut self.rng));
    }

    fn finish(&mut self) {
        let summary = self.current_scores();
        log::info!("Spielende, Gesamt-Score {}", summary.total_score);
        self.pending_event = None;
        self.final_summary = Some(summary);
    }
}

fn merge_province(current: &Province, stored: &Value) -> Result<Province> {
    let mut merged = serde_json::to_value(current)?;
    match (merged.as_object_mut(), stored.as_object()) {
        (Some(target), Some(fields)) => {
            for (field, value) in fields {
                target.insert(field.clone(), value.clone());
            }
        }
        _ => return Err(anyhow!("Provinzdaten müssen ein Objekt sein")),
    }
    Ok(serde_json::from_value(merged)?)
}
