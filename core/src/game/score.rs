use std::fmt;

use serde::{Deserialize, Serialize};

use super::math::round_half_up;
use super::province::Province;

const MORALE_WEIGHT: f64 = 2.0;
const FOOD_WEIGHT: f64 = 0.5;
const FORT_BONUS: f64 = 150.0;
const TEMPLE_BONUS: f64 = 20.0;
const MARKET_BONUS: f64 = 10.0;

const TRIUMPHANT_ABOVE: i64 = 2500;
const PROMISING_ABOVE: i64 = 1500;

/// War score of a single province, rounded half up.
pub fn compute_province_score(province: &Province) -> i64 {
    let mut score = province.troops as f64
        + f64::from(province.morale) * MORALE_WEIGHT
        + province.food * FOOD_WEIGHT;
    if province.has_fort {
        score += FORT_BONUS;
    }
    score += f64::from(province.temples) * TEMPLE_BONUS;
    if province.has_market {
        score += MARKET_BONUS;
    }
    round_half_up(score) as i64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub results: Vec<ScoreEntry>,
    pub total_score: i64,
}

/// Scores every province in iteration order and sums the results.
pub fn compute_all_scores<'a>(provinces: impl IntoIterator<Item = &'a Province>) -> ScoreSummary {
    let results: Vec<ScoreEntry> = provinces
        .into_iter()
        .map(|province| ScoreEntry {
            name: province.name.clone(),
            score: compute_province_score(province),
        })
        .collect();
    let total_score = results.iter().map(|entry| entry.score).sum();
    ScoreSummary {
        results,
        total_score,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Triumphant,
    Promising,
    Weak,
}

impl Rating {
    /// Thresholds are exclusive: exactly 2500 is still `Promising`.
    pub fn from_total(total: i64) -> Self {
        if total > TRIUMPHANT_ABOVE {
            Rating::Triumphant
        } else if total > PROMISING_ABOVE {
            Rating::Promising
        } else {
            Rating::Weak
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rating::Triumphant => "Großartig! Euer Reich ist stark genug für den finalen Kampf.",
            Rating::Promising => "Nicht schlecht. Mit etwas Geschick könntet ihr bestehen.",
            Rating::Weak => {
                "Das Reich ist schwach und könnte der bevorstehenden Invasion nicht standhalten."
            }
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub fn rate_total(total: i64) -> &'static str {
    Rating::from_total(total).message()
}

/// End-of-game summary, one line per province followed by the total and rating.
pub fn scoreboard(summary: &ScoreSummary) -> String {
    let mut lines = Vec::with_capacity(summary.results.len() + 3);
    lines.push("Endbilanz – WarScore aller Provinzen:".to_string());
    for entry in &summary.results {
        lines.push(format!("{}: {}", entry.name, entry.score));
    }
    lines.push(format!("Gesamt-Score: {}", summary.total_score));
    lines.push(rate_total(summary.total_score).to_string());
    lines.join("\n")
}
