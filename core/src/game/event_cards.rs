use anyhow::{Context, Result, anyhow, ensure};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::province::{Province, Resource};
use super::text::score_option_label;

const BUILTIN_DECK: DeckSource<'static> = DeckSource::Yaml(
    "events.yaml",
    include_str!("../../../config/events.yaml"),
);

#[derive(Debug, Clone, Copy)]
enum DeckSource<'a> {
    Yaml(&'a str, &'a str),
    Json(&'a str, &'a str),
}

impl DeckSource<'_> {
    fn parse(&self) -> Result<Vec<EventCard>> {
        match self {
            DeckSource::Yaml(name, body) => serde_yaml::from_str(body)
                .map_err(|err| anyhow!("YAML-Ereignisdeck {} ist ungültig: {}", name, err)),
            DeckSource::Json(name, body) => serde_json::from_str(body)
                .map_err(|err| anyhow!("JSON-Ereignisdeck {} ist ungültig: {}", name, err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    pub title: String,
    pub description: String,
    pub options: Vec<EventOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub label: String,
    #[serde(default)]
    pub effects: Vec<EventEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventEffect {
    Adjust {
        resource: Resource,
        amount: f64,
    },
    /// Trade `cost` of `pay` for `amount` of `receive`; without enough
    /// `pay` the province loses `shortfall_morale` instead.
    Exchange {
        pay: Resource,
        cost: f64,
        receive: Resource,
        amount: f64,
        #[serde(default)]
        shortfall_morale: i32,
    },
}

impl EventEffect {
    pub fn apply(&self, province: &mut Province) {
        match *self {
            EventEffect::Adjust { resource, amount } => province.adjust(resource, amount),
            EventEffect::Exchange {
                pay,
                cost,
                receive,
                amount,
                shortfall_morale,
            } => {
                if province.amount_of(pay) >= cost {
                    province.adjust(pay, -cost);
                    province.adjust(receive, amount);
                } else {
                    province.adjust(Resource::Morale, -f64::from(shortfall_morale));
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if let EventEffect::Exchange { cost, .. } = self {
            ensure!(*cost > 0.0, "Tauschkosten müssen positiv sein, erhalten: {}", cost);
        }
        Ok(())
    }
}

impl EventOption {
    pub fn apply(&self, province: &mut Province) {
        for effect in &self.effects {
            effect.apply(province);
        }
    }

    pub fn score(&self) -> f64 {
        score_option_label(&self.label)
    }
}

impl EventCard {
    /// Index of the lowest-scoring option; ties go to the earliest one.
    pub fn worst_option(&self) -> usize {
        let mut worst = 0;
        let mut worst_score = f64::INFINITY;
        for (idx, option) in self.options.iter().enumerate() {
            let score = option.score();
            if score < worst_score {
                worst = idx;
                worst_score = score;
            }
        }
        worst
    }

    pub fn option(&self, index: usize) -> Result<&EventOption> {
        self.options.get(index).ok_or_else(|| {
            anyhow!(
                "Option {} existiert nicht (\"{}\" hat {} Optionen)",
                index + 1,
                self.title,
                self.options.len()
            )
        })
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.options.is_empty(),
            "Ereignis \"{}\" hat keine Optionen",
            self.title
        );
        for option in &self.options {
            for effect in &option.effects {
                effect
                    .validate()
                    .with_context(|| format!("Ereignis \"{}\", Option \"{}\"", self.title, option.label))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDeck {
    cards: Vec<EventCard>,
}

impl EventDeck {
    pub fn new(cards: Vec<EventCard>) -> Result<Self> {
        ensure!(!cards.is_empty(), "Das Ereignisdeck ist leer");
        for card in &cards {
            card.validate()?;
        }
        Ok(Self { cards })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_DECK.parse()?)
    }

    pub fn from_yaml(name: &str, body: &str) -> Result<Self> {
        Self::new(DeckSource::Yaml(name, body).parse()?)
    }

    pub fn from_json(name: &str, body: &str) -> Result<Self> {
        Self::new(DeckSource::Json(name, body).parse()?)
    }

    pub fn cards(&self) -> &[EventCard] {
        &self.cards
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> EventCard {
        self.cards
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.cards[0].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn player() -> Province {
        serde_json::from_str(r#"{ "name": "Dein Land", "food": 10, "gold": 30, "morale": 98, "troops": 15 }"#)
            .unwrap()
    }

    #[test]
    fn builtin_deck_has_eight_cards() {
        let deck = EventDeck::builtin().unwrap();
        let titles: Vec<&str> = deck.cards().iter().map(|card| card.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Schlechte Ernte",
                "Banditenüberfall",
                "Reiche Karawane",
                "Krankheit",
                "Guter Jahrgang",
                "Dürre",
                "Großes Fest",
                "Verrat in den Reihen",
            ]
        );
    }

    #[test]
    fn adjust_floors_losses_and_caps_morale() {
        let deck = EventDeck::builtin().unwrap();
        let mut province = player();
        deck.cards()[0].options[0].apply(&mut province);
        assert_eq!(province.food, 0.0);
        assert_eq!(province.morale, 100);

        let mut province = player();
        deck.cards()[1].options[0].apply(&mut province);
        assert_eq!(province.troops, 0);
    }

    #[test]
    fn exchange_requires_enough_to_pay() {
        let deck = EventDeck::builtin().unwrap();
        let caravan = &deck.cards()[2];

        let mut province = player();
        caravan.options[1].apply(&mut province);
        assert_eq!(province.gold, 15.0);
        assert_eq!(province.food, 30.0);

        let mut province = player();
        caravan.options[0].apply(&mut province);
        assert_eq!(province.food, 10.0);
        assert_eq!(province.gold, 30.0);
        assert_eq!(province.morale, 93);
    }

    #[test]
    fn worst_option_picks_lowest_label_score() {
        let deck = EventDeck::builtin().unwrap();
        assert_eq!(deck.cards()[0].worst_option(), 2);
        assert_eq!(deck.cards()[2].worst_option(), 2);
        assert_eq!(deck.cards()[4].worst_option(), 1);
    }

    #[test]
    fn worst_option_ties_go_to_first() {
        let card = EventCard {
            title: "Gleichstand".into(),
            description: String::new(),
            options: vec![
                EventOption { label: "-5 Gold".into(), effects: vec![] },
                EventOption { label: "-5 Gold".into(), effects: vec![] },
            ],
        };
        assert_eq!(card.worst_option(), 0);
    }

    #[test]
    fn deck_rejects_cards_without_options() {
        let err = EventDeck::from_json(
            "leer.json",
            r#"[{ "title": "Leer", "description": "", "options": [] }]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("keine Optionen"));
    }

    #[test]
    fn deck_rejects_free_exchanges() {
        let result = EventDeck::from_yaml(
            "gratis.yaml",
            "- title: Gratis\n  description: x\n  options:\n    - label: y\n      effects:\n        - { kind: exchange, pay: gold, cost: 0, receive: food, amount: 5 }\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn option_lookup_reports_out_of_range() {
        let deck = EventDeck::builtin().unwrap();
        assert!(deck.cards()[3].option(1).is_ok());
        assert!(deck.cards()[3].option(2).is_err());
    }

    #[test]
    fn draw_is_deterministic_for_a_seed() {
        let deck = EventDeck::builtin().unwrap();
        let first = deck.draw(&mut StdRng::seed_from_u64(7));
        let second = deck.draw(&mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }
}
