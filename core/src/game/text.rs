use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::province::Resource;

const INACTION_PENALTY: f64 = 5.0;

static GAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\+([0-9]+)\s*(Nahrung|Gold|Moral|Truppen|Arbeiter)")
        .expect("gain pattern is valid")
});

static LOSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[\-\x{2010}-\x{2015}\x{2212}\x{2011}\x{2013}]\x{00A0}?([0-9]+)\s*(Nahrung|Gold|Moral|Truppen|Arbeiter)",
    )
    .expect("loss pattern is valid")
});

static INACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Ignorieren|Nichts tun|vertuschen|kein handel")
        .expect("inaction pattern is valid")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([\-\x{2010}-\x{2015}\x{2212}\x{2011}\x{2013}]?\s*\+?\s*[0-9]+)\s*(Nahrung|Gold|Moral|Truppen|Arbeiter)",
    )
    .expect("amount pattern is valid")
});

/// Weight of one unit of a resource when ranking options.
///
/// The lookup uses the text exactly as written, so `GOLD` or `moral` fall
/// back to weight 1.
fn unit_weight(unit: &str) -> f64 {
    match unit {
        "Nahrung" => 1.0,
        "Gold" => 0.5,
        "Moral" => 2.0,
        "Truppen" => 1.0,
        "Arbeiter" => 0.5,
        _ => 1.0,
    }
}

fn weighted_sum(pattern: &Regex, label: &str) -> f64 {
    pattern
        .captures_iter(label)
        .map(|caps| {
            let value: f64 = caps[1].parse().unwrap_or(0.0);
            value * unit_weight(&caps[2])
        })
        .sum()
}

/// Rough desirability of an option label; lower means worse.
///
/// Gains count positively and losses negatively, both weighted by resource.
/// Options that sound like doing nothing or covering something up lose a
/// further 5 points.
pub fn score_option_label(label: &str) -> f64 {
    if label.is_empty() {
        return 0.0;
    }
    let mut score = weighted_sum(&GAIN, label) - weighted_sum(&LOSS, label);
    if INACTION.is_match(label) {
        score -= INACTION_PENALTY;
    }
    score
}

/// Replaces every `±N Resource` mention with the number and an icon span.
pub fn label_to_html(label: &str) -> String {
    if label.is_empty() {
        return String::new();
    }
    AMOUNT
        .replace_all(label, |caps: &Captures| {
            let unit = normalize_unit(&caps[2]);
            match Resource::from_label(&unit) {
                Some(resource) => format!(
                    "{}\u{00A0}<span class=\"icon {}\" aria-hidden=\"true\"></span>",
                    &caps[1],
                    resource.icon_class()
                ),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn normalize_unit(unit: &str) -> String {
    let mut chars = unit.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
