use anyhow::Result;

use crate::game::event_cards::EventCard;
use crate::game::province::Province;

/// Applies option `index` of `card` to `province`.
pub(crate) fn resolve_option(
    card: &EventCard,
    index: usize,
    province: &mut Province,
) -> Result<String> {
    let option = card.option(index)?;
    option.apply(province);
    log::info!("Ereignis \"{}\": {}", card.title, option.label);
    Ok(format!(
        "{}: {} wählt \"{}\".",
        card.title, province.name, option.label
    ))
}

/// Resolves an unanswered card with its worst option.
pub(crate) fn auto_resolve(card: &EventCard, province: &mut Province) -> Result<String> {
    let index = card.worst_option();
    let report = resolve_option(card, index, province)?;
    Ok(format!("Keine Entscheidung getroffen. {}", report))
}
