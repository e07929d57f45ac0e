mod commands;

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, anyhow};
use crown_crisis_core::{
    Controller, GameState, MetaProfile, ScoreSummary, compute_rewards, label_to_html,
    scoreboard,
};

use commands::{CommandRegistry, Context};

pub fn run(game: &mut GameState, profile: Option<&MetaProfile>) -> Result<()> {
    print_intro(game);
    let registry = CommandRegistry::default();
    let stdin = io::stdin();

    loop {
        print!("Monat {}/{}> ", game.month().min(game.max_months()), game.max_months());
        io::stdout()
            .flush()
            .context("Eingabeaufforderung konnte nicht geschrieben werden")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("Eingabe konnte nicht gelesen werden")?;

        if bytes == 0 {
            println!("Eingabe beendet. Auf Wiedersehen!");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let was_finished = game.is_finished();
        let mut ctx = Context::new(game);
        if let Err(error) = registry.execute_input(&mut ctx, trimmed) {
            println!("Fehler: {error}");
        }
        if !was_finished && game.is_finished() {
            print_final(game, profile);
        }
    }
}

fn print_intro(game: &GameState) {
    println!("Crown & Crisis – Die letzte Dynastie");
    println!(
        "Du regierst {} gegen {} Vasallen. In {} Monaten entscheidet sich alles.",
        game.player().name,
        game.provinces().len() - 1,
        game.max_months()
    );
    println!("Befehle: overview / event / choose 1 / build / recruit troops / next");
    println!("help zeigt alle Befehle.");
    print_event(game);
}

pub(crate) fn print_help() {
    println!("Verfügbare Befehle:");
    println!("  overview | ov            Übersicht aller Provinzen");
    println!("  inspect | show <Prov>    Details einer Provinz (Nummer, Schlüssel oder Name)");
    println!("  event                    Aktuelles Ereignis mit Bewertung der Optionen");
    println!("  choose <n>               Option n wählen und den Monat abschließen");
    println!("  build [Gebäude]          Bauoptionen zeigen oder ein Gebäude errichten");
    println!("  recruit troops|workers   Truppen oder Arbeiter anwerben");
    println!("  next | end               Monat abschließen (offenes Ereignis: schlechteste Option)");
    println!("  tick <Tage>              Kalender um Tage vorrücken");
    println!("  score                    Aktueller WarScore und Bewertung");
    println!("  save <Datei>             Spielstand als JSON speichern");
    println!("  load <Datei>             Spielstand laden");
    println!("  quit | exit              Beenden");
}

pub(crate) fn print_overview(game: &GameState) {
    let date = game.calendar_date();
    println!(
        "{} ({}, {}% des Monats) – Banner: {}",
        date,
        game.season(),
        date.day_progress(),
        game.banner_image(None)
    );
    println!(
        "ID | {:<12} | {:<7} | {:>7} | {:>9} | {:>6} | {:>7} | {:>5} | {:>8}",
        "Provinz", "Lenker", "Nahrung", "Kapazität", "Gold", "Truppen", "Moral", "Arbeiter"
    );
    for (idx, entry) in game.provinces().iter().enumerate() {
        let province = &entry.province;
        println!(
            "{:>2} | {:<12} | {:<7} | {:>7.0} | {:>9.0} | {:>6.0} | {:>7} | {:>5} | {:>8}",
            idx + 1,
            province.name,
            controller_label(entry.controller),
            province.food,
            province.food_cap,
            province.gold,
            province.troops,
            province.morale,
            province.workers
        );
    }
}

pub(crate) fn print_province_details(game: &GameState, idx: usize) -> Result<()> {
    let province = game.province(idx)?;
    println!("-- {} --", province.name);
    println!("Nahrung: {:.0} / {:.0}", province.food, province.food_cap);
    println!("Gold: {:.0}", province.gold);
    println!("Truppen: {}", province.troops);
    println!("Arbeiter: {}", province.workers);
    println!("Moral: {}", province.morale);
    println!(
        "Grundertrag: {:.0} Nahrung, {:.0} Gold",
        province.base_f, province.base_g
    );
    let buildings: Vec<String> = province.buildings.iter().map(ToString::to_string).collect();
    println!(
        "Gebäude ({}/{}): {}",
        province.buildings.len(),
        province.building_slots,
        if buildings.is_empty() {
            "keine".to_string()
        } else {
            buildings.join(", ")
        }
    );
    Ok(())
}

pub(crate) fn print_event(game: &GameState) {
    let Some(card) = game.pending_event() else {
        if game.is_finished() {
            println!("Das Spiel ist beendet.");
        } else {
            println!("Kein Ereignis in diesem Monat.");
        }
        return;
    };
    println!("== {} ==", card.title);
    println!("{}", card.description);
    for (idx, option) in card.options.iter().enumerate() {
        println!("  {}) {} [Wertung {:+.1}]", idx + 1, option.label, option.score());
        log::trace!("HTML: {}", label_to_html(&option.label));
    }
}

pub(crate) fn print_build_options(game: &GameState) {
    if let Some(reason) = game.build_blocker() {
        println!("{reason}");
    } else {
        println!("Du kannst einmal pro Monat ein Gebäude errichten.");
    }
    let workers = game.turn_budget().available_workers(game.player());
    println!("Verfügbare Arbeiter: {workers}");
    for option in game.build_options() {
        let building = option.building;
        let marker = if option.can_build() { "+" } else { "-" };
        println!(
            "  [{marker}] {} – {} (Kosten: {} Gold, {} Arbeiter)",
            building,
            building.description(),
            building.gold_cost(),
            building.required_workers()
        );
    }
}

pub(crate) fn print_reports(header: &str, reports: &[String]) {
    println!("--- {header} ---");
    for report in reports {
        println!("- {report}");
    }
    println!("------------------------------");
}

pub(crate) fn print_scores(summary: &ScoreSummary) {
    println!("{}", scoreboard(summary));
}

fn print_final(game: &GameState, profile: Option<&MetaProfile>) {
    println!("Die zwei Jahre sind vorüber!");
    let Some(summary) = game.final_summary() else {
        return;
    };
    print_scores(summary);
    if let Some(profile) = profile {
        let base = compute_rewards(summary.total_score as f64, None);
        let bonus = base * u64::from(profile.seals_bonus_percent()) / 100;
        println!("Erhaltene Siegel: {} (Bonus {})", base + bonus, bonus);
    }
}

pub(crate) fn resolve_province_index(game: &GameState, token: &str) -> Result<usize> {
    game.find_province_index(token).ok_or_else(|| {
        anyhow!(
            "Provinz nicht gefunden: {} (Nummer, Schlüssel oder vollständigen Namen angeben)",
            token
        )
    })
}

fn controller_label(controller: Controller) -> &'static str {
    match controller {
        Controller::Player => "Spieler",
        Controller::Ai => "KI",
    }
}
