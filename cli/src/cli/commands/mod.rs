use std::collections::HashMap;
use std::fs;
use std::process;

use anyhow::{Context as _, Result, anyhow, bail};
use crown_crisis_core::{Building, GameState, Recruitment, Snapshot};

use super::{
    print_build_options, print_event, print_help, print_overview, print_province_details,
    print_reports, print_scores, resolve_province_index,
};

pub struct Context<'a> {
    game: &'a mut GameState,
}

impl<'a> Context<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &GameState {
        &*self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut *self.game
    }
}

pub struct Args<'a> {
    tokens: Vec<&'a str>,
    index: usize,
}

impl<'a> Args<'a> {
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        let value = self.tokens.get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }

    pub fn next_required(&mut self, message: &str) -> Result<&'a str> {
        self.next().ok_or_else(|| anyhow!(message.to_owned()))
    }

    /// Everything not consumed yet, joined by single spaces.
    pub fn rest(&mut self) -> Option<String> {
        if self.index >= self.tokens.len() {
            return None;
        }
        let rest = self.tokens[self.index..].join(" ");
        self.index = self.tokens.len();
        Some(rest)
    }
}

pub trait Command {
    fn name() -> &'static str;
    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()>;
}

type CommandFn = for<'a> fn(&mut Context<'a>, Args<'a>) -> Result<()>;

pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command>(&mut self) {
        let name = C::name();
        if self.handlers.insert(name, C::execute).is_some() {
            panic!("Befehl doppelt registriert: {name}");
        }
    }

    pub fn dispatch<'a>(&self, command: &str, ctx: &mut Context<'a>, args: Args<'a>) -> Result<()> {
        if let Some(handler) = self.handlers.get(command) {
            handler(ctx, args)
        } else {
            bail!("Unbekannter Befehl: {command}. help zeigt alle Befehle.");
        }
    }

    pub fn execute_input<'a>(&self, ctx: &mut Context<'a>, input: &'a str) -> Result<()> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(anyhow!("Kein Befehl angegeben."));
        };
        let command_name = head.to_lowercase();
        let args = Args::new(parts.collect());
        self.dispatch(command_name.as_str(), ctx, args)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register::<HelpCommand>();
        registry.register::<HelpAliasCommand>();
        registry.register::<OverviewCommand>();
        registry.register::<OverviewAliasCommand>();
        registry.register::<InspectCommand>();
        registry.register::<ShowCommand>();
        registry.register::<EventCommand>();
        registry.register::<ChooseCommand>();
        registry.register::<BuildCommand>();
        registry.register::<RecruitCommand>();
        registry.register::<NextCommand>();
        registry.register::<EndCommand>();
        registry.register::<TickCommand>();
        registry.register::<ScoreCommand>();
        registry.register::<SaveCommand>();
        registry.register::<LoadCommand>();
        registry.register::<QuitCommand>();
        registry.register::<ExitCommand>();
        registry
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name() -> &'static str {
        "help"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_help();
        Ok(())
    }
}

pub struct HelpAliasCommand;

impl Command for HelpAliasCommand {
    fn name() -> &'static str {
        "?"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        HelpCommand::execute(ctx, args)
    }
}

pub struct OverviewCommand;

impl Command for OverviewCommand {
    fn name() -> &'static str {
        "overview"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_overview(ctx.game());
        Ok(())
    }
}

pub struct OverviewAliasCommand;

impl Command for OverviewAliasCommand {
    fn name() -> &'static str {
        "ov"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        OverviewCommand::execute(ctx, args)
    }
}

pub struct InspectCommand;

impl Command for InspectCommand {
    fn name() -> &'static str {
        "inspect"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args
            .rest()
            .ok_or_else(|| anyhow!("Bitte eine Provinz angeben."))?;
        let idx = resolve_province_index(ctx.game(), &token)?;
        print_province_details(ctx.game(), idx)
    }
}

pub struct ShowCommand;

impl Command for ShowCommand {
    fn name() -> &'static str {
        "show"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        InspectCommand::execute(ctx, args)
    }
}

pub struct EventCommand;

impl Command for EventCommand {
    fn name() -> &'static str {
        "event"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_event(ctx.game());
        Ok(())
    }
}

pub struct ChooseCommand;

impl Command for ChooseCommand {
    fn name() -> &'static str {
        "choose"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("Bitte die Nummer der Option angeben.")?;
        let choice: usize = token
            .parse()
            .map_err(|_| anyhow!("Die Option muss eine Zahl sein."))?;
        if choice == 0 {
            bail!("Optionen beginnen bei 1.");
        }
        let closing_month = ctx.game().month();
        let reports = ctx.game_mut().choose_event_option(choice - 1)?;
        print_reports(&format!("Monat {closing_month}"), &reports);
        print_event(ctx.game());
        Ok(())
    }
}

pub struct BuildCommand;

impl Command for BuildCommand {
    fn name() -> &'static str {
        "build"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let Some(token) = args.next() else {
            print_build_options(ctx.game());
            return Ok(());
        };
        let building = Building::from_name(token).ok_or_else(|| {
            anyhow!("Unbekanntes Gebäude: {token}. Möglich: Kornspeicher, Markt, Kaserne, Tempel, Fort")
        })?;
        let report = ctx.game_mut().build(building)?;
        println!("{report}");
        Ok(())
    }
}

pub struct RecruitCommand;

impl Command for RecruitCommand {
    fn name() -> &'static str {
        "recruit"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let Some(token) = args.next() else {
            let player = ctx.game().player();
            println!("  troops:  {}", Recruitment::Troops.label(player));
            println!("  workers: {}", Recruitment::Workers.label(player));
            return Ok(());
        };
        let kind: Recruitment = token.parse()?;
        let report = ctx.game_mut().recruit(kind)?;
        println!("{report}");
        Ok(())
    }
}

pub struct NextCommand;

impl Command for NextCommand {
    fn name() -> &'static str {
        "next"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let closing_month = ctx.game().month();
        let reports = ctx.game_mut().advance_month()?;
        print_reports(&format!("Monat {closing_month}"), &reports);
        print_event(ctx.game());
        Ok(())
    }
}

pub struct EndCommand;

impl Command for EndCommand {
    fn name() -> &'static str {
        "end"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        NextCommand::execute(ctx, args)
    }
}

pub struct TickCommand;

impl Command for TickCommand {
    fn name() -> &'static str {
        "tick"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("Bitte die Anzahl der Tage angeben.")?;
        let days: u64 = token
            .parse()
            .map_err(|_| anyhow!("Die Anzahl der Tage muss eine ganze Zahl sein."))?;
        let month_before = ctx.game().month();
        let reports = ctx.game_mut().tick_days(days)?;
        let date = ctx.game().calendar_date();
        if reports.is_empty() {
            println!("{} Tage vergangen. Heute ist der {}.", days, date);
        } else {
            print_reports(&format!("{} Tage ab Monat {}", days, month_before), &reports);
            print_event(ctx.game());
        }
        Ok(())
    }
}

pub struct ScoreCommand;

impl Command for ScoreCommand {
    fn name() -> &'static str {
        "score"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let summary = match ctx.game().final_summary() {
            Some(summary) => summary.clone(),
            None => ctx.game().current_scores(),
        };
        print_scores(&summary);
        Ok(())
    }
}

pub struct SaveCommand;

impl Command for SaveCommand {
    fn name() -> &'static str {
        "save"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let path = args.next_required("Bitte einen Dateinamen angeben.")?;
        let snapshot = ctx.game().snapshot()?;
        let body = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, body)
            .with_context(|| format!("Spielstand konnte nicht geschrieben werden: {path}"))?;
        println!("Spielstand gespeichert: {path}");
        Ok(())
    }
}

pub struct LoadCommand;

impl Command for LoadCommand {
    fn name() -> &'static str {
        "load"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let path = args.next_required("Bitte einen Dateinamen angeben.")?;
        let body = fs::read_to_string(path)
            .with_context(|| format!("Spielstand konnte nicht gelesen werden: {path}"))?;
        let snapshot: Snapshot = serde_json::from_str(&body)
            .with_context(|| format!("Spielstand ist kein gültiges JSON: {path}"))?;
        ctx.game_mut().restore(&snapshot)?;
        println!("Spielstand geladen: Monat {}", ctx.game().month());
        print_event(ctx.game());
        Ok(())
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        println!("Auf Wiedersehen!");
        process::exit(0);
    }
}

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        QuitCommand::execute(ctx, args)
    }
}
