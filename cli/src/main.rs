mod cli;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crown_crisis_core::{
    GameBuilder, MetaProfile, ProvinceEntry, default_province_definitions,
    parse_province_definitions,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "crown-crisis")]
#[command(about = "Crown & Crisis: drei Provinzen, zwei Jahre, eine Invasion")]
struct Args {
    /// Province roster (JSON). Defaults to config/provinces.json or the built-in roster
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of months before the final reckoning
    #[arg(short, long, default_value_t = 24)]
    months: u32,

    /// Seed for the event deck
    #[arg(long)]
    seed: Option<u64>,

    /// Meta profile (JSON) whose loadout applies to the player's province
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Log filter passed to env_logger
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let definitions = load_definitions(args.config.as_deref())?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut builder = GameBuilder::new(definitions)
        .with_rng(rng)
        .with_max_months(args.months);
    let profile = match &args.meta {
        Some(path) => {
            let profile = load_profile(path)?;
            builder = builder.with_run_start(profile.export_run_start());
            Some(profile)
        }
        None => None,
    };

    let mut game = builder
        .build()
        .context("Das Spiel konnte nicht gestartet werden")?;

    cli::run(&mut game, profile.as_ref())
}

fn load_definitions(explicit: Option<&Path>) -> Result<Vec<ProvinceEntry>> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => resolve_config_path()?,
    };
    let Some(path) = path else {
        log::info!("Keine Provinzdatei gefunden, verwende eingebaute Startaufstellung");
        return default_province_definitions();
    };

    let body = fs::read_to_string(&path)
        .with_context(|| format!("Provinzdatei kann nicht geöffnet werden: {}", path.display()))?;
    parse_province_definitions(&body)
        .with_context(|| format!("Provinzdatei ist ungültig: {}", path.display()))
}

fn resolve_config_path() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("Arbeitsverzeichnis nicht ermittelbar")?;
    let candidates = [
        cwd.join("config").join("provinces.json"),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join("provinces.json"),
    ];

    Ok(candidates.into_iter().find(|path| path.exists()))
}

fn load_profile(path: &Path) -> Result<MetaProfile> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Metaprofil kann nicht geöffnet werden: {}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&body)
        .with_context(|| format!("Metaprofil ist kein gültiges JSON: {}", path.display()))?;
    Ok(MetaProfile::migrate(&raw))
}
