use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use lotobayes_data::parser::{read_draws, ParseMode};
use lotobayes_data::registry::{GameConfig, GameRegistry};
use lotobayes_data::source::{DrawSource, HttpSource, LocalSource};

use lotobayes_cli::config::AnalysisConfig;
use lotobayes_cli::display::{display_analysis, display_cycle_summary, display_games};
use lotobayes_cli::pipeline::{analyze_records, run_cycle};
use lotobayes_cli::schedule::{interval_from_hours, Scheduler, StopSignal};

#[derive(Parser)]
#[command(name = "lotobayes", about = "Estimation bayésienne des numéros de loterie")]
struct Cli {
    /// Fichier JSON de paramètres d'analyse
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fichier JSON du registre des loteries
    #[arg(long, global = true)]
    games: Option<PathBuf>,

    /// Analyse stricte des colonnes (rejette les lignes invalides)
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Loteries à analyser (toutes par défaut)
    #[arg(short = 'g', long = "game")]
    selection: Vec<String>,

    /// Répertoire des fichiers CSV téléchargés
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Utiliser uniquement les fichiers déjà présents
    #[arg(long)]
    offline: bool,

    /// Délai maximal de téléchargement (secondes)
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Lancer un cycle de prédictions
    Run {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Répéter les cycles à intervalle fixe
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        /// Intervalle entre deux cycles (heures)
        #[arg(short, long, default_value = "24")]
        interval_hours: f64,

        /// Nombre maximal de cycles
        #[arg(long)]
        cycles: Option<u32>,
    },

    /// Analyser un fichier CSV local
    Analyze {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Plus grand numéro du jeu
        #[arg(short, long)]
        max: u32,
    },

    /// Lister les loteries supportées
    Games,

    /// Écrire les paramètres d'analyse courants dans un fichier
    Config {
        #[arg(short, long, default_value = "lotobayes.json")]
        save: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if cli.strict {
        config.parse_mode = ParseMode::Strict;
    }
    let registry = match &cli.games {
        Some(path) => GameRegistry::load(path)?,
        None => GameRegistry::default(),
    };

    match cli.command {
        Command::Run { source } => cmd_run(&registry, &config, &source),
        Command::Watch {
            source,
            interval_hours,
            cycles,
        } => cmd_watch(&registry, &config, &source, interval_hours, cycles),
        Command::Analyze { file, max } => cmd_analyze(&config, &file, max),
        Command::Games => {
            display_games(&registry);
            Ok(())
        }
        Command::Config { save } => {
            config.save(&save)?;
            println!("Paramètres sauvegardés dans {}", save.display());
            Ok(())
        }
    }
}

fn build_source(args: &SourceArgs) -> Box<dyn DrawSource> {
    if args.offline {
        Box::new(LocalSource::new(args.data_dir.clone()))
    } else {
        Box::new(HttpSource::new(args.data_dir.clone()).with_timeout(Duration::from_secs(args.timeout)))
    }
}

fn cmd_run(registry: &GameRegistry, config: &AnalysisConfig, args: &SourceArgs) -> Result<()> {
    let source = build_source(args);
    println!("\n*** Début du cycle de prédictions ***");
    let report = run_cycle(
        registry,
        &args.selection,
        source.as_ref(),
        config,
        &StopSignal::new(),
        |analysis| display_analysis(analysis, config.display_top),
    );
    display_cycle_summary(&report);
    Ok(())
}

fn cmd_watch(
    registry: &GameRegistry,
    config: &AnalysisConfig,
    args: &SourceArgs,
    interval_hours: f64,
    cycles: Option<u32>,
) -> Result<()> {
    let interval = interval_from_hours(interval_hours)
        .with_context(|| format!("Intervalle invalide : {interval_hours} heures"))?;
    let source = build_source(args);
    let stop = StopSignal::new();

    let done = Scheduler::new(interval)
        .with_max_cycles(cycles)
        .run(&stop, |i| {
            println!("\n*** Début du cycle de prédictions n°{i} ***");
            let report = run_cycle(
                registry,
                &args.selection,
                source.as_ref(),
                config,
                &stop,
                |analysis| display_analysis(analysis, config.display_top),
            );
            display_cycle_summary(&report);
            if cycles.map_or(true, |max| i < max) {
                println!("\nAttente de {interval_hours} heures avant le prochain cycle...");
            }
        });
    log::info!("{done} cycle(s) exécuté(s)");
    Ok(())
}

fn cmd_analyze(config: &AnalysisConfig, file: &Path, max: u32) -> Result<()> {
    if max == 0 {
        bail!("Le plus grand numéro doit être ≥ 1");
    }
    let report = read_draws(file, config.parse_mode, max)
        .with_context(|| format!("Impossible de lire {}", file.display()))?;
    if report.records.is_empty() {
        println!("Aucun tirage exploitable dans {}", file.display());
        return Ok(());
    }

    let id = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "local".to_string());
    let analysis = analyze_records(&GameConfig::new(&id, max), &report, config);
    display_analysis(&analysis, config.display_top);
    Ok(())
}
