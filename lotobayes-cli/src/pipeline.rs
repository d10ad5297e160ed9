use thiserror::Error;

use lotobayes_data::models::{
    DrawRecord, FrequencyTable, NumberProbability, PatternHistogram, PosteriorDistribution,
};
use lotobayes_data::parser::{read_draws, ParseReport};
use lotobayes_data::registry::{GameConfig, GameRegistry};
use lotobayes_data::source::DrawSource;

use crate::analysis::pattern::pattern_histogram;
use crate::analysis::posterior::posterior_distribution;
use crate::analysis::{count_frequencies, discard_out_of_range, top_k};
use crate::config::{AnalysisConfig, OutOfRangePolicy};
use crate::schedule::StopSignal;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("loterie non supportée : {0}")]
    UnsupportedGame(String),
    #[error("données indisponibles pour {game} : {reason}")]
    DataUnavailable { game: String, reason: String },
    #[error("aucun tirage exploitable pour {game}")]
    EmptyDataset { game: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Fetching,
    Aggregating,
    Estimating,
    Scoring,
}

/// Everything produced for one game in one cycle.
#[derive(Debug, Clone)]
pub struct GameAnalysis {
    pub game: GameConfig,
    pub draws: usize,
    pub ignored_lines: u32,
    pub rejected_lines: u32,
    pub overflowed_runs: u32,
    pub out_of_range: u64,
    pub frequencies: FrequencyTable,
    pub posterior: PosteriorDistribution,
    pub pattern: PatternHistogram,
    pub recommended: Vec<NumberProbability>,
}

fn enter(game: &GameConfig, stage: Stage) {
    log::debug!("{} : {:?}", game.id, stage);
}

/// Aggregation, estimation and scoring of an already parsed history.
pub fn analyze_records(
    game: &GameConfig,
    report: &ParseReport,
    config: &AnalysisConfig,
) -> GameAnalysis {
    let history = report.records.as_slice();
    enter(game, Stage::Aggregating);
    let mut frequencies = count_frequencies(history);
    let out_of_range = frequencies.out_of_range_total(game.max_number);
    if out_of_range > 0 {
        log::debug!(
            "{} : {} numéro(s) hors de 1-{} ({:?})",
            game.id,
            out_of_range,
            game.max_number,
            config.out_of_range
        );
    }

    let cleaned;
    let history = match config.out_of_range {
        OutOfRangePolicy::IncludeInSmoothing => history,
        OutOfRangePolicy::Discard => {
            cleaned = discard_out_of_range(history, game.max_number);
            frequencies = count_frequencies(&cleaned);
            cleaned.as_slice()
        }
    };

    enter(game, Stage::Estimating);
    let posterior = posterior_distribution(&frequencies, game.max_number, config.alpha);

    enter(game, Stage::Scoring);
    let pattern = pattern_histogram(history, config.max_iter);

    let recommended = top_k(&posterior, config.top_k);

    GameAnalysis {
        game: game.clone(),
        draws: history.len(),
        ignored_lines: report.ignored,
        rejected_lines: report.rejected,
        overflowed_runs: report.overflowed,
        out_of_range,
        frequencies,
        posterior,
        pattern,
        recommended,
    }
}

/// Fetches, parses and analyses one game. Any fetch or read failure ends in
/// `DataUnavailable`, an empty parse in `EmptyDataset`.
pub fn analyze_game(
    source: &dyn DrawSource,
    game: &GameConfig,
    config: &AnalysisConfig,
) -> Result<GameAnalysis, PipelineError> {
    enter(game, Stage::Fetching);
    let path = source
        .fetch(game)
        .map_err(|e| PipelineError::DataUnavailable {
            game: game.id.clone(),
            reason: e.to_string(),
        })?;

    let report = read_draws(&path, config.parse_mode, game.max_number).map_err(|e| {
        PipelineError::DataUnavailable {
            game: game.id.clone(),
            reason: format!("lecture de {} : {}", path.display(), e),
        }
    })?;
    log::info!(
        "{} : {} tirages lus, {} lignes ignorées, {} rejetées, {} nombres trop grands",
        game.id,
        report.records.len(),
        report.ignored,
        report.rejected,
        report.overflowed
    );

    if report.records.is_empty() {
        return Err(PipelineError::EmptyDataset {
            game: game.id.clone(),
        });
    }

    Ok(analyze_records(game, &report, config))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub analyzed: Vec<String>,
    pub no_data: Vec<String>,
    pub unsupported: Vec<String>,
    /// Stop requested before every game was visited.
    pub interrupted: bool,
}

/// Analyses each requested game in turn (every registered game when
/// `selection` is empty) and hands each result to `present` before moving on.
/// Failures stay local to their game.
pub fn run_cycle(
    registry: &GameRegistry,
    selection: &[String],
    source: &dyn DrawSource,
    config: &AnalysisConfig,
    stop: &StopSignal,
    mut present: impl FnMut(&GameAnalysis),
) -> CycleReport {
    let ids: Vec<String> = if selection.is_empty() {
        registry.ids().map(str::to_string).collect()
    } else {
        selection.to_vec()
    };

    let mut report = CycleReport::default();
    for id in ids {
        if stop.is_stopped() {
            report.interrupted = true;
            break;
        }

        let result = registry
            .get(&id)
            .map_err(|_| PipelineError::UnsupportedGame(id.clone()))
            .and_then(|game| analyze_game(source, game, config));

        match result {
            Ok(analysis) => {
                present(&analysis);
                report.analyzed.push(id);
            }
            Err(e @ PipelineError::UnsupportedGame(_)) => {
                log::error!("{e}");
                report.unsupported.push(id);
            }
            Err(e) => {
                log::warn!("{e}");
                report.no_data.push(id);
            }
        }
    }
    report
}
