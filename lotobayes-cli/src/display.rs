use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lotobayes_data::models::{NumberProbability, PatternHistogram};
use lotobayes_data::registry::GameRegistry;

use crate::pipeline::{CycleReport, GameAnalysis};

const BAR_WIDTH: f64 = 40.0;

fn bar(ratio: f64) -> String {
    let len = (ratio * BAR_WIDTH) as usize;
    "█".repeat(len)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Top `top` entries by descending value, bar scaled on the largest.
pub fn display_ranked(title: &str, entries: impl IntoIterator<Item = (u32, f64)>, top: usize) {
    println!("\n=== {title} ===");

    let mut sorted: Vec<(u32, f64)> = entries.into_iter().collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(top);

    let max = sorted.first().map(|&(_, v)| v).unwrap_or(0.0);
    let mut table = new_table(vec!["Numéro", "", "Probabilité"]);
    for (number, value) in &sorted {
        let ratio = if max > 0.0 { value / max } else { 0.0 };
        table.add_row(vec![
            Cell::new(format!("{:2}", number)),
            Cell::new(bar(ratio)).fg(Color::Cyan),
            Cell::new(format!("{:.4}", value)),
        ]);
    }
    println!("{table}");
}

/// Buckets in ascending iteration order, bar scaled on the share of the total.
pub fn display_pattern(histogram: &PatternHistogram) {
    println!("\n=== Motif de Mandelbrot simplifié ===");

    let total = histogram.total().max(1) as f64;
    let mut table = new_table(vec!["Itérations", "", "Paires"]);
    for (iterations, count) in histogram.iter() {
        let label = if iterations == histogram.max_iter() {
            format!("{:2} (borné)", iterations)
        } else {
            format!("{:2}", iterations)
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(bar(count as f64 / total)).fg(Color::Magenta),
            Cell::new(count.to_string()),
        ]);
    }
    println!("{table}");
}

pub fn display_recommendations(game: &str, recommended: &[NumberProbability]) {
    let numbers = recommended
        .iter()
        .map(|p| format!("{:2}", p.number))
        .collect::<Vec<_>>()
        .join(" - ");
    println!("\n🎲 Numéros recommandés pour {game} : {numbers}");
}

pub fn display_analysis(analysis: &GameAnalysis, top: usize) {
    let game = &analysis.game;
    println!("\n----- {} (1-{}) -----", game.id.to_uppercase(), game.max_number);
    println!(
        "{} tirages analysés, {} observations",
        analysis.draws,
        analysis.frequencies.total()
    );
    if analysis.rejected_lines > 0 {
        println!("  Lignes rejetées : {}", analysis.rejected_lines);
    }
    if analysis.overflowed_runs > 0 {
        println!("  Nombres trop grands ignorés : {}", analysis.overflowed_runs);
    }
    if analysis.out_of_range > 0 {
        println!("  Numéros hors plage : {}", analysis.out_of_range);
    }

    display_ranked(
        &format!("Probabilités bayésiennes pour {}", game.id),
        analysis.posterior.iter(),
        top,
    );
    display_pattern(&analysis.pattern);
    display_recommendations(&game.id, &analysis.recommended);
    println!("{}", "-".repeat(60));
}

pub fn display_games(registry: &GameRegistry) {
    let mut table = new_table(vec!["Loterie", "Plage", "Source"]);
    for game in &registry.games {
        table.add_row(vec![
            game.id.clone(),
            format!("1-{}", game.max_number),
            game.url.clone().unwrap_or_else(|| "—".to_string()),
        ]);
    }
    println!("{table}");
}

pub fn display_cycle_summary(report: &CycleReport) {
    println!("\nCycle terminé :");
    println!("  Analysées        : {}", report.analyzed.len());
    if !report.no_data.is_empty() {
        println!("  Sans données     : {}", report.no_data.join(", "));
    }
    if !report.unsupported.is_empty() {
        println!("  Non supportées   : {}", report.unsupported.join(", "));
    }
    if report.interrupted {
        println!("  Cycle interrompu.");
    }
}
