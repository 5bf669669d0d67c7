use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::cards::{Card, Suit};
use crate::game_state::{Action, Actor};
use crate::play::EpisodeOutcome;
use crate::session::{PayoffSummary, SessionReport};

pub fn rate_bar(rate: f64, width: usize) -> String {
    let filled = ((rate.clamp(0.0, 1.0)) * width as f64) as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.1}%", rate * 100.0);

    if rate >= 0.6 {
        format!("{} {}", bar.green(), pct)
    } else if rate >= 0.4 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn board_display(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".dimmed().to_string();
    }
    cards
        .iter()
        .map(|card| {
            let text = card.pretty();
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn styled_action(action: Action) -> String {
    let label = action.as_str();
    match action {
        Action::Raise | Action::Bet => label.red().bold().to_string(),
        Action::Call => label.green().bold().to_string(),
        Action::Fold => label.dimmed().bold().to_string(),
        Action::Check => label.yellow().bold().to_string(),
        Action::RevealCards => label.cyan().to_string(),
    }
}

pub fn styled_payoff(value: f64) -> String {
    let text = format!("{:+.4}", value);
    if value > 0.0 {
        text.green().bold().to_string()
    } else if value < 0.0 {
        text.red().bold().to_string()
    } else {
        text.bold().to_string()
    }
}

fn summary_row(label: &str, summary: &PayoffSummary) -> Vec<Cell> {
    vec![
        Cell::new(label.bold().to_string()),
        Cell::new(summary.episodes).set_alignment(CellAlignment::Right),
        Cell::new(styled_payoff(summary.mean)).set_alignment(CellAlignment::Right),
        Cell::new(summary.total).set_alignment(CellAlignment::Right),
        Cell::new(rate_bar(summary.win_rate(), 20)),
        Cell::new(summary.folds).set_alignment(CellAlignment::Right),
    ]
}

pub fn payoff_table(rows: &[(&str, &PayoffSummary)]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Phase"),
        Cell::new("Hands").set_alignment(CellAlignment::Right),
        Cell::new("Mean").set_alignment(CellAlignment::Right),
        Cell::new("Total").set_alignment(CellAlignment::Right),
        Cell::new("Won"),
        Cell::new("Folds").set_alignment(CellAlignment::Right),
    ]);
    for (label, summary) in rows {
        table.add_row(summary_row(label, summary));
    }
    table.to_string()
}

pub fn report_table(report: &SessionReport) -> String {
    payoff_table(&[
        ("Training", &report.training),
        ("Evaluation", &report.evaluation),
        ("Random baseline", &report.baseline),
    ])
}

pub fn hand_log(outcome: &EpisodeOutcome) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("#"), Cell::new("Actor"), Cell::new("Action")]);
    for (i, (actor, action)) in outcome.log.iter().enumerate() {
        let who = match actor {
            Actor::Dealer => actor.to_string().dimmed().to_string(),
            Actor::Seat(_) => actor.to_string(),
        };
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(who),
            Cell::new(styled_action(*action)),
        ]);
    }
    table.to_string()
}

pub fn section(title: &str, content: &str) -> String {
    format!("\n{}\n  {}\n", title.cyan().bold(), content)
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}
