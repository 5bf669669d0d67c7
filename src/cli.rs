use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GameConfig, SessionConfig};
use crate::display::{
    board_display, hand_log, payoff_table, print_error, report_table, section, styled_payoff,
};
use crate::engine::GameEngine;
use crate::error::LeducResult;
use crate::game_state::Seat;
use crate::learner::FeatureSet;
use crate::policy::{PolicyKind, RandomPolicy};
use crate::session::{play_match, running_mean, PayoffSummary, Session};

#[derive(Parser)]
#[command(name = "leduc", version, about = "Fixed-limit two-seat poker with a linear Q-learning agent.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct GameArgs {
    /// Number of dealer reveals before showdown
    #[arg(short = 'r', long = "rounds")]
    rounds: Option<usize>,
    /// Private cards per seat
    #[arg(long)]
    hand_size: Option<usize>,
    /// Starting stack for both seats
    #[arg(short, long)]
    stack: Option<u32>,
    /// Carry stacks between hands instead of resetting
    #[arg(long)]
    carry: bool,
    /// Seed for the run's random source
    #[arg(long)]
    seed: Option<u64>,
}

impl GameArgs {
    fn apply(&self, game: &mut GameConfig) {
        if let Some(r) = self.rounds {
            game.round_count = r;
        }
        if let Some(h) = self.hand_size {
            game.hand_size = h;
        }
        if let Some(s) = self.stack {
            game.starting_stacks = [s, s];
        }
        if self.carry {
            game.carry_stacks = true;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train the learner against a fixed opponent, then evaluate it greedily
    Train {
        /// JSON session config; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Training hands
        #[arg(short = 'n', long)]
        episodes: Option<usize>,
        /// Evaluation and baseline hands
        #[arg(long)]
        eval_episodes: Option<usize>,
        /// Exploration probability during training
        #[arg(short, long)]
        epsilon: Option<f64>,
        /// Feature set for the value function
        #[arg(short, long, value_enum)]
        features: Option<FeatureSet>,
        /// Opponent policy
        #[arg(short, long, value_enum)]
        opponent: Option<PolicyKind>,
        /// Seat the learner plays (1 or 2)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        seat: Option<u8>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        game: GameArgs,
    },
    /// Play two fixed policies against each other
    Match {
        #[arg(value_enum)]
        seat1: PolicyKind,
        #[arg(value_enum)]
        seat2: PolicyKind,
        /// Hands to play
        #[arg(short = 'n', long, default_value = "2000")]
        hands: usize,
        #[command(flatten)]
        game: GameArgs,
    },
    /// Deal and print one random-vs-random hand
    Hand {
        #[command(flatten)]
        game: GameArgs,
    },
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    dispatch(cli);
}

/// Runs one command line and returns what it would print.
pub fn execute(args: Vec<String>) -> LeducResult<String> {
    execute_cli(Cli::parse_from(args))
}

fn dispatch(cli: Cli) {
    match execute_cli(cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn execute_cli(cli: Cli) -> LeducResult<String> {
    match cli.command {
        Commands::Train {
            config,
            episodes,
            eval_episodes,
            epsilon,
            features,
            opponent,
            seat,
            json,
            game,
        } => {
            let mut cfg = load_session_config(config)?;
            game.apply(&mut cfg.game);
            if let Some(n) = episodes {
                cfg.episodes = n;
            }
            if let Some(n) = eval_episodes {
                cfg.eval_episodes = n;
            }
            if let Some(e) = epsilon {
                cfg.exploration = e;
            }
            if let Some(f) = features {
                cfg.features = f;
            }
            if let Some(o) = opponent {
                cfg.opponent = o;
            }
            if let Some(s) = seat.and_then(Seat::from_number) {
                cfg.learner_seat = s;
            }
            if let Some(s) = game.seed {
                cfg.seed = s;
            }
            cmd_train(cfg, json)
        }
        Commands::Match {
            seat1,
            seat2,
            hands,
            game,
        } => cmd_match(seat1, seat2, hands, &game),
        Commands::Hand { game } => cmd_hand(&game),
    }
}

fn load_session_config(path: Option<PathBuf>) -> LeducResult<SessionConfig> {
    match path {
        Some(p) => SessionConfig::from_path(p),
        None => Ok(SessionConfig::default()),
    }
}

fn cmd_train(config: SessionConfig, json: bool) -> LeducResult<String> {
    let mut session = Session::new(config)?;
    let report = session.run()?;

    if json {
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
    }

    let cfg = session.config();
    let mut out = format!(
        "\n{}\n{}\n",
        format!(
            "Q-learner ({}) as {} vs {}",
            cfg.features.as_str(),
            cfg.learner_seat,
            cfg.opponent.as_str()
        )
        .cyan()
        .bold(),
        report_table(&report)
    );

    let curve = running_mean(&report.training_payoffs);
    if let Some(last) = curve.last() {
        out += &section("Training running mean", &styled_payoff(*last));
    }
    out += &section("Edge over random baseline", &styled_payoff(report.edge()));
    Ok(out)
}

fn cmd_match(seat1: PolicyKind, seat2: PolicyKind, hands: usize, args: &GameArgs) -> LeducResult<String> {
    let mut game = GameConfig::default();
    args.apply(&mut game);
    let engine = GameEngine::new(game)?;
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or(7));

    let mut p1 = seat1.build();
    let mut p2 = seat2.build();
    let outcomes = play_match(&engine, p1.as_mut(), p2.as_mut(), hands, &mut rng)?;
    let summary = PayoffSummary::from_outcomes(&outcomes, Seat::One);

    Ok(format!(
        "\n{}\n{}\n",
        format!("{} (seat 1) vs {} (seat 2)", seat1.as_str(), seat2.as_str())
            .cyan()
            .bold(),
        payoff_table(&[("Seat 1", &summary)])
    ))
}

fn cmd_hand(args: &GameArgs) -> LeducResult<String> {
    let mut game = GameConfig::default();
    args.apply(&mut game);
    let engine = GameEngine::new(game)?;
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or(7));

    let outcomes = play_match(&engine, &mut RandomPolicy, &mut RandomPolicy, 1, &mut rng)?;
    let mut out = String::new();
    for outcome in &outcomes {
        out += &format!("\n  Seat 1: {}\n", board_display(&outcome.hands[0]));
        out += &format!("  Seat 2: {}\n", board_display(&outcome.hands[1]));
        out += &format!("  Board:  {}\n", board_display(&outcome.board));
        out += &format!("{}\n", hand_log(outcome));
        out += &section(&outcome.resolution.to_string(), &styled_payoff(outcome.payoff as f64));
    }
    Ok(out)
}
