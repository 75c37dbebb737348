extern crate capture_agents;

mod common;

use std::{fs, rc::Rc};

use capture_agents::arena::{
    agent::{AgentConfigError, ConfigAgentGenerator},
    board::BoardState,
    create_team_with,
    errors::{AgentInitError, BoardError, TeamError},
    historian::{CloneHistorianGenerator, StatsHistorian},
    GameState, Team,
};
use clap::Parser;
use common::TracingArgs;
use thiserror::Error;
use tracing::{error, info};

const DEFAULT_LAYOUT: &str = "\
%%%%%%%%%%%%%%%%%%%%
%1 ....%    %.... 2%
% %%% %% %%%% %%%% %
% o  .   .  .    o %
% %%%% %%%% %% %%% %
%3 ....    %.... .4%
%%%%%%%%%%%%%%%%%%%%";

#[derive(Parser, Debug)]
#[command(
    name = "team_match",
    about = "Play two capture the flag teams against each other",
    long_about = "Play a red and a blue team on a small board.\n\
                  Each team is given as an agent name (improved, random, \
                  ImprovedCaptureAgent, MyTeamAgent), inline JSON or a JSON file."
)]
struct Args {
    #[command(flatten)]
    tracing: TracingArgs,

    /// Agent for both red members (indices 0 and 2)
    #[arg(short = 'r', long, default_value = "improved")]
    red: String,

    /// Agent for both blue members (indices 1 and 3)
    #[arg(short = 'b', long, default_value = "random")]
    blue: String,

    /// Number of full turns; every agent moves once per turn
    #[arg(short = 't', long, default_value_t = 100)]
    turns: usize,

    /// Layout file to play on instead of the built-in board
    #[arg(short = 'l', long)]
    layout: Option<String>,
}

type Result<T> = std::result::Result<T, TeamMatchError>;

#[derive(Debug, Error)]
enum TeamMatchError {
    #[error("failed to read layout {path}")]
    ReadLayout {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("failed to build the {side} team from {spec:?}")]
    BuildAgent {
        side: &'static str,
        spec: String,
        #[source]
        source: AgentConfigError,
    },
    #[error(transparent)]
    Team(#[from] TeamError),
    #[error(transparent)]
    Init(#[from] AgentInitError),
    #[error("layout has {0} agent starts, a match needs 4")]
    NotFourAgents(usize),
}

fn load_board(path: Option<&str>) -> Result<BoardState> {
    let state = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| TeamMatchError::ReadLayout {
                path: path.to_string(),
                source,
            })?;
            BoardState::from_layout_str(&text)?
        }
        None => BoardState::from_layout_str(DEFAULT_LAYOUT)?,
    };
    if state.num_agents() != 4 {
        return Err(TeamMatchError::NotFourAgents(state.num_agents()));
    }
    Ok(state)
}

fn build_team(
    side: &'static str,
    spec: &str,
    is_red: bool,
    historian: &StatsHistorian,
) -> Result<Team<BoardState>> {
    let generator = ConfigAgentGenerator::from_str_or_file(spec)
        .map_err(|source| TeamMatchError::BuildAgent {
            side,
            spec: spec.to_string(),
            source,
        })?
        .with_historian_generator(Rc::new(CloneHistorianGenerator::new(historian.clone())));
    println!("  {side}: {}", generator.config());

    let (first, second) = if is_red { (0, 2) } else { (1, 3) };
    Ok(create_team_with(first, second, is_red, &generator, &generator)?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.tracing.init_tracing();

    let mut state = load_board(args.layout.as_deref())?;
    let historian = StatsHistorian::new();
    let stats = historian.get_storage();

    println!("Teams:");
    let mut red = build_team("red", &args.red, true, &historian)?;
    let mut blue = build_team("blue", &args.blue, false, &historian)?;
    println!();
    println!("{state}");

    red.register_initial_state(&state)?;
    blue.register_initial_state(&state)?;

    for turn in 0..args.turns {
        for index in 0..state.num_agents() {
            let team = if index % 2 == 0 { &mut red } else { &mut blue };
            let action = team.choose_action(index, &state)?;
            state = match state.generate_successor(index, action) {
                Ok(next) => next,
                Err(err) => {
                    error!(index, %action, %err, "engine rejected a chosen action");
                    continue;
                }
            };
        }
        if state.food_remaining() == 0 {
            info!(turn, "all food eaten");
            break;
        }
    }

    println!("{state}");
    println!("Final score (red - blue): {}", state.score());
    println!();
    println!("Decision stats:");
    let stats = stats.borrow();
    let mut ids: Vec<_> = stats.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        let agent_stats = &stats[&id];
        let mean = agent_stats
            .mean_best_score()
            .map_or_else(|| "-".to_string(), |mean| format!("{mean:.2}"));
        println!(
            "  Agent {id}: {} decisions, {} failed candidates, {:.1}% fallbacks, mean best score {mean}",
            agent_stats.decisions,
            agent_stats.candidate_failures,
            agent_stats.fallback_rate() * 100.0,
        );
    }

    Ok(())
}
