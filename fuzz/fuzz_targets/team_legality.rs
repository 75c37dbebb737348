#![no_main]

extern crate arbitrary;
extern crate capture_agents;
extern crate libfuzzer_sys;

use capture_agents::arena::{
    action::Action,
    agent::{AgentConfig, ConfigAgentGenerator},
    board::BoardState,
    create_team,
    historian::{CloneHistorianGenerator, VecHistorian},
    test_util::{assert_valid_choice, assert_valid_record},
    AgentGenerator, GameState, Team,
};
use capture_agents::core::Position;

use libfuzzer_sys::fuzz_target;
use std::rc::Rc;

const LAYOUT: &str = "\
%%%%%%%%%%%%
%1 .  %  .2%
% %o%    % %
%   .  %o  %
%3.  %    4%
%%%%%%%%%%%%";

const MAX_TURNS: usize = 64;

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct Input {
    pub configs: [AgentConfig; 4],
    /// Agents to hide once everyone has registered
    pub hidden: Vec<u8>,
    /// Teleports applied before the game starts
    pub placements: Vec<(u8, u8, u8)>,
    /// Scripted moves for agent 3, replacing its own choice while they last
    pub forced: Vec<Action>,
    pub turns: u8,
}

fn sanitize(config: AgentConfig) -> AgentConfig {
    match config {
        // Keep the fuzzer from sleeping on huge time limits
        AgentConfig::Improved { max_candidates, .. } => AgentConfig::Improved {
            max_candidates: max_candidates.map(|max| max.clamp(1, 5)),
            time_limit_ms: None,
        },
        random => random,
    }
}

fuzz_target!(|input: Input| {
    let mut state = BoardState::from_layout_str(LAYOUT).unwrap();
    for (id, x, y) in input.placements.iter().take(4) {
        let position = Position::new(u16::from(*x % 12), u16::from(*y % 6));
        if !state.layout().is_wall(position) {
            state = state.with_position(usize::from(*id % 4), position);
        }
    }

    let configs = input.configs.map(sanitize);
    let historian = VecHistorian::new();
    let storage = historian.get_storage();

    let mut red: Team<BoardState> = match create_team(0, 2, true, configs[0], configs[2]) {
        Ok(team) => team,
        Err(_) => return,
    };
    let mut blue: Team<BoardState> = match create_team(1, 3, false, configs[1], configs[3]) {
        Ok(team) => team,
        Err(_) => return,
    };

    // A watched improved agent replaces red's first member so every record
    // can be checked.
    let watched = ConfigAgentGenerator::new(AgentConfig::default())
        .unwrap()
        .with_historian_generator(Rc::new(CloneHistorianGenerator::new(historian)));
    let mut watched_agent = AgentGenerator::<BoardState>::generate(&watched, 0);

    red.register_initial_state(&state).unwrap();
    blue.register_initial_state(&state).unwrap();
    watched_agent.register_initial_state(&state).unwrap();

    // Starts must be visible, so agents are hidden after registration.
    for id in input.hidden.iter().take(2) {
        state = state.with_hidden(usize::from(*id % 4));
    }

    let mut forced = input.forced.into_iter();
    let turns = usize::from(input.turns).min(MAX_TURNS);
    for _ in 0..turns {
        for index in 0..4 {
            let action = match index {
                0 => watched_agent.choose_action(&state),
                3 => match forced.next() {
                    Some(action) if state.legal_actions(3).contains(&action) => action,
                    _ => blue.choose_action(3, &state).unwrap(),
                },
                _ if index % 2 == 0 => red.choose_action(index, &state).unwrap(),
                _ => blue.choose_action(index, &state).unwrap(),
            };
            assert_valid_choice(&state, index, action);
            state = state.generate_successor(index, action).unwrap();
        }
    }

    for record in storage.borrow().iter() {
        assert_valid_record(record);
    }
});
