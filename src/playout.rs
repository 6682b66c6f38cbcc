//! Rollouts (game simulation to the end).
//!
//! A rollout starts from any state, plays moves until the rules say the game
//! is over, and returns the final state. It never touches the search tree.
//! Both policies stop with [`SearchError::RolloutLimit`] instead of looping
//! forever when the rules never end the game.

use fastrand::Rng;
use log::trace;

use crate::config::RolloutPolicy;
use crate::constants::WIN;
use crate::error::SearchError;
use crate::game::{Player, Rules, count_owned};
use crate::tree::first_max;

/// Play `state` out to the end with the given policy.
///
/// `bot` is the searching player; only the heuristic policy looks at it.
pub fn rollout<R: Rules>(
    rules: &R,
    state: &R::State,
    policy: RolloutPolicy,
    bot: Player,
    max_steps: usize,
    rng: &mut Rng,
) -> Result<R::State, SearchError> {
    let mut state = state.clone();
    let mut steps = 0;

    while !rules.is_ended(&state) {
        if steps == max_steps {
            return Err(SearchError::RolloutLimit { steps });
        }
        state = match policy {
            RolloutPolicy::Random => random_step(rules, &state, rng)?,
            RolloutPolicy::Heuristic { region_bonus } => {
                heuristic_step(rules, &state, bot, region_bonus, rng)?
            }
        };
        steps += 1;
    }

    trace!("rollout finished after {steps} steps");
    Ok(state)
}

/// Uniformly random playout.
pub fn random_playout<R: Rules>(
    rules: &R,
    state: &R::State,
    max_steps: usize,
    rng: &mut Rng,
) -> Result<R::State, SearchError> {
    // The bot identity is unused by the random policy.
    let anyone = rules.current_player(state);
    rollout(rules, state, RolloutPolicy::Random, anyone, max_steps, rng)
}

/// Play one uniformly random legal move.
fn random_step<R: Rules>(
    rules: &R,
    state: &R::State,
    rng: &mut Rng,
) -> Result<R::State, SearchError> {
    let actions = rules.legal_actions(state);
    if actions.is_empty() {
        return Err(SearchError::Stalled);
    }
    let action = actions[rng.usize(..actions.len())];
    Ok(rules.next_state(state, action))
}

/// Play one move of the heuristic policy.
///
/// Moves are scanned in enumeration order. The first one that ends the game
/// in a win for `bot` is played at once. Otherwise the first move that
/// raises the mover's count of owned regions is played; failing that, a
/// random one.
fn heuristic_step<R: Rules>(
    rules: &R,
    state: &R::State,
    bot: Player,
    region_bonus: u32,
    rng: &mut Rng,
) -> Result<R::State, SearchError> {
    let actions = rules.legal_actions(state);
    if actions.is_empty() {
        return Err(SearchError::Stalled);
    }

    let mover = rules.current_player(state);
    let owned_before = rules
        .region_owners(state)
        .map(|owners| count_owned(&owners, mover));

    let mut scored: Vec<(R::State, u32)> = Vec::new();
    for &action in &actions {
        let next = rules.next_state(state, action);
        if rules.points_values(&next).is_some_and(|p| p.of(bot) == WIN) {
            return Ok(next);
        }
        if let Some(before) = owned_before {
            let after = rules
                .region_owners(&next)
                .map_or(0, |owners| count_owned(&owners, mover));
            if after > before {
                scored.push((next, region_bonus));
            }
        }
    }

    let best = first_max(scored.iter().map(|(_, score)| *score as f64));
    match best {
        Some(i) => Ok(scored.swap_remove(i).0),
        None => {
            let action = actions[rng.usize(..actions.len())];
            Ok(rules.next_state(state, action))
        }
    }
}
