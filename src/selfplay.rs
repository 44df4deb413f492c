//! Self-play game generation for training data.
//!
//! Plays full games between two random selectors and records, for every
//! position, the encoded features, a one-hot policy on the move actually
//! played, and the final outcome from side A's perspective. Samples can be
//! passed through a random board symmetry as they are recorded.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::{GameState, Move, Side, MOVE_SPACE_SIZE, PASS_SLOT};
use crate::game::{Game, GameError, PlayMode, DEFAULT_MAX_TURNS};
use crate::movegen::legal_moves;
use crate::nn::{encode, random_augment, Feature, Policy};

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Moves after which a game is scored as a draw.
    pub max_turns: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Validation applied to every move.
    pub mode: PlayMode,
    /// Pass each recorded sample through a random symmetry.
    pub augment: bool,
    /// Start from a shuffled tile layout rather than a bare board.
    pub random_setup: bool,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: DEFAULT_MAX_TURNS,
            threads: 4,
            seed: 0,
            mode: PlayMode::Checked,
            augment: false,
            random_setup: true,
            quiet: false,
        }
    }
}

/// One training sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub feature: Feature,
    #[serde(with = "policy_serde")]
    pub policy: Policy,
    /// +1 if A won, -1 if B won, 0 for a draw.
    pub outcome: f32,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Starting position.
    pub initial: GameState,
    /// Moves in order of play.
    pub moves: Vec<Move>,
    /// `None` for a draw.
    pub winner: Option<Side>,
    pub turns: u32,
    /// One sample per position before each move.
    pub samples: Vec<Sample>,
}

mod policy_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::nn::Policy;

    pub fn serialize<S: Serializer>(policy: &Policy, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(policy.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Policy, D::Error> {
        let values = Vec::<f32>::deserialize(deserializer)?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"41 policy entries"))
    }
}

fn one_hot(slot: usize) -> Policy {
    let mut policy = [0.0; MOVE_SPACE_SIZE];
    policy[slot] = 1.0;
    policy
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, GameError> {
    let initial = if config.random_setup {
        GameState::new_random(rng)
    } else {
        GameState::empty()
    };
    let mut game = Game::with_max_turns(initial, config.max_turns);
    let mut positions: Vec<(GameState, usize)> = Vec::new();
    let mut moves = Vec::new();

    while !game.is_over() {
        let state = *game.state();
        let (slot, mv) = pick(&state, rng);
        game.play(mv, config.mode)?;
        positions.push((state, slot));
        moves.push(mv);
    }

    let outcome = game.outcome();
    let winner = outcome.and_then(|o| o.winner);
    let value = outcome.map_or(0.0, |o| o.value());

    let samples = positions
        .iter()
        .map(|(state, slot)| {
            let feature = encode(state);
            let policy = one_hot(*slot);
            if config.augment {
                let (feature, policy, outcome) = random_augment(rng, &feature, &policy, value);
                Sample {
                    feature,
                    policy,
                    outcome,
                }
            } else {
                Sample {
                    feature,
                    policy,
                    outcome: value,
                }
            }
        })
        .collect();

    Ok(GameRecord {
        game_id,
        initial,
        moves,
        winner,
        turns: game.turns(),
        samples,
    })
}

/// Uniform choice among the legal moves, with the chosen policy slot.
fn pick(state: &GameState, rng: &mut SmallRng) -> (usize, Move) {
    use rand::seq::SliceRandom;
    legal_moves(state)
        .choose(rng)
        .copied()
        .unwrap_or((PASS_SLOT, Move::Pass))
}

fn describe(game: &GameRecord) -> String {
    match game.winner {
        Some(side) => format!("{:?} wins", side),
        None => "draw".to_string(),
    }
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    });
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs self-play generation, calling `on_game` with each completed game record.
///
/// Games aborted by a rejected move are logged and skipped.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    info!(
        "self-play: {} games, {} turn cap, {} threads",
        config.num_games, config.max_turns, config.threads
    );
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn run_one(config: &SelfPlayConfig, game_id: usize, done: &AtomicUsize) -> Option<GameRecord> {
    let mut rng = game_rng(config.seed, game_id);
    let start = Instant::now();
    match play_game(config, game_id, &mut rng) {
        Ok(game) => {
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if !config.quiet {
                debug!(
                    "game {}/{}: {} in {} turns ({:.3}s)",
                    n,
                    config.num_games,
                    describe(&game),
                    game.turns,
                    start.elapsed().as_secs_f64()
                );
            }
            Some(game)
        }
        Err(e) => {
            warn!("game {} aborted: {}", game_id, e);
            None
        }
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    let done = AtomicUsize::new(0);
    for i in 0..config.num_games {
        if let Some(game) = run_one(config, i, &done) {
            on_game(game);
        }
    }
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker threads.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!("thread pool unavailable ({}), playing sequentially", e);
            return run_self_play_sequential(config, on_game);
        }
    };

    let (tx, rx) = mpsc::channel::<GameRecord>();
    let worker_config = config.clone();
    let handle = std::thread::spawn(move || {
        let done = AtomicUsize::new(0);
        pool.install(|| {
            (0..worker_config.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    if let Some(game) = run_one(&worker_config, i, &done) {
                        let _ = tx.send(game);
                    }
                });
        });
    });

    // Receive completed games on the main thread and pass to callback.
    for game in rx {
        on_game(game);
    }

    if handle.join().is_err() {
        warn!("self-play worker thread panicked");
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game).map_err(io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    let a_wins = games.iter().filter(|g| g.winner == Some(Side::A)).count();
    let b_wins = games.iter().filter(|g| g.winner == Some(Side::B)).count();
    let draws = total - a_wins - b_wins;
    let total_turns: u64 = games.iter().map(|g| g.turns as u64).sum();
    let total_samples: usize = games.iter().map(|g| g.samples.len()).sum();
    let pct = |n: usize| 100.0 * n as f64 / total.max(1) as f64;

    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", total);
    eprintln!(
        "Avg turns/game: {:.1}",
        total_turns as f64 / total.max(1) as f64
    );
    eprintln!("Samples: {}", total_samples);
    eprintln!("  A wins: {} ({:.1}%)", a_wins, pct(a_wins));
    eprintln!("  B wins: {} ({:.1}%)", b_wins, pct(b_wins));
    eprintln!("  Draws:  {} ({:.1}%)", draws, pct(draws));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::decode;
    use crate::rules::play;

    fn config(num_games: usize, threads: usize, seed: u64) -> SelfPlayConfig {
        SelfPlayConfig {
            num_games,
            threads,
            seed,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn play_single_game_completes() {
        let config = config(1, 1, 42);
        let mut rng = SmallRng::seed_from_u64(42);
        let game = play_game(&config, 0, &mut rng).unwrap();

        assert!(!game.moves.is_empty());
        assert!(game.turns <= config.max_turns);
        assert_eq!(game.samples.len(), game.moves.len());
        if game.winner.is_none() {
            assert_eq!(game.turns, config.max_turns);
        }
    }

    #[test]
    fn samples_replay_the_game() {
        let config = config(1, 1, 7);
        let mut rng = SmallRng::seed_from_u64(7);
        let game = play_game(&config, 0, &mut rng).unwrap();
        let value = game.winner.map_or(0.0, Side::sign);

        let mut state = game.initial;
        for (mv, sample) in game.moves.iter().zip(&game.samples) {
            assert_eq!(decode(&sample.feature), state);
            assert_eq!(sample.outcome, value);
            let slot = mv.slot(&state).unwrap();
            assert_eq!(sample.policy[slot], 1.0);
            assert_eq!(sample.policy.iter().sum::<f32>(), 1.0);
            state = play(&state, *mv).0;
        }
    }

    #[test]
    fn augmented_samples_stay_one_hot_on_legal_moves() {
        let config = SelfPlayConfig {
            augment: true,
            ..config(1, 1, 11)
        };
        let mut rng = SmallRng::seed_from_u64(11);
        let game = play_game(&config, 0, &mut rng).unwrap();
        for sample in &game.samples {
            let state = decode(&sample.feature);
            let slot = sample.policy.iter().position(|&p| p == 1.0).unwrap();
            assert!(crate::movegen::legal_mask(&state)[slot]);
            assert!(sample.outcome.abs() <= 1.0);
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = run_self_play(&config(3, 1, 99));
        let b = run_self_play(&config(3, 1, 99));
        let moves = |games: &[GameRecord]| games.iter().map(|g| g.moves.clone()).collect::<Vec<_>>();
        assert_eq!(moves(&a), moves(&b));
    }

    #[test]
    fn sequential_run_produces_correct_count() {
        let games = run_self_play(&config(3, 1, 99));
        assert_eq!(games.len(), 3);
    }

    #[test]
    fn parallel_run_produces_correct_count() {
        let games = run_self_play(&config(4, 2, 77));
        assert_eq!(games.len(), 4);
        let ids: Vec<usize> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        // Per-game seeding makes the parallel run match the sequential one.
        let sequential = run_self_play(&config(4, 1, 77));
        for (p, s) in games.iter().zip(&sequential) {
            assert_eq!(p.moves, s.moves);
        }
    }

    #[test]
    fn jsonl_output_is_valid() {
        let games = run_self_play(&config(2, 1, 55));
        let mut buf = Vec::new();
        write_jsonl(&games, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert_eq!(output.lines().count(), 2);
        for (line, game) in output.lines().zip(&games) {
            let back: GameRecord = serde_json::from_str(line).unwrap();
            assert_eq!(back.game_id, game.game_id);
            assert_eq!(back.initial, game.initial);
            assert_eq!(back.moves, game.moves);
            assert_eq!(back.samples, game.samples);
        }
    }

    #[test]
    fn policy_length_is_checked() {
        let json = format!(
            "{{\"feature\":{},\"policy\":[1.0,0.0],\"outcome\":0.0}}",
            serde_json::to_string(&encode(&GameState::empty())).unwrap()
        );
        assert!(serde_json::from_str::<Sample>(&json).is_err());
    }
}
