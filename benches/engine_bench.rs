use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

use iris::board::GameState;
use iris::game::{launch_game, PlayMode, RandomSelector, DEFAULT_MAX_TURNS};
use iris::movegen::{legal_mask, legal_moves};
use iris::nn::{apply_transform, decode, encode, random_augment, Policy, Transform};
use iris::protocol::{encode_tuple, parse_tuple};
use iris::rules::{exists_legal_move, play};
use iris::selfplay::{run_self_play, SelfPlayConfig};

fn midgame_state() -> GameState {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut state = GameState::new_random(&mut rng);
    let mut selector = RandomSelector::new(11);
    for _ in 0..12 {
        if !exists_legal_move(&state) {
            break;
        }
        let mv = iris::game::MoveSelector::select_move(&mut selector, &state);
        let (child, won) = play(&state, mv);
        if won {
            break;
        }
        state = child;
    }
    state
}

fn uniform_policy(state: &GameState) -> Policy {
    let moves = legal_moves(state);
    let mut policy = [0.0; 41];
    for (slot, _) in &moves {
        policy[*slot] = 1.0 / moves.len() as f32;
    }
    policy
}

fn bench_legal_moves(c: &mut Criterion) {
    let state = midgame_state();
    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| legal_moves(black_box(&state)))
    });
}

fn bench_legal_mask(c: &mut Criterion) {
    let state = midgame_state();
    c.bench_function("legal_mask_midgame", |b| {
        b.iter(|| legal_mask(black_box(&state)))
    });
}

fn bench_encode(c: &mut Criterion) {
    let state = midgame_state();
    c.bench_function("encode_feature", |b| b.iter(|| encode(black_box(&state))));
}

fn bench_decode(c: &mut Criterion) {
    let feature = encode(&midgame_state());
    c.bench_function("decode_feature", |b| b.iter(|| decode(black_box(&feature))));
}

fn bench_tuple_roundtrip(c: &mut Criterion) {
    let text = encode_tuple(&midgame_state());
    c.bench_function("parse_tuple", |b| b.iter(|| parse_tuple(black_box(&text))));
}

fn bench_transforms(c: &mut Criterion) {
    let state = midgame_state();
    let feature = encode(&state);
    let policy = uniform_policy(&state);
    let mut group = c.benchmark_group("transform");
    for t in [
        Transform::Rotation(1),
        Transform::Reflection(3),
        Transform::NeutralSwap,
        Transform::PlayerSwap,
    ] {
        group.bench_function(format!("{:?}", t), |b| {
            b.iter(|| apply_transform(black_box(&feature), black_box(&policy), 1.0, t))
        });
    }
    group.finish();
}

fn bench_random_augment(c: &mut Criterion) {
    let state = midgame_state();
    let feature = encode(&state);
    let policy = uniform_policy(&state);
    let mut rng = SmallRng::seed_from_u64(3);
    c.bench_function("random_augment", |b| {
        b.iter(|| random_augment(&mut rng, black_box(&feature), black_box(&policy), 1.0))
    });
}

fn bench_random_playout(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(5);
    let start = GameState::new_random(&mut rng);
    c.bench_function("random_playout", |b| {
        let mut a = RandomSelector::new(1);
        let mut bsel = RandomSelector::new(2);
        b.iter(|| {
            launch_game(
                &mut a,
                &mut bsel,
                black_box(start),
                DEFAULT_MAX_TURNS,
                PlayMode::Trusted,
            )
        })
    });
}

fn bench_self_play_batch(c: &mut Criterion) {
    let config = SelfPlayConfig {
        num_games: 64,
        threads: 4,
        seed: 9,
        augment: true,
        quiet: true,
        ..SelfPlayConfig::default()
    };
    let mut group = c.benchmark_group("selfplay");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("64_games_4_threads", |b| b.iter(|| run_self_play(&config)));
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves,
    bench_legal_mask,
    bench_encode,
    bench_decode,
    bench_tuple_roundtrip,
    bench_transforms,
    bench_random_augment,
    bench_random_playout,
    bench_self_play_batch,
);
criterion_main!(benches);
