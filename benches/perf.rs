use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;

use scoreboard_terminal::countdown::Countdown;
use scoreboard_terminal::futsal::{DEFAULT_PERIOD_SECS, Futsal};
use scoreboard_terminal::notify::Notifier;
use scoreboard_terminal::persist::MemoryStore;
use scoreboard_terminal::score::Team;
use scoreboard_terminal::volleyball::Volleyball;

fn random_teams(n: usize) -> Vec<Team> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| if rng.gen_bool(0.5) { Team::A } else { Team::B })
        .collect()
}

fn bench_volleyball_match(c: &mut Criterion) {
    let rallies = random_teams(250);
    c.bench_function("volleyball_match_with_undo", |b| {
        b.iter(|| {
            let (notifier, rx) = Notifier::channel();
            let mut game = Volleyball::load(Box::new(MemoryStore::new()), notifier);
            for team in &rallies {
                game.add_point(*team);
            }
            while game.undo().is_ok() {}
            black_box(rx.try_iter().count());
            black_box(game.state().sets);
        })
    });
}

fn bench_futsal_scoring(c: &mut Criterion) {
    let events = random_teams(200);
    c.bench_function("futsal_goals_and_fouls", |b| {
        b.iter(|| {
            let (notifier, _rx) = Notifier::channel();
            let mut game = Futsal::load(Box::new(MemoryStore::new()), notifier, DEFAULT_PERIOD_SECS);
            for (i, team) in events.iter().enumerate() {
                if i % 3 == 0 {
                    game.add_foul(*team);
                } else {
                    game.add_goal(*team);
                }
            }
            black_box(game.record());
        })
    });
}

fn bench_countdown_ticks(c: &mut Criterion) {
    c.bench_function("countdown_full_period_100ms_ticks", |b| {
        b.iter(|| {
            let base = Instant::now();
            let mut clock = Countdown::new(DEFAULT_PERIOD_SECS);
            clock.start(base);
            let mut step = 0u64;
            while clock.is_running() {
                step += 1;
                black_box(clock.tick(base + Duration::from_millis(step * 100)));
            }
            black_box(clock.remaining());
        })
    });
}

criterion_group!(
    benches,
    bench_volleyball_match,
    bench_futsal_scoring,
    bench_countdown_ticks
);
criterion_main!(benches);
