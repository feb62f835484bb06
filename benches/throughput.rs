use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use whs_index::{
    core::store::MemoryRepository,
    course::{CourseDraft, DifficultyRanking},
    engine::{
        HandicapEngine,
        allocation::allocate_strokes,
        index::{HistoryEntry, compute_index},
    },
    ledger::Ledger,
    round::{Differential, HoleEntry, RoundDraft},
};

fn bench_score_round(c: &mut Criterion) {
    let engine = HandicapEngine::default();
    let course = CourseDraft::new("Bench").snapshot();
    let entries = vec![HoleEntry::strokes(5); 18];

    c.bench_function("score_round", |b| {
        b.iter(|| engine.score_round(&course, Some(24), 0, &entries));
    });

    let ranking = DifficultyRanking::natural();
    c.bench_function("allocate_strokes", |b| {
        b.iter(|| allocate_strokes(Some(27), &ranking));
    });
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_index");

    for n in [8usize, 20usize, 1000usize] {
        let history: Vec<HistoryEntry<u64>> = (0..n as u64)
            .map(|i| HistoryEntry {
                differential: Differential::from_tenths(((i * 37) % 300) as i32),
                id: i,
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &history, |b, history| {
            b.iter(|| compute_index(history));
        });
    }

    group.finish();
}

fn bench_ledger_rounds(c: &mut Criterion) {
    c.bench_function("ledger_record_1k_rounds", |b| {
        b.iter(|| {
            let mut ledger = Ledger::new(MemoryRepository::new(), HandicapEngine::default());
            let course_id = ledger.add_course(CourseDraft::new("Bench")).expect("course");
            for i in 0..1_000u64 {
                let id = ledger
                    .start_round(RoundDraft::new(i % 10, course_id))
                    .expect("start");
                ledger
                    .record_holes(id, &[HoleEntry::strokes(4 + (i % 3) as i32); 18])
                    .expect("record");
            }
            ledger.player_index(0).expect("index")
        });
    });
}

criterion_group!(benches, bench_score_round, bench_index, bench_ledger_rounds);
criterion_main!(benches);
