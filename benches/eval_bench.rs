use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duelist::ai::{EvalWeights, Evaluator, Node};
use duelist::core::ScriptedBattle;

fn eval_benchmark(c: &mut Criterion) {
    let battle: ScriptedBattle = "agent A hp=80/100 spd=10 types=grass; agent B hp=100/100; opponent X hp=10/100 spd=20 types=fire"
        .parse()
        .unwrap();
    let arena = Bump::new();
    let root = Node::root(&battle, &arena).unwrap();
    let evaluator = Evaluator::new(&battle, EvalWeights::with_positional_terms());

    c.bench_function("leaf evaluation", |b| {
        b.iter(|| evaluator.score(black_box(&root)))
    });
}

criterion_group!(benches, eval_benchmark);
criterion_main!(benches);
