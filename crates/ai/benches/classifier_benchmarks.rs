use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rand::rngs::StdRng;
use rand::SeedableRng;

use restock_ai::{generate, Classifier, CorpusSpec, TrainConfig};

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier_train");

    for samples in [250usize, 1000] {
        let corpus = generate(
            &CorpusSpec::default().with_samples(samples),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &corpus, |b, corpus| {
            b.iter(|| {
                let model = Classifier::train(
                    corpus,
                    &TrainConfig::default(),
                    &mut StdRng::seed_from_u64(7),
                )
                .unwrap();
                black_box(model)
            })
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let corpus = generate(&CorpusSpec::default(), &mut StdRng::seed_from_u64(7)).unwrap();
    let model = Classifier::train(
        &corpus,
        &TrainConfig::default().with_epochs(5),
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();

    c.bench_function("model_score_100_items", |b| {
        b.iter(|| {
            for features in corpus.features.iter().take(100) {
                black_box(model.score(black_box(features)).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_training, bench_scoring);
criterion_main!(benches);
