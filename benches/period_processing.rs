use criterion::{criterion_group, criterion_main, Criterion};
use period_rating::{
    config::RatingConfig,
    model::{aggregator::standings, rating_model::RatingModel, structures::family::Family},
    utils::test_utils::generate_periods
};

fn process_periods(config: &RatingConfig, count_periods: usize, count_competitors: usize, count_matches: usize) {
    let periods = generate_periods(count_periods, count_competitors, count_matches, 1);

    let mut model = RatingModel::new(config.clone()).unwrap();
    model.process(&periods).unwrap();
    standings(model.ratings());
}

fn group_call(c: &mut Criterion) {
    let gaussian = RatingConfig::default();
    let gamma = RatingConfig {
        monte_carlo_samples: 1_000,
        ..RatingConfig::for_family(Family::Gamma)
    };

    let mut group = c.benchmark_group("period-processing");
    group.sample_size(25);
    group.bench_function("gaussian: t=10,c=50,m=100", |b| b.iter(|| process_periods(&gaussian, 10, 50, 100)));
    group.bench_function("gaussian: t=20,c=200,m=500", |b| b.iter(|| process_periods(&gaussian, 20, 200, 500)));
    group.bench_function("gamma: t=10,c=50,m=100", |b| b.iter(|| process_periods(&gamma, 10, 50, 100)));
    group.finish();
}

criterion_group!(benches, group_call);
criterion_main!(benches);
