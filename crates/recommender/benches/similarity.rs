//! Benchmarks for matrix and similarity construction
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic dataset roughly the shape of ml-latest-small.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::Rating;
use recommender::{build_rating_matrix, build_similarity_matrix, generate_recommendations, RecommenderConfig};

fn synthetic_ratings(users: u32, movies: u32, per_user: u32) -> Vec<Rating> {
    let mut ratings = Vec::new();
    for user_id in 1..=users {
        for k in 0..per_user {
            let movie_id = (user_id * 31 + k * 97) % movies + 1;
            let rating = 0.5 + ((user_id + k) % 10) as f32 * 0.5;
            ratings.push(Rating::new(user_id, movie_id, rating));
        }
    }
    ratings
}

fn bench_build_rating_matrix(c: &mut Criterion) {
    let ratings = synthetic_ratings(600, 9000, 150);

    c.bench_function("build_rating_matrix", |b| {
        b.iter(|| black_box(build_rating_matrix(black_box(&ratings))))
    });
}

fn bench_build_similarity_matrix(c: &mut Criterion) {
    let ratings = synthetic_ratings(600, 9000, 150);
    let matrix = build_rating_matrix(&ratings).expect("synthetic ratings are non-empty");

    c.bench_function("build_similarity_matrix", |b| {
        b.iter(|| black_box(build_similarity_matrix(black_box(&matrix))))
    });
}

fn bench_generate_recommendations(c: &mut Criterion) {
    let ratings = synthetic_ratings(600, 9000, 150);
    let matrix = build_rating_matrix(&ratings).expect("synthetic ratings are non-empty");
    let similarity = build_similarity_matrix(&matrix).expect("matrix is non-empty");
    let config = RecommenderConfig::default();

    c.bench_function("generate_recommendations", |b| {
        b.iter(|| {
            black_box(generate_recommendations(
                black_box(1),
                true,
                &matrix,
                &similarity,
                &config,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_build_rating_matrix,
    bench_build_similarity_matrix,
    bench_generate_recommendations
);
criterion_main!(benches);
