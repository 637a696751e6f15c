//! Integration tests for the recommender.
//!
//! These run the whole path from a populated DataIndex through matrix,
//! similarity and ranking.

use data_loader::{DataIndex, Movie, Rating, RatingsProvider};
use recommender::{
    RecommenderConfig, UserBasedRecommender, build_rating_matrix, build_similarity_matrix,
    generate_recommendations,
};
use std::sync::Arc;

fn create_test_setup() -> DataIndex {
    let mut index = DataIndex::new();

    for (id, title, genres) in [
        (1, "Heat (1995)", "Action|Crime|Thriller"),
        (2, "Toy Story (1995)", "Animation|Children|Comedy"),
        (3, "Casino (1995)", "Crime|Drama"),
        (4, "Jumanji (1995)", "Adventure|Children|Fantasy"),
        (5, "Se7en (1995)", "Mystery|Thriller"),
        (6, "Babe (1995)", "Children|Drama"),
    ] {
        index.insert_movie(Movie {
            id,
            title: title.to_string(),
            genres: genres.to_string(),
        });
    }

    // Users 1-3 like crime films, users 4-5 like family films
    let ratings = [
        (1, 1, 5.0), (1, 3, 4.5),
        (2, 1, 4.5), (2, 3, 5.0), (2, 5, 4.5),
        (3, 1, 4.0), (3, 5, 5.0), (3, 2, 1.0),
        (4, 2, 5.0), (4, 4, 4.5), (4, 6, 4.0),
        (5, 2, 4.5), (5, 4, 5.0), (5, 1, 1.5),
    ];
    for (user_id, movie_id, rating) in ratings {
        index.insert_rating(Rating::new(user_id, movie_id, rating));
    }
    index
}

#[test]
fn test_crime_fan_gets_crime_recommendation() {
    let index = create_test_setup();
    let recommender = UserBasedRecommender::new(Arc::new(index));

    let recs = recommender.recommend(1, true).unwrap();
    assert_eq!(recs.first(), Some(&5));
    assert!(!recs.contains(&1));
    assert!(!recs.contains(&3));
}

#[test]
fn test_family_fan_gets_family_recommendation() {
    let index = create_test_setup();
    let recommender = UserBasedRecommender::new(Arc::new(index));

    let recs = recommender.recommend(5, true).unwrap();
    assert_eq!(recs.first(), Some(&6));
}

#[test]
fn test_batch_and_single_paths_agree() {
    let index = create_test_setup();
    let matrix = build_rating_matrix(&index.fetch_all_ratings().unwrap()).unwrap();
    let similarity = build_similarity_matrix(&matrix).unwrap();
    let config = RecommenderConfig::default().with_top_n(3).with_neighbor_count(2);

    let recommender = UserBasedRecommender::new(Arc::new(index)).with_config(config);
    for &user_id in matrix.users() {
        let shared = generate_recommendations(user_id, false, &matrix, &similarity, &config);
        assert_eq!(shared, recommender.recommend(user_id, false));
        assert!(shared.unwrap().len() <= 3);
    }
}

#[test]
fn test_titles_resolve_for_recommendations() {
    let index = Arc::new(create_test_setup());
    let recommender = UserBasedRecommender::new(index.clone());

    for movie_id in recommender.recommend(4, true).unwrap() {
        assert!(index.fetch_movie_title(movie_id).unwrap().is_some());
    }
}
