//! DataIndex loading and validation.
//!
//! Detects which MovieLens layout a directory holds, parses the ratings and
//! movies files in parallel, and checks every rating against the 0.5-5.0 scale.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

/// On-disk layout of a MovieLens directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// ml-latest-small style `ratings.csv` / `movies.csv`
    Csv,
    /// ml-1m style `ratings.dat` / `movies.dat`
    Dat,
}

impl DatasetFormat {
    /// Work out the layout from the files present, preferring CSV
    pub fn detect(data_dir: &Path) -> Result<Self> {
        if data_dir.join("ratings.csv").exists() {
            Ok(DatasetFormat::Csv)
        } else if data_dir.join("ratings.dat").exists() {
            Ok(DatasetFormat::Dat)
        } else {
            Err(DataLoadError::FileNotFound {
                path: data_dir.join("ratings.{csv,dat}").display().to_string(),
            })
        }
    }
}

impl DataIndex {
    /// Load a MovieLens dataset from a directory
    ///
    /// Steps:
    /// 1. Detect the file layout
    /// 2. Parse ratings and movies in parallel
    /// 3. Build the index
    /// 4. Validate rating values
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let format = DatasetFormat::detect(data_dir)?;
        info!("Loading MovieLens dataset from {:?} ({:?})", data_dir, format);

        let (ratings, movies) = match format {
            DatasetFormat::Csv => {
                let ratings_path = data_dir.join("ratings.csv");
                let movies_path = data_dir.join("movies.csv");
                rayon::join(
                    || parser::parse_ratings_csv(&ratings_path),
                    || parser::parse_movies_csv(&movies_path),
                )
            }
            DatasetFormat::Dat => {
                let ratings_path = data_dir.join("ratings.dat");
                let movies_path = data_dir.join("movies.dat");
                rayon::join(
                    || parser::parse_ratings_dat(&ratings_path),
                    || parser::parse_movies_dat(&movies_path),
                )
            }
        };

        let index = Self::from_parts(movies?, ratings?);
        index.validate()?;

        let (users, movies, ratings) = index.counts();
        info!("Loaded {} users, {} movies, {} ratings", users, movies, ratings);
        Ok(index)
    }

    /// Build an index from already-parsed movies and ratings
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        let mut index = DataIndex::new();
        for movie in movies {
            index.insert_movie(movie);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }
        debug!("Built index with {} ratings", index.ratings.len());
        index
    }

    /// Validate data integrity
    ///
    /// Every rating must lie in the 0.5-5.0 scale so that 0.0 can stand for
    /// "unrated" in the rating matrix. Ratings for movies missing from the
    /// movies file are tolerated.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.ratings.iter().find(|r| !r.in_scale()) {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: bad.rating.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_validate_rejects_zero_rating() {
        let index = DataIndex::from_parts(Vec::new(), vec![Rating::new(1, 1, 0.0)]);
        let err = index.validate().unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_accepts_half_star() {
        let index = DataIndex::from_parts(Vec::new(), vec![Rating::new(1, 1, 0.5)]);
        assert!(index.validate().is_ok());
    }

    #[test]
    fn test_detect_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DatasetFormat::detect(dir.path()).is_err());
    }

    #[test]
    fn test_load_csv_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ratings.csv"),
            "userId,movieId,rating,timestamp\n1,101,5.0,1\n2,101,5.0,2\n2,102,4.0,3\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("movies.csv"),
            "movieId,title,genres\n101,Heat (1995),Action|Crime|Thriller\n102,\"Money Train, The (1995)\",Action|Comedy\n",
        )
        .unwrap();

        let index = DataIndex::load_from_dir(dir.path()).unwrap();
        assert_eq!(index.counts(), (2, 2, 3));
        assert_eq!(index.get_movie(102).unwrap().title, "Money Train, The (1995)");
        assert_eq!(index.get_user_ratings(2).len(), 2);
    }

    #[test]
    fn test_load_dat_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ratings.dat"), "1::1193::5::978300760\n").unwrap();
        fs::write(
            dir.path().join("movies.dat"),
            "1193::One Flew Over the Cuckoo's Nest (1975)::Drama\n",
        )
        .unwrap();

        let index = DataIndex::load_from_dir(dir.path()).unwrap();
        assert_eq!(index.counts(), (1, 1, 1));
        assert_eq!(index.get_movie(1193).unwrap().genres, "Drama");
    }

    #[test]
    fn test_load_rejects_out_of_scale_rating() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ratings.dat"), "1::1::7::0\n").unwrap();
        fs::write(dir.path().join("movies.dat"), "1::Movie (2000)::Drama\n").unwrap();

        assert!(DataIndex::load_from_dir(dir.path()).is_err());
    }
}
