//! Parsers for MovieLens data files.
//!
//! Two on-disk layouts are supported:
//! - ml-1m `.dat` files, `::`-separated and Latin-1 encoded
//!   - ratings.dat: userId::movieId::rating::timestamp
//!   - movies.dat: movieId::title::genres
//! - ml-latest-small `.csv` files with a header row and quoted titles
//!   - ratings.csv: userId,movieId,rating,timestamp
//!   - movies.csv: movieId,title,genres
//!
//! Every parser has a `_str`/reader twin so tests can feed content directly.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

/// Open a file, reporting a missing file with its path
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// The ml-1m dataset is not UTF-8. Every Latin-1 byte maps directly to the
/// Unicode code point of the same value.
fn read_latin1(path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    open(path)?.read_to_end(&mut bytes)?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Pull the next `::` field off a line or report which one is missing
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

/// Parse one field into a number, keeping file/line context on failure
fn parse_field<T>(value: &str, file: &str, line: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

// =============================================================================
// ml-1m .dat files
// =============================================================================

/// Parse the ratings.dat file
pub fn parse_ratings_dat(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings_dat_str(&read_latin1(path)?, &file_name(path))
}

/// Parse ratings.dat content: userId::movieId::rating::timestamp
pub fn parse_ratings_dat_str(content: &str, file: &str) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let user_id = next_field(&mut parts, file, line_no, "userId")?;
        let movie_id = next_field(&mut parts, file, line_no, "movieId")?;
        let rating_value = next_field(&mut parts, file, line_no, "rating")?;
        let timestamp = next_field(&mut parts, file, line_no, "timestamp")?;

        ratings.push(Rating {
            user_id: parse_field(user_id, file, line_no, "userId")?,
            movie_id: parse_field(movie_id, file, line_no, "movieId")?,
            rating: parse_field(rating_value, file, line_no, "rating")?,
            timestamp: parse_field(timestamp, file, line_no, "timestamp")?,
        });
    }
    Ok(ratings)
}

/// Parse the movies.dat file
pub fn parse_movies_dat(path: &Path) -> Result<Vec<Movie>> {
    parse_movies_dat_str(&read_latin1(path)?, &file_name(path))
}

/// Parse movies.dat content: movieId::title::genres
///
/// Genres stay pipe-separated; splitting them is the evaluator's job.
pub fn parse_movies_dat_str(content: &str, file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line_trimmed.split("::").collect();
        if parts.len() != 3 {
            return Err(DataLoadError::FieldCountMismatch {
                expected: 3,
                found: parts.len(),
                line: line_no,
            });
        }

        movies.push(Movie {
            id: parse_field(parts[0], file, line_no, "movieId")?,
            title: parts[1].to_string(),
            genres: parts[2].to_string(),
        });
    }
    Ok(movies)
}

// =============================================================================
// ml-latest-small .csv files
// =============================================================================

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    #[serde(default)]
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

/// Parse the ratings.csv file
pub fn parse_ratings_csv(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings_csv_reader(open(path)?, &file_name(path))
}

/// Parse ratings.csv content from any reader
pub fn parse_ratings_csv_reader(reader: impl Read, file: &str) -> Result<Vec<Rating>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<RatingRecord>()
        .map(|record| {
            let record = record.map_err(|source| DataLoadError::CsvError {
                file: file.to_string(),
                source,
            })?;
            Ok(Rating {
                user_id: record.user_id,
                movie_id: record.movie_id,
                rating: record.rating,
                timestamp: record.timestamp,
            })
        })
        .collect()
}

/// Parse the movies.csv file
pub fn parse_movies_csv(path: &Path) -> Result<Vec<Movie>> {
    parse_movies_csv_reader(open(path)?, &file_name(path))
}

/// Parse movies.csv content from any reader
pub fn parse_movies_csv_reader(reader: impl Read, file: &str) -> Result<Vec<Movie>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<MovieRecord>()
        .map(|record| {
            let record = record.map_err(|source| DataLoadError::CsvError {
                file: file.to_string(),
                source,
            })?;
            Ok(Movie {
                id: record.movie_id,
                title: record.title,
                genres: record.genres,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratings_dat() {
        let content = "1::1193::5::978300760\n\n1::661::3::978302109\n";
        let ratings = parse_ratings_dat_str(content, "ratings.dat").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], Rating { user_id: 1, movie_id: 1193, rating: 5.0, timestamp: 978300760 });
        assert_eq!(ratings[1].movie_id, 661);
    }

    #[test]
    fn test_parse_ratings_dat_missing_field() {
        let err = parse_ratings_dat_str("1::1193::5", "ratings.dat").unwrap_err();
        match err {
            DataLoadError::ParseError { line, reason, .. } => {
                assert_eq!(line, 1);
                assert_eq!(reason, "Missing timestamp");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_ratings_dat_bad_number() {
        let err = parse_ratings_dat_str("1::abc::5::0", "ratings.dat").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
    }

    #[test]
    fn test_parse_movies_dat_keeps_raw_genres() {
        let content = "1::Toy Story (1995)::Animation|Children's|Comedy\n";
        let movies = parse_movies_dat_str(content, "movies.dat").unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Toy Story (1995)");
        assert_eq!(movies[0].genres, "Animation|Children's|Comedy");
    }

    #[test]
    fn test_parse_movies_dat_field_count() {
        let err = parse_movies_dat_str("1::Toy Story (1995)", "movies.dat").unwrap_err();
        assert!(matches!(err, DataLoadError::FieldCountMismatch { expected: 3, found: 2, line: 1 }));
    }

    #[test]
    fn test_parse_ratings_csv() {
        let content = "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,0.5,964981247\n";
        let ratings = parse_ratings_csv_reader(content.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].movie_id, 3);
        assert_eq!(ratings[1].rating, 0.5);
    }

    #[test]
    fn test_parse_movies_csv_quoted_title() {
        let content = "movieId,title,genres\n11,\"American President, The (1995)\",Comedy|Drama|Romance\n";
        let movies = parse_movies_csv_reader(content.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies[0].id, 11);
        assert_eq!(movies[0].title, "American President, The (1995)");
        assert_eq!(movies[0].genres, "Comedy|Drama|Romance");
    }

    #[test]
    fn test_parse_ratings_csv_malformed() {
        let content = "userId,movieId,rating,timestamp\nx,1,4.0,1\n";
        let err = parse_ratings_csv_reader(content.as_bytes(), "ratings.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::CsvError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_ratings_csv(Path::new("/nonexistent/ratings.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
