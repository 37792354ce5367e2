use serde::{Deserialize, Serialize};

/// Sentinel external identifier meaning "no poster lookup possible"
pub const UNKNOWN_EXTERNAL_ID: i64 = -1;

/// One catalog entry
///
/// `position` is assigned by catalog load order and doubles as the
/// row/column coordinate into the similarity matrix. It is never
/// reassigned after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub title: String,
    /// TMDB identifier, or [`UNKNOWN_EXTERNAL_ID`] when the catalog
    /// carries none
    pub external_id: i64,
    pub position: usize,
}

/// Raw catalog artifact row
///
/// The catalog is a JSON array of these records; row order defines
/// position. `title` is required, `id` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl MovieRecord {
    /// Binds a raw record to its catalog position
    pub fn into_movie(self, position: usize) -> Movie {
        Movie {
            title: self.title,
            external_id: self.id.unwrap_or(UNKNOWN_EXTERNAL_ID),
            position,
        }
    }
}

/// A single ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    /// Raw similarity score against the query movie
    pub score: f32,
    pub external_id: i64,
}

/// TMDB movie details response, reduced to the field we consume
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_into_movie_with_id() {
        let record = MovieRecord {
            title: "Inception".to_string(),
            id: Some(27205),
        };

        let movie = record.into_movie(3);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.external_id, 27205);
        assert_eq!(movie.position, 3);
    }

    #[test]
    fn test_record_into_movie_without_id() {
        let record = MovieRecord {
            title: "Obscure Film".to_string(),
            id: None,
        };

        let movie = record.into_movie(0);
        assert_eq!(movie.external_id, UNKNOWN_EXTERNAL_ID);
    }

    #[test]
    fn test_record_deserialization_null_id() {
        let json = r#"{"title": "The Matrix", "id": null}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "The Matrix");
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_record_deserialization_missing_title() {
        let json = r#"{"id": 603}"#;
        let result: Result<MovieRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_tmdb_details_with_poster() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "poster_path": "/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg",
            "vote_average": 8.4
        }"#;

        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(
            details.poster_path,
            Some("/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg".to_string())
        );
    }

    #[test]
    fn test_tmdb_details_without_poster() {
        let json = r#"{"id": 27205, "poster_path": null}"#;
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.poster_path, None);
    }
}
