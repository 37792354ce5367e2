use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::{Movie, MovieRecord};

/// Ordered movie catalog, loaded once at startup and immutable afterwards
#[derive(Debug)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Loads the catalog from a JSON table artifact
    ///
    /// Row order defines each movie's position. A record without the
    /// required `title` field fails the whole load.
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let records: Vec<MovieRecord> = serde_json::from_reader(reader).map_err(|e| {
            AppError::DataFormat(format!("invalid catalog {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_records(records);

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Builds a catalog from raw records, assigning positions by order
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let movies = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| record.into_movie(position))
            .collect();

        Self { movies }
    }

    /// Returns the first catalog entry whose title exactly matches
    ///
    /// Lookup is case-sensitive with no fuzzy matching. When titles are
    /// duplicated, only the lowest-position entry is reachable by title.
    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.title == title)
    }

    /// Returns the movie at a given position
    pub fn by_position(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    /// All titles in catalog load order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|movie| movie.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
