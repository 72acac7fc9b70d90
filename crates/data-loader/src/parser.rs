//! Parser for the movie CSV file.
//!
//! Expected header (extra columns are ignored):
//! `title, overview, release_date, homepage, vote_average, popularity, genres, spoken_languages`
//!
//! `genres` and `spoken_languages` hold a serialized list of objects with a
//! `name` field, e.g. `[{"id": 28, "name": "Action"}]`. Single-quoted
//! Python-literal cells (`[{'id': 28, 'name': 'Action'}]`) are accepted too.
//! Each of those cells is parsed on its own; a bad cell degrades to an empty
//! list and is logged, it never aborts the load.

use crate::error::{DataLoadError, Result};
use crate::types::{LoadReport, MovieRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Columns that must be present in the header
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "title",
    "overview",
    "release_date",
    "homepage",
    "vote_average",
    "popularity",
    "genres",
    "spoken_languages",
];

/// One CSV row before the list fields are parsed
#[derive(Debug, Deserialize)]
struct RawMovieRow {
    title: String,
    overview: String,
    release_date: String,
    homepage: String,
    vote_average: Option<f32>,
    popularity: Option<f32>,
    genres: String,
    spoken_languages: String,
}

/// Outcome of parsing one serialized name list.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNames {
    Names(Vec<String>),
    /// The cell could not be read as a list; carries the reason
    Unparsed(String),
}

impl ParsedNames {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, ParsedNames::Unparsed(_))
    }

    /// The parsed names, or an empty list for an unparsed cell
    pub fn into_names(self) -> Vec<String> {
        match self {
            ParsedNames::Names(names) => names,
            ParsedNames::Unparsed(_) => Vec::new(),
        }
    }
}

/// Parse a serialized list of `{"name": ...}` objects.
///
/// JSON is tried first, then JSON5, which covers single-quoted strings.
/// Elements without a string `name` are skipped. Anything that is not a
/// list (including an empty cell) is reported as unparsed with the JSON
/// error as the reason.
///
/// Example: `[{"id": 18, "name": "Drama"}]` -> `Names(["Drama"])`
pub fn parse_name_list(raw: &str) -> ParsedNames {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedNames::Unparsed("empty field".to_string());
    }

    let items = match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
        Ok(items) => items,
        Err(e) => match json5::from_str::<Vec<serde_json::Value>>(trimmed) {
            Ok(items) => items,
            Err(_) => return ParsedNames::Unparsed(e.to_string()),
        },
    };

    ParsedNames::Names(
        items
            .iter()
            .filter_map(|item| item.get("name")?.as_str().map(str::to_string))
            .collect(),
    )
}

/// Non-finite numbers (`nan`, `inf`) count as missing
fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}

/// Parse the movie CSV at `path`
pub fn parse_movies(path: &Path) -> Result<(Vec<MovieRecord>, LoadReport)> {
    let file = File::open(path).map_err(|source| DataLoadError::FileNotFound {
        path: path.display().to_string(),
        source,
    })?;
    parse_movies_from_reader(file)
}

/// Parse movie CSV content from any reader
pub fn parse_movies_from_reader<R: Read>(reader: R) -> Result<(Vec<MovieRecord>, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Check the header up front so a missing column is reported by name
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(DataLoadError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in reader.deserialize::<RawMovieRow>() {
        let raw = result.map_err(|e| DataLoadError::ParseError {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        // 1-based data row, header excluded
        let row = records.len() + 1;

        let genres = parse_name_list(&raw.genres);
        if let ParsedNames::Unparsed(reason) = &genres {
            warn!(row, field = "genres", %reason, "Unparseable list field, using empty list");
            report.unparsed_genres += 1;
        }

        let spoken_languages = parse_name_list(&raw.spoken_languages);
        if let ParsedNames::Unparsed(reason) = &spoken_languages {
            warn!(row, field = "spoken_languages", %reason, "Unparseable list field, using empty list");
            report.unparsed_languages += 1;
        }

        records.push(MovieRecord {
            title: raw.title,
            overview: raw.overview,
            release_date: raw.release_date,
            homepage: raw.homepage,
            vote_average: finite(raw.vote_average),
            popularity: finite(raw.popularity),
            genres: genres.into_names(),
            spoken_languages: spoken_languages.into_names(),
        });
    }

    report.rows = records.len();
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "budget,genres,homepage,overview,popularity,release_date,spoken_languages,title,vote_average\n";

    #[test]
    fn test_parse_name_list() {
        let parsed = parse_name_list(r#"[{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]"#);
        assert_eq!(
            parsed,
            ParsedNames::Names(vec!["Action".to_string(), "Adventure".to_string()])
        );
    }

    #[test]
    fn test_parse_name_list_single_quoted() {
        let parsed = parse_name_list("[{'id': 28, 'name': 'Action'}, {'id': 18, 'name': 'Drama'}]");
        assert_eq!(
            parsed,
            ParsedNames::Names(vec!["Action".to_string(), "Drama".to_string()])
        );
        assert!(parse_name_list("[{'name': 'Action'").is_unparsed());
    }

    #[test]
    fn test_parse_name_list_skips_entries_without_name() {
        let parsed = parse_name_list(r#"[{"id": 28}, {"name": "Drama"}, 7]"#);
        assert_eq!(parsed, ParsedNames::Names(vec!["Drama".to_string()]));
    }

    #[test]
    fn test_parse_name_list_empty_list() {
        assert_eq!(parse_name_list("[]"), ParsedNames::Names(vec![]));
    }

    #[test]
    fn test_parse_name_list_malformed() {
        assert!(parse_name_list("[{\"name\": \"Action\"").is_unparsed());
        assert!(parse_name_list("not a list").is_unparsed());
        assert!(parse_name_list("").is_unparsed());
        assert!(parse_name_list("{\"name\": \"Action\"}").is_unparsed());
        assert!(parse_name_list("garbage").into_names().is_empty());
    }

    #[test]
    fn test_parse_movies_reads_rows_in_order() {
        let csv = format!(
            "{HEADER}{}\n{}\n",
            r#"100,"[{""id"": 28, ""name"": ""Action""}]",http://a.example,First overview,12.5,2009-12-10,"[{""iso_639_1"": ""en"", ""name"": ""English""}]",Alpha,7.2"#,
            r#"200,"[{""id"": 18, ""name"": ""Drama""}, {""id"": 28, ""name"": ""Action""}]",,Second,3.0,2001-01-01,[],Beta,"#,
        );

        let (records, report) = parse_movies_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(report.rows, 2);
        assert_eq!(report.unparsed_genres, 0);

        assert_eq!(records[0].title, "Alpha");
        assert_eq!(records[0].genres, vec!["Action"]);
        assert_eq!(records[0].spoken_languages, vec!["English"]);
        assert_eq!(records[0].vote_average, Some(7.2));
        assert_eq!(records[0].popularity, Some(12.5));

        assert_eq!(records[1].title, "Beta");
        assert_eq!(records[1].genres, vec!["Drama", "Action"]);
        assert!(records[1].homepage.is_empty());
        assert_eq!(records[1].vote_average, None);
    }

    #[test]
    fn test_malformed_list_degrades_row() {
        let csv = format!(
            "{HEADER}{}\n",
            r#"1,"[{""name"": ""Action""",,Broken,1.0,2000-01-01,oops,Gamma,5.0"#,
        );

        let (records, report) = parse_movies_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].genres.is_empty());
        assert!(records[0].spoken_languages.is_empty());
        assert_eq!(report.unparsed_genres, 1);
        assert_eq!(report.unparsed_languages, 1);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "title,overview,release_date,homepage,vote_average,popularity,genres\nA,o,2000,,5.0,1.0,[]\n";
        let err = parse_movies_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(ref c) if c == "spoken_languages"));
    }

    #[test]
    fn test_non_numeric_vote_is_fatal() {
        let csv = format!("{HEADER}1,[],,o,1.0,2000,[],A,high\n");
        let err = parse_movies_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
    }

    #[test]
    fn test_non_finite_numbers_are_missing() {
        let csv = format!("{HEADER}1,[],,o,inf,2000,[],A,nan\n2,[],,o,-inf,2000,[],B,NaN\n3,[],,o,4.5,2000,[],C,6.0\n");
        let (records, _) = parse_movies_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records[0].vote_average, None);
        assert_eq!(records[0].popularity, None);
        assert_eq!(records[1].vote_average, None);
        assert_eq!(records[1].popularity, None);
        assert_eq!(records[2].vote_average, Some(6.0));
        assert_eq!(records[2].popularity, Some(4.5));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
