//! State for the interactive `browse` command.
//!
//! The core is stateless; this is the caller side that owns the cursor and
//! the list of everything shown so far.

use pipeline::PageCursor;
use recommender::{RecommendationItem, RecommendationPage};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Show the next page
    Next,
    /// Back to the first page
    Reset,
    /// Switch genre and start from the top
    Genre(String),
    Genres,
    History,
    Help,
    Quit,
}

impl BrowseCommand {
    /// `None` for blank or unrecognised input
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "n" | "next" | "more" => Some(Self::Next),
            "r" | "reset" => Some(Self::Reset),
            "g" | "genre" if !rest.is_empty() => Some(Self::Genre(rest.to_string())),
            "genres" => Some(Self::Genres),
            "h" | "history" => Some(Self::History),
            "?" | "help" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub struct BrowseSession {
    genre: Option<String>,
    cursor: PageCursor,
    history: Vec<RecommendationItem>,
}

impl BrowseSession {
    pub fn new(cursor: PageCursor) -> Self {
        Self {
            genre: None,
            cursor,
            history: Vec::new(),
        }
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn select_genre(&mut self, genre: impl Into<String>) {
        self.genre = Some(genre.into());
        self.cursor.reset();
    }

    pub fn advance(&mut self) {
        self.cursor.advance();
    }

    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// Remember every item of a page that was shown
    pub fn record(&mut self, page: &RecommendationPage) {
        self.history.extend(page.items.iter().cloned());
    }

    pub fn history(&self) -> &[RecommendationItem] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::Metrics;

    fn item(title: &str) -> RecommendationItem {
        RecommendationItem {
            row: 0,
            title: title.to_string(),
            poster_url: None,
            release_date: String::new(),
            genres: "Action".into(),
            homepage: String::new(),
            spoken_languages: String::new(),
            overview: String::new(),
            score: 0.5,
        }
    }

    fn page(titles: &[&str]) -> RecommendationPage {
        RecommendationPage {
            genre: "Action".into(),
            items: titles.iter().map(|t| item(t)).collect(),
            metrics: Metrics::default(),
            offset: 0,
            total_matches: titles.len(),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(BrowseCommand::parse("n"), Some(BrowseCommand::Next));
        assert_eq!(BrowseCommand::parse("  MORE "), Some(BrowseCommand::Next));
        assert_eq!(BrowseCommand::parse("reset"), Some(BrowseCommand::Reset));
        assert_eq!(
            BrowseCommand::parse("genre Science Fiction"),
            Some(BrowseCommand::Genre("Science Fiction".into()))
        );
        assert_eq!(BrowseCommand::parse("genres"), Some(BrowseCommand::Genres));
        assert_eq!(BrowseCommand::parse("h"), Some(BrowseCommand::History));
        assert_eq!(BrowseCommand::parse("q"), Some(BrowseCommand::Quit));
        assert_eq!(BrowseCommand::parse("g"), None);
        assert_eq!(BrowseCommand::parse(""), None);
        assert_eq!(BrowseCommand::parse("dance"), None);
    }

    #[test]
    fn test_selecting_genre_resets_cursor() {
        let mut session = BrowseSession::new(PageCursor::new(5));
        session.select_genre("Action");
        session.advance();
        session.advance();
        assert_eq!(session.cursor().offset(), 10);

        session.select_genre("Drama");
        assert_eq!(session.genre(), Some("Drama"));
        assert_eq!(session.cursor().offset(), 0);
    }

    #[test]
    fn test_history_keeps_every_shown_item() {
        let mut session = BrowseSession::new(PageCursor::new(2));
        session.record(&page(&["Heat", "Speed"]));
        session.record(&page(&["Ronin"]));
        session.reset();
        session.record(&page(&["Heat", "Speed"]));

        let titles: Vec<&str> = session.history().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Speed", "Ronin", "Heat", "Speed"]);
    }
}
