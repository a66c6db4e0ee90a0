mod search;
pub use self::search::SearchQuery;
