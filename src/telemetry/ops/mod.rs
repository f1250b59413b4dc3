pub mod scrape;
pub mod extract;
pub mod search;
pub mod sources;
