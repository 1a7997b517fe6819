// Scraping: fetch one page and pull the text of matching elements.

pub mod extract;
pub mod fetch;
