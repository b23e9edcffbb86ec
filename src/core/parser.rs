//! Catalogue page parsing.
//!
//! The markup contract: every book sits in a repeated container; a nested
//! link carries the title in its `title` attribute, a price element carries
//! the currency text, and the rating element's class list is
//! `star-rating <Label>`. The second class token is taken as the rating label
//! verbatim, whatever it is.

use crate::domain::model::{BookRecord, NO_RATING};
use crate::domain::ports::SelectorSet;
use crate::utils::error::Result;
use crate::utils::validation::validate_selector;
use scraper::{ElementRef, Html, Selector};

pub struct CatalogueParser {
    book: Selector,
    title_link: Selector,
    price: Selector,
    rating: Selector,
}

impl CatalogueParser {
    pub fn new(selectors: &SelectorSet) -> Result<Self> {
        Ok(Self {
            book: validate_selector("book", &selectors.book)?,
            title_link: validate_selector("title_link", &selectors.title_link)?,
            price: validate_selector("price", &selectors.price)?,
            rating: validate_selector("rating", &selectors.rating)?,
        })
    }

    /// Returns every complete listing in document order, duplicates included.
    pub fn parse(&self, html: &str) -> Vec<BookRecord> {
        let document = Html::parse_document(html);
        let mut books = Vec::new();

        for (index, element) in document.select(&self.book).enumerate() {
            match self.parse_book(element) {
                Some(book) => books.push(book),
                None => tracing::debug!("Skipping incomplete listing at position {}", index),
            }
        }

        books
    }

    fn parse_book(&self, element: ElementRef<'_>) -> Option<BookRecord> {
        let title = element
            .select(&self.title_link)
            .next()
            .and_then(|link| link.value().attr("title"))
            .unwrap_or_default();

        let price = element
            .select(&self.price)
            .next()
            .map(|node| node.text().collect::<String>())
            .unwrap_or_default();

        let rating = element
            .select(&self.rating)
            .next()
            .map(|node| rating_label(node.value().attr("class").unwrap_or_default()))
            .unwrap_or(NO_RATING);

        BookRecord::new(title, &price, rating)
    }
}

/// Second token of a class attribute, in source order.
fn rating_label(class_attr: &str) -> &str {
    class_attr.split_whitespace().nth(1).unwrap_or(NO_RATING)
}
