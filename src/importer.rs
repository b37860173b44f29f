use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::ShelfError;
use crate::model::{Author, BookDraft};

/// One page of the external catalog feed
#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    works: Vec<CatalogWork>,
}

#[derive(Debug, Deserialize)]
struct CatalogWork {
    title: String,
    #[serde(default)]
    authors: Vec<CatalogAuthor>,
}

#[derive(Debug, Deserialize)]
struct CatalogAuthor {
    name: String,
}

/// Fetches a bounded batch of works from the external catalog
///
/// Uses a blocking client, call from `spawn_blocking` when inside the
/// server runtime. The fetch is all-or-nothing: any transport or decode
/// failure fails the whole import.
pub struct CatalogImporter {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl CatalogImporter {
    pub fn new(config: &Config) -> Result<Self, ShelfError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.import_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.catalog_endpoint(),
        })
    }

    /// Fetch one batch of works, mapped to drafts in source order
    pub fn fetch_works(&self) -> Result<Vec<BookDraft>, ShelfError> {
        let response = self.client.get(self.endpoint.clone()).send()?;

        if !response.status().is_success() {
            return Err(ShelfError::CatalogStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.text()?;
        let page: CatalogPage = serde_json::from_str(&body)?;

        Ok(page.works.into_iter().map(draft_from_work).collect())
    }
}

/// Map a catalog work to a draft
///
/// The catalog exposes a single display name per author; it lands in
/// `firstname` and `lastname` stays empty.
fn draft_from_work(work: CatalogWork) -> BookDraft {
    let firstname = work
        .authors
        .into_iter()
        .next()
        .map(|a| a.name)
        .unwrap_or_default();

    BookDraft {
        title: work.title,
        author: Author {
            firstname,
            lastname: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"{
        "key": "/subjects/literature",
        "subject_type": "subject",
        "work_count": 22384,
        "works": [
            {
                "key": "/works/OL21177W",
                "title": "Wuthering Heights",
                "authors": [{"name": "Emily Brontë"}, {"name": "Someone Else"}]
            },
            {
                "key": "/works/OL00000W",
                "title": "Anonymous Epic",
                "authors": []
            }
        ]
    }"#;

    fn sample_drafts() -> Vec<BookDraft> {
        let page: CatalogPage = serde_json::from_str(SAMPLE_PAGE).unwrap();
        page.works.into_iter().map(draft_from_work).collect()
    }

    #[test]
    fn test_mapping_takes_first_author() {
        let drafts = sample_drafts();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Wuthering Heights");
        assert_eq!(drafts[0].author.firstname, "Emily Brontë");
        assert_eq!(drafts[0].author.lastname, "");
    }

    #[test]
    fn test_mapping_tolerates_missing_authors() {
        let drafts = sample_drafts();

        assert_eq!(drafts[1].title, "Anonymous Epic");
        assert_eq!(drafts[1].author, Author::default());
    }

    #[test]
    fn test_decode_failure_is_atomic() {
        // Valid first item, truncated second: the whole page fails to decode
        let truncated = r#"{"works": [{"title": "Wuthering Heights"}, {"title""#;
        assert!(serde_json::from_str::<CatalogPage>(truncated).is_err());
    }

    #[test]
    fn test_page_without_works_is_empty() {
        let page: CatalogPage = serde_json::from_str(r#"{"key": "/subjects/literature"}"#).unwrap();
        assert!(page.works.is_empty());
    }
}
