use std::time::Duration;

use loadkit_core::{ContentComparable, LoadError, PageSize};
use loadkit_engine::PageSource;

/// One catalogue entry. Identity is the id; the title is its content.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: usize,
    pub title: String,
}

impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl ContentComparable for Article {
    fn content_matches(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

/// Simulated remote catalogue serving fixed articles with some latency.
#[derive(Debug, Clone)]
pub struct Catalogue {
    articles: Vec<Article>,
    latency: Duration,
}

impl Catalogue {
    pub fn new(size: usize, latency: Duration) -> Self {
        let articles = (0..size)
            .map(|id| Article {
                id,
                title: format!("Article #{}", id + 1),
            })
            .collect();
        Self { articles, latency }
    }
}

#[async_trait::async_trait]
impl PageSource<Article> for Catalogue {
    async fn load_page(&self, page: usize, page_size: PageSize) -> Result<Vec<Article>, LoadError> {
        tokio::time::sleep(self.latency).await;
        let start = page.saturating_mul(page_size.get());
        Ok(self
            .articles
            .iter()
            .skip(start)
            .take(page_size.get())
            .cloned()
            .collect())
    }
}
