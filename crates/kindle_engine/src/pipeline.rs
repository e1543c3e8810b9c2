use std::sync::Arc;

use kindle_logging::{kindle_debug, kindle_info, kindle_warn};

use crate::decode::{decode_html, DecodeError};
use crate::epub::{EpubBuilder, EpubError, EpubFile};
use crate::extract::{Extractor, ReadabilityLikeExtractor};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::mail::{MailError, MailSettings, MailStatus, Mailer, SmtpMailer};
use crate::{Article, FetchError, UNTITLED};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("no readable content")]
    NoContent,
    #[error("Failed to create EPUB: {0}")]
    Epub(#[from] EpubError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl PipelineError {
    /// Fetch, decode and extraction failures; the article never existed.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            PipelineError::Fetch(_) | PipelineError::Decode(_) | PipelineError::NoContent
        )
    }
}

/// Fetch → decode → extract → package → mail.
pub struct DeliveryPipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    mailer: Arc<dyn Mailer>,
    epub: EpubBuilder,
}

impl DeliveryPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            mailer,
            epub: EpubBuilder::new(),
        }
    }

    /// Production wiring: reqwest fetcher, scraper extractor, SMTP mailer.
    pub fn from_settings(fetch: FetchSettings, mail: MailSettings) -> Self {
        Self::new(
            Arc::new(ReqwestFetcher::new(fetch)),
            Arc::new(ReadabilityLikeExtractor),
            Arc::new(SmtpMailer::new(mail)),
        )
    }

    pub fn with_epub_builder(mut self, epub: EpubBuilder) -> Self {
        self.epub = epub;
        self
    }

    pub fn mail_status(&self) -> MailStatus {
        self.mailer.status()
    }

    pub async fn extract_article(&self, url: &str) -> Result<Article, PipelineError> {
        let output = self.fetcher.fetch(url).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref())?;
        kindle_debug!(
            "Decoded {} as {}",
            output.metadata.final_url,
            decoded.encoding_label
        );

        let extracted = self
            .extractor
            .extract(&decoded.html, Some(&output.metadata.final_url));
        let text = extracted.paragraphs.join("\n\n");
        if text.trim().is_empty() {
            kindle_warn!("No readable content at {}", url);
            return Err(PipelineError::NoContent);
        }

        let title = extracted
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Ok(Article {
            title,
            authors: extracted.authors,
            publish_date: extracted.publish_date,
            text,
            html: decoded.html,
            top_image: extracted.top_image,
            url: url.to_string(),
        })
    }

    pub fn package(&self, article: &Article) -> Result<EpubFile, PipelineError> {
        Ok(self.epub.build(article)?)
    }

    /// Packages and mails an already extracted article.
    pub async fn deliver(&self, article: &Article) -> Result<(), PipelineError> {
        let epub = self.package(article)?;
        self.mailer.send(&article.title, &epub).await?;
        kindle_info!("Delivered \"{}\" ({})", article.title, article.url);
        Ok(())
    }

    /// Runs every stage for `url` and returns the delivered article.
    pub async fn send_url(&self, url: &str) -> Result<Article, PipelineError> {
        let article = self.extract_article(url).await?;
        self.deliver(&article).await?;
        Ok(article)
    }
}
