use std::sync::{Arc, Mutex};

use kindle_engine::{
    DeliveryPipeline, EpubBuilder, EpubFile, FailureKind, FetchError, FetchMetadata, FetchOutput,
    Fetcher, MailError, MailStatus, Mailer, PipelineError, ReadabilityLikeExtractor, UNTITLED,
};
use pretty_assertions::assert_eq;

struct StaticFetcher {
    html: Option<&'static str>,
}

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let Some(html) = self.html else {
            return Err(FetchError::new(FailureKind::HttpStatus(404), "404 Not Found"));
        };
        Ok(FetchOutput {
            bytes: html.as_bytes().to_vec(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: html.len() as u64,
            },
        })
    }
}

#[derive(Default)]
struct RecordingMailer {
    refuse: bool,
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    fn status(&self) -> MailStatus {
        MailStatus {
            kindle_configured: !self.refuse,
            smtp_configured: true,
        }
    }

    async fn send(&self, title: &str, epub: &EpubFile) -> Result<(), MailError> {
        if self.refuse {
            return Err(MailError::NotConfigured);
        }
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), epub.filename.clone()));
        Ok(())
    }
}

fn pipeline(html: Option<&'static str>, mailer: Arc<RecordingMailer>) -> DeliveryPipeline {
    DeliveryPipeline::new(
        Arc::new(StaticFetcher { html }),
        Arc::new(ReadabilityLikeExtractor),
        mailer,
    )
    .with_epub_builder(EpubBuilder::with_clock(|| 1))
}

const POST: &str = r#"<html><head><title>A Post</title></head>
<body><article><p>First.</p><p>Second one.</p></article></body></html>"#;

#[tokio::test]
async fn extract_joins_paragraphs_and_keeps_requested_url() {
    kindle_logging::initialize_for_tests();
    let pipeline = pipeline(Some(POST), Arc::default());
    let article = pipeline
        .extract_article("https://example.com/post")
        .await
        .unwrap();

    assert_eq!(article.title, "A Post");
    assert_eq!(article.text, "First.\n\nSecond one.");
    assert_eq!(article.url, "https://example.com/post");
    assert_eq!(article.word_count(), 3);
    assert!(article.html.contains("<article>"));
}

#[tokio::test]
async fn missing_title_falls_back_to_untitled() {
    let pipeline = pipeline(Some("<body><p>Just text.</p></body>"), Arc::default());
    let article = pipeline.extract_article("https://example.com").await.unwrap();
    assert_eq!(article.title, UNTITLED);
}

#[tokio::test]
async fn empty_page_is_an_extraction_error() {
    let pipeline = pipeline(Some("<html><body><script>x()</script></body></html>"), Arc::default());
    let err = pipeline.extract_article("https://example.com").await.unwrap_err();
    assert!(matches!(err, PipelineError::NoContent));
    assert!(err.is_extraction());
    assert_eq!(err.to_string(), "no readable content");
}

#[tokio::test]
async fn fetch_failure_is_an_extraction_error() {
    let pipeline = pipeline(None, Arc::default());
    let err = pipeline.send_url("https://example.com").await.unwrap_err();
    assert!(err.is_extraction());
    assert!(matches!(
        err,
        PipelineError::Fetch(FetchError {
            kind: FailureKind::HttpStatus(404),
            ..
        })
    ));
}

#[tokio::test]
async fn send_url_mails_the_packaged_article() {
    let mailer = Arc::new(RecordingMailer::default());
    let pipeline = pipeline(Some(POST), mailer.clone());

    let article = pipeline.send_url("https://example.com/post").await.unwrap();
    assert_eq!(article.title, "A Post");
    assert_eq!(
        *mailer.sent.lock().unwrap(),
        vec![("A Post".to_string(), "A Post.epub".to_string())]
    );
}

#[tokio::test]
async fn mail_failure_is_not_an_extraction_error() {
    let mailer = Arc::new(RecordingMailer {
        refuse: true,
        ..RecordingMailer::default()
    });
    let pipeline = pipeline(Some(POST), mailer);

    assert!(!pipeline.mail_status().is_complete());
    let err = pipeline.send_url("https://example.com/post").await.unwrap_err();
    assert!(matches!(err, PipelineError::Mail(MailError::NotConfigured)));
    assert!(!err.is_extraction());
}
