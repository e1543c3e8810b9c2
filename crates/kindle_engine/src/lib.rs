//! Kindle Sender engine: fetching, extraction, EPUB packaging, mailing,
//! the article queue, and the client side of the HTTP contract.
mod client;
mod decode;
mod epub;
mod extract;
mod fetch;
mod filename;
mod mail;
mod persist;
mod pipeline;
mod queue;
mod store;
mod types;
pub mod wire;

pub use client::{ApiReply, ClientError, ClientSettings, ReqwestServerClient, ServerClient};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use epub::{EpubBuilder, EpubError, EpubFile};
pub use extract::{ExtractedContent, Extractor, ReadabilityLikeExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{epub_filename, short_hash};
pub use mail::{MailError, MailSettings, MailStatus, Mailer, SmtpMailer, INCOMPLETE_CONFIGURATION};
pub use persist::{ensure_dir, write_atomic, PersistError};
pub use pipeline::{DeliveryPipeline, PipelineError};
pub use queue::{ArticleQueue, EntryId, QueueEntry};
pub use store::{default_settings_path, FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use types::{Article, FailureKind, FetchError, FetchMetadata, FetchOutput, UNTITLED};
