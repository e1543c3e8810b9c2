//! EPUB packaging for a single extracted article.
//!
//! The container is EPUB 3 with an EPUB 2 NCX table of contents so that
//! older readers still find the chapter. Everything is assembled in memory.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::filename::{epub_filename, short_hash};
use crate::Article;

const MIMETYPE: &str = "application/epub+zip";
const LANGUAGE: &str = "en";
const UNKNOWN_AUTHOR: &str = "Unknown";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const STYLESHEET: &str = "body { font-family: Georgia, serif; line-height: 1.6; padding: 20px; }
h1 { margin-bottom: 10px; }
.meta { color: #666; font-size: 0.9em; margin-bottom: 20px; }
.content { text-align: justify; }
p { margin-bottom: 1em; }
";

#[derive(Debug, thiserror::Error)]
pub enum EpubError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A packaged book ready to be attached to a mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl EpubFile {
    pub const MEDIA_TYPE: &'static str = MIMETYPE;
}

/// Builds EPUB files; the clock is injectable so identifiers are testable.
pub struct EpubBuilder {
    now_millis: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl Default for EpubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp_millis())
    }

    pub fn with_clock(now_millis: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            now_millis: Box::new(now_millis),
        }
    }

    pub fn build(&self, article: &Article) -> Result<EpubFile, EpubError> {
        let identifier = format!(
            "kindle-sender-{}-{}",
            short_hash(&article.url),
            (self.now_millis)()
        );
        let modified = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        // The mimetype entry must come first and be stored uncompressed.
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE.as_bytes())?;

        let entries = [
            ("META-INF/container.xml", CONTAINER_XML.to_string()),
            (
                "OEBPS/content.opf",
                package_document(article, &identifier, &modified),
            ),
            ("OEBPS/nav.xhtml", nav_document(&article.title)),
            ("OEBPS/toc.ncx", ncx_document(&article.title, &identifier)),
            ("OEBPS/style.css", STYLESHEET.to_string()),
            ("OEBPS/content.xhtml", chapter_document(article)),
        ];
        for (name, body) in entries {
            zip.start_file(
                name,
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            )?;
            zip.write_all(body.as_bytes())?;
        }

        let bytes = zip.finish()?.into_inner();
        Ok(EpubFile {
            filename: epub_filename(&article.title),
            bytes,
        })
    }
}

fn package_document(article: &Article, identifier: &str, modified: &str) -> String {
    let creators = if article.authors.is_empty() {
        format!("    <dc:creator>{UNKNOWN_AUTHOR}</dc:creator>\n")
    } else {
        article
            .authors
            .iter()
            .map(|author| format!("    <dc:creator>{}</dc:creator>\n", escape_xml(author)))
            .collect()
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="book-id" xml:lang="{LANGUAGE}">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="book-id">{identifier}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:language>{LANGUAGE}</dc:language>
{creators}    <dc:source>{source}</dc:source>
    <meta property="dcterms:modified">{modified}</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="style" href="style.css" media-type="text/css"/>
    <item id="content" href="content.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="nav"/>
    <itemref idref="content"/>
  </spine>
</package>
"#,
        identifier = escape_xml(identifier),
        title = escape_xml(&article.title),
        source = escape_xml(&article.url),
    )
}

fn nav_document(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{LANGUAGE}">
<head><title>{title}</title></head>
<body>
  <nav epub:type="toc" id="toc">
    <ol>
      <li><a href="content.xhtml">{title}</a></li>
    </ol>
  </nav>
</body>
</html>
"#,
        title = escape_xml(title),
    )
}

fn ncx_document(title: &str, identifier: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{identifier}"/>
    <meta name="dtb:depth" content="1"/>
  </head>
  <docTitle><text>{title}</text></docTitle>
  <navMap>
    <navPoint id="content" playOrder="1">
      <navLabel><text>{title}</text></navLabel>
      <content src="content.xhtml"/>
    </navPoint>
  </navMap>
</ncx>
"#,
        identifier = escape_xml(identifier),
        title = escape_xml(title),
    )
}

fn chapter_document(article: &Article) -> String {
    let title = escape_xml(&article.title);
    let source = escape_xml(&article.url);

    let mut meta = format!("      <p>Source: <a href=\"{source}\">{source}</a></p>\n");
    if !article.authors.is_empty() {
        meta.push_str(&format!(
            "      <p>Authors: {}</p>\n",
            escape_xml(&article.authors.join(", "))
        ));
    }
    if let Some(date) = &article.publish_date {
        meta.push_str(&format!("      <p>Published: {}</p>\n", escape_xml(date)));
    }

    let body: String = article
        .paragraphs()
        .map(|para| format!("      <p>{}</p>\n", escape_xml(para)))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{LANGUAGE}">
<head>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="style.css"/>
</head>
<body>
  <h1>{title}</h1>
  <div class="meta">
{meta}  </div>
  <div class="content">
{body}  </div>
</body>
</html>
"#
    )
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0.
            c if c.is_control() && !matches!(c, '\n' | '\t' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}
