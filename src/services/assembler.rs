// src/services/assembler.rs

//! Document assembler service.
//!
//! Streams the table of contents and every country fragment into a single
//! HTML document. Countries are emitted in lexicographic name order, which is
//! the order `CountryDirectory` iterates in.

use std::path::Path;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::error::Result;
use crate::models::{CountryDirectory, CountryRecord};
use crate::services::advisory::strip_residual_tags;
use crate::storage::FragmentSource;
use crate::utils::fs::ensure_parent;

/// Opens the document and the table of contents list.
const PREAMBLE: &str = concat!(
    "<!DOCTYPE html><html><head><meta charset='utf-8'>",
    "<style type='text/css'>.toc { page-break-after: always; text-indent: 0em; }</style>",
    "</head><body><h1>Table of Contents</h1><ul id='toc'>",
);

const TOC_END: &str = "</ul>\n";

const DOCUMENT_END: &str = "</body></html>";

/// Class the converter looks for when building its chapter list.
pub const CHAPTER_CLASS: &str = "chapter";

/// Merges cached fragments into one document.
pub struct DocumentAssembler<'a> {
    fragments: &'a dyn FragmentSource,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(fragments: &'a dyn FragmentSource) -> Self {
        Self { fragments }
    }

    /// Write the merged document for `directory` into `out`.
    ///
    /// Fragments are read one at a time. A missing fragment aborts with
    /// `AppError::MissingFragment`.
    pub async fn assemble<W>(&self, directory: &CountryDirectory, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        out.write_all(table_of_contents(directory).as_bytes()).await?;

        for record in directory {
            let fragment = self.fragments.read_fragment(record).await?;
            out.write_all(chapter_heading(record).as_bytes()).await?;
            out.write_all(strip_residual_tags(&fragment).as_bytes())
                .await?;
            log::debug!("Appended {}", record.name);
        }

        out.write_all(DOCUMENT_END.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }

    /// Assemble into `path`.
    ///
    /// Output goes to a temporary sibling that is renamed on success and
    /// removed on failure, so a failed run never leaves a partial document.
    pub async fn assemble_to_file(&self, directory: &CountryDirectory, path: &Path) -> Result<()> {
        ensure_parent(path).await?;
        let tmp = path.with_extension("tmp");

        let result = async {
            let file = tokio::fs::File::create(&tmp).await?;
            let mut writer = BufWriter::new(file);
            self.assemble(directory, &mut writer).await
        }
        .await;

        match result {
            Ok(()) => {
                tokio::fs::rename(&tmp, path).await?;
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                    log::debug!("Could not remove {}: {}", tmp.display(), cleanup);
                }
                Err(e)
            }
        }
    }
}

/// Document preamble plus one table of contents entry per country.
pub fn table_of_contents(directory: &CountryDirectory) -> String {
    let mut html = String::from(PREAMBLE);
    for record in directory {
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a> (Issued: {})</li>",
            escape_html(&record.safe_name),
            escape_html(&record.name),
            escape_html(record.issue_date_display())
        ));
    }
    html.push_str(TOC_END);
    html
}

/// Chapter heading anchoring a country's section.
pub fn chapter_heading(record: &CountryRecord) -> String {
    format!(
        "<h1 class='{}' id='{}'>{}</h1>\n",
        CHAPTER_CLASS,
        escape_html(&record.safe_name),
        escape_html(&record.name)
    )
}

/// Escape for HTML text and for single- or double-quoted attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
