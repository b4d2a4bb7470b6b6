//! Persistence of extracted articles.
//!
//! # Submodules
//!
//! - [`json`]: one pretty-printed JSON file per article
//! - [`text`]: optional plain-text rendition of the same record
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── dua-jenis-bakteri.json
//! ├── dua-jenis-bakteri.txt    # --text
//! └── dua-jenis-bakteri.html   # --save-html
//! ```

pub mod json;
pub mod text;

use crate::models::ArticleRecord;
use crate::utils::slug_from_url;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Writes each record (and optional companions) under one directory.
#[derive(Debug)]
pub struct ArticleWriter {
    output_dir: PathBuf,
    write_text: bool,
    save_html: bool,
    used_stems: HashMap<String, usize>,
}

impl ArticleWriter {
    pub fn new(output_dir: impl Into<PathBuf>, write_text: bool, save_html: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_text,
            save_html,
            used_stems: HashMap::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File stem for `url`, suffixed `-2`, `-3`, ... when already used in this run.
    pub fn stem_for(&mut self, url: &str) -> String {
        let base = slug_from_url(url);
        let seen = self.used_stems.entry(base.clone()).or_insert(0);
        *seen += 1;
        if *seen == 1 { base } else { format!("{base}-{seen}") }
    }

    /// Persist one record, returning the JSON path.
    ///
    /// Companion files go first; the JSON exists only if all of them were written.
    #[instrument(level = "info", skip_all, fields(url = %record.url))]
    pub async fn save(&mut self, record: &ArticleRecord, raw_html: Option<&str>) -> Result<PathBuf, Box<dyn Error>> {
        let stem = self.stem_for(&record.url);
        fs::create_dir_all(&self.output_dir).await?;

        if self.write_text {
            let text_path = self.output_dir.join(format!("{stem}.txt"));
            text::write_article(record, &text_path).await?;
        }

        if let (true, Some(html)) = (self.save_html, raw_html) {
            let html_path = self.output_dir.join(format!("{stem}.html"));
            fs::write(&html_path, html).await?;
            info!(path = %html_path.display(), "Saved raw HTML");
        }

        let json_path = self.output_dir.join(format!("{stem}.json"));
        json::write_article(record, &json_path).await?;
        Ok(json_path)
    }
}
