//! Static site assembly
//!
//! Layout of one clone:
//!
//! ```text
//! <output root>/cloned-<unix millis>/site/
//!     index.html         gallery of captured pages
//!     page-1.html        wrapper around the first record's HTML
//!     screenshot-1.png   copied only if the crawl wrote it
//!     ...
//! ```

use crate::crawler::CrawlResult;
use crate::output::{AssembleError, OutputResult};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Gallery page name inside the site directory
pub const INDEX_FILE: &str = "index.html";

const SITE_DIR: &str = "site";

/// Where an assembled clone was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledSite {
    /// The `cloned-<ts>` directory
    pub root_path: PathBuf,

    /// Site directory relative to the output root, always `/`-separated
    pub site_dir_name: String,

    /// Gallery page relative to the output root
    pub preview_relative_path: String,
}

/// One generated page as listed in the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub file_name: String,
    pub url: String,
    pub screenshot: Option<String>,
}

/// Writes `result` as a static site under a fresh directory in `output_root`
///
/// Records keep their crawl order; record *i* becomes `page-i.html`.
/// Screenshots that are missing or fail to copy are left out of the site.
pub fn assemble(result: &CrawlResult, output_root: &Path) -> OutputResult<AssembledSite> {
    let (dir_name, root_path) = create_clone_dir(output_root)?;
    let site_dir = root_path.join(SITE_DIR);
    fs::create_dir_all(&site_dir).map_err(|source| AssembleError::CreateDir {
        path: site_dir.display().to_string(),
        source,
    })?;

    let mut entries = Vec::with_capacity(result.records.len());
    for (i, record) in result.records.iter().enumerate() {
        let index = i + 1;
        let file_name = format!("page-{}.html", index);
        let screenshot_name = format!("screenshot-{}.png", index);

        let screenshot = copy_screenshot(record.screenshot_path(), &site_dir.join(&screenshot_name))
            .then_some(screenshot_name);

        fs::write(
            site_dir.join(&file_name),
            render_page(index, record.url(), record.html()),
        )?;

        entries.push(PageEntry {
            file_name,
            url: record.url().to_string(),
            screenshot,
        });
    }

    fs::write(
        site_dir.join(INDEX_FILE),
        render_index(&result.start_url, &entries),
    )?;

    let site_dir_name = format!("{}/{}", dir_name, SITE_DIR);
    tracing::info!(
        "Assembled {} pages into {}",
        entries.len(),
        site_dir.display()
    );

    Ok(AssembledSite {
        root_path,
        preview_relative_path: format!("{}/{}", site_dir_name, INDEX_FILE),
        site_dir_name,
    })
}

/// Creates `cloned-<unix millis>`, bumping the stamp if a concurrent clone
/// already claimed it
fn create_clone_dir(output_root: &Path) -> OutputResult<(String, PathBuf)> {
    fs::create_dir_all(output_root).map_err(|source| AssembleError::CreateDir {
        path: output_root.display().to_string(),
        source,
    })?;

    let mut stamp = chrono::Utc::now().timestamp_millis();
    loop {
        let name = format!("cloned-{}", stamp);
        let path = output_root.join(&name);
        match fs::create_dir(&path) {
            Ok(()) => return Ok((name, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => stamp += 1,
            Err(source) => {
                return Err(AssembleError::CreateDir {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

/// Returns true if the screenshot now exists at `dest`
fn copy_screenshot(src: &Path, dest: &Path) -> bool {
    if !src.is_file() {
        tracing::debug!("No screenshot at {}", src.display());
        return false;
    }

    match fs::copy(src, dest) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Screenshot copy from {} failed: {}", src.display(), e);
            false
        }
    }
}

/// Wraps captured HTML in a page with a back link to the gallery
///
/// The captured markup is embedded as-is; only the source URL is escaped.
pub fn render_page(index: usize, url: &str, captured_html: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Cloned - {index}</title>
  <style>
    body {{ font-family: system-ui,Segoe UI,Arial; margin:0; padding:12px; }}
    .meta {{ margin-bottom:12px; }}
    .captured-html img {{ max-width:100%; height:auto; }}
  </style>
</head>
<body>
  <div class="meta">
    <a href="./{index_file}">&larr; Back</a> | Source: <strong>{url}</strong>
  </div>
  <div class="captured-html">
{captured_html}
  </div>
</body>
</html>
"#,
        index = index,
        index_file = INDEX_FILE,
        url = escape_html(url),
        captured_html = captured_html,
    )
}

/// Builds the gallery page; tiles get a thumbnail only when one was copied
pub fn render_index(start_url: &str, entries: &[PageEntry]) -> String {
    let tiles = entries
        .iter()
        .map(|entry| {
            let thumbnail = entry
                .screenshot
                .as_deref()
                .map(|shot| {
                    format!(
                        r#"<img src="{}" style="width:240px;height:auto;border:1px solid #ddd;">"#,
                        escape_html(shot)
                    )
                })
                .unwrap_or_default();

            format!(
                r#"    <div style="display:inline-block;margin:12px;text-align:center;">
      <a href="{href}" style="text-decoration:none;color:inherit;">
        {thumbnail}<div style="margin-top:8px;max-width:240px;overflow:hidden;text-overflow:ellipsis">{url}</div>
      </a>
    </div>"#,
                href = escape_html(&entry.file_name),
                thumbnail = thumbnail,
                url = escape_html(&entry.url),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Generated Clone Preview</title>
</head>
<body style="font-family:system-ui,Segoe UI,Arial;padding:18px;">
  <h1>Generated Clone Preview</h1>
  <p>Source: <strong>{start_url}</strong></p>
  <div>
{tiles}
  </div>
</body>
</html>
"#,
        start_url = escape_html(start_url),
        tiles = tiles,
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
