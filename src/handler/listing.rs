//! Directory listing page

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const HREF_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Directory, or a symlink pointing at one
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown to the user: `dir/`, `link@`, `file`
    pub fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target; directories keep their trailing slash
    pub fn href(&self) -> String {
        let encoded = utf8_percent_encode(&self.name, HREF_SAFE).to_string();
        if self.is_dir {
            encoded + "/"
        } else {
            encoded
        }
    }
}

/// Read the immediate children of `dir`, sorted case-insensitively
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut items = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_dir())
        } else {
            file_type.is_dir()
        };

        items.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    items.sort_by_cached_key(|item| item.name.to_lowercase());
    Ok(items)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!(
        "Directory listing for {}",
        html_escape::encode_text(display_path)
    );

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{title}</title>");
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "<h1>{title}</h1>");
    page.push_str("<hr>\n<ul>\n");

    for entry in entries {
        let _ = writeln!(
            page,
            "<li><a href=\"{}\">{}</a></li>",
            html_escape::encode_double_quoted_attribute(&entry.href()),
            html_escape::encode_text(&entry.display_name()),
        );
    }

    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}
