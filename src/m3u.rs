//! Extended M3U document model
//!
//! Parses `#EXTINF` playlists into an editable in-memory form and renders
//! them back. Info lines are kept verbatim; the attribute helpers below do
//! targeted reads and rewrites on them.

/// Fallback header when the input carries none.
pub const DEFAULT_HEADER: &str = "#EXTM3U";

/// One channel: its verbatim `#EXTINF` line, the display name extracted from
/// it, and every stream URL listed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub info: String,
    pub name: String,
    pub urls: Vec<String>,
}

/// A whole playlist: the `#EXTM3U` header line plus channels in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub header: String,
    pub entries: Vec<Entry>,
}

impl Document {
    /// Parse playlist text. The first `#EXTM3U` line becomes the header, each
    /// `#EXTINF:` line opens a channel, and every following non-comment line
    /// is a stream URL of that channel. Other `#` directives are skipped.
    /// Channels that never receive a URL are kept.
    pub fn parse(content: &str) -> Document {
        let mut header = String::new();
        let mut entries: Vec<Entry> = Vec::new();
        let mut current: Option<Entry> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with("#EXTM3U") {
                if header.is_empty() {
                    header = line.to_string();
                }
            } else if line.starts_with("#EXTINF:") {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                current = Some(Entry {
                    info: line.to_string(),
                    name: display_name(line),
                    urls: Vec::new(),
                });
            } else if !line.starts_with('#') {
                if let Some(entry) = current.as_mut() {
                    entry.urls.push(line.to_string());
                }
            }
        }
        if let Some(entry) = current.take() {
            entries.push(entry);
        }

        if header.is_empty() {
            header = DEFAULT_HEADER.to_string();
        }
        Document { header, entries }
    }

    /// Render back to playlist text, newline-terminated.
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.header);
        output.push('\n');
        for entry in &self.entries {
            output.push_str(&entry.info);
            output.push('\n');
            for url in &entry.urls {
                output.push_str(url);
                output.push('\n');
            }
        }
        output
    }
}

/// Channel display name: the text after the last comma of an `#EXTINF` line.
/// Attribute values may themselves contain commas, so the first comma is not
/// a reliable separator.
pub fn display_name(info: &str) -> String {
    match info.rfind(',') {
        Some(pos) => info[pos + 1..].trim().to_string(),
        None => String::new(),
    }
}

/// Extract a double-quoted `key="value"` attribute from a header or info line.
pub fn attr(line: &str, key: &str) -> Option<String> {
    let search = format!("{}=\"", key);
    let start = line.find(&search)?;
    let rest = &line[start + search.len()..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Rewrite `key="..."` on an info line, or insert the attribute before the
/// display-name separator when it is absent.
pub fn set_attr(info: &str, key: &str, value: &str) -> String {
    let search = format!("{}=\"", key);
    if let Some(start) = info.find(&search) {
        let value_start = start + search.len();
        if let Some(len) = info[value_start..].find('"') {
            return format!(
                "{}{}{}",
                &info[..value_start],
                value,
                &info[value_start + len..]
            );
        }
    }
    match info.rfind(',') {
        Some(pos) => format!("{} {}=\"{}\"{}", &info[..pos], key, value, &info[pos..]),
        None => format!("{} {}=\"{}\"", info, key, value),
    }
}

/// Replace the display name after the last comma of an info line.
pub fn set_display_name(info: &str, name: &str) -> String {
    match info.rfind(',') {
        Some(pos) => format!("{},{}", &info[..pos], name),
        None => format!("{},{}", info, name),
    }
}
