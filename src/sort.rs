//! Keyword-driven URL ordering and conditional renaming within a playlist
//!
//! Sort mode reorders each channel's stream URLs by keyword preference so
//! players try the preferred mirrors first. Rename mode rewrites channel
//! names or `group-title` attributes on matching channels instead; when a
//! rename flag is present, URL sorting is suppressed.

use log::info;

use crate::m3u::{self, Document};

#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    /// URL keywords in preference order.
    pub keywords: Vec<String>,
    /// Put keyword matches last instead of first.
    pub reverse: bool,
    /// Only touch channels whose info line contains one of these.
    pub channels: Vec<String>,
    /// Only touch channels whose group-title contains one of these.
    pub groups: Vec<String>,
    /// New display name for channels matching both `channels` and `keywords`.
    pub rename_channel: Option<String>,
    /// New group for channels whose group matches `groups`.
    pub rename_group: Option<String>,
    /// Reorder whole channels so matched groups come first.
    pub group_sort: bool,
}

/// Case-insensitive substring check without allocation.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Preference score of one URL. Lines without a scheme sink to the end;
/// keyword hits sort before (or, reversed, after) unmatched URLs, earlier
/// keywords first.
fn url_score(url: &str, keywords: &[String], reverse: bool) -> i64 {
    if !url.contains("://") {
        return 9999;
    }
    for (index, keyword) in keywords.iter().enumerate() {
        if contains_ignore_case(url, keyword) {
            return if reverse {
                index as i64 + 1
            } else {
                index as i64 - keywords.len() as i64
            };
        }
    }
    0
}

/// Score of a whole channel for `--group-sort`: matched groups first, in
/// filter-list order.
fn group_score(group: &str, groups: &[String]) -> i64 {
    for (index, wanted) in groups.iter().enumerate() {
        if contains_ignore_case(group, wanted) {
            return index as i64 - groups.len() as i64;
        }
    }
    0
}

/// Whether `--rename-group` applies to a channel, given which of the extra
/// filters were supplied and which matched.
fn group_rename_applies(opts: &SortOptions, name_match: bool, url_match: bool) -> bool {
    match (opts.keywords.is_empty(), opts.channels.is_empty()) {
        (true, true) => true,
        (false, true) => url_match,
        (true, false) => name_match,
        (false, false) => name_match && url_match,
    }
}

/// Rename a channel: rewrite `tvg-name` when present, then the display name.
fn rename_info(info: &str, name: &str) -> String {
    let info = if m3u::attr(info, "tvg-name").is_some() {
        m3u::set_attr(info, "tvg-name", name)
    } else {
        info.to_string()
    };
    m3u::set_display_name(&info, name)
}

/// Apply sorting or renaming to one playlist.
pub fn process(doc: &Document, opts: &SortOptions) -> Document {
    let rename_mode = opts.rename_channel.is_some() || opts.rename_group.is_some();
    let mut entries = doc.entries.clone();

    if opts.group_sort && !opts.groups.is_empty() && !rename_mode {
        entries.sort_by_key(|entry| {
            let group = m3u::attr(&entry.info, "group-title").unwrap_or_default();
            group_score(&group, &opts.groups)
        });
    }

    let mut renamed = 0usize;
    let mut groups_renamed = 0usize;
    let mut sorted_channels = 0usize;

    for entry in &mut entries {
        let group = m3u::attr(&entry.info, "group-title").unwrap_or_default();
        let name_match = !opts.channels.is_empty()
            && opts.channels.iter().any(|c| contains_ignore_case(&entry.info, c));
        let url_match = entry
            .urls
            .iter()
            .any(|url| opts.keywords.iter().any(|k| contains_ignore_case(url, k)));
        let group_match = opts.groups.is_empty()
            || opts.groups.iter().any(|g| contains_ignore_case(&group, g));

        if rename_mode {
            if let Some(new_name) = &opts.rename_channel {
                if name_match && url_match {
                    entry.info = rename_info(&entry.info, new_name);
                    entry.name = new_name.clone();
                    renamed += 1;
                }
            }
            if let Some(new_group) = &opts.rename_group {
                if group_match && group_rename_applies(opts, name_match, url_match) {
                    entry.info = m3u::set_attr(&entry.info, "group-title", new_group);
                    groups_renamed += 1;
                }
            }
            continue;
        }

        let should_sort = if opts.channels.is_empty() {
            group_match
        } else {
            name_match && group_match
        };
        if should_sort && !opts.keywords.is_empty() && entry.urls.len() > 1 {
            let before = entry.urls.clone();
            entry.urls
                .sort_by_key(|url| url_score(url, &opts.keywords, opts.reverse));
            if entry.urls != before {
                sorted_channels += 1;
            }
        }
    }

    if rename_mode {
        info!("renamed {} channels, {} group titles", renamed, groups_renamed);
    } else {
        info!("reordered URLs of {} channels", sorted_channels);
    }

    Document {
        header: doc.header.clone(),
        entries,
    }
}
