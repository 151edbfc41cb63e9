//! Re-bucket scattered CCTV / satellite channels into canonical groups
//!
//! Some playlists spread the CCTV family over 体育 / 新闻 / 影视 style groups.
//! This pass folds duplicate channels together, then rewrites `group-title`
//! so CCTV channels land in 央视 (ordered by channel number), provincial
//! satellite channels in 卫视, and everything else keeps its original group.

use std::collections::{BTreeSet, HashMap};

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::m3u::{self, Document, Entry};

const CCTV_GROUP: &str = "央视";
const SATELLITE_GROUP: &str = "卫视";
/// Group assumed for entries carrying no `group-title` attribute.
const FALLBACK_GROUP: &str = "其他";

static CCTV_NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)CCTV-?(\d+)").unwrap());

/// Fold key for duplicate detection: hyphens removed, a trailing `台`
/// stripped, trimmed, uppercased. `CCTV-5`, `CCTV5` and `CCTV5台` all fold.
fn norm_key(name: &str) -> String {
    let mut key = name.replace('-', "");
    if let Some(stripped) = key.strip_suffix('台') {
        key = stripped.to_string();
    }
    key.trim().to_uppercase()
}

/// Display names carrying a hyphen or the trailing `台` win the fold.
fn is_preferred(name: &str) -> bool {
    name.contains('-') || name.ends_with('台')
}

/// CCTV channel number for ordering the 央视 bucket; un-numbered names
/// (e.g. CCTV风云) sort last.
fn cctv_num(name: &str) -> u32 {
    CCTV_NUM_RE
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(999)
}

struct FoldedChannel {
    info: String,
    name: String,
    urls: BTreeSet<String>,
    original_group: String,
    order_idx: usize,
}

/// Regroup one playlist. Channels without a name or without any URL are
/// dropped, matching the original pass over EXTINF/URL pairs.
pub fn regroup(doc: &Document) -> Document {
    let mut order: Vec<String> = Vec::new();
    let mut folded: HashMap<String, FoldedChannel> = HashMap::new();

    for entry in &doc.entries {
        if entry.name.is_empty() || entry.urls.is_empty() {
            continue;
        }
        let key = norm_key(&entry.name);
        match folded.get_mut(&key) {
            Some(channel) => {
                channel.urls.extend(entry.urls.iter().cloned());
                if is_preferred(&entry.name) && !is_preferred(&channel.name) {
                    channel.info = entry.info.clone();
                    channel.name = entry.name.clone();
                }
            }
            None => {
                let original_group = m3u::attr(&entry.info, "group-title")
                    .unwrap_or_else(|| FALLBACK_GROUP.to_string());
                folded.insert(
                    key.clone(),
                    FoldedChannel {
                        info: entry.info.clone(),
                        name: entry.name.clone(),
                        urls: entry.urls.iter().cloned().collect(),
                        original_group,
                        order_idx: order.len(),
                    },
                );
                order.push(key);
            }
        }
    }

    let mut cctv: Vec<FoldedChannel> = Vec::new();
    let mut satellite: Vec<FoldedChannel> = Vec::new();
    let mut other: Vec<FoldedChannel> = Vec::new();
    for key in &order {
        let Some(channel) = folded.remove(key) else {
            continue;
        };
        if channel.name.to_uppercase().contains("CCTV") {
            cctv.push(channel);
        } else if channel.name.contains("卫视") {
            satellite.push(channel);
        } else {
            other.push(channel);
        }
    }

    cctv.sort_by_key(|c| cctv_num(&c.name));
    satellite.sort_by_key(|c| c.order_idx);
    other.sort_by(|a, b| {
        (&a.original_group, a.order_idx).cmp(&(&b.original_group, b.order_idx))
    });

    info!(
        "regrouped channels: {} CCTV, {} satellite, {} other",
        cctv.len(),
        satellite.len(),
        other.len()
    );

    let mut entries = Vec::new();
    for (group, bucket) in [(Some(CCTV_GROUP), cctv), (Some(SATELLITE_GROUP), satellite), (None, other)] {
        for channel in bucket {
            let final_group = match group {
                Some(g) => g.to_string(),
                None => channel.original_group.clone(),
            };
            entries.push(Entry {
                info: m3u::set_attr(&channel.info, "group-title", &final_group),
                name: channel.name,
                urls: channel.urls.into_iter().collect(),
            });
        }
    }

    Document {
        header: doc.header.clone(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(channels: &[(&str, &str, &[&str])]) -> Document {
        let entries = channels
            .iter()
            .map(|(name, group, urls)| Entry {
                info: if group.is_empty() {
                    format!("#EXTINF:-1 tvg-name=\"{}\",{}", name, name)
                } else {
                    format!("#EXTINF:-1 tvg-name=\"{}\" group-title=\"{}\",{}", name, group, name)
                },
                name: name.to_string(),
                urls: urls.iter().map(|u| u.to_string()).collect(),
            })
            .collect();
        Document {
            header: m3u::DEFAULT_HEADER.to_string(),
            entries,
        }
    }

    #[test]
    fn test_norm_key_folds_hyphen_and_tai_variants() {
        assert_eq!(norm_key("CCTV-5"), "CCTV5");
        assert_eq!(norm_key("cctv5"), "CCTV5");
        assert_eq!(norm_key("湖南卫视台"), "湖南卫视");
        assert_eq!(norm_key(" CCTV-1 "), "CCTV1");
    }

    #[test]
    fn test_cctv_num() {
        assert_eq!(cctv_num("CCTV-5 体育"), 5);
        assert_eq!(cctv_num("cctv13"), 13);
        assert_eq!(cctv_num("CCTV风云"), 999);
    }

    #[test]
    fn test_duplicate_channels_fold_and_prefer_hyphenated_name() {
        let input = doc(&[
            ("CCTV5", "体育", &["http://plain"]),
            ("CCTV-5 体育", "运动", &["http://hyphen"]),
        ]);
        let output = regroup(&input);
        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].name, "CCTV-5 体育");
        assert_eq!(output.entries[0].urls, vec!["http://hyphen", "http://plain"]);
    }

    #[test]
    fn test_buckets_and_ordering() {
        let input = doc(&[
            ("湖南卫视", "影视", &["http://hntv"]),
            ("CCTV-5 体育", "体育", &["http://5"]),
            ("凤凰中文", "港台", &["http://fhzw"]),
            ("CCTV-1 综合", "新闻", &["http://1"]),
            ("浙江卫视", "综艺", &["http://zjtv"]),
        ]);
        let output = regroup(&input);
        let names: Vec<&str> = output.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CCTV-1 综合", "CCTV-5 体育", "湖南卫视", "浙江卫视", "凤凰中文"]);
        assert_eq!(m3u::attr(&output.entries[0].info, "group-title").as_deref(), Some("央视"));
        assert_eq!(m3u::attr(&output.entries[2].info, "group-title").as_deref(), Some("卫视"));
        assert_eq!(m3u::attr(&output.entries[4].info, "group-title").as_deref(), Some("港台"));
    }

    #[test]
    fn test_unnumbered_cctv_sorts_last() {
        let input = doc(&[
            ("CCTV风云", "其他", &["http://fy"]),
            ("CCTV-1 综合", "新闻", &["http://1"]),
        ]);
        let output = regroup(&input);
        let names: Vec<&str> = output.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CCTV-1 综合", "CCTV风云"]);
    }

    #[test]
    fn test_missing_group_title_gets_inserted() {
        let input = doc(&[("CCTV-2 财经", "", &["http://2"])]);
        let output = regroup(&input);
        assert_eq!(m3u::attr(&output.entries[0].info, "group-title").as_deref(), Some("央视"));
    }

    #[test]
    fn test_url_less_channels_are_dropped() {
        let input = doc(&[("CCTV-1", "新闻", &[]), ("CCTV-2 财经", "新闻", &["http://2"])]);
        let output = regroup(&input);
        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].name, "CCTV-2 财经");
    }

    #[test]
    fn test_other_channels_sort_by_group_then_input_order() {
        let input = doc(&[
            ("B频道", "乙组", &["http://b"]),
            ("A频道", "甲组", &["http://a"]),
            ("C频道", "乙组", &["http://c"]),
        ]);
        let output = regroup(&input);
        let names: Vec<&str> = output.entries.iter().map(|e| e.name.as_str()).collect();
        // Groups compare by their UTF-8 byte order; within a group input order holds.
        assert_eq!(names, vec!["B频道", "C频道", "A频道"]);
    }
}
