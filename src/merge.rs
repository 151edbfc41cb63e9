//! Order-preserving merge of several Extended M3U playlists
//!
//! The first playlist fixes the output header and the base channel order.
//! Channels from later playlists are woven in right after the last position
//! they share with the order accumulated so far, so both inputs keep their
//! relative ordering. Stream URLs of same-named channels are pooled and
//! de-duplicated; the info line always comes from the latest occurrence.

use std::collections::{BTreeSet, HashMap};

use crate::m3u::{Document, Entry, DEFAULT_HEADER};

struct PooledChannel {
    info: String,
    urls: BTreeSet<String>,
}

/// Collapse one playlist into first-seen channel order plus a name-keyed pool.
/// Repeated names within the playlist union their URLs and keep the newest
/// info line. Channels without a display name are dropped.
fn pool_entries(doc: &Document) -> (Vec<String>, HashMap<String, PooledChannel>) {
    let mut order = Vec::new();
    let mut pool: HashMap<String, PooledChannel> = HashMap::new();
    for entry in &doc.entries {
        if entry.name.is_empty() {
            continue;
        }
        match pool.get_mut(&entry.name) {
            Some(channel) => {
                channel.info = entry.info.clone();
                channel.urls.extend(entry.urls.iter().cloned());
            }
            None => {
                order.push(entry.name.clone());
                pool.insert(
                    entry.name.clone(),
                    PooledChannel {
                        info: entry.info.clone(),
                        urls: entry.urls.iter().cloned().collect(),
                    },
                );
            }
        }
    }
    (order, pool)
}

/// Merge playlists in input order. URLs of each output channel are sorted
/// lexicographically so repeated merges are deterministic.
pub fn merge(inputs: &[Document]) -> Document {
    let mut inputs = inputs.iter();
    let (header, (mut order, mut pool)) = match inputs.next() {
        Some(first) => (first.header.clone(), pool_entries(first)),
        None => {
            return Document {
                header: DEFAULT_HEADER.to_string(),
                entries: Vec::new(),
            }
        }
    };

    for doc in inputs {
        let (incoming_order, mut incoming) = pool_entries(doc);

        // Insertion cursor: the last accumulated position occupied by any
        // channel this playlist also contains. New channels with no shared
        // anchor land at the front, as the original merger did.
        let mut cursor: Option<usize> = None;
        for (i, name) in order.iter().enumerate() {
            if incoming.contains_key(name) {
                cursor = Some(i);
            }
        }

        for name in incoming_order {
            let Some(channel) = incoming.remove(&name) else {
                continue;
            };
            match order.iter().position(|n| n == &name) {
                Some(pos) => {
                    if let Some(existing) = pool.get_mut(&name) {
                        existing.info = channel.info;
                        existing.urls.extend(channel.urls);
                    }
                    cursor = Some(pos);
                }
                None => {
                    let insert_at = cursor.map_or(0, |c| c + 1);
                    order.insert(insert_at, name.clone());
                    pool.insert(name, channel);
                    cursor = Some(insert_at);
                }
            }
        }
    }

    let entries = order
        .into_iter()
        .filter_map(|name| {
            pool.remove(&name).map(|channel| Entry {
                info: channel.info,
                urls: channel.urls.into_iter().collect(),
                name,
            })
        })
        .collect();

    Document { header, entries }
}
