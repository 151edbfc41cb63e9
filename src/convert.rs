//! Grouped channel-list text to Extended M3U conversion
//!
//! The input format is one channel per line as `name,url`, with group
//! declarations interspersed as `group,#genre#` lines. Every channel belongs
//! to the most recent group declaration above it.

use once_cell::sync::Lazy;
use regex::Regex;

/// EPG source advertised in the `x-tvg-url` playlist header by default.
pub const DEFAULT_EPG_URL: &str =
    "https://gh-proxy.org/raw.githubusercontent.com/sparkssssssssss/epg/main/pp.xml";

/// Substring that turns an input line into a group declaration.
const GROUP_SENTINEL: &str = "#genre#";
/// Removed (with its leading comma) to obtain the group name.
const GROUP_FIELD: &str = ",#genre#";

static SHORT_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(CCTV|CETV)-(\d+)").unwrap());

/// One classified, non-blank input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `央视,#genre#` - sets the group for all following channels.
    Group(String),
    /// `CCTV-1 综合,http://host/1.m3u8`
    Channel { name: String, url: String },
}

/// Classify input lines into group markers and channel records.
///
/// Blank lines produce nothing. A channel line without a comma yields an
/// empty URL; anything after a second comma is dropped.
pub fn classify(input: &str) -> impl Iterator<Item = Line> + '_ {
    input.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(if line.contains(GROUP_SENTINEL) {
            Line::Group(line.replace(GROUP_FIELD, "").trim().to_string())
        } else {
            let mut fields = line.split(',');
            let name = fields.next().unwrap_or("").trim().to_string();
            let url = fields.next().unwrap_or("").trim().to_string();
            Line::Channel { name, url }
        })
    })
}

/// Collapse `CCTV-1 综合` style display names to their short `CCTV1` form.
///
/// Applies to `CCTV`/`CETV` names with a hyphenated channel number; everything
/// else passes through unchanged, so the function is total and idempotent.
pub fn normalize_name(name: &str) -> String {
    match SHORT_NAME_RE.captures(name) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => name.to_string(),
    }
}

/// Convert a grouped channel-list text document into an Extended M3U document.
///
/// Channels keep their input order. Group markers only update the running
/// group context; channels seen before the first marker get no `group-title`.
pub fn convert(input: &str, epg_url: &str) -> String {
    let header = format!("#EXTM3U x-tvg-url=\"{}\"\n", epg_url);
    let (output, _group) = classify(input).fold(
        (header, None::<String>),
        |(mut output, group), line| match line {
            Line::Group(name) => (output, Some(name)),
            Line::Channel { name, url } => {
                let group_attr = match group.as_deref() {
                    Some(g) => format!(" group-title=\"{}\"", g),
                    None => String::new(),
                };
                output.push_str(&format!(
                    "#EXTINF:-1 tvg-name=\"{}\"{},{}\n{}\n",
                    normalize_name(&name),
                    group_attr,
                    name,
                    url
                ));
                (output, group)
            }
        },
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_grouped_channel() {
        let input = "央视,#genre#\nCCTV-1 综合,http://a/1.m3u8\n";
        let expected = format!(
            "#EXTM3U x-tvg-url=\"{}\"\n#EXTINF:-1 tvg-name=\"CCTV1\" group-title=\"央视\",CCTV-1 综合\nhttp://a/1.m3u8\n",
            DEFAULT_EPG_URL
        );
        assert_eq!(convert(input, DEFAULT_EPG_URL), expected);
    }

    #[test]
    fn test_channel_before_any_group_has_no_group_title() {
        let output = convert("CCTV-1 综合,http://a/1.m3u8\n央视,#genre#\nCCTV-2 财经,http://a/2.m3u8", "http://epg");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "#EXTINF:-1 tvg-name=\"CCTV1\",CCTV-1 综合");
        assert_eq!(lines[3], "#EXTINF:-1 tvg-name=\"CCTV2\" group-title=\"央视\",CCTV-2 财经");
    }

    #[test]
    fn test_blank_input_yields_header_only() {
        assert_eq!(convert("\n\n  \n", "http://epg"), "#EXTM3U x-tvg-url=\"http://epg\"\n");
        assert_eq!(convert("", "http://epg"), "#EXTM3U x-tvg-url=\"http://epg\"\n");
    }

    #[test]
    fn test_group_marker_emits_no_record() {
        let output = convert("央视,#genre#\n卫视,#genre#\n", "http://epg");
        assert_eq!(output, "#EXTM3U x-tvg-url=\"http://epg\"\n");
    }

    #[test]
    fn test_extra_comma_fields_are_dropped() {
        let events: Vec<Line> = classify("Name,http://c,extra").collect();
        assert_eq!(
            events,
            vec![Line::Channel {
                name: "Name".to_string(),
                url: "http://c".to_string()
            }]
        );
    }

    #[test]
    fn test_line_without_comma_yields_empty_url() {
        let events: Vec<Line> = classify("lonely-name").collect();
        assert_eq!(
            events,
            vec![Line::Channel {
                name: "lonely-name".to_string(),
                url: String::new()
            }]
        );
        // The serializer still emits a well-formed record for it.
        let output = convert("lonely-name", "http://epg");
        assert_eq!(
            output,
            "#EXTM3U x-tvg-url=\"http://epg\"\n#EXTINF:-1 tvg-name=\"lonely-name\",lonely-name\n\n"
        );
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("CCTV-1 综合"), "CCTV1");
        assert_eq!(normalize_name("CCTV-13 新闻"), "CCTV13");
        assert_eq!(normalize_name("CETV-4教育"), "CETV4");
        assert_eq!(normalize_name("湖南卫视"), "湖南卫视");
        assert_eq!(normalize_name("CCTV风云"), "CCTV风云");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_name_is_idempotent() {
        for name in ["CCTV-1 综合", "CCTV1", "CETV-4教育", "湖南卫视", ""] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_extinf_count_matches_channel_lines() {
        let input = "央视,#genre#\nA,http://1\n\nB,http://2\n卫视,#genre#\nC,http://3\n";
        let output = convert(input, "http://epg");
        let extinf = output.lines().filter(|l| l.starts_with("#EXTINF")).count();
        assert_eq!(extinf, 3);
    }

    #[test]
    fn test_channel_order_is_preserved() {
        let input = "g,#genre#\nZ,http://1\nA,http://2\nM,http://3\n";
        let output = convert(input, "http://epg");
        let names: Vec<&str> = output
            .lines()
            .filter(|l| l.starts_with("#EXTINF"))
            .map(|l| l.rsplit(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_group_context_switches_between_markers() {
        let input = "央视,#genre#\nA,http://1\n卫视,#genre#\nB,http://2\n";
        let output = convert(input, "http://epg");
        assert!(output.contains("group-title=\"央视\",A"));
        assert!(output.contains("group-title=\"卫视\",B"));
    }
}
