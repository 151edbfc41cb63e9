//! IPTV Playlist Toolkit
//! Converts grouped channel-list text into Extended M3U playlists and
//! merges, regroups or reorders existing playlists.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

mod cli;
mod config;
mod convert;
mod error;
mod m3u;
mod merge;
mod regroup;
mod sort;

use cli::{Args, Command};
use config::AppConfig;
use error::ToolError;
use m3u::Document;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load();

    match args.command {
        Command::Convert {
            input,
            output,
            epg_url,
        } => {
            let text = read_input(&input)?;
            let epg_url = epg_url.unwrap_or(config.epg_url);
            let playlist = convert::convert(&text, &epg_url);
            write_output(&output, &playlist)?;
            info!("converted {} -> {}", input.display(), output.display());
        }
        Command::Merge { input, output } => {
            let documents = read_merge_inputs(&input, &output)?;
            let merged = merge::merge(&documents);
            write_output(&output, &merged.render())?;
            info!(
                "merged {} playlists, {} channels -> {}",
                documents.len(),
                merged.entries.len(),
                output.display()
            );
        }
        Command::Regroup { input, output } => {
            let document = Document::parse(&read_input(&input)?);
            write_output(&output, &regroup::regroup(&document).render())?;
            info!("regrouped {} -> {}", input.display(), output.display());
        }
        Command::Sort {
            input,
            output,
            keywords,
            reverse,
            channels,
            groups,
            rename_channel,
            rename_group,
            group_sort,
        } => {
            let document = Document::parse(&read_input(&input)?);
            let options = sort::SortOptions {
                keywords: split_list(&keywords),
                reverse,
                channels: split_list(channels.as_deref().unwrap_or("")),
                groups: split_list(groups.as_deref().unwrap_or("")),
                rename_channel,
                rename_group,
                group_sort,
            };
            write_output(&output, &sort::process(&document, &options).render())?;
            info!("processed {} -> {}", input.display(), output.display());
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String, ToolError> {
    fs::read_to_string(path).map_err(|source| ToolError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, content: &str) -> Result<(), ToolError> {
    fs::write(path, content).map_err(|source| ToolError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the playlists for a merge. The first input must be readable; later
/// inputs are skipped with a warning when unreadable or equal to the output
/// path.
fn read_merge_inputs(inputs: &[PathBuf], output: &Path) -> Result<Vec<Document>, ToolError> {
    let mut documents = Vec::with_capacity(inputs.len());
    for (i, path) in inputs.iter().enumerate() {
        if i > 0 && path == output {
            warn!("skipping input {}: same as output", path.display());
            continue;
        }
        match read_input(path) {
            Ok(text) => documents.push(Document::parse(&text)),
            Err(err) if i == 0 => return Err(err),
            Err(err) => warn!("skipping input: {}", err),
        }
    }
    Ok(documents)
}

/// Split a comma-separated filter list, dropping empty items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
