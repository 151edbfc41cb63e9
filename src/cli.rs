//! Command-line surface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "iptv-toolkit",
    about = "Convert, merge and regroup IPTV channel playlists",
    version
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a grouped channel-list text file into an Extended M3U playlist
    Convert {
        /// Input text file: `name,url` lines under `group,#genre#` markers
        #[arg(short, long)]
        input: PathBuf,

        /// Output playlist path
        #[arg(short, long)]
        output: PathBuf,

        /// Override the EPG URL written into the playlist header
        #[arg(long)]
        epg_url: Option<String>,
    },

    /// Merge playlists, de-duplicating stream URLs per channel
    Merge {
        /// Input playlists; the first fixes the header and base channel order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output playlist path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Re-bucket CCTV / satellite channels into canonical groups
    Regroup {
        /// Input playlist
        #[arg(short, long)]
        input: PathBuf,

        /// Output playlist path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Reorder each channel's URLs by keyword preference, or rename channels and groups
    Sort {
        /// Input playlist
        #[arg(short, long)]
        input: PathBuf,

        /// Output playlist path
        #[arg(short, long)]
        output: PathBuf,

        /// URL keywords in preference order, comma separated
        #[arg(short, long, default_value = "")]
        keywords: String,

        /// Put keyword matches last instead of first
        #[arg(short, long)]
        reverse: bool,

        /// Only touch channels whose info line contains one of these, comma separated
        #[arg(short, long)]
        channels: Option<String>,

        /// Only touch channels whose group matches one of these, comma separated
        #[arg(short, long)]
        groups: Option<String>,

        /// Rename matching channels; needs --channels and --keywords to match
        #[arg(long)]
        rename_channel: Option<String>,

        /// Rename the group of channels whose group matches --groups
        #[arg(long)]
        rename_group: Option<String>,

        /// Reorder whole channels so groups listed in --groups come first
        #[arg(long)]
        group_sort: bool,
    },
}
