//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;

/// Download a filtered set of No-Intro releases from Myrient.
///
/// The listing of one console directory is fetched, filtered by region and
/// release markers, and every accepted file is saved into `<OUTPUT>/output`,
/// which is cleared first. While downloading, type `p` + Enter to pause or
/// resume and `c` + Enter (or Ctrl-C) to cancel.
#[derive(Parser, Debug)]
#[command(name = "mrscraper")]
#[command(author, version, about)]
pub struct Args {
    /// Console directory to download (see --list-consoles)
    #[arg(long, value_name = "LABEL", conflicts_with = "url")]
    pub console: Option<String>,

    /// Listing URL under https://myrient.erista.me/files/
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Directory that receives the `output` folder
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Region tag releases must carry (default from settings, else Europe)
    #[arg(short, long, value_name = "REGION")]
    pub region: Option<String>,

    /// Accept releases of every region
    #[arg(long)]
    pub no_region_filter: bool,

    /// Keep betas, prototypes, demos and other non-retail releases
    #[arg(long)]
    pub no_smart_filter: bool,

    /// Examine only the first N listing entries
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Replace an existing output folder without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Print the known consoles and regions, then exit
    #[arg(long)]
    pub list_consoles: bool,

    /// Settings file (defaults to ./mrscraper.ron)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,
}
