//! command-line surface
use {clap::Parser, std::path::PathBuf};

/// download and resize tagged images from a danbooru-style imageboard into
/// a uniformly sized training dataset
#[derive(Debug, Parser)]
#[command(name = "booruget", version, about)]
pub struct Cli {
    /// search tag; repeat for an AND of two tags (the api caps anonymous
    /// searches at two)
    #[arg(short = 't', long = "tag", required = true)]
    pub tags: Vec<String>,

    /// trigger tag prepended to every caption, in the given order
    #[arg(short = 'T', long = "trigger-tags")]
    pub trigger_tags: Vec<String>,

    /// keep only posts carrying at least one of these general tags
    #[arg(long = "include-tags")]
    pub include_tags: Vec<String>,

    /// drop posts carrying any of these general tags
    #[arg(long = "exclude-tags")]
    pub exclude_tags: Vec<String>,

    /// directory the image/caption pairs are written into
    #[arg(short = 'o', long)]
    pub output_directory: PathBuf,

    /// number of parallel download workers
    #[arg(short = 'j', long, default_value_t = num_cpus::get())]
    pub jobs: usize,

    /// write images at their original resolution
    #[arg(long)]
    pub no_resize: bool,

    /// enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// base url of the imageboard
    #[arg(long, default_value = "https://danbooru.donmai.us")]
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_tags_are_required() {
        assert!(Cli::try_parse_from(["booruget", "-o", "out"]).is_err());
    }

    #[test]
    fn repeated_flags_accumulate() {
        let cli = Cli::parse_from([
            "booruget", "-t", "a", "-t", "b", "-T", "t1", "-T", "t2", "-o", "out",
        ]);
        assert_eq!(cli.tags, vec!["a", "b"]);
        assert_eq!(cli.trigger_tags, vec!["t1", "t2"]);
        assert!(!cli.no_resize);
    }
}
