use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zwf")]
#[command(version)]
#[command(about = "Tools for Zwift WAD files", long_about = None)]
#[command(after_help = "Examples:\n  \
  zwf list -l -H assets.wad               list entries with their sizes\n  \
  zwf extract assets.wad out/             extract everything into out/\n  \
  zwf extract assets.wad out/ '*.xml'     extract only matching entries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print stack trace on errors
    #[arg(long, global = true)]
    pub traceback: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries of a WAD file
    List(ListArgs),
    /// Extract entries into an empty directory
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// WAD file path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// List more information
    #[arg(short = 'l')]
    pub long: bool,

    /// Show file sizes in human-readable form
    #[arg(short = 'H')]
    pub human_readable: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// WAD file path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Destination directory, must exist and be empty
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Only extract entries whose path matches this glob
    #[arg(value_name = "GLOB")]
    pub glob: Option<String>,

    /// Print more info
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        matches!(&self.command, Command::Extract(args) if args.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from(["zwf", "list", "-l", "-H", "a.wad"]).unwrap();
        match cli.command {
            Command::List(args) => {
                assert!(args.long);
                assert!(args.human_readable);
                assert_eq!(args.file, PathBuf::from("a.wad"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_extract_with_glob() {
        let cli = Cli::try_parse_from([
            "zwf",
            "extract",
            "--verbose",
            "--traceback",
            "a.wad",
            "out",
            "*.xml",
        ])
        .unwrap();
        assert!(cli.traceback);
        assert!(cli.is_verbose());
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.dir, PathBuf::from("out"));
                assert_eq!(args.glob.as_deref(), Some("*.xml"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
