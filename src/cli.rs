use clap::Parser;
use log::LevelFilter;

use crate::slb2::OffsetMode;

#[derive(Parser, Debug)]
#[command(name = "slb2unpack")]
#[command(version)]
#[command(about = "Extract the files packed inside an SLB2 container", long_about = None)]
#[command(after_help = "Examples:\n  \
  slb2unpack PS4UPDATE.PUP             extract every entry into the current directory\n  \
  slb2unpack -l PS4UPDATE.PUP          list entries without extracting\n  \
  slb2unpack -d out PS4UPDATE.PUP      extract into ./out")]
pub struct Cli {
    /// SLB2 container path
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// List entries only
    #[arg(short = 'l')]
    pub list: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Where entry data is read from
    #[arg(long = "offsets", value_enum, default_value_t = OffsetMode::Cumulative)]
    pub offsets: OffsetMode,

    /// Quiet mode, warnings and errors only
    #[arg(short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
