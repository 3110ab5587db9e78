use crate::config::{Settings, Style};
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the repository to print
    pub dir: PathBuf,

    /// Syntax highlighting style for the PDF
    #[arg(long, value_enum)]
    pub style: Option<Style>,

    /// TOML file with output settings (style, margins, wkhtmltopdf executable)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The wkhtmltopdf executable used to compose the PDF
    #[arg(long, env = "WKHTMLTOPDF", value_name = "PATH")]
    pub wkhtmltopdf: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Don't log anything
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Settings from the configuration file (if any), overridden by flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(style) = self.style {
            settings.style = style;
        }
        if let Some(wkhtmltopdf) = &self.wkhtmltopdf {
            settings.wkhtmltopdf = wkhtmltopdf.clone();
        }
        Ok(settings)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Off;
        }
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
