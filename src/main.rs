use anyhow::{anyhow, Context, Result};
use assembler::Assembler;
use cli::Cli;
use compositor::Wkhtmltopdf;
use highlight::Highlighter;
use indicatif::{ProgressBar, ProgressStyle};
use listing::FsListing;
use repository::RepositoryBuilder;
use std::process::ExitCode;

mod assembler;
mod cli;
mod compositor;
mod config;
mod highlight;
mod ignore_rules;
mod listing;
mod repository;
mod selection;
mod tree;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    if !cli.dir.is_dir() {
        return Err(anyhow!("Invalid folder: {}", cli.dir.display()));
    }
    let root = std::fs::canonicalize(&cli.dir)
        .with_context(|| format!("Failed to canonicalize {}", cli.dir.display()))?;

    let settings = cli.settings()?;
    log::debug!("Using style {}", settings.style);

    let repo = RepositoryBuilder::default()
        .root(root)
        .build(&FsListing)
        .with_context(|| "Failed to scan repository")?;
    log::debug!(
        "{} ignore rules, {} files selected",
        repo.ignore_set().rules().len(),
        repo.source_files().len()
    );

    let progress = ProgressBar::new(repo.source_files().len() as u64 + 1);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );

    let highlighter = Highlighter::new();
    let compositor = Wkhtmltopdf::new(&settings.wkhtmltopdf);
    let assembler = Assembler::new(
        &highlighter,
        &compositor,
        settings.style,
        settings.page_options()?,
    );

    let stats = assembler.render(&repo, &progress);
    progress.finish_and_clear();
    let stats = stats.with_context(|| "Failed to render PDF")?;

    println!("{}", stats.summary());
    Ok(())
}
