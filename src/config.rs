//! Output configuration: the highlighting style and page layout of the PDF.
//!
//! Everything here has a default, so a configuration file is optional. When one is
//! given, its values sit between the built-in defaults and the command line flags.

use crate::compositor::{PageOptions, PageOptionsBuilder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The highlighting styles the tool knows about.
///
/// This is the only list of styles: command line validation, the configuration file
/// and the highlighter all go through it.
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug, Default, clap::ValueEnum)]
pub enum Style {
    #[default]
    #[serde(rename = "inspired-github")]
    #[value(name = "inspired-github")]
    InspiredGitHub,
    #[serde(rename = "solarized-light")]
    #[value(name = "solarized-light")]
    SolarizedLight,
    #[serde(rename = "solarized-dark")]
    #[value(name = "solarized-dark")]
    SolarizedDark,
    #[serde(rename = "base16-ocean-light")]
    #[value(name = "base16-ocean-light")]
    Base16OceanLight,
    #[serde(rename = "base16-ocean-dark")]
    #[value(name = "base16-ocean-dark")]
    Base16OceanDark,
    #[serde(rename = "base16-eighties-dark")]
    #[value(name = "base16-eighties-dark")]
    Base16EightiesDark,
    #[serde(rename = "base16-mocha-dark")]
    #[value(name = "base16-mocha-dark")]
    Base16MochaDark,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Style {
    /// The name used on the command line and in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Style::InspiredGitHub => "inspired-github",
            Style::SolarizedLight => "solarized-light",
            Style::SolarizedDark => "solarized-dark",
            Style::Base16OceanLight => "base16-ocean-light",
            Style::Base16OceanDark => "base16-ocean-dark",
            Style::Base16EightiesDark => "base16-eighties-dark",
            Style::Base16MochaDark => "base16-mocha-dark",
        }
    }

    /// The key of the matching theme in syntect's bundled theme set.
    pub fn theme_name(&self) -> &'static str {
        match self {
            Style::InspiredGitHub => "InspiredGitHub",
            Style::SolarizedLight => "Solarized (light)",
            Style::SolarizedDark => "Solarized (dark)",
            Style::Base16OceanLight => "base16-ocean.light",
            Style::Base16OceanDark => "base16-ocean.dark",
            Style::Base16EightiesDark => "base16-eighties.dark",
            Style::Base16MochaDark => "base16-mocha.dark",
        }
    }

    pub fn all() -> &'static [Style] {
        &[
            Style::InspiredGitHub,
            Style::SolarizedLight,
            Style::SolarizedDark,
            Style::Base16OceanLight,
            Style::Base16OceanDark,
            Style::Base16EightiesDark,
            Style::Base16MochaDark,
        ]
    }
}

/// Settings read from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Syntax highlighting style for every fragment
    pub style: Style,
    /// The `wkhtmltopdf` executable, either a bare name looked up on `PATH` or a path
    pub wkhtmltopdf: PathBuf,
    pub margin_top_in: f32,
    pub margin_right_in: f32,
    pub margin_bottom_in: f32,
    pub margin_left_in: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let page = PageOptions::default();
        Settings {
            style: Style::default(),
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
            margin_top_in: page.margin_top_in,
            margin_right_in: page.margin_right_in,
            margin_bottom_in: page.margin_bottom_in,
            margin_left_in: page.margin_left_in,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;
        log::debug!("Loaded settings from {}: {settings:?}", path.display());
        Ok(settings)
    }

    /// Page layout handed to the compositor.
    pub fn page_options(&self) -> Result<PageOptions> {
        PageOptionsBuilder::default()
            .margin_top_in(self.margin_top_in)
            .margin_right_in(self.margin_right_in)
            .margin_bottom_in(self.margin_bottom_in)
            .margin_left_in(self.margin_left_in)
            .build()
            .with_context(|| "Failed to build page options")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::ValueEnum;
    use tempfile::TempDir;

    #[test]
    fn style_names_are_unique() {
        let mut names: Vec<&str> = Style::all().iter().map(Style::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Style::all().len());
    }

    #[test]
    fn value_enum_and_name_agree() {
        for style in Style::all() {
            let parsed = Style::from_str(style.name(), false).expect("can parse style name");
            assert_eq!(parsed, *style);
        }
    }

    #[test]
    fn every_style_has_a_bundled_theme() {
        let themes = syntect::highlighting::ThemeSet::load_defaults();
        for style in Style::all() {
            assert!(
                themes.themes.contains_key(style.theme_name()),
                "missing theme for {style}"
            );
        }
    }

    #[test]
    fn can_serialize_settings() {
        let settings = Settings::default();
        let toml = toml::to_string(&settings).expect("can serialize settings to TOML");
        assert!(toml.contains("style = \"inspired-github\""));
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let tmp = TempDir::new().expect("can create temp dir");
        let path = tmp.path().join("repo-to-pdf.toml");
        std::fs::write(&path, "style = \"solarized-dark\"\nmargin_top_in = 0.5\n")
            .expect("can write settings");

        let settings = Settings::load(&path).expect("can load settings");
        assert_eq!(settings.style, Style::SolarizedDark);
        assert_eq!(settings.margin_top_in, 0.5);
        assert_eq!(settings.margin_left_in, 0.45);
        assert_eq!(settings.wkhtmltopdf, PathBuf::from("wkhtmltopdf"));
    }

    #[test]
    fn unknown_style_in_settings_is_an_error() {
        let tmp = TempDir::new().expect("can create temp dir");
        let path = tmp.path().join("repo-to-pdf.toml");
        std::fs::write(&path, "style = \"colorful\"\n").expect("can write settings");
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn page_options_carry_margins() {
        let settings = Settings {
            margin_bottom_in: 1.0,
            ..Settings::default()
        };
        let page = settings.page_options().expect("can build page options");
        assert_eq!(page.margin_bottom_in, 1.0);
        assert_eq!(page.margin_top_in, 0.15);
        assert_eq!(page.encoding, "UTF-8");
    }
}
