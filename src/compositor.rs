//! Turning the merged HTML document into the final PDF.
//!
//! Layout and pagination are left to an external HTML renderer. The production
//! implementation shells out to `wkhtmltopdf`, which has to be installed separately.

use anyhow::{anyhow, Context, Result};
use derive_builder::Builder;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Page layout options passed to the compositor.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(default)]
pub struct PageOptions {
    pub margin_top_in: f32,
    pub margin_right_in: f32,
    pub margin_bottom_in: f32,
    pub margin_left_in: f32,
    /// Text encoding of the input document
    #[builder(setter(into))]
    pub encoding: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            margin_top_in: 0.15,
            margin_right_in: 0.45,
            margin_bottom_in: 0.15,
            margin_left_in: 0.45,
            encoding: "UTF-8".to_string(),
        }
    }
}

impl PageOptions {
    /// The options as command line arguments for `wkhtmltopdf`.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--encoding".to_string(),
            self.encoding.clone(),
            "--margin-top".to_string(),
            format!("{}in", self.margin_top_in),
            "--margin-right".to_string(),
            format!("{}in", self.margin_right_in),
            "--margin-bottom".to_string(),
            format!("{}in", self.margin_bottom_in),
            "--margin-left".to_string(),
            format!("{}in", self.margin_left_in),
        ]
    }
}

pub trait Compositor {
    /// Render the HTML document at `input` into a PDF at `output`.
    fn compose(&self, input: &Path, output: &Path, options: &PageOptions) -> Result<()>;
}

/// Composes PDFs by running the `wkhtmltopdf` executable.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    executable: PathBuf,
}

impl Wkhtmltopdf {
    pub fn new<P: Into<PathBuf>>(executable: P) -> Wkhtmltopdf {
        Wkhtmltopdf {
            executable: executable.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path, options: &PageOptions) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("--quiet")
            .args(options.to_args())
            .arg(input)
            .arg(output);
        command
    }
}

impl Compositor for Wkhtmltopdf {
    fn compose(&self, input: &Path, output: &Path, options: &PageOptions) -> Result<()> {
        log::debug!(
            "Running {} on {} -> {}",
            self.executable.display(),
            input.display(),
            output.display()
        );

        let result = self.command(input, output, options).output();
        let result = match result {
            Ok(result) => result,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(anyhow!(
                    "Couldn't find `{}`; install wkhtmltopdf or point --wkhtmltopdf (or the WKHTMLTOPDF environment variable) at it",
                    self.executable.display()
                ));
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to run `{}`", self.executable.display())
                });
            }
        };

        if !result.status.success() {
            return Err(anyhow!(
                "`{}` failed ({}): {}",
                self.executable.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ));
        }

        if !output.is_file() {
            return Err(anyhow!(
                "`{}` finished but didn't produce {}",
                self.executable.display(),
                output.display()
            ));
        }

        Ok(())
    }
}
