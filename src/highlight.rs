//! Syntax highlighting of a single file into a self-contained HTML document.
//!
//! Every fragment carries its own stylesheet so it stays valid on its own; the
//! assembler simply concatenates them. Colours are written inline on each token
//! (scope-to-class mapping is imperfect), while bold/italic/underline go through
//! CSS classes to keep the markup small.

use crate::config::Style;
use anyhow::{anyhow, Context, Result};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Every fragment is highlighted with this syntax, whatever the file actually is.
///
/// Picking a syntax per extension would be more accurate, but output is kept stable
/// across file types on purpose.
pub const SOURCE_SYNTAX: &str = "Python";

/// CSS class prefix for token font styles.
const CLASS_PREFIX: &str = "hl-";

pub struct Highlighter {
    ss: SyntaxSet,
    ts: ThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Highlighter::new()
    }
}

impl Highlighter {
    pub fn new() -> Highlighter {
        Highlighter {
            ss: SyntaxSet::load_defaults_newlines(),
            ts: ThemeSet::load_defaults(),
        }
    }

    fn theme(&self, style: Style) -> Result<&Theme> {
        self.ts
            .themes
            .get(style.theme_name())
            .ok_or_else(|| anyhow!("Theme `{}` isn't bundled", style.theme_name()))
    }

    /// Highlight `contents` as a complete HTML document titled `file_name`.
    ///
    /// Leading and trailing whitespace is stripped before highlighting and line
    /// numbers start at 0.
    pub fn render(&self, contents: &str, file_name: &str, style: Style) -> Result<String> {
        let theme = self.theme(style)?;
        let syntax = self
            .ss
            .find_syntax_by_name(SOURCE_SYNTAX)
            .unwrap_or_else(|| self.ss.find_syntax_plain_text());

        // the newline syntaxes expect every line to be terminated
        let mut contents = contents.trim().replace('\t', "    ");
        contents.push('\n');
        let line_count = LinesWithEndings::from(&contents).count();
        let width = line_count.saturating_sub(1).to_string().len();

        let mut h = HighlightLines::new(syntax, theme);
        let mut code = String::with_capacity(contents.len() * 4);
        for (line_num, line) in LinesWithEndings::from(&contents).enumerate() {
            code.push_str(&format!(
                r#"<span class="lineno">{line_num:>width$}</span>"#
            ));

            let ranges = h
                .highlight_line(line, &self.ss)
                .with_context(|| format!("Failed to highlight line {line_num} of {file_name}"))?;
            for (style, text) in ranges {
                let escaped = html_escape::encode_text(text);
                let colour = css_colour(style.foreground);
                let class = font_style_classes(style.font_style);
                if class.is_empty() {
                    code.push_str(&format!(r#"<span style="color: {colour}">{escaped}</span>"#));
                } else {
                    code.push_str(&format!(
                        r#"<span class="{class}" style="color: {colour}">{escaped}</span>"#
                    ));
                }
            }
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{stylesheet}
</style>
</head>
<body>
<h2>{title}</h2>
<div class="highlight"><pre>{code}</pre></div>
</body>
</html>
"#,
            title = html_escape::encode_text(file_name),
            stylesheet = stylesheet(theme),
        ))
    }
}

fn css_colour(c: Color) -> String {
    format!("rgb({}, {}, {})", c.r, c.g, c.b)
}

fn font_style_classes(font_style: FontStyle) -> String {
    let mut classes = Vec::new();
    if font_style.intersects(FontStyle::BOLD) {
        classes.push(format!("{CLASS_PREFIX}bold"));
    }
    if font_style.intersects(FontStyle::ITALIC) {
        classes.push(format!("{CLASS_PREFIX}italic"));
    }
    if font_style.intersects(FontStyle::UNDERLINE) {
        classes.push(format!("{CLASS_PREFIX}underline"));
    }
    classes.join(" ")
}

/// Stylesheet for one fragment, coloured from the theme.
fn stylesheet(theme: &Theme) -> String {
    let bg = theme.settings.background.unwrap_or(Color::WHITE);
    let fg = theme.settings.foreground.unwrap_or(Color::BLACK);
    let gutter = theme.settings.gutter_foreground.unwrap_or(Color {
        r: 153,
        g: 153,
        b: 153,
        a: 255,
    });

    format!(
        r#"h2 {{ font-family: sans-serif; font-size: 1.1em; }}
.highlight {{ background-color: {bg}; color: {fg}; }}
.highlight pre {{
    font-family: "Source Code Pro", "Fira Mono", monospace;
    font-size: 0.8em;
    line-height: 1.3;
    margin: 0;
    padding: 0.5em;
    white-space: pre-wrap;
}}
.lineno {{ color: {gutter}; padding-right: 1em; }}
.{p}bold {{ font-weight: bold; }}
.{p}italic {{ font-style: italic; }}
.{p}underline {{ text-decoration: underline; }}"#,
        bg = css_colour(bg),
        fg = css_colour(fg),
        gutter = css_colour(gutter),
        p = CLASS_PREFIX,
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_complete_document() {
        let h = Highlighter::new();
        let html = h
            .render("print(1)\n", "hello.py", Style::default())
            .expect("can highlight");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>hello.py</title>"));
        assert!(html.contains("<h2>hello.py</h2>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn numbers_lines_from_zero() {
        let h = Highlighter::new();
        let html = h
            .render("repo/a.py\nx = 1\ny = 2", "a.py", Style::default())
            .expect("can highlight");
        assert!(html.contains(r#"<span class="lineno">0</span>"#));
        assert!(html.contains(r#"<span class="lineno">2</span>"#));
        assert!(!html.contains(r#"<span class="lineno">3</span>"#));
    }

    #[test]
    fn pads_line_numbers_to_widest() {
        let h = Highlighter::new();
        let contents = (0..12).map(|i| format!("x{i} = {i}\n")).collect::<String>();
        let html = h
            .render(&contents, "long.py", Style::default())
            .expect("can highlight");
        assert!(html.contains(r#"<span class="lineno"> 0</span>"#));
        assert!(html.contains(r#"<span class="lineno">11</span>"#));
    }

    #[test]
    fn escapes_markup() {
        let h = Highlighter::new();
        let html = h
            .render("a = '<b>&</b>'", "<odd>.py", Style::default())
            .expect("can highlight");
        assert!(html.contains("<title>&lt;odd&gt;.py</title>"));
        assert!(!html.contains("<b>&</b>"));
        assert!(html.contains("&amp;"));
    }

    #[test]
    fn strips_surrounding_whitespace() {
        let h = Highlighter::new();
        let html = h
            .render("\n\nx = 1\n\n\n", "a.py", Style::default())
            .expect("can highlight");
        assert!(html.contains(r#"<span class="lineno">0</span>"#));
        assert!(!html.contains(r#"<span class="lineno">1</span>"#));
    }

    #[test]
    fn every_style_renders() {
        let h = Highlighter::new();
        for style in Style::all() {
            h.render("def f():\n    return 1\n", "f.py", *style)
                .unwrap_or_else(|e| panic!("can highlight with {style}: {e:#}"));
        }
    }

    #[test]
    fn python_syntax_is_bundled() {
        let h = Highlighter::new();
        assert!(h.ss.find_syntax_by_name(SOURCE_SYNTAX).is_some());
    }
}
