//! Stylesheet assembly and static boilerplate files.

use folio_core::Theme;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// The stylesheet inlined into exported documents.
    ///
    /// The `:root` block is always emitted verbatim so its values match the
    /// live preview's inline style. With `minify`, only the rule text is
    /// minified; rules that fail to parse are kept as written.
    pub fn stylesheet(theme: &Theme, minify: bool) -> String {
        let rules = if minify {
            match Self::minify_css(&theme.rules) {
                Ok(min) => min,
                Err(e) => {
                    tracing::warn!("Keeping unminified CSS: {}", e);
                    theme.rules.clone()
                }
            }
        } else {
            theme.rules.clone()
        };

        format!("{}\n{}", theme.root_block(), rules)
    }

    /// Files written next to the pages, keyed by file name.
    pub fn static_files() -> [(&'static str, &'static str); 3] {
        [
            (".nojekyll", ""),
            (".gitattributes", GITATTRIBUTES),
            (".editorconfig", EDITORCONFIG),
        ]
    }
}

const GITATTRIBUTES: &str = "* text=auto eol=lf
*.ps1 text eol=crlf
*.png binary
*.jpg binary
*.gif binary
*.webp binary
";

const EDITORCONFIG: &str = "root = true

[*]
charset = utf-8
end_of_line = lf
insert_final_newline = true
indent_style = space
indent_size = 2

[*.ps1]
end_of_line = crlf
indent_size = 4
";
