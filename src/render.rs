//! Localized Template Renderer
//!
//! Turns symbolic template keys into user-facing text. Lookup order:
//! 1. requested language, requested key
//! 2. default language, requested key (also used when the requested
//!    language has no table at all)
//! 3. placeholder `[missing template: <key>]`
//!
//! The renderer never returns an empty string, so a gap in a translation
//! table shows up as visible text rather than a blank.
//!
//! Parameters are substituted into `{name}` slots in a single pass; slots
//! without a matching parameter are left as written.

use tracing::debug;

use crate::knowledge::{Language, TemplateTable};

#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    table: TemplateTable,
    default_language: Language,
}

impl TemplateRenderer {
    pub fn new(table: TemplateTable, default_language: Language) -> Self {
        Self {
            table,
            default_language,
        }
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    pub fn table(&self) -> &TemplateTable {
        &self.table
    }

    /// Raw template text after language fallback, if any language has it
    pub fn lookup(&self, key: &str, language: &Language) -> Option<&str> {
        self.table
            .get(language, key)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                if language != &self.default_language {
                    debug!(
                        "Template {} missing for {}, using {}",
                        key, language, self.default_language
                    );
                }
                self.table
                    .get(&self.default_language, key)
                    .filter(|t| !t.is_empty())
            })
    }

    /// Render `key` in `language`, substituting `{name}` slots from `params`
    pub fn render(&self, key: &str, language: &Language, params: &[(&str, &str)]) -> String {
        match self.lookup(key, language) {
            Some(template) => substitute(template, params),
            None => missing_placeholder(key),
        }
    }

    /// Render a key that takes no parameters
    pub fn text(&self, key: &str, language: &Language) -> String {
        self.render(key, language, &[])
    }
}

pub fn missing_placeholder(key: &str) -> String {
    format!("[missing template: {}]", key)
}

fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match params.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
