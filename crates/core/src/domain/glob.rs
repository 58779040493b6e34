// Glob -> anchored regex translation

use crate::domain::identifier::WILDCARD;
use crate::error::Result;
use regex::Regex;

/// Anchored matcher for a queue pattern body (`*` matches any run of characters)
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a pattern body (negation marker already stripped)
    ///
    /// Only `*` is special; every other character matches itself, so the
    /// translated expression is always well-formed.
    pub fn compile(body: &str) -> Result<Self> {
        let translated = body
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{}$", translated))?;
        Ok(Self {
            source: body.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
