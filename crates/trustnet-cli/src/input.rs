//! Reading the evaluation inputs from flags and files.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Unvalidated `(question, context, answer)` as read from a file or flags.
///
/// Validation happens later in `EvaluationRequest::build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestInput {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub context: String,

    #[serde(default)]
    pub answer: String,
}

impl RequestInput {
    /// Parse from YAML (which also accepts JSON).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse input")
    }

    /// Read from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display())),
            _ => Self::from_yaml(&content),
        }
    }

    /// Overlay values given on the command line.
    pub fn with_overrides(
        mut self,
        question: Option<String>,
        context: Option<String>,
        answer: Option<String>,
    ) -> Self {
        if let Some(question) = question {
            self.question = question;
        }
        if let Some(context) = context {
            self.context = context;
        }
        if let Some(answer) = answer {
            self.answer = answer;
        }
        self
    }
}

/// Read a raw service response from a file, or stdin when `path` is `-`.
pub fn read_raw_response(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).context("raw response is not valid JSON")
}
