//! The closed set of tools and their typed argument structures.
//!
//! Tool identity is a tagged union: every reachable request is one of the
//! five variants below, so dispatch is an exhaustive match. Only the wire
//! boundary knows about unknown tool names, and rejects them as protocol
//! errors before anything here runs.

use crate::constants::{auth, limits, network};
use crate::errors::ToolError;
use crate::services::validation::Validation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub const TOOL_REMOTE_SSH: &str = "remote-ssh";
pub const TOOL_EDIT_BLOCK: &str = "edit-block";
pub const TOOL_READ_LINES: &str = "read-lines";
pub const TOOL_SEARCH_CODE: &str = "search-code";
pub const TOOL_WRITE_CHUNK: &str = "write-chunk";

pub const TOOL_NAMES: &[&str] = &[
    TOOL_REMOTE_SSH,
    TOOL_EDIT_BLOCK,
    TOOL_READ_LINES,
    TOOL_SEARCH_CODE,
    TOOL_WRITE_CHUNK,
];

/// Connection coordinates shared by every tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub host: String,
    pub user: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub private_key_path: Option<String>,
}

impl Target {
    /// Credential resolution order: explicit argument, then the environment
    /// fallback. `None` hands the resolver its default candidate list.
    pub fn key_source(&self) -> Option<String> {
        if let Some(path) = &self.private_key_path {
            if !path.trim().is_empty() {
                return Some(path.clone());
            }
        }
        std::env::var(auth::PRIVATE_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn validate(&self, validation: &Validation) -> Result<(), ToolError> {
        validation.ensure_non_empty(&self.host, "host")?;
        validation.ensure_non_empty(&self.user, "user")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSshArgs {
    #[serde(flatten)]
    pub target: Target,
    pub command: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBlockArgs {
    #[serde(flatten)]
    pub target: Target,
    pub file_path: String,
    pub old_text: String,
    pub new_text: String,
    #[serde(default = "default_expected_replacements")]
    pub expected_replacements: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadLinesArgs {
    #[serde(flatten)]
    pub target: Target,
    pub file_path: String,
    #[serde(default = "default_start_line")]
    pub start_line: u64,
    #[serde(default)]
    pub end_line: Option<u64>,
    #[serde(default = "default_max_lines")]
    pub max_lines: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCodeArgs {
    #[serde(flatten)]
    pub target: Target,
    pub path: String,
    pub pattern: String,
    #[serde(default)]
    pub file_pattern: Option<String>,
    #[serde(default)]
    pub ignore_case: bool,
    #[serde(default = "default_max_results")]
    pub max_results: u64,
    #[serde(default = "default_context_lines")]
    pub context_lines: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteChunkArgs {
    #[serde(flatten)]
    pub target: Target,
    pub file_path: String,
    pub content: String,
    #[serde(default)]
    pub mode: WriteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    #[default]
    Rewrite,
    Append,
}

impl WriteMode {
    pub fn is_append(self) -> bool {
        self == WriteMode::Append
    }

    pub fn label(self) -> &'static str {
        match self {
            WriteMode::Rewrite => "rewrite",
            WriteMode::Append => "append",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ToolRequest {
    RemoteSsh(RemoteSshArgs),
    EditBlock(EditBlockArgs),
    ReadLines(ReadLinesArgs),
    SearchCode(SearchCodeArgs),
    WriteChunk(WriteChunkArgs),
}

impl ToolRequest {
    pub fn parse(name: &str, args: &Value) -> Result<Self, ToolError> {
        let request = match name {
            TOOL_REMOTE_SSH => Self::RemoteSsh(from_args(name, args)?),
            TOOL_EDIT_BLOCK => Self::EditBlock(from_args(name, args)?),
            TOOL_READ_LINES => Self::ReadLines(from_args(name, args)?),
            TOOL_SEARCH_CODE => Self::SearchCode(from_args(name, args)?),
            TOOL_WRITE_CHUNK => Self::WriteChunk(from_args(name, args)?),
            other => {
                return Err(ToolError::invalid_params(format!(
                    "Unknown tool: {}. Known tools: {}",
                    other,
                    TOOL_NAMES.join(", ")
                )))
            }
        };
        request.validate()?;
        Ok(request)
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::RemoteSsh(_) => TOOL_REMOTE_SSH,
            Self::EditBlock(_) => TOOL_EDIT_BLOCK,
            Self::ReadLines(_) => TOOL_READ_LINES,
            Self::SearchCode(_) => TOOL_SEARCH_CODE,
            Self::WriteChunk(_) => TOOL_WRITE_CHUNK,
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            Self::RemoteSsh(args) => &args.target,
            Self::EditBlock(args) => &args.target,
            Self::ReadLines(args) => &args.target,
            Self::SearchCode(args) => &args.target,
            Self::WriteChunk(args) => &args.target,
        }
    }

    fn validate(&self) -> Result<(), ToolError> {
        let validation = Validation::new();
        self.target().validate(&validation)?;
        match self {
            Self::RemoteSsh(args) => {
                validation.ensure_non_empty(&args.command, "command")?;
            }
            Self::EditBlock(args) => {
                validation.ensure_non_empty(&args.file_path, "filePath")?;
                validation.ensure_non_empty(&args.old_text, "oldText")?;
            }
            Self::ReadLines(args) => {
                validation.ensure_non_empty(&args.file_path, "filePath")?;
                validation.ensure_line_range(args.start_line, args.end_line)?;
                validation.ensure_at_least(args.max_lines, 1, "maxLines")?;
            }
            Self::SearchCode(args) => {
                validation.ensure_non_empty(&args.path, "path")?;
                validation.ensure_non_empty(&args.pattern, "pattern")?;
                validation.ensure_at_least(args.max_results, 1, "maxResults")?;
            }
            Self::WriteChunk(args) => {
                validation.ensure_non_empty(&args.file_path, "filePath")?;
            }
        }
        Ok(())
    }
}

fn from_args<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone()).map_err(|err| {
        ToolError::invalid_params(format!("Invalid arguments for {}: {}", tool, err))
    })
}

fn default_port() -> u16 {
    network::SSH_DEFAULT_PORT
}

fn default_expected_replacements() -> u64 {
    limits::DEFAULT_EXPECTED_REPLACEMENTS
}

fn default_start_line() -> u64 {
    limits::DEFAULT_READ_START_LINE
}

fn default_max_lines() -> u64 {
    limits::DEFAULT_READ_MAX_LINES
}

fn default_max_results() -> u64 {
    limits::DEFAULT_SEARCH_MAX_RESULTS
}

fn default_context_lines() -> u64 {
    limits::DEFAULT_SEARCH_CONTEXT_LINES
}
