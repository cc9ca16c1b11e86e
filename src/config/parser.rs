//! Line-oriented parser for `.blobify` files.
//!
//! Grammar: `# comment`, `[name]` or `[name:parent1,parent2]` section
//! headers, `+pattern` includes, `-pattern` excludes, `@switch` defaults.
//! Rules before the first header belong to the reserved `default` context.

use super::error::ConfigError;
use super::{BlobifyConfig, ConfigRule, Context, DEFAULT_CONTEXT};
use tracing::debug;

pub(crate) fn parse(text: &str) -> Result<BlobifyConfig, ConfigError> {
    let mut config = BlobifyConfig::default();
    let mut current = 0;
    // The last comment seen, kept as the description for a directly
    // following section header.
    let mut pending_comment: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            pending_comment = None;
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            if !comment.is_empty() {
                pending_comment = Some(comment.to_string());
            }
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let (name, parents) = parse_header(&line[1..line.len() - 1]);
            if name == DEFAULT_CONTEXT {
                return Err(ConfigError::RedefinedDefault { line: line_no });
            }
            if config.contexts.iter().any(|context| context.name == name) {
                return Err(ConfigError::DuplicateContext { name, line: line_no });
            }
            debug!(context = %name, line = line_no, "entering context section");
            config
                .contexts
                .push(Context::new(name, parents, pending_comment.take()));
            current = config.contexts.len() - 1;
            continue;
        }

        if let Some(payload) = line.strip_prefix('+') {
            push_rule(&mut config.contexts[current], payload, ConfigRule::Include, line_no);
            pending_comment = None;
        } else if let Some(payload) = line.strip_prefix('-') {
            push_rule(&mut config.contexts[current], payload, ConfigRule::Exclude, line_no);
            pending_comment = None;
        } else if let Some(payload) = line.strip_prefix('@') {
            push_rule(&mut config.contexts[current], payload, ConfigRule::Switch, line_no);
            pending_comment = None;
        } else {
            debug!(
                line = line_no,
                content = line,
                "skipping unrecognized configuration line"
            );
        }
    }

    Ok(config)
}

fn push_rule(context: &mut Context, payload: &str, make: fn(String) -> ConfigRule, line_no: usize) {
    let payload = payload.trim();
    if payload.is_empty() {
        debug!(line = line_no, "skipping empty pattern");
        return;
    }
    context.rules.push(make(payload.to_string()));
}

/// Split a section header into its name and parent list. An empty or
/// comma-only parent list means no inheritance.
fn parse_header(header: &str) -> (String, Vec<String>) {
    match header.split_once(':') {
        Some((name, parents)) => (
            name.trim().to_string(),
            parents
                .split(',')
                .map(str::trim)
                .filter(|parent| !parent.is_empty())
                .map(String::from)
                .collect(),
        ),
        None => (header.trim().to_string(), Vec::new()),
    }
}
