//! Context inheritance resolution.
//!
//! Contexts form an append-only DAG: a section may only name parents
//! declared strictly earlier in the file, so declaration order is already a
//! topological order and a single forward pass resolves every context, each
//! from the stored results of its parents. Cycles cannot be expressed, so
//! there is no cycle detector.

use super::error::ConfigError;
use super::{ConfigRule, Context, ResolvedContext, DEFAULT_CONTEXT};
use tracing::debug;

/// Resolution failure for one context, kept so contexts that inherit from a
/// broken parent surface the same error when requested.
#[derive(Debug, Clone)]
struct MissingParents {
    context: String,
    missing: Vec<String>,
}

impl From<MissingParents> for ConfigError {
    fn from(failure: MissingParents) -> Self {
        ConfigError::ParentNotFound {
            context: failure.context,
            missing: failure.missing.join(", "),
        }
    }
}

pub(crate) fn resolve(
    contexts: &[Context],
    requested: Option<&str>,
) -> Result<ResolvedContext, ConfigError> {
    let requested = requested.unwrap_or(DEFAULT_CONTEXT);
    let Some(target) = contexts.iter().position(|context| context.name == requested) else {
        debug!(
            context = requested,
            "requested context not defined, using empty configuration"
        );
        return Ok(ResolvedContext::empty(requested));
    };

    let mut resolved: Vec<Result<Vec<ConfigRule>, MissingParents>> = Vec::with_capacity(target);
    for (idx, context) in contexts[..target].iter().enumerate() {
        let outcome = resolve_one(contexts, &resolved, idx, context);
        resolved.push(outcome);
    }

    match resolve_one(contexts, &resolved, target, &contexts[target]) {
        Ok(rules) => Ok(ResolvedContext::new(requested, rules)),
        Err(failure) => Err(failure.into()),
    }
}

/// Resolve one context from the already-resolved results of everything
/// declared before it. A parent that is missing or declared later fails the
/// context; a parent that itself failed passes its failure through.
fn resolve_one(
    contexts: &[Context],
    resolved: &[Result<Vec<ConfigRule>, MissingParents>],
    idx: usize,
    context: &Context,
) -> Result<Vec<ConfigRule>, MissingParents> {
    let mut rules = Vec::new();
    let mut missing = Vec::new();
    let mut inherited_failure: Option<MissingParents> = None;

    for parent in &context.parents {
        match contexts[..idx]
            .iter()
            .position(|candidate| candidate.name == *parent)
        {
            Some(parent_idx) => match &resolved[parent_idx] {
                Ok(parent_rules) => rules.extend(parent_rules.iter().cloned()),
                Err(failure) => {
                    if inherited_failure.is_none() {
                        inherited_failure = Some(failure.clone());
                    }
                }
            },
            None => missing.push(parent.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(MissingParents {
            context: context.name.clone(),
            missing,
        });
    }
    if let Some(failure) = inherited_failure {
        return Err(failure);
    }

    rules.extend(context.rules.iter().cloned());
    Ok(rules)
}
