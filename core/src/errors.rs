use thiserror::Error;

use crate::{invocation::Mode, tokens::SourceRange};

/// Errors while resolving which sizing form an invocation used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeSpecError {
    /// More than one of the backtick, bracket and star sizing forms was given;
    /// `range` points to the second one in source order.
    #[error("multiple sizing specifications (second one at {range})")]
    Ambiguous { range: SourceRange },
    /// A sizing argument did not have the required shape, e.g. the backtick form
    /// requires exactly one content node.
    #[error("malformed size argument at {range}: expected exactly one node, found {found}")]
    MalformedSizeArgument { range: SourceRange, found: usize },
}

/// Errors while expanding a content template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    /// A placeholder no rule (nor the fallback resolver) could satisfy.
    #[error("unresolved placeholder `{0}`")]
    UnresolvedPlaceholder(Box<str>),
    /// A dotted configuration path failed at either segment.
    #[error("unknown configuration path `{0}`")]
    UnknownConfigPath(Box<str>),
    /// The template itself does not follow the placeholder grammar.
    #[error("malformed template `{template}` at byte {offset}: {reason}")]
    MalformedTemplate {
        template: Box<str>,
        offset: usize,
        reason: &'static str,
    },
}

/// Errors of the reference argument matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentParseError {
    #[error("unexpected end of input while looking for {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("expected {expected} at {range}")]
    Expected {
        expected: &'static str,
        range: SourceRange,
    },
    #[error("unbalanced group delimiter at {range}")]
    Unbalanced { range: SourceRange },
}

/// Anything that can go wrong while expanding one macro invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    #[error(transparent)]
    Arguments(#[from] ArgumentParseError),
    #[error(transparent)]
    Size(#[from] SizeSpecError),
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
    #[error("`{name}` has no content in {mode} mode")]
    NotAvailableInMode { name: Box<str>, mode: Mode },
    #[error("main delimited argument at {range} is not a delimited group")]
    ExpectedDelimitedGroup { range: SourceRange },
}
