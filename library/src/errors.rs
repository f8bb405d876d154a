use qitnotation_core::errors::{ExpansionError, SubstitutionError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("unknown macro `\\{0}`")]
    UnknownMacro(Box<str>),
    #[error("no specials defined for `{0}`")]
    UnknownSpecials(Box<str>),
    #[error("invalid argument specification `{0}`")]
    InvalidArgumentSpec(Box<str>),
    /// A built-in or user definition whose content does not parse, or refers to
    /// arguments it does not declare.
    #[error("invalid definition of `{name}`: {source}")]
    InvalidDefinition {
        name: Box<str>,
        #[source]
        source: SubstitutionError,
    },
    #[error(transparent)]
    Expansion(#[from] ExpansionError),
}
