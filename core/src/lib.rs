#![allow(unexpected_cfgs)]
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

/*! # Notation macro core
 *
 * Delimiter sizing and content-template substitution for notation macros such as
 * `\abs`, `\braket` or `\matrixel`. The host engine tokenizes its input and hands
 * over a [`TokenStream`](tokens::TokenStream); this crate
 * - matches a macro's [`ArgumentDescriptor`](arguments::ArgumentDescriptor)s against
 *   that stream,
 * - resolves which of the three mutually exclusive sizing forms (`` `\big ``, `*`,
 *   `[\big]`) the invocation used ([`resolve_delimiter_policy`](delimiters::resolve_delimiter_policy)),
 * - and expands the macro's [`ContentTemplate`](template::ContentTemplate) against the
 *   parsed arguments, the active [`DelimiterTriple`](delimiters::DelimiterTriple) and
 *   a read-only [`ConfigTable`](config::ConfigTable) ([`substitute`](substitution::substitute)).
 *
 * ## Template grammar
 *
 * | Marker | Meaning |
 * |--------|---------|
 * | `#1`…`#9` | numbered argument, shifted by the argument number offset |
 * | `#{Name}` | named argument, `DelimLeft`/`DelimMiddle`/`DelimRight`, or `category.key` |
 * | `#[literal]{Name}` | named reference carrying a literal fallback |
 * | `#[category.key]{config}` | configuration lookup |
 * | `##` | a literal `#` |
 *
 * ## Feature flags
 **/
#![cfg_attr(doc,doc = document_features::document_features!())]

pub mod arguments;
pub mod config;
pub mod delimiters;
pub mod errors;
pub mod invocation;
pub mod nodes;
pub mod size;
pub mod substitution;
pub mod template;
pub mod tokens;
mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub(crate) use utils::macros::tests;

/// Re-exports of the types a host needs to drive an invocation.
pub mod prelude {
    pub use crate::arguments::{ArgumentDescriptor, ArgumentParser, ParsedArgument, ParsedArguments};
    pub use crate::config::{ConfigOverrides, ConfigTable};
    pub use crate::delimiters::{BaseDelimiters, DelimiterSlot, DelimiterTriple, SizePolicy};
    pub use crate::errors::{ArgumentParseError, ExpansionError, SizeSpecError, SubstitutionError};
    pub use crate::invocation::{MacroContent, MacroDefinition, Mode};
    pub use crate::nodes::{Node, NodeKind, NodeList};
    pub use crate::substitution::{PlaceholderResolver, SubstitutionContext};
    pub use crate::template::ContentTemplate;
    pub use crate::tokens::{SourceRange, Token, TokenKind, TokenList, TokenStream};
}

#[cfg(test)]
#[rstest::fixture]
fn trace() {
    let _ = tracing_subscriber::fmt().try_init();
}
