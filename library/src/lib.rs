#![allow(unexpected_cfgs)]
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

/*! # Quantum information notation
 *
 * Bra-kets, matrix elements, norms and intervals with sizable delimiters, small
 * substitution macros (`\Hs`, `\Ident`, gates, Lie groups) and operator names, built on
 * [`qitnotation_core`].
 *
 * Every delimited macro takes one of three optional sizing forms before its arguments:
 *
 * | Source | Output |
 * |--------|--------|
 * | `\abs{x}` | `\lvert{x}\rvert` |
 * | ``\abs`\big{x}`` | `\bigl \lvert{x}\bigr \rvert` |
 * | `\abs[\Big]{x}` | `\Bigl \lvert{x}\Bigr \rvert` |
 * | `\abs*{x}` | `\mathopen{}\left \lvert{x}\right \rvert\mathclose{}` |
 *
 * and the specials `` ` `` sizes an arbitrary delimited group: `` `\big(x) ``.
 *
 * ```
 * # use qitnotation::NotationFeature;
 * # use qitnotation_core::{invocation::Mode, tokens::{Token, TokenList}};
 * let feature = NotationFeature::new()?;
 * let mut tokens = TokenList::new([
 *     Token::begin_group(0..1),
 *     Token::control_sequence("psi", 1..5),
 *     Token::end_group(5..6),
 * ]);
 * assert_eq!(
 *     feature.invoke_macro("ket", &mut tokens, Mode::Math)?,
 *     r"\lvert{\psi}\rangle"
 * );
 * # Ok::<(), qitnotation::errors::LibraryError>(())
 * ```
 *
 * ## Feature flags
 **/
#![cfg_attr(doc,doc = document_features::document_features!())]

pub mod errors;
mod feature;
pub mod registry;
pub mod tables;
mod utils;

pub use feature::{NotationFeature, NotationFeatureBuilder, UserArgument, UserMacro};

pub(crate) use utils::macros::tests;

#[cfg(test)]
#[rstest::fixture]
fn trace() {
    let _ = tracing_subscriber::fmt().try_init();
}
