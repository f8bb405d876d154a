//! Expansion of a [`ContentTemplate`] against one invocation's arguments.

use crate::{
    arguments::ParsedArguments,
    config::ConfigTable,
    delimiters::{DelimiterSlot, DelimiterTriple},
    errors::SubstitutionError,
    template::{ContentTemplate, TemplatePart},
};

/// Name of the placeholder whose literal is a `category.key` path: `#[space.AfterComma]{config}`.
pub const CONFIG_PLACEHOLDER: &str = "config";

/// Resolves named placeholders that no built-in rule claims.
pub trait PlaceholderResolver {
    /// `None` leaves the placeholder unresolved.
    fn resolve(&self, name: &str, literal: Option<&str>) -> Option<String>;
}
impl<F> PlaceholderResolver for F
where
    F: Fn(&str, Option<&str>) -> Option<String>,
{
    #[inline]
    fn resolve(&self, name: &str, literal: Option<&str>) -> Option<String> {
        self(name, literal)
    }
}

/// Everything a template may refer to during one expansion.
#[derive(Clone, Copy)]
pub struct SubstitutionContext<'a> {
    pub arguments: &'a ParsedArguments,
    pub delimiters: &'a DelimiterTriple,
    pub config: &'a ConfigTable,
    /// Added to every numbered reference before the positional lookup.
    pub offset: usize,
    pub fallback: Option<&'a dyn PlaceholderResolver>,
}
impl<'a> SubstitutionContext<'a> {
    #[inline]
    #[must_use]
    pub const fn new(
        arguments: &'a ParsedArguments,
        delimiters: &'a DelimiterTriple,
        config: &'a ConfigTable,
    ) -> Self {
        Self {
            arguments,
            delimiters,
            config,
            offset: 0,
            fallback: None,
        }
    }
    #[inline]
    #[must_use]
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
    #[inline]
    #[must_use]
    pub const fn with_fallback(mut self, fallback: &'a dyn PlaceholderResolver) -> Self {
        self.fallback = Some(fallback);
        self
    }
}
impl std::fmt::Debug for SubstitutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubstitutionContext")
            .field("arguments", self.arguments)
            .field("delimiters", self.delimiters)
            .field("offset", &self.offset)
            .field("fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

/// Expands `template`, resolving every placeholder exactly once, left to right.
///
/// Named placeholders are tried in this order:
/// 1. `DelimLeft`/`DelimMiddle`/`DelimRight`: the slot's pattern of the active triple,
///    filled with the same-named argument, else the non-empty literal, else the base glyph;
/// 2. `config`: the literal is a `category.key` path;
/// 3. a declared argument: its content, or (if empty or absent) the literal;
/// 4. any other placeholder with a literal: the literal;
/// 5. a name containing `.`: a configuration path;
/// 6. the context's fallback resolver.
///
/// ### Errors
/// [`SubstitutionError::UnresolvedPlaceholder`] if nothing claims a placeholder, and
/// [`SubstitutionError::UnknownConfigPath`] if a configuration path does not exist.
pub fn substitute(
    template: &ContentTemplate,
    context: &SubstitutionContext<'_>,
) -> Result<String, SubstitutionError> {
    let mut out = String::with_capacity(template.as_str().len());
    for part in template.parts() {
        match part {
            TemplatePart::Text(t) => out.push_str(t),
            TemplatePart::Numbered(n) => {
                let position = usize::from(*n) + context.offset;
                let Some(arg) = context.arguments.by_position(position) else {
                    return Err(SubstitutionError::UnresolvedPlaceholder(
                        format!("#{n}").into(),
                    ));
                };
                tracing::trace!("#{n} -> argument {position}");
                out.push_str(arg.verbatim());
            }
            TemplatePart::Named { name, literal, raw } => {
                let value = resolve_named(name, literal.as_deref(), context)?
                    .ok_or_else(|| SubstitutionError::UnresolvedPlaceholder(raw.clone()))?;
                tracing::trace!("{raw} -> {value:?}");
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}

fn resolve_named(
    name: &str,
    literal: Option<&str>,
    context: &SubstitutionContext<'_>,
) -> Result<Option<String>, SubstitutionError> {
    if let Some(slot) = DelimiterSlot::from_placeholder(name) {
        let glyph = context
            .arguments
            .by_name(name)
            .filter(|a| a.has_content())
            .map(crate::arguments::ParsedArgument::verbatim)
            .or(literal.filter(|l| !l.is_empty()))
            .unwrap_or_else(|| context.delimiters.base().get(slot));
        return Ok(Some(context.delimiters.wrap(slot, glyph)));
    }
    if name == CONFIG_PLACEHOLDER
        && let Some(path) = literal
    {
        return context.config.lookup(path).map(|v| Some(v.to_string()));
    }
    if let Some(arg) = context.arguments.by_name(name) {
        return Ok(Some(match literal {
            Some(l) if !arg.has_content() => l.to_string(),
            _ => arg.verbatim().to_string(),
        }));
    }
    if let Some(l) = literal {
        return Ok(Some(l.to_string()));
    }
    if name.contains('.') {
        return context.config.lookup(name).map(|v| Some(v.to_string()));
    }
    Ok(context.fallback.and_then(|f| f.resolve(name, literal)))
}

crate::tests! {
    numbered_references_are_offset {
        use crate::arguments::{ArgumentDescriptor, ArgumentParser, ParsedArgument};
        use crate::nodes::Node;
        let args = ParsedArguments::new()
            .with(ArgumentDescriptor::SIZE_BACKTICK, ParsedArgument::absent(0))
            .with(ArgumentDescriptor::SIZE_STAR, ParsedArgument::absent(0))
            .with(ArgumentDescriptor::SIZE_BRACKET, ParsedArgument::absent(0))
            .with(ArgumentDescriptor::new(ArgumentParser::Brace), ParsedArgument::provided(Node::group("{", "}", [Node::chars("x", 1..2)], 0..3)))
            .with(ArgumentDescriptor::new(ArgumentParser::Brace), ParsedArgument::provided(Node::chars("y", 3..4)));
        let triple = DelimiterTriple::default();
        let config = ConfigTable::default();
        let context = SubstitutionContext::new(&args, &triple, &config).with_offset(3);
        let template = ContentTemplate::parse("{#1},{#2}").unwrap();
        assert_eq!(substitute(&template, &context).unwrap(), "{x},{y}");
        let template = ContentTemplate::parse("#3").unwrap();
        assert_eq!(
            substitute(&template, &context),
            Err(SubstitutionError::UnresolvedPlaceholder("#3".into()))
        );
    };
    delimiters_wrap_their_glyph {
        use crate::arguments::ParsedArgument;
        use crate::delimiters::{BaseDelimiters, SizePolicy};
        use crate::nodes::Node;
        let args = ParsedArguments::new();
        let triple = DelimiterTriple::new(SizePolicy::Literal(r"\big".into()), BaseDelimiters::new(r"\langle", r"\rangle"));
        let config = ConfigTable::default();
        let context = SubstitutionContext::new(&args, &triple, &config);
        let template = ContentTemplate::parse(r"#[]{DelimLeft}x#[\vert]{DelimMiddle}y#{DelimRight}").unwrap();
        assert_eq!(
            substitute(&template, &context).unwrap(),
            r"\bigl \langlex\mathclose{}\big \vert\mathopen{}y\bigr \rangle"
        );
    };
    literal_with_fallback {
        use crate::arguments::{ArgumentDescriptor, ArgumentParser, ParsedArgument};
        use crate::nodes::Node;
        let template = ContentTemplate::parse("#[|]{Sep}").unwrap();
        let triple = DelimiterTriple::default();
        let config = ConfigTable::default();

        let with = ParsedArguments::new().with(
            ArgumentDescriptor::named("Sep", ArgumentParser::OptionalBracket),
            ParsedArgument::provided(Node::group("[", "]", [Node::chars("X", 1..2)], 0..3)),
        );
        assert_eq!(substitute(&template, &SubstitutionContext::new(&with, &triple, &config)).unwrap(), "X");

        let empty = ParsedArguments::new().with(
            ArgumentDescriptor::named("Sep", ArgumentParser::OptionalBracket),
            ParsedArgument::provided(Node::group("[", "]", crate::nodes::NodeList::new(), 0..2)),
        );
        assert_eq!(substitute(&template, &SubstitutionContext::new(&empty, &triple, &config)).unwrap(), "|");

        let absent = ParsedArguments::new().with(
            ArgumentDescriptor::named("Sep", ArgumentParser::OptionalBracket),
            ParsedArgument::absent(0),
        );
        assert_eq!(substitute(&template, &SubstitutionContext::new(&absent, &triple, &config)).unwrap(), "|");

        let undeclared = ParsedArguments::new();
        assert_eq!(substitute(&template, &SubstitutionContext::new(&undeclared, &triple, &config)).unwrap(), "|");
    };
    config_paths {
        let args = ParsedArguments::new();
        let triple = DelimiterTriple::default();
        let config = ConfigTable::from_static(&[("space", &[("BeforeComma", ""), ("AfterComma", "Y")])]);
        let context = SubstitutionContext::new(&args, &triple, &config);
        let template = ContentTemplate::parse("a#[space.BeforeComma]{config},#{space.AfterComma}b").unwrap();
        assert_eq!(substitute(&template, &context).unwrap(), "a,Yb");
        let template = ContentTemplate::parse("#[space.Missing]{config}").unwrap();
        assert_eq!(
            substitute(&template, &context),
            Err(SubstitutionError::UnknownConfigPath("space.Missing".into()))
        );
        let template = ContentTemplate::parse("#{space.Missing}").unwrap();
        assert!(matches!(substitute(&template, &context), Err(SubstitutionError::UnknownConfigPath(_))));
    };
    fallback_resolver {
        let args = ParsedArguments::new();
        let triple = DelimiterTriple::default();
        let config = ConfigTable::default();
        let resolver = |name: &str, _: Option<&str>| (name == "Known").then(|| "k".to_string());
        let context = SubstitutionContext::new(&args, &triple, &config).with_fallback(&resolver);
        let template = ContentTemplate::parse("#{Known}").unwrap();
        assert_eq!(substitute(&template, &context).unwrap(), "k");
        let template = ContentTemplate::parse("x#{Unknown}").unwrap();
        assert_eq!(
            substitute(&template, &context),
            Err(SubstitutionError::UnresolvedPlaceholder("#{Unknown}".into()))
        );
    };
    idempotent {
        use crate::arguments::{ArgumentDescriptor, ArgumentParser, ParsedArgument};
        use crate::delimiters::{BaseDelimiters, SizePolicy};
        use crate::nodes::Node;
        let args = ParsedArguments::new().with(
            ArgumentDescriptor::new(ArgumentParser::Brace),
            ParsedArgument::provided(Node::control_sequence("psi", 0..4)),
        );
        let triple = DelimiterTriple::new(SizePolicy::Auto, BaseDelimiters::new("(", ")"));
        let config = ConfigTable::from_static(&[("space", &[("AfterComma", "Y")])]);
        let context = SubstitutionContext::new(&args, &triple, &config);
        let template = ContentTemplate::parse("#{DelimLeft}#1#{space.AfterComma}#{DelimRight}").unwrap();
        let first = substitute(&template, &context).unwrap();
        assert_eq!(first, r"\mathopen{}\left (\psiY\right )\mathclose{}");
        assert_eq!(substitute(&template, &context).unwrap(), first);
        assert_eq!(config, ConfigTable::from_static(&[("space", &[("AfterComma", "Y")])]));
    }
}
