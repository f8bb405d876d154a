//! Macro definitions and the expansion of one invocation.

use crate::{
    arguments::{
        ArgumentDescriptor, MAIN_DELIMITED_ARGUMENT, ParsedArguments, SizeRole,
        argument_number_offset, parse_arguments,
    },
    config::ConfigTable,
    delimiters::{BaseDelimiters, DelimiterTriple, resolve_delimiter_policy},
    errors::{ArgumentParseError, ExpansionError, SubstitutionError},
    substitution::{PlaceholderResolver, SubstitutionContext, substitute},
    template::ContentTemplate,
    tokens::TokenStream,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    Text,
    #[default]
    Math,
}
impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Math => "math",
        })
    }
}

/// A macro's content per [`Mode`]; `None` means the macro is not available in that mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroContent {
    pub text: Option<ContentTemplate>,
    pub math: Option<ContentTemplate>,
}
impl MacroContent {
    #[must_use]
    pub fn both(template: ContentTemplate) -> Self {
        Self {
            text: Some(template.clone()),
            math: Some(template),
        }
    }
    #[inline]
    #[must_use]
    pub const fn math_only(template: ContentTemplate) -> Self {
        Self {
            text: None,
            math: Some(template),
        }
    }
    #[inline]
    #[must_use]
    pub const fn for_mode(&self, mode: Mode) -> Option<&ContentTemplate> {
        match mode {
            Mode::Text => self.text.as_ref(),
            Mode::Math => self.math.as_ref(),
        }
    }
    fn templates(&self) -> impl Iterator<Item = &ContentTemplate> {
        self.text.iter().chain(self.math.iter())
    }
}

/// An immutable macro record: formal arguments, content and base delimiter glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroDefinition {
    name: Box<str>,
    arguments: Box<[ArgumentDescriptor]>,
    content: MacroContent,
    delimiters: BaseDelimiters,
}

impl MacroDefinition {
    #[must_use]
    pub fn new(
        name: &str,
        arguments: impl Into<Box<[ArgumentDescriptor]>>,
        content: MacroContent,
    ) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
            content,
            delimiters: BaseDelimiters::default(),
        }
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: BaseDelimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }
    #[inline]
    #[must_use]
    pub const fn content(&self) -> &MacroContent {
        &self.content
    }
    #[inline]
    #[must_use]
    pub const fn delimiters(&self) -> &BaseDelimiters {
        &self.delimiters
    }

    #[inline]
    #[must_use]
    pub fn argument_number_offset(&self) -> usize {
        argument_number_offset(&self.arguments)
    }

    /// Checks that every numbered reference in the content points at a declared argument.
    ///
    /// ### Errors
    /// [`SubstitutionError::UnresolvedPlaceholder`] for the first reference out of range.
    pub fn validate(&self) -> Result<(), SubstitutionError> {
        let offset = self.argument_number_offset();
        for template in self.content.templates() {
            if let Some(n) = template.max_numbered()
                && usize::from(n) + offset > self.arguments.len()
            {
                return Err(SubstitutionError::UnresolvedPlaceholder(
                    format!("#{n}").into(),
                ));
            }
        }
        Ok(())
    }

    /// Matches this macro's arguments against `stream`.
    ///
    /// ### Errors
    /// if a mandatory argument is missing or malformed.
    #[inline]
    pub fn parse_arguments<S: TokenStream + ?Sized>(
        &self,
        stream: &mut S,
    ) -> Result<ParsedArguments, ArgumentParseError> {
        parse_arguments(&self.arguments, stream)
    }

    /// The delimiter triple for one invocation. A [`MAIN_DELIMITED_ARGUMENT`] that was
    /// given overrides the base glyphs with its own delimiters.
    ///
    /// ### Errors
    /// if the sizing arguments conflict, or the main delimited argument is not a group.
    pub fn delimiter_triple(
        &self,
        arguments: &ParsedArguments,
    ) -> Result<DelimiterTriple, ExpansionError> {
        let base = match arguments
            .by_name(MAIN_DELIMITED_ARGUMENT)
            .filter(|a| a.was_provided())
        {
            Some(main) => {
                let Some((open, close)) = main.group_delimiters() else {
                    return Err(ExpansionError::ExpectedDelimitedGroup {
                        range: main.range(),
                    });
                };
                BaseDelimiters::inherited(open, close)
            }
            None => self.delimiters.clone(),
        };
        Ok(resolve_delimiter_policy(
            arguments.size_argument(SizeRole::Literal),
            arguments.size_argument(SizeRole::Bracket),
            arguments.size_argument(SizeRole::Star),
            base,
        )?)
    }

    /// Expands already parsed arguments.
    ///
    /// ### Errors
    /// if the macro has no content in `mode`, or sizing or substitution fails.
    pub fn expand(
        &self,
        arguments: &ParsedArguments,
        mode: Mode,
        config: &ConfigTable,
        fallback: Option<&dyn PlaceholderResolver>,
    ) -> Result<String, ExpansionError> {
        let Some(template) = self.content.for_mode(mode) else {
            return Err(ExpansionError::NotAvailableInMode {
                name: self.name.clone(),
                mode,
            });
        };
        let triple = self.delimiter_triple(arguments)?;
        let mut context = SubstitutionContext::new(arguments, &triple, config)
            .with_offset(self.argument_number_offset());
        context.fallback = fallback;
        let expanded = substitute(template, &context)?;
        tracing::debug!("expanded \\{} in {mode} mode", self.name);
        Ok(expanded)
    }

    /// Parses this macro's arguments from `stream` and expands them.
    ///
    /// ### Errors
    /// see [`parse_arguments`](Self::parse_arguments) and [`expand`](Self::expand).
    pub fn invoke<S: TokenStream + ?Sized>(
        &self,
        stream: &mut S,
        mode: Mode,
        config: &ConfigTable,
        fallback: Option<&dyn PlaceholderResolver>,
    ) -> Result<String, ExpansionError> {
        let arguments = self.parse_arguments(stream)?;
        self.expand(&arguments, mode, config, fallback)
    }
}

crate::tests! {
    sized_delimited_macro {
        use crate::{arguments::ArgumentParser, testing::lex};
        let mut arguments = ArgumentDescriptor::SIZING_SLOTS.to_vec();
        arguments.push(ArgumentDescriptor::new(ArgumentParser::Brace));
        let abs = MacroDefinition::new(
            "abs",
            arguments,
            MacroContent::both(ContentTemplate::parse("#[|]{DelimLeft}{#1}#[|]{DelimRight}").unwrap()),
        );
        abs.validate().unwrap();
        let config = ConfigTable::default();
        let expand = |source: &str| abs.invoke(&mut lex(source), Mode::Math, &config, None);
        assert_eq!(expand("{x}").unwrap(), "|{x}|");
        assert_eq!(expand(r"`\big{x}").unwrap(), r"\bigl |{x}\bigr |");
        assert_eq!(expand(r"*{x}").unwrap(), r"\mathopen{}\left |{x}\right |\mathclose{}");
        assert_eq!(expand(r"[\Big]{x}").unwrap(), r"\Bigl |{x}\Bigr |");
        assert_eq!(expand(r"[*]{x}").unwrap(), r"\mathopen{}\left |{x}\right |\mathclose{}");
        assert!(matches!(expand(r"*[\big]{x}"), Err(ExpansionError::Size(_))));
    };
    main_delimited_argument {
        use crate::{arguments::ArgumentParser, testing::lex};
        let special = MacroDefinition::new(
            "`",
            [
                ArgumentDescriptor::named(crate::arguments::SIZE_ARG_BRACKET, ArgumentParser::SizeToken),
                ArgumentDescriptor::named(MAIN_DELIMITED_ARGUMENT, ArgumentParser::AnyDelimited),
            ],
            MacroContent::math_only(ContentTemplate::parse("#{DelimLeft}#{MainDelimitedArgument}#{DelimRight}").unwrap()),
        );
        let config = ConfigTable::default();
        assert_eq!(
            special.invoke(&mut lex(r"\big<x>"), Mode::Math, &config, None).unwrap(),
            r"\bigl \langlex\bigr \rangle"
        );
        assert_eq!(
            special.invoke(&mut lex(r"*(x)"), Mode::Math, &config, None).unwrap(),
            r"\mathopen{}\left (x\right )\mathclose{}"
        );
        assert_eq!(
            special.invoke(&mut lex(r"(x)"), Mode::Text, &config, None),
            Err(ExpansionError::NotAvailableInMode { name: "`".into(), mode: Mode::Text })
        );
    };
    main_delimited_argument_must_be_group {
        use crate::{arguments::{ArgumentParser, ParsedArgument}, nodes::Node};
        let def = MacroDefinition::new(
            "x",
            [ArgumentDescriptor::named(MAIN_DELIMITED_ARGUMENT, ArgumentParser::Brace)],
            MacroContent::both(ContentTemplate::parse("#1").unwrap()),
        );
        let args = ParsedArguments::new().with(
            ArgumentDescriptor::named(MAIN_DELIMITED_ARGUMENT, ArgumentParser::Brace),
            ParsedArgument::provided(Node::chars("y", 2..3)),
        );
        assert!(matches!(
            def.expand(&args, Mode::Math, &ConfigTable::default(), None),
            Err(ExpansionError::ExpectedDelimitedGroup { .. })
        ));
    };
    validate_numbered_references {
        use crate::arguments::ArgumentParser;
        let mut arguments = ArgumentDescriptor::SIZING_SLOTS.to_vec();
        arguments.push(ArgumentDescriptor::new(ArgumentParser::Brace));
        let def = MacroDefinition::new(
            "bad",
            arguments,
            MacroContent::both(ContentTemplate::parse("#1#2").unwrap()),
        );
        assert_eq!(def.argument_number_offset(), 3);
        assert_eq!(def.validate(), Err(SubstitutionError::UnresolvedPlaceholder("#2".into())));
    };
    base_delimiters_and_fallback {
        use crate::{arguments::ArgumentParser, testing::lex};
        let def = MacroDefinition::new(
            "ket",
            [ArgumentDescriptor::new(ArgumentParser::Brace)],
            MacroContent::both(ContentTemplate::parse("#{DelimLeft}#1#{Extra}#{DelimRight}").unwrap()),
        )
        .with_delimiters(BaseDelimiters::new("|", r"\rangle"));
        let resolver = |name: &str, _: Option<&str>| (name == "Extra").then(|| ",".to_string());
        let config = ConfigTable::default();
        assert_eq!(
            def.invoke(&mut lex(r"{\psi}"), Mode::Text, &config, Some(&resolver)).unwrap(),
            r"|\psi,\rangle"
        );
        assert!(def.invoke(&mut lex(r"{\psi}"), Mode::Text, &config, None).is_err());
    }
}
