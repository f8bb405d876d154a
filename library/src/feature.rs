//! The feature facade: configuration overrides and user definitions on top of the built-ins.

use qitnotation_core::{
    arguments::{ArgumentDescriptor, ArgumentParser},
    config::{ConfigOverrides, ConfigTable},
    invocation::{MacroContent, MacroDefinition, Mode},
    substitution::PlaceholderResolver,
    tokens::TokenStream,
};
use triomphe::Arc;

use crate::{
    errors::LibraryError,
    registry::{MacroRegistry, parse, sized},
    tables::CONFIG_DEFAULTS,
};

/// One formal argument of a user definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserArgument {
    /// `` `\big ``
    SizeArgBacktick,
    /// `*`
    SizeArgStar,
    /// `[\big]` or `[*]`
    SizeArgOptArg,
    Argument(ArgumentDescriptor),
}
impl UserArgument {
    /// Parses an argument specification:
    /// `SizeArgBacktick`, `SizeArgStar`, `SizeArgOptArg`, `{`, `[`, `*`, `AnyDelimited`,
    /// or `r` followed by an opening and a closing character, e.g. `r()`.
    #[must_use]
    pub fn from_spec(spec: &str) -> Option<Self> {
        Some(match spec {
            "SizeArgBacktick" => Self::SizeArgBacktick,
            "SizeArgStar" => Self::SizeArgStar,
            "SizeArgOptArg" => Self::SizeArgOptArg,
            "{" => Self::Argument(ArgumentDescriptor::new(ArgumentParser::Brace)),
            "[" => Self::Argument(ArgumentDescriptor::new(ArgumentParser::OptionalBracket)),
            "*" => Self::Argument(ArgumentDescriptor::new(ArgumentParser::Star)),
            "AnyDelimited" => Self::Argument(ArgumentDescriptor::new(ArgumentParser::AnyDelimited)),
            s => {
                let mut chars = s.strip_prefix('r')?.chars();
                let (Some(open), Some(close), None) = (chars.next(), chars.next(), chars.next())
                else {
                    return None;
                };
                Self::Argument(ArgumentDescriptor::new(ArgumentParser::Delimited {
                    open,
                    close,
                }))
            }
        })
    }

    #[must_use]
    pub fn into_descriptor(self) -> ArgumentDescriptor {
        match self {
            Self::SizeArgBacktick => ArgumentDescriptor::SIZE_BACKTICK,
            Self::SizeArgStar => ArgumentDescriptor::SIZE_STAR,
            Self::SizeArgOptArg => ArgumentDescriptor::SIZE_BRACKET,
            Self::Argument(d) => d,
        }
    }
}
impl From<ArgumentDescriptor> for UserArgument {
    #[inline]
    fn from(descriptor: ArgumentDescriptor) -> Self {
        Self::Argument(descriptor)
    }
}

/// A macro defined by the user of the feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserMacro {
    /// No arguments.
    Content(Box<str>),
    /// Arguments in the given order; sizing slots only where listed.
    WithArguments {
        arguments: Vec<UserArgument>,
        content: Box<str>,
    },
    /// Preceded by all three sizing slots, like the built-in delimited macros.
    Delimited {
        arguments: Vec<ArgumentDescriptor>,
        content: Box<str>,
    },
}
impl From<&str> for UserMacro {
    #[inline]
    fn from(content: &str) -> Self {
        Self::Content(content.into())
    }
}
impl UserMacro {
    /// A definition whose arguments are given as specifications, see
    /// [`UserArgument::from_spec`].
    ///
    /// ### Errors
    /// [`LibraryError::InvalidArgumentSpec`] for the first specification that does not parse.
    pub fn with_argument_specs(specs: &[&str], content: &str) -> Result<Self, LibraryError> {
        let arguments = specs
            .iter()
            .map(|s| {
                UserArgument::from_spec(s)
                    .ok_or_else(|| LibraryError::InvalidArgumentSpec((*s).into()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::WithArguments {
            arguments,
            content: content.into(),
        })
    }

    fn into_definition(self, name: &str) -> Result<MacroDefinition, LibraryError> {
        let (arguments, content) = match self {
            Self::Content(content) => (Vec::new(), content),
            Self::WithArguments { arguments, content } => (
                arguments
                    .into_iter()
                    .map(UserArgument::into_descriptor)
                    .collect(),
                content,
            ),
            Self::Delimited { arguments, content } => (sized(arguments), content),
        };
        let content = parse(name, &content)?;
        Ok(MacroDefinition::new(
            name,
            arguments,
            MacroContent::both(content),
        ))
    }
}

/// Built-in and user macros together with the merged configuration.
#[derive(Debug, Clone)]
pub struct NotationFeature {
    registry: MacroRegistry,
    config: Arc<ConfigTable>,
}

impl NotationFeature {
    pub const NAME: &'static str = "qitnotation";

    /// The built-ins with the default configuration.
    ///
    /// ### Errors
    /// if a built-in definition is invalid.
    #[inline]
    pub fn new() -> Result<Self, LibraryError> {
        NotationFeatureBuilder::default().build()
    }

    #[inline]
    #[must_use]
    pub fn builder() -> NotationFeatureBuilder {
        NotationFeatureBuilder::default()
    }

    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Arc<ConfigTable> {
        &self.config
    }

    /// ### Errors
    /// [`LibraryError::UnknownMacro`]
    pub fn definition(&self, name: &str) -> Result<&Arc<MacroDefinition>, LibraryError> {
        self.registry
            .get(name)
            .ok_or_else(|| LibraryError::UnknownMacro(name.into()))
    }

    /// Expands the macro `\name`, whose arguments follow in `stream`.
    ///
    /// ### Errors
    /// if the macro is unknown or its expansion fails.
    #[inline]
    pub fn invoke_macro<S: TokenStream + ?Sized>(
        &self,
        name: &str,
        stream: &mut S,
        mode: Mode,
    ) -> Result<String, LibraryError> {
        self.invoke_macro_with(name, stream, mode, None)
    }

    /// Like [`invoke_macro`](Self::invoke_macro), with a resolver for placeholders the
    /// built-in rules do not claim.
    ///
    /// ### Errors
    /// if the macro is unknown or its expansion fails.
    pub fn invoke_macro_with<S: TokenStream + ?Sized>(
        &self,
        name: &str,
        stream: &mut S,
        mode: Mode,
        fallback: Option<&dyn PlaceholderResolver>,
    ) -> Result<String, LibraryError> {
        Ok(self
            .definition(name)?
            .invoke(stream, mode, &self.config, fallback)?)
    }

    /// Expands the specials `chars`, whose arguments follow in `stream`.
    ///
    /// ### Errors
    /// if no specials are defined for `chars` or the expansion fails.
    #[inline]
    pub fn invoke_specials<S: TokenStream + ?Sized>(
        &self,
        chars: &str,
        stream: &mut S,
        mode: Mode,
    ) -> Result<String, LibraryError> {
        self.invoke_specials_with(chars, stream, mode, None)
    }

    /// Like [`invoke_specials`](Self::invoke_specials), with a resolver for placeholders the
    /// built-in rules do not claim.
    ///
    /// ### Errors
    /// if no specials are defined for `chars` or the expansion fails.
    pub fn invoke_specials_with<S: TokenStream + ?Sized>(
        &self,
        chars: &str,
        stream: &mut S,
        mode: Mode,
        fallback: Option<&dyn PlaceholderResolver>,
    ) -> Result<String, LibraryError> {
        let Some(definition) = self.registry.get_specials(chars) else {
            return Err(LibraryError::UnknownSpecials(chars.into()));
        };
        Ok(definition.invoke(stream, mode, &self.config, fallback)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotationFeatureBuilder {
    overrides: ConfigOverrides,
    definitions: Vec<(Box<str>, UserMacro)>,
    specials: Vec<(Box<str>, UserMacro)>,
}

impl NotationFeatureBuilder {
    /// Merges `overrides` into the ones given so far.
    #[must_use]
    pub fn config(mut self, overrides: ConfigOverrides) -> Self {
        for (category, key, value) in overrides.iter() {
            self.overrides.set(category, key, value);
        }
        self
    }

    #[must_use]
    pub fn config_value(mut self, category: &str, key: &str, value: &str) -> Self {
        self.overrides.set(category, key, value);
        self
    }

    /// Adds a user macro; it replaces a built-in of the same name.
    #[must_use]
    pub fn define(mut self, name: &str, definition: impl Into<UserMacro>) -> Self {
        self.definitions.push((name.into(), definition.into()));
        self
    }

    /// Adds user specials for the characters `chars`; they replace built-in specials.
    #[must_use]
    pub fn define_specials(mut self, chars: &str, definition: impl Into<UserMacro>) -> Self {
        self.specials.push((chars.into(), definition.into()));
        self
    }

    /// ### Errors
    /// if a built-in or user definition is invalid.
    pub fn build(self) -> Result<NotationFeature, LibraryError> {
        let config = ConfigTable::from_static(CONFIG_DEFAULTS).merged(&self.overrides);
        let mut registry = MacroRegistry::builtin()?;
        for (name, definition) in self.definitions {
            registry.insert_macro(definition.into_definition(&name)?)?;
        }
        for (chars, definition) in self.specials {
            registry.insert_specials(definition.into_definition(&chars)?)?;
        }
        Ok(NotationFeature {
            registry,
            config: Arc::new(config),
        })
    }
}

crate::tests! {
    argument_specs {
        assert_eq!(UserArgument::from_spec("SizeArgStar"), Some(UserArgument::SizeArgStar));
        assert_eq!(
            UserArgument::from_spec("r()").map(UserArgument::into_descriptor),
            Some(ArgumentDescriptor::new(ArgumentParser::Delimited { open: '(', close: ')' }))
        );
        assert_eq!(UserArgument::from_spec("r("), None);
        assert_eq!(UserArgument::from_spec("x"), None);
        assert_eq!(
            UserMacro::with_argument_specs(&["SizeArgOptArg", "q"], "#1"),
            Err(LibraryError::InvalidArgumentSpec("q".into()))
        );
    };
    overrides_reach_the_table {
        let feature = NotationFeature::builder()
            .config_value("spaceKets", "Bar", r"\,")
            .config(ConfigOverrides::new().with("space", "AfterComma", "Y"))
            .build()
            .unwrap();
        assert_eq!(feature.config().get("spaceKets", "Bar"), Some(r"\,"));
        assert_eq!(feature.config().get("spaceKets", "RLAngle"), Some(r"\mkern -1.8mu "));
        assert_eq!(feature.config().lookup("space.AfterComma"), Ok("Y"));
    };
    user_definitions_are_validated {
        let err = NotationFeature::builder()
            .define("broken", UserMacro::WithArguments {
                arguments: vec![UserArgument::SizeArgStar, UserArgument::Argument(ArgumentDescriptor::new(ArgumentParser::Brace))],
                content: "#1#2".into(),
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidDefinition { name, .. } if &*name == "broken"));
    }
}
