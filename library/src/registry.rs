//! Name → definition lookup for macros and specials.

use qitnotation_core::{
    arguments::{
        ArgumentDescriptor, ArgumentParser, MAIN_DELIMITED_ARGUMENT, SIZE_ARG_BRACKET,
    },
    delimiters::BaseDelimiters,
    invocation::{MacroContent, MacroDefinition},
    template::ContentTemplate,
};
use rustc_hash::FxHashMap;
use triomphe::Arc;

use crate::{
    errors::LibraryError,
    tables::{
        DELIMITED, DelimitedSpec, OPERATORS, SIZED_GROUP_CONTENT, SIZED_GROUP_SPECIALS,
        SUBSTITUTIONS, SubstitutionSpec,
    },
};

/// Read-only after construction; definitions are shared through [`Arc`]s.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: FxHashMap<Box<str>, Arc<MacroDefinition>>,
    specials: FxHashMap<Box<str>, Arc<MacroDefinition>>,
}

impl MacroRegistry {
    /// All built-in macros and specials.
    ///
    /// ### Errors
    /// if a built-in template does not parse.
    pub fn builtin() -> Result<Self, LibraryError> {
        let mut registry = Self::default();
        for (name, spec) in DELIMITED.entries() {
            registry.insert_macro(delimited(name, spec)?)?;
        }
        for (name, spec) in SUBSTITUTIONS.entries() {
            registry.insert_macro(substitution(name, spec)?)?;
        }
        for (name, op) in OPERATORS.entries() {
            let content = parse(name, &format!(r"\operatorname{{{op}}}"))?;
            registry.insert_macro(MacroDefinition::new(
                name,
                Vec::<ArgumentDescriptor>::new(),
                MacroContent::both(content),
            ))?;
        }
        registry.insert_specials(sized_group()?)?;
        tracing::debug!(
            "registered {} built-in macros and {} specials",
            registry.macros.len(),
            registry.specials.len()
        );
        Ok(registry)
    }

    /// Adds or replaces a macro, after checking its numbered references.
    ///
    /// ### Errors
    /// if the definition refers to an argument it does not declare.
    pub fn insert_macro(
        &mut self,
        definition: MacroDefinition,
    ) -> Result<Option<Arc<MacroDefinition>>, LibraryError> {
        validate(&definition)?;
        let name: Box<str> = definition.name().into();
        let previous = self.macros.insert(name, Arc::new(definition));
        if let Some(previous) = &previous {
            tracing::debug!("replacing definition of \\{}", previous.name());
        }
        Ok(previous)
    }

    /// Adds or replaces a specials definition.
    ///
    /// ### Errors
    /// if the definition refers to an argument it does not declare.
    pub fn insert_specials(
        &mut self,
        definition: MacroDefinition,
    ) -> Result<Option<Arc<MacroDefinition>>, LibraryError> {
        validate(&definition)?;
        let chars: Box<str> = definition.name().into();
        Ok(self.specials.insert(chars, Arc::new(definition)))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<MacroDefinition>> {
        self.macros.get(name)
    }

    #[inline]
    #[must_use]
    pub fn get_specials(&self, chars: &str) -> Option<&Arc<MacroDefinition>> {
        self.specials.get(chars)
    }

    #[inline]
    pub fn macro_names(&self) -> impl Iterator<Item = &str> {
        self.macros.keys().map(|k| &**k)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.len() + self.specials.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty() && self.specials.is_empty()
    }
}

fn validate(definition: &MacroDefinition) -> Result<(), LibraryError> {
    definition
        .validate()
        .map_err(|source| LibraryError::InvalidDefinition {
            name: definition.name().into(),
            source,
        })
}

pub(crate) fn parse(name: &str, template: &str) -> Result<ContentTemplate, LibraryError> {
    ContentTemplate::parse(template).map_err(|source| LibraryError::InvalidDefinition {
        name: name.into(),
        source,
    })
}

/// The three sizing slots followed by `arguments`.
pub(crate) fn sized(
    arguments: impl IntoIterator<Item = ArgumentDescriptor>,
) -> Vec<ArgumentDescriptor> {
    let mut ret = ArgumentDescriptor::SIZING_SLOTS.to_vec();
    ret.extend(arguments);
    ret
}

fn delimited(name: &str, spec: &DelimitedSpec) -> Result<MacroDefinition, LibraryError> {
    let arguments = sized(std::iter::repeat_n(
        ArgumentDescriptor::new(ArgumentParser::Brace),
        spec.arguments,
    ));
    let content = parse(name, &spec.template())?;
    Ok(MacroDefinition::new(name, arguments, MacroContent::both(content))
        .with_delimiters(BaseDelimiters::new(spec.left, spec.right)))
}

fn substitution(name: &str, spec: &SubstitutionSpec) -> Result<MacroDefinition, LibraryError> {
    let arguments = spec
        .arguments
        .iter()
        .map(|p| ArgumentDescriptor::new(*p))
        .collect::<Vec<_>>();
    let content = parse(name, spec.content)?;
    Ok(MacroDefinition::new(name, arguments, MacroContent::both(content)))
}

fn sized_group() -> Result<MacroDefinition, LibraryError> {
    let content = parse(SIZED_GROUP_SPECIALS, SIZED_GROUP_CONTENT)?;
    Ok(MacroDefinition::new(
        SIZED_GROUP_SPECIALS,
        [
            ArgumentDescriptor::named(SIZE_ARG_BRACKET, ArgumentParser::SizeToken),
            ArgumentDescriptor::named(MAIN_DELIMITED_ARGUMENT, ArgumentParser::AnyDelimited),
        ],
        MacroContent::math_only(content),
    ))
}

crate::tests! {
    builtins_are_complete {
        let registry = MacroRegistry::builtin().unwrap();
        for name in ["abs", "braket", "matrixel", "intervaloc", "Ident", "gate", "SN", "tr", "linspan"] {
            assert!(registry.get(name).is_some(), "missing \\{name}");
        }
        assert_eq!(
            registry.len(),
            DELIMITED.len() + SUBSTITUTIONS.len() + OPERATORS.len() + 1
        );
        assert!(registry.get_specials("`").is_some());
    };
    delimited_macros_declare_sizing_slots {
        let registry = MacroRegistry::builtin().unwrap();
        let braket = registry.get("braket").unwrap();
        assert_eq!(braket.arguments().len(), 5);
        assert_eq!(braket.argument_number_offset(), 3);
        assert_eq!(&*braket.delimiters().left, r"\langle");
        let uu = registry.get("uu").unwrap();
        assert_eq!(uu.argument_number_offset(), 0);
    };
    delimited_glyphs_come_from_base_delimiters {
        use qitnotation_core::{invocation::Mode, template::TemplatePart};
        let registry = MacroRegistry::builtin().unwrap();
        for (name, spec) in DELIMITED.entries() {
            let definition = registry.get(name).unwrap();
            assert_eq!(
                (&*definition.delimiters().left, &*definition.delimiters().right),
                (spec.left, spec.right),
                "\\{name}"
            );
            let template = definition.content().for_mode(Mode::Math).unwrap();
            for part in template.parts() {
                if let TemplatePart::Named { name: placeholder, literal, .. } = part
                    && matches!(&**placeholder, "DelimLeft" | "DelimRight")
                {
                    assert_eq!(literal.as_deref(), None, "\\{name}: {placeholder}");
                }
            }
        }
    };
    invalid_definitions_are_rejected {
        let mut registry = MacroRegistry::default();
        let bad = MacroDefinition::new(
            "bad",
            Vec::<ArgumentDescriptor>::new(),
            MacroContent::both(ContentTemplate::parse("#1").unwrap()),
        );
        assert!(matches!(
            registry.insert_macro(bad),
            Err(LibraryError::InvalidDefinition { .. })
        ));
        assert!(registry.is_empty());
    }
}
