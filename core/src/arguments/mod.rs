//! Argument descriptors (static, per macro) and parsed arguments (per invocation).

use std::{borrow::Cow, cell::OnceCell};

use smallvec::SmallVec;

use crate::{
    nodes::{Node, NodeKind},
    tokens::SourceRange,
};

mod matcher;
pub use matcher::parse_arguments;

/// Argument name of the backtick sizing slot (`` \abs`\big{x} ``).
pub const SIZE_ARG_BACKTICK: &str = "_sizeargBacktick";
/// Argument name of the star sizing slot (`\abs*{x}`).
pub const SIZE_ARG_STAR: &str = "_sizeargStar";
/// Argument name of the bracket sizing slot (`\abs[\big]{x}`).
pub const SIZE_ARG_BRACKET: &str = "_sizeargArg";
/// Argument name of a group whose delimiters are inherited by the `Delim*` placeholders.
pub const MAIN_DELIMITED_ARGUMENT: &str = "MainDelimitedArgument";

/// How an argument is matched against the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentParser {
    /// Mandatory `{...}` group, or a single token.
    Brace,
    /// Optional `[...]`.
    OptionalBracket,
    /// Optional `*`.
    Star,
    /// Mandatory group with fixed character delimiters, e.g. `(...)`.
    Delimited { open: char, close: char },
    /// Mandatory group delimited by any of `{}`, `()`, `[]`, `<>`.
    AnyDelimited,
    /// Optional backtick followed by exactly one token: `` `\big ``.
    SizeBacktick,
    /// Optional `*` selecting automatic sizing.
    SizeStar,
    /// Optional `[...]` holding a sizing command or `*`.
    SizeBracket,
    /// Optional single sizing token (`\big` or `*`), see [`recognize_size_token`](crate::size::recognize_size_token).
    SizeToken,
}

/// Which input of the [delimiter policy resolver](crate::delimiters::resolve_delimiter_policy)
/// a sizing argument feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeRole {
    Literal,
    Bracket,
    Star,
}

impl ArgumentParser {
    #[must_use]
    pub const fn size_role(self) -> Option<SizeRole> {
        match self {
            Self::SizeBacktick => Some(SizeRole::Literal),
            Self::SizeBracket | Self::SizeToken => Some(SizeRole::Bracket),
            Self::SizeStar => Some(SizeRole::Star),
            Self::Brace
            | Self::OptionalBracket
            | Self::Star
            | Self::Delimited { .. }
            | Self::AnyDelimited => None,
        }
    }
    #[inline]
    #[must_use]
    pub const fn is_size_specifier(self) -> bool {
        self.size_role().is_some()
    }
    #[must_use]
    pub const fn is_optional(self) -> bool {
        match self {
            Self::OptionalBracket
            | Self::Star
            | Self::SizeBacktick
            | Self::SizeStar
            | Self::SizeBracket
            | Self::SizeToken => true,
            Self::Brace | Self::Delimited { .. } | Self::AnyDelimited => false,
        }
    }
}

/// One formal argument of a macro.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentDescriptor {
    pub name: Option<Cow<'static, str>>,
    pub parser: ArgumentParser,
}
impl ArgumentDescriptor {
    pub const SIZE_BACKTICK: Self = Self::named(SIZE_ARG_BACKTICK, ArgumentParser::SizeBacktick);
    pub const SIZE_STAR: Self = Self::named(SIZE_ARG_STAR, ArgumentParser::SizeStar);
    pub const SIZE_BRACKET: Self = Self::named(SIZE_ARG_BRACKET, ArgumentParser::SizeBracket);
    /// The three sizing slots, in the order they are parsed.
    pub const SIZING_SLOTS: [Self; 3] = [Self::SIZE_BACKTICK, Self::SIZE_STAR, Self::SIZE_BRACKET];

    #[inline]
    #[must_use]
    pub const fn new(parser: ArgumentParser) -> Self {
        Self { name: None, parser }
    }
    #[inline]
    #[must_use]
    pub const fn named(name: &'static str, parser: ArgumentParser) -> Self {
        Self {
            name: Some(Cow::Borrowed(name)),
            parser,
        }
    }
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    #[inline]
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.parser.is_optional()
    }
}

/// The number added to every numbered placeholder of a macro: the count of
/// sizing slots it *declares*, whether or not an invocation fills them.
#[must_use]
pub fn argument_number_offset(descriptors: &[ArgumentDescriptor]) -> usize {
    descriptors
        .iter()
        .filter(|d| d.parser.is_size_specifier())
        .count()
}

/// The result of matching one [`ArgumentDescriptor`] in one invocation.
///
/// The verbatim rendering is computed on first access and cached for the
/// lifetime of this value only.
#[derive(Debug, Clone)]
pub struct ParsedArgument {
    node: Option<Node>,
    range: SourceRange,
    verbatim: OnceCell<String>,
}
impl ParsedArgument {
    /// An optional argument that was not given; `at` is where it would have been.
    #[inline]
    #[must_use]
    pub const fn absent(at: usize) -> Self {
        Self {
            node: None,
            range: SourceRange::at(at),
            verbatim: OnceCell::new(),
        }
    }
    #[inline]
    #[must_use]
    pub fn provided(node: Node) -> Self {
        let range = node.range;
        Self {
            node: Some(node),
            range,
            verbatim: OnceCell::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn was_provided(&self) -> bool {
        self.node.is_some()
    }
    #[inline]
    #[must_use]
    pub const fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }
    #[inline]
    #[must_use]
    pub const fn range(&self) -> SourceRange {
        self.range
    }

    /// The argument's content: a group's children, or the single node that was matched.
    #[must_use]
    pub fn content(&self) -> &[Node] {
        match &self.node {
            None => &[],
            Some(n) => n
                .children()
                .map_or_else(|| std::slice::from_ref(n), |c| c.as_slice()),
        }
    }

    /// Verbatim source of [`content`](Self::content).
    #[must_use]
    pub fn verbatim(&self) -> &str {
        self.verbatim.get_or_init(|| {
            let mut s = String::new();
            for n in self.content() {
                n.write_verbatim(&mut s);
            }
            s
        })
    }

    /// Provided, with non-empty verbatim content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.was_provided() && !self.verbatim().is_empty()
    }

    /// Exactly one content unit, whose literal text trimmed is `*`.
    #[must_use]
    pub fn is_single_star(&self) -> bool {
        matches!(self.content(), [n] if n.text().is_some_and(|t| t.trim() == "*"))
    }

    /// The delimiters, if the argument is a group.
    #[must_use]
    pub fn group_delimiters(&self) -> Option<(&str, &str)> {
        match self.node.as_ref().map(|n| &n.kind) {
            Some(NodeKind::Group { open, close, .. }) => Some((&**open, &**close)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentEntry {
    pub descriptor: ArgumentDescriptor,
    pub argument: ParsedArgument,
}

/// All arguments of one invocation, addressable by name and by 1-based position.
#[derive(Debug, Clone, Default)]
pub struct ParsedArguments {
    entries: SmallVec<ArgumentEntry, 6>,
}
impl ParsedArguments {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: ArgumentDescriptor, argument: ParsedArgument) {
        self.entries.push(ArgumentEntry {
            descriptor,
            argument,
        });
    }

    #[must_use]
    pub fn with(mut self, descriptor: ArgumentDescriptor, argument: ParsedArgument) -> Self {
        self.push(descriptor, argument);
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ArgumentEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ParsedArgument> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name() == Some(name))
            .map(|e| &e.argument)
    }

    /// Positional lookup; positions start at 1.
    #[must_use]
    pub fn by_position(&self, position: usize) -> Option<&ParsedArgument> {
        position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| &e.argument)
    }

    /// The first *provided* argument feeding `role`.
    #[must_use]
    pub fn size_argument(&self, role: SizeRole) -> Option<&ParsedArgument> {
        self.entries
            .iter()
            .find(|e| e.descriptor.parser.size_role() == Some(role) && e.argument.was_provided())
            .map(|e| &e.argument)
    }
}

crate::tests! {
    offset_counts_declared_slots {
        let mut descriptors = ArgumentDescriptor::SIZING_SLOTS.to_vec();
        descriptors.push(ArgumentDescriptor::new(ArgumentParser::Brace));
        descriptors.push(ArgumentDescriptor::new(ArgumentParser::Brace));
        assert_eq!(argument_number_offset(&descriptors), 3);
        assert_eq!(argument_number_offset(&descriptors[3..]), 0);
    };
    star_predicate_is_structural {
        let star = ParsedArgument::provided(Node::group("[", "]", [Node::chars(" * ", 1..4)], 0..5));
        assert!(star.is_single_star());
        let two = ParsedArgument::provided(Node::group(
            "[", "]",
            [Node::chars("*", 1..2), Node::control_sequence("big", 2..6)],
            0..7,
        ));
        assert!(!two.is_single_star());
        let plain = ParsedArgument::provided(Node::chars("*", 0..1));
        assert!(plain.is_single_star());
        assert!(!ParsedArgument::absent(3).is_single_star());
    };
    verbatim_is_memoized_content {
        let arg = ParsedArgument::provided(Node::group("{", "}", [Node::control_sequence("psi", 1..5)], 0..6));
        assert_eq!(arg.verbatim(), r"\psi");
        assert!(std::ptr::eq(arg.verbatim(), arg.verbatim()));
        assert!(arg.has_content());
        assert_eq!(arg.group_delimiters(), Some(("{", "}")));
        let empty = ParsedArgument::provided(Node::group("{", "}", crate::nodes::NodeList::new(), 0..2));
        assert!(empty.was_provided());
        assert!(!empty.has_content());
    };
    lookup_by_name_and_position {
        let args = ParsedArguments::new()
            .with(ArgumentDescriptor::SIZE_BACKTICK, ParsedArgument::absent(0))
            .with(ArgumentDescriptor::SIZE_STAR, ParsedArgument::provided(Node::chars("*", 0..1)))
            .with(ArgumentDescriptor::new(ArgumentParser::Brace), ParsedArgument::provided(Node::chars("x", 1..2)));
        assert!(args.by_name(SIZE_ARG_STAR).is_some_and(ParsedArgument::was_provided));
        assert!(args.by_position(0).is_none());
        assert_eq!(args.by_position(3).map(ParsedArgument::verbatim), Some("x"));
        assert!(args.size_argument(SizeRole::Literal).is_none());
        assert!(args.size_argument(SizeRole::Star).is_some());
    }
}
