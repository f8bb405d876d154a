//! Delimiter sizing: which of the three sizing forms an invocation used, and what
//! each delimiter slot renders to.

use std::borrow::Cow;

use crate::{arguments::ParsedArgument, errors::SizeSpecError, utils::fill_slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelimiterSlot {
    Left,
    Middle,
    Right,
}
impl DelimiterSlot {
    pub const ALL: [Self; 3] = [Self::Left, Self::Middle, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Middle => "Middle",
            Self::Right => "Right",
        }
    }

    /// Parses a placeholder name of the form `Delim{Left,Middle,Right}`.
    #[must_use]
    pub fn from_placeholder(name: &str) -> Option<Self> {
        match name.strip_prefix("Delim")? {
            "Left" => Some(Self::Left),
            "Middle" => Some(Self::Middle),
            "Right" => Some(Self::Right),
            _ => None,
        }
    }
}
impl std::fmt::Display for DelimiterSlot {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three mutually exclusive ways delimiters are sized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SizePolicy {
    /// Unscaled delimiters.
    #[default]
    None,
    /// `\left`/`\middle`/`\right`.
    Auto,
    /// An explicit sizing command such as `\big`, used as `\bigl`/`\big`/`\bigr`.
    Literal(Box<str>),
}
impl SizePolicy {
    /// The slot's pattern; `%s` marks where the delimiter glyph goes.
    #[must_use]
    pub fn pattern(&self, slot: DelimiterSlot) -> Cow<'static, str> {
        match (self, slot) {
            (Self::None, _) => Cow::Borrowed("%s"),
            (Self::Auto, DelimiterSlot::Left) => Cow::Borrowed(r"\mathopen{}\left %s"),
            (Self::Auto, DelimiterSlot::Middle) => {
                Cow::Borrowed(r"\mathclose{}\middle %s\mathopen{}")
            }
            (Self::Auto, DelimiterSlot::Right) => Cow::Borrowed(r"\right %s\mathclose{}"),
            (Self::Literal(s), DelimiterSlot::Left) => Cow::Owned(format!("{s}l %s")),
            (Self::Literal(s), DelimiterSlot::Middle) => {
                Cow::Owned(format!(r"\mathclose{{}}{s} %s\mathopen{{}}"))
            }
            (Self::Literal(s), DelimiterSlot::Right) => Cow::Owned(format!("{s}r %s")),
        }
    }

    /// Wraps `glyph` in the slot's pattern.
    #[must_use]
    pub fn wrap(&self, slot: DelimiterSlot, glyph: &str) -> String {
        let pattern = self.pattern(slot);
        let mut out = String::with_capacity(pattern.len() + glyph.len());
        fill_slot(&mut out, &pattern, glyph);
        out
    }
}

/// The glyphs a macro's delimiters use when a placeholder does not name its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseDelimiters {
    pub left: Cow<'static, str>,
    pub middle: Cow<'static, str>,
    pub right: Cow<'static, str>,
}
impl Default for BaseDelimiters {
    #[inline]
    fn default() -> Self {
        Self::new("", "")
    }
}
impl BaseDelimiters {
    /// The default middle delimiter.
    pub const MIDDLE: &'static str = "|";

    #[inline]
    #[must_use]
    pub const fn new(left: &'static str, right: &'static str) -> Self {
        Self {
            left: Cow::Borrowed(left),
            middle: Cow::Borrowed(Self::MIDDLE),
            right: Cow::Borrowed(right),
        }
    }

    /// Delimiters inherited from an enclosing group written as `open ... close`.
    #[must_use]
    pub fn inherited(open: &str, close: &str) -> Self {
        let map = |d: &str| -> Cow<'static, str> {
            match d {
                "{" => Cow::Borrowed(r"\{"),
                "}" => Cow::Borrowed(r"\}"),
                "<" => Cow::Borrowed(r"\langle"),
                ">" => Cow::Borrowed(r"\rangle"),
                d => Cow::Owned(d.to_string()),
            }
        };
        Self {
            left: map(open),
            middle: Cow::Borrowed(Self::MIDDLE),
            right: map(close),
        }
    }

    #[must_use]
    pub fn get(&self, slot: DelimiterSlot) -> &str {
        match slot {
            DelimiterSlot::Left => &self.left,
            DelimiterSlot::Middle => &self.middle,
            DelimiterSlot::Right => &self.right,
        }
    }
}

/// A [`SizePolicy`] together with the base glyphs of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DelimiterTriple {
    policy: SizePolicy,
    base: BaseDelimiters,
}
impl DelimiterTriple {
    #[inline]
    #[must_use]
    pub const fn new(policy: SizePolicy, base: BaseDelimiters) -> Self {
        Self { policy, base }
    }
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> &SizePolicy {
        &self.policy
    }
    #[inline]
    #[must_use]
    pub const fn base(&self) -> &BaseDelimiters {
        &self.base
    }
    #[inline]
    #[must_use]
    pub fn pattern(&self, slot: DelimiterSlot) -> Cow<'static, str> {
        self.policy.pattern(slot)
    }
    /// The slot with its base glyph.
    #[inline]
    #[must_use]
    pub fn render(&self, slot: DelimiterSlot) -> String {
        self.policy.wrap(slot, self.base.get(slot))
    }
    /// The slot with `glyph` instead of the base glyph.
    #[inline]
    #[must_use]
    pub fn wrap(&self, slot: DelimiterSlot, glyph: &str) -> String {
        self.policy.wrap(slot, glyph)
    }
    #[must_use]
    pub fn left(&self) -> String {
        self.render(DelimiterSlot::Left)
    }
    #[must_use]
    pub fn middle(&self) -> String {
        self.render(DelimiterSlot::Middle)
    }
    #[must_use]
    pub fn right(&self) -> String {
        self.render(DelimiterSlot::Right)
    }
}

/// Picks the sizing policy from the (at most one) sizing argument that was provided.
///
/// - `size_literal` (`` `\big ``): its content must be exactly one node.
/// - `size_bracket` (`[\big]`): a single `*` selects automatic sizing.
/// - `size_star` (`*`): automatic sizing.
///
/// Absent arguments may be passed as `None` or as not-provided [`ParsedArgument`]s.
///
/// ### Errors
/// [`SizeSpecError::Ambiguous`] if more than one sizing argument was provided, pointing at the
/// second one in source order; [`SizeSpecError::MalformedSizeArgument`] if the literal form
/// does not contain exactly one node.
pub fn resolve_delimiter_policy(
    size_literal: Option<&ParsedArgument>,
    size_bracket: Option<&ParsedArgument>,
    size_star: Option<&ParsedArgument>,
    base: BaseDelimiters,
) -> Result<DelimiterTriple, SizeSpecError> {
    let size_literal = size_literal.filter(|a| a.was_provided());
    let size_bracket = size_bracket.filter(|a| a.was_provided());
    let size_star = size_star.filter(|a| a.was_provided());

    let mut provided = [size_literal, size_bracket, size_star]
        .into_iter()
        .flatten()
        .map(ParsedArgument::range)
        .collect::<smallvec::SmallVec<_, 3>>();
    if provided.len() > 1 {
        provided.sort();
        return Err(SizeSpecError::Ambiguous { range: provided[1] });
    }

    let policy = if let Some(literal) = size_literal {
        let found = literal.content().len();
        if found != 1 {
            return Err(SizeSpecError::MalformedSizeArgument {
                range: literal.range(),
                found,
            });
        }
        SizePolicy::Literal(literal.verbatim().trim().into())
    } else if let Some(bracket) = size_bracket {
        if bracket.is_single_star() {
            SizePolicy::Auto
        } else {
            SizePolicy::Literal(bracket.verbatim().trim().into())
        }
    } else if size_star.is_some() {
        SizePolicy::Auto
    } else {
        SizePolicy::None
    };
    tracing::debug!("delimiter sizing policy: {policy:?}");
    Ok(DelimiterTriple::new(policy, base))
}

crate::tests! {
    literal_from_backtick {
        use crate::nodes::Node;
        let literal = ParsedArgument::provided(Node::control_sequence("big", 1..5));
        let triple = resolve_delimiter_policy(Some(&literal), None, None, BaseDelimiters::new(r"\lvert", r"\rvert"))
            .expect("unambiguous");
        assert_eq!(triple.pattern(DelimiterSlot::Left), r"\bigl %s");
        assert_eq!(triple.pattern(DelimiterSlot::Middle), r"\mathclose{}\big %s\mathopen{}");
        assert_eq!(triple.pattern(DelimiterSlot::Right), r"\bigr %s");
        assert_eq!(triple.left(), r"\bigl \lvert");
        assert_eq!(triple.middle(), r"\mathclose{}\big |\mathopen{}");
        assert_eq!(triple.right(), r"\bigr \rvert");
    };
    literal_from_bracket {
        use crate::nodes::Node;
        let bracket = ParsedArgument::provided(Node::group("[", "]", [Node::control_sequence("Bigg", 1..6)], 0..7));
        let triple = resolve_delimiter_policy(None, Some(&bracket), None, BaseDelimiters::default())
            .expect("unambiguous");
        assert_eq!(triple.policy(), &SizePolicy::Literal(r"\Bigg".into()));
        assert_eq!(triple.wrap(DelimiterSlot::Left, "("), r"\Biggl (");
    };
    #[case(false)]
    #[case(true)]
    auto_from_star_forms(#[case] bracketed: bool) {
        use crate::nodes::Node;
        let star = if bracketed {
            ParsedArgument::provided(Node::group("[", "]", [Node::chars("*", 1..2)], 0..3))
        } else {
            ParsedArgument::provided(Node::chars("*", 0..1))
        };
        let triple = if bracketed {
            resolve_delimiter_policy(None, Some(&star), None, BaseDelimiters::default())
        } else {
            resolve_delimiter_policy(None, None, Some(&star), BaseDelimiters::default())
        }.expect("unambiguous");
        assert_eq!(triple.policy(), &SizePolicy::Auto);
        assert_eq!(triple.pattern(DelimiterSlot::Left), r"\mathopen{}\left %s");
        assert_eq!(triple.pattern(DelimiterSlot::Middle), r"\mathclose{}\middle %s\mathopen{}");
        assert_eq!(triple.pattern(DelimiterSlot::Right), r"\right %s\mathclose{}");
    };
    none_is_identity {
        let absent = ParsedArgument::absent(0);
        let triple = resolve_delimiter_policy(Some(&absent), Some(&absent), None, BaseDelimiters::new("(", ")"))
            .expect("unambiguous");
        for slot in DelimiterSlot::ALL {
            assert_eq!(triple.pattern(slot), "%s");
        }
        assert_eq!([triple.left(), triple.middle(), triple.right()], ["(", "|", ")"].map(String::from));
    };
    #[case(true, true, false)]
    #[case(true, false, true)]
    #[case(false, true, true)]
    #[case(true, true, true)]
    ambiguous_combinations(#[case] literal: bool, #[case] bracket: bool, #[case] star: bool) {
        use crate::nodes::Node;
        let l = ParsedArgument::provided(Node::control_sequence("big", 1..5));
        let s = ParsedArgument::provided(Node::chars("*", 5..6));
        let b = ParsedArgument::provided(Node::group("[", "]", [Node::control_sequence("Big", 7..11)], 6..12));
        let err = resolve_delimiter_policy(
            literal.then_some(&l),
            bracket.then_some(&b),
            star.then_some(&s),
            BaseDelimiters::default(),
        ).expect_err("ambiguous");
        let second = [literal.then_some(l.range()), star.then_some(s.range()), bracket.then_some(b.range())]
            .into_iter()
            .flatten()
            .nth(1)
            .expect("two provided");
        assert_eq!(err, SizeSpecError::Ambiguous { range: second });
    };
    bracketed_star_conflicts_with_star {
        use crate::nodes::Node;
        let s = ParsedArgument::provided(Node::chars("*", 0..1));
        let b = ParsedArgument::provided(Node::group("[", "]", [Node::chars("*", 2..3)], 1..4));
        assert!(resolve_delimiter_policy(None, Some(&b), Some(&s), BaseDelimiters::default()).is_err());
    };
    backtick_needs_one_node {
        use crate::nodes::Node;
        let literal = ParsedArgument::provided(Node::group(
            "{", "}",
            [Node::control_sequence("big", 2..6), Node::control_sequence("big", 6..10)],
            1..11,
        ));
        let err = resolve_delimiter_policy(Some(&literal), None, None, BaseDelimiters::default())
            .expect_err("two nodes");
        assert_eq!(err, SizeSpecError::MalformedSizeArgument { range: literal.range(), found: 2 });
    };
    inherited_delimiters_are_mapped {
        let base = BaseDelimiters::inherited("<", ">");
        assert_eq!((base.get(DelimiterSlot::Left), base.get(DelimiterSlot::Middle), base.get(DelimiterSlot::Right)), (r"\langle", "|", r"\rangle"));
        let base = BaseDelimiters::inherited("{", "}");
        assert_eq!((&*base.left, &*base.right), (r"\{", r"\}"));
        let base = BaseDelimiters::inherited("(", ")");
        assert_eq!((&*base.left, &*base.right), ("(", ")"));
    };
    placeholder_names {
        assert_eq!(DelimiterSlot::from_placeholder("DelimMiddle"), Some(DelimiterSlot::Middle));
        assert_eq!(DelimiterSlot::from_placeholder("DelimMiddle:"), None);
        assert_eq!(DelimiterSlot::from_placeholder("Delim"), None);
    };
    #[case("DelimLeft", Some(DelimiterSlot::Left))]
    #[case("DelimRight", Some(DelimiterSlot::Right))]
    #[case("delimLeft", None)]
    #[case("DelimLeftx", None)]
    #[case("xDelimLeft", None)]
    #[case("Left", None)]
    placeholder_names_match_exactly(#[case] name: &str, #[case] slot: Option<DelimiterSlot>) {
        assert_eq!(DelimiterSlot::from_placeholder(name), slot);
        for slot in DelimiterSlot::ALL {
            assert_eq!(DelimiterSlot::from_placeholder(&format!("Delim{slot}")), Some(slot));
        }
    }
}
