//! The built-in macro tables.

use qitnotation_core::arguments::ArgumentParser;

/// A macro of the form `left body right`, with sizable delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedSpec {
    /// Number of mandatory `{...}` arguments after the sizing slots.
    pub arguments: usize,
    pub left: &'static str,
    /// Content between the delimiters; may use `#[..]{DelimMiddle}` and config placeholders.
    pub body: &'static str,
    pub right: &'static str,
}
impl DelimitedSpec {
    pub const DEFAULT_BODY: &'static str = "{#1}";

    const fn simple(left: &'static str, right: &'static str) -> Self {
        Self {
            arguments: 1,
            left,
            body: Self::DEFAULT_BODY,
            right,
        }
    }
    const fn with_body(left: &'static str, body: &'static str, right: &'static str) -> Self {
        Self {
            arguments: 1,
            left,
            body,
            right,
        }
    }
    const fn with_arguments(
        arguments: usize,
        left: &'static str,
        body: &'static str,
        right: &'static str,
    ) -> Self {
        Self {
            arguments,
            left,
            body,
            right,
        }
    }

    /// The full content template: `#{DelimLeft}body#{DelimRight}`. The outer glyphs are
    /// not part of it; they are the definition's [`BaseDelimiters`](qitnotation_core::delimiters::BaseDelimiters).
    #[must_use]
    pub fn template(&self) -> String {
        format!("#{{DelimLeft}}{}#{{DelimRight}}", self.body)
    }
}

/// A macro whose content is a template over plain (non-sizing) arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionSpec {
    pub arguments: &'static [ArgumentParser],
    pub content: &'static str,
}
impl SubstitutionSpec {
    const NONE: &'static [ArgumentParser] = &[];
    const BRACE: &'static [ArgumentParser] = &[ArgumentParser::Brace];
    const PARENS: &'static [ArgumentParser] = &[ArgumentParser::Delimited {
        open: '(',
        close: ')',
    }];

    const fn constant(content: &'static str) -> Self {
        Self {
            arguments: Self::NONE,
            content,
        }
    }
    const fn brace(content: &'static str) -> Self {
        Self {
            arguments: Self::BRACE,
            content,
        }
    }
    const fn parens(content: &'static str) -> Self {
        Self {
            arguments: Self::PARENS,
            content,
        }
    }
}

pub static DELIMITED: phf::Map<&'static str, DelimitedSpec> = phf::phf_map! {
    "abs" => DelimitedSpec::simple(r"\lvert", r"\rvert"),
    "norm" => DelimitedSpec::simple(r"\lVert", r"\rVert"),
    "avg" => DelimitedSpec::simple(r"\langle", r"\rangle"),

    "ket" => DelimitedSpec::with_body(r"\lvert", "{#1}", r"\rangle"),
    "bra" => DelimitedSpec::with_body(r"\langle", "{#1}", r"\rvert"),
    "braket" => DelimitedSpec::with_arguments(
        2,
        r"\langle",
        r"{#1}#[spaceKets.Bar]{config}#[\vert]{DelimMiddle}#[spaceKets.Bar]{config}{#2}",
        r"\rangle",
    ),
    "ketbra" => DelimitedSpec::with_arguments(
        2,
        r"\lvert",
        r"{#1}#[\rangle]{DelimMiddle} #[spaceKets.RLAngle]{config}#[\langle]{DelimMiddle}{#2}",
        r"\rvert",
    ),
    "proj" => DelimitedSpec::with_body(
        r"\lvert",
        r"{#1}#[\rangle]{DelimMiddle} #[spaceKets.RLAngle]{config}#[\langle]{DelimMiddle}{#1}",
        r"\rvert",
    ),
    "matrixel" => DelimitedSpec::with_arguments(
        3,
        r"\langle",
        concat!(
            r"{#1}#[spaceKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceKets.Bar]{config}{#2}",
            r"#[spaceKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceKets.Bar]{config}{#3}",
        ),
        r"\rangle",
    ),
    "dmatrixel" => DelimitedSpec::with_arguments(
        2,
        r"\langle",
        concat!(
            r"{#1}#[spaceKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceKets.Bar]{config}{#2}",
            r"#[spaceKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceKets.Bar]{config}{#1}",
        ),
        r"\rangle",
    ),
    "innerprod" => DelimitedSpec::with_arguments(
        2,
        r"\langle",
        r"{#1}#[space.BeforeComma]{config},#[space.AfterComma]{config}{#2}",
        r"\rangle",
    ),

    "oket" => DelimitedSpec::with_body(r"\lvert", "{#1}", r"\rrangle"),
    "obra" => DelimitedSpec::with_body(r"\llangle", "{#1}", r"\rvert"),
    "obraket" => DelimitedSpec::with_arguments(
        2,
        r"\llangle",
        r"{#1}#[spaceOKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceOKets.Bar]{config}{#2}",
        r"\rrangle",
    ),
    "oketbra" => DelimitedSpec::with_arguments(
        2,
        r"\lvert",
        r"{#1}#[\rrangle]{DelimMiddle} #[spaceOKets.RLAngle]{config}#[\llangle]{DelimMiddle}{#2}",
        r"\rvert",
    ),
    "oproj" => DelimitedSpec::with_body(
        r"\lvert",
        r"{#1}#[\rrangle]{DelimMiddle} #[spaceOKets.RLAngle]{config}#[\llangle]{DelimMiddle}{#1}",
        r"\rvert",
    ),
    "omatrixel" => DelimitedSpec::with_arguments(
        3,
        r"\llangle",
        concat!(
            r"{#1}#[spaceOKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceOKets.Bar]{config}{#2}",
            r"#[spaceOKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceOKets.Bar]{config}{#3}",
        ),
        r"\rrangle",
    ),
    "odmatrixel" => DelimitedSpec::with_arguments(
        2,
        r"\llangle",
        concat!(
            r"{#1}#[spaceOKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceOKets.Bar]{config}{#2}",
            r"#[spaceOKets.Bar]{config}#[\vert]{DelimMiddle} #[spaceOKets.Bar]{config}{#1}",
        ),
        r"\rrangle",
    ),

    "intervalc" => DelimitedSpec::with_arguments(2, "[", r"{#1\mathclose{},\mathopen{}#2}", "]"),
    "intervalo" => DelimitedSpec::with_arguments(2, "]", r"{#1\mathclose{},\mathopen{}#2}", "["),
    "intervalco" => DelimitedSpec::with_arguments(2, "[", r"{#1\mathclose{},\mathopen{}#2}", "["),
    "intervaloc" => DelimitedSpec::with_arguments(2, "]", r"{#1\mathclose{},\mathopen{}#2}", "]"),
};

pub static SUBSTITUTIONS: phf::Map<&'static str, SubstitutionSpec> = phf::phf_map! {
    "Hs" => SubstitutionSpec::constant(r"\mathscr{H}"),
    "Ident" => SubstitutionSpec::constant("𝟙"),

    // bits and gates; gate names are set in lowercase small caps
    "bit" => SubstitutionSpec::brace(r"\texttt{#1}"),
    "bitstring" => SubstitutionSpec::brace(r"\ensuremath{\underline{\overline{\texttt{#1}}}}"),
    "gate" => SubstitutionSpec::brace(r"\textsc{#1}"),
    "AND" => SubstitutionSpec::constant(r"\textsc{and}"),
    "XOR" => SubstitutionSpec::constant(r"\textsc{xor}"),
    "CNOT" => SubstitutionSpec::constant(r"\textsc{c-not}"),
    "NOT" => SubstitutionSpec::constant(r"\textsc{not}"),
    "NOOP" => SubstitutionSpec::constant(r"\textsc{no-op}"),

    // groups and algebras
    "uu" => SubstitutionSpec::parens(r"\mathrm{u}({#1})"),
    "UU" => SubstitutionSpec::parens(r"\mathrm{U}({#1})"),
    "su" => SubstitutionSpec::parens(r"\mathrm{su}({#1})"),
    "SU" => SubstitutionSpec::parens(r"\mathrm{SU}({#1})"),
    "so" => SubstitutionSpec::parens(r"\mathrm{so}({#1})"),
    "SO" => SubstitutionSpec::parens(r"\mathrm{SO}({#1})"),
    "slalg" => SubstitutionSpec::parens(r"\mathrm{sl}({#1})"),
    "SL" => SubstitutionSpec::parens(r"\mathrm{SL}({#1})"),
    "GL" => SubstitutionSpec::parens(r"\mathrm{GL}({#1})"),
    "SN" => SubstitutionSpec::parens(r"\mathrm{S}_{#1}"),
};

/// Macro name → operator name, rendered as `\operatorname{..}`.
pub static OPERATORS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "tr" => "tr",
    "supp" => "supp",
    "rank" => "rank",
    "linspan" => "span",
    "spec" => "spec",
    "diag" => "diag",
    "Re" => "Re",
    "Im" => "Im",
    "poly" => "poly",
};

/// The specials chars that size an arbitrary delimited group: `` `\big(x) ``, `` `*<x> ``.
pub const SIZED_GROUP_SPECIALS: &str = "`";
/// Math-mode content of [`SIZED_GROUP_SPECIALS`]; it has no text-mode content.
pub const SIZED_GROUP_CONTENT: &str = "#{DelimLeft}#{MainDelimitedArgument}#{DelimRight}";

/// Configuration defaults; overrides merge into these categories only.
pub const CONFIG_DEFAULTS: &[(&str, &[(&str, &str)])] = &[
    (
        "spaceKets",
        &[("Bar", r"\mkern 1.5mu "), ("RLAngle", r"\mkern -1.8mu ")],
    ),
    (
        "spaceOKets",
        &[("Bar", r"\mkern 1.5mu "), ("RLAngle", r"\mkern -1.8mu ")],
    ),
    ("space", &[("BeforeComma", ""), ("AfterComma", r"\mkern 1.5mu ")]),
];

crate::tests! {
    delimited_template_wraps_body {
        let spec = DELIMITED.get("abs").expect("exists");
        assert_eq!(spec.template(), r"#{DelimLeft}{#1}#{DelimRight}");
        assert_eq!(DELIMITED.get("matrixel").map(|s| s.arguments), Some(3));
    };
    operators_are_listed {
        assert_eq!(OPERATORS.get("linspan"), Some(&"span"));
        assert_eq!(OPERATORS.len(), 9);
    }
}
