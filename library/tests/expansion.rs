#![allow(clippy::unwrap_used)]

use qitnotation::{NotationFeature, UserArgument, UserMacro, errors::LibraryError};
use qitnotation_core::{
    arguments::{ArgumentDescriptor, ArgumentParser},
    config::ConfigOverrides,
    errors::{ExpansionError, SizeSpecError, SubstitutionError},
    invocation::Mode,
    testing::lex,
    tokens::{SourceRange, Token, TokenList, TokenStream},
};
use rstest::{fixture, rstest};

#[fixture]
fn feature() -> NotationFeature {
    let _ = tracing_subscriber::fmt().try_init();
    NotationFeature::new().unwrap()
}

fn math(feature: &NotationFeature, name: &str, source: &str) -> Result<String, LibraryError> {
    feature.invoke_macro(name, &mut lex(source), Mode::Math)
}

#[rstest]
fn braket_without_sizing(feature: NotationFeature) {
    assert_eq!(
        math(&feature, "braket", r"{\psi}{\phi}").unwrap(),
        r"\langle{\psi}\mkern 1.5mu \vert\mkern 1.5mu {\phi}\rangle"
    );
}

#[rstest]
#[case(r"`\big{\psi}{\phi}", r"\bigl \langle{\psi}\mkern 1.5mu \mathclose{}\big \vert\mathopen{}\mkern 1.5mu {\phi}\bigr \rangle")]
#[case(r"[\Bigg]{\psi}{\phi}", r"\Biggl \langle{\psi}\mkern 1.5mu \mathclose{}\Bigg \vert\mathopen{}\mkern 1.5mu {\phi}\Biggr \rangle")]
#[case(r"*{\psi}{\phi}", r"\mathopen{}\left \langle{\psi}\mkern 1.5mu \mathclose{}\middle \vert\mathopen{}\mkern 1.5mu {\phi}\right \rangle\mathclose{}")]
#[case(r"[*]{\psi}{\phi}", r"\mathopen{}\left \langle{\psi}\mkern 1.5mu \mathclose{}\middle \vert\mathopen{}\mkern 1.5mu {\phi}\right \rangle\mathclose{}")]
fn braket_sizing_forms(feature: NotationFeature, #[case] source: &str, #[case] expected: &str) {
    assert_eq!(math(&feature, "braket", source).unwrap(), expected);
}

#[rstest]
fn conflicting_sizing_forms(feature: NotationFeature) {
    let err = math(&feature, "braket", r"*[\big]{a}{b}").unwrap_err();
    assert_eq!(
        err,
        LibraryError::Expansion(ExpansionError::Size(SizeSpecError::Ambiguous {
            range: SourceRange::new(1, 7)
        }))
    );
}

#[rstest]
fn backtick_takes_exactly_one_node(feature: NotationFeature) {
    let err = math(&feature, "abs", r"`{\big\big}{x}").unwrap_err();
    assert!(matches!(
        err,
        LibraryError::Expansion(ExpansionError::Size(SizeSpecError::MalformedSizeArgument {
            found: 2,
            ..
        }))
    ));
}

#[rstest]
#[case("abs", "{x}", r"\lvert{x}\rvert")]
#[case("ket", r"{\psi}", r"\lvert{\psi}\rangle")]
#[case("proj", r"{\psi}", r"\lvert{\psi}\rangle \mkern -1.8mu \langle{\psi}\rvert")]
#[case("oproj", r"{\psi}", r"\lvert{\psi}\rrangle \mkern -1.8mu \llangle{\psi}\rvert")]
#[case("innerprod", "{a}{b}", r"\langle{a},\mkern 1.5mu {b}\rangle")]
#[case("intervalco", "{0}{1}", r"[{0\mathclose{},\mathopen{}1}[")]
#[case("Ident", "", "𝟙")]
#[case("gate", "{H}", r"\textsc{H}")]
#[case("CNOT", "", r"\textsc{c-not}")]
#[case("SU", "(2)", r"\mathrm{SU}({2})")]
#[case("SN", "(n)", r"\mathrm{S}_{n}")]
#[case("linspan", "", r"\operatorname{span}")]
fn builtin_macros(
    feature: NotationFeature,
    #[case] name: &str,
    #[case] source: &str,
    #[case] expected: &str,
) {
    assert_eq!(math(&feature, name, source).unwrap(), expected);
}

#[rstest]
fn numbered_arguments_skip_sizing_slots(feature: NotationFeature) {
    let mut tokens = lex(r"*{a}{b}{c} rest");
    assert_eq!(
        feature.invoke_macro("matrixel", &mut tokens, Mode::Math).unwrap(),
        concat!(
            r"\mathopen{}\left \langle{a}\mkern 1.5mu \mathclose{}\middle \vert\mathopen{} \mkern 1.5mu {b}",
            r"\mkern 1.5mu \mathclose{}\middle \vert\mathopen{} \mkern 1.5mu {c}\right \rangle\mathclose{}",
        )
    );
    tokens.skip_space();
    assert_eq!(tokens.remaining().len(), 4);
}

#[rstest]
#[case(r"\big(x)", r"\bigl (x\bigr )")]
#[case(r"*<\psi>", r"\mathopen{}\left \langle\psi\right \rangle\mathclose{}")]
#[case(r"{a}", r"\{a\}")]
#[case(r"[0,1]", r"[0,1]")]
#[case(r"\big\{x\}", r"\bigl \{x\bigr \}")]
#[case(r"*\{a\{b\}\}", r"\mathopen{}\left \{a\{b\}\right \}\mathclose{}")]
fn sized_group_specials(feature: NotationFeature, #[case] source: &str, #[case] expected: &str) {
    assert_eq!(
        feature.invoke_specials("`", &mut lex(source), Mode::Math).unwrap(),
        expected
    );
}

#[rstest]
fn star_tagged_as_specials(feature: NotationFeature) {
    let mut tokens = TokenList::new(vec![
        Token::specials("*", 0..1),
        Token::begin_group(1..2),
        Token::chars("x", 2..3),
        Token::end_group(3..4),
    ]);
    assert_eq!(
        feature.invoke_macro("abs", &mut tokens, Mode::Math).unwrap(),
        r"\mathopen{}\left \lvert{x}\right \rvert\mathclose{}"
    );
    assert!(tokens.is_at_end());
}

#[rstest]
fn sized_group_has_no_text_mode(feature: NotationFeature) {
    let err = feature
        .invoke_specials("`", &mut lex("(x)"), Mode::Text)
        .unwrap_err();
    assert!(matches!(
        err,
        LibraryError::Expansion(ExpansionError::NotAvailableInMode { mode: Mode::Text, .. })
    ));
}

#[rstest]
fn unknown_names(feature: NotationFeature) {
    assert_eq!(
        math(&feature, "nope", ""),
        Err(LibraryError::UnknownMacro("nope".into()))
    );
    assert_eq!(
        feature.invoke_specials("~", &mut lex(""), Mode::Math),
        Err(LibraryError::UnknownSpecials("~".into()))
    );
}

#[rstest]
fn configured_spacing() {
    let feature = NotationFeature::builder()
        .config(ConfigOverrides::new().with("spaceKets", "Bar", r"\,"))
        .config_value("nonexistent", "Bar", "ignored")
        .build()
        .unwrap();
    assert_eq!(
        math(&feature, "braket", "{a}{b}").unwrap(),
        r"\langle{a}\,\vert\,{b}\rangle"
    );
    assert!(!feature.config().has_category("nonexistent"));
}

#[rstest]
fn user_definitions() {
    let feature = NotationFeature::builder()
        .define("Hilbert", r"\mathcal{H}")
        .define(
            "comm",
            UserMacro::Delimited {
                arguments: vec![
                    ArgumentDescriptor::new(ArgumentParser::Brace),
                    ArgumentDescriptor::new(ArgumentParser::Brace),
                ],
                content: r"#[{[}]{DelimLeft}#1,#2#[{]}]{DelimRight}".into(),
            },
        )
        .define(
            "avgsz",
            UserMacro::WithArguments {
                arguments: vec![
                    UserArgument::SizeArgStar,
                    UserArgument::Argument(ArgumentDescriptor::new(ArgumentParser::Brace)),
                ],
                content: r"#[\langle]{DelimLeft}#1#[\rangle]{DelimRight}".into(),
            },
        )
        .define(
            "pair",
            UserMacro::with_argument_specs(&["SizeArgOptArg", "r()"], "#{DelimLeft}#1#{DelimRight}").unwrap(),
        )
        .build()
        .unwrap();
    assert_eq!(math(&feature, "Hilbert", "").unwrap(), r"\mathcal{H}");
    assert_eq!(math(&feature, "comm", "*{A}{B}").unwrap(), r"\mathopen{}\left [A,B\right ]\mathclose{}");
    assert_eq!(math(&feature, "avgsz", "*{X}").unwrap(), r"\mathopen{}\left \langleX\right \rangle\mathclose{}");
    assert_eq!(math(&feature, "pair", r"[\big](x)").unwrap(), r"\bigl x\bigr ");
    assert_eq!(
        feature
            .invoke_macro("Hilbert", &mut lex(""), Mode::Text)
            .unwrap(),
        r"\mathcal{H}"
    );
}

#[rstest]
fn user_definitions_replace_builtins() {
    let feature = NotationFeature::builder()
        .define("Hs", r"\mathcal{H}")
        .build()
        .unwrap();
    assert_eq!(math(&feature, "Hs", "").unwrap(), r"\mathcal{H}");
}

#[rstest]
fn user_specials_with_fallback() {
    let feature = NotationFeature::builder()
        .define_specials(
            "'",
            UserMacro::WithArguments {
                arguments: vec![UserArgument::Argument(ArgumentDescriptor::new(ArgumentParser::Brace))],
                content: "#{Prime}{#1}".into(),
            },
        )
        .build()
        .unwrap();
    let prime = |name: &str, _: Option<&str>| (name == "Prime").then(|| r"\prime".to_string());
    assert_eq!(
        feature
            .invoke_specials_with("'", &mut lex("{x}"), Mode::Math, Some(&prime))
            .unwrap(),
        r"\prime{x}"
    );
    assert_eq!(
        feature.invoke_specials("'", &mut lex("{x}"), Mode::Math),
        Err(LibraryError::Expansion(ExpansionError::Substitution(
            SubstitutionError::UnresolvedPlaceholder("#{Prime}".into())
        )))
    );
    assert!(feature.invoke_specials("`", &mut lex("(y)"), Mode::Math).is_ok());
}
