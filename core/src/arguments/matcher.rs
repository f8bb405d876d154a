//! A reference matcher for [`ArgumentDescriptor`]s over a [`TokenStream`].
//!
//! Hosts with their own argument parsing can build [`ParsedArguments`] directly instead.

use crate::{
    arguments::{ArgumentDescriptor, ArgumentParser, ParsedArgument, ParsedArguments},
    errors::ArgumentParseError,
    nodes::{Node, NodeKind, NodeList},
    size::recognize_size_token,
    tokens::{SourceRange, Token, TokenKind, TokenStream},
};

type Result<T> = std::result::Result<T, ArgumentParseError>;

/// Matches `descriptors` in order. Optional arguments that are not present are recorded as
/// absent and consume nothing.
///
/// ### Errors
/// if a mandatory argument is missing or a group is not closed.
pub fn parse_arguments<S: TokenStream + ?Sized>(
    descriptors: &[ArgumentDescriptor],
    stream: &mut S,
) -> Result<ParsedArguments> {
    let mut args = ParsedArguments::new();
    for d in descriptors {
        let argument = parse_argument(d.parser, stream)?;
        args.push(d.clone(), argument);
    }
    Ok(args)
}

fn parse_argument<S: TokenStream + ?Sized>(
    parser: ArgumentParser,
    stream: &mut S,
) -> Result<ParsedArgument> {
    let start = stream.position();
    stream.skip_space();
    let at = stream.source_offset();
    let node = match parser {
        ArgumentParser::Brace => Some(read_brace_or_token(stream)?),
        ArgumentParser::OptionalBracket | ArgumentParser::SizeBracket => {
            read_optional_group(stream, '[', ']')?
        }
        ArgumentParser::Star | ArgumentParser::SizeStar => read_optional_char(stream, '*'),
        ArgumentParser::SizeBacktick => read_backtick(stream)?,
        ArgumentParser::SizeToken => recognize_size_token(stream).map(Node::from),
        ArgumentParser::Delimited { open, close } => {
            let Some(node) = read_optional_group(stream, open, close)? else {
                return Err(expected(stream, "a delimited group"));
            };
            Some(node)
        }
        ArgumentParser::AnyDelimited => Some(read_any_delimited(stream)?),
    };
    if let Some(node) = node {
        Ok(ParsedArgument::provided(node))
    } else {
        stream.move_to(start);
        Ok(ParsedArgument::absent(at))
    }
}

#[derive(Debug, Clone, Copy)]
enum Closing {
    EndGroup,
    /// `\}`, opened by `\{`.
    EscapedBrace,
    Char { open: char, close: char },
}
impl Closing {
    const fn describe(self) -> &'static str {
        match self {
            Self::EndGroup => "`}`",
            Self::EscapedBrace => r"`\}`",
            Self::Char { close: ']', .. } => "`]`",
            Self::Char { close: ')', .. } => "`)`",
            Self::Char { close: '>', .. } => "`>`",
            Self::Char { .. } => "a closing delimiter",
        }
    }
}

fn is_delimiter(token: &Token, c: char) -> bool {
    token.is_char(c.encode_utf8(&mut [0u8; 4]))
}

fn is_control_symbol(token: &Token, c: &str) -> bool {
    matches!(&token.kind, TokenKind::Macro(name) if &**name == c)
}

fn expected<S: TokenStream + ?Sized>(stream: &mut S, what: &'static str) -> ArgumentParseError {
    match stream.peek_token() {
        Some(t) => ArgumentParseError::Expected {
            expected: what,
            range: t.range,
        },
        None => ArgumentParseError::UnexpectedEnd { expected: what },
    }
}

fn read_optional_char<S: TokenStream + ?Sized>(stream: &mut S, c: char) -> Option<Node> {
    let start = stream.position();
    match stream.next_token() {
        Some(t) if is_delimiter(&t, c) => Some(Node::chars(&c.to_string(), t.range)),
        _ => {
            stream.move_to(start);
            None
        }
    }
}

fn read_optional_group<S: TokenStream + ?Sized>(
    stream: &mut S,
    open: char,
    close: char,
) -> Result<Option<Node>> {
    let start = stream.position();
    match stream.next_token() {
        Some(t) if is_delimiter(&t, open) => {
            let (children, end) = read_group_contents(stream, Closing::Char { open, close })?;
            Ok(Some(Node::group(
                &open.to_string(),
                &close.to_string(),
                children,
                t.range.join(end),
            )))
        }
        _ => {
            stream.move_to(start);
            Ok(None)
        }
    }
}

fn read_brace_group<S: TokenStream + ?Sized>(stream: &mut S, open: SourceRange) -> Result<Node> {
    let (children, end) = read_group_contents(stream, Closing::EndGroup)?;
    Ok(Node::group("{", "}", children, open.join(end)))
}

fn read_brace_or_token<S: TokenStream + ?Sized>(stream: &mut S) -> Result<Node> {
    let Some(token) = stream.next_token() else {
        return Err(ArgumentParseError::UnexpectedEnd {
            expected: "an argument",
        });
    };
    match token.kind {
        TokenKind::BeginGroup => read_brace_group(stream, token.range),
        TokenKind::Macro(name) => Ok(Node::control_sequence(&name, token.range)),
        TokenKind::Chars(c) => Ok(Node::chars(&c, token.range)),
        TokenKind::Specials(s) => Ok(Node {
            kind: NodeKind::Specials(s),
            range: token.range,
        }),
        TokenKind::EndGroup | TokenKind::Space(_) => Err(ArgumentParseError::Expected {
            expected: "an argument",
            range: token.range,
        }),
    }
}

fn read_backtick<S: TokenStream + ?Sized>(stream: &mut S) -> Result<Option<Node>> {
    let start = stream.position();
    match stream.next_token() {
        Some(t) if t.is_char("`") => (),
        _ => {
            stream.move_to(start);
            return Ok(None);
        }
    }
    let Some(token) = stream.next_token() else {
        return Err(ArgumentParseError::UnexpectedEnd {
            expected: "a size token after `` ` ``",
        });
    };
    match token.kind {
        TokenKind::BeginGroup => read_brace_group(stream, token.range).map(Some),
        TokenKind::Macro(name) => Ok(Some(Node::control_sequence(&name, token.range))),
        TokenKind::Chars(c) => Ok(Some(Node::chars(&c, token.range))),
        TokenKind::Specials(_) | TokenKind::EndGroup | TokenKind::Space(_) => {
            Err(ArgumentParseError::Expected {
                expected: "a size token after `` ` ``",
                range: token.range,
            })
        }
    }
}

fn read_any_delimited<S: TokenStream + ?Sized>(stream: &mut S) -> Result<Node> {
    const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('<', '>')];
    let Some(token) = stream.peek_token() else {
        return Err(ArgumentParseError::UnexpectedEnd {
            expected: "a delimited group",
        });
    };
    if token.kind == TokenKind::BeginGroup {
        stream.next_token();
        return read_brace_group(stream, token.range);
    }
    if is_control_symbol(&token, "{") {
        stream.next_token();
        let (children, end) = read_group_contents(stream, Closing::EscapedBrace)?;
        return Ok(Node::group(r"\{", r"\}", children, token.range.join(end)));
    }
    for (open, close) in PAIRS {
        if is_delimiter(&token, open)
            && let Some(node) = read_optional_group(stream, open, close)?
        {
            return Ok(node);
        }
    }
    Err(ArgumentParseError::Expected {
        expected: "a delimited group",
        range: token.range,
    })
}

/// Reads up to and including the closing delimiter; returns the children and the
/// closing delimiter's range.
fn read_group_contents<S: TokenStream + ?Sized>(
    stream: &mut S,
    closing: Closing,
) -> Result<(NodeList, SourceRange)> {
    let mut children = NodeList::new();
    let mut depth = 0usize;
    loop {
        let Some(token) = stream.next_token() else {
            return Err(ArgumentParseError::UnexpectedEnd {
                expected: closing.describe(),
            });
        };
        let (opens, closes) = match closing {
            Closing::EndGroup => (false, false),
            Closing::EscapedBrace => (is_control_symbol(&token, "{"), is_control_symbol(&token, "}")),
            Closing::Char { open, close } => (
                open != close && is_delimiter(&token, open),
                is_delimiter(&token, close),
            ),
        };
        if closes {
            if depth == 0 {
                return Ok((children, token.range));
            }
            depth -= 1;
        } else if opens {
            depth += 1;
        }
        match token.kind {
            TokenKind::EndGroup => {
                return match closing {
                    Closing::EndGroup => Ok((children, token.range)),
                    Closing::EscapedBrace | Closing::Char { .. } => {
                        Err(ArgumentParseError::Unbalanced { range: token.range })
                    }
                };
            }
            TokenKind::BeginGroup => children.push(read_brace_group(stream, token.range)?),
            TokenKind::Macro(name) => {
                let post_space = if name.chars().all(char::is_alphabetic) {
                    read_post_space(stream)
                } else {
                    String::new()
                };
                children.push(Node {
                    kind: NodeKind::Macro {
                        name,
                        post_space: post_space.into_boxed_str(),
                    },
                    range: token.range,
                });
            }
            TokenKind::Chars(s) | TokenKind::Space(s) => children.push(Node {
                kind: NodeKind::Chars(s),
                range: token.range,
            }),
            TokenKind::Specials(s) => children.push(Node {
                kind: NodeKind::Specials(s),
                range: token.range,
            }),
        }
    }
}

fn read_post_space<S: TokenStream + ?Sized>(stream: &mut S) -> String {
    let mut space = String::new();
    loop {
        let pos = stream.position();
        match stream.next_token() {
            Some(Token {
                kind: TokenKind::Space(s),
                ..
            }) => space.push_str(&s),
            Some(_) => {
                stream.move_to(pos);
                return space;
            }
            None => return space,
        }
    }
}

crate::tests! {
    sizing_slots_absent {
        let mut tokens = crate::testing::lex(r"{\psi}");
        let mut descriptors = ArgumentDescriptor::SIZING_SLOTS.to_vec();
        descriptors.push(ArgumentDescriptor::new(ArgumentParser::Brace));
        let args = parse_arguments(&descriptors, &mut tokens).expect("parses");
        assert_eq!(args.len(), 4);
        assert!(args.iter().take(3).all(|e| !e.argument.was_provided()));
        assert_eq!(args.by_position(4).map(ParsedArgument::verbatim), Some(r"\psi"));
        assert!(tokens.is_at_end());
    };
    backtick_reads_one_token {
        let mut tokens = crate::testing::lex(r"`\big{x}");
        let descriptors = [ArgumentDescriptor::SIZE_BACKTICK, ArgumentDescriptor::new(ArgumentParser::Brace)];
        let args = parse_arguments(&descriptors, &mut tokens).expect("parses");
        let size = args.by_position(1).expect("exists");
        assert!(size.was_provided());
        assert_eq!(size.content().len(), 1);
        assert_eq!(size.verbatim(), r"\big");
        assert_eq!(args.by_position(2).map(ParsedArgument::verbatim), Some("x"));
    };
    bracket_and_star {
        let mut tokens = crate::testing::lex(r"*[\Big]{a}");
        let mut descriptors = ArgumentDescriptor::SIZING_SLOTS.to_vec();
        descriptors.push(ArgumentDescriptor::new(ArgumentParser::Brace));
        let args = parse_arguments(&descriptors, &mut tokens).expect("parses");
        assert!(!args.by_position(1).expect("exists").was_provided());
        assert!(args.by_position(2).expect("exists").is_single_star());
        let bracket = args.by_position(3).expect("exists");
        assert_eq!(bracket.verbatim(), r"\Big");
        assert_eq!(bracket.group_delimiters(), Some(("[", "]")));
    };
    nested_groups_and_brackets {
        let mut tokens = crate::testing::lex(r"[{[}a]");
        let args = parse_arguments(&[ArgumentDescriptor::new(ArgumentParser::OptionalBracket)], &mut tokens)
            .expect("parses");
        assert_eq!(args.by_position(1).map(ParsedArgument::verbatim), Some("{[}a"));
    };
    any_delimited_keeps_delimiters(
        #[values("(x)", "<x>", "[x]", "{x}")] source: &str
    ) {
        let mut tokens = crate::testing::lex(source);
        let args = parse_arguments(
            &[ArgumentDescriptor::named(crate::arguments::MAIN_DELIMITED_ARGUMENT, ArgumentParser::AnyDelimited)],
            &mut tokens,
        ).expect("parses");
        let arg = args.by_name(crate::arguments::MAIN_DELIMITED_ARGUMENT).expect("exists");
        assert_eq!(arg.verbatim(), "x");
        let (open, close) = arg.group_delimiters().expect("is a group");
        assert_eq!(format!("{open}x{close}"), source);
    };
    escaped_braces_are_a_delimited_group {
        let mut tokens = crate::testing::lex(r"\{a\{b\}\} rest");
        let args = parse_arguments(
            &[ArgumentDescriptor::named(crate::arguments::MAIN_DELIMITED_ARGUMENT, ArgumentParser::AnyDelimited)],
            &mut tokens,
        ).expect("parses");
        let arg = args.by_name(crate::arguments::MAIN_DELIMITED_ARGUMENT).expect("exists");
        assert_eq!(arg.verbatim(), r"a\{b\}");
        assert_eq!(arg.group_delimiters(), Some((r"\{", r"\}")));
        assert_eq!(arg.range(), SourceRange::new(0, 10));
        assert!(!tokens.is_at_end());
    };
    unclosed_escaped_brace {
        let mut tokens = crate::testing::lex(r"\{x");
        let err = parse_arguments(&[ArgumentDescriptor::new(ArgumentParser::AnyDelimited)], &mut tokens)
            .expect_err("not closed");
        assert_eq!(err, ArgumentParseError::UnexpectedEnd { expected: r"`\}`" });
    };
    star_as_specials_token {
        use crate::tokens::{Token, TokenList};
        let mut tokens = TokenList::new(vec![
            Token::specials("*", 0..1),
            Token::begin_group(1..2),
            Token::chars("x", 2..3),
            Token::end_group(3..4),
        ]);
        let descriptors = [ArgumentDescriptor::new(ArgumentParser::Star), ArgumentDescriptor::new(ArgumentParser::Brace)];
        let args = parse_arguments(&descriptors, &mut tokens).expect("parses");
        assert!(args.by_position(1).expect("exists").is_single_star());
        assert_eq!(args.by_position(2).map(ParsedArgument::verbatim), Some("x"));
        assert!(tokens.is_at_end());
    };
    size_token_or_nothing {
        let descriptors = [
            ArgumentDescriptor::named(crate::arguments::SIZE_ARG_BRACKET, ArgumentParser::SizeToken),
            ArgumentDescriptor::new(ArgumentParser::AnyDelimited),
        ];
        let mut tokens = crate::testing::lex(r"(x)");
        let args = parse_arguments(&descriptors, &mut tokens).expect("parses");
        assert!(!args.by_position(1).expect("exists").was_provided());
        let mut tokens = crate::testing::lex(r"\bigg(x)");
        let args = parse_arguments(&descriptors, &mut tokens).expect("parses");
        assert_eq!(args.by_position(1).map(ParsedArgument::verbatim), Some(r"\bigg"));
    };
    unclosed_group_is_an_error {
        let mut tokens = crate::testing::lex(r"{\psi");
        let err = parse_arguments(&[ArgumentDescriptor::new(ArgumentParser::Brace)], &mut tokens)
            .expect_err("group is not closed");
        assert_eq!(err, ArgumentParseError::UnexpectedEnd { expected: "`}`" });
    };
    missing_parenthesis {
        let mut tokens = crate::testing::lex(r"{n}");
        let err = parse_arguments(
            &[ArgumentDescriptor::new(ArgumentParser::Delimited { open: '(', close: ')' })],
            &mut tokens,
        ).expect_err("needs parentheses");
        assert!(matches!(err, ArgumentParseError::Expected { expected: "a delimited group", .. }));
    };
    macro_keeps_following_space {
        let mut tokens = crate::testing::lex(r"{\alpha x}");
        let args = parse_arguments(&[ArgumentDescriptor::new(ArgumentParser::Brace)], &mut tokens)
            .expect("parses");
        assert_eq!(args.by_position(1).map(ParsedArgument::verbatim), Some(r"\alpha x"));
    }
}
