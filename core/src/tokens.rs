//! Tokens as produced by the host engine's tokenizer.

use std::ops::Range;

/// Byte range of a token or node in the host's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}
impl SourceRange {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
    /// Empty range at `pos`; used for arguments that were not provided.
    #[inline]
    #[must_use]
    pub const fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
    /// The smallest range covering both `self` and `other`.
    #[must_use]
    pub const fn join(self, other: Self) -> Self {
        Self {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }
}
impl From<Range<usize>> for SourceRange {
    #[inline]
    fn from(value: Range<usize>) -> Self {
        Self::new(value.start, value.end)
    }
}
impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A control sequence; the name excludes the leading backslash.
    Macro(Box<str>),
    /// Ordinary characters. Punctuation relevant to argument parsing
    /// (`*`, `[`, `]`, `(`, `)`, `<`, `>`) is expected as single-character tokens.
    Chars(Box<str>),
    /// Characters the host assigned a special meaning, e.g. the backtick.
    Specials(Box<str>),
    /// `{`
    BeginGroup,
    /// `}`
    EndGroup,
    /// Whitespace
    Space(Box<str>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub range: SourceRange,
}
impl Token {
    #[inline]
    #[must_use]
    pub fn control_sequence(name: &str, range: impl Into<SourceRange>) -> Self {
        Self {
            kind: TokenKind::Macro(name.into()),
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn chars(chars: &str, range: impl Into<SourceRange>) -> Self {
        Self {
            kind: TokenKind::Chars(chars.into()),
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn specials(chars: &str, range: impl Into<SourceRange>) -> Self {
        Self {
            kind: TokenKind::Specials(chars.into()),
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn space(chars: &str, range: impl Into<SourceRange>) -> Self {
        Self {
            kind: TokenKind::Space(chars.into()),
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn begin_group(range: impl Into<SourceRange>) -> Self {
        Self {
            kind: TokenKind::BeginGroup,
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn end_group(range: impl Into<SourceRange>) -> Self {
        Self {
            kind: TokenKind::EndGroup,
            range: range.into(),
        }
    }

    /// Whether this is a chars or specials token whose text, trimmed, is `c`.
    #[must_use]
    pub fn is_char(&self, c: &str) -> bool {
        matches!(&self.kind, TokenKind::Chars(s) | TokenKind::Specials(s) if s.trim() == c)
    }
}

/// A positioned stream of tokens that can be rewound.
///
/// Parsers in this crate read ahead freely and rely on [`move_to`](TokenStream::move_to)
/// restoring the stream *exactly*, so that a failed attempt leaves no trace.
pub trait TokenStream {
    type Position: Copy + Eq + std::fmt::Debug;

    fn position(&self) -> Self::Position;

    /// Consumes one token; `None` at the end of input, in which case the
    /// position does not change.
    fn next_token(&mut self) -> Option<Token>;

    fn move_to(&mut self, position: Self::Position);

    /// Byte offset of the next token, or of the end of input.
    fn source_offset(&self) -> usize;

    fn peek_token(&mut self) -> Option<Token> {
        let pos = self.position();
        let token = self.next_token();
        self.move_to(pos);
        token
    }

    /// Skips whitespace tokens.
    fn skip_space(&mut self) {
        loop {
            let pos = self.position();
            match self.next_token() {
                Some(Token {
                    kind: TokenKind::Space(_),
                    ..
                }) => (),
                Some(_) => {
                    self.move_to(pos);
                    return;
                }
                None => return,
            }
        }
    }
}

/// A [`TokenStream`] over an owned list of tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
    pos: usize,
}
impl TokenList {
    #[must_use]
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            pos: 0,
        }
    }
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
    /// The tokens not consumed yet.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.pos..).unwrap_or_default()
    }
}
impl FromIterator<Token> for TokenList {
    #[inline]
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self::new(iter)
    }
}
impl TokenStream for TokenList {
    type Position = usize;
    #[inline]
    fn position(&self) -> usize {
        self.pos
    }
    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(token)
    }
    #[inline]
    fn move_to(&mut self, position: usize) {
        self.pos = position.min(self.tokens.len());
    }
    fn source_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.range.start)
            .or_else(|| self.tokens.last().map(|t| t.range.end))
            .unwrap_or_default()
    }
}

crate::tests! {
    peek_does_not_consume {
        let mut tokens = TokenList::new([
            Token::control_sequence("big", 0..4),
            Token::chars("(", 4..5),
        ]);
        assert_eq!(tokens.peek_token(), Some(Token::control_sequence("big", 0..4)));
        assert_eq!(tokens.position(), 0);
        assert_eq!(tokens.next_token(), Some(Token::control_sequence("big", 0..4)));
        assert_eq!(tokens.source_offset(), 4);
    };
    end_of_input_keeps_position {
        let mut tokens = TokenList::new([Token::chars("x", 0..1)]);
        assert!(tokens.next_token().is_some());
        assert!(tokens.next_token().is_none());
        assert_eq!(tokens.position(), 1);
        assert!(tokens.is_at_end());
        assert_eq!(tokens.source_offset(), 1);
    };
    skip_space_stops_before_content {
        let mut tokens = TokenList::new([
            Token::space("  ", 0..2),
            Token::space("\n", 2..3),
            Token::chars("*", 3..4),
        ]);
        tokens.skip_space();
        assert_eq!(tokens.position(), 2);
        assert!(tokens.peek_token().is_some_and(|t| t.is_char("*")));
    }
}
