//! Strict recognition of a single sizing token, e.g. the `\big` in `` `\big(x) ``.

use crate::{
    nodes::Node,
    tokens::{SourceRange, TokenKind, TokenStream},
    utils::control_sequence,
};

/// A recognized sizing token: either a control sequence (`\big`) or `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizeToken {
    pub value: Box<str>,
    pub range: SourceRange,
}
impl SizeToken {
    #[inline]
    #[must_use]
    pub fn is_star(&self) -> bool {
        &*self.value == "*"
    }
}
impl From<SizeToken> for Node {
    #[inline]
    fn from(token: SizeToken) -> Self {
        Self::chars(&token.value, token.range)
    }
}

/// Consumes exactly one token if it is a sizing command or a literal `*`.
///
/// On any other token (or at the end of input) returns `None` and leaves the
/// stream exactly where it was, so the caller can try another parser on the
/// same token.
pub fn recognize_size_token<S: TokenStream + ?Sized>(stream: &mut S) -> Option<SizeToken> {
    let start = stream.position();
    let Some(token) = stream.next_token() else {
        stream.move_to(start);
        return None;
    };
    let value = match &token.kind {
        TokenKind::Macro(name) if !name.is_empty() => Some(control_sequence(name)),
        TokenKind::Chars(c) | TokenKind::Specials(c) if c.trim() == "*" => Some("*".to_string()),
        _ => None,
    };
    if let Some(value) = value {
        tracing::debug!("Found a size token: {value} at {}", token.range);
        Some(SizeToken {
            value: value.into_boxed_str(),
            range: token.range,
        })
    } else {
        tracing::debug!("No size token found; got {:?}", token.kind);
        stream.move_to(start);
        None
    }
}

crate::tests! {
    recognizes_control_sequence {
        use crate::tokens::{Token, TokenList};
        let mut tokens = TokenList::new([
            Token::control_sequence("big", 0..4),
            Token::chars("(", 4..5),
        ]);
        let token = recognize_size_token(&mut tokens).expect("is a size token");
        assert_eq!(&*token.value, r"\big");
        assert_eq!(token.range, SourceRange::new(0, 4));
        assert_eq!(tokens.position(), 1);
    };
    recognizes_star {
        use crate::tokens::{Token, TokenList};
        let mut tokens = TokenList::new([Token::chars(" * ", 0..3)]);
        let token = recognize_size_token(&mut tokens).expect("is a size token");
        assert!(token.is_star());
        assert_eq!(Node::from(token), Node::chars("*", 0..3));
    };
    #[case(crate::tokens::Token::chars("(", 0..1))]
    #[case(crate::tokens::Token::chars("  ", 0..1))]
    #[case(crate::tokens::Token::control_sequence("", 0..1))]
    #[case(crate::tokens::Token::begin_group(0..1))]
    #[case(crate::tokens::Token::space(" ", 0..1))]
    rewinds_on_mismatch(#[case] token: crate::tokens::Token) {
        use crate::tokens::{Token, TokenList};
        let mut tokens = TokenList::new([token.clone(), Token::chars("x", 1..2)]);
        assert!(recognize_size_token(&mut tokens).is_none());
        assert_eq!(tokens.position(), 0);
        assert_eq!(tokens.next_token(), Some(token));
    };
    rewinds_at_end {
        let mut tokens = crate::tokens::TokenList::default();
        assert!(recognize_size_token(&mut tokens).is_none());
        assert_eq!(tokens.position(), 0);
    }
}
