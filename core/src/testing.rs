//! A minimal lexer for tests and benchmarks; not a TeX tokenizer.
//!
//! `\` followed by ASCII letters is a control word, `\` followed by any other character a
//! control symbol, `{`/`}` are group tokens, runs of whitespace are space tokens, `` ` `` is a
//! specials token, and every other character is a chars token of its own.

use crate::tokens::{Token, TokenList};

#[must_use]
pub fn lex(source: &str) -> TokenList {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let token = match c {
            '\\' => {
                let mut name = String::new();
                let mut end = start + 1;
                while let Some(&(i, n)) = chars.peek()
                    && n.is_ascii_alphabetic()
                {
                    name.push(n);
                    end = i + 1;
                    chars.next();
                }
                if name.is_empty()
                    && let Some((i, n)) = chars.next()
                {
                    name.push(n);
                    end = i + n.len_utf8();
                }
                Token::control_sequence(&name, start..end)
            }
            '{' => Token::begin_group(start..start + 1),
            '}' => Token::end_group(start..start + 1),
            '`' => Token::specials("`", start..start + 1),
            c if c.is_whitespace() => {
                let mut space = String::from(c);
                let mut end = start + c.len_utf8();
                while let Some(&(i, n)) = chars.peek()
                    && n.is_whitespace()
                {
                    space.push(n);
                    end = i + n.len_utf8();
                    chars.next();
                }
                Token::space(&space, start..end)
            }
            c => Token::chars(c.encode_utf8(&mut [0; 4]), start..start + c.len_utf8()),
        };
        tokens.push(token);
    }
    TokenList::new(tokens)
}

crate::tests! {
    lexes_control_words_and_symbols {
        use crate::tokens::{TokenKind, TokenStream};
        let mut tokens = lex(r"\big\{ x");
        let kinds: Vec<_> = std::iter::from_fn(|| tokens.next_token()).map(|t| t.kind).collect();
        assert_eq!(kinds, vec![
            TokenKind::Macro("big".into()),
            TokenKind::Macro("{".into()),
            TokenKind::Space(" ".into()),
            TokenKind::Chars("x".into()),
        ]);
    }
}
