//! Content templates: macro bodies with placeholder markers, parsed once per definition.

use std::str::FromStr;

use crate::errors::SubstitutionError;

/// One piece of a [`ContentTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplatePart {
    /// Output as is.
    Text(Box<str>),
    /// `#1`…`#9`.
    Numbered(u8),
    /// `#{name}`, or `#[literal]{name}`.
    Named {
        name: Box<str>,
        literal: Option<Box<str>>,
        /// The marker as written, for error messages.
        raw: Box<str>,
    },
}
impl TemplatePart {
    /// The placeholder as it appeared in the template; `None` for text.
    #[must_use]
    pub fn placeholder_text(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            Self::Text(_) => None,
            Self::Numbered(n) => Some(format!("#{n}").into()),
            Self::Named { raw, .. } => Some((&**raw).into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentTemplate {
    source: Box<str>,
    parts: Box<[TemplatePart]>,
}

impl ContentTemplate {
    /// ### Errors
    /// [`SubstitutionError::MalformedTemplate`] if a `#` is not followed by `#`, a digit
    /// `1`-`9`, `{name}` or `[literal]{name}`.
    pub fn parse(source: &str) -> Result<Self, SubstitutionError> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = source;
        while let Some(idx) = rest.find('#') {
            text.push_str(&rest[..idx]);
            let offset = source.len() - rest.len() + idx;
            let marker = &rest[idx..];
            let err = |reason| SubstitutionError::MalformedTemplate {
                template: source.into(),
                offset,
                reason,
            };
            let (part, len) = match marker.as_bytes().get(1) {
                Some(b'#') => {
                    text.push('#');
                    rest = &marker[2..];
                    continue;
                }
                Some(d @ b'1'..=b'9') => (TemplatePart::Numbered(d - b'0'), 2),
                Some(b'{') => {
                    let (name, len) = read_name(&marker[1..]).map_err(err)?;
                    (
                        TemplatePart::Named {
                            name: name.into(),
                            literal: None,
                            raw: marker[..=len].into(),
                        },
                        1 + len,
                    )
                }
                Some(b'[') => {
                    let (literal, lit_len) = read_literal(&marker[2..]).map_err(err)?;
                    let after = &marker[2 + lit_len..];
                    if !after.starts_with('{') {
                        return Err(err("expected `{name}` after a literal"));
                    }
                    let (name, len) = read_name(after).map_err(err)?;
                    let total = 2 + lit_len + len;
                    (
                        TemplatePart::Named {
                            name: name.into(),
                            literal: Some(strip_outer_braces(literal).into()),
                            raw: marker[..total].into(),
                        },
                        total,
                    )
                }
                Some(_) => return Err(err("expected `#`, a digit, `{` or `[` after `#`")),
                None => return Err(err("trailing `#`")),
            };
            if !text.is_empty() {
                parts.push(TemplatePart::Text(std::mem::take(&mut text).into_boxed_str()));
            }
            parts.push(part);
            rest = &marker[len..];
        }
        text.push_str(rest);
        if !text.is_empty() {
            parts.push(TemplatePart::Text(text.into_boxed_str()));
        }
        Ok(Self {
            source: source.into(),
            parts: parts.into_boxed_slice(),
        })
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// The highest numbered reference, if any.
    #[must_use]
    pub fn max_numbered(&self) -> Option<u8> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                TemplatePart::Numbered(n) => Some(*n),
                _ => None,
            })
            .max()
    }

    /// Names of all named references, in order of appearance.
    pub fn named(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            TemplatePart::Named { name, .. } => Some(&**name),
            _ => None,
        })
    }
}

impl FromStr for ContentTemplate {
    type Err = SubstitutionError;
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ContentTemplate {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// `s` starts with `{`; returns the name and the length including both braces.
fn read_name(s: &str) -> Result<(&str, usize), &'static str> {
    let Some(end) = s.find('}') else {
        return Err("unterminated placeholder name");
    };
    let name = &s[1..end];
    if name.is_empty() {
        return Err("empty placeholder name");
    }
    if name.contains(['{', '#']) {
        return Err("invalid character in placeholder name");
    }
    Ok((name, end + 1))
}

/// `s` starts right after `[`; returns the literal and the length including the closing `]`.
fn read_literal(s: &str) -> Result<(&str, usize), &'static str> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.checked_sub(1).ok_or("unbalanced `}` in literal")?,
            ']' if depth == 0 => return Ok((&s[..i], i + 1)),
            _ => (),
        }
    }
    Err("unterminated literal")
}

/// Strips one pair of braces enclosing the whole literal, so `{[}` means `[`.
fn strip_outer_braces(literal: &str) -> &str {
    let Some(inner) = literal
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
    else {
        return literal;
    };
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return literal,
            },
            _ => (),
        }
    }
    if depth == 0 { inner } else { literal }
}

crate::tests! {
    parses_all_marker_kinds {
        let t = ContentTemplate::parse(r"#[{[}]{DelimLeft}#1##x#{space.AfterComma}#[\vert]{DelimMiddle}").unwrap();
        assert_eq!(t.parts(), &[
            TemplatePart::Named { name: "DelimLeft".into(), literal: Some("[".into()), raw: "#[{[}]{DelimLeft}".into() },
            TemplatePart::Numbered(1),
            TemplatePart::Text("#x".into()),
            TemplatePart::Named { name: "space.AfterComma".into(), literal: None, raw: "#{space.AfterComma}".into() },
            TemplatePart::Named { name: "DelimMiddle".into(), literal: Some(r"\vert".into()), raw: r"#[\vert]{DelimMiddle}".into() },
        ]);
        assert_eq!(t.max_numbered(), Some(1));
        assert_eq!(t.named().collect::<Vec<_>>(), ["DelimLeft", "space.AfterComma", "DelimMiddle"]);
    };
    literal_braces {
        let t = ContentTemplate::parse(r"#[{a}{b}]{X}#[]{Y}#[{}]{Z}").unwrap();
        let literals: Vec<_> = t.parts().iter().filter_map(|p| match p {
            TemplatePart::Named { literal, .. } => literal.as_deref(),
            _ => None,
        }).collect();
        assert_eq!(literals, [r"{a}{b}", "", ""]);
    };
    plain_text_is_one_part {
        let t: ContentTemplate = r"\operatorname{tr}".parse().unwrap();
        assert_eq!(t.parts(), &[TemplatePart::Text(r"\operatorname{tr}".into())]);
        assert_eq!(t.max_numbered(), None);
        assert_eq!(t.to_string(), r"\operatorname{tr}");
        assert!(ContentTemplate::parse("").unwrap().parts().is_empty());
    };
    #[case("#", 0)]
    #[case("ab#0", 2)]
    #[case("#x", 0)]
    #[case("x#{}", 1)]
    #[case("#{open", 0)]
    #[case("#[lit", 0)]
    #[case("#[lit]X", 0)]
    #[case("#[}]{X}", 0)]
    malformed(#[case] source: &str, #[case] at: usize) {
        match ContentTemplate::parse(source) {
            Err(SubstitutionError::MalformedTemplate { template, offset, .. }) => {
                assert_eq!(&*template, source);
                assert_eq!(offset, at);
            }
            other => panic!("expected a malformed template error, got {other:?}"),
        }
    }
}
