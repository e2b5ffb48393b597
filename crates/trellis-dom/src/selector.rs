//! A compound-selector subset.
//!
//! Supported: `tag`, `#id`, `.class`, `[attr]`, `[attr="value"]`,
//! `:not(<simple>)` and comma-separated lists. Combinators are rejected.

use crate::element::Element;

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unterminated {0}")]
    Unterminated(&'static str),
    #[error("unsupported selector syntax: {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Tag(String),
    Id(String),
    Class(String),
    Attr(AttrMatch),
    Not(Box<Simple>),
}

impl Simple {
    fn matches(&self, el: &Element) -> bool {
        match self {
            Simple::Tag(tag) => el.tag() == tag.as_str(),
            Simple::Id(id) => el.attribute("id") == Some(id.as_str()),
            Simple::Class(class) => el.has_class(class),
            Simple::Attr(AttrMatch { name, value: None }) => el.has_attribute(name),
            Simple::Attr(AttrMatch { name, value: Some(value) }) => {
                el.attribute(name) == Some(value.as_str())
            }
            Simple::Not(inner) => !inner.matches(el),
        }
    }
}

/// A parsed selector list. Matches if any compound matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Vec<Simple>>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser { chars: input.char_indices().collect(), pos: 0 };
        let mut compounds = Vec::new();
        loop {
            parser.skip_ws();
            let compound = parser.compound()?;
            if compound.is_empty() {
                return Err(match parser.peek() {
                    Some((offset, found)) => SelectorError::Unexpected { found, offset },
                    None => SelectorError::Empty,
                });
            }
            compounds.push(compound);
            parser.skip_ws();
            match parser.next() {
                None => break,
                Some((_, ',')) => continue,
                Some((_, c)) if c.is_alphanumeric() || matches!(c, '.' | '#' | '[' | '>' | '+' | '~') => {
                    return Err(SelectorError::Unsupported("combinators"));
                }
                Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            }
        }
        Ok(Self { compounds })
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.compounds
            .iter()
            .any(|compound| compound.iter().all(|simple| simple.matches(el)))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(usize, char)> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn compound(&mut self) -> Result<Vec<Simple>, SelectorError> {
        let mut out = Vec::new();
        if self.peek().is_some_and(|(_, c)| is_ident_char(c) || c == '*') {
            if self.peek().is_some_and(|(_, c)| c == '*') {
                self.pos += 1;
            } else {
                out.push(Simple::Tag(self.ident()?.to_ascii_lowercase()));
            }
        }
        while let Some((_, c)) = self.peek() {
            match c {
                '#' | '.' | '[' | ':' => out.push(self.simple()?),
                _ => break,
            }
        }
        Ok(out)
    }

    fn simple(&mut self) -> Result<Simple, SelectorError> {
        match self.next() {
            Some((_, '#')) => Ok(Simple::Id(self.ident()?)),
            Some((_, '.')) => Ok(Simple::Class(self.ident()?)),
            Some((_, '[')) => self.attribute(),
            Some((_, ':')) => {
                let name = self.ident()?;
                if name != "not" {
                    return Err(SelectorError::Unsupported("pseudo-classes other than :not"));
                }
                match self.next() {
                    Some((_, '(')) => {}
                    Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
                    None => return Err(SelectorError::Unterminated(":not(")),
                }
                self.skip_ws();
                let inner = if self.peek().is_some_and(|(_, c)| is_ident_char(c)) {
                    Simple::Tag(self.ident()?.to_ascii_lowercase())
                } else {
                    self.simple()?
                };
                self.skip_ws();
                match self.next() {
                    Some((_, ')')) => Ok(Simple::Not(Box::new(inner))),
                    Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
                    None => Err(SelectorError::Unterminated(":not(")),
                }
            }
            Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
            None => Err(SelectorError::Empty),
        }
    }

    fn attribute(&mut self) -> Result<Simple, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        match self.next() {
            Some((_, ']')) => Ok(Simple::Attr(AttrMatch { name, value: None })),
            Some((_, '=')) => {
                self.skip_ws();
                let value = self.value()?;
                self.skip_ws();
                match self.next() {
                    Some((_, ']')) => Ok(Simple::Attr(AttrMatch { name, value: Some(value) })),
                    Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
                    None => Err(SelectorError::Unterminated("attribute selector")),
                }
            }
            Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
            None => Err(SelectorError::Unterminated("attribute selector")),
        }
    }

    fn value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some((_, quote @ ('"' | '\''))) => {
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.next() {
                        Some((_, c)) if c == quote => return Ok(out),
                        Some((_, c)) => out.push(c),
                        None => return Err(SelectorError::Unterminated("string")),
                    }
                }
            }
            _ => self.ident(),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some((_, c)) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        if out.is_empty() {
            return Err(match self.peek() {
                Some((offset, found)) => SelectorError::Unexpected { found, offset },
                None => SelectorError::Empty,
            });
        }
        Ok(out)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
