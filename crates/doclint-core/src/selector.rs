//! A small CSS selector subset for querying documents.
//!
//! Supported: type selectors (`section`), the universal selector (`*`),
//! `#id`, `.class`, `[attr]` and `[attr=value]`, and comma-separated
//! selector lists. Combinators (descendant, `>`, `+`, `~`) are rejected.

use crate::node::{Document, NodeId};
use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SelectorError {
    /// The selector (or one item of a list) is empty.
    #[error("empty selector in `{selector}`")]
    #[diagnostic(code(doclint::selector::empty))]
    Empty {
        /// Full selector text.
        selector: String,
    },

    /// The selector uses a combinator.
    #[error("combinators are not supported (`{selector}` at byte {position})")]
    #[diagnostic(
        code(doclint::selector::combinator),
        help("query the outer element and walk children with the node interface")
    )]
    UnsupportedCombinator {
        /// Full selector text.
        selector: String,
        /// Byte offset of the combinator.
        position: usize,
    },

    /// An unexpected character was found.
    #[error("unexpected `{found}` in `{selector}` at byte {position}")]
    #[diagnostic(code(doclint::selector::unexpected))]
    Unexpected {
        /// Full selector text.
        selector: String,
        /// Offending character.
        found: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// Input ended inside an attribute selector or quoted value.
    #[error("unterminated attribute selector in `{selector}`")]
    #[diagnostic(code(doclint::selector::unterminated))]
    Unterminated {
        /// Full selector text.
        selector: String,
    },
}

/// One simple condition inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    HasAttribute(String),
    AttributeEquals(String, String),
}

/// A compound selector: optional type plus conditions, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    /// `None` means universal.
    local_name: Option<String>,
    conditions: Vec<Condition>,
}

impl Compound {
    fn matches<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        let Some(name) = doc.local_name(node) else {
            return false;
        };
        if let Some(expected) = &self.local_name {
            if !expected.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        self.conditions.iter().all(|condition| match condition {
            Condition::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
            Condition::Class(class) => doc
                .attribute(node, "class")
                .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class)),
            Condition::HasAttribute(attr) => doc.attribute(node, attr).is_some(),
            Condition::AttributeEquals(attr, value) => {
                doc.attribute(node, attr) == Some(value.as_str())
            }
        })
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parses a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty input, combinators or malformed
    /// attribute selectors.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let alternatives = Parser::new(source).parse_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Returns the selector text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if `node` matches any alternative of this list.
    #[must_use]
    pub fn matches<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| is_ident_char(*c)) {
            out.push(c);
        }
        out
    }

    fn empty(&self) -> SelectorError {
        SelectorError::Empty {
            selector: self.source.to_string(),
        }
    }

    fn unexpected(&self, found: char, position: usize) -> SelectorError {
        SelectorError::Unexpected {
            selector: self.source.to_string(),
            found,
            position,
        }
    }

    fn unterminated(&self) -> SelectorError {
        SelectorError::Unterminated {
            selector: self.source.to_string(),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Compound>, SelectorError> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.parse_compound()?);
            self.skip_whitespace();
            match self.chars.next() {
                None => return Ok(list),
                Some((_, ',')) => {}
                Some((position, '>' | '+' | '~')) => {
                    return Err(SelectorError::UnsupportedCombinator {
                        selector: self.source.to_string(),
                        position,
                    })
                }
                // Whitespace followed by another compound is a descendant combinator.
                Some((position, c)) if is_compound_start(c) => {
                    return Err(SelectorError::UnsupportedCombinator {
                        selector: self.source.to_string(),
                        position,
                    });
                }
                Some((position, c)) => return Err(self.unexpected(c, position)),
            }
        }
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound {
            local_name: None,
            conditions: Vec::new(),
        };
        let mut seen_any = false;

        if self.chars.next_if(|(_, c)| *c == '*').is_some() {
            seen_any = true;
        } else {
            let name = self.ident();
            if !name.is_empty() {
                compound.local_name = Some(name);
                seen_any = true;
            }
        }

        while let Some((position, c)) = self.chars.peek().copied() {
            match c {
                '#' | '.' => {
                    self.chars.next();
                    let name = self.ident();
                    if name.is_empty() {
                        return Err(self.unexpected(c, position));
                    }
                    compound.conditions.push(if c == '#' {
                        Condition::Id(name)
                    } else {
                        Condition::Class(name)
                    });
                }
                '[' => {
                    self.chars.next();
                    compound.conditions.push(self.parse_attribute()?);
                }
                _ => break,
            }
            seen_any = true;
        }

        if seen_any {
            Ok(compound)
        } else {
            Err(self.empty())
        }
    }

    fn parse_attribute(&mut self) -> Result<Condition, SelectorError> {
        self.skip_whitespace();
        let name = self.ident();
        if name.is_empty() {
            return match self.chars.peek().copied() {
                Some((position, c)) => Err(self.unexpected(c, position)),
                None => Err(self.unterminated()),
            };
        }
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, ']')) => Ok(Condition::HasAttribute(name)),
            Some((_, '=')) => {
                self.skip_whitespace();
                let value = self.parse_value()?;
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ']')) => Ok(Condition::AttributeEquals(name, value)),
                    Some((position, c)) => Err(self.unexpected(c, position)),
                    None => Err(self.unterminated()),
                }
            }
            Some((position, c)) => Err(self.unexpected(c, position)),
            None => Err(self.unterminated()),
        }
    }

    fn parse_value(&mut self) -> Result<String, SelectorError> {
        match self.chars.peek().copied() {
            Some((_, quote @ ('"' | '\''))) => {
                self.chars.next();
                let mut value = String::new();
                for (_, c) in self.chars.by_ref() {
                    if c == quote {
                        return Ok(value);
                    }
                    value.push(c);
                }
                Err(self.unterminated())
            }
            Some(_) => Ok(self.ident()),
            None => Err(self.unterminated()),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_compound_start(c: char) -> bool {
    is_ident_char(c) || matches!(c, '*' | '#' | '.' | '[')
}
