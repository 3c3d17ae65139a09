//! Type-reference text handling
//!
//! Raw facts carry type references as source text (`List<pkg.Order>`, `int[]`,
//! `Map<String, List<Item>>`). This module parses that text with chumsky and
//! offers the erasure helpers the resolver and the connection builder match on.

use std::fmt;

use chumsky::prelude::*;

/// A parsed type reference
///
/// Bounded wildcards (`? extends Foo`, `? super Foo`) collapse to their bound;
/// an unbounded `?` is kept as a reference named `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub args: Vec<TypeRef>,
    pub array_dims: usize,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_dims: 0,
        }
    }

    fn wildcard() -> Self {
        Self::new("?")
    }

    /// Parse a type reference, returning `None` for text that is not one
    pub fn parse(input: &str) -> Option<TypeRef> {
        inline_whitespace()
            .ignore_then(type_ref_parser())
            .then_ignore(inline_whitespace())
            .then_ignore(end())
            .parse(input)
            .into_result()
            .ok()
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "?"
    }

    /// The element type of a list-like container, or the reference itself
    ///
    /// Array dimensions do not hide the container: `List<Product>[]` yields `Product`.
    pub fn element_type<'a>(&'a self, containers: &[String]) -> &'a TypeRef {
        match self.args.first() {
            Some(first) if containers.iter().any(|c| *c == self.name) => first,
            _ => self,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Spaces and tabs only
fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().ignored()
}

fn whitespace_required<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t\n\r").repeated().at_least(1).ignored()
}

fn type_ref_parser<'src>() -> impl Parser<'src, &'src str, TypeRef> + Clone {
    recursive(|type_ref| {
        let ws = inline_whitespace();

        let name = none_of("<>[],? \t\r\n")
            .repeated()
            .at_least(1)
            .to_slice()
            .map(|s: &str| s.to_string());

        let bound = whitespace_required()
            .ignore_then(text::keyword("extends").or(text::keyword("super")))
            .ignore_then(whitespace_required())
            .ignore_then(type_ref.clone());

        let wildcard = just('?')
            .ignore_then(bound.or_not())
            .map(|bound: Option<TypeRef>| bound.unwrap_or_else(TypeRef::wildcard));

        let argument = ws.clone().ignore_then(type_ref).then_ignore(ws.clone());

        let args = argument
            .separated_by(just(','))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just('<'), just('>'));

        let dims = ws
            .ignore_then(just("[]"))
            .repeated()
            .collect::<Vec<_>>()
            .map(|dims| dims.len());

        let plain = name
            .then(args.or_not())
            .then(dims)
            .map(|((name, args), array_dims)| TypeRef {
                name,
                args: args.unwrap_or_default(),
                array_dims,
            });

        wildcard.or(plain)
    })
}

/// Remove every `<...>` group, honoring nesting
///
/// Text with an unclosed `<` is returned trimmed but otherwise unchanged.
pub fn erase_generics(text: &str) -> String {
    let mut erased = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => erased.push(c),
            _ => {}
        }
    }
    if depth > 0 {
        return text.trim().to_string();
    }
    erased.trim().to_string()
}

/// Remove every `[]` array suffix
pub fn erase_arrays(text: &str) -> String {
    text.replace("[]", "").trim().to_string()
}

/// Effective type name an attribute of type `raw` refers to
///
/// For a list-like container the single type argument is used; generics and
/// array brackets are erased from the result. Text the parser rejects is
/// handled textually the same way.
pub fn element_type_name(raw: &str, containers: &[String]) -> String {
    match TypeRef::parse(raw) {
        Some(type_ref) => type_ref.element_type(containers).name.clone(),
        None => {
            let erased_base = erase_arrays(&erase_generics(raw));
            let text = if containers.iter().any(|c| *c == erased_base) {
                match (raw.find('<'), raw.rfind('>')) {
                    (Some(open), Some(close)) if open < close => &raw[open + 1..close],
                    _ => raw,
                }
            } else {
                raw
            };
            erase_arrays(&erase_generics(text))
        }
    }
}
