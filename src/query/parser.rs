//! Textual traversal parser using Pest
//!
//! Turns `v(1).out("knows").property("name")` into a [`Program`]. Call
//! names are kept verbatim except `v`, which is the `vertex` operator, so
//! aliases and extension operators parse like built-ins.

use crate::graph::{PropertyMap, PropertyValue};
use crate::query::args::{Arg, Args};
use crate::query::program::{Program, Step};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "query/traversal.pest"]
struct TraversalParser;

/// Parser errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Pest parsing error
    #[error("Parse error: {0}")]
    PestError(#[from] pest::error::Error<Rule>),

    /// Semantic error
    #[error("Semantic error: {0}")]
    SemanticError(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a traversal string into a program
pub fn parse_traversal(input: &str) -> ParseResult<Program> {
    let mut program = Program::new();
    let pairs = TraversalParser::parse(Rule::traversal, input)?;
    for pair in pairs.flat_map(|p| p.into_inner()) {
        match pair.as_rule() {
            Rule::call => program.push(parse_call(pair)?),
            Rule::EOI => break,
            _ => {}
        }
    }
    Ok(program)
}

fn parse_call(pair: Pair<Rule>) -> ParseResult<Step> {
    let mut inner = pair.into_inner();
    let name = match inner.next() {
        Some(ident) => ident.as_str(),
        None => return Err(ParseError::SemanticError("call without a name".into())),
    };
    let name = if name == "v" { "vertex" } else { name };
    let args = inner.map(parse_arg).collect::<ParseResult<Args>>()?;
    Ok(Step::new(name, args))
}

/// Top-level arguments: objects are filters and lists of strings are label
/// sets. Nested values stay plain values.
fn parse_arg(pair: Pair<Rule>) -> ParseResult<Arg> {
    parse_value(pair).map(Arg::from_value)
}

fn parse_value(pair: Pair<Rule>) -> ParseResult<PropertyValue> {
    match pair.as_rule() {
        Rule::object => Ok(PropertyValue::Map(parse_object(pair)?)),
        Rule::list => Ok(PropertyValue::Array(parse_list(pair)?)),
        Rule::string => Ok(PropertyValue::String(parse_string(pair))),
        Rule::integer => pair
            .as_str()
            .parse()
            .map(PropertyValue::Integer)
            .map_err(|e| ParseError::SemanticError(format!("integer {}: {}", pair.as_str(), e))),
        Rule::float => pair
            .as_str()
            .parse()
            .map(PropertyValue::Float)
            .map_err(|e| ParseError::SemanticError(format!("float {}: {}", pair.as_str(), e))),
        Rule::boolean => Ok(PropertyValue::Boolean(pair.as_str() == "true")),
        Rule::null => Ok(PropertyValue::Null),
        other => Err(ParseError::SemanticError(format!("unexpected {:?}", other))),
    }
}

fn parse_list(pair: Pair<Rule>) -> ParseResult<Vec<PropertyValue>> {
    pair.into_inner().map(parse_value).collect()
}

fn parse_object(pair: Pair<Rule>) -> ParseResult<PropertyMap> {
    let mut map = PropertyMap::new();
    for entry in pair.into_inner() {
        let mut parts = entry.into_inner();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            return Err(ParseError::SemanticError("incomplete object entry".into()));
        };
        let key = match key.as_rule() {
            Rule::string => parse_string(key),
            _ => key.as_str().to_string(),
        };
        map.insert(key, parse_value(value)?);
    }
    Ok(map)
}

fn parse_string(pair: Pair<Rule>) -> String {
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or_default();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
