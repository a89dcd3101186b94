//! Token predicates, rule composition and the backtracking matcher.
//!
//! A [`Rule`] is evaluated at a position of a token slice and yields every way
//! it can match there, as [`Parse`] values, in declaration order: alternatives
//! in the order they were declared, an optional part present before absent,
//! and a repetition once per end position, farthest first. [`Rule::best`] keeps the longest
//! parse and breaks ties by that order, which is what lets a grammar express
//! precedence simply by listing the preferred alternative first.
//!
//! Matched spans are bound to entity fields through [`Rule::Interpret`] nodes.
//! A binding either emits a constant regardless of the matched text, or keeps
//! the text to be converted later by a [`Converter`].

use std::fmt;
use std::ops::Range;

// used for claimed token positions during overlap resolution
use roaring::RoaringBitmap;

use crate::currency::Currency;
use crate::error::Result;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Integer,
    Fraction,
    Multiplier,
    Currency,
    Coins,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::Integer => "integer",
            Field::Fraction => "fraction",
            Field::Multiplier => "multiplier",
            Field::Currency => "currency",
            Field::Coins => "coins",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Number(u64),
    Currency(Currency),
}

pub type Converter = fn(&str) -> Result<u64>;

#[derive(Debug, Clone, Copy)]
pub enum Binding {
    /// Emitted as is, whatever text was matched.
    Const(Value),
    /// The matched text is handed to the converter.
    Convert(Converter),
}

#[derive(Debug, Clone)]
pub struct Capture {
    pub field: Field,
    pub binding: Binding,
    /// Surface forms of the matched tokens joined by single spaces.
    pub text: String,
    pub tokens: Range<usize>,
}

impl Capture {
    pub fn value(&self) -> Result<Value> {
        match self.binding {
            Binding::Const(value) => Ok(value),
            Binding::Convert(convert) => convert(&self.text).map(Value::Number),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parse {
    pub start: usize,
    pub end: usize,
    pub captures: Vec<Capture>,
}

impl Parse {
    fn empty(at: usize) -> Self {
        Self { start: at, end: at, captures: Vec::new() }
    }
    fn joined(&self, tail: Parse) -> Self {
        let mut captures = self.captures.clone();
        captures.extend(tail.captures);
        Self { start: self.start, end: tail.end, captures }
    }
    pub fn len(&self) -> usize {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
    pub fn tokens(&self) -> Range<usize> {
        self.start..self.end
    }
    /// Captures bound to the given field, in match order.
    pub fn captured(&self, field: Field) -> impl Iterator<Item = &Capture> {
        self.captures.iter().filter(move |c| c.field == field)
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Eq(&'static str),
    Caseless(&'static str),
    /// Lemma equality, so any inflected form matches.
    Lemma(&'static str),
    /// Membership of a grammatical tag.
    Gram(&'static str),
    /// Lemma membership in a closed set.
    Dictionary(&'static [&'static str]),
    In(&'static [&'static str]),
    InCaseless(&'static [&'static str]),
    Kind(TokenKind),
    /// Length of the surface form in characters.
    Length(usize),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

fn caseless_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl Predicate {
    pub fn test(&self, token: &Token) -> bool {
        match self {
            Predicate::Eq(value) => token.text() == *value,
            Predicate::Caseless(value) => caseless_eq(token.text(), value),
            Predicate::Lemma(value) => token.lemma() == *value,
            Predicate::Gram(tag) => token.has_tag(tag),
            Predicate::Dictionary(lemmas) => lemmas.contains(&token.lemma()),
            Predicate::In(values) => values.contains(&token.text()),
            Predicate::InCaseless(values) => values.iter().any(|v| caseless_eq(token.text(), v)),
            Predicate::Kind(kind) => token.kind() == *kind,
            Predicate::Length(len) => token.text().chars().count() == *len,
            Predicate::All(predicates) => predicates.iter().all(|p| p.test(token)),
            Predicate::Any(predicates) => predicates.iter().any(|p| p.test(token)),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Token(Predicate),
    Seq(Vec<Rule>),
    /// Ordered alternation.
    Or(Vec<Rule>),
    Optional(Box<Rule>),
    /// One or more.
    Repeatable(Box<Rule>),
    Interpret { field: Field, binding: Binding, rule: Box<Rule> },
    /// Matches like the inner rule but drops every capture made inside it.
    Discard(Box<Rule>),
}

pub fn token(predicate: Predicate) -> Rule {
    Rule::Token(predicate)
}
pub fn eq(value: &'static str) -> Rule {
    Rule::Token(Predicate::Eq(value))
}
pub fn caseless(value: &'static str) -> Rule {
    Rule::Token(Predicate::Caseless(value))
}
pub fn lemma(value: &'static str) -> Rule {
    Rule::Token(Predicate::Lemma(value))
}
pub fn seq(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(rules.into_iter().collect())
}
pub fn or(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Or(rules.into_iter().collect())
}

impl Rule {
    pub fn optional(self) -> Rule {
        Rule::Optional(Box::new(self))
    }
    pub fn repeatable(self) -> Rule {
        Rule::Repeatable(Box::new(self))
    }
    pub fn interpret(self, field: Field, binding: Binding) -> Rule {
        Rule::Interpret { field, binding, rule: Box::new(self) }
    }
    pub fn discard(self) -> Rule {
        Rule::Discard(Box::new(self))
    }

    /// Every parse of this rule starting at `start`, in declaration order.
    pub fn parses(&self, tokens: &[Token], start: usize) -> Vec<Parse> {
        match self {
            Rule::Token(predicate) => match tokens.get(start) {
                Some(token) if predicate.test(token) => {
                    vec![Parse { start, end: start + 1, captures: Vec::new() }]
                }
                _ => Vec::new(),
            },
            Rule::Seq(rules) => {
                let mut frontier = vec![Parse::empty(start)];
                for rule in rules {
                    let mut next = Vec::new();
                    for head in &frontier {
                        for tail in rule.parses(tokens, head.end) {
                            next.push(head.joined(tail));
                        }
                    }
                    if next.is_empty() {
                        return next;
                    }
                    frontier = next;
                }
                frontier
            }
            Rule::Or(rules) => rules
                .iter()
                .flat_map(|rule| rule.parses(tokens, start))
                .collect(),
            Rule::Optional(rule) => {
                let mut parses = rule.parses(tokens, start);
                parses.push(Parse::empty(start));
                parses
            }
            Rule::Repeatable(rule) => repeat(rule, tokens, start),
            Rule::Interpret { field, binding, rule } => rule
                .parses(tokens, start)
                .into_iter()
                .map(|mut parse| {
                    parse.captures.push(Capture {
                        field: *field,
                        binding: *binding,
                        text: surface(&tokens[start..parse.end]),
                        tokens: start..parse.end,
                    });
                    parse
                })
                .collect(),
            Rule::Discard(rule) => rule
                .parses(tokens, start)
                .into_iter()
                .map(|mut parse| {
                    parse.captures.clear();
                    parse
                })
                .collect(),
        }
    }

    /// The longest non-empty parse at `start`; ties go to the earliest declared.
    pub fn best(&self, tokens: &[Token], start: usize) -> Option<Parse> {
        let mut best: Option<Parse> = None;
        for parse in self.parses(tokens, start) {
            if !parse.is_empty() && best.as_ref().is_none_or(|b| parse.end > b.end) {
                best = Some(parse);
            }
        }
        best
    }

    /// Best parses over the whole slice with overlaps resolved.
    pub fn find_all(&self, tokens: &[Token]) -> Vec<Parse> {
        let candidates = (0..tokens.len())
            .filter_map(|start| self.best(tokens, start))
            .collect();
        resolve_overlaps(candidates)
    }
}

// One or more, each repetition consuming at least one token. Extended a step
// at a time from a frontier, so the depth stays constant however long the run.
// Only the first parse reaching a given end is kept; an enclosing rule cannot
// tell two parses with the same end apart except by order.
fn repeat(rule: &Rule, tokens: &[Token], start: usize) -> Vec<Parse> {
    let mut reached = RoaringBitmap::new();
    let mut found: Vec<Parse> = Vec::new();
    let mut next = step(rule, tokens, &Parse::empty(start), &mut reached);
    while !next.is_empty() {
        let from = found.len();
        found.append(&mut next);
        for head in &found[from..] {
            next.extend(step(rule, tokens, head, &mut reached));
        }
    }
    // farthest first
    found.sort_by(|a, b| b.end.cmp(&a.end));
    found
}

fn step(rule: &Rule, tokens: &[Token], head: &Parse, reached: &mut RoaringBitmap) -> Vec<Parse> {
    rule.parses(tokens, head.end)
        .into_iter()
        .filter(|tail| !tail.is_empty() && reached.insert(tail.end as u32))
        .map(|tail| head.joined(tail))
        .collect()
}

fn surface(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect::<Vec<_>>().join(" ")
}

/// Keeps a non-overlapping subset of the candidates, longer spans first and
/// then earlier ones, and returns it ordered by position.
pub fn resolve_overlaps(mut candidates: Vec<Parse>) -> Vec<Parse> {
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));
    let mut claimed = RoaringBitmap::new();
    let mut accepted = Vec::new();
    for candidate in candidates {
        let span = candidate.start as u32..candidate.end as u32;
        if claimed.range_cardinality(span.clone()) == 0 {
            claimed.insert_range(span);
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|parse| parse.start);
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn number(text: &str) -> Result<u64> {
        Ok(text.len() as u64)
    }

    #[test]
    fn predicates() {
        let tokens = tokenize("USD 123 Доллар").unwrap();
        assert!(Predicate::Eq("USD").test(&tokens[0]));
        assert!(!Predicate::Eq("usd").test(&tokens[0]));
        assert!(Predicate::Caseless("usd").test(&tokens[0]));
        assert!(Predicate::Kind(TokenKind::Int).test(&tokens[1]));
        assert!(Predicate::Length(3).test(&tokens[1]));
        assert!(Predicate::Lemma("доллар").test(&tokens[2]));
        assert!(Predicate::InCaseless(&["доллар", "евро"]).test(&tokens[2]));
        assert!(!Predicate::In(&["доллар"]).test(&tokens[2]));
        assert!(Predicate::All(vec![Predicate::Kind(TokenKind::Int), Predicate::Length(3)]).test(&tokens[1]));
        assert!(!Predicate::Any(vec![Predicate::Gram("NUMR"), Predicate::Length(1)]).test(&tokens[1]));
    }

    #[test]
    fn longest_parse_wins_then_declaration_order() {
        let tokens = tokenize("a b c").unwrap();
        let rule = or([
            eq("a").interpret(Field::Coins, Binding::Const(Value::Number(1))),
            seq([eq("a"), eq("b")]).interpret(Field::Coins, Binding::Const(Value::Number(2))),
            seq([eq("a"), eq("b")]).interpret(Field::Coins, Binding::Const(Value::Number(3))),
        ]);
        let best = rule.best(&tokens, 0).unwrap();
        assert_eq!(best.end, 2);
        assert_eq!(best.captures[0].value().unwrap(), Value::Number(2));
    }

    #[test]
    fn optional_and_repeatable() {
        let tokens = tokenize("x x x y").unwrap();
        let rule = seq([eq("x").repeatable(), eq("y").optional()]);
        let ends: Vec<usize> = rule.parses(&tokens, 0).iter().map(|p| p.end).collect();
        assert_eq!(ends, vec![4, 3, 2, 1]);
        assert_eq!(rule.best(&tokens, 1).unwrap().end, 4);
        assert!(rule.best(&tokens, 3).is_none());
    }

    #[test]
    fn long_repetition_is_linear() {
        let text = "x ".repeat(100_000);
        let tokens = tokenize(&text).unwrap();
        let parses = eq("x").repeatable().parses(&tokens, 0);
        assert_eq!(parses.len(), 100_000);
        assert_eq!(parses[0].end, 100_000);
        assert_eq!(parses.last().unwrap().end, 1);
    }

    #[test]
    fn repetition_keeps_one_parse_per_end() {
        // "a b" is reachable as one step or as two
        let tokens = tokenize("a b a b").unwrap();
        let rule = or([seq([eq("a"), eq("b")]), eq("a"), eq("b")]).repeatable();
        let ends: Vec<usize> = rule.parses(&tokens, 0).iter().map(|p| p.end).collect();
        assert_eq!(ends, vec![4, 3, 2, 1]);
    }

    #[test]
    fn converted_capture_keeps_surface_text() {
        let tokens = tokenize("1 000").unwrap();
        let rule = seq([token(Predicate::Kind(TokenKind::Int)), token(Predicate::Kind(TokenKind::Int))])
            .interpret(Field::Integer, Binding::Convert(number));
        let parse = rule.best(&tokens, 0).unwrap();
        let capture = parse.captured(Field::Integer).next().unwrap();
        assert_eq!(capture.text, "1 000");
        assert_eq!(capture.tokens, 0..2);
        assert_eq!(capture.value().unwrap(), Value::Number(5));
    }

    #[test]
    fn discard_drops_inner_captures() {
        let tokens = tokenize("( 5 )").unwrap();
        let inner = token(Predicate::Kind(TokenKind::Int))
            .interpret(Field::Coins, Binding::Convert(number));
        let rule = seq([eq("("), inner, eq(")")]).discard();
        let parse = rule.best(&tokens, 0).unwrap();
        assert_eq!(parse.end, 3);
        assert!(parse.captures.is_empty());
    }

    #[test]
    fn overlaps_prefer_longer_then_earlier() {
        let tokens = tokenize("a b a b b").unwrap();
        let rule = or([seq([eq("b"), eq("b")]), seq([eq("a"), eq("b")]), eq("b")]);
        let spans: Vec<Range<usize>> = rule.find_all(&tokens).iter().map(Parse::tokens).collect();
        assert_eq!(spans, vec![0..2, 2..4, 4..5]);
    }
}
