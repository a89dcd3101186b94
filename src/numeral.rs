//! Numeral structure of an amount: grouped integers, decimal fractions,
//! thousand/million/billion multipliers, minor-unit coins and the optional
//! spelled-out restatement in brackets that often follows a figure in
//! contracts, e.g. "1 000 (одна тысяча) рублей".

use crate::lexicon;
use crate::normalize::{normalize_coins, normalize_fraction, normalize_integer};
use crate::pattern::{caseless, eq, lemma, or, seq, token, Binding, Field, Predicate, Rule, Value};
use crate::token::TokenKind;

pub const THOUSAND: u64 = 1_000;
pub const MILLION: u64 = 1_000_000;
pub const BILLION: u64 = 1_000_000_000;

const SEPARATORS: &[&str] = &[",", "."];
const BOUNDS: &[&str] = &["(", ")", "/"];
const MODIFIERS: &[&str] = &["целых", "сотых", "десятых"];
// lemmas some taggers do not mark as numerals
const NUMERAL_LEMMAS: &[&str] = &["ноль", "один"];

fn int() -> Rule {
    token(Predicate::Kind(TokenKind::Int))
}

// a 3-digit group following the leading digit run
fn group() -> Rule {
    token(Predicate::All(vec![Predicate::Kind(TokenKind::Int), Predicate::Length(3)]))
}

fn short_int() -> Rule {
    token(Predicate::All(vec![
        Predicate::Kind(TokenKind::Int),
        Predicate::Any(vec![Predicate::Length(1), Predicate::Length(2)]),
    ]))
}

fn separator() -> Rule {
    token(Predicate::In(SEPARATORS))
}

fn dot() -> Rule {
    eq(".")
}

fn thousand() -> Rule {
    or([
        seq([caseless("т"), dot()]),
        seq([caseless("тыс"), dot().optional()]),
        lemma("тысяча"),
    ])
}

fn million() -> Rule {
    or([seq([caseless("млн"), dot().optional()]), lemma("миллион")])
}

fn billion() -> Rule {
    or([seq([caseless("млрд"), dot().optional()]), lemma("миллиард")])
}

/// The five admitted digit grouping shapes.
pub fn integer() -> Rule {
    or([
        int(),
        seq([int(), group()]),
        seq([int(), group(), group()]),
        seq([int(), separator(), group()]),
        seq([int(), separator(), group(), separator(), group()]),
    ])
    .interpret(Field::Integer, Binding::Convert(normalize_integer))
}

pub fn fraction() -> Rule {
    short_int().interpret(Field::Fraction, Binding::Convert(normalize_fraction))
}

pub fn multiplier() -> Rule {
    let scale = |rule: Rule, factor: u64| {
        rule.interpret(Field::Multiplier, Binding::Const(Value::Number(factor)))
    };
    or([
        scale(billion(), BILLION),
        scale(million(), MILLION),
        scale(thousand(), THOUSAND),
    ])
}

pub fn coins() -> Rule {
    short_int().interpret(Field::Coins, Binding::Convert(normalize_coins))
}

/// A bracketed restatement of the amount in words. Accepted and discarded.
pub fn elaboration() -> Rule {
    let part = or([
        int(),
        token(Predicate::Gram("NUMR")),
        token(Predicate::Dictionary(NUMERAL_LEMMAS)),
        token(Predicate::InCaseless(MODIFIERS)),
        billion(),
        million(),
        thousand(),
        lexicon::currency(),
        lexicon::coins_currency(),
    ]);
    let bound = || token(Predicate::In(BOUNDS));
    seq([bound(), part.repeatable(), bound()]).discard()
}

fn figure() -> Vec<Rule> {
    vec![
        integer(),
        seq([separator(), fraction()]).optional(),
        multiplier().optional(),
    ]
}

/// Integer, optional fraction, optional multiplier, optional elaboration.
pub fn amount() -> Rule {
    let mut parts = figure();
    parts.push(elaboration().optional());
    Rule::Seq(parts)
}

/// The amount as it may follow a currency prefix: no elaboration.
pub fn prefixed_amount() -> Rule {
    Rule::Seq(figure())
}

pub fn coins_amount() -> Rule {
    seq([coins(), elaboration().optional()])
}
