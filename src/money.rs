//! Money entities and the composed grammar producing them.
//!
//! Two surface shapes are admitted:
//! * amount first: `100 рублей`, `5 долларов 50 центов`, `2 млн руб.`,
//!   `1 000 (одна тысяча) евро`;
//! * currency prefixed, for the dollar, euro and pound symbols and codes only:
//!   `$100`, `EUR 10,5`. No coins may follow this shape.
//!
//! The grammar is built once and shared read-only by every [`Extractor`].

use std::fmt;
use std::ops::Range;

use bigdecimal::BigDecimal;
use lazy_static::lazy_static;
use tracing::{debug, warn};

use crate::currency::Currency;
use crate::error::{KopeckError, Result};
use crate::lexicon;
use crate::numeral;
use crate::pattern::{or, seq, Field, Parse, Rule, Value};
use crate::token::{tokenize, DictionaryTagger, Tagger, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money {
    integer: u64,
    fraction: Option<u32>,
    multiplier: Option<u64>,
    currency: Currency,
    coins: Option<u32>,
}

fn hundredths(n: u32) -> BigDecimal {
    BigDecimal::new(i64::from(n).into(), 2)
}

impl Money {
    pub fn new(integer: u64, currency: Currency) -> Self {
        Self { integer, fraction: None, multiplier: None, currency, coins: None }
    }
    pub fn with_fraction(mut self, fraction: u32) -> Self {
        self.fraction = Some(fraction);
        self
    }
    pub fn with_multiplier(mut self, multiplier: u64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
    pub fn with_coins(mut self, coins: u32) -> Self {
        self.coins = Some(coins);
        self
    }
    pub fn integer(&self) -> u64 {
        self.integer
    }
    /// Hundredths of the main unit.
    pub fn fraction(&self) -> Option<u32> {
        self.fraction
    }
    pub fn multiplier(&self) -> Option<u64> {
        self.multiplier
    }
    pub fn currency(&self) -> Currency {
        self.currency
    }
    /// Minor units, hundredths of the main unit.
    pub fn coins(&self) -> Option<u32> {
        self.coins
    }

    /// `(integer + fraction/100) * multiplier + coins/100`, skipping absent parts.
    ///
    /// Fraction and coins are simply added when both are present; the grammar
    /// never produces such an entity.
    pub fn amount(&self) -> BigDecimal {
        let mut amount = BigDecimal::from(self.integer);
        if let Some(fraction) = self.fraction {
            amount = amount + hundredths(fraction);
        }
        if let Some(multiplier) = self.multiplier {
            amount = amount * BigDecimal::from(multiplier);
        }
        if let Some(coins) = self.coins {
            amount = amount + hundredths(coins);
        }
        amount
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.amount(), self.currency)
    }
}

fn assign<V>(slot: &mut Option<V>, value: V, field: Field) -> Result<()> {
    if slot.is_some() {
        return Err(KopeckError::Invariant(format!("{field} bound more than once")));
    }
    *slot = Some(value);
    Ok(())
}

fn narrow(n: u64, field: Field) -> Result<u32> {
    u32::try_from(n).map_err(|_| KopeckError::Parse { field, text: n.to_string() })
}

impl TryFrom<&Parse> for Money {
    type Error = KopeckError;

    fn try_from(parse: &Parse) -> Result<Self> {
        let mut integer = None;
        let mut fraction = None;
        let mut multiplier = None;
        let mut currency = None;
        let mut coins = None;
        for capture in &parse.captures {
            match (capture.field, capture.value()?) {
                (Field::Integer, Value::Number(n)) => assign(&mut integer, n, Field::Integer)?,
                (Field::Fraction, Value::Number(n)) => {
                    assign(&mut fraction, narrow(n, Field::Fraction)?, Field::Fraction)?
                }
                (Field::Multiplier, Value::Number(n)) => {
                    assign(&mut multiplier, n, Field::Multiplier)?
                }
                (Field::Currency, Value::Currency(code)) => {
                    assign(&mut currency, code, Field::Currency)?
                }
                (Field::Coins, Value::Number(n)) => {
                    assign(&mut coins, narrow(n, Field::Coins)?, Field::Coins)?
                }
                (field, value) => {
                    return Err(KopeckError::Invariant(format!("{field} cannot hold {value:?}")));
                }
            }
        }
        let integer = integer.ok_or_else(|| KopeckError::Invariant("match without integer".into()))?;
        let currency = currency.ok_or_else(|| KopeckError::Invariant("match without currency".into()))?;
        Ok(Money { integer, fraction, multiplier, currency, coins })
    }
}

/// The composed money grammar.
#[derive(Debug)]
pub struct Grammar {
    money: Rule,
}

lazy_static! {
    static ref GRAMMAR: Grammar = Grammar::new();
}

/// The process-wide grammar, built on first use.
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

impl Grammar {
    fn new() -> Self {
        let amount_first = seq([
            numeral::amount(),
            lexicon::currency(),
            numeral::coins_amount().optional(),
            lexicon::coins_currency().optional(),
        ]);
        let currency_prefixed = seq([lexicon::currency_prefix(), numeral::prefixed_amount()]);
        Self { money: or([amount_first, currency_prefixed]) }
    }
    pub fn rule(&self) -> &Rule {
        &self.money
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyMatch {
    /// Token positions covered by the match.
    pub tokens: Range<usize>,
    /// Byte offsets in the source text.
    pub bytes: Range<usize>,
    pub money: Money,
}

pub struct Extractor<T: Tagger = DictionaryTagger> {
    grammar: &'static Grammar,
    tagger: T,
}

impl Extractor<DictionaryTagger> {
    /// An extractor using the embedded dictionary.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(DictionaryTagger::builtin()?))
    }
}

impl<T: Tagger> Extractor<T> {
    pub fn new(tagger: T) -> Self {
        Self { grammar: grammar(), tagger }
    }
    pub fn tagger(&self) -> &T {
        &self.tagger
    }

    pub fn extract(&self, text: &str) -> Result<Vec<MoneyMatch>> {
        let tokens = self.tagger.tag(tokenize(text)?);
        Ok(self.extract_tokens(&tokens))
    }

    /// Matches over already tagged tokens. Candidates whose text does not
    /// convert are logged and skipped.
    pub fn extract_tokens(&self, tokens: &[Token]) -> Vec<MoneyMatch> {
        let mut matches = Vec::new();
        for parse in self.grammar.money.find_all(tokens) {
            match Money::try_from(&parse) {
                Ok(money) => {
                    let bytes = tokens[parse.start].bytes().start..tokens[parse.end - 1].bytes().end;
                    debug!(tokens = ?parse.tokens(), %money, "money matched");
                    matches.push(MoneyMatch { tokens: parse.tokens(), bytes, money });
                }
                Err(e) => {
                    warn!(error = %e, tokens = ?parse.tokens(), "skipping money candidate");
                }
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn amount_derivation() {
        assert_eq!(Money::new(100, Currency::RubleGen).amount(), decimal("100"));
        assert_eq!(
            Money::new(2, Currency::RubleGen).with_multiplier(1_000_000).amount(),
            decimal("2000000")
        );
        assert_eq!(Money::new(5, Currency::Euro).with_fraction(50).amount(), decimal("5.5"));
        assert_eq!(Money::new(10, Currency::DollarGen).with_coins(50).amount(), decimal("10.5"));
        assert_eq!(
            Money::new(1, Currency::Euro).with_fraction(5).with_multiplier(1_000).amount(),
            decimal("1050")
        );
    }

    #[test]
    fn fraction_and_coins_are_both_added() {
        let money = Money::new(1, Currency::Euro).with_fraction(50).with_coins(25);
        assert_eq!(money.amount(), decimal("1.75"));
    }

    #[test]
    fn display() {
        let money = Money::new(5, Currency::DollarGen).with_coins(50);
        assert_eq!(money.to_string(), "5.50 DOLLAR_GEN");
    }
}
