//! Kopeck – extraction of monetary amounts from Russian text.
//!
//! Kopeck recognizes expressions such as "100 рублей", "$100",
//! "5 долларов 50 центов" or "2 млн руб." in a stream of tagged tokens and
//! turns each one into a typed [`money::Money`] entity:
//! * an integer part, normalized from any of the admitted digit groupings;
//! * an optional fraction in hundredths ("10,5" reads as 10 and 50/100);
//! * an optional thousand/million/billion multiplier;
//! * exactly one canonical [`currency::Currency`] identifier;
//! * optional coins (kopecks, cents) in hundredths.
//!
//! The derived amount is available as a [`bigdecimal::BigDecimal`].
//!
//! ## Modules
//! * [`token`] – Tokens, the pest-based tokenizer and the [`token::Tagger`] seam
//!   through which lemmas and grammatical tags are supplied.
//! * [`pattern`] – Token predicates, rule composition, interpretation bindings
//!   and the backtracking matcher with overlap resolution.
//! * [`currency`] – The closed set of currency identifiers.
//! * [`lexicon`] – Currency surface forms: names with inflection, qualifiers,
//!   abbreviations, codes and symbols.
//! * [`numeral`] – Integers, fractions, multipliers, coins and bracketed
//!   spelled-out restatements.
//! * [`normalize`] – Pure conversions from captured text to field values.
//! * [`money`] – The entity, the composed grammar and the [`money::Extractor`].
//! * [`interface`] – Background and parallel batch extraction.
//! * [`settings`] / [`server`] – Configuration and the HTTP surface used by the binary.
//!
//! ## Precedence
//! Qualified currency names ("доллар США", "канадский доллар") and their bare
//! family noun ("доллар") are separate candidates. The matcher keeps the
//! longest one and breaks ties by declaration order, so the qualified form
//! always wins where it applies.
//!
//! ## Quick Start
//! ```
//! use kopeck::{Currency, Extractor};
//! let extractor = Extractor::builtin().unwrap();
//! let found = extractor.extract("Итого 5 долларов 50 центов").unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].money.currency(), Currency::DollarGen);
//! assert_eq!(found[0].money.amount().to_string(), "5.50");
//! ```

pub mod currency;
pub mod error;
pub mod interface;
pub mod lexicon;
pub mod money;
pub mod normalize;
pub mod numeral;
pub mod pattern;
pub mod server;
pub mod settings;
pub mod token;

pub use currency::Currency;
pub use error::{KopeckError, Result};
pub use money::{Extractor, Money, MoneyMatch};
