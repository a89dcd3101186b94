//! The currency lexicon.
//!
//! Each currency is one alternative emitting its constant identifier. Family
//! fallbacks (`DOLLAR_GEN`, `RUBLE_GEN`, ...) are declared as alternatives of
//! their own next to the qualified forms, so "доллар США" yields both a one
//! token `DOLLAR_GEN` candidate and a two token `DOLLAR_USD` one and the longer
//! qualified candidate wins.
//!
//! A few bare codes are deliberately not recognized because they collide with
//! ordinary tokens: `AMD`, `CUP` and `COP` are only reachable through their
//! names.

use lazy_static::lazy_static;

use crate::currency::Currency;
use crate::pattern::{caseless, eq, lemma, or, seq, token, Binding, Field, Predicate, Rule, Value};
use crate::token::Token;

/// Irregular forms of "лей", matched on the surface instead of by lemma.
pub const LEI_FORMS: &[&str] = &[
    "лей", "лея", "лею", "леем", "лее", "леи", "леев", "леям", "леями", "леях",
];

lazy_static! {
    static ref CURRENCY: Rule = currency();
}

fn emit(code: Currency, rule: Rule) -> Rule {
    rule.interpret(Field::Currency, Binding::Const(Value::Currency(code)))
}

fn dot() -> Rule {
    eq(".")
}

fn lei() -> Rule {
    token(Predicate::InCaseless(LEI_FORMS))
}

// "руб", "р" with an optional trailing dot
fn ruble_abbreviation() -> Rule {
    seq([or([caseless("руб"), caseless("р")]), dot().optional()])
}

fn dollars() -> Vec<Rule> {
    vec![
        emit(Currency::DollarGen, or([lemma("доллар"), eq("$")])),
        emit(
            Currency::Usd,
            or([
                seq([lemma("доллар"), eq("США")]),
                seq([lemma("американский"), lemma("доллар")]),
                caseless("USD"),
            ]),
        ),
        emit(Currency::Aud, or([seq([lemma("австралийский"), lemma("доллар")]), eq("AUD")])),
        emit(Currency::Hkd, or([seq([lemma("гонконгский"), lemma("доллар")]), eq("HKD")])),
        emit(Currency::Cad, or([seq([lemma("канадский"), lemma("доллар")]), eq("CAD")])),
        emit(Currency::Sgd, or([seq([lemma("сингапурский"), lemma("доллар")]), eq("SGD")])),
    ]
}

fn pounds() -> Vec<Rule> {
    let british = || or([lemma("британский"), lemma("английский")]);
    vec![
        emit(Currency::PoundGen, lemma("фунт")),
        emit(
            Currency::Gbp,
            or([
                seq([british().optional(), lemma("фунт"), caseless("стерлингов")]),
                seq([british(), lemma("фунт")]),
                eq("£"),
                eq("GBP"),
            ]),
        ),
        emit(Currency::Egp, or([seq([lemma("египетский"), lemma("фунт")]), eq("EGP")])),
    ]
}

fn crowns() -> Vec<Rule> {
    vec![
        emit(Currency::CrownGen, lemma("крона")),
        emit(Currency::Nok, or([seq([lemma("норвежский"), lemma("крона")]), eq("NOK")])),
        emit(Currency::Czk, or([seq([lemma("чешский"), lemma("крона")]), eq("CZK")])),
        emit(Currency::Sek, or([seq([lemma("шведский"), lemma("крона")]), eq("SEK")])),
        emit(Currency::Dkk, or([seq([lemma("датский"), lemma("крона")]), eq("DKK")])),
        emit(Currency::Isk, or([seq([lemma("исландский"), lemma("крона")]), eq("ISK")])),
    ]
}

fn francs_and_liras() -> Vec<Rule> {
    vec![
        emit(Currency::FrancGen, lemma("франк")),
        emit(Currency::Chf, or([seq([lemma("швейцарский"), lemma("франк")]), eq("CHF")])),
        emit(Currency::Frf, seq([lemma("французский"), lemma("франк")])),
        emit(Currency::LiraGen, lemma("лира")),
        emit(Currency::Try, or([seq([lemma("турецкий"), lemma("лира")]), eq("TRY")])),
        emit(Currency::Itl, seq([lemma("итальянский"), lemma("лира")])),
        emit(Currency::Huf, or([seq([lemma("венгерский").optional(), lemma("форинт")]), eq("HUF")])),
        emit(Currency::Pln, or([seq([lemma("польский").optional(), lemma("злотый")]), eq("PLN")])),
    ]
}

fn rubles() -> Vec<Rule> {
    vec![
        emit(Currency::RubleGen, or([lemma("рубль"), ruble_abbreviation()])),
        emit(
            Currency::Rub,
            or([
                seq([lemma("российский"), lemma("рубль")]),
                seq([lemma("российский"), ruble_abbreviation()]),
                eq("₽"),
                eq("RUB"),
                eq("RUR"),
            ]),
        ),
        emit(
            Currency::Byn,
            or([
                seq([lemma("белорусский"), lemma("рубль")]),
                seq([lemma("белорусский"), ruble_abbreviation()]),
                eq("BYN"),
            ]),
        ),
    ]
}

// Former Soviet republics. The qualifier is optional, the noun alone is
// already unambiguous.
fn post_soviet() -> Vec<Rule> {
    vec![
        emit(
            Currency::Uah,
            or([
                seq([lemma("украинский").optional(), lemma("гривна")]),
                seq([caseless("грн"), dot().optional()]),
                eq("UAH"),
            ]),
        ),
        emit(Currency::Kzt, or([seq([lemma("казахский").optional(), lemma("тенге")]), eq("KZT")])),
        emit(Currency::Gel, or([seq([lemma("грузинский").optional(), lemma("лари")]), eq("GEL")])),
        // no bare "AMD"
        emit(Currency::Amd, seq([lemma("армянский").optional(), lemma("драм")])),
        emit(Currency::Kgs, or([seq([lemma("киргизский").optional(), lemma("сом")]), eq("KGS")])),
        emit(Currency::Uzs, or([seq([lemma("узбекский").optional(), lemma("сум")]), eq("UZS")])),
        emit(Currency::Tjs, or([seq([lemma("таджикский").optional(), lemma("сомони")]), eq("TJS")])),
        emit(Currency::LeiGen, lei()),
        emit(Currency::Mdl, or([seq([lemma("молдавский"), lei()]), eq("MDL")])),
        emit(Currency::Ron, or([seq([lemma("румынский"), lei()]), eq("RON")])),
        emit(Currency::ManatGen, lemma("манат")),
        emit(Currency::Azn, or([seq([lemma("азербайджанский"), lemma("манат")]), eq("AZN")])),
        emit(
            Currency::Tmt,
            or([
                seq([lemma("новый").optional(), lemma("туркменский"), lemma("манат")]),
                seq([lemma("новый"), lemma("манат")]),
                eq("TMT"),
            ]),
        ),
    ]
}

fn asian_and_other() -> Vec<Rule> {
    vec![
        emit(Currency::Cny, or([seq([lemma("китайский").optional(), lemma("юань")]), eq("CNY")])),
        emit(
            Currency::Jpy,
            or([
                seq([lemma("японский").optional(), or([lemma("иена"), lemma("йена")])]),
                eq("JPY"),
            ]),
        ),
        emit(
            Currency::Thb,
            or([
                seq([
                    or([lemma("таиландский"), lemma("тайландский"), lemma("тайский")]).optional(),
                    lemma("бат"),
                ]),
                eq("THB"),
            ]),
        ),
        emit(Currency::Vnd, or([seq([lemma("вьетнамский").optional(), lemma("донг")]), eq("VND")])),
        emit(Currency::Mnt, or([seq([lemma("монгольский").optional(), lemma("тугрик")]), eq("MNT")])),
        emit(Currency::Ils, or([seq([lemma("израильский").optional(), lemma("шекель")]), eq("ILS")])),
        emit(Currency::Zar, or([seq([lemma("южноафриканский").optional(), lemma("рэнд")]), eq("ZAR")])),
        emit(Currency::RupeeGen, lemma("рупия")),
        emit(Currency::Inr, or([seq([lemma("индийский"), lemma("рупия")]), eq("INR")])),
        emit(Currency::Pkr, or([seq([lemma("пакистанский"), lemma("рупия")]), eq("PKR")])),
        emit(Currency::Idr, or([seq([lemma("индонезийский"), lemma("рупия")]), eq("IDR")])),
        emit(Currency::Brl, or([seq([lemma("бразильский").optional(), lemma("реал")]), eq("BRL")])),
    ]
}

fn pesos() -> Vec<Rule> {
    let peso = || caseless("песо");
    vec![
        emit(Currency::PesoGen, peso()),
        emit(Currency::Ars, or([seq([lemma("аргентинский"), peso()]), eq("ARS")])),
        emit(Currency::Mxn, or([seq([lemma("мексиканский"), peso()]), eq("MXN")])),
        // no bare "CUP" or "COP"
        emit(Currency::Cup, seq([lemma("кубинский"), peso()])),
        emit(Currency::Cop, seq([lemma("колумбийский"), peso()])),
        emit(Currency::Uyu, or([seq([lemma("уругвайский"), peso()]), eq("UYU")])),
        emit(Currency::Dop, or([seq([lemma("доминиканский"), peso()]), eq("DOP")])),
        emit(Currency::Clp, or([seq([lemma("чилийский"), peso()]), eq("CLP")])),
        emit(Currency::Php, or([seq([lemma("филиппинский"), peso()]), eq("PHP")])),
    ]
}

fn crypto() -> Vec<Rule> {
    vec![
        emit(Currency::Btc, or([lemma("биткоин"), lemma("биткойн"), eq("BTC"), eq("₿")])),
        emit(Currency::Ltc, or([lemma("лайткоин"), lemma("лайткойн"), eq("LTC")])),
        emit(Currency::Eth, or([lemma("эфириум"), eq("ETH")])),
    ]
}

/// Every currency form, binding the currency field.
pub fn currency() -> Rule {
    let mut alternatives = dollars();
    alternatives.push(emit(Currency::Euro, or([lemma("евро"), eq("€"), eq("EUR")])));
    alternatives.extend(pounds());
    alternatives.extend(crowns());
    alternatives.extend(francs_and_liras());
    alternatives.extend(rubles());
    alternatives.extend(post_soviet());
    alternatives.extend(asian_and_other());
    alternatives.extend(pesos());
    alternatives.extend(crypto());
    Rule::Or(alternatives)
}

/// The forms allowed in front of an amount: dollar, euro and pound by symbol
/// or code.
pub fn currency_prefix() -> Rule {
    or([
        emit(Currency::DollarGen, eq("$")),
        emit(Currency::Usd, caseless("USD")),
        emit(Currency::Euro, or([eq("€"), eq("EUR")])),
        emit(Currency::Gbp, or([eq("£"), eq("GBP")])),
    ])
}

/// Minor unit names: kopeck, cent and eurocent. Binds nothing.
pub fn coins_currency() -> Rule {
    or([
        lemma("копейка"),
        seq([or([caseless("коп"), caseless("к")]), dot().optional()]),
        or([lemma("цент"), eq("¢")]),
        lemma("евроцент"),
    ])
}

/// The identifier denoted by the whole token slice, if it is a currency form.
pub fn canonicalize(tokens: &[Token]) -> Option<Currency> {
    let parse = CURRENCY.best(tokens, 0)?;
    if parse.end != tokens.len() {
        return None;
    }
    parse.captured(Field::Currency).find_map(|capture| match capture.value() {
        Ok(Value::Currency(code)) => Some(code),
        _ => None,
    })
}
