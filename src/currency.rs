// used to look identifiers up from either side
use bimap::BiMap;
use lazy_static::lazy_static;
use serde::{Serialize, Serializer};

use std::fmt;
use std::str::FromStr;

use crate::error::KopeckError;

// Declares the closed enumeration together with its identifier registry, so
// that a variant can never be added without an identifier.
macro_rules! currencies {
    ( $( $(#[$doc:meta])* $variant:ident => $identifier:literal, )+ ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Currency {
            $( $(#[$doc])* $variant, )+
        }

        impl Currency {
            pub const ALL: &'static [Currency] = &[ $( Currency::$variant, )+ ];

            /// Stable identifier, e.g. `DOLLAR_USD` or `RUBLE_GEN`.
            pub fn identifier(self) -> &'static str {
                match self {
                    $( Currency::$variant => $identifier, )+
                }
            }
        }

        lazy_static! {
            static ref IDENTIFIERS: BiMap<Currency, &'static str> = {
                let mut identifiers = BiMap::new();
                $( identifiers.insert(Currency::$variant, $identifier); )+
                identifiers
            };
        }
    };
}

currencies! {
    /// Dollar with no issuing country.
    DollarGen => "DOLLAR_GEN",
    Usd => "DOLLAR_USD",
    Aud => "DOLLAR_AUD",
    Hkd => "DOLLAR_HKD",
    Cad => "DOLLAR_CAD",
    Sgd => "DOLLAR_SGD",

    Euro => "EUR",

    /// Pound with no issuing country.
    PoundGen => "POUND_GEN",
    /// Pound sterling.
    Gbp => "POUND_GBP",
    Egp => "POUND_EGP",

    CrownGen => "CROWN_GEN",
    Nok => "CROWN_NOK",
    Czk => "CROWN_CZK",
    Sek => "CROWN_SEK",
    Dkk => "CROWN_DKK",
    Isk => "CROWN_ISK",

    FrancGen => "FRANC_GEN",
    Chf => "FRANC_CHF",
    /// French franc, obsolete.
    Frf => "FRANC_FRF",

    LiraGen => "LIRA_GEN",
    Try => "LIRA_TRY",
    /// Italian lira, obsolete.
    Itl => "LIRA_ITL",

    Huf => "HUF",
    Pln => "PLN",

    RubleGen => "RUBLE_GEN",
    Rub => "RUBLE_RUB",
    Byn => "RUBLE_BYN",

    Uah => "UAH",
    Kzt => "KZT",
    Gel => "GEL",
    Amd => "AMD",
    Kgs => "KGS",
    Uzs => "UZS",
    Tjs => "TJS",

    LeiGen => "LEI_GEN",
    Mdl => "LEI_MDL",
    Ron => "LEI_RON",

    ManatGen => "MANAT_GEN",
    Azn => "MANAT_AZN",
    Tmt => "MANAT_TMT",

    Cny => "CNY",
    Jpy => "JPY",
    Thb => "THB",
    Vnd => "VND",
    Mnt => "MNT",
    Ils => "ILS",
    Zar => "ZAR",

    RupeeGen => "RUPEE_GEN",
    Inr => "RUPEE_INR",
    Pkr => "RUPEE_PKR",
    Idr => "RUPEE_IDR",

    Brl => "BRL",

    PesoGen => "PESO_GEN",
    Ars => "PESO_ARS",
    Mxn => "PESO_MXN",
    Cup => "PESO_CUP",
    Cop => "PESO_COP",
    Uyu => "PESO_UYU",
    Dop => "PESO_DOP",
    Clp => "PESO_CLP",
    Php => "PESO_PHP",

    Btc => "CRYPTO_BTC",
    Ltc => "CRYPTO_LTC",
    Eth => "CRYPTO_ETH",
}

impl Currency {
    /// True for the family fallbacks used when no issuing country is named.
    pub fn is_generic(self) -> bool {
        self.identifier().ends_with("_GEN")
    }

    /// The generic fallback of this currency's family, or the currency itself
    /// when it has no family (e.g. `EUR`, `HUF`, the crypto currencies).
    pub fn family(self) -> Currency {
        match self.identifier().split_once('_') {
            Some((family, _)) => IDENTIFIERS
                .get_by_right(format!("{family}_GEN").as_str())
                .copied()
                .unwrap_or(self),
            None => self,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for Currency {
    type Err = KopeckError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IDENTIFIERS
            .get_by_right(s)
            .copied()
            .ok_or_else(|| KopeckError::Invariant(format!("Unknown currency identifier: {s}")))
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_unique_and_round_trip() {
        assert_eq!(IDENTIFIERS.len(), Currency::ALL.len());
        for currency in Currency::ALL {
            let parsed: Currency = currency.identifier().parse().unwrap();
            assert_eq!(parsed, *currency);
        }
    }

    #[test]
    fn families() {
        assert_eq!(Currency::Usd.family(), Currency::DollarGen);
        assert_eq!(Currency::Gbp.family(), Currency::PoundGen);
        assert_eq!(Currency::RubleGen.family(), Currency::RubleGen);
        assert_eq!(Currency::Euro.family(), Currency::Euro);
        assert_eq!(Currency::Btc.family(), Currency::Btc);
        assert!(Currency::PesoGen.is_generic());
        assert!(!Currency::Cup.is_generic());
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        assert!("DOLLAR_XYZ".parse::<Currency>().is_err());
    }
}
