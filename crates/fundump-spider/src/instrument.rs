use crate::{Result, SpiderError};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

//////////////////////////////////////////////////////////////////
// classifications
//////////////////////////////////////////////////////////////////

/// Market sector of a tracked stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sector {
    Financials,
    ConsumerStaples,
    ConsumerDiscretionary,
    Utilities,
    BasicMaterials,
    Industrials,
    Tech,
    Telecom,
    Healthcare,
    Energy,
    RealEstate,
}

impl Sector {
    pub const ALL: [Sector; 11] = [
        Sector::Financials,
        Sector::ConsumerStaples,
        Sector::ConsumerDiscretionary,
        Sector::Utilities,
        Sector::BasicMaterials,
        Sector::Industrials,
        Sector::Tech,
        Sector::Telecom,
        Sector::Healthcare,
        Sector::Energy,
        Sector::RealEstate,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Sector::Financials => "Financials",
            Sector::ConsumerStaples => "Consumer Staples",
            Sector::ConsumerDiscretionary => "Consumer Discretionary",
            Sector::Utilities => "Utilities",
            Sector::BasicMaterials => "Basic Materials",
            Sector::Industrials => "Industrials",
            Sector::Tech => "Tech",
            Sector::Telecom => "Telecom",
            Sector::Healthcare => "Healthcare",
            Sector::Energy => "Energy",
            Sector::RealEstate => "Real Estate",
        }
    }
}

/// Market capitalisation bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapClass {
    Small,
    Mid,
    Large,
}

impl CapClass {
    pub const ALL: [CapClass; 3] = [CapClass::Small, CapClass::Mid, CapClass::Large];

    fn as_str(&self) -> &'static str {
        match self {
            CapClass::Small => "Small",
            CapClass::Mid => "Mid",
            CapClass::Large => "Large",
        }
    }
}

/// Investment style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    Growth,
    Value,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Growth, Style::Value];

    fn as_str(&self) -> &'static str {
        match self {
            Style::Growth => "Growth",
            Style::Value => "Value",
        }
    }
}

// Each classification parses case-insensitively against its display form, and displays
// title-cased, e.g. "consumer discretionary" -> "Consumer Discretionary".
macro_rules! classification {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = SpiderError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|class| class.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| SpiderError::validation($kind, s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

classification!(Sector, "sector");
classification!(CapClass, "market cap");
classification!(Style, "stock type");

//////////////////////////////////////////////////////////////////
// instruments
//////////////////////////////////////////////////////////////////

/// One tracked security; immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instrument {
    symbol: String,
    sector: Sector,
    cap_class: CapClass,
    style: Style,
}

impl Instrument {
    /// Validate the classifications and uppercase the symbol.
    ///
    /// ```rust
    /// use fundump_spider::instrument::{Instrument, Sector};
    ///
    /// let amzn = Instrument::new("amzn", "consumer discretionary", "large", "growth").unwrap();
    /// assert_eq!(amzn.symbol(), "AMZN");
    /// assert_eq!(amzn.sector(), Sector::ConsumerDiscretionary);
    /// assert_eq!(amzn.sector().to_string(), "Consumer Discretionary");
    ///
    /// assert!(Instrument::new("amzn", "crypto", "large", "growth").is_err());
    /// ```
    pub fn new(symbol: &str, sector: &str, cap_class: &str, style: &str) -> Result<Self> {
        Ok(Self {
            symbol: symbol.trim().to_uppercase(),
            sector: sector.parse()?,
            cap_class: cap_class.parse()?,
            style: style.parse()?,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn sector(&self) -> Sector {
        self.sector
    }

    pub fn cap_class(&self) -> CapClass {
        self.cap_class
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

/// Ordered collection of the instruments tracked during one run.
///
/// The registry is assembled by the caller and handed to the table builder; there is
/// no removal, the set is fixed for the run.
#[derive(Debug, Default)]
pub struct Registry {
    instruments: Vec<Instrument>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an [Instrument] and append it, in call order.
    ///
    /// On failure the registry is left untouched.
    pub fn register(
        &mut self,
        symbol: &str,
        sector: &str,
        cap_class: &str,
        style: &str,
    ) -> Result<&Instrument> {
        let instrument = Instrument::new(symbol, sector, cap_class, style).map_err(|err| {
            error!("failed to register {symbol}, error({err})");
            err
        })?;
        debug!("registered {}", instrument.symbol());
        self.instruments.push(instrument);
        self.instruments
            .last()
            .ok_or_else(|| SpiderError::validation("symbol", symbol))
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifications_are_case_insensitive() {
        assert_eq!("REAL estate".parse::<Sector>().unwrap(), Sector::RealEstate);
        assert_eq!("Mid".parse::<CapClass>().unwrap(), CapClass::Mid);
        assert_eq!("value".parse::<Style>().unwrap(), Style::Value);
        assert_eq!(Sector::BasicMaterials.to_string(), "Basic Materials");
        assert_eq!(CapClass::Small.to_string(), "Small");
    }

    #[test]
    fn rejects_values_outside_closed_sets() {
        let err = Instrument::new("goog", "telecom", "mega", "growth").unwrap_err();
        assert_eq!(err.to_string(), "not eligible market cap: mega");

        let err = Instrument::new("goog", "telecom", "large", "momentum").unwrap_err();
        assert_eq!(err.to_string(), "not eligible stock type: momentum");

        let err = Instrument::new("goog", "space", "large", "growth").unwrap_err();
        assert!(matches!(err, SpiderError::Validation { kind: "sector", .. }));
    }

    #[test]
    fn registers_in_call_order() {
        let mut registry = Registry::new();
        registry.register("amzn", "consumer discretionary", "large", "growth").unwrap();
        registry.register("brk-b", "financials", "large", "value").unwrap();
        registry.register("ally", "Financials", "MID", "Value").unwrap();

        let symbols: Vec<&str> = registry.iter().map(|i| i.symbol()).collect();
        assert_eq!(symbols, vec!["AMZN", "BRK-B", "ALLY"]);
        assert_eq!(registry.instruments()[2].cap_class(), CapClass::Mid);
    }

    #[test]
    fn register_returns_the_new_instrument() {
        let mut registry = Registry::new();
        registry.register("amzn", "consumer discretionary", "large", "growth").unwrap();

        let goog = registry.register("goog", "telecom", "large", "growth").unwrap();
        assert_eq!(goog.symbol(), "GOOG");
        assert_eq!(goog.sector(), Sector::Telecom);
    }

    #[test]
    fn failed_registration_leaves_registry_unchanged() {
        let mut registry = Registry::new();
        registry.register("aapl", "tech", "large", "value").unwrap();

        assert!(registry.register("xyz", "tech", "huge", "value").is_err());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.instruments()[0].symbol(), "AAPL");
    }
}
