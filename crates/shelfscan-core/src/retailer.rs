//! The closed set of supported retailers and their market metadata.
//!
//! A retailer identifier is the storefront domain (`"amazon.de"`,
//! `"meds.se"`). Resolution happens once per run; anything outside the
//! registry is a configuration error, never a runtime fault.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Returned by [`market_country_for_domain`] when neither the domain nor its
/// top-level domain is known.
pub const UNKNOWN_MARKET: &str = "Unknown";

const DOMAIN_MARKETS: &[(&str, &str)] = &[
    ("amazon.de", "Germany"),
    ("amazon.com", "United States"),
    ("meds.se", "Sweden"),
    ("apotea.se", "Sweden"),
];

const TLD_MARKETS: &[(&str, &str)] = &[
    ("de", "Germany"),
    ("com", "United States"),
    ("se", "Sweden"),
];

/// Maps a storefront domain to the market country it serves.
///
/// Exact domains win; otherwise the top-level domain decides
/// (`"amazon.se"` → `"Sweden"`). Unrecognized domains map to
/// [`UNKNOWN_MARKET`].
#[must_use]
pub fn market_country_for_domain(domain: &str) -> &'static str {
    let domain = normalize_domain(domain);

    if let Some((_, market)) = DOMAIN_MARKETS.iter().find(|(d, _)| *d == domain) {
        return *market;
    }

    domain
        .rsplit('.')
        .next()
        .and_then(|tld| TLD_MARKETS.iter().find(|(t, _)| *t == tld))
        .map_or(UNKNOWN_MARKET, |(_, market)| *market)
}

/// Lowercases and strips scheme, `www.` and trailing slashes.
fn normalize_domain(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_owned()
}

/// Supported retailer storefronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetailerId {
    AmazonCom,
    AmazonDe,
    AmazonSe,
    Meds,
    Apotea,
}

impl RetailerId {
    pub const ALL: [RetailerId; 5] = [
        RetailerId::AmazonCom,
        RetailerId::AmazonDe,
        RetailerId::AmazonSe,
        RetailerId::Meds,
        RetailerId::Apotea,
    ];

    /// Storefront domain, which doubles as the retailer identifier.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            RetailerId::AmazonCom => "amazon.com",
            RetailerId::AmazonDe => "amazon.de",
            RetailerId::AmazonSe => "amazon.se",
            RetailerId::Meds => "meds.se",
            RetailerId::Apotea => "apotea.se",
        }
    }

    #[must_use]
    pub fn family(self) -> RetailerFamily {
        match self {
            RetailerId::AmazonCom | RetailerId::AmazonDe | RetailerId::AmazonSe => {
                RetailerFamily::Amazon
            }
            RetailerId::Meds => RetailerFamily::Meds,
            RetailerId::Apotea => RetailerFamily::Apotea,
        }
    }

    /// Base URL that relative links on this retailer's pages resolve against.
    ///
    /// Amazon storefronts use the bare domain; link resolution adds the
    /// `https://` scheme.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            RetailerId::AmazonCom => "amazon.com",
            RetailerId::AmazonDe => "amazon.de",
            RetailerId::AmazonSe => "amazon.se",
            RetailerId::Meds => "https://www.meds.se",
            RetailerId::Apotea => "https://www.apotea.se",
        }
    }

    /// Comma-separated list of every supported identifier, for error messages.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|r| r.domain())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for RetailerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.domain())
    }
}

impl FromStr for RetailerId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let domain = normalize_domain(s);
        Self::ALL
            .into_iter()
            .find(|r| r.domain() == domain)
            .ok_or_else(|| ConfigError::UnsupportedRetailer(s.trim().to_owned()))
    }
}

/// Retailers that share markup and therefore share a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetailerFamily {
    Amazon,
    Meds,
    Apotea,
}

impl std::fmt::Display for RetailerFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetailerFamily::Amazon => write!(f, "amazon"),
            RetailerFamily::Meds => write!(f, "meds"),
            RetailerFamily::Apotea => write!(f, "apotea"),
        }
    }
}

/// Immutable binding of a retailer to its market metadata, built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetailerProfile {
    pub retailer: RetailerId,
    pub family: RetailerFamily,
    pub market_country: &'static str,
    pub base_url: String,
}

impl RetailerProfile {
    #[must_use]
    pub fn for_retailer(retailer: RetailerId) -> Self {
        Self {
            retailer,
            family: retailer.family(),
            market_country: market_country_for_domain(retailer.domain()),
            base_url: retailer.base_url().to_owned(),
        }
    }

    /// Looks up `identifier` in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedRetailer`] for identifiers outside the
    /// supported set.
    pub fn resolve(identifier: &str) -> Result<Self, ConfigError> {
        identifier.parse::<RetailerId>().map(Self::for_retailer)
    }
}
