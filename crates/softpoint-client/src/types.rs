//! Wire and domain types for the Softpoint directory API.

use secrecy::{ExposeSecret, SecretString};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Flag image CDN, keyed by the catalog's ISO country key.
const FLAG_CDN_BASE: &str = "https://flagsapi.com";

/// Country name the form prefers as its default selection.
pub const DEFAULT_COUNTRY_NAME: &str = "United States";

/// A country in the remote directory.
///
/// Immutable once fetched. `country_key` is the key the catalog maps the
/// record under (the provider's ISO key, also used for flag lookup), while
/// `id` is the opaque identifier submissions must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    pub calling_code: String,
    /// Exact digit count a valid local phone number must have.
    pub phone_length: usize,
    pub country_key: String,
}

impl Country {
    /// URL of this country's flag image on the third-party CDN.
    pub fn flag_url(&self) -> String {
        format!("{}/{}/flat/32.png", FLAG_CDN_BASE, self.country_key)
    }
}

/// Catalog entry as served by `GET /challenges/countries` (map value).
///
/// The sandbox serves `phone_length` as a JSON string; accept either form.
#[derive(Debug, Clone, Deserialize)]
struct CountryRecord {
    id: String,
    name: String,
    calling_code: String,
    #[serde(deserialize_with = "de_phone_length")]
    phone_length: usize,
}

fn de_phone_length<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n as usize),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid phone_length: {:?}", s))),
    }
}

/// The full set of countries fetched from the remote directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    countries: HashMap<String, Country>,
}

impl Catalog {
    /// Build a catalog from domain records, keyed by `country_key`.
    pub fn from_countries(countries: impl IntoIterator<Item = Country>) -> Self {
        Self {
            countries: countries
                .into_iter()
                .map(|c| (c.country_key.clone(), c))
                .collect(),
        }
    }

    /// Look up a country by its catalog key.
    pub fn get(&self, country_key: &str) -> Option<&Country> {
        self.countries.get(country_key)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// All countries, sorted by display name.
    pub fn sorted_by_name(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = self.countries.values().cloned().collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }

    /// The catalog's default selection (see [`default_country`]).
    pub fn default_country(&self) -> Option<Country> {
        default_country(&self.sorted_by_name())
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = HashMap::<String, CountryRecord>::deserialize(deserializer)?;
        Ok(Self::from_countries(records.into_iter().map(
            |(key, record)| Country {
                id: record.id,
                name: record.name,
                calling_code: record.calling_code,
                phone_length: record.phone_length,
                country_key: key,
            },
        )))
    }
}

/// Default selection rule over a name-sorted country list: prefer
/// "United States", fall back to the first entry.
pub fn default_country(sorted: &[Country]) -> Option<Country> {
    sorted
        .iter()
        .find(|c| c.name == DEFAULT_COUNTRY_NAME)
        .or_else(|| sorted.first())
        .cloned()
}

/// Response body of `POST /access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Access token issued by `POST /access_token`.
///
/// Wrapped in `SecretString` so the raw value stays out of Debug output
/// and logs.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::new(raw.into()))
    }

    /// The raw token value, for the `Authorization` header.
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Body of `POST /challenges/two_factor_auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Digits-only phone number.
    pub phone_number: String,
    /// Opaque country id from the catalog.
    pub country_id: String,
}
