//! # Locale Tables
//!
//! Read-only lookup data shared by the validator and the formatter:
//!
//! - the currency allow-list (ISO 4217 codes the pipeline accepts)
//! - the currency → locale map ("format the way a native speaker of the
//!   currency's primary market expects")
//! - per-locale number, currency and date conventions
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "eur" ──uppercase──► CURRENCIES["EUR"] ──locale──► "de-DE"             │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                   LOCALES["de-DE"]: "1.234,50 €"        │
//! │                                                     "15. Jan. 2025"     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All tables are built once on first use and never mutated, so they are
//! shared across threads without locking.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Locale used when a currency has no entry in the table.
pub const FALLBACK_LOCALE: &str = "en-US";

// =============================================================================
// Currencies
// =============================================================================

/// Static description of a supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    /// Upper-case ISO 4217 code.
    pub code: &'static str,

    /// Locale of the currency's primary market.
    pub locale: &'static str,

    /// Symbol used inside `local_regions` ("$" for CAD in Canada).
    pub local_symbol: &'static str,

    /// Symbol used everywhere else ("CA$").
    pub symbol: &'static str,

    /// Regions (ISO 3166 alpha-2) where `local_symbol` applies.
    pub local_regions: &'static [&'static str],

    /// English plural display name ("US dollars").
    pub name: &'static str,

    /// Display names in other languages, keyed by language subtag.
    pub localized_names: &'static [(&'static str, &'static str)],
}

impl CurrencyInfo {
    /// Symbol appropriate for a locale in `region`.
    pub fn symbol_for_region(&self, region: &str) -> &'static str {
        if self.local_regions.iter().any(|r| r.eq_ignore_ascii_case(region)) {
            self.local_symbol
        } else {
            self.symbol
        }
    }

    /// Display name for `language`, falling back to English.
    pub fn name_for_language(&self, language: &str) -> &'static str {
        self.localized_names
            .iter()
            .find(|(lang, _)| lang.eq_ignore_ascii_case(language))
            .map(|(_, name)| *name)
            .unwrap_or(self.name)
    }
}

const EURO_REGIONS: &[&str] = &["DE", "AT", "BE", "ES", "FI", "FR", "IE", "IT", "NL", "PT"];

/// Every currency the pipeline accepts, in the order shown in hints.
pub static CURRENCY_TABLE: &[CurrencyInfo] = &[
    CurrencyInfo {
        code: "USD",
        locale: "en-US",
        local_symbol: "$",
        symbol: "$",
        local_regions: &["US"],
        name: "US dollars",
        localized_names: &[("de", "US-Dollar"), ("es", "dólares estadounidenses")],
    },
    CurrencyInfo {
        code: "EUR",
        locale: "de-DE",
        local_symbol: "€",
        symbol: "€",
        local_regions: EURO_REGIONS,
        name: "euros",
        localized_names: &[("de", "Euro"), ("fr", "euros"), ("es", "euros"), ("pt", "euros")],
    },
    CurrencyInfo {
        code: "GBP",
        locale: "en-GB",
        local_symbol: "£",
        symbol: "£",
        local_regions: &["GB"],
        name: "British pounds",
        localized_names: &[("de", "Britische Pfund")],
    },
    CurrencyInfo {
        code: "JPY",
        locale: "ja-JP",
        local_symbol: "￥",
        symbol: "¥",
        local_regions: &["JP"],
        name: "Japanese yen",
        localized_names: &[("ja", "円")],
    },
    CurrencyInfo {
        code: "CHF",
        locale: "de-CH",
        local_symbol: "CHF",
        symbol: "CHF",
        local_regions: &["CH"],
        name: "Swiss francs",
        localized_names: &[("de", "Schweizer Franken"), ("fr", "francs suisses")],
    },
    CurrencyInfo {
        code: "CAD",
        locale: "en-CA",
        local_symbol: "$",
        symbol: "CA$",
        local_regions: &["CA"],
        name: "Canadian dollars",
        localized_names: &[("fr", "dollars canadiens")],
    },
    CurrencyInfo {
        code: "AUD",
        locale: "en-AU",
        local_symbol: "$",
        symbol: "A$",
        local_regions: &["AU"],
        name: "Australian dollars",
        localized_names: &[],
    },
    CurrencyInfo {
        code: "NZD",
        locale: "en-NZ",
        local_symbol: "$",
        symbol: "NZ$",
        local_regions: &["NZ"],
        name: "New Zealand dollars",
        localized_names: &[],
    },
    CurrencyInfo {
        code: "CNY",
        locale: "zh-CN",
        local_symbol: "¥",
        symbol: "CN¥",
        local_regions: &["CN"],
        name: "Chinese yuan",
        localized_names: &[("zh", "人民币"), ("ja", "中国人民元")],
    },
    CurrencyInfo {
        code: "INR",
        locale: "en-IN",
        local_symbol: "₹",
        symbol: "₹",
        local_regions: &["IN"],
        name: "Indian rupees",
        localized_names: &[],
    },
    CurrencyInfo {
        code: "SEK",
        locale: "sv-SE",
        local_symbol: "kr",
        symbol: "SEK",
        local_regions: &["SE"],
        name: "Swedish kronor",
        localized_names: &[("sv", "svenska kronor")],
    },
    CurrencyInfo {
        code: "NOK",
        locale: "nb-NO",
        local_symbol: "kr",
        symbol: "NOK",
        local_regions: &["NO"],
        name: "Norwegian kroner",
        localized_names: &[("nb", "norske kroner")],
    },
    CurrencyInfo {
        code: "DKK",
        locale: "da-DK",
        local_symbol: "kr.",
        symbol: "DKK",
        local_regions: &["DK"],
        name: "Danish kroner",
        localized_names: &[("da", "danske kroner")],
    },
    CurrencyInfo {
        code: "PLN",
        locale: "pl-PL",
        local_symbol: "zł",
        symbol: "PLN",
        local_regions: &["PL"],
        name: "Polish zlotys",
        localized_names: &[("pl", "złotego")],
    },
    CurrencyInfo {
        code: "BRL",
        locale: "pt-BR",
        local_symbol: "R$",
        symbol: "R$",
        local_regions: &["BR"],
        name: "Brazilian reals",
        localized_names: &[("pt", "reais brasileiros")],
    },
    CurrencyInfo {
        code: "MXN",
        locale: "es-MX",
        local_symbol: "$",
        symbol: "MX$",
        local_regions: &["MX"],
        name: "Mexican pesos",
        localized_names: &[("es", "pesos mexicanos")],
    },
];

static CURRENCIES: Lazy<HashMap<&'static str, &'static CurrencyInfo>> =
    Lazy::new(|| CURRENCY_TABLE.iter().map(|c| (c.code, c)).collect());

/// Looks up a currency by code, case-insensitively.
pub fn currency(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.get(code.trim().to_ascii_uppercase().as_str()).copied()
}

/// Whether `code` is on the allow-list (case-insensitive).
///
/// ## Example
/// ```rust
/// use tally_core::locale::is_supported_currency;
///
/// assert!(is_supported_currency("EUR"));
/// assert!(is_supported_currency("chf"));
/// assert!(!is_supported_currency("XYZ"));
/// ```
pub fn is_supported_currency(code: &str) -> bool {
    currency(code).is_some()
}

/// The locale whose conventions apply to amounts in `currency`.
///
/// Unknown codes fall back to [`FALLBACK_LOCALE`].
///
/// ## Example
/// ```rust
/// use tally_core::locale::get_locale;
///
/// assert_eq!(get_locale("EUR"), "de-DE");
/// assert_eq!(get_locale("eur"), "de-DE");
/// assert_eq!(get_locale("XYZ"), "en-US");
/// ```
pub fn get_locale(currency_code: &str) -> &'static str {
    currency(currency_code)
        .map(|c| c.locale)
        .unwrap_or(FALLBACK_LOCALE)
}

/// Supported codes, in table order.
pub fn supported_currencies() -> impl Iterator<Item = &'static str> {
    CURRENCY_TABLE.iter().map(|c| c.code)
}

// =============================================================================
// Locales
// =============================================================================

/// Digit grouping style for the integer part of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Groups of three: 1,234,567.
    Standard,
    /// Last three, then groups of two: 12,34,567.
    Indian,
}

/// Where the currency goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPlacement {
    /// `$1.00`; a no-break space is inserted only when the symbol ends in a
    /// letter (`CHF 1.00`, `USD 1.00`).
    Prefix,
    /// Always separated by a no-break space: `R$ 1,00`.
    SpacedPrefix,
    /// After the number, separated by a no-break space: `1,00 €`.
    Suffix,
}

/// Number, currency and date conventions for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleData {
    /// BCP 47 tag, e.g. "de-DE".
    pub tag: &'static str,
    pub language: &'static str,
    pub region: &'static str,

    pub decimal: &'static str,
    pub group: &'static str,
    pub grouping: Grouping,

    /// Integer digits required before grouping kicks in beyond the first
    /// separator (2 in Polish: "1234" but "12 345").
    pub min_grouping_digits: usize,

    pub currency_placement: CurrencyPlacement,

    /// Date patterns; see [`crate::format::render_date`] for the tokens.
    pub date_short: &'static str,
    pub date_medium: &'static str,
    pub date_long: &'static str,

    pub months_abbr: &'static [&'static str; 12],
    pub months_full: &'static [&'static str; 12],
}

/// No-break space, used between amounts and currency symbols.
pub(crate) const NBSP: &str = "\u{a0}";

const EN_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const EN_FULL: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const DE_ABBR: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez.",
];
const DE_FULL: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const FR_ABBR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];
const FR_FULL: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const SV_ABBR: [&str; 12] = [
    "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.", "sep.", "okt.", "nov.", "dec.",
];
const SV_FULL: [&str; 12] = [
    "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti", "september",
    "oktober", "november", "december",
];
const NB_ABBR: [&str; 12] = [
    "jan.", "feb.", "mar.", "apr.", "mai", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.", "des.",
];
const NB_FULL: [&str; 12] = [
    "januar", "februar", "mars", "april", "mai", "juni", "juli", "august", "september",
    "oktober", "november", "desember",
];
const DA_ABBR: [&str; 12] = [
    "jan.", "feb.", "mar.", "apr.", "maj", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.", "dec.",
];
const DA_FULL: [&str; 12] = [
    "januar", "februar", "marts", "april", "maj", "juni", "juli", "august", "september",
    "oktober", "november", "december",
];
const PL_ABBR: [&str; 12] = [
    "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
];
// Genitive forms, as used in "15 stycznia 2025".
const PL_FULL: [&str; 12] = [
    "stycznia", "lutego", "marca", "kwietnia", "maja", "czerwca", "lipca", "sierpnia",
    "września", "października", "listopada", "grudnia",
];
const PT_ABBR: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];
const PT_FULL: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];
const ES_ABBR: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];
const ES_FULL: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];
// CJK locales only use numeric months; the names are what `{MMM}` would print.
const CJK_MONTHS: [&str; 12] = [
    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
];

// Shared English conventions; individual entries override tag, region and dates.
const ENGLISH: LocaleData = LocaleData {
    tag: "en-US",
    language: "en",
    region: "US",
    decimal: ".",
    group: ",",
    grouping: Grouping::Standard,
    min_grouping_digits: 1,
    currency_placement: CurrencyPlacement::Prefix,
    date_short: "{dd}/{MM}/{y}",
    date_medium: "{d} {MMM} {y}",
    date_long: "{d} {MMMM} {y}",
    months_abbr: &EN_ABBR,
    months_full: &EN_FULL,
};

/// Every locale with built-in data. The first entry per language is the one
/// a bare language tag ("de") resolves to.
pub static LOCALE_TABLE: &[LocaleData] = &[
    LocaleData {
        date_short: "{MM}/{dd}/{y}",
        date_medium: "{MMM} {d}, {y}",
        date_long: "{MMMM} {d}, {y}",
        ..ENGLISH
    },
    LocaleData {
        tag: "en-GB",
        region: "GB",
        ..ENGLISH
    },
    LocaleData {
        tag: "en-CA",
        region: "CA",
        date_short: "{y}-{MM}-{dd}",
        date_medium: "{MMM} {d}, {y}",
        date_long: "{MMMM} {d}, {y}",
        ..ENGLISH
    },
    LocaleData {
        tag: "en-AU",
        region: "AU",
        ..ENGLISH
    },
    LocaleData {
        tag: "en-NZ",
        region: "NZ",
        ..ENGLISH
    },
    LocaleData {
        tag: "en-IN",
        region: "IN",
        grouping: Grouping::Indian,
        ..ENGLISH
    },
    LocaleData {
        tag: "de-DE",
        language: "de",
        region: "DE",
        decimal: ",",
        group: ".",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Suffix,
        date_short: "{dd}.{MM}.{y}",
        date_medium: "{d}. {MMM} {y}",
        date_long: "{d}. {MMMM} {y}",
        months_abbr: &DE_ABBR,
        months_full: &DE_FULL,
    },
    LocaleData {
        tag: "de-CH",
        language: "de",
        region: "CH",
        decimal: ".",
        group: "’",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::SpacedPrefix,
        date_short: "{dd}.{MM}.{y}",
        date_medium: "{d}. {MMM} {y}",
        date_long: "{d}. {MMMM} {y}",
        months_abbr: &DE_ABBR,
        months_full: &DE_FULL,
    },
    LocaleData {
        tag: "fr-FR",
        language: "fr",
        region: "FR",
        decimal: ",",
        group: "\u{202f}",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Suffix,
        date_short: "{dd}/{MM}/{y}",
        date_medium: "{d} {MMM} {y}",
        date_long: "{d} {MMMM} {y}",
        months_abbr: &FR_ABBR,
        months_full: &FR_FULL,
    },
    LocaleData {
        tag: "ja-JP",
        language: "ja",
        region: "JP",
        decimal: ".",
        group: ",",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Prefix,
        date_short: "{y}/{MM}/{dd}",
        date_medium: "{y}年{M}月{d}日",
        date_long: "{y}年{M}月{d}日",
        months_abbr: &CJK_MONTHS,
        months_full: &CJK_MONTHS,
    },
    LocaleData {
        tag: "zh-CN",
        language: "zh",
        region: "CN",
        decimal: ".",
        group: ",",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Prefix,
        date_short: "{y}/{MM}/{dd}",
        date_medium: "{y}年{M}月{d}日",
        date_long: "{y}年{M}月{d}日",
        months_abbr: &CJK_MONTHS,
        months_full: &CJK_MONTHS,
    },
    LocaleData {
        tag: "sv-SE",
        language: "sv",
        region: "SE",
        decimal: ",",
        group: NBSP,
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Suffix,
        date_short: "{y}-{MM}-{dd}",
        date_medium: "{d} {MMM} {y}",
        date_long: "{d} {MMMM} {y}",
        months_abbr: &SV_ABBR,
        months_full: &SV_FULL,
    },
    LocaleData {
        tag: "nb-NO",
        language: "nb",
        region: "NO",
        decimal: ",",
        group: NBSP,
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Suffix,
        date_short: "{dd}.{MM}.{y}",
        date_medium: "{d}. {MMM} {y}",
        date_long: "{d}. {MMMM} {y}",
        months_abbr: &NB_ABBR,
        months_full: &NB_FULL,
    },
    LocaleData {
        tag: "da-DK",
        language: "da",
        region: "DK",
        decimal: ",",
        group: ".",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Suffix,
        date_short: "{dd}.{MM}.{y}",
        date_medium: "{d}. {MMM} {y}",
        date_long: "{d}. {MMMM} {y}",
        months_abbr: &DA_ABBR,
        months_full: &DA_FULL,
    },
    LocaleData {
        tag: "pl-PL",
        language: "pl",
        region: "PL",
        decimal: ",",
        group: NBSP,
        grouping: Grouping::Standard,
        min_grouping_digits: 2,
        currency_placement: CurrencyPlacement::Suffix,
        date_short: "{dd}.{MM}.{y}",
        date_medium: "{d} {MMM} {y}",
        date_long: "{d} {MMMM} {y}",
        months_abbr: &PL_ABBR,
        months_full: &PL_FULL,
    },
    LocaleData {
        tag: "pt-BR",
        language: "pt",
        region: "BR",
        decimal: ",",
        group: ".",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::SpacedPrefix,
        date_short: "{dd}/{MM}/{y}",
        date_medium: "{d} de {MMM} de {y}",
        date_long: "{d} de {MMMM} de {y}",
        months_abbr: &PT_ABBR,
        months_full: &PT_FULL,
    },
    LocaleData {
        tag: "es-MX",
        language: "es",
        region: "MX",
        decimal: ".",
        group: ",",
        grouping: Grouping::Standard,
        min_grouping_digits: 1,
        currency_placement: CurrencyPlacement::Prefix,
        date_short: "{dd}/{MM}/{y}",
        date_medium: "{d} {MMM} {y}",
        date_long: "{d} de {MMMM} de {y}",
        months_abbr: &ES_ABBR,
        months_full: &ES_FULL,
    },
];

static LOCALES: Lazy<HashMap<String, &'static LocaleData>> = Lazy::new(|| {
    LOCALE_TABLE
        .iter()
        .map(|l| (l.tag.to_ascii_lowercase(), l))
        .collect()
});

/// Resolves a locale tag to built-in data.
///
/// ## Resolution Order
/// 1. Exact tag, case-insensitive (`"DE-de"` → de-DE); `_` is accepted
///    in place of `-`
/// 2. First locale with the same language (`"de-AT"` → de-DE, `"fr"` → fr-FR)
/// 3. [`FALLBACK_LOCALE`]
pub fn resolve_locale(tag: &str) -> &'static LocaleData {
    let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();

    if let Some(data) = LOCALES.get(&normalized) {
        return data;
    }

    let language = normalized.split('-').next().unwrap_or_default();
    LOCALE_TABLE
        .iter()
        .find(|l| l.language == language)
        .unwrap_or_else(fallback_locale)
}

fn fallback_locale() -> &'static LocaleData {
    // LOCALE_TABLE[0] is en-US.
    &LOCALE_TABLE[0]
}

// =============================================================================
// Unit Tests
// =============================================================================
