//! Type pattern catalog
//!
//! Each declared field type maps to one compiled pattern. The lenient `url`
//! type prepends `http://` to values that carry no accepted scheme before
//! matching; `urlstrict` never does.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static ALPHANUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").unwrap());

static DATE_ISO_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})\D?(0[1-9]|1[0-2])\D?([12]\d|0[1-9]|3[01])$").unwrap()
});

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:(?:\d+|\d{1,3}(?:,\d{3})+)(?:\.\d+)?|\.\d+)$").unwrap()
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((\+\d{1,3}(-| )?\(?\d\)?(-| )?\d{1,5})|(\(?\d{2,6}\)?))(-| )?(\d{3,4})(-| )?(\d{4})(( x| ext)\d{1,5})?$",
    )
    .unwrap()
});

// URL validation regex
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?|s?ftp|git)://[^\s/$.?#][^\s]*$").unwrap()
});

static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?|s?ftp|git)://").unwrap());

/// Field types with a built-in pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeKind {
    Alphanum,
    DateIso,
    Digits,
    Email,
    Number,
    Phone,
    Url,
    UrlStrict,
}

impl TypeKind {
    pub const ALL: [TypeKind; 8] = [
        TypeKind::Alphanum,
        TypeKind::DateIso,
        TypeKind::Digits,
        TypeKind::Email,
        TypeKind::Number,
        TypeKind::Phone,
        TypeKind::Url,
        TypeKind::UrlStrict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Alphanum => "alphanum",
            TypeKind::DateIso => "dateIso",
            TypeKind::Digits => "digits",
            TypeKind::Email => "email",
            TypeKind::Number => "number",
            TypeKind::Phone => "phone",
            TypeKind::Url => "url",
            TypeKind::UrlStrict => "urlstrict",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            TypeKind::Alphanum => &*ALPHANUM_REGEX,
            TypeKind::DateIso => &*DATE_ISO_REGEX,
            TypeKind::Digits => &*DIGITS_REGEX,
            TypeKind::Email => &*EMAIL_REGEX,
            TypeKind::Number => &*NUMBER_REGEX,
            TypeKind::Phone => &*PHONE_REGEX,
            TypeKind::Url | TypeKind::UrlStrict => &*URL_REGEX,
        }
    }

    /// Test a value against this type's pattern
    ///
    /// The empty string never matches.
    pub fn matches(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        match self {
            TypeKind::Url if !has_scheme(value) => {
                self.regex().is_match(&format!("http://{}", value))
            }
            _ => self.regex().is_match(value),
        }
    }
}

/// Whether a value already starts with an accepted URL scheme
pub fn has_scheme(value: &str) -> bool {
    SCHEME_REGEX.is_match(value)
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
