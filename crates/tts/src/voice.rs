//! FPT.AI TTS voice identifiers.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Known FPT.AI voices.
///
/// Anything outside this set is carried through as [`Voice::Other`]; the
/// provider decides whether it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Voice {
    Banmai,    // Northern female
    Thuminh,   // Northern female
    Leminh,    // Northern male
    Myan,      // Central female
    Ngoclam,   // Central female
    Giahuy,    // Central male
    Lannhi,    // Southern female
    Linhsan,   // Southern female
    Minhquang, // Southern male
    /// Pass-through for identifiers outside the known set.
    Other(String),
}

impl Default for Voice {
    fn default() -> Self {
        Self::Banmai
    }
}

impl Voice {
    /// Identifier as sent in the `voice` request header.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Banmai    => "banmai",
            Self::Thuminh   => "thuminh",
            Self::Leminh    => "leminh",
            Self::Myan      => "myan",
            Self::Ngoclam   => "ngoclam",
            Self::Giahuy    => "giahuy",
            Self::Lannhi    => "lannhi",
            Self::Linhsan   => "linhsan",
            Self::Minhquang => "minhquang",
            Self::Other(s)  => s,
        }
    }

    /// The fixed set of known voices.
    pub fn known() -> &'static [Voice] {
        static KNOWN: [Voice; 9] = [
            Voice::Banmai,
            Voice::Thuminh,
            Voice::Leminh,
            Voice::Myan,
            Voice::Ngoclam,
            Voice::Giahuy,
            Voice::Lannhi,
            Voice::Linhsan,
            Voice::Minhquang,
        ];
        &KNOWN
    }
}

impl FromStr for Voice {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "banmai"    => Self::Banmai,
            "thuminh"   => Self::Thuminh,
            "leminh"    => Self::Leminh,
            "myan"      => Self::Myan,
            "ngoclam"   => Self::Ngoclam,
            "giahuy"    => Self::Giahuy,
            "lannhi"    => Self::Lannhi,
            "linhsan"   => Self::Linhsan,
            "minhquang" => Self::Minhquang,
            _           => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
