//! Status messages for display
//!
//! The decoder reports SECDED outcomes as [`SecdedStatus`] values. This
//! module turns them into user-facing text for a given [`Locale`]. The locale
//! is always an argument; there is no process-wide "current language".

use serde::{Deserialize, Serialize};

use crate::hamming::SecdedStatus;

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Zh,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Zh => write!(f, "zh"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => Err(format!("unknown locale '{}'", other)),
        }
    }
}

/// Render a SECDED status in the given locale.
pub fn status_message(status: &SecdedStatus, locale: Locale) -> String {
    match (locale, status) {
        (Locale::En, _) => status.to_string(),
        (Locale::Zh, SecdedStatus::NoError) => "未检测到错误".to_string(),
        (Locale::Zh, SecdedStatus::OverallParityError) => "总体校验位出错".to_string(),
        (Locale::Zh, SecdedStatus::Corrected { position }) => {
            format!("单比特纠正，位置 {}", position)
        }
        (Locale::Zh, SecdedStatus::DoubleError) => "检测到双比特错误（不可纠正）".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let corrected = SecdedStatus::Corrected { position: 6 };
        assert_eq!(status_message(&corrected, Locale::Zh), "单比特纠正，位置 6");
        assert_eq!(
            status_message(&corrected, Locale::En),
            "single-bit error corrected at position 6"
        );
        assert_eq!(status_message(&SecdedStatus::NoError, Locale::Zh), "未检测到错误");
    }

    #[test]
    fn test_parse_and_default() {
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(" zh ".parse::<Locale>(), Ok(Locale::Zh));
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::Zh);
        assert_eq!(format!("{}", Locale::En), "en");
    }
}
