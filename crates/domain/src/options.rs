use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Frame style applied to every uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresentationType {
    FullPolaroid,
    HalfPolaroid,
    QuarterPolaroid,
    InstaSquared,
    FullPolaroidCompact,
    HalfPolaroidCompact,
    QuarterPolaroidCompact,
    InstaSquaredCompact,
}

impl PresentationType {
    pub const ALL: [PresentationType; 8] = [
        Self::FullPolaroid,
        Self::HalfPolaroid,
        Self::QuarterPolaroid,
        Self::InstaSquared,
        Self::FullPolaroidCompact,
        Self::HalfPolaroidCompact,
        Self::QuarterPolaroidCompact,
        Self::InstaSquaredCompact,
    ];

    /// Short token used by option controls and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Self::FullPolaroid => "F",
            Self::HalfPolaroid => "H",
            Self::QuarterPolaroid => "Q",
            Self::InstaSquared => "IS",
            Self::FullPolaroidCompact => "FC",
            Self::HalfPolaroidCompact => "HC",
            Self::QuarterPolaroidCompact => "QC",
            Self::InstaSquaredCompact => "ISC",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FullPolaroid => "FULL_POLAROID",
            Self::HalfPolaroid => "HALF_POLAROID",
            Self::QuarterPolaroid => "QUARTER_POLAROID",
            Self::InstaSquared => "INSTA_SQUARED",
            Self::FullPolaroidCompact => "FULL_POLAROID_COMPACT",
            Self::HalfPolaroidCompact => "HALF_POLAROID_COMPACT",
            Self::QuarterPolaroidCompact => "QUARTER_POLAROID_COMPACT",
            Self::InstaSquaredCompact => "INSTA_SQUARED_COMPACT",
        }
    }

    /// Display text shown next to the option control, lowercase like the option cards.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::FullPolaroid => "full polaroid",
            Self::HalfPolaroid => "half polaroid",
            Self::QuarterPolaroid => "quarter polaroid",
            Self::InstaSquared => "insta squared",
            Self::FullPolaroidCompact => "full polaroid compact",
            Self::HalfPolaroidCompact => "half polaroid compact",
            Self::QuarterPolaroidCompact => "quarter polaroid compact",
            Self::InstaSquaredCompact => "insta squared compact",
        }
    }

    /// Compact styles print the capture details in one corner instead of centered lines.
    pub fn is_compact(self) -> bool {
        matches!(
            self,
            Self::FullPolaroidCompact
                | Self::HalfPolaroidCompact
                | Self::QuarterPolaroidCompact
                | Self::InstaSquaredCompact
        )
    }

    /// Square styles pad portrait images with a blurred copy of themselves.
    pub fn blurs_portrait(self) -> bool {
        matches!(self, Self::InstaSquared | Self::InstaSquaredCompact)
    }

    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| DomainError::UnknownPresentationType(code.to_string()))
    }
}

impl FromStr for PresentationType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_code(value)
    }
}

impl Display for PresentationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub main_text: [u8; 3],
    pub sub_text: [u8; 3],
    pub background: [u8; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTheme {
    Light,
    Dark,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 2] = [Self::Light, Self::Dark];

    pub fn code(self) -> &'static str {
        match self {
            Self::Light => "L",
            Self::Dark => "D",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    pub fn scheme(self) -> ColorScheme {
        match self {
            Self::Light => ColorScheme {
                main_text: [0, 0, 0],
                sub_text: [128, 128, 128],
                background: [255, 255, 255],
            },
            Self::Dark => ColorScheme {
                main_text: [255, 255, 255],
                sub_text: [128, 128, 128],
                background: [0, 0, 0],
            },
        }
    }
}

impl FromStr for ColorTheme {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|theme| {
                theme.name().eq_ignore_ascii_case(trimmed)
                    || theme.code().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| DomainError::UnknownColorTheme(value.to_string()))
    }
}

impl Display for ColorTheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_parse_back() {
        for kind in PresentationType::ALL {
            assert_eq!(PresentationType::from_code(kind.code()), Ok(kind));
        }
        assert_eq!("isc".parse(), Ok(PresentationType::InstaSquaredCompact));
        assert!(matches!(
            PresentationType::from_code("XL"),
            Err(DomainError::UnknownPresentationType(_))
        ));
    }

    #[test]
    fn compact_and_blur_flags_follow_the_style() {
        assert!(PresentationType::HalfPolaroidCompact.is_compact());
        assert!(!PresentationType::HalfPolaroid.is_compact());
        assert!(PresentationType::InstaSquared.blurs_portrait());
        assert!(!PresentationType::FullPolaroid.blurs_portrait());
    }

    #[test]
    fn color_theme_parses_names_and_codes() {
        assert_eq!("dark".parse(), Ok(ColorTheme::Dark));
        assert_eq!("L".parse(), Ok(ColorTheme::Light));
        assert!("sepia".parse::<ColorTheme>().is_err());
        assert_eq!(ColorTheme::Dark.scheme().background, [0, 0, 0]);
    }
}
