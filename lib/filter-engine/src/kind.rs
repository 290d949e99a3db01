use crate::{
    FilterEngineError,
    parameter::{ParameterKey, ParameterSet},
};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::{fmt, str::FromStr};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum FilterKind {
    Crystallize = 0,
    Edges,
    GaussianBlur,
    Pixellate,
    #[default]
    SepiaTone,
    UnsharpMask,
    Vignette,
    DepthOfField,
    SharpenLuminance,
    Pointillize,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
            FilterKind::DepthOfField => "Depth of Field",
            FilterKind::SharpenLuminance => "Sharpen Luminance",
            FilterKind::Pointillize => "Pointillize",
        }
    }

    /// Identifier used on the command line and in config files.
    pub fn slug(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "crystallize",
            FilterKind::Edges => "edges",
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::Pixellate => "pixellate",
            FilterKind::SepiaTone => "sepia-tone",
            FilterKind::UnsharpMask => "unsharp-mask",
            FilterKind::Vignette => "vignette",
            FilterKind::DepthOfField => "depth-of-field",
            FilterKind::SharpenLuminance => "sharpen-luminance",
            FilterKind::Pointillize => "pointillize",
        }
    }

    /// The inputs a graph of this kind accepts besides its source image.
    pub fn input_keys(&self) -> ParameterSet {
        use ParameterKey::*;

        match self {
            FilterKind::Crystallize => ParameterSet::from_keys(&[Radius]),
            FilterKind::Edges => ParameterSet::from_keys(&[Intensity]),
            FilterKind::GaussianBlur => ParameterSet::from_keys(&[Radius]),
            FilterKind::Pixellate => ParameterSet::from_keys(&[Scale]),
            FilterKind::SepiaTone => ParameterSet::from_keys(&[Intensity]),
            FilterKind::UnsharpMask => ParameterSet::from_keys(&[Intensity, Radius]),
            FilterKind::Vignette => ParameterSet::from_keys(&[Intensity, Radius]),
            FilterKind::DepthOfField => ParameterSet::from_keys(&[Radius]),
            FilterKind::SharpenLuminance => ParameterSet::from_keys(&[Radius]),
            FilterKind::Pointillize => ParameterSet::from_keys(&[Radius]),
        }
    }

    pub fn all() -> &'static [FilterKind] {
        &[
            FilterKind::Crystallize,
            FilterKind::Edges,
            FilterKind::GaussianBlur,
            FilterKind::Pixellate,
            FilterKind::SepiaTone,
            FilterKind::UnsharpMask,
            FilterKind::Vignette,
            FilterKind::DepthOfField,
            FilterKind::SharpenLuminance,
            FilterKind::Pointillize,
        ]
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterEngineError;

    /// Accepts either the slug or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FilterKind::all()
            .iter()
            .copied()
            .find(|kind| kind.slug().eq_ignore_ascii_case(s) || kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FilterEngineError::UnknownFilter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug_and_name() {
        assert_eq!("sepia-tone".parse::<FilterKind>().unwrap(), FilterKind::SepiaTone);
        assert_eq!("Gaussian Blur".parse::<FilterKind>().unwrap(), FilterKind::GaussianBlur);
        assert_eq!(" DEPTH-OF-FIELD ".parse::<FilterKind>().unwrap(), FilterKind::DepthOfField);
        assert!("swirl".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_slug_round_trip_for_every_kind() {
        for kind in FilterKind::all() {
            assert_eq!(kind.slug().parse::<FilterKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_primitive_conversion() {
        let raw: u8 = FilterKind::Pointillize.into();
        assert_eq!(FilterKind::try_from(raw).unwrap(), FilterKind::Pointillize);
        assert!(FilterKind::try_from(42u8).is_err());
    }

    #[test]
    fn test_input_keys() {
        assert_eq!(
            FilterKind::SepiaTone.input_keys(),
            ParameterSet::from_keys(&[ParameterKey::Intensity])
        );
        assert_eq!(
            FilterKind::Pixellate.input_keys(),
            ParameterSet::from_keys(&[ParameterKey::Scale])
        );
        assert!(FilterKind::Vignette.input_keys().contains(ParameterKey::Radius));
        assert!(FilterKind::Vignette.input_keys().contains(ParameterKey::Intensity));
        assert!(FilterKind::all().iter().all(|kind| !kind.input_keys().is_empty()));
    }

    #[test]
    fn test_default_is_sepia() {
        assert_eq!(FilterKind::default(), FilterKind::SepiaTone);
    }
}
