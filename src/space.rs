//! The supported color spaces and their per-channel metadata: declared
//! ranges, gamut associations and `"space.channel"` coordinate references.

use std::fmt;
use std::str::FromStr;

use crate::color::Component;
use crate::error::Error;

/// Various color spaces and forms supported by the CSS color specification,
/// including the linear-light variants of the gamma encoded RGB spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Space {
    /// The sRGB color space.
    /// <https://drafts.csswg.org/css-color-4/#numeric-srgb>
    Srgb,
    /// The sRGB color space with no gamma mapping.
    /// <https://drafts.csswg.org/css-color-4/#predefined-sRGB-linear>
    SrgbLinear,
    /// The HSL (hue, saturation, lightness) notation is used as an improved
    /// method of representing colors in the sRGB color space.
    /// <https://drafts.csswg.org/css-color-4/#the-hsl-notation>
    Hsl,
    /// The HWB (hue, whiteness, blackness) notation is used as an improved
    /// method of specifying colors in the sRGB color space.
    /// <https://drafts.csswg.org/css-color-4/#the-hwb-notation>
    Hwb,
    /// CIE Lab.
    Lab,
    /// CIE LCH, the polar form of Lab.
    Lch,
    /// Oklab.
    Oklab,
    /// Oklch, the polar form of Oklab.
    Oklch,
    /// display-p3
    DisplayP3,
    /// display-p3 with no gamma mapping.
    DisplayP3Linear,
    /// a98-rgb
    A98Rgb,
    /// a98-rgb with no gamma mapping.
    A98RgbLinear,
    /// prophoto-rgb
    ProPhotoRgb,
    /// prophoto-rgb with no gamma mapping.
    ProPhotoRgbLinear,
    /// rec2020
    Rec2020,
    /// rec2020 with no gamma mapping.
    Rec2020Linear,
    /// xyz-d50
    XyzD50,
    /// xyz-d65
    XyzD65,
}

/// Declared metadata for a single channel of a color space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channel {
    /// Identifier of the channel within its space (e.g. `"c"` in `"oklch.c"`).
    pub id: &'static str,
    /// Declared gamut range. Channels without one pass through clipping
    /// unchanged and never fail gamut checks.
    pub range: Option<(Component, Component)>,
    /// Reference range for channels without gamut limits (used as reduction
    /// bounds, never as a gamut constraint).
    pub ref_range: Option<(Component, Component)>,
}

const fn bounded(id: &'static str, min: Component, max: Component) -> Channel {
    Channel {
        id,
        range: Some((min, max)),
        ref_range: None,
    }
}

const fn reference(id: &'static str, min: Component, max: Component) -> Channel {
    Channel {
        id,
        range: None,
        ref_range: Some((min, max)),
    }
}

const RGB_CHANNELS: [Channel; 3] = [
    bounded("r", 0.0, 1.0),
    bounded("g", 0.0, 1.0),
    bounded("b", 0.0, 1.0),
];

const HSL_CHANNELS: [Channel; 3] = [
    reference("h", 0.0, 360.0),
    bounded("s", 0.0, 1.0),
    bounded("l", 0.0, 1.0),
];

const HWB_CHANNELS: [Channel; 3] = [
    reference("h", 0.0, 360.0),
    bounded("w", 0.0, 1.0),
    bounded("b", 0.0, 1.0),
];

const LAB_CHANNELS: [Channel; 3] = [
    reference("l", 0.0, 100.0),
    reference("a", -125.0, 125.0),
    reference("b", -125.0, 125.0),
];

const LCH_CHANNELS: [Channel; 3] = [
    reference("l", 0.0, 100.0),
    reference("c", 0.0, 150.0),
    reference("h", 0.0, 360.0),
];

const OKLAB_CHANNELS: [Channel; 3] = [
    reference("l", 0.0, 1.0),
    reference("a", -0.4, 0.4),
    reference("b", -0.4, 0.4),
];

const OKLCH_CHANNELS: [Channel; 3] = [
    reference("l", 0.0, 1.0),
    reference("c", 0.0, 0.4),
    reference("h", 0.0, 360.0),
];

const XYZ_CHANNELS: [Channel; 3] = [
    reference("x", 0.0, 1.0),
    reference("y", 0.0, 1.0),
    reference("z", 0.0, 1.0),
];

impl Space {
    /// The ordered channel metadata for this space. The component order of a
    /// [`Color`](crate::Color) always matches this order.
    pub fn channels(&self) -> &'static [Channel; 3] {
        use Space as S;
        match self {
            S::Srgb
            | S::SrgbLinear
            | S::DisplayP3
            | S::DisplayP3Linear
            | S::A98Rgb
            | S::A98RgbLinear
            | S::ProPhotoRgb
            | S::ProPhotoRgbLinear
            | S::Rec2020
            | S::Rec2020Linear => &RGB_CHANNELS,
            S::Hsl => &HSL_CHANNELS,
            S::Hwb => &HWB_CHANNELS,
            S::Lab => &LAB_CHANNELS,
            S::Lch => &LCH_CHANNELS,
            S::Oklab => &OKLAB_CHANNELS,
            S::Oklch => &OKLCH_CHANNELS,
            S::XyzD50 | S::XyzD65 => &XYZ_CHANNELS,
        }
    }

    /// Whether no channel of this space declares a gamut range. Unbounded
    /// spaces cannot be mapped into and are returned from mapping unchanged.
    pub fn is_unbounded(&self) -> bool {
        self.channels().iter().all(|c| c.range.is_none())
    }

    /// Whether this is one of the RGB-model spaces (gamma encoded or linear
    /// light) that the ray-trace strategy can operate in.
    pub fn is_rgb_model(&self) -> bool {
        use Space as S;
        matches!(
            self,
            S::Srgb
                | S::SrgbLinear
                | S::DisplayP3
                | S::DisplayP3Linear
                | S::A98Rgb
                | S::A98RgbLinear
                | S::ProPhotoRgb
                | S::ProPhotoRgbLinear
                | S::Rec2020
                | S::Rec2020Linear
        )
    }

    /// The associated RGB-model space for polar sRGB notations. Gamut checks
    /// and ray-trace mapping for HSL and HWB happen in sRGB.
    pub fn rgb_gamut(&self) -> Option<Space> {
        match self {
            Space::Hsl | Space::Hwb => Some(Space::Srgb),
            _ => None,
        }
    }

    /// The linear-light counterpart of a gamma encoded RGB space.
    pub fn linear_gamut(&self) -> Option<Space> {
        use Space as S;
        match self {
            S::Srgb => Some(S::SrgbLinear),
            S::DisplayP3 => Some(S::DisplayP3Linear),
            S::A98Rgb => Some(S::A98RgbLinear),
            S::ProPhotoRgb => Some(S::ProPhotoRgbLinear),
            S::Rec2020 => Some(S::Rec2020Linear),
            _ => None,
        }
    }

    /// The string id of this space, as used in coordinate references.
    pub fn id(&self) -> &'static str {
        use Space as S;
        match self {
            S::Srgb => "srgb",
            S::SrgbLinear => "srgb-linear",
            S::Hsl => "hsl",
            S::Hwb => "hwb",
            S::Lab => "lab",
            S::Lch => "lch",
            S::Oklab => "oklab",
            S::Oklch => "oklch",
            S::DisplayP3 => "display-p3",
            S::DisplayP3Linear => "p3-linear",
            S::A98Rgb => "a98-rgb",
            S::A98RgbLinear => "a98-rgb-linear",
            S::ProPhotoRgb => "prophoto-rgb",
            S::ProPhotoRgbLinear => "prophoto-linear",
            S::Rec2020 => "rec2020",
            S::Rec2020Linear => "rec2020-linear",
            S::XyzD50 => "xyz-d50",
            S::XyzD65 => "xyz-d65",
        }
    }

    /// Resolve a string id to a space.
    pub fn from_id(id: &str) -> Result<Space, Error> {
        use Space as S;
        Ok(match id {
            "srgb" => S::Srgb,
            "srgb-linear" => S::SrgbLinear,
            "hsl" => S::Hsl,
            "hwb" => S::Hwb,
            "lab" => S::Lab,
            "lch" => S::Lch,
            "oklab" => S::Oklab,
            "oklch" => S::Oklch,
            "display-p3" | "p3" => S::DisplayP3,
            "p3-linear" => S::DisplayP3Linear,
            "a98-rgb" => S::A98Rgb,
            "a98-rgb-linear" => S::A98RgbLinear,
            "prophoto-rgb" => S::ProPhotoRgb,
            "prophoto-linear" => S::ProPhotoRgbLinear,
            "rec2020" => S::Rec2020,
            "rec2020-linear" => S::Rec2020Linear,
            "xyz-d50" => S::XyzD50,
            "xyz-d65" | "xyz" => S::XyzD65,
            _ => return Err(Error::UnknownSpace(id.to_string())),
        })
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A resolved `"space.channel"` coordinate reference, designating the
/// channel that a generic reduction search operates on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordRef {
    /// The space holding the designated channel.
    pub space: Space,
    /// Index of the channel within [`Space::channels`].
    pub index: usize,
}

impl CoordRef {
    /// The declared bounds of the designated channel: the gamut range, or
    /// the reference range when the channel has no gamut limits.
    pub fn bounds(&self) -> (Component, Component) {
        let channel = &self.space.channels()[self.index];
        channel
            .range
            .or(channel.ref_range)
            .expect("every channel declares a range or a reference range")
    }
}

impl FromStr for CoordRef {
    type Err = Error;

    /// Resolve a dotted reference such as `"oklch.c"` or `"lch.l"`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let err = || Error::UnknownCoordinate(s.to_string());
        let (space_id, channel_id) = s.split_once('.').ok_or_else(err)?;
        let space = Space::from_id(space_id).map_err(|_| err())?;
        let index = space
            .channels()
            .iter()
            .position(|c| c.id == channel_id)
            .ok_or_else(err)?;
        Ok(CoordRef { space, index })
    }
}
