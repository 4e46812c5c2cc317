//! Gamut mapping functions.
//! <https://drafts.csswg.org/css-color-4/#gamut-mapping>
//!
//! Three families of strategies are provided: hard per-channel clipping, a
//! perceptual chroma/coordinate reduction bounded by a deltaE metric (with
//! the CSS Color 4 algorithm as the fixed Oklch variant), and ray tracing
//! toward the achromatic axis inside an RGB cube.

use std::str::FromStr;

use crate::color::{Color, Component, Components, Flags};
use crate::convert::D65_WHITE;
use crate::delta_e::{delta_eok, DeltaEMethod};
use crate::error::{Error, Result};
use crate::space::{CoordRef, Space};

/// How an out-of-gamut color is mapped into the gamut of the target space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Method {
    /// The CSS Color 4 gamut mapping algorithm.
    #[default]
    Css,
    /// Project onto the gamut surface by ray tracing in an RGB cube.
    RayTrace,
    /// Hard per-channel clipping to the declared ranges.
    Clip,
    /// A named bundle of reduction settings, expanded before dispatch.
    Preset(Preset),
    /// Binary-search reduction of one designated coordinate until the
    /// distance to the clipped candidate drops below the JND.
    Reduce(CoordRef),
}

impl FromStr for Method {
    type Err = Error;

    /// Resolve a method tag: `"css"`, `"raytrace"`, `"clip"`, a preset name,
    /// or a `"space.channel"` coordinate reference.
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "css" => Method::Css,
            "raytrace" => Method::RayTrace,
            "clip" => Method::Clip,
            _ => match Preset::from_name(s) {
                Some(preset) => Method::Preset(preset),
                None => Method::Reduce(s.parse()?),
            },
        })
    }
}

/// A named gamut mapping preset, expanded into concrete reduction settings
/// strictly before dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Reduce LCH chroma bounded by deltaE2000.
    LchChroma,
    /// Like [`Preset::LchChroma`], but matching near-exactly and clamping to
    /// pure black/white when lightness leaves the 0..100 range.
    LchTonal,
}

const LCH_CHROMA: CoordRef = CoordRef {
    space: Space::Lch,
    index: 1,
};

const LCH_LIGHTNESS: CoordRef = CoordRef {
    space: Space::Lch,
    index: 0,
};

impl Preset {
    /// Resolve a preset by name.
    pub fn from_name(name: &str) -> Option<Preset> {
        match name {
            "lch-chroma" => Some(Preset::LchChroma),
            "lch-tonal" => Some(Preset::LchTonal),
            _ => None,
        }
    }

    fn expand(&self) -> ReductionSettings {
        match self {
            Preset::LchChroma => ReductionSettings {
                coord: LCH_CHROMA,
                jnd: 2.0,
                delta_e: DeltaEMethod::resolve("2000"),
                black_white_clamp: None,
            },
            Preset::LchTonal => ReductionSettings {
                coord: LCH_CHROMA,
                jnd: 0.0,
                delta_e: DeltaEMethod::resolve("2000"),
                black_white_clamp: Some(BlackWhiteClamp {
                    channel: LCH_LIGHTNESS,
                    min: 0.0,
                    max: 100.0,
                }),
            },
        }
    }
}

/// Clamp to pure black/white when a designated channel leaves the given
/// range, avoiding hue artifacts from reducing chroma near the achromatic
/// extremes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackWhiteClamp {
    /// The channel to read (e.g. the lightness of `"lch.l"`).
    pub channel: CoordRef,
    /// At or below this value the color collapses to pure black.
    pub min: Component,
    /// At or above this value the color collapses to pure white.
    pub max: Component,
}

/// Options for [`Color::map_to_gamut`].
#[derive(Clone, Debug)]
pub struct GamutOptions {
    /// The mapping strategy. Defaults to [`Method::Css`].
    pub method: Method,
    /// The space whose gamut is mapped into. Defaults to the color's own
    /// space.
    pub space: Option<Space>,
    /// Short name of the distance metric used by reduction searches (e.g.
    /// `"76"`, `"2000"`, `"ok"`), matched case-insensitively. The empty
    /// string and unknown names silently select the default metric.
    pub delta_e_method: String,
    /// The just-noticeable difference bound for reduction searches. A value
    /// of zero requests a near-exact match.
    pub jnd: Component,
    /// Optional clamp to pure black/white near the achromatic extremes.
    pub black_white_clamp: Option<BlackWhiteClamp>,
}

impl Default for GamutOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            space: None,
            delta_e_method: String::new(),
            jnd: 2.0,
            black_white_clamp: None,
        }
    }
}

/// Concrete settings for the generic coordinate reduction, after presets
/// and metric names have been resolved.
struct ReductionSettings {
    coord: CoordRef,
    jnd: Component,
    delta_e: DeltaEMethod,
    black_white_clamp: Option<BlackWhiteClamp>,
}

impl Color {
    /// Returns true if the color is within the gamut limits of its own color
    /// space.
    pub fn in_gamut(&self) -> bool {
        self.in_gamut_of(self.space, 0.0)
    }

    /// Returns true if the color, converted into `space`, satisfies every
    /// declared channel range within `epsilon`. HSL and HWB are checked
    /// against the gamut of sRGB.
    pub fn in_gamut_of(&self, space: Space, epsilon: Component) -> bool {
        if let Some(rgb) = space.rgb_gamut() {
            return self.in_gamut_of(rgb, epsilon);
        }

        let color = self.to_space(space);
        space
            .channels()
            .iter()
            .enumerate()
            .all(|(i, channel)| match channel.range {
                Some((min, max)) => {
                    let value = color.get(i);
                    value >= min - epsilon && value <= max + epsilon
                }
                None => true,
            })
    }

    /// Return a color with each channel that declares a gamut range clamped
    /// into it. Channels without a declared range pass through unchanged.
    /// NOTE: This is a lossy operation.
    pub fn clip(&self) -> Color {
        clip_into(self, self.space)
    }

    /// Force the coordinates of this color into the gamut of the target
    /// space (the color's own space unless `options.space` says otherwise).
    ///
    /// A color already inside the exact gamut is returned untouched. The
    /// mapped coordinates are written back into this color, expressed in its
    /// original space; this is the only point where mutation happens, all
    /// mapping strategies themselves are pure.
    pub fn map_to_gamut(&mut self, options: &GamutOptions) -> Result<&mut Self> {
        let space = options.space.unwrap_or(self.space);
        self.map_into_gamut_of(space, options)
    }

    /// Map into the gamut of `space` with default options. An explicit
    /// space given here takes precedence over any configured target space.
    pub fn map_to_gamut_in(&mut self, space: Space) -> Result<&mut Self> {
        self.map_into_gamut_of(space, &GamutOptions::default())
    }

    fn map_into_gamut_of(&mut self, space: Space, options: &GamutOptions) -> Result<&mut Self> {
        // Exact short-circuit: no epsilon fuzz, no mutation.
        if self.in_gamut_of(space, 0.0) {
            return Ok(self);
        }

        let mapped = match &options.method {
            Method::Css => css_map(self, space),
            Method::RayTrace => raytrace_map(self, space)?,
            Method::Clip => reduce_to_gamut(self, space, None),
            Method::Preset(preset) => reduce_to_gamut(self, space, Some(&preset.expand())),
            Method::Reduce(coord) => {
                let settings = ReductionSettings {
                    coord: *coord,
                    jnd: options.jnd,
                    delta_e: DeltaEMethod::resolve(&options.delta_e_method),
                    black_white_clamp: options.black_white_clamp,
                };
                reduce_to_gamut(self, space, Some(&settings))
            }
        };

        let mapped = if mapped.space != self.space {
            mapped.to_space(self.space)
        } else {
            mapped
        };

        self.components = mapped.components;
        let component_none = Flags::C0_IS_NONE | Flags::C1_IS_NONE | Flags::C2_IS_NONE;
        self.flags = (mapped.flags & component_none) | (self.flags & Flags::ALPHA_IS_NONE);
        Ok(self)
    }
}

/// Convert into `space` and clamp every channel with a declared range.
fn clip_into(color: &Color, space: Space) -> Color {
    let mut dest = color.to_space(space);
    clamp_declared_ranges(&mut dest);
    dest
}

/// Clamp every channel with a declared range in place. Also used as the
/// final clip absorbing the search epsilon and floating point residue.
fn clamp_declared_ranges(color: &mut Color) {
    for (i, channel) in color.space.channels().iter().enumerate() {
        if let Some((min, max)) = channel.range {
            let value = color.get(i);
            color.set(i, value.clamp(min, max));
        }
    }
}

/// Calculate the epsilon 2 orders of magnitude smaller than the specified
/// JND, floored at 1e-6 so vanishingly small JNDs cannot stall the search.
fn calc_epsilon(jnd: Component) -> Component {
    let order = if jnd == 0.0 {
        0
    } else {
        jnd.abs().log10().floor() as i32
    };
    (10.0 as Component).powi(order - 2).max(1e-6)
}

/// The iteration bound of a bisection over `range` down to `epsilon`. The
/// loops below carry this as an explicit guard instead of relying on
/// floating point convergence alone.
fn bisection_steps(range: Component, epsilon: Component) -> u32 {
    if range <= epsilon {
        return 0;
    }
    (range / epsilon).log2().ceil() as u32 + 1
}

/// The reference colors used when Oklch lightness is outside the 0..1
/// range. These are created in Oklab, the space the deltaEOK calculation
/// operates in.
fn oklab_white(alpha: Option<Component>) -> Color {
    Color::new(Space::Oklab, 1.0, 0.0, 0.0, alpha)
}

fn oklab_black(alpha: Option<Component>) -> Color {
    Color::new(Space::Oklab, 0.0, 0.0, 0.0, alpha)
}

/// The generic strategy behind `"clip"`, presets and coordinate references:
/// reduce the designated coordinate until the distance between the reduced
/// color and its clip projection is within the JND. With no settings this
/// is a bare clip. The result is expressed in `space` (or in the original
/// space when the black/white clamp replaces the whole color).
fn reduce_to_gamut(color: &Color, space: Space, settings: Option<&ReductionSettings>) -> Color {
    let mut space_color = match settings {
        None => color.to_space(space),
        Some(settings) => {
            // A JND of zero means match near-exactly rather than loop
            // forever.
            let jnd = if settings.jnd == 0.0 {
                1e-16
            } else {
                settings.jnd
            };

            let clipped = clip_into(color, space);
            if settings.delta_e.measure(color, &clipped) <= jnd {
                // The naive clip is already below the noticeable difference.
                clipped
            } else {
                if let Some(clamp) = &settings.black_white_clamp {
                    let value = color.to_space(clamp.channel.space).get(clamp.channel.index);
                    if value >= clamp.max {
                        return Color::new(
                            Space::XyzD65,
                            D65_WHITE.0,
                            D65_WHITE.1,
                            D65_WHITE.2,
                            color.alpha(),
                        )
                        .to_space(color.space);
                    } else if value <= clamp.min {
                        return Color::new(Space::XyzD65, 0.0, 0.0, 0.0, color.alpha())
                            .to_space(color.space);
                    }
                }

                let coord = settings.coord;
                let mut mapped = color.to_space(coord.space);
                // Resolve missing channels to zero before searching.
                for i in 0..3 {
                    let value = mapped.get(i);
                    mapped.set(i, value);
                }

                let epsilon = calc_epsilon(jnd);
                let mut low = coord.bounds().0;
                let mut high = mapped.get(coord.index);

                let mut steps = bisection_steps(high - low, epsilon);
                while high - low > epsilon && steps > 0 {
                    steps -= 1;

                    let clipped = clip_into(&mapped, space);
                    let delta = settings.delta_e.measure(&mapped, &clipped);

                    if delta - jnd < epsilon {
                        low = mapped.get(coord.index);
                    } else {
                        high = mapped.get(coord.index);
                    }
                    mapped.set(coord.index, (low + high) / 2.0);
                }

                mapped.to_space(space)
            }
        }
    };

    // Dumb coordinate clipping, or finishing off the smarter mapping with a
    // clip to get rid of the search epsilon.
    if settings.is_none() || !space_color.in_gamut_of(space, 0.0) {
        clamp_declared_ranges(&mut space_color);
    }
    space_color
}

/// The CSS Color 4 gamut mapping algorithm: a binary search on Oklch chroma
/// accepting the first clip projection within the deltaEOK just-noticeable
/// difference. Returns the mapped color in `space`.
/// <https://drafts.csswg.org/css-color-4/#css-gamut-mapping>
fn css_map(origin: &Color, space: Space) -> Color {
    // 8/9. the fixed JND and convergence epsilon of the algorithm.
    const JND: Component = 0.02;
    const EPSILON: Component = 1.0e-4;

    // 1. if destination has no gamut limits return origin.
    if space.is_unbounded() {
        return origin.to_space(space);
    }

    // 2. let origin_Oklch be origin converted to the Oklch color space.
    let origin_oklch = origin.to_space(Space::Oklch);
    let lightness = origin_oklch.components.0;

    // 3/4. lightness out of the SDR range maps to media white or black.
    if lightness >= 1.0 {
        return oklab_white(origin.alpha()).to_space(space);
    }
    if lightness <= 0.0 {
        return oklab_black(origin.alpha()).to_space(space);
    }

    // 6. already in gamut: the direct conversion is the mapped color.
    if origin_oklch.in_gamut_of(space, 0.0) {
        return origin_oklch.to_space(space);
    }

    // 11..13. bisection state over chroma.
    let mut min: Component = 0.0;
    let mut max = origin_oklch.components.1;
    let mut min_in_gamut = true;
    let mut current = origin_oklch.clone();
    let mut clipped = clip_into(&current, space);

    // If the clip is already imperceptibly different we can skip the binary
    // search completely.
    if delta_eok(&clipped, &current) < JND {
        return clipped;
    }

    // 14. bisect until the chroma interval collapses.
    let mut steps = bisection_steps(max - min, EPSILON);
    while max - min > EPSILON && steps > 0 {
        steps -= 1;

        let chroma = (min + max) / 2.0;
        current.set(1, chroma);

        if min_in_gamut && current.in_gamut_of(space, 0.0) {
            min = chroma;
            continue;
        }

        clipped = clip_into(&current, space);
        let e = delta_eok(&clipped, &current);

        if e < JND {
            if JND - e < EPSILON {
                // Converged: the clip is just inside the noticeable bound.
                break;
            }
            // Accept a slightly-off point and keep searching for a tighter
            // one above it.
            min_in_gamut = false;
            min = chroma;
        } else {
            max = chroma;
        }
    }

    // 15. the last clip projection is the mapped color.
    clipped
}

/// Map onto the gamut surface by casting a ray from an achromatic anchor
/// toward the color inside the RGB cube of the working space, correcting
/// lightness and hue between casts. Returns the mapped color in `space`.
///
/// Requires the target (or its associated RGB gamut) to be an RGB-model
/// space with bounded channels.
fn raytrace_map(origin: &Color, space: Space) -> Result<Color> {
    // Nothing to do for unbounded targets or in-gamut colors.
    if space.is_unbounded() || origin.in_gamut_of(space, 0.0) {
        return Ok(origin.to_space(space));
    }

    let oklch_origin = origin.to_space(Space::Oklch);
    let Components(lightness, _, hue) = oklch_origin.components;

    // Lightness out of the SDR range maps to media white or black.
    if lightness >= 1.0 {
        return Ok(oklab_white(origin.alpha()).to_space(space));
    }
    if lightness <= 0.0 {
        return Ok(oklab_black(origin.alpha()).to_space(space));
    }

    // Resolve the RGB-model space the geometry runs in.
    let origin_space = space;
    let mut working = space.rgb_gamut().unwrap_or(space);
    if !working.is_rgb_model() {
        return Err(Error::UnsupportedGamut(working));
    }

    // SDR cube bounds come from the first channel's declared range; HDR
    // headroom above it is ignored.
    let range = |space: Space| -> (Component, Component) {
        space.channels()[0]
            .range
            .expect("RGB model channels declare a range")
    };
    let (mut mn, mut mx) = range(working);

    // Straight-line projection is more consistent in linear light, so move
    // the geometry into the linear counterpart when there is one.
    if let Some(linear) = working.linear_gamut() {
        let corner = Color::new(working, mx, mx, mx, origin.alpha()).to_space(linear);
        working = linear;
        mx = corner.components.0;
        mn = range(working).0;
    }

    let bmin = [mn; 3];
    let bmax = [mx; 3];

    let mut rgb = oklch_origin.to_space(working);

    // Oklch's achromatic axis coincides with the neutral axis of the CSS
    // RGB spaces, so the anchor is simply the zero chroma color. A
    // perceptual space with a tilted achromatic axis would need a projection
    // onto the neutral line instead.
    let anchor_color = Color::new(Space::Oklch, lightness, 0.0, hue, origin.alpha());
    let mut anchor = coords(&anchor_color.to_space(working));

    // Keep the anchor away from the cube faces so the ray never gets too
    // short when it is tightened below.
    let low = mn + 1e-6;
    let high = mx - 1e-6;

    let mut last = coords(&rgb);
    for i in 0..4 {
        if i > 0 {
            // Constant luminance correction: pin lightness and hue back to
            // the original values between casts.
            let mut oklch = rgb.to_space(Space::Oklch);
            oklch.set(0, lightness);
            oklch.set(2, hue);
            rgb = oklch.to_space(working);
        }

        let candidate = coords(&rgb);
        match raytrace_box(anchor, candidate, bmin, bmax) {
            None => {
                // The ray degenerated, which only happens when its length
                // approaches zero. Keep the last valid coordinates and stop.
                rgb.components = Components(last[0], last[1], last[2]);
                break;
            }
            Some(intersection) => {
                // Tighten the anchor toward the surface when the corrected
                // candidate sits strictly inside the inset cube; this
                // improves convergence for spaces whose achromatic axis is
                // imperfectly aligned.
                if i > 0 && candidate.iter().all(|x| low < *x && *x < high) {
                    anchor = candidate;
                }
                last = intersection;
                rgb.components = Components(intersection[0], intersection[1], intersection[2]);
            }
        }
    }

    // Back to the requested gamut, clipping away floating point residue.
    let mut out = rgb.to_space(origin_space);
    clamp_declared_ranges(&mut out);
    Ok(out)
}

fn coords(color: &Color) -> [Component; 3] {
    [color.components.0, color.components.1, color.components.2]
}

/// Find the intersection of the segment from `start` to `end` with the axis
/// aligned box `[bmin, bmax]` using the slab method, favoring the first
/// intersection in the direction of the segment. Returns `None` when the
/// segment misses the box or degenerates to a point.
/// <https://en.wikipedia.org/wiki/Slab_method>
fn raytrace_box(
    start: [Component; 3],
    end: [Component; 3],
    bmin: [Component; 3],
    bmax: [Component; 3],
) -> Option<[Component; 3]> {
    let mut tnear = Component::NEG_INFINITY;
    let mut tfar = Component::INFINITY;
    let mut direction = [0.0; 3];

    for i in 0..3 {
        let a = start[i];
        let d = end[i] - a;
        direction[i] = d;

        if d.abs() > 1e-15 {
            let inv_d = 1.0 / d;
            let t1 = (bmin[i] - a) * inv_d;
            let t2 = (bmax[i] - a) * inv_d;
            tnear = t1.min(t2).max(tnear);
            tfar = t1.max(t2).min(tfar);
        } else if a < bmin[i] || a > bmax[i] {
            // Parallel to this axis's slab and outside of it.
            return None;
        }
    }

    // No hit, or the box lies entirely behind the segment start.
    if tnear > tfar || tfar < 0.0 {
        return None;
    }

    // The segment starts inside the box: favor the forward exit point.
    if tnear < 0.0 {
        tnear = tfar;
    }

    // A point, or something approaching one, where start and end coincide.
    if !tnear.is_finite() {
        return None;
    }

    Some([
        start[0] + direction[0] * tnear,
        start[1] + direction[1] * tnear,
        start[2] + direction[2] * tnear,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn oklch(l: Component, c: Component, h: Component) -> Color {
        Color::new(Space::Oklch, l, c, h, 1.0)
    }

    #[test]
    fn raytrace_box_parallel_outside_misses() {
        // Constant y = 2 outside the [0, 1] slab.
        let hit = raytrace_box([-0.5, 2.0, 0.5], [0.5, 2.0, 0.5], [0.0; 3], [1.0; 3]);
        assert_eq!(hit, None);
    }

    #[test]
    fn raytrace_box_from_outside_returns_the_entry_point() {
        let hit = raytrace_box([-1.0, 0.5, 0.5], [2.0, 0.5, 0.5], [0.0; 3], [1.0; 3]).unwrap();
        assert_abs_diff_eq!(hit[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(hit[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn raytrace_box_from_inside_returns_the_forward_exit_point() {
        let hit = raytrace_box([0.5, 0.5, 0.5], [0.5, 0.5, 2.0], [0.0; 3], [1.0; 3]).unwrap();
        assert_abs_diff_eq!(hit[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(hit[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(hit[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn raytrace_box_behind_the_segment_misses() {
        let hit = raytrace_box([2.0, 0.5, 0.5], [3.0, 0.5, 0.5], [0.0; 3], [1.0; 3]);
        assert_eq!(hit, None);
    }

    #[test]
    fn raytrace_box_degenerate_point_misses() {
        let hit = raytrace_box([0.5; 3], [0.5; 3], [0.0; 3], [1.0; 3]);
        assert_eq!(hit, None);
    }

    #[test]
    fn in_gamut_colors_are_returned_unchanged() {
        let methods = [
            Method::Css,
            Method::RayTrace,
            Method::Clip,
            Method::Reduce("oklch.c".parse().unwrap()),
        ];
        for method in methods {
            let mut color = Color::new(Space::Srgb, 0.2, 0.4, 0.6, 1.0);
            let options = GamutOptions {
                method,
                ..Default::default()
            };
            color.map_to_gamut(&options).unwrap();
            assert_eq!(color.components, Components(0.2, 0.4, 0.6));
            assert_eq!(color.space, Space::Srgb);
        }
    }

    #[test]
    fn clip_clamps_only_channels_with_a_declared_range() {
        let mut color = Color::new(Space::Srgb, 1.2, -0.3, 0.5, 1.0);
        let options = GamutOptions {
            method: Method::Clip,
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();
        assert_eq!(color.components, Components(1.0, 0.0, 0.5));

        // The unbounded LCH hue passes through the clip untouched.
        let clipped = Color::new(Space::Lch, 120.0, 20.0, 400.0, 1.0).clip();
        assert_eq!(clipped.components, Components(120.0, 20.0, 400.0));
    }

    #[test]
    fn css_mapping_reduces_chroma_within_the_jnd() {
        // oklch(0.7 0.5 30) is far outside of sRGB.
        let mut color = oklch(0.7, 0.5, 30.0);
        let naive_clip = color.to_space(Space::Srgb).clip();
        assert!(delta_eok(&color, &naive_clip) > 0.02);

        let options = GamutOptions {
            space: Some(Space::Srgb),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();

        // The result is expressed in the caller's space with reduced chroma.
        assert_eq!(color.space, Space::Oklch);
        assert!(color.components.1 < 0.5);
        assert!(color.components.1 > 0.0);
        assert!(color.in_gamut_of(Space::Srgb, 1e-6));

        // The mapped color sits a just-noticeable difference away from the
        // last unclipped candidate. Recover that candidate by bisecting the
        // chroma where the clip projection crosses the JND.
        let mut candidate = oklch(0.7, 0.5, 30.0);
        let (mut low, mut high) = (0.0, 0.5);
        for _ in 0..40 {
            candidate.set(1, (low + high) / 2.0);
            let clipped = clip_into(&candidate, Space::Srgb);
            if delta_eok(&clipped, &candidate) < 0.02 {
                low = candidate.get(1);
            } else {
                high = candidate.get(1);
            }
        }
        let clipped = clip_into(&candidate, Space::Srgb);
        assert_abs_diff_eq!(delta_eok(&clipped, &candidate), 0.02, epsilon = 1e-4);
        assert_abs_diff_eq!(delta_eok(&color, &candidate), 0.02, epsilon = 1e-3);
    }

    #[test]
    fn css_mapping_matches_the_reference_result_for_p3_red() {
        // color(display-p3 1 0 0), converted to sRGB and mapped in place.
        let mut color = Color::new(Space::DisplayP3, 1.0, 0.0, 0.0, 1.0).to_space(Space::Srgb);
        assert!(!color.in_gamut());

        color.map_to_gamut(&GamutOptions::default()).unwrap();
        assert_abs_diff_eq!(color.components.0, 1.0, epsilon = 5e-3);
        assert_abs_diff_eq!(color.components.1, 0.044557, epsilon = 5e-3);
        assert_abs_diff_eq!(color.components.2, 0.045930, epsilon = 5e-3);
        assert!(color.in_gamut());
    }

    #[test]
    fn overflowing_lightness_maps_to_white_with_the_original_alpha() {
        for method in [Method::Css, Method::RayTrace] {
            let mut color = Color::new(Space::Oklch, 1.05, 0.1, 120.0, 0.5);
            let options = GamutOptions {
                method,
                space: Some(Space::Srgb),
                ..Default::default()
            };
            color.map_to_gamut(&options).unwrap();

            let srgb = color.to_space(Space::Srgb);
            assert_abs_diff_eq!(srgb.components.0, 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(srgb.components.1, 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(srgb.components.2, 1.0, epsilon = 1e-6);
            assert_eq!(color.alpha, 0.5);
        }
    }

    #[test]
    fn underflowing_lightness_maps_to_black() {
        let mut color = Color::new(Space::Oklch, -0.05, 0.1, 120.0, 1.0);
        let options = GamutOptions {
            space: Some(Space::Srgb),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();

        let srgb = color.to_space(Space::Srgb);
        assert_abs_diff_eq!(srgb.components.0, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb.components.1, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb.components.2, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn raytrace_mapping_stays_in_the_cube() {
        let mut color = oklch(0.7, 0.5, 30.0);
        let options = GamutOptions {
            method: Method::RayTrace,
            space: Some(Space::Srgb),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();

        let srgb = color.to_space(Space::Srgb);
        for value in [srgb.components.0, srgb.components.1, srgb.components.2] {
            assert!((-1e-9..=1.0 + 1e-9).contains(&value), "{value} out of range");
        }

        // Chroma was reduced, lightness and hue approximately preserved.
        assert!(color.components.1 < 0.5);
        assert_abs_diff_eq!(color.components.0, 0.7, epsilon = 0.05);
    }

    #[test]
    fn raytrace_mapping_works_for_polar_notations_via_their_rgb_gamut() {
        let mut color = oklch(0.7, 0.5, 30.0);
        let options = GamutOptions {
            method: Method::RayTrace,
            space: Some(Space::Hsl),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();
        assert!(color.in_gamut_of(Space::Hsl, 1e-6));
    }

    #[test]
    fn coordinate_reduction_converges_for_lch_chroma() {
        let mut color = Color::new(Space::Lab, 60.0, 80.0, -90.0, 1.0);
        let options = GamutOptions {
            method: "lch.c".parse().unwrap(),
            space: Some(Space::Srgb),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();

        assert_eq!(color.space, Space::Lab);
        assert!(color.in_gamut_of(Space::Srgb, 1e-9));
    }

    #[test]
    fn zero_jnd_requests_a_near_exact_match_and_terminates() {
        let mut color = Color::new(Space::Lab, 60.0, 80.0, -90.0, 1.0);
        let options = GamutOptions {
            method: "lch.c".parse().unwrap(),
            space: Some(Space::Srgb),
            jnd: 0.0,
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();
        assert!(color.in_gamut_of(Space::Srgb, 1e-9));
    }

    #[test]
    fn black_white_clamp_collapses_to_the_white_point() {
        // A lightness above the configured maximum must return exactly the
        // target space's white, not a chroma-reduced approximation.
        let mut color = Color::new(Space::Lab, 105.0, 15.0, -20.0, 1.0);
        let options = GamutOptions {
            method: Method::Preset(Preset::LchTonal),
            space: Some(Space::Srgb),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();

        let srgb = color.to_space(Space::Srgb);
        assert_abs_diff_eq!(srgb.components.0, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb.components.1, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb.components.2, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn black_white_clamp_collapses_to_black() {
        let mut color = Color::new(Space::Lab, -5.0, 60.0, -60.0, 1.0);
        let options = GamutOptions {
            method: Method::Preset(Preset::LchTonal),
            space: Some(Space::Srgb),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();

        let srgb = color.to_space(Space::Srgb);
        assert_abs_diff_eq!(srgb.components.0, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb.components.1, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb.components.2, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn method_tags_resolve_to_the_expected_variants() {
        assert_eq!("css".parse::<Method>().unwrap(), Method::Css);
        assert_eq!("raytrace".parse::<Method>().unwrap(), Method::RayTrace);
        assert_eq!("clip".parse::<Method>().unwrap(), Method::Clip);
        assert_eq!(
            "lch-chroma".parse::<Method>().unwrap(),
            Method::Preset(Preset::LchChroma)
        );
        assert!(matches!(
            "oklch.c".parse::<Method>().unwrap(),
            Method::Reduce(_)
        ));
        assert!("bogus".parse::<Method>().is_err());
    }

    #[test]
    fn positional_space_overrides_the_configured_target() {
        let mut color = oklch(0.7, 0.5, 30.0);
        color.map_to_gamut_in(Space::Srgb).unwrap();
        assert!(color.in_gamut_of(Space::Srgb, 1e-6));
        assert_eq!(color.space, Space::Oklch);
    }

    #[test]
    fn epsilon_tracks_the_jnd_with_a_floor() {
        assert_abs_diff_eq!(calc_epsilon(2.0), 1e-2, epsilon = 1e-15);
        assert_abs_diff_eq!(calc_epsilon(0.02), 1e-4, epsilon = 1e-15);
        // A zero JND counts as order zero, not negative infinity.
        assert_abs_diff_eq!(calc_epsilon(0.0), 1e-2, epsilon = 1e-15);
        // The floor stops vanishing JNDs from stalling the search.
        assert_abs_diff_eq!(calc_epsilon(1e-16), 1e-6, epsilon = 1e-15);
    }

    #[test]
    fn unbounded_targets_pass_through() {
        let mut color = Color::new(Space::Srgb, 1.4, -0.2, 0.3, 1.0);
        let options = GamutOptions {
            space: Some(Space::Oklab),
            ..Default::default()
        };
        color.map_to_gamut(&options).unwrap();
        // Everything is in gamut for an unbounded space, so nothing moved.
        assert_eq!(color.components, Components(1.4, -0.2, 0.3));
    }
}
