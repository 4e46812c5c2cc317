//! Space-to-space conversion. Close relatives (gamma encoded and linear
//! light forms, polar and rectangular forms, the sRGB notations) convert
//! directly; everything else goes through an XYZ-D65 base, with Bradford
//! adaptation for the D50 spaces.
//!
//! Conversions only operate on the 3 color components (alpha is carried
//! through untouched).
//!
//! NOTE: When a conversion yields a NaN value, the component is powerless
//!       and should be treated as missing. Passing a NaN hue into a
//!       conversion treats it as 0.0.

use crate::color::{Color, Component, Components};
use crate::math::{almost_zero, normalize, normalize_hue, transform, transform_3x3, Transform};
use crate::space::Space;

/// The D50 reference white point.
#[allow(clippy::excessive_precision)]
pub const D50_WHITE: Components = Components(0.9642956764295677, 1.0, 0.8251046025104602);

/// The D65 reference white point.
#[allow(clippy::excessive_precision)]
pub const D65_WHITE: Components = Components(0.9504559270516716, 1.0, 1.0890577507598784);

impl Color {
    /// Convert this color from its current color space/notation to the
    /// specified color space/notation.
    pub fn to_space(&self, space: Space) -> Self {
        use Space as S;

        if self.space == space {
            return self.clone();
        }

        let c = self.components;

        // Handle direct conversions.
        match (self.space, space) {
            (S::Srgb, S::SrgbLinear) | (S::DisplayP3, S::DisplayP3Linear) => {
                return self.in_space(space, transfer::srgb_to_linear_light(&c))
            }
            (S::SrgbLinear, S::Srgb) | (S::DisplayP3Linear, S::DisplayP3) => {
                return self.in_space(space, transfer::srgb_to_gamma_encoded(&c))
            }
            (S::A98Rgb, S::A98RgbLinear) => {
                return self.in_space(space, transfer::a98_to_linear_light(&c))
            }
            (S::A98RgbLinear, S::A98Rgb) => {
                return self.in_space(space, transfer::a98_to_gamma_encoded(&c))
            }
            (S::ProPhotoRgb, S::ProPhotoRgbLinear) => {
                return self.in_space(space, transfer::prophoto_to_linear_light(&c))
            }
            (S::ProPhotoRgbLinear, S::ProPhotoRgb) => {
                return self.in_space(space, transfer::prophoto_to_gamma_encoded(&c))
            }
            (S::Rec2020, S::Rec2020Linear) => {
                return self.in_space(space, transfer::rec2020_to_linear_light(&c))
            }
            (S::Rec2020Linear, S::Rec2020) => {
                return self.in_space(space, transfer::rec2020_to_gamma_encoded(&c))
            }
            (S::Srgb, S::Hsl) => return self.in_space(space, util::rgb_to_hsl(&c)),
            (S::Hsl, S::Srgb) => return self.in_space(space, util::hsl_to_rgb(&c)),
            (S::Srgb, S::Hwb) => return self.in_space(space, util::rgb_to_hwb(&c)),
            (S::Hwb, S::Srgb) => return self.in_space(space, util::hwb_to_rgb(&c)),
            (S::Hsl, S::Hwb) => {
                return self.in_space(space, util::rgb_to_hwb(&util::hsl_to_rgb(&c)))
            }
            (S::Hwb, S::Hsl) => {
                return self.in_space(space, util::rgb_to_hsl(&util::hwb_to_rgb(&c)))
            }
            (S::Lab, S::Lch) | (S::Oklab, S::Oklch) => {
                return self.in_space(space, rectangular_to_polar(&c))
            }
            (S::Lch, S::Lab) | (S::Oklch, S::Oklab) => {
                return self.in_space(space, polar_to_rectangular(&c))
            }
            (S::XyzD50, S::XyzD65) => return self.in_space(space, d50_to_d65(&c)),
            (S::XyzD65, S::XyzD50) => return self.in_space(space, d65_to_d50(&c)),
            _ => {}
        }

        // The rest converts through XYZ-D65.
        let base = to_base(self.space, &c);
        self.in_space(space, from_base(space, &base))
    }

    /// Rewrap converted components in the target space, carrying alpha (and
    /// its missing marker) over from this color.
    fn in_space(&self, space: Space, components: Components) -> Self {
        Color::new(space, components.0, components.1, components.2, self.alpha())
    }
}

/// Convert components in `space` to the XYZ-D65 base.
fn to_base(space: Space, c: &Components) -> Components {
    use Space as S;
    match space {
        S::Srgb => to_base(S::SrgbLinear, &transfer::srgb_to_linear_light(c)),
        S::SrgbLinear => transform(&SRGB_LINEAR_TO_XYZ, *c),
        S::Hsl => to_base(S::Srgb, &util::hsl_to_rgb(c)),
        S::Hwb => to_base(S::Srgb, &util::hwb_to_rgb(c)),
        S::DisplayP3 => to_base(S::DisplayP3Linear, &transfer::srgb_to_linear_light(c)),
        S::DisplayP3Linear => transform(&P3_LINEAR_TO_XYZ, *c),
        S::A98Rgb => to_base(S::A98RgbLinear, &transfer::a98_to_linear_light(c)),
        S::A98RgbLinear => transform(&A98_LINEAR_TO_XYZ, *c),
        S::ProPhotoRgb => to_base(S::ProPhotoRgbLinear, &transfer::prophoto_to_linear_light(c)),
        S::ProPhotoRgbLinear => d50_to_d65(&transform(&PROPHOTO_LINEAR_TO_XYZ_D50, *c)),
        S::Rec2020 => to_base(S::Rec2020Linear, &transfer::rec2020_to_linear_light(c)),
        S::Rec2020Linear => transform(&REC2020_LINEAR_TO_XYZ, *c),
        S::Lab => d50_to_d65(&lab_to_xyz_d50(c)),
        S::Lch => to_base(S::Lab, &polar_to_rectangular(c)),
        S::Oklab => oklab_to_xyz_d65(c),
        S::Oklch => to_base(S::Oklab, &polar_to_rectangular(c)),
        S::XyzD50 => d50_to_d65(c),
        S::XyzD65 => *c,
    }
}

/// Convert components in the XYZ-D65 base to `space`.
fn from_base(space: Space, base: &Components) -> Components {
    use Space as S;
    match space {
        S::Srgb => transfer::srgb_to_gamma_encoded(&from_base(S::SrgbLinear, base)),
        S::SrgbLinear => transform(&XYZ_TO_SRGB_LINEAR, *base),
        S::Hsl => util::rgb_to_hsl(&from_base(S::Srgb, base)),
        S::Hwb => util::rgb_to_hwb(&from_base(S::Srgb, base)),
        S::DisplayP3 => transfer::srgb_to_gamma_encoded(&from_base(S::DisplayP3Linear, base)),
        S::DisplayP3Linear => transform(&XYZ_TO_P3_LINEAR, *base),
        S::A98Rgb => transfer::a98_to_gamma_encoded(&from_base(S::A98RgbLinear, base)),
        S::A98RgbLinear => transform(&XYZ_TO_A98_LINEAR, *base),
        S::ProPhotoRgb => {
            transfer::prophoto_to_gamma_encoded(&from_base(S::ProPhotoRgbLinear, base))
        }
        S::ProPhotoRgbLinear => transform(&XYZ_D50_TO_PROPHOTO_LINEAR, d65_to_d50(base)),
        S::Rec2020 => transfer::rec2020_to_gamma_encoded(&from_base(S::Rec2020Linear, base)),
        S::Rec2020Linear => transform(&XYZ_TO_REC2020_LINEAR, *base),
        S::Lab => xyz_d50_to_lab(&d65_to_d50(base)),
        S::Lch => rectangular_to_polar(&from_base(S::Lab, base)),
        S::Oklab => xyz_d65_to_oklab(base),
        S::Oklch => rectangular_to_polar(&from_base(S::Oklab, base)),
        S::XyzD50 => d65_to_d50(base),
        S::XyzD65 => *base,
    }
}

/// Convert the orthogonal rectangular form (Lab/Oklab) to the cylindrical
/// polar form (LCH/OKLCH). The hue of an achromatic color is powerless and
/// yields NaN.
fn rectangular_to_polar(c: &Components) -> Components {
    let Components(lightness, a, b) = *c;

    let chroma = (a * a + b * b).sqrt();
    let hue = if almost_zero(chroma) {
        Component::NAN
    } else {
        normalize_hue(b.atan2(a).to_degrees())
    };

    Components(lightness, chroma, hue)
}

/// Convert the cylindrical polar form (LCH/OKLCH) to the orthogonal
/// rectangular form (Lab/Oklab). A missing hue is treated as 0 degrees.
fn polar_to_rectangular(c: &Components) -> Components {
    let Components(lightness, chroma, hue) = *c;

    let hue = normalize(hue).to_radians();
    let a = chroma * hue.cos();
    let b = chroma * hue.sin();

    Components(lightness, a, b)
}

const KAPPA: Component = 24389.0 / 27.0;
const LAB_EPSILON: Component = 216.0 / 24389.0;

/// <https://drafts.csswg.org/css-color-4/#color-conversion-code>
fn lab_to_xyz_d50(c: &Components) -> Components {
    let Components(lightness, a, b) = *c;

    let f1 = (lightness + 16.0) / 116.0;
    let f0 = f1 + a / 500.0;
    let f2 = f1 - b / 200.0;

    let f0_cubed = f0 * f0 * f0;
    let x = if f0_cubed > LAB_EPSILON {
        f0_cubed
    } else {
        (116.0 * f0 - 16.0) / KAPPA
    };

    let y = if lightness > KAPPA * LAB_EPSILON {
        let v = (lightness + 16.0) / 116.0;
        v * v * v
    } else {
        lightness / KAPPA
    };

    let f2_cubed = f2 * f2 * f2;
    let z = if f2_cubed > LAB_EPSILON {
        f2_cubed
    } else {
        (116.0 * f2 - 16.0) / KAPPA
    };

    Components(x * D50_WHITE.0, y * D50_WHITE.1, z * D50_WHITE.2)
}

fn xyz_d50_to_lab(c: &Components) -> Components {
    let adapted = Components(c.0 / D50_WHITE.0, c.1 / D50_WHITE.1, c.2 / D50_WHITE.2);

    let Components(f0, f1, f2) = adapted.map(|v| {
        if v > LAB_EPSILON {
            v.cbrt()
        } else {
            (KAPPA * v + 16.0) / 116.0
        }
    });

    Components(116.0 * f1 - 16.0, 500.0 * (f0 - f1), 200.0 * (f1 - f2))
}

fn xyz_d65_to_oklab(c: &Components) -> Components {
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const XYZ_TO_LMS: Transform = transform_3x3(
         0.8190224432164319,  0.0329836671980271,  0.048177199566046255,
         0.3619062562801221,  0.9292868468965546,  0.26423952494422764,
        -0.12887378261216414, 0.03614466816999844, 0.6335478258136937,
    );

    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const LMS_TO_OKLAB: Transform = transform_3x3(
         0.2104542553,  1.9779984951,  0.0259040371,
         0.7936177850, -2.4285922050,  0.7827717662,
        -0.0040720468,  0.4505937099, -0.8086757660,
    );

    let lms = transform(&XYZ_TO_LMS, *c);
    transform(&LMS_TO_OKLAB, lms.map(|v| v.cbrt()))
}

fn oklab_to_xyz_d65(c: &Components) -> Components {
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const OKLAB_TO_LMS: Transform = transform_3x3(
        0.99999999845051981432,  1.0000000088817607767,    1.0000000546724109177,
        0.39633779217376785678, -0.1055613423236563494,   -0.089484182094965759684,
        0.21580375806075880339, -0.063854174771705903402, -1.2914855378640917399,
    );

    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const LMS_TO_XYZ: Transform = transform_3x3(
         1.2268798733741557,  -0.04057576262431372, -0.07637294974672142,
        -0.5578149965554813,   1.1122868293970594,  -0.4214933239627914,
         0.28139105017721583, -0.07171106666151701,  1.5869240244272418,
    );

    let lms = transform(&OKLAB_TO_LMS, *c);
    transform(&LMS_TO_XYZ, lms.map(|v| v * v * v))
}

/// Bradford chromatic adaptation between the D65 and D50 white points.
fn d65_to_d50(c: &Components) -> Components {
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const ADAPT: Transform = transform_3x3(
         1.0479297925449969,   0.02962780877005599, -0.009243040646204504,
         0.022946870601609652, 0.9904344267538799,   0.015055191490298152,
        -0.05019226628920524, -0.017073799063418826, 0.7518742814281371,
    );

    transform(&ADAPT, *c)
}

fn d50_to_d65(c: &Components) -> Components {
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const ADAPT: Transform = transform_3x3(
         0.955473421488075,    -0.0283697093338637,    0.012314014864481998,
        -0.02309845494876471,   1.0099953980813041,   -0.020507649298898964,
         0.06325924320057072,   0.021041441191917323,  1.330365926242124,
    );

    transform(&ADAPT, *c)
}

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const SRGB_LINEAR_TO_XYZ: Transform = transform_3x3(
    0.4123907992659595,  0.21263900587151036, 0.01933081871559185,
    0.35758433938387796, 0.7151686787677559,  0.11919477979462599,
    0.1804807884018343,  0.07219231536073371, 0.9505321522496606,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_TO_SRGB_LINEAR: Transform = transform_3x3(
     3.2409699419045213, -0.9692436362808798,  0.05563007969699361,
    -1.5373831775700935,  1.8759675015077206, -0.20397695888897657,
    -0.4986107602930033,  0.04155505740717561, 1.0569715142428786,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const P3_LINEAR_TO_XYZ: Transform = transform_3x3(
    0.48657094864821626, 0.22897456406974884, 0.0,
    0.26566769316909294, 0.6917385218365062,  0.045113381858902575,
    0.1982172852343625,  0.079286914093745,   1.0439443689009757,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_TO_P3_LINEAR: Transform = transform_3x3(
     2.4934969119414245,  -0.829488969561575,    0.035845830243784335,
    -0.9313836179191236,   1.7626640603183468,  -0.07617238926804171,
    -0.40271078445071684,  0.02362468584194359,  0.9568845240076873,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const A98_LINEAR_TO_XYZ: Transform = transform_3x3(
    0.5766690429101308,  0.29734497525053616, 0.027031361386412378,
    0.18555823790654627, 0.627363566255466,   0.07068885253582714,
    0.18822864623499472, 0.07529145849399789, 0.9913375368376389,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_TO_A98_LINEAR: Transform = transform_3x3(
     2.041587903810746,  -0.9692436362808798,   0.013444280632031024,
    -0.5650069742788596,  1.8759675015077206,  -0.11836239223101824,
    -0.3447313507783295,  0.04155505740717561,  1.0151749943912054,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const PROPHOTO_LINEAR_TO_XYZ_D50: Transform = transform_3x3(
    0.7977604896723027,  0.2880711282292934,     0.0,
    0.13518583717574031, 0.7118432178101014,     0.0,
    0.0313493495815248,  0.00008565396060525902, 0.8251046025104601,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_D50_TO_PROPHOTO_LINEAR: Transform = transform_3x3(
     1.3457989731028281,  -0.5446224939028347,  0.0,
    -0.25558010007997534,  1.5082327413132781,  0.0,
    -0.05110628506753401,  0.02053603239147973, 1.2119675456389454,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const REC2020_LINEAR_TO_XYZ: Transform = transform_3x3(
    0.6369580483012913,  0.26270021201126703,  0.0,
    0.14461690358620838, 0.677998071518871,    0.028072693049087508,
    0.16888097516417205, 0.059301716469861945, 1.0609850577107909,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_TO_REC2020_LINEAR: Transform = transform_3x3(
     1.7166511879712676, -0.666684351832489,    0.017639857445310915,
    -0.3556707837763924,  1.616481236634939,   -0.042770613257808655,
    -0.2533662813736598,  0.01576854581391113,  0.942103121235474,
);

mod transfer {
    use crate::color::{Component, Components};

    /// The sRGB transfer curve, also used by display-p3.
    pub fn srgb_to_gamma_encoded(from: &Components) -> Components {
        from.map(|value| {
            let abs = value.abs();

            if abs > 0.0031308 {
                value.signum() * (1.055 * abs.powf(1.0 / 2.4) - 0.055)
            } else {
                12.92 * value
            }
        })
    }

    pub fn srgb_to_linear_light(from: &Components) -> Components {
        from.map(|value| {
            let abs = value.abs();

            if abs < 0.04045 {
                value / 12.92
            } else {
                value.signum() * ((abs + 0.055) / 1.055).powf(2.4)
            }
        })
    }

    pub fn a98_to_gamma_encoded(from: &Components) -> Components {
        from.map(|v| v.signum() * v.abs().powf(256.0 / 563.0))
    }

    pub fn a98_to_linear_light(from: &Components) -> Components {
        from.map(|v| v.signum() * v.abs().powf(563.0 / 256.0))
    }

    pub fn prophoto_to_gamma_encoded(from: &Components) -> Components {
        const E: Component = 1.0 / 512.0;

        from.map(|v| {
            let abs = v.abs();

            if abs >= E {
                v.signum() * abs.powf(1.0 / 1.8)
            } else {
                16.0 * v
            }
        })
    }

    pub fn prophoto_to_linear_light(from: &Components) -> Components {
        const E: Component = 16.0 / 512.0;

        from.map(|v| {
            let abs = v.abs();

            if abs <= E {
                v / 16.0
            } else {
                v.signum() * abs.powf(1.8)
            }
        })
    }

    const REC2020_ALPHA: Component = 1.09929682680944;
    const REC2020_BETA: Component = 0.018053968510807;

    #[allow(clippy::excessive_precision)]
    pub fn rec2020_to_gamma_encoded(from: &Components) -> Components {
        from.map(|v| {
            let abs = v.abs();

            if abs > REC2020_BETA {
                v.signum() * (REC2020_ALPHA * abs.powf(0.45) - (REC2020_ALPHA - 1.0))
            } else {
                4.5 * v
            }
        })
    }

    #[allow(clippy::excessive_precision)]
    pub fn rec2020_to_linear_light(from: &Components) -> Components {
        from.map(|v| {
            let abs = v.abs();

            if abs < REC2020_BETA * 4.5 {
                v / 4.5
            } else {
                v.signum() * ((abs + REC2020_ALPHA - 1.0) / REC2020_ALPHA).powf(1.0 / 0.45)
            }
        })
    }
}

mod util {
    use crate::color::{Component, Components};
    use crate::math::{almost_zero, normalize, normalize_hue};

    /// Calculate the hue from RGB components and return it along with the min
    /// and max RGB values.
    fn rgb_to_hue_with_min_max(from: &Components) -> (Component, Component, Component) {
        let Components(red, green, blue) = *from;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);

        let delta = max - min;

        let hue = if delta != 0.0 {
            60.0 * if max == red {
                (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
            } else if max == green {
                (blue - red) / delta + 2.0
            } else {
                (red - green) / delta + 4.0
            }
        } else {
            Component::NAN
        };

        (hue, min, max)
    }

    /// Convert from RGB notation to HSL notation.
    /// <https://drafts.csswg.org/css-color-4/#rgb-to-hsl>
    pub fn rgb_to_hsl(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        let lightness = (min + max) / 2.0;
        let delta = max - min;

        let saturation =
            if almost_zero(delta) || almost_zero(lightness) || almost_zero(1.0 - lightness) {
                0.0
            } else {
                (max - lightness) / lightness.min(1.0 - lightness)
            };

        Components(hue, saturation, lightness)
    }

    /// Convert from HSL notation to RGB notation.
    /// <https://drafts.csswg.org/css-color-4/#hsl-to-rgb>
    pub fn hsl_to_rgb(from: &Components) -> Components {
        let Components(hue, saturation, lightness) = from.map(normalize);

        if saturation <= 0.0 {
            return Components(lightness, lightness, lightness);
        }

        let hue = normalize_hue(hue);

        macro_rules! f {
            ($n:expr) => {{
                let k = ($n + hue / 30.0) % 12.0;
                let a = saturation * lightness.min(1.0 - lightness);
                lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
            }};
        }

        Components(f!(0.0), f!(8.0), f!(4.0))
    }

    /// Convert from RGB notation to HWB notation.
    /// <https://drafts.csswg.org/css-color-4/#rgb-to-hwb>
    pub fn rgb_to_hwb(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        let whiteness = min;
        let blackness = 1.0 - max;

        Components(hue, whiteness, blackness)
    }

    /// Convert from HWB notation to RGB notation.
    /// <https://drafts.csswg.org/css-color-4/#hwb-to-rgb>
    pub fn hwb_to_rgb(from: &Components) -> Components {
        let hue = from.0;
        let whiteness = from.1;
        let blackness = from.2;

        if whiteness + blackness >= 1.0 {
            let gray = whiteness / (whiteness + blackness);
            return Components(gray, gray, gray);
        }

        let rgb = hsl_to_rgb(&Components(hue, 1.0, 0.5));
        rgb.map(|v| v * (1.0 - whiteness - blackness) + whiteness)
    }
}
