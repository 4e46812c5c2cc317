//! Perceptual color difference metrics and the name-based registry used to
//! pick one.

use crate::color::{Color, Component};
use crate::space::Space;

/// Calculate deltaE OK (simple root sum of squares).
/// <https://drafts.csswg.org/css-color-4/#color-difference-OK>
pub(crate) fn delta_eok(reference: &Color, sample: &Color) -> Component {
    // Delta is calculated in the oklab color space.
    let reference = reference.to_space(Space::Oklab);
    let sample = sample.to_space(Space::Oklab);

    let d = (
        sample.components.0 - reference.components.0,
        sample.components.1 - reference.components.1,
        sample.components.2 - reference.components.2,
    );
    (d.0 * d.0 + d.1 * d.1 + d.2 * d.2).sqrt()
}

/// Plain Euclidean distance in CIE Lab (the 1976 formula).
fn delta_e76(reference: &Color, sample: &Color) -> Component {
    let reference = reference.to_space(Space::Lab);
    let sample = sample.to_space(Space::Lab);

    let d = (
        sample.components.0 - reference.components.0,
        sample.components.1 - reference.components.1,
        sample.components.2 - reference.components.2,
    );
    (d.0 * d.0 + d.1 * d.1 + d.2 * d.2).sqrt()
}

/// CIEDE2000 with the weighting factors kL, kC and kH all set to 1.
/// <http://www2.ece.rochester.edu/~gsharma/ciede2000/>
fn delta_e2000(reference: &Color, sample: &Color) -> Component {
    let reference = reference.to_space(Space::Lab);
    let sample = sample.to_space(Space::Lab);

    let (l1, a1, b1) = (
        reference.components.0,
        reference.components.1,
        reference.components.2,
    );
    let (l2, a2, b2) = (sample.components.0, sample.components.1, sample.components.2);

    const POW25_7: Component = 6103515625.0; // 25^7

    let c1 = a1.hypot(b1);
    let c2 = a2.hypot(b2);
    let c_bar = (c1 + c2) / 2.0;
    let c_bar_7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar_7 / (c_bar_7 + POW25_7)).sqrt());

    let a1_prime = a1 * (1.0 + g);
    let a2_prime = a2 * (1.0 + g);
    let c1_prime = a1_prime.hypot(b1);
    let c2_prime = a2_prime.hypot(b2);

    let hue_prime = |a: Component, b: Component| -> Component {
        if a == 0.0 && b == 0.0 {
            0.0
        } else {
            b.atan2(a).to_degrees().rem_euclid(360.0)
        }
    };
    let h1_prime = hue_prime(a1_prime, b1);
    let h2_prime = hue_prime(a2_prime, b2);

    let delta_l = l2 - l1;
    let delta_c = c2_prime - c1_prime;

    let delta_h_angle = if c1_prime * c2_prime == 0.0 {
        0.0
    } else {
        let d = h2_prime - h1_prime;
        if d.abs() <= 180.0 {
            d
        } else if d > 180.0 {
            d - 360.0
        } else {
            d + 360.0
        }
    };
    let delta_h = 2.0 * (c1_prime * c2_prime).sqrt() * (delta_h_angle / 2.0).to_radians().sin();

    let l_bar = (l1 + l2) / 2.0;
    let c_bar_prime = (c1_prime + c2_prime) / 2.0;

    let h_bar_prime = if c1_prime * c2_prime == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_prime - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_prime).to_radians().cos()
        + 0.32 * (3.0 * h_bar_prime + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_prime - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_bar_prime - 275.0) / 25.0).powi(2)).exp();
    let c_bar_prime_7 = c_bar_prime.powi(7);
    let r_c = 2.0 * (c_bar_prime_7 / (c_bar_prime_7 + POW25_7)).sqrt();

    let l_diff = l_bar - 50.0;
    let s_l = 1.0 + 0.015 * l_diff * l_diff / (20.0 + l_diff * l_diff).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_prime;
    let s_h = 1.0 + 0.015 * c_bar_prime * t;
    let r_t = -r_c * (2.0 * delta_theta).to_radians().sin();

    let dl = delta_l / s_l;
    let dc = delta_c / s_c;
    let dh = delta_h / s_h;

    (dl * dl + dc * dc + dh * dh + r_t * dc * dh).sqrt()
}

/// A registered perceptual distance metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaEMethod {
    /// `deltaE76`, plain Euclidean distance in Lab.
    E76,
    /// `deltaE2000`, the CIEDE2000 formula. The default metric.
    #[default]
    E2000,
    /// `deltaEOK`, Euclidean distance in Oklab.
    Eok,
}

const METHODS: &[DeltaEMethod] = &[DeltaEMethod::E76, DeltaEMethod::E2000, DeltaEMethod::Eok];

impl DeltaEMethod {
    /// The canonical registry name of this metric.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            DeltaEMethod::E76 => "deltaE76",
            DeltaEMethod::E2000 => "deltaE2000",
            DeltaEMethod::Eok => "deltaEOK",
        }
    }

    /// Resolve a metric by its short name: `"76"`, `"2000"`, `"ok"`. The
    /// lookup prepends `"deltaE"` and matches case-insensitively. An empty
    /// or unknown name silently falls back to the default metric
    /// ([`DeltaEMethod::E2000`]); this is policy, not an error.
    pub fn resolve(name: &str) -> DeltaEMethod {
        if !name.is_empty() {
            let wanted = format!("deltae{}", name.to_ascii_lowercase());
            for method in METHODS {
                if method.canonical_name().to_ascii_lowercase() == wanted {
                    return *method;
                }
            }
        }
        DeltaEMethod::default()
    }

    /// Measure the perceptual distance between two colors.
    pub fn measure(&self, reference: &Color, sample: &Color) -> Component {
        match self {
            DeltaEMethod::E76 => delta_e76(reference, sample),
            DeltaEMethod::E2000 => delta_e2000(reference, sample),
            DeltaEMethod::Eok => delta_eok(reference, sample),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn name_lookup_is_case_insensitive_with_silent_fallback() {
        assert_eq!(DeltaEMethod::resolve("2000"), DeltaEMethod::E2000);
        assert_eq!(DeltaEMethod::resolve("76"), DeltaEMethod::E76);
        assert_eq!(DeltaEMethod::resolve("ok"), DeltaEMethod::Eok);
        assert_eq!(DeltaEMethod::resolve("OK"), DeltaEMethod::Eok);
        assert_eq!(DeltaEMethod::resolve("Ok"), DeltaEMethod::Eok);

        // Unknown and empty names fall back to the default metric.
        assert_eq!(DeltaEMethod::resolve(""), DeltaEMethod::E2000);
        assert_eq!(DeltaEMethod::resolve("itp"), DeltaEMethod::E2000);
    }

    #[test]
    fn identical_colors_have_zero_distance() {
        let color = Color::new(Space::Srgb, 0.5, 0.3, 0.2, 1.0);
        for method in METHODS {
            assert_abs_diff_eq!(method.measure(&color, &color), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn delta_e76_is_lab_euclidean() {
        let a = Color::new(Space::Lab, 50.0, 10.0, 0.0, 1.0);
        let b = Color::new(Space::Lab, 50.0, 13.0, 4.0, 1.0);
        assert_abs_diff_eq!(delta_e76(&a, &b), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn delta_e2000_matches_the_sharma_reference_pairs() {
        // Pairs from the Sharma, Wu & Dalal CIEDE2000 test data.
        let cases: &[((f64, f64, f64), (f64, f64, f64), f64)] = &[
            ((50.0, 2.6772, -79.7751), (50.0, 0.0, -82.7485), 2.0425),
            ((50.0, 0.0, 0.0), (50.0, -1.0, 2.0), 2.3669),
            ((50.0, 2.5, 0.0), (50.0, 3.1736, 0.5854), 1.0000),
        ];

        for &((l1, a1, b1), (l2, a2, b2), expected) in cases {
            let lhs = Color::new(Space::Lab, l1, a1, b1, 1.0);
            let rhs = Color::new(Space::Lab, l2, a2, b2, 1.0);
            assert_abs_diff_eq!(delta_e2000(&lhs, &rhs), expected, epsilon = 1e-4);
            // The formula is symmetric for these pairs.
            assert_abs_diff_eq!(delta_e2000(&rhs, &lhs), expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn delta_eok_between_white_and_black_is_one() {
        let white = Color::new(Space::Oklab, 1.0, 0.0, 0.0, 1.0);
        let black = Color::new(Space::Oklab, 0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(delta_eok(&white, &black), 1.0, epsilon = 1e-12);
    }
}
