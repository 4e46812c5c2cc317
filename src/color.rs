//! A [`Color`] represents a color specified in any of the supported color
//! spaces, as a space tag, three ordered components, an alpha value and
//! markers for missing ("none") components.

use bitflags::bitflags;

use crate::space::Space;

/// A 64-bit floating point value that all components are stored as.
///
/// The gamut mapping thresholds used by this crate (the 1e-15 slab
/// parallelism cutoff, the 1e-16 zero-JND substitute) are below f32
/// resolution, so components are always f64.
pub type Component = f64;

/// Represent the three components that describe any color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Components(pub Component, pub Component, pub Component);

impl Components {
    /// Return new components with each component mapped with the given
    /// function.
    pub fn map(&self, f: impl Fn(Component) -> Component) -> Self {
        Self(f(self.0), f(self.1), f(self.2))
    }
}

bitflags! {
    /// Flags to mark any missing components on a [`Color`].
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Flags : u8 {
        /// Set when the first component of a [`Color`] is missing.
        const C0_IS_NONE = 1 << 0;
        /// Set when the second component of a [`Color`] is missing.
        const C1_IS_NONE = 1 << 1;
        /// Set when the third component of a [`Color`] is missing.
        const C2_IS_NONE = 1 << 2;
        /// Set when the alpha component of a [`Color`] is missing.
        const ALPHA_IS_NONE = 1 << 3;
    }
}

impl Flags {
    /// The flag marking component `index` (0..=2) as missing.
    pub(crate) fn for_component(index: usize) -> Flags {
        match index {
            0 => Flags::C0_IS_NONE,
            1 => Flags::C1_IS_NONE,
            _ => Flags::C2_IS_NONE,
        }
    }
}

/// Struct that can hold a color of any of the supported color spaces.
///
/// Missing components are stored as `0.0` with the matching flag set, so
/// range checks and distance computations see them as zero.
#[derive(Clone, Debug)]
pub struct Color {
    /// The three components that make up any color.
    pub components: Components,
    /// The alpha component of the color.
    pub alpha: Component,
    /// Holds any flags that might be enabled for this color.
    pub flags: Flags,
    /// The color space in which the components are set.
    pub space: Space,
}

impl Color {
    /// Create a new [`Color`]. Each color or alpha component can take values
    /// that can be converted into a [`ComponentDetails`]. This automates the
    /// process of setting values to missing. For example:
    /// ```rust
    /// use ingamut::{Color, Space};
    /// let c = Color::new(Space::Srgb, None, None, None, 1.0);
    /// ```
    /// will set all the color components to missing.
    pub fn new(
        space: Space,
        c0: impl Into<ComponentDetails>,
        c1: impl Into<ComponentDetails>,
        c2: impl Into<ComponentDetails>,
        alpha: impl Into<ComponentDetails>,
    ) -> Self {
        let mut flags = Flags::empty();

        let c0 = c0.into().value_and_flag(&mut flags, Flags::C0_IS_NONE);
        let c1 = c1.into().value_and_flag(&mut flags, Flags::C1_IS_NONE);
        let c2 = c2.into().value_and_flag(&mut flags, Flags::C2_IS_NONE);
        let alpha = alpha
            .into()
            .value_and_flag(&mut flags, Flags::ALPHA_IS_NONE);

        Self {
            components: Components(c0, c1, c2),
            alpha,
            flags,
            space,
        }
    }

    /// Return the first component of the color.
    pub fn c0(&self) -> Option<Component> {
        if self.flags.contains(Flags::C0_IS_NONE) {
            None
        } else {
            Some(self.components.0)
        }
    }

    /// Return the second component of the color.
    pub fn c1(&self) -> Option<Component> {
        if self.flags.contains(Flags::C1_IS_NONE) {
            None
        } else {
            Some(self.components.1)
        }
    }

    /// Return the third component of the color.
    pub fn c2(&self) -> Option<Component> {
        if self.flags.contains(Flags::C2_IS_NONE) {
            None
        } else {
            Some(self.components.2)
        }
    }

    /// Return the alpha component of the color.
    pub fn alpha(&self) -> Option<Component> {
        if self.flags.contains(Flags::ALPHA_IS_NONE) {
            None
        } else {
            Some(self.alpha)
        }
    }

    /// Read the component at `index` (0..=2), treating a missing component
    /// as zero.
    pub fn get(&self, index: usize) -> Component {
        if self.flags.contains(Flags::for_component(index)) {
            return 0.0;
        }
        match index {
            0 => self.components.0,
            1 => self.components.1,
            _ => self.components.2,
        }
    }

    /// Write the component at `index` (0..=2), clearing its missing marker.
    pub fn set(&mut self, index: usize, value: Component) {
        self.flags.remove(Flags::for_component(index));
        match index {
            0 => self.components.0 = value,
            1 => self.components.1 = value,
            _ => self.components.2 = value,
        }
    }
}

/// A struct that holds details about a component passed to [`Color::new`].
/// Any component that can be passed implements `From<?> for ComponentDetails`.
pub struct ComponentDetails {
    value: Component,
    is_none: bool,
}

impl ComponentDetails {
    /// Extract the value and set the given flag if the component is none.
    pub fn value_and_flag(&self, flags: &mut Flags, flag: Flags) -> Component {
        if self.is_none {
            *flags |= flag;
        }
        self.value
    }
}

impl From<Component> for ComponentDetails {
    fn from(value: Component) -> Self {
        Self {
            value,
            is_none: false,
        }
    }
}

impl From<Option<Component>> for ComponentDetails {
    fn from(value: Option<Component>) -> Self {
        if let Some(value) = value {
            Self::from(value)
        } else {
            Self {
                value: 0.0,
                is_none: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_color_with_correct_components() {
        let c = Color::new(Space::Srgb, 0.1, 0.2, 0.3, 0.4);
        assert_eq!(c.components, Components(0.1, 0.2, 0.3));
        assert_eq!(c.alpha, 0.4);
        assert_eq!(c.flags, Flags::empty());
        assert_eq!(c.space, Space::Srgb);

        let c = Color::new(Space::Srgb, 0.1, 0.2, None, 0.4);
        assert_eq!(c.components.2, 0.0);
        assert_eq!(c.alpha, 0.4);
        assert_eq!(c.flags, Flags::C2_IS_NONE);
        assert_eq!(c.space, Space::Srgb);

        let c = Color::new(Space::Srgb, 0.1, 0.2, 0.3, None);
        assert_eq!(c.components, Components(0.1, 0.2, 0.3));
        assert_eq!(c.alpha, 0.0);
        assert_eq!(c.flags, Flags::ALPHA_IS_NONE);
        assert_eq!(c.space, Space::Srgb);
    }

    #[test]
    fn get_treats_missing_components_as_zero() {
        let c = Color::new(Space::Oklch, 0.7, None, 30.0, 1.0);
        assert_eq!(c.get(0), 0.7);
        assert_eq!(c.get(1), 0.0);
        assert_eq!(c.get(2), 30.0);
    }

    #[test]
    fn set_clears_the_missing_marker() {
        let mut c = Color::new(Space::Oklch, 0.7, None, 30.0, 1.0);
        c.set(1, 0.2);
        assert_eq!(c.get(1), 0.2);
        assert_eq!(c.flags, Flags::empty());
    }

    #[test]
    fn test_component_details() {
        let cd = ComponentDetails::from(10.0);
        assert_eq!(cd.value, 10.0);
        assert!(!cd.is_none);

        let cd = ComponentDetails::from(Some(20.0));
        assert_eq!(cd.value, 20.0);
        assert!(!cd.is_none);

        let cd = ComponentDetails::from(None);
        assert_eq!(cd.value, 0.0);
        assert!(cd.is_none);

        let cd = ComponentDetails::from(Some(Component::NAN));
        assert!(cd.value.is_nan());
        assert!(!cd.is_none);
    }
}
