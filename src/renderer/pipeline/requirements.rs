//! Shader Requirements (cache key)
//!
//! [`ShaderRequirements`] is the immutable descriptor a draw call hands to the
//! program cache. Two requirements select the same program if and only if
//! they compare equal memberwise, so the key deliberately carries nothing but
//! plain values.

use std::fmt;

/// How the fragment stage obtains the colour of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TextureVariant {
    /// No input texture.
    #[default]
    None,
    /// Single RGB texture, alpha forced to opaque.
    Rgbx,
    /// Single RGBA texture.
    Rgba,
    /// Three planes: Y, U and V.
    PlanarYuv3Plane,
    /// Two planes: Y and interleaved UV.
    PlanarYuv2Plane,
    /// Y plane plus a packed XUXV plane (YUYV sampled twice).
    PackedYuyv,
    /// Single packed XYUV texture.
    PackedXyuv,
    /// Solid colour from a uniform, no texture.
    Solid,
    /// External image sampled through `samplerExternalOES`.
    External,
}

impl TextureVariant {
    /// Every variant, in declaration order.
    pub const ALL: [TextureVariant; 9] = [
        Self::None,
        Self::Rgbx,
        Self::Rgba,
        Self::PlanarYuv3Plane,
        Self::PlanarYuv2Plane,
        Self::PackedYuyv,
        Self::PackedXyuv,
        Self::Solid,
        Self::External,
    ];

    /// Symbolic name used both in generated `#define`s and in descriptions.
    ///
    /// Must match the `SHADER_VARIANT_*` macros of the fragment template.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::None => "SHADER_VARIANT_NONE",
            Self::Rgbx => "SHADER_VARIANT_RGBX",
            Self::Rgba => "SHADER_VARIANT_RGBA",
            Self::PlanarYuv3Plane => "SHADER_VARIANT_Y_U_V",
            Self::PlanarYuv2Plane => "SHADER_VARIANT_Y_UV",
            Self::PackedYuyv => "SHADER_VARIANT_Y_XUXV",
            Self::PackedXyuv => "SHADER_VARIANT_XYUV",
            Self::Solid => "SHADER_VARIANT_SOLID",
            Self::External => "SHADER_VARIANT_EXTERNAL",
        }
    }

    /// Number of texture sampler slots the variant reads from.
    #[must_use]
    pub const fn texture_count(self) -> usize {
        match self {
            Self::None | Self::Solid => 0,
            Self::Rgbx | Self::Rgba | Self::PackedXyuv | Self::External => 1,
            Self::PlanarYuv2Plane | Self::PackedYuyv => 2,
            Self::PlanarYuv3Plane => 3,
        }
    }
}

impl fmt::Display for TextureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rendering configuration that selects one compiled program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShaderRequirements {
    pub variant: TextureVariant,
    /// Blend a green tint into the output. Used to visualise which surfaces
    /// go through the GL path.
    pub green_tint: bool,
}

impl ShaderRequirements {
    #[inline]
    #[must_use]
    pub const fn new(variant: TextureVariant, green_tint: bool) -> Self {
        Self {
            variant,
            green_tint,
        }
    }

    /// Every distinct key, variant-major.
    pub fn all() -> impl Iterator<Item = ShaderRequirements> {
        TextureVariant::ALL
            .into_iter()
            .flat_map(|variant| [false, true].map(|green_tint| Self::new(variant, green_tint)))
    }

    /// Human-readable description, e.g. `SHADER_VARIANT_RGBA +green`.
    ///
    /// Formatting is deferred until the returned value is displayed.
    #[inline]
    #[must_use]
    pub fn description(&self) -> Description {
        Description(*self)
    }
}

/// Lazily formatted description of a [`ShaderRequirements`].
#[derive(Debug, Clone, Copy)]
pub struct Description(ShaderRequirements);

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0.green_tint { '+' } else { '-' };
        write!(f, "{} {sign}green", self.0.variant)
    }
}
