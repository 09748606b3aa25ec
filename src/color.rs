use anyhow::{anyhow, Context};
use glam::Vec3;

/// A 24-bit sRGB color, stored the way it is written in markup and config
/// files (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0xffffff)
    }

    pub fn hex(self) -> u32 {
        self.0
    }

    /// Accepts `0x2575fc`, `#2575fc` or a plain decimal value.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        let value = value.trim();

        let hex = if let Some(digits) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .or_else(|| value.strip_prefix('#'))
        {
            u32::from_str_radix(digits, 16)
                .with_context(|| format!("Invalid hex color: {:?}", value))?
        } else {
            value
                .parse::<u32>()
                .with_context(|| format!("Invalid color: {:?}", value))?
        };

        if hex > 0xffffff {
            return Err(anyhow!("Color out of range: {:?}", value));
        }

        Ok(Self(hex))
    }

    pub fn to_srgb(self) -> [f32; 3] {
        [
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        ]
    }

    /// Linear-light components, which is what the shaders work in.
    pub fn to_linear(self) -> Vec3 {
        Vec3::from_array(self.to_srgb().map(srgb_to_linear))
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let linear = self.to_linear();
        wgpu::Color {
            r: linear.x as f64,
            g: linear.y as f64,
            b: linear.z as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
