//! Sample formats.
//!
//! Filters do their arithmetic on unit range `f32` samples, i.e. integer
//! samples with `bits` significant bits are mapped from `[0, 2^bits - 1]` to
//! `[0, 1]` and back. Floating point samples are already in unit range.

use crate::ImageError;

/// Whether samples are stored as integers or floats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned integer samples.
    Integer,
    /// Floating point samples.
    Float,
}

/// The storage format of a plane sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleFormat {
    /// Integer or float storage.
    pub sample_type: SampleType,
    /// Number of significant bits per sample.
    pub bits_per_sample: u32,
}

impl SampleFormat {
    /// Largest representable value, `1.0` for float formats.
    pub fn peak(&self) -> f32 {
        match self.sample_type {
            SampleType::Integer => ((1u32 << self.bits_per_sample) - 1) as f32,
            SampleType::Float => 1.0,
        }
    }

    /// Mid-range value of the format, e.g. 128 for 8 bit samples.
    pub fn neutral(&self) -> f32 {
        match self.sample_type {
            SampleType::Integer => (1u32 << (self.bits_per_sample - 1)) as f32,
            SampleType::Float => 0.5,
        }
    }

    /// Scale a unit range value to this format, e.g. `0.5` to `128` in 8 bit.
    pub fn scale(&self, value: f32) -> f32 {
        match self.sample_type {
            SampleType::Integer => value * self.peak(),
            SampleType::Float => value,
        }
    }
}

/// A pixel sample that can be converted to and from unit range `f32`.
pub trait Sample: Copy + Default + Send + Sync + 'static {
    /// Integer or float storage.
    const SAMPLE_TYPE: SampleType;

    /// Maximum number of bits the type can hold.
    const MAX_BITS: u32;

    /// Convert the sample to unit range given `bits` significant bits.
    fn to_unit(self, bits: u32) -> f32;

    /// Convert a unit range value to the sample, rounding and clamping integers.
    fn from_unit(value: f32, bits: u32) -> Self;

    /// The default format of the type, using all of its bits.
    fn format() -> SampleFormat {
        SampleFormat {
            sample_type: Self::SAMPLE_TYPE,
            bits_per_sample: Self::MAX_BITS,
        }
    }

    /// Check that `bits` can be stored in this sample type.
    fn check_bits(bits: u32) -> Result<(), ImageError> {
        let valid = match Self::SAMPLE_TYPE {
            SampleType::Integer => (1..=Self::MAX_BITS).contains(&bits),
            SampleType::Float => bits == Self::MAX_BITS,
        };
        if !valid {
            return Err(ImageError::UnsupportedBitDepth(
                bits,
                std::any::type_name::<Self>(),
            ));
        }
        Ok(())
    }
}

#[inline]
fn integer_peak(bits: u32) -> f32 {
    ((1u32 << bits) - 1) as f32
}

impl Sample for u8 {
    const SAMPLE_TYPE: SampleType = SampleType::Integer;
    const MAX_BITS: u32 = 8;

    fn to_unit(self, bits: u32) -> f32 {
        self as f32 / integer_peak(bits)
    }

    fn from_unit(value: f32, bits: u32) -> Self {
        (value * integer_peak(bits))
            .round()
            .clamp(0.0, integer_peak(bits)) as u8
    }
}

impl Sample for u16 {
    const SAMPLE_TYPE: SampleType = SampleType::Integer;
    const MAX_BITS: u32 = 16;

    fn to_unit(self, bits: u32) -> f32 {
        self as f32 / integer_peak(bits)
    }

    fn from_unit(value: f32, bits: u32) -> Self {
        (value * integer_peak(bits))
            .round()
            .clamp(0.0, integer_peak(bits)) as u16
    }
}

impl Sample for f32 {
    const SAMPLE_TYPE: SampleType = SampleType::Float;
    const MAX_BITS: u32 = 32;

    fn to_unit(self, _bits: u32) -> f32 {
        self
    }

    fn from_unit(value: f32, _bits: u32) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_round_trip_extremes() {
        assert_eq!(u8::from_unit(0u8.to_unit(8), 8), 0);
        assert_eq!(u8::from_unit(255u8.to_unit(8), 8), 255);
        assert_eq!(u8::from_unit(1.7, 8), 255);
        assert_eq!(u8::from_unit(-0.2, 8), 0);
    }

    #[test]
    fn test_u16_ten_bits() {
        assert_eq!(1023u16.to_unit(10), 1.0);
        assert_eq!(u16::from_unit(0.5, 10), 512);
    }

    #[test]
    fn test_check_bits() {
        assert!(u16::check_bits(10).is_ok());
        assert!(u8::check_bits(9).is_err());
        assert!(f32::check_bits(16).is_err());
        assert!(f32::check_bits(32).is_ok());
    }

    #[test]
    fn test_format_constants() {
        let fmt = u8::format();
        assert_eq!(fmt.peak(), 255.0);
        assert_eq!(fmt.neutral(), 128.0);
        assert_eq!(fmt.scale(0.5), 127.5);
        assert_eq!(f32::format().peak(), 1.0);
        assert_eq!(f32::format().neutral(), 0.5);
    }
}
