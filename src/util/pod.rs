//! Scalar storage types - the primitive field representations in PCD records.

use std::fmt;

/// Storage scalar for one field of a PCD record.
///
/// A PCD header describes each field with a TYPE code (`F` float, `U`
/// unsigned, `I` signed) and a SIZE in bytes. Only the nine combinations
/// below have a storage representation; anything else is rejected when the
/// field layout is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Unsigned 8-bit integer (`U` 1)
    Uint8,
    /// Unsigned 16-bit integer (`U` 2)
    Uint16,
    /// Unsigned 32-bit integer (`U` 4)
    Uint32,
    /// Unsigned 64-bit integer (`U` 8)
    Uint64,
    /// Signed 16-bit integer (`I` 2)
    Int16,
    /// Signed 32-bit integer (`I` 4)
    Int32,
    /// Signed 64-bit integer (`I` 8)
    Int64,
    /// 32-bit floating point (`F` 4)
    Float32,
    /// 64-bit floating point (`F` 8)
    Float64,
}

impl ScalarType {
    /// Resolve a header `(TYPE, SIZE)` pair to its storage scalar.
    pub fn from_header(code: &str, size: usize) -> Option<Self> {
        match (code, size) {
            ("F", 4) => Some(Self::Float32),
            ("F", 8) => Some(Self::Float64),
            ("U", 1) => Some(Self::Uint8),
            ("U", 2) => Some(Self::Uint16),
            ("U", 4) => Some(Self::Uint32),
            ("U", 8) => Some(Self::Uint64),
            ("I", 2) => Some(Self::Int16),
            ("I", 4) => Some(Self::Int32),
            ("I", 8) => Some(Self::Int64),
            _ => None,
        }
    }

    /// Returns the size in bytes of one element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 | Self::Int16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Uint64 | Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Returns the PCD TYPE code for this scalar.
    #[inline]
    pub const fn type_char(self) -> char {
        match self {
            Self::Float32 | Self::Float64 => 'F',
            Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 => 'U',
            Self::Int16 | Self::Int32 | Self::Int64 => 'I',
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_sizes() {
        assert_eq!(ScalarType::Uint8.num_bytes(), 1);
        assert_eq!(ScalarType::Int16.num_bytes(), 2);
        assert_eq!(ScalarType::Float32.num_bytes(), 4);
        assert_eq!(ScalarType::Uint64.num_bytes(), 8);
        assert_eq!(ScalarType::Float64.num_bytes(), 8);
    }

    #[test]
    fn test_header_mapping() {
        assert_eq!(ScalarType::from_header("F", 4), Some(ScalarType::Float32));
        assert_eq!(ScalarType::from_header("U", 1), Some(ScalarType::Uint8));
        assert_eq!(ScalarType::from_header("I", 8), Some(ScalarType::Int64));
    }

    #[test]
    fn test_header_mapping_rejects_unknown_pairs() {
        // no 1- or 2-byte floats, no 1-byte signed, no 3-byte anything
        assert_eq!(ScalarType::from_header("F", 1), None);
        assert_eq!(ScalarType::from_header("F", 2), None);
        assert_eq!(ScalarType::from_header("I", 1), None);
        assert_eq!(ScalarType::from_header("U", 3), None);
        assert_eq!(ScalarType::from_header("X", 4), None);
        assert_eq!(ScalarType::from_header("FF", 4), None);
    }

    #[test]
    fn test_round_trip_through_header_codes() {
        for ty in [
            ScalarType::Uint8,
            ScalarType::Uint16,
            ScalarType::Uint32,
            ScalarType::Uint64,
            ScalarType::Int16,
            ScalarType::Int32,
            ScalarType::Int64,
            ScalarType::Float32,
            ScalarType::Float64,
        ] {
            let code = ty.type_char().to_string();
            assert_eq!(ScalarType::from_header(&code, ty.num_bytes()), Some(ty));
        }
    }
}
