use std::fmt;

/// Reasons a decode request can fail.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A read fell outside the table, or counts and offsets inside the table disagree.
    Malformed,
    /// The requested table, record, name or mapping does not exist.
    NotFound,
    /// The table uses a version or format this crate does not decode.
    UnsupportedFormat,
    /// `post` format 3.0 carries no glyph names.
    NoGlyphNames,
    /// A composite glyph nests deeper, or has more components, than allowed.
    LimitExceeded,
    /// The glyph id is outside the range covered by the font.
    InvalidGlyphId,
}

impl DecodeError {
    /// The integer code used by C-style callers of the `post` lookup.
    ///
    /// `-1` not found, `-2` no names in the table, `-3` any other failure.
    pub fn sentinel(self) -> i32 {
        match self {
            DecodeError::NotFound => -1,
            DecodeError::NoGlyphNames => -2,
            _ => -3,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DecodeError::Malformed => "malformed table",
            DecodeError::NotFound => "not found",
            DecodeError::UnsupportedFormat => "unsupported table version or format",
            DecodeError::NoGlyphNames => "post table has no glyph names",
            DecodeError::LimitExceeded => "composite glyph exceeds component limits",
            DecodeError::InvalidGlyphId => "glyph id out of range",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for DecodeError {}

impl From<bytes::TryGetError> for DecodeError {
    fn from(_value: bytes::TryGetError) -> Self {
        Self::Malformed
    }
}

pub(crate) fn usize_will_overflow(a: usize, b: usize) -> bool {
    a.checked_add(b).is_none()
}

#[cfg(not(feature = "debug"))]
mod regular {
    macro_rules! bail {
        () => {
            return Err(DecodeError::Malformed)
        };
        ($err: expr) => {
            return Err($err)
        };
    }
    pub(crate) use bail;

    macro_rules! bail_if {
        ($cond: expr) => {
            if $cond {
                return Err(DecodeError::Malformed);
            }
        };
        ($cond: expr, $err: expr) => {
            if $cond {
                return Err($err);
            }
        };
    }
    pub(crate) use bail_if;

    macro_rules! bail_with_msg_if {
        ($cond: expr, $err: expr, $($msg:tt),*) => {
            if $cond {
                log::debug!($($msg),*);
                return Err($err);
            }
        };
    }
    pub(crate) use bail_with_msg_if;
}
#[cfg(not(feature = "debug"))]
pub(crate) use regular::*;

#[cfg(feature = "debug")]
mod debug {
    macro_rules! bail {
        () => {
            panic!()
        };
        ($err: expr) => {
            panic!("{:?}", $err)
        };
    }
    pub(crate) use bail;

    macro_rules! bail_if {
        ($cond: expr) => {
            if $cond {
                panic!("{}", stringify!($cond))
            }
        };
        ($cond: expr, $err: expr) => {
            if $cond {
                panic!("{}: {:?}", stringify!($cond), $err)
            }
        };
    }
    pub(crate) use bail_if;

    macro_rules! bail_with_msg_if {
        ($cond: expr, $err: expr, $($msg:tt),*) => {
            if $cond {
                panic!($($msg),*);
            }
        };
    }
    pub(crate) use bail_with_msg_if;
}
#[cfg(feature = "debug")]
pub(crate) use debug::*;
