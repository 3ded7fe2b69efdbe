//! NDR enumerations
//!
//! A MIDL `enum` without `[v1_enum]` travels as an unsigned 16-bit value.
//! Decoding a value outside the declared set fails with
//! [`NdrError::InvalidEnumValue`](crate::NdrError::InvalidEnumValue).

use crate::Result;

/// A closed set of 16-bit wire values
pub trait NdrEnum: Copy + Sized {
    /// Wire value of this variant
    fn to_wire(self) -> u16;

    /// Variant for a wire value
    fn from_wire(value: u16) -> Result<Self>;
}

/// Declare an enum that maps one-to-one onto 16-bit wire values
///
/// The first variant is the `Default`. The macro provides [`NdrEnum`],
/// [`NdrEncode`](crate::NdrEncode) and [`NdrDecode`](crate::NdrDecode).
///
/// ```
/// pla_ndr::ndr_enum! {
///     /// Traffic light
///     pub enum Light {
///         Red = 0,
///         Green = 1,
///     }
/// }
/// assert_eq!(Light::default(), Light::Red);
/// ```
#[macro_export]
macro_rules! ndr_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])*
            $first:ident = $first_value:expr,
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(u16)]
        $vis enum $name {
            $(#[$first_meta])*
            #[default]
            $first = $first_value,
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )*
        }

        impl $crate::NdrEnum for $name {
            fn to_wire(self) -> u16 {
                self as u16
            }

            fn from_wire(value: u16) -> $crate::Result<Self> {
                match value {
                    v if v == $first_value => Ok(Self::$first),
                    $(v if v == $value => Ok(Self::$variant),)*
                    other => Err($crate::NdrError::InvalidEnumValue(i32::from(other))),
                }
            }
        }

        impl $crate::NdrEncode for $name {
            fn ndr_encode<'a>(&'a self, w: &mut $crate::NdrWriter<'a>) -> $crate::Result<()> {
                w.write_enum(*self);
                Ok(())
            }

            fn ndr_align() -> usize {
                2
            }
        }

        impl $crate::NdrDecode for $name {
            fn ndr_decode<'a>(&'a mut self, r: &mut $crate::NdrReader<'a>) -> $crate::Result<()> {
                *self = r.read_enum()?;
                Ok(())
            }

            fn ndr_align() -> usize {
                2
            }
        }
    };
}
