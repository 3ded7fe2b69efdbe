//! NDR pointer types
//!
//! NDR supports three pointer semantics:
//!
//! - Reference (`[ref]`): non-null, data follows inline, no wire representation
//! - Unique (`[unique]`): nullable, 4-byte referent ID, body deferred
//! - Full (`[ptr]`): nullable, 4-byte referent ID, body deferred
//!
//! Full pointers are marshalled exactly like unique pointers. No referent
//! table is kept, so two full pointers to the same value are sent as two
//! bodies and decode as two independent values.

use std::ops::{Deref, DerefMut};

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

/// Trait for NDR pointer types
pub trait NdrPtr {
    type Target;

    /// Check if the pointer is null
    fn is_null(&self) -> bool;

    /// Get the inner value, if any
    fn get(&self) -> Option<&Self::Target>;

    /// Get a mutable reference to the inner value, if any
    fn get_mut(&mut self) -> Option<&mut Self::Target>;
}

/// Reference pointer - non-null, data follows inline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefPtr<T>(pub T);

impl<T> RefPtr<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for RefPtr<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for RefPtr<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> NdrPtr for RefPtr<T> {
    type Target = T;

    fn is_null(&self) -> bool {
        false
    }

    fn get(&self) -> Option<&T> {
        Some(&self.0)
    }

    fn get_mut(&mut self) -> Option<&mut T> {
        Some(&mut self.0)
    }
}

impl<T: NdrEncode> NdrEncode for RefPtr<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        self.0.ndr_encode(w)
    }

    fn ndr_align() -> usize {
        T::ndr_align()
    }
}

impl<T: NdrDecode> NdrDecode for RefPtr<T> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        self.0.ndr_decode(r)
    }

    fn ndr_align() -> usize {
        T::ndr_align()
    }
}

macro_rules! deferred_pointer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name<T>(pub Option<Box<T>>);

        impl<T> $name<T> {
            pub fn new(value: T) -> Self {
                Self(Some(Box::new(value)))
            }

            pub fn null() -> Self {
                Self(None)
            }

            pub fn into_inner(self) -> Option<T> {
                self.0.map(|b| *b)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self(None)
            }
        }

        impl<T> From<Option<T>> for $name<T> {
            fn from(value: Option<T>) -> Self {
                Self(value.map(Box::new))
            }
        }

        impl<T> NdrPtr for $name<T> {
            type Target = T;

            fn is_null(&self) -> bool {
                self.0.is_none()
            }

            fn get(&self) -> Option<&T> {
                self.0.as_deref()
            }

            fn get_mut(&mut self) -> Option<&mut T> {
                self.0.as_deref_mut()
            }
        }

        impl<T: NdrEncode> NdrEncode for $name<T> {
            fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
                w.write_pointer(self.0.as_deref());
                Ok(())
            }

            fn ndr_align() -> usize {
                4
            }
        }

        impl<T: NdrDecode + Default> NdrDecode for $name<T> {
            fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
                r.read_pointer(&mut self.0)
            }

            fn ndr_align() -> usize {
                4
            }
        }
    };
}

deferred_pointer!(
    /// Unique pointer - nullable, body deferred, no aliasing
    UniquePtr
);

deferred_pointer!(
    /// Full pointer - marshalled as a unique pointer
    FullPtr
);
