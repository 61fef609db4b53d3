//! Byte stream contract used by the ghost codec.
//!
//! Values are written as fixed-width little-endian primitives with no tags or
//! length prefixes. Any `bytes::BufMut` is an [`OutStream`] and any
//! `bytes::Buf` is an [`InStream`]; reads are bounds-checked and report a short
//! buffer as [`MeshError::UnexpectedEof`].

use crate::mesh_error::MeshError;
use bytes::{Buf, BufMut};

/// A fixed-width primitive with a little-endian wire form.
pub trait StreamValue: Copy {
    /// Encoded width in bytes.
    const SIZE: usize;

    fn put<B: BufMut + ?Sized>(self, buf: &mut B);

    /// Decode from `buf`; the caller guarantees `SIZE` bytes remain.
    fn take<B: Buf + ?Sized>(buf: &mut B) -> Self;
}

macro_rules! impl_stream_value {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl StreamValue for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn put<B: BufMut + ?Sized>(self, buf: &mut B) {
                    buf.$put(self);
                }

                #[inline]
                fn take<B: Buf + ?Sized>(buf: &mut B) -> Self {
                    buf.$get()
                }
            }
        )*
    };
}

impl_stream_value! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u32 => put_u32_le, get_u32_le;
    i32 => put_i32_le, get_i32_le;
    u64 => put_u64_le, get_u64_le;
    i64 => put_i64_le, get_i64_le;
    f64 => put_f64_le, get_f64_le;
}

/// Write side of the stream contract.
pub trait OutStream {
    fn write_value<T: StreamValue>(&mut self, value: T);

    #[inline]
    fn put_byte(&mut self, byte: u8) {
        self.write_value(byte);
    }

    /// Three `f64` components, x first.
    fn write_point(&mut self, point: &[f64; 3]) {
        for &c in point {
            self.write_value(c);
        }
    }
}

impl<B: BufMut + ?Sized> OutStream for B {
    #[inline]
    fn write_value<T: StreamValue>(&mut self, value: T) {
        value.put(self);
    }
}

/// Read side of the stream contract.
pub trait InStream {
    /// Bytes left to read.
    fn remaining_bytes(&self) -> usize;

    fn read_value<T: StreamValue>(&mut self) -> Result<T, MeshError>;

    #[inline]
    fn get_byte(&mut self) -> Result<u8, MeshError> {
        self.read_value()
    }

    fn read_point(&mut self) -> Result<[f64; 3], MeshError> {
        Ok([self.read_value()?, self.read_value()?, self.read_value()?])
    }
}

impl<B: Buf + ?Sized> InStream for B {
    #[inline]
    fn remaining_bytes(&self) -> usize {
        self.remaining()
    }

    #[inline]
    fn read_value<T: StreamValue>(&mut self) -> Result<T, MeshError> {
        let remaining = self.remaining();
        if remaining < T::SIZE {
            return Err(MeshError::UnexpectedEof {
                needed: T::SIZE,
                remaining,
            });
        }
        Ok(T::take(self))
    }
}
