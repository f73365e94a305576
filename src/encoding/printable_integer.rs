use std::fmt::Display;

/// A primitive integer that can be emitted as a bencode integer literal.
///
/// Integers are always re-rendered from their numeric value, never from
/// retained source text, so the emitted literal can have neither leading
/// zeros nor a `-0` form.
pub trait PrintableInteger: Display {}

macro_rules! impl_integer {
    ($($type:ty)*) => {$(
        impl PrintableInteger for $type {}
    )*}
}

impl_integer!(u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize);
