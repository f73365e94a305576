use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
    rc::Rc,
    sync::Arc,
};

use crate::encoding::{Encoder, Error, SingleItemEncoder};

/// An object that can render itself as a single bencode value, or fail
/// with a rendering error.
///
/// This is the one extension point collaborators may use without touching
/// the core grammar: the encoder invokes [`ToBencode::encode`] instead of
/// its own logic whenever a type provides it. Failures from inside an
/// implementation are wrapped with [`Error::render`] and propagate out of
/// the encoding call unchanged.
pub trait ToBencode {
    /// The maximum depth that this object could encode to. Atoms (integers
    /// and byte strings) do not open a container and have depth 0; an
    /// object containing only atoms has depth 1.
    const MAX_DEPTH: usize;

    /// Encode this object into the bencode stream.
    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error>;

    /// Encode this object to a byte string.
    fn to_bencode(&self) -> Result<Vec<u8>, Error> {
        let mut encoder = Encoder::new().with_max_depth(Self::MAX_DEPTH);
        encoder.emit_with(|e| self.encode(e))?;
        encoder.into_bytes()
    }
}

/// Wrapper to encode a byte container as a bencode string element rather
/// than a list of integers.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct AsString<I>(pub I);

// Forwarding impls
impl<'a, E: 'a + ToBencode + Sized> ToBencode for &'a E {
    const MAX_DEPTH: usize = E::MAX_DEPTH;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        E::encode(self, encoder)
    }
}

impl<E: ToBencode> ToBencode for Box<E> {
    const MAX_DEPTH: usize = E::MAX_DEPTH;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        E::encode(self, encoder)
    }
}

impl<E: ToBencode> ToBencode for Rc<E> {
    const MAX_DEPTH: usize = E::MAX_DEPTH;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        E::encode(self, encoder)
    }
}

impl<E: ToBencode> ToBencode for Arc<E> {
    const MAX_DEPTH: usize = E::MAX_DEPTH;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        E::encode(self, encoder)
    }
}

// Base type impls
impl ToBencode for &str {
    const MAX_DEPTH: usize = 0;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_str(self)
    }
}

impl ToBencode for String {
    const MAX_DEPTH: usize = 0;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_str(self)
    }
}

macro_rules! impl_encodable_integer {
    ($($type:ty)*) => {$(
        impl ToBencode for $type {
            const MAX_DEPTH: usize = 0;

            fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
                encoder.emit_int(*self)
            }
        }
    )*}
}

impl_encodable_integer!(u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize);

impl<ContentT: ToBencode> ToBencode for Vec<ContentT> {
    const MAX_DEPTH: usize = ContentT::MAX_DEPTH + 1;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_list(|e| {
            for item in self {
                e.emit(item)?;
            }
            Ok(())
        })
    }
}

impl<ContentT: ToBencode> ToBencode for &[ContentT] {
    const MAX_DEPTH: usize = ContentT::MAX_DEPTH + 1;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_list(|e| {
            for item in *self {
                e.emit(item)?;
            }
            Ok(())
        })
    }
}

impl<K: AsRef<[u8]>, V: ToBencode> ToBencode for BTreeMap<K, V> {
    const MAX_DEPTH: usize = V::MAX_DEPTH + 1;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_dict(|mut e| {
            for (k, v) in self {
                e.emit_pair(k.as_ref(), v)?;
            }
            Ok(())
        })
    }
}

impl<K, V, S> ToBencode for HashMap<K, V, S>
where
    K: AsRef<[u8]> + Eq + Hash,
    V: ToBencode,
    S: BuildHasher,
{
    const MAX_DEPTH: usize = V::MAX_DEPTH + 1;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_dict(|mut e| {
            let mut pairs = self
                .iter()
                .map(|(k, v)| (k.as_ref(), v))
                .collect::<Vec<_>>();
            pairs.sort_by_key(|&(k, _)| k);
            for (k, v) in pairs {
                e.emit_pair(k, v)?;
            }
            Ok(())
        })
    }
}

impl<I> ToBencode for AsString<I>
where
    I: AsRef<[u8]>,
{
    const MAX_DEPTH: usize = 0;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
        encoder.emit_bytes(self.0.as_ref())
    }
}

impl<I> AsRef<[u8]> for AsString<I>
where
    I: AsRef<[u8]>,
{
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}
