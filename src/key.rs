//! Supported key kinds.
//!
//! A key is routed to a hash function through [`KeyRepr`], a closed set of
//! variants: integers, byte strings, and one open arm for caller types that
//! implement [`Hashable`]. The routing is fixed by the key type, so it is
//! resolved at compile time rather than per operation. A type that is none
//! of these does not satisfy [`DictKey`] and cannot be used as a key.

/// Caller-defined hashing for custom key types.
///
/// `hash_code` must return the full, unreduced value: the dictionary owns the
/// reduction to a bucket index and mixes the code per table. Keys that compare
/// equal must return equal codes.
pub trait Hashable {
    fn hash_code(&self) -> u64;
}

/// The hashing route for one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRepr<'a> {
    Int(u64),
    Bytes(&'a [u8]),
    Custom(u64),
}

/// Key types the dictionary can hash.
///
/// Implemented for the integer and string kinds, and for every
/// `T: Hashable + Eq`. Borrowed forms must agree with their owned forms
/// (`String` and `str` produce the same `KeyRepr`).
pub trait DictKey: Eq {
    fn repr(&self) -> KeyRepr<'_>;
}

macro_rules! int_key {
    ($($t:ty),*) => {
        $(
            impl DictKey for $t {
                #[inline]
                fn repr(&self) -> KeyRepr<'_> {
                    KeyRepr::Int(*self as u64)
                }
            }
        )*
    };
}

int_key!(u32, u64, i32, i64, usize);

impl DictKey for str {
    #[inline]
    fn repr(&self) -> KeyRepr<'_> {
        KeyRepr::Bytes(self.as_bytes())
    }
}

impl DictKey for String {
    #[inline]
    fn repr(&self) -> KeyRepr<'_> {
        KeyRepr::Bytes(self.as_bytes())
    }
}

impl DictKey for Box<str> {
    #[inline]
    fn repr(&self) -> KeyRepr<'_> {
        KeyRepr::Bytes(self.as_bytes())
    }
}

impl<'s> DictKey for &'s str {
    #[inline]
    fn repr(&self) -> KeyRepr<'_> {
        KeyRepr::Bytes(self.as_bytes())
    }
}

impl<T: Hashable + Eq> DictKey for T {
    #[inline]
    fn repr(&self) -> KeyRepr<'_> {
        KeyRepr::Custom(self.hash_code())
    }
}
