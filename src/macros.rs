/// Wrapping arithmetic, bitwise operators and integer conversions for a
/// fixed-width address newtype over `$repr`.
macro_rules! address_ops {
    ($name:ident, $repr:ty) => {
        impl From<$repr> for $name {
            fn from(n: $repr) -> Self {
                $name(n)
            }
        }

        impl From<$name> for $repr {
            fn from(ip: $name) -> Self {
                ip.0
            }
        }

        impl ::std::ops::Add<$repr> for $name {
            type Output = Self;

            fn add(self, rhs: $repr) -> Self {
                $name(self.0.wrapping_add(rhs))
            }
        }

        impl ::std::ops::Sub<$repr> for $name {
            type Output = Self;

            fn sub(self, rhs: $repr) -> Self {
                $name(self.0.wrapping_sub(rhs))
            }
        }

        impl ::std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                $name(self.0 & rhs.0)
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                $name(self.0 | rhs.0)
            }
        }

        impl ::std::ops::BitXor for $name {
            type Output = Self;

            fn bitxor(self, rhs: Self) -> Self {
                $name(self.0 ^ rhs.0)
            }
        }

        impl ::std::ops::Not for $name {
            type Output = Self;

            fn not(self) -> Self {
                $name(!self.0)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(self, f)
            }
        }

        impl $crate::hosts::Address for $name {
            fn offset(self, n: u128) -> Self {
                $name(self.0.wrapping_add(n as $repr))
            }
        }
    };
}

/// Serde support through the canonical text form.
macro_rules! text_serde {
    ($name:ty) => {
        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
