//! Shared macros for the configuration types

/// Declare a closed flag set
///
/// Every member is a bit or a union of bits, and membership follows subset
/// semantics: `a` is in `b` when `a & b == a`. The generated type is a
/// `u32` newtype that encodes as a plain integer and decodes from either an
/// integer (which must only use known bits) or a member name such as
/// `"MetricsType.OptimizedCircuit"` or `"DefaultMappingPass|ContextSimp"`.
macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$member_meta:meta])*
                const $member:ident = $bits:expr => $label:literal;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$member_meta])*
                pub const $member: Self = Self($bits);
            )+

            /// Every named member, composites included, in declaration order
            pub const MEMBERS: &'static [(&'static str, Self)] = &[
                $(($label, Self::$member),)+
            ];

            /// Union of every known bit
            pub const ALL: Self = Self(0 $(| $bits)+);

            pub const fn bits(&self) -> u32 {
                self.0
            }

            /// `None` when `bits` uses an unknown bit
            pub const fn from_bits(bits: u32) -> Option<Self> {
                if bits & !Self::ALL.0 == 0 {
                    Some(Self(bits))
                } else {
                    None
                }
            }

            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            pub const fn intersection(self, other: Self) -> Self {
                Self(self.0 & other.0)
            }

            /// `other` is a subset of `self`
            pub const fn contains(&self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn intersects(&self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            /// Single-bit members set in `self`
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, Self)> + '_ {
                Self::MEMBERS
                    .iter()
                    .copied()
                    .filter(move |(_, member)| {
                        member.0.is_power_of_two() && self.contains(*member)
                    })
            }

            /// Name of the member equal to `self`, if any
            pub fn name(&self) -> Option<&'static str> {
                Self::MEMBERS
                    .iter()
                    .find(|(_, member)| member == self)
                    .map(|(label, _)| *label)
            }

            /// Parse `Member`, `Type.Member` or `Type.A|B`
            pub fn from_name(text: &str) -> Option<Self> {
                let text = text.trim();
                let text = text
                    .strip_prefix(concat!(stringify!($name), "."))
                    .unwrap_or(text);
                let mut bits = 0;
                for part in text.split('|') {
                    let part = part.trim();
                    let part = part
                        .strip_prefix(concat!(stringify!($name), "."))
                        .unwrap_or(part);
                    let (_, member) = Self::MEMBERS
                        .iter()
                        .find(|(label, _)| *label == part)?;
                    bits |= member.0;
                }
                Some(Self(bits))
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                self.intersection(rhs)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if let Some(label) = self.name() {
                    return write!(f, "{}.{}", stringify!($name), label);
                }
                let labels: Vec<&str> = self.iter().map(|(label, _)| label).collect();
                if labels.is_empty() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}.{}", stringify!($name), labels.join("|"))
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = String;

            fn try_from(bits: u32) -> Result<Self, Self::Error> {
                Self::from_bits(bits).ok_or_else(|| {
                    format!("{} is not a valid {}", bits, stringify!($name))
                })
            }
        }

        impl From<$name> for u32 {
            fn from(flags: $name) -> u32 {
                flags.0
            }
        }

        impl From<$name> for tagged_codec::Value {
            fn from(flags: $name) -> Self {
                tagged_codec::Value::Int(i64::from(flags.0))
            }
        }

        impl tagged_codec::FromValue for $name {
            fn from_value(
                value: tagged_codec::Value,
            ) -> Result<Self, tagged_codec::ValueMismatch> {
                let expected = stringify!($name);
                match value {
                    tagged_codec::Value::Int(bits) => u32::try_from(bits)
                        .ok()
                        .and_then(Self::from_bits)
                        .ok_or_else(|| {
                            tagged_codec::ValueMismatch::new(expected, format!("int {}", bits))
                        }),
                    tagged_codec::Value::Str(text) => Self::from_name(&text).ok_or_else(|| {
                        tagged_codec::ValueMismatch::new(expected, format!("str '{}'", text))
                    }),
                    other => Err(tagged_codec::ValueMismatch::new(expected, other.type_name())),
                }
            }
        }
    };
}
