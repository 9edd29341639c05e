//! Macros for reducing boilerplate on closed string-valued enums
//!
//! Regions, environments and credential classes all travel as short
//! lowercase strings (CLI arguments, config file values, env-var segments).
//! This macro derives the conversions in one place so every such enum
//! parses and prints identically.

/// Generate `Display`, `FromStr`, `as_str` and an `ALL` table for a
/// string-valued enum.
///
/// # Usage
///
/// ```rust
/// use ciam_domain::impl_domain_enum_conversions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// pub enum Tier {
///     Gold,
///     Silver,
/// }
///
/// impl_domain_enum_conversions!(Tier {
///     Gold => "gold",
///     Silver => "silver",
/// });
///
/// assert_eq!("GOLD".parse::<Tier>().unwrap(), Tier::Gold);
/// assert_eq!(Tier::ALL.len(), 2);
/// ```
///
/// Parsing is case-insensitive and trims whitespace. Unknown values produce
/// `CiamError::InvalidInput` naming every valid option.
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Canonical lowercase spelling.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }

            /// Comma separated list of valid spellings, for error messages.
            pub fn valid_values() -> String {
                [$($str),+].join(", ")
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::CiamError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::CiamError::InvalidInput(format!(
                        "invalid {} '{}' (valid: {})",
                        stringify!($enum_name).to_lowercase(),
                        s,
                        Self::valid_values()
                    ))),
                }
            }
        }
    };
}
