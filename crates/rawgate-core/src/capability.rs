//! The immutable capability flags produced by the startup probe.

use std::fmt;
use std::str::FromStr;

use crate::error::CapabilityParseError;

/// A named capability that callers can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The raw provider was located and exposes every required operation.
    Available,
    /// Multi-byte loads and stores may use unaligned addresses.
    UnalignedAccess,
}

impl Capability {
    /// Stable name used by [`FromStr`] and [`fmt::Display`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::UnalignedAccess => "unaligned",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unaligned" | "unaligned_access" => Ok(Self::UnalignedAccess),
            _ => Err(CapabilityParseError {
                name: s.to_string(),
            }),
        }
    }
}

/// Process-wide capability flags, computed once and never mutated.
///
/// Invariant: `unaligned` implies `available`. [`Capabilities::new`]
/// enforces this, so no constructed value can claim unaligned access
/// without the provider behind it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    available: bool,
    unaligned: bool,
}

impl Capabilities {
    /// Flags for a process where the provider could not be used.
    pub const UNAVAILABLE: Self = Self {
        available: false,
        unaligned: false,
    };

    /// Build flags from raw probe results. `unaligned` is masked by
    /// `available`.
    pub const fn new(available: bool, unaligned: bool) -> Self {
        Self {
            available,
            unaligned: available && unaligned,
        }
    }

    /// Whether the raw provider may be used at all.
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Whether multi-byte raw access may use unaligned addresses.
    pub const fn is_unaligned_access_supported(&self) -> bool {
        self.unaligned
    }

    /// Query a flag by capability name.
    pub const fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Available => self.available,
            Capability::UnalignedAccess => self.unaligned,
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "available={} unaligned={}",
            self.available, self.unaligned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaligned_is_masked_by_availability() {
        let caps = Capabilities::new(false, true);
        assert!(!caps.is_available());
        assert!(!caps.is_unaligned_access_supported());
        assert_eq!(caps, Capabilities::UNAVAILABLE);
    }

    #[test]
    fn supports_matches_named_accessors() {
        let caps = Capabilities::new(true, true);
        assert!(caps.supports(Capability::Available));
        assert!(caps.supports(Capability::UnalignedAccess));

        let caps = Capabilities::new(true, false);
        assert!(caps.supports(Capability::Available));
        assert!(!caps.supports(Capability::UnalignedAccess));
    }

    #[test]
    fn capability_names_round_trip() {
        for cap in [Capability::Available, Capability::UnalignedAccess] {
            assert_eq!(cap.name().parse::<Capability>().unwrap(), cap);
        }
        assert_eq!(
            " Unaligned_Access ".parse::<Capability>().unwrap(),
            Capability::UnalignedAccess
        );
    }

    #[test]
    fn unknown_capability_is_rejected() {
        let err = "simd".parse::<Capability>().unwrap_err();
        assert_eq!(err.name, "simd");
        assert_eq!(err.to_string(), "unknown capability: simd");
    }

    #[test]
    fn default_is_unavailable() {
        assert_eq!(Capabilities::default(), Capabilities::UNAVAILABLE);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unaligned_never_outlives_availability(available: bool, unaligned: bool) {
                let caps = Capabilities::new(available, unaligned);
                prop_assert_eq!(caps.is_available(), available);
                prop_assert!(!caps.is_unaligned_access_supported() || caps.is_available());
                prop_assert_eq!(caps.supports(Capability::UnalignedAccess), available && unaligned);
            }

            #[test]
            fn capability_parse_ignores_case_and_padding(
                upper: bool,
                pad in "[ \t]{0,3}",
            ) {
                for cap in [Capability::Available, Capability::UnalignedAccess] {
                    let name = if upper {
                        cap.name().to_ascii_uppercase()
                    } else {
                        cap.name().to_string()
                    };
                    let text = format!("{pad}{name}{pad}");
                    prop_assert_eq!(text.parse::<Capability>().ok(), Some(cap));
                }
            }
        }
    }
}
