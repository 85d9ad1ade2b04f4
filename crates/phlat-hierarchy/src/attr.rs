//! Class attribute bitmask and magic-dispatch capabilities
//!
//! Each scope carries one `Attr` mask. For every implicit dispatch hook
//! there are three bits: `HAS_*` (declared right here), `MAY_HAVE_*`
//! (somewhere below in the hierarchy) and `INHERITS_*` (somewhere above).
//! Propagation only ever ORs bits in, so re-running a pass is a no-op.

use bitflags::bitflags;

bitflags! {
    /// Attribute bits of a class scope
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Attr: u32 {
        const HAS_UNKNOWN_PROP_GETTER           = 1 << 0;
        const HAS_UNKNOWN_PROP_SETTER           = 1 << 1;
        const HAS_UNKNOWN_PROP_TESTER           = 1 << 2;
        const HAS_PROP_UNSETTER                 = 1 << 3;
        const HAS_UNKNOWN_METHOD_HANDLER        = 1 << 4;
        const HAS_UNKNOWN_STATIC_METHOD_HANDLER = 1 << 5;
        const HAS_INVOKE_METHOD                 = 1 << 6;
        const HAS_ARRAY_ACCESS                  = 1 << 7;

        const MAY_HAVE_UNKNOWN_PROP_GETTER           = 1 << 8;
        const MAY_HAVE_UNKNOWN_PROP_SETTER           = 1 << 9;
        const MAY_HAVE_UNKNOWN_PROP_TESTER           = 1 << 10;
        const MAY_HAVE_PROP_UNSETTER                 = 1 << 11;
        const MAY_HAVE_UNKNOWN_METHOD_HANDLER        = 1 << 12;
        const MAY_HAVE_UNKNOWN_STATIC_METHOD_HANDLER = 1 << 13;
        const MAY_HAVE_INVOKE_METHOD                 = 1 << 14;
        const MAY_HAVE_ARRAY_ACCESS                  = 1 << 15;

        const INHERITS_UNKNOWN_PROP_GETTER           = 1 << 16;
        const INHERITS_UNKNOWN_PROP_SETTER           = 1 << 17;
        const INHERITS_UNKNOWN_PROP_TESTER           = 1 << 18;
        const INHERITS_PROP_UNSETTER                 = 1 << 19;
        const INHERITS_UNKNOWN_METHOD_HANDLER        = 1 << 20;
        const INHERITS_UNKNOWN_STATIC_METHOD_HANDLER = 1 << 21;
        const INHERITS_INVOKE_METHOD                 = 1 << 22;
        const INHERITS_ARRAY_ACCESS                  = 1 << 23;

        const HAS_CONSTRUCTOR     = 1 << 24;
        const HAS_DESTRUCTOR      = 1 << 25;
        const NOT_FINAL           = 1 << 26;
        const SYSTEM              = 1 << 27;
        const EXTENSION           = 1 << 28;
        const USES_UNKNOWN_TRAIT  = 1 << 29;
    }
}

/// One implicit dispatch hook whose presence is tracked through the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Capability {
    PropGetter = 0,
    PropSetter = 1,
    PropTester = 2,
    PropUnsetter = 3,
    MethodHandler = 4,
    StaticMethodHandler = 5,
    InvokeMethod = 6,
    ArrayAccess = 7,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::PropGetter,
        Capability::PropSetter,
        Capability::PropTester,
        Capability::PropUnsetter,
        Capability::MethodHandler,
        Capability::StaticMethodHandler,
        Capability::InvokeMethod,
        Capability::ArrayAccess,
    ];

    /// Bit for "declared on this very scope"
    pub fn has(self) -> Attr {
        Attr::from_bits_retain(1 << (self as u32))
    }

    /// Bit for "present somewhere below in the hierarchy"
    pub fn may_have(self) -> Attr {
        Attr::from_bits_retain(1 << (8 + self as u32))
    }

    /// Bit for "present somewhere above in the hierarchy"
    pub fn inherits(self) -> Attr {
        Attr::from_bits_retain(1 << (16 + self as u32))
    }

    /// All three bits of this capability's triad
    pub fn any(self) -> Attr {
        self.has() | self.may_have() | self.inherits()
    }
}

/// Attribute bit implied by declaring a magic method of the given name.
///
/// Returns an empty mask for ordinary method names.
pub fn magic_method_attr(name: &str) -> Attr {
    if name.eq_ignore_ascii_case("__construct") {
        Attr::HAS_CONSTRUCTOR
    } else if name.eq_ignore_ascii_case("__destruct") {
        Attr::HAS_DESTRUCTOR
    } else if name.eq_ignore_ascii_case("__get") {
        Attr::HAS_UNKNOWN_PROP_GETTER
    } else if name.eq_ignore_ascii_case("__set") {
        Attr::HAS_UNKNOWN_PROP_SETTER
    } else if name.eq_ignore_ascii_case("__isset") {
        Attr::HAS_UNKNOWN_PROP_TESTER
    } else if name.eq_ignore_ascii_case("__unset") {
        Attr::HAS_PROP_UNSETTER
    } else if name.eq_ignore_ascii_case("__call") {
        Attr::HAS_UNKNOWN_METHOD_HANDLER
    } else if name.eq_ignore_ascii_case("__callstatic") {
        Attr::HAS_UNKNOWN_STATIC_METHOD_HANDLER
    } else if name.eq_ignore_ascii_case("__invoke") {
        Attr::HAS_INVOKE_METHOD
    } else {
        Attr::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triads_line_up_with_named_bits() {
        assert_eq!(Capability::PropGetter.has(), Attr::HAS_UNKNOWN_PROP_GETTER);
        assert_eq!(
            Capability::PropGetter.may_have(),
            Attr::MAY_HAVE_UNKNOWN_PROP_GETTER
        );
        assert_eq!(
            Capability::PropGetter.inherits(),
            Attr::INHERITS_UNKNOWN_PROP_GETTER
        );
        assert_eq!(Capability::PropUnsetter.has(), Attr::HAS_PROP_UNSETTER);
        assert_eq!(Capability::ArrayAccess.inherits(), Attr::INHERITS_ARRAY_ACCESS);
        assert_eq!(
            Capability::StaticMethodHandler.may_have(),
            Attr::MAY_HAVE_UNKNOWN_STATIC_METHOD_HANDLER
        );
    }

    #[test]
    fn test_triads_are_disjoint() {
        let mut seen = Attr::empty();
        for cap in Capability::ALL {
            assert!(!seen.intersects(cap.any()));
            seen |= cap.any();
        }
        // structural bits do not collide with any triad
        assert!(!seen.intersects(Attr::HAS_CONSTRUCTOR | Attr::USES_UNKNOWN_TRAIT));
    }

    #[test]
    fn test_magic_method_detection() {
        assert_eq!(magic_method_attr("__get"), Attr::HAS_UNKNOWN_PROP_GETTER);
        assert_eq!(magic_method_attr("__CallStatic"), Attr::HAS_UNKNOWN_STATIC_METHOD_HANDLER);
        assert_eq!(magic_method_attr("__construct"), Attr::HAS_CONSTRUCTOR);
        assert_eq!(magic_method_attr("getName"), Attr::empty());
    }
}
