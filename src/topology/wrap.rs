//! Periodic-boundary ("wrap") algebra.
//!
//! A wrapping world (cylinder, torus, ...) identifies opposite sides of a
//! fundamental tile. When a relation between two elements crosses such a
//! boundary, an attribute of the far element (typically a position) has to be
//! shifted by one period to be seen from the near element's frame.
//!
//! # Encoding
//!
//! A [`WrapOffset`] is a 4-bit group of flags `{+axis0, -axis0, +axis1, -axis1}`.
//! An [`EdgeWrap`] packs eight such groups into 32 bits, one per
//! [`WrapRelation`] of a half-edge:
//!
//! | Group | Relation | From | To |
//! |-------|----------|------|----|
//! | 0 | `VertToVert` | near vertex | far vertex |
//! | 1 | `VertToEdge` | near vertex | edge |
//! | 2 | `VertToFace` | near vertex | far face |
//! | 3 | `EdgeToVert` | edge | far vertex |
//! | 4 | `EdgeToFace` | edge | far face |
//! | 5 | `FaceToVert` | near face | far vertex |
//! | 6 | `FaceToEdge` | near face | edge |
//! | 7 | `FaceToFace` | near face | far face |
//!
//! The offset stored for `X -> Y` is the shift applied to the canonical
//! position of `Y` to express it in the frame of `X`. Offsets compose by
//! OR-ing the flags and cancelling opposite flags on the same axis
//! ([`WrapOffset::normalize`]).

use std::fmt;
use std::ops::BitOr;

/// Mask of the `+` flag of both axes within a group, repeated over all groups.
const POSITIVE_BITS: u32 = 0x5555_5555;
/// Mask of the `-` flag of both axes within a group, repeated over all groups.
const NEGATIVE_BITS: u32 = 0xAAAA_AAAA;

/// A periodic offset along two axes, one 4-bit group of an [`EdgeWrap`].
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct WrapOffset(u8);

impl WrapOffset {
    /// No offset.
    pub const NONE: Self = Self(0);
    /// One period forward along axis 0.
    pub const POS_AXIS0: Self = Self(0b0001);
    /// One period backward along axis 0.
    pub const NEG_AXIS0: Self = Self(0b0010);
    /// One period forward along axis 1.
    pub const POS_AXIS1: Self = Self(0b0100);
    /// One period backward along axis 1.
    pub const NEG_AXIS1: Self = Self(0b1000);

    /// Create an offset from raw flag bits. Bits above the low nibble are ignored.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    /// Create an offset from signed steps per axis. Only the sign of each step is kept.
    pub fn from_steps(axis0: i32, axis1: i32) -> Self {
        let mut bits = 0;
        bits |= match axis0.signum() {
            1 => Self::POS_AXIS0.0,
            -1 => Self::NEG_AXIS0.0,
            _ => 0,
        };
        bits |= match axis1.signum() {
            1 => Self::POS_AXIS1.0,
            -1 => Self::NEG_AXIS1.0,
            _ => 0,
        };
        Self(bits)
    }

    /// Get the raw flag bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Signed step along axis 0 (`-1`, `0` or `1`). Cancelling flags count as zero.
    #[inline]
    pub fn axis0(self) -> i32 {
        (self.0 & 0b0001) as i32 - ((self.0 & 0b0010) >> 1) as i32
    }

    /// Signed step along axis 1 (`-1`, `0` or `1`). Cancelling flags count as zero.
    #[inline]
    pub fn axis1(self) -> i32 {
        ((self.0 & 0b0100) >> 2) as i32 - ((self.0 & 0b1000) >> 3) as i32
    }

    /// Check whether no (non-cancelling) flag is set.
    #[inline]
    pub fn is_none(self) -> bool {
        self.normalize().0 == 0
    }

    /// Clear both flags of any axis on which `+` and `-` are set together.
    #[inline]
    pub fn normalize(self) -> Self {
        Self(EdgeWrap(self.0 as u32).normalize().0 as u8)
    }

    /// The offset as seen from the opposite direction (`+` and `-` swapped).
    #[inline]
    pub fn invert(self) -> Self {
        Self(swap_signs(self.0 as u32) as u8)
    }

    /// Compose `self` (X -> Y) with `next` (Y -> Z), giving X -> Z.
    #[inline]
    pub fn chain(self, next: WrapOffset) -> Self {
        Self(self.0 | next.0).normalize()
    }
}

impl BitOr for WrapOffset {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for WrapOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrapOffset({:+}, {:+})", self.axis0(), self.axis1())
    }
}

/// The eight relations a half-edge carries a [`WrapOffset`] for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum WrapRelation {
    /// Near vertex to far vertex.
    VertToVert = 0,
    /// Near vertex to edge.
    VertToEdge = 1,
    /// Near vertex to far face.
    VertToFace = 2,
    /// Edge to far vertex.
    EdgeToVert = 3,
    /// Edge to far face.
    EdgeToFace = 4,
    /// Near face to far vertex.
    FaceToVert = 5,
    /// Near face to edge.
    FaceToEdge = 6,
    /// Near face to far face.
    FaceToFace = 7,
}

impl WrapRelation {
    /// All relations in group order.
    pub const ALL: [WrapRelation; 8] = [
        WrapRelation::VertToVert,
        WrapRelation::VertToEdge,
        WrapRelation::VertToFace,
        WrapRelation::EdgeToVert,
        WrapRelation::EdgeToFace,
        WrapRelation::FaceToVert,
        WrapRelation::FaceToEdge,
        WrapRelation::FaceToFace,
    ];

    /// Bit position of this relation's group within an [`EdgeWrap`].
    #[inline]
    pub const fn shift(self) -> u32 {
        (self as u32) * 4
    }

    /// The relation the same flags describe when the half-edge is seen from its twin.
    pub const fn reversed(self) -> Self {
        match self {
            WrapRelation::VertToVert => WrapRelation::VertToVert,
            WrapRelation::VertToEdge => WrapRelation::EdgeToVert,
            WrapRelation::VertToFace => WrapRelation::FaceToVert,
            WrapRelation::EdgeToVert => WrapRelation::VertToEdge,
            WrapRelation::EdgeToFace => WrapRelation::FaceToEdge,
            WrapRelation::FaceToVert => WrapRelation::VertToFace,
            WrapRelation::FaceToEdge => WrapRelation::EdgeToFace,
            WrapRelation::FaceToFace => WrapRelation::FaceToFace,
        }
    }

    /// The relation with the roles of vertices and faces exchanged.
    pub const fn dual(self) -> Self {
        match self {
            WrapRelation::VertToVert => WrapRelation::FaceToFace,
            WrapRelation::VertToEdge => WrapRelation::FaceToEdge,
            WrapRelation::VertToFace => WrapRelation::FaceToVert,
            WrapRelation::EdgeToVert => WrapRelation::EdgeToFace,
            WrapRelation::EdgeToFace => WrapRelation::EdgeToVert,
            WrapRelation::FaceToVert => WrapRelation::VertToFace,
            WrapRelation::FaceToEdge => WrapRelation::VertToEdge,
            WrapRelation::FaceToFace => WrapRelation::VertToVert,
        }
    }
}

const TARGET_VERT: [WrapRelation; 3] = [
    WrapRelation::VertToVert,
    WrapRelation::EdgeToVert,
    WrapRelation::FaceToVert,
];
const SOURCE_VERT: [WrapRelation; 3] = [
    WrapRelation::VertToVert,
    WrapRelation::VertToEdge,
    WrapRelation::VertToFace,
];
const TARGET_FACE: [WrapRelation; 3] = [
    WrapRelation::VertToFace,
    WrapRelation::EdgeToFace,
    WrapRelation::FaceToFace,
];
const SOURCE_FACE: [WrapRelation; 3] = [
    WrapRelation::FaceToVert,
    WrapRelation::FaceToEdge,
    WrapRelation::FaceToFace,
];

/// The full periodic-boundary bitfield of one half-edge.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct EdgeWrap(u32);

impl EdgeWrap {
    /// No relation wraps.
    pub const NONE: Self = Self(0);

    /// Create a bitfield from raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Create a bitfield holding a single relation's offset.
    #[inline]
    pub fn from_offset(relation: WrapRelation, offset: WrapOffset) -> Self {
        Self::NONE.with_offset(relation, offset)
    }

    /// Check whether any relation carries a (non-cancelling) offset.
    #[inline]
    pub fn is_none(self) -> bool {
        self.normalize().0 == 0
    }

    /// The offset stored for `relation`.
    #[inline]
    pub fn offset(self, relation: WrapRelation) -> WrapOffset {
        WrapOffset::from_bits((self.0 >> relation.shift()) as u8)
    }

    /// A copy with the group of `relation` replaced by `offset`.
    #[inline]
    pub fn with_offset(self, relation: WrapRelation, offset: WrapOffset) -> Self {
        let shift = relation.shift();
        Self((self.0 & !(0x0F << shift)) | ((offset.bits() as u32) << shift))
    }

    /// Check whether `relation` crosses a periodic boundary.
    #[inline]
    pub fn wraps(self, relation: WrapRelation) -> bool {
        !self.offset(relation).is_none()
    }

    /// Clear both flags of any axis on which `+` and `-` are set together, in every group.
    ///
    /// Idempotent: `w.normalize().normalize() == w.normalize()`.
    #[inline]
    pub fn normalize(self) -> Self {
        let positive = self.0 & POSITIVE_BITS;
        let negative = (self.0 & NEGATIVE_BITS) >> 1;
        let both = positive & negative;
        Self(self.0 & !(both | (both << 1)))
    }

    /// The bitfield as seen from the twin half-edge.
    ///
    /// Swaps `+` and `-` on every axis and exchanges each `X -> Y` group with
    /// its `Y -> X` group. `w.invert().invert() == w` for every `w`.
    pub fn invert(self) -> Self {
        let swapped = swap_signs(self.0);
        let mut result = 0u32;
        for relation in WrapRelation::ALL {
            let group = (swapped >> relation.shift()) & 0x0F;
            result |= group << relation.reversed().shift();
        }
        Self(result)
    }

    /// Compose two relations into a third.
    ///
    /// Shifts the `first_relation` group of `first` and the `second_relation`
    /// group of `second` into the `result_relation` position, ORs them and
    /// normalizes. The returned bitfield only has the `result_relation` group set.
    pub fn chain(
        first: EdgeWrap,
        first_relation: WrapRelation,
        second: EdgeWrap,
        second_relation: WrapRelation,
        result_relation: WrapRelation,
    ) -> Self {
        let a = (first.0 >> first_relation.shift()) & 0x0F;
        let b = (second.0 >> second_relation.shift()) & 0x0F;
        Self((a | b) << result_relation.shift()).normalize()
    }

    /// Fold each twin's inverted relations into the other.
    ///
    /// `a` and `b` are the wraps independently assigned to two twin
    /// half-edges, each possibly holding only some of the relations. After
    /// merging both carry everything either side knew.
    pub fn cross_merge_twins(a: EdgeWrap, b: EdgeWrap) -> (EdgeWrap, EdgeWrap) {
        (
            Self(a.0 | b.invert().0).normalize(),
            Self(b.0 | a.invert().0).normalize(),
        )
    }

    /// Re-target the far vertex: `old_to_new` is the offset from the old far
    /// vertex to the new one.
    pub fn modify_target_vert(self, old_to_new: WrapOffset) -> Self {
        self.modify_targets(&TARGET_VERT, old_to_new)
    }

    /// Re-source the near vertex: `old_to_new` is the offset from the old near
    /// vertex to the new one.
    pub fn modify_source_vert(self, old_to_new: WrapOffset) -> Self {
        self.modify_sources(&SOURCE_VERT, old_to_new)
    }

    /// Re-target the far face: `old_to_new` is the offset from the old far
    /// face to the new one.
    pub fn modify_target_face(self, old_to_new: WrapOffset) -> Self {
        self.modify_targets(&TARGET_FACE, old_to_new)
    }

    /// Re-source the near face: `old_to_new` is the offset from the old near
    /// face to the new one.
    pub fn modify_source_face(self, old_to_new: WrapOffset) -> Self {
        self.modify_sources(&SOURCE_FACE, old_to_new)
    }

    /// Exchange the roles of vertices and faces in every group.
    pub fn swap_vert_and_face(self) -> Self {
        let mut result = 0u32;
        for relation in WrapRelation::ALL {
            let group = (self.0 >> relation.shift()) & 0x0F;
            result |= group << relation.dual().shift();
        }
        Self(result)
    }

    fn modify_targets(self, relations: &[WrapRelation], old_to_new: WrapOffset) -> Self {
        relations.iter().fold(self, |wrap, &relation| {
            wrap.with_offset(relation, wrap.offset(relation).chain(old_to_new))
        })
    }

    fn modify_sources(self, relations: &[WrapRelation], old_to_new: WrapOffset) -> Self {
        let new_to_old = old_to_new.invert();
        relations.iter().fold(self, |wrap, &relation| {
            wrap.with_offset(relation, new_to_old.chain(wrap.offset(relation)))
        })
    }
}

impl BitOr for EdgeWrap {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for EdgeWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "EdgeWrap(NONE)");
        }
        let mut list = f.debug_map();
        for relation in WrapRelation::ALL {
            let offset = self.offset(relation);
            if offset.bits() != 0 {
                list.entry(&relation, &offset);
            }
        }
        list.finish()
    }
}

#[inline]
fn swap_signs(bits: u32) -> u32 {
    ((bits & POSITIVE_BITS) << 1) | ((bits & NEGATIVE_BITS) >> 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn step() -> impl Strategy<Value = i32> {
        -1i32..=1
    }

    #[test]
    fn test_offset_steps() {
        let offset = WrapOffset::from_steps(1, -1);
        assert_eq!(offset, WrapOffset::POS_AXIS0 | WrapOffset::NEG_AXIS1);
        assert_eq!(offset.axis0(), 1);
        assert_eq!(offset.axis1(), -1);
        assert_eq!(offset.invert(), WrapOffset::from_steps(-1, 1));
    }

    #[test]
    fn test_normalize_cancels_opposite_flags() {
        let both = WrapOffset::POS_AXIS0 | WrapOffset::NEG_AXIS0 | WrapOffset::POS_AXIS1;
        assert_eq!(both.normalize(), WrapOffset::POS_AXIS1);
        assert!((WrapOffset::POS_AXIS1 | WrapOffset::NEG_AXIS1).is_none());
    }

    #[test]
    fn test_invert_swaps_relation_families() {
        let wrap = EdgeWrap::from_offset(WrapRelation::VertToEdge, WrapOffset::POS_AXIS0)
            .with_offset(WrapRelation::FaceToVert, WrapOffset::NEG_AXIS1)
            .with_offset(WrapRelation::FaceToFace, WrapOffset::POS_AXIS1);
        let inverted = wrap.invert();

        assert_eq!(inverted.offset(WrapRelation::EdgeToVert), WrapOffset::NEG_AXIS0);
        assert_eq!(inverted.offset(WrapRelation::VertToEdge), WrapOffset::NONE);
        assert_eq!(inverted.offset(WrapRelation::VertToFace), WrapOffset::POS_AXIS1);
        assert_eq!(inverted.offset(WrapRelation::FaceToFace), WrapOffset::NEG_AXIS1);
    }

    #[test]
    fn test_chain_moves_bits_into_result_group() {
        let a = EdgeWrap::from_offset(WrapRelation::FaceToFace, WrapOffset::POS_AXIS0);
        let b = EdgeWrap::from_offset(WrapRelation::FaceToEdge, WrapOffset::POS_AXIS1);
        let chained = EdgeWrap::chain(
            a,
            WrapRelation::FaceToFace,
            b,
            WrapRelation::FaceToEdge,
            WrapRelation::FaceToEdge,
        );
        assert_eq!(
            chained,
            EdgeWrap::from_offset(
                WrapRelation::FaceToEdge,
                WrapOffset::POS_AXIS0 | WrapOffset::POS_AXIS1
            )
        );

        // Opposite steps cancel.
        let back = EdgeWrap::from_offset(WrapRelation::VertToVert, WrapOffset::NEG_AXIS0);
        let there = EdgeWrap::from_offset(WrapRelation::VertToVert, WrapOffset::POS_AXIS0);
        let round_trip = EdgeWrap::chain(
            there,
            WrapRelation::VertToVert,
            back,
            WrapRelation::VertToVert,
            WrapRelation::VertToVert,
        );
        assert!(round_trip.is_none());
    }

    #[test]
    fn test_cross_merge_fills_missing_relations() {
        let full = EdgeWrap::from_offset(WrapRelation::VertToVert, WrapOffset::POS_AXIS0)
            .with_offset(WrapRelation::FaceToVert, WrapOffset::POS_AXIS0)
            .with_offset(WrapRelation::FaceToFace, WrapOffset::POS_AXIS0);
        let twin = full.invert();

        // Each side only knows part of the story.
        let partial_a = full.with_offset(WrapRelation::FaceToFace, WrapOffset::NONE);
        let partial_b = twin.with_offset(WrapRelation::VertToVert, WrapOffset::NONE);

        let (a, b) = EdgeWrap::cross_merge_twins(partial_a, partial_b);
        assert_eq!(a, full);
        assert_eq!(b, twin);
    }

    #[test]
    fn test_modify_target_and_source_vert() {
        let wrap = EdgeWrap::from_offset(WrapRelation::VertToVert, WrapOffset::POS_AXIS0)
            .with_offset(WrapRelation::FaceToVert, WrapOffset::POS_AXIS0);

        // Moving the far vertex one period back cancels the forward wrap.
        let moved = wrap.modify_target_vert(WrapOffset::NEG_AXIS0);
        assert!(moved.offset(WrapRelation::VertToVert).is_none());
        assert!(moved.offset(WrapRelation::FaceToVert).is_none());

        // Moving the near vertex forward means the far vertex is reached backward.
        let moved = EdgeWrap::NONE.modify_source_vert(WrapOffset::POS_AXIS1);
        assert_eq!(moved.offset(WrapRelation::VertToVert), WrapOffset::NEG_AXIS1);
        assert_eq!(moved.offset(WrapRelation::VertToFace), WrapOffset::NEG_AXIS1);
        assert!(moved.offset(WrapRelation::FaceToVert).is_none());
    }

    #[test]
    fn test_swap_vert_and_face_is_involution() {
        let wrap = EdgeWrap::from_offset(WrapRelation::VertToFace, WrapOffset::POS_AXIS1)
            .with_offset(WrapRelation::EdgeToVert, WrapOffset::NEG_AXIS0);
        let swapped = wrap.swap_vert_and_face();
        assert_eq!(swapped.offset(WrapRelation::FaceToVert), WrapOffset::POS_AXIS1);
        assert_eq!(swapped.offset(WrapRelation::EdgeToFace), WrapOffset::NEG_AXIS0);
        assert_eq!(swapped.swap_vert_and_face(), wrap);
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(bits in any::<u32>()) {
            let w = EdgeWrap::from_bits(bits);
            prop_assert_eq!(w.normalize().normalize(), w.normalize());
        }

        #[test]
        fn prop_normalize_never_keeps_both_signs(bits in any::<u32>()) {
            let n = EdgeWrap::from_bits(bits).normalize();
            for relation in WrapRelation::ALL {
                let o = n.offset(relation).bits();
                prop_assert!(o & 0b0011 != 0b0011);
                prop_assert!(o & 0b1100 != 0b1100);
            }
        }

        #[test]
        fn prop_invert_involution(bits in any::<u32>()) {
            let w = EdgeWrap::from_bits(bits);
            prop_assert_eq!(w.invert().invert(), w);
        }

        #[test]
        fn prop_offset_invert_involution(bits in 0u8..16) {
            let o = WrapOffset::from_bits(bits);
            prop_assert_eq!(o.invert().invert(), o);
        }

        #[test]
        fn prop_chain_associative(
            a0 in step(), b0 in step(), c0 in step(),
            a1 in step(), b1 in step(), c1 in step(),
        ) {
            // Only relations whose partial compositions stay within one period compose.
            let composable = |x: i32, y: i32, z: i32| {
                (x + y).abs() <= 1 && (y + z).abs() <= 1 && (x + y + z).abs() <= 1
            };
            prop_assume!(composable(a0, b0, c0) && composable(a1, b1, c1));

            let a = WrapOffset::from_steps(a0, a1);
            let b = WrapOffset::from_steps(b0, b1);
            let c = WrapOffset::from_steps(c0, c1);

            prop_assert_eq!(a.chain(b).chain(c), a.chain(b.chain(c)));
            prop_assert_eq!(a.chain(b).chain(c), WrapOffset::from_steps(a0 + b0 + c0, a1 + b1 + c1));
        }

        #[test]
        fn prop_edge_chain_matches_offset_chain(a in 0u8..16, b in 0u8..16) {
            let first = EdgeWrap::from_offset(WrapRelation::VertToFace, WrapOffset::from_bits(a));
            let second = EdgeWrap::from_offset(WrapRelation::FaceToEdge, WrapOffset::from_bits(b));
            let chained = EdgeWrap::chain(
                first,
                WrapRelation::VertToFace,
                second,
                WrapRelation::FaceToEdge,
                WrapRelation::VertToEdge,
            );
            prop_assert_eq!(
                chained.offset(WrapRelation::VertToEdge),
                WrapOffset::from_bits(a).chain(WrapOffset::from_bits(b))
            );
        }

        #[test]
        fn prop_cross_merge_of_consistent_twins_is_stable(bits in any::<u32>()) {
            let w = EdgeWrap::from_bits(bits).normalize();
            let (a, b) = EdgeWrap::cross_merge_twins(w, w.invert());
            prop_assert_eq!(a, w);
            prop_assert_eq!(b, w.invert());
        }
    }
}
