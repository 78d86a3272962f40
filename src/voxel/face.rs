//! Cubic face indexing and exposure masks

use crate::core::types::IVec3;

/// The six cubic faces, in the host's draw-mask bit order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Face {
    Front = 0,
    Back = 1,
    Top = 2,
    Bottom = 3,
    Left = 4,
    Right = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
    ];

    /// Offset to the neighbor voxel the face looks at
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Front => IVec3::new(0, 0, 1),
            Face::Back => IVec3::new(0, 0, -1),
            Face::Top => IVec3::new(0, 1, 0),
            Face::Bottom => IVec3::new(0, -1, 0),
            Face::Left => IVec3::new(-1, 0, 0),
            Face::Right => IVec3::new(1, 0, 0),
        }
    }

    pub fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// 6-bit mask of exposed faces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceFlags(pub u8);

impl FaceFlags {
    pub const NONE: FaceFlags = FaceFlags(0);
    pub const ALL: FaceFlags = FaceFlags(0x3f);

    pub fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    pub fn insert(&mut self, face: Face) {
        self.0 |= face.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_distinct() {
        let mut seen = 0u8;
        for face in Face::ALL {
            assert_eq!(seen & face.bit(), 0);
            seen |= face.bit();
        }
        assert_eq!(seen, FaceFlags::ALL.0);
    }

    #[test]
    fn test_opposite_offsets_cancel() {
        assert_eq!(Face::Front.offset() + Face::Back.offset(), IVec3::ZERO);
        assert_eq!(Face::Top.offset() + Face::Bottom.offset(), IVec3::ZERO);
        assert_eq!(Face::Left.offset() + Face::Right.offset(), IVec3::ZERO);
    }

    #[test]
    fn test_flags() {
        let mut flags = FaceFlags::NONE;
        assert!(flags.is_empty());
        flags.insert(Face::Top);
        assert!(flags.contains(Face::Top));
        assert!(!flags.contains(Face::Bottom));
    }
}
