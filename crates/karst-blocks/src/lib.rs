//! Voxel block types and their render classification.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Compact voxel representation used at runtime. Blocks carry no per-instance
/// data; the discriminant doubles as the material id in mesh vertices.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Block {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Sand = 3,
    Stone = 4,
}

/// How a block participates in surface extraction. A face is emitted between
/// two voxels iff their classes differ, and the higher class wins the face.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum RenderClass {
    None = 0,
    Transparent = 1,
    Solid = 2,
}

impl Block {
    pub const AIR: Block = Block::Air;

    /// Opaque material id stored in mesh vertex records.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn render_class(self) -> RenderClass {
        match self {
            Block::Air => RenderClass::None,
            // Transparent is reserved for future glass/water materials.
            _ => RenderClass::Solid,
        }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.render_class() == RenderClass::Solid
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, RenderClass};

    const ALL: [Block; 5] = [
        Block::Air,
        Block::Grass,
        Block::Dirt,
        Block::Sand,
        Block::Stone,
    ];

    #[test]
    fn ids_are_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.id(), b.id());
            }
        }
    }

    #[test]
    fn only_air_is_non_solid() {
        for b in ALL {
            assert_eq!(b.is_solid(), b != Block::Air);
        }
    }

    #[test]
    fn render_class_ordering_puts_solid_on_top() {
        assert!(RenderClass::None < RenderClass::Transparent);
        assert!(RenderClass::Transparent < RenderClass::Solid);
        assert_eq!(Block::Air.render_class(), RenderClass::None);
        assert_eq!(Block::Stone.render_class(), RenderClass::Solid);
    }

    #[test]
    fn default_block_is_air() {
        assert_eq!(Block::default(), Block::AIR);
    }
}
