//! Brush and leaf content flags.

use bitflags::bitflags;

bitflags! {
    /// Content bits of a brush or leaf.
    ///
    /// The values match the Quake 2 map format. Bits without a name are
    /// kept as-is so authored data passes through untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Contents: u32 {
        const SOLID = 0x1;
        const WINDOW = 0x2;
        const AUX = 0x4;
        const LAVA = 0x8;
        const SLIME = 0x10;
        const WATER = 0x20;
        const MIST = 0x40;
        const AREAPORTAL = 0x8000;
        const PLAYERCLIP = 0x1_0000;
        const MONSTERCLIP = 0x2_0000;
        const ORIGIN = 0x100_0000;
        const DETAIL = 0x800_0000;
        const TRANSLUCENT = 0x1000_0000;
        const LADDER = 0x2000_0000;

        const _ = !0;
    }
}

impl Contents {
    /// Empty space.
    pub const EMPTY: Self = Self::empty();

    /// Contents of a region holding all the given brushes.
    pub fn combine(contents: impl IntoIterator<Item = Contents>) -> Contents {
        contents
            .into_iter()
            .fold(Contents::EMPTY, |acc, c| acc | c)
    }
}
