//! Command word encoding
//!
//! Layout matches the generic Linux ioctl scheme so the user-space service
//! can use its usual `_IO`/`_IOR`/`_IOW` helpers.

/// Magic number shared by every sensor command
pub const MAGIC: u8 = b'g';

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

const NR_MASK: u32 = (1 << NR_BITS) - 1;
const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;
const SIZE_MASK: u32 = (1 << SIZE_BITS) - 1;

// Direction bits
const DIR_NONE: u32 = 0;
const DIR_WRITE: u32 = 1;
const DIR_READ: u32 = 2;

/// Data transfer direction, seen from user space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// No payload
    None,
    /// User space writes, core reads the buffer
    Write,
    /// User space reads, core writes the buffer
    Read,
    /// Both directions
    ReadWrite,
}

impl Direction {
    fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            DIR_WRITE => Direction::Write,
            DIR_READ => Direction::Read,
            0b11 => Direction::ReadWrite,
            _ => Direction::None,
        }
    }

    /// Core writes into the user buffer
    pub fn copies_out(self) -> bool {
        matches!(self, Direction::Read | Direction::ReadWrite)
    }

    /// Core reads from the user buffer
    pub fn copies_in(self) -> bool {
        matches!(self, Direction::Write | Direction::ReadWrite)
    }
}

/// Encoded command word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandId(pub u32);

impl CommandId {
    /// Encode a command word
    pub const fn new(dir: Direction, magic: u8, nr: u8, size: u16) -> Self {
        let dir_bits = match dir {
            Direction::None => DIR_NONE,
            Direction::Write => DIR_WRITE,
            Direction::Read => DIR_READ,
            Direction::ReadWrite => DIR_READ | DIR_WRITE,
        };
        Self(
            (dir_bits << DIR_SHIFT)
                | (((size as u32) & SIZE_MASK) << SIZE_SHIFT)
                | ((magic as u32) << TYPE_SHIFT)
                | ((nr as u32) << NR_SHIFT),
        )
    }

    /// Command without payload (`_IO`)
    pub const fn none(magic: u8, nr: u8) -> Self {
        Self::new(Direction::None, magic, nr, 0)
    }

    /// Command whose payload user space reads (`_IOR`)
    pub const fn read(magic: u8, nr: u8, size: u16) -> Self {
        Self::new(Direction::Read, magic, nr, size)
    }

    /// Command whose payload user space writes (`_IOW`)
    pub const fn write(magic: u8, nr: u8, size: u16) -> Self {
        Self::new(Direction::Write, magic, nr, size)
    }

    /// Transfer direction
    pub fn direction(self) -> Direction {
        Direction::from_bits(self.0 >> DIR_SHIFT)
    }

    /// Magic number (command family)
    pub fn magic(self) -> u8 {
        ((self.0 >> TYPE_SHIFT) & TYPE_MASK) as u8
    }

    /// Command number within the family
    pub fn nr(self) -> u8 {
        ((self.0 >> NR_SHIFT) & NR_MASK) as u8
    }

    /// Payload size in bytes
    pub fn size(self) -> usize {
        ((self.0 >> SIZE_SHIFT) & SIZE_MASK) as usize
    }

    /// Raw word
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CommandId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
