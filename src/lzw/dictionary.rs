/// Code for "clear the dictionary"
pub const CLEAR_CODE: u32 = 256;
/// Code for "end of data"
pub const END_CODE: u32 = 257;
/// First code assigned to a learned sequence
pub const FIRST_FREE_CODE: u32 = 258;

const NO_PREFIX: u32 = u32::MAX;
const EMPTY_SLOT: u64 = u64::MAX;

/// One interned sequence: its prefix code plus one final byte
#[derive(Clone, Copy, Debug)]
struct Entry {
    prefix: u32,
    byte: u8,
    first: u8,
    len: u32,
}

/// Arena of LZW sequences
///
/// Codes index `entries` directly. Encoder lookups of `(prefix, byte)` go
/// through an open-addressed index sized at twice the code space, so the
/// load factor stays at or below one half without ever rehashing.
pub struct CodeTable {
    entries: Vec<Entry>,
    /// Packed `(prefix << 8 | byte, code)` pairs
    slots: Box<[(u64, u32)]>,
    mask: usize,
    capacity: u32,
}

impl CodeTable {
    /// Table holding at most `capacity` codes (including the 258 fixed ones)
    pub fn new(capacity: u32) -> Self {
        let slot_count = (capacity as usize * 2).next_power_of_two();
        let mut table = Self {
            entries: Vec::with_capacity(capacity as usize),
            slots: vec![(EMPTY_SLOT, 0); slot_count].into_boxed_slice(),
            mask: slot_count - 1,
            capacity,
        };
        table.reset();
        table
    }

    /// Forget every learned sequence
    pub fn reset(&mut self) {
        self.entries.clear();
        for byte in 0..=255u8 {
            self.entries.push(Entry { prefix: NO_PREFIX, byte, first: byte, len: 1 });
        }
        // CLEAR and END occupy slots but never expand
        for _ in CLEAR_CODE..FIRST_FREE_CODE {
            self.entries.push(Entry { prefix: NO_PREFIX, byte: 0, first: 0, len: 0 });
        }
        self.slots.fill((EMPTY_SLOT, 0));
    }

    /// Next code that [`insert`](Self::insert) would assign
    pub fn next_code(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.next_code() >= self.capacity
    }

    #[inline]
    fn slot_of(&self, key: u64) -> usize {
        (key.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40) as usize & self.mask
    }

    /// Code for `prefix` followed by `byte`, if learned
    #[inline]
    pub fn find(&self, prefix: u32, byte: u8) -> Option<u32> {
        let key = (u64::from(prefix) << 8) | u64::from(byte);
        let mut slot = self.slot_of(key);
        loop {
            let (stored, code) = self.slots[slot];
            if stored == key {
                return Some(code);
            }
            if stored == EMPTY_SLOT {
                return None;
            }
            slot = (slot + 1) & self.mask;
        }
    }

    /// Learn `prefix + byte`; returns the new code, or `None` when full
    pub fn insert(&mut self, prefix: u32, byte: u8) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let parent = self.entries[prefix as usize];
        let code = self.next_code();
        self.entries.push(Entry { prefix, byte, first: parent.first, len: parent.len + 1 });

        let key = (u64::from(prefix) << 8) | u64::from(byte);
        let mut slot = self.slot_of(key);
        while self.slots[slot].0 != EMPTY_SLOT {
            slot = (slot + 1) & self.mask;
        }
        self.slots[slot] = (key, code);
        Some(code)
    }

    /// Length of the sequence behind a learned `code`
    pub fn len_of(&self, code: u32) -> usize {
        self.entries[code as usize].len as usize
    }

    /// First byte of the sequence behind a learned `code`
    pub fn first_byte(&self, code: u32) -> u8 {
        self.entries[code as usize].first
    }

    /// Append the sequence behind a learned `code` to `out`
    pub fn expand_into(&self, code: u32, out: &mut Vec<u8>) {
        let len = self.len_of(code);
        let start = out.len();
        out.resize(start + len, 0);

        let mut at = code;
        for slot in out[start..].iter_mut().rev() {
            let entry = self.entries[at as usize];
            *slot = entry.byte;
            at = entry.prefix;
        }
    }
}
