//! Reversible room codes for the cosmetic multiplayer room.
//! Code format: LS-<WORD><NN>, e.g., LS-LEMON42, LS-PITCHER07

pub const ROOM_PREFIX: &str = "LS";

pub const WORD_LIST: [&str; 32] = [
    "LEMON", "SUGAR", "ICE", "CITRUS", "ZEST", "PITCHER", "STRAW", "SHADE", "SUNNY", "BREEZE",
    "PEEL", "SQUEEZE", "MINT", "HONEY", "TART", "FIZZ", "COOLER", "PICNIC", "PORCH", "SUMMER",
    "KIOSK", "CART", "TIPJAR", "SIGN", "CUPS", "GINGER", "BERRY", "MELON", "RIND", "SPLASH",
    "GLASS", "PULP",
];

const WORD_BITS: u32 = 5;
const WORD_MASK: u64 = (1 << WORD_BITS) - 1;
const NUMBER_MASK: u64 = 0x7F;
const PACKED_MASK: u64 = 0x0FFF;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> Option<String> {
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(word.to_ascii_uppercase())
}

const fn pack(word_index: u64, number: u64) -> u64 {
    (word_index & WORD_MASK) | ((number & NUMBER_MASK) << WORD_BITS)
}

const fn unpack(seed: u64) -> (u64, u64) {
    (seed & WORD_MASK, ((seed >> WORD_BITS) & NUMBER_MASK) % 100)
}

fn compose_seed(word_index: u64, number: u64) -> u64 {
    let packed = pack(word_index, number);
    let mut buf = [0u8; 10];
    buf[..6].copy_from_slice(b"LEMON-");
    buf[6..8].copy_from_slice(&packed.to_le_bytes()[..2]);
    buf[8] = b'R';
    buf[9] = 0x5A;
    (fnv1a64(&buf) & !PACKED_MASK) | packed
}

/// Display code for a seed. Only the low bits of the seed pick the code.
#[must_use]
pub fn room_code_for_seed(seed: u64) -> String {
    let (word_index, number) = unpack(seed);
    let word = usize::try_from(word_index)
        .ok()
        .and_then(|idx| WORD_LIST.get(idx))
        .copied()
        .unwrap_or(WORD_LIST[0]);
    format!("{ROOM_PREFIX}-{word}{number:02}")
}

/// Parse a room code back to a seed. Case and surrounding whitespace are ignored.
#[must_use]
pub fn parse_room_code(code: &str) -> Option<u64> {
    let (prefix, rest) = code.trim().split_once('-')?;
    if !prefix.eq_ignore_ascii_case(ROOM_PREFIX) || rest.len() < 3 || !rest.is_ascii() {
        return None;
    }
    let (word_part, number_part) = rest.split_at(rest.len() - 2);
    let number: u64 = number_part.parse().ok()?;
    let word = sanitize_word(word_part)?;
    let idx = WORD_LIST.iter().position(|w| *w == word)?;
    let word_index = u64::try_from(idx).ok()?;
    Some(compose_seed(word_index, number))
}

/// Next seed in a deterministic sequence of rooms (splitmix64 step).
#[must_use]
pub const fn next_room_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
