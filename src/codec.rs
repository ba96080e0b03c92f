//! Conversions between physical values and AD9833 register words.
//!
//! Pure functions, no I/O.

use core::f64::consts::TAU;

use crate::Bank;

/// Largest value a 28-bit frequency register holds.
pub const FREQ_REG_MAX: u32 = 0x0FFF_FFFF;

/// Mask of one 14-bit frequency half.
pub const FREQ_HALF_MASK: u32 = 0x3FFF;

/// Mask of the 12-bit phase register.
pub const PHASE_REG_MASK: u16 = 0x0FFF;

/// Address bits of FREQ0 writes.
pub const FREQ0_SELECT: u16 = 0x4000;
/// Address bits of FREQ1 writes.
pub const FREQ1_SELECT: u16 = 0x8000;
/// Address bits of PHASE0 writes.
pub const PHASE0_SELECT: u16 = 0xC000;
/// Address bits of PHASE1 writes.
pub const PHASE1_SELECT: u16 = 0xD000;

const TWO_POW_28: f64 = (1u32 << 28) as f64;

/// Which 14-bit half of a frequency register a word carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    Lsb,
    Msb,
}

/// Frequency register value for `freq_hz` at reference clock `mclk_hz`.
///
/// `f_out = f_mclk / 2^28 * FREQREG`, rounded half up. Negative and NaN
/// inputs saturate to 0; range checks are up to the caller.
///
/// ```
/// # use ad9833::codec::frequency_to_register;
/// assert_eq!(frequency_to_register(100.0, 25_000_000), 1074);
/// ```
pub fn frequency_to_register(freq_hz: f32, mclk_hz: u32) -> u32 {
    (f64::from(freq_hz) * TWO_POW_28 / f64::from(mclk_hz) + 0.5) as u32
}

/// Phase register value for `phase_rad`, rounded half up.
///
/// The chip shifts the output by `2π / 4096 * PHASEREG`. Phases outside
/// `[0, 2π)` wrap modulo 2π, negative ones included.
pub fn phase_to_register(phase_rad: f32) -> u16 {
    let scaled = f64::from(phase_rad) * 4096.0 / TAU + 0.5;
    let mut floor = scaled as i64;
    if floor as f64 > scaled {
        floor -= 1;
    }
    (floor & i64::from(PHASE_REG_MASK)) as u16
}

/// Address bits shared by both halves of a frequency write to `bank`.
pub fn frequency_select(bank: Bank) -> u16 {
    match bank {
        Bank::Bank0 => FREQ0_SELECT,
        Bank::Bank1 => FREQ1_SELECT,
    }
}

/// Address bits of a phase write to `bank`.
pub fn phase_select(bank: Bank) -> u16 {
    match bank {
        Bank::Bank0 => PHASE0_SELECT,
        Bank::Bank1 => PHASE1_SELECT,
    }
}

/// One half of a frequency write: bank tag plus 14 data bits.
pub fn frame_frequency_word(bank: Bank, half: Half, freqreg: u32) -> u16 {
    let bits = match half {
        Half::Lsb => freqreg & FREQ_HALF_MASK,
        Half::Msb => (freqreg >> 14) & FREQ_HALF_MASK,
    };
    frequency_select(bank) | bits as u16
}

/// Both words of a frequency write, in the order they must be sent (LSB
/// half first).
pub fn frequency_words(bank: Bank, freqreg: u32) -> [u16; 2] {
    [
        frame_frequency_word(bank, Half::Lsb, freqreg),
        frame_frequency_word(bank, Half::Msb, freqreg),
    ]
}

/// Single-word phase write: bank tag plus 12 data bits.
pub fn frame_phase_word(bank: Bank, phasereg: u16) -> u16 {
    phase_select(bank) | (phasereg & PHASE_REG_MASK)
}
