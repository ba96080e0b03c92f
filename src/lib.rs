#![cfg_attr(not(test), no_std)]

//! Driver for the Analog Devices AD9833 programmable waveform generator.
//!
//! The AD9833 is a direct digital synthesis chip with two frequency and two
//! phase registers, selectable sine/triangle/square outputs and a write-only
//! three wire serial interface (FSYNC, SCLK, SDATA).
//!
//! The driver keeps an in-memory image of the chip (control register, both
//! frequency banks, both phase banks, reference clock) and translates calls
//! into the 16-bit register writes the chip expects. Until [`Ad9833::start`]
//! has run the reset-bracketed initialization, setters only update that
//! image. Afterwards every setter writes through to the chip.
//!
//! The transport is abstracted by [`SerialLink`]. [`BitBangLink`] drives three
//! `embedded-hal` output pins directly.
//!
//! # Examples
//! ```ignore
//! let link = BitBangLink::new(fsync, sclk, sdata);
//! let mut dds = Ad9833::with_link(link);
//! dds.set_frequency(1_000.0)?;
//! dds.set_mode(Mode::Triangle)?;
//! dds.start()?;
//! dds.set_frequency(440.0)?;
//! ```

extern crate embedded_hal as hal;

#[macro_use]
mod fmt;

pub mod codec;
mod device;
mod error;
mod link;

use core::convert::TryFrom;

use modular_bitfield_msb::prelude::*;

pub use device::{Ad9833, DEFAULT_FREQUENCIES, DEFAULT_MCLK_HZ, DEFAULT_PHASES};
pub use error::{Error, InvalidBank};
pub use link::{BitBangLink, DelaySettle, SerialLink, Settle, SpinSettle};

/// One of the two frequency or phase register banks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    Bank0,
    Bank1,
}

impl Bank {
    pub(crate) fn index(self) -> usize {
        match self {
            Bank::Bank0 => 0,
            Bank::Bank1 => 1,
        }
    }
}

/// Bank numbers other than 0 and 1 are rejected, never clamped.
impl TryFrom<u8> for Bank {
    type Error = InvalidBank;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Bank::Bank0),
            1 => Ok(Bank::Bank1),
            n => Err(InvalidBank(n)),
        }
    }
}

/// Output waveform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Internal clock and DAC powered down. The waveform bits are kept.
    Sleep,
    Sine,
    Triangle,
    /// MSB of the DAC data
    Square,
    /// MSB of the DAC data with the divider bit set
    SquareDiv2,
}

/// Control register
///
/// Fields:
///
/// | Name    | Description                                        |
/// |---------|----------------------------------------------------|
/// | b28     | Frequency words are loaded as two 14-bit halves    |
/// | hlb     | Half select, ignored while b28 is set              |
/// | fsel    | Frequency register driving the phase accumulator   |
/// | psel    | Phase register added to the accumulator output     |
/// | reset   | Hold internal registers in reset                   |
/// | sleep1  | Disable the internal MCLK                          |
/// | sleep12 | Power down the on-chip DAC                         |
/// | opbiten | Output the DAC MSB instead of the DAC              |
/// | div2    | Divider select for the square output               |
/// | mode    | Triangle (set) or sine (clear) when opbiten is off |
///
/// The two address bits (D15, D14) and the reserved bits are skipped and
/// always read as zero.
///
/// # Examples
/// ```
/// # use ad9833::Control;
/// let ctrl = Control::default().with_reset(true);
/// assert_eq!(ctrl.word(), 0x2100);
/// ```
#[bitfield(bits = 16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control {
    #[skip] __: B2,
    /// Two-write frequency loading
    pub b28: bool,
    /// High/low half select
    pub hlb: bool,
    /// Frequency bank select
    pub fsel: bool,
    /// Phase bank select
    pub psel: bool,
    #[skip] __: B1,
    /// Reset
    pub reset: bool,
    /// MCLK off
    pub sleep1: bool,
    /// DAC off
    pub sleep12: bool,
    /// DAC MSB output enable
    pub opbiten: bool,
    #[skip] __: B1,
    /// Square output divider select
    pub div2: bool,
    #[skip] __: B1,
    /// Triangle output
    pub mode: bool,
    #[skip] __: B1,
}

impl Default for Control {
    /// Power-on image used by the driver: only B28 set.
    fn default() -> Self {
        Control::new().with_b28(true)
    }
}

impl Control {
    /// Word as shifted out to the chip.
    pub fn word(&self) -> u16 {
        u16::from_be_bytes(self.into_bytes())
    }

    /// Updates the sleep and waveform bits for `mode`.
    ///
    /// `Sleep` only sets both sleep bits, so the waveform comes back unchanged
    /// on wake-up. Every other mode clears both sleep bits first. Triangle
    /// leaves the divider bit alone, it only matters while `opbiten` is set.
    /// Sine clears it, so sine always maps to the same word.
    pub fn apply_mode(&mut self, mode: Mode) {
        let (opbiten, div2, triangle) = match mode {
            Mode::Sleep => {
                self.set_sleep1(true);
                self.set_sleep12(true);
                return;
            }
            Mode::Sine => (false, Some(false), false),
            Mode::Triangle => (false, None, true),
            Mode::Square => (true, Some(false), false),
            Mode::SquareDiv2 => (true, Some(true), false),
        };

        self.set_sleep1(false);
        self.set_sleep12(false);
        self.set_opbiten(opbiten);
        if let Some(div2) = div2 {
            self.set_div2(div2);
        }
        self.set_mode(triangle);
    }
}
