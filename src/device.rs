use core::f32::consts::PI;

use crate::codec;
use crate::error::Error;
use crate::link::SerialLink;
use crate::{Bank, Control, Mode};

/// Reference clock assumed until [`Ad9833::configure_clock`] is called.
pub const DEFAULT_MCLK_HZ: u32 = 25_000_000;

/// Frequencies (Hz) loaded into FREQ0 and FREQ1 by `start` unless changed.
pub const DEFAULT_FREQUENCIES: [f32; 2] = [100.0, 0.1];

/// Phases (radians) loaded into PHASE0 and PHASE1 by `start` unless changed.
pub const DEFAULT_PHASES: [f32; 2] = [0.0, PI];

/// AD9833 driver
///
/// Holds the register image of one chip. Setters are valid at any time.
/// Before [`start`](Ad9833::start) they only update the image, which `start`
/// then loads into the chip inside a reset bracket. After `start` each setter
/// writes through immediately.
///
/// Operations are not atomic towards the chip: a frequency update is a
/// control word followed by two data words. Share the driver between
/// contexts only behind a lock of your own.
pub struct Ad9833<L> {
    link: Option<L>,
    control: Control,
    mclk_hz: u32,
    frequency: [f32; 2],
    phase: [f32; 2],
    mode: Mode,
    started: bool,
}

impl<L> Default for Ad9833<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Ad9833<L> {
    /// Driver with the power-on defaults and no link bound yet.
    ///
    /// Bind the link with [`configure_pins`](Ad9833::configure_pins) before
    /// calling `start`.
    pub fn new() -> Self {
        Self {
            link: None,
            control: Control::default(),
            mclk_hz: DEFAULT_MCLK_HZ,
            frequency: DEFAULT_FREQUENCIES,
            phase: DEFAULT_PHASES,
            mode: Mode::Sine,
            started: false,
        }
    }

    /// Driver with the power-on defaults, writing through `link`.
    pub fn with_link(link: L) -> Self {
        let mut dds = Self::new();
        dds.link = Some(link);
        dds
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn mclk(&self) -> u32 {
        self.mclk_hz
    }

    /// Frequency stored in `bank`, in Hz.
    pub fn frequency(&self, bank: Bank) -> f32 {
        self.frequency[bank.index()]
    }

    /// Phase stored in `bank`, in radians, as it was set.
    pub fn phase(&self, bank: Bank) -> f32 {
        self.phase[bank.index()]
    }

    /// Last mode set. Sine after construction.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected_frequency_bank(&self) -> Bank {
        if self.control.fsel() { Bank::Bank1 } else { Bank::Bank0 }
    }

    pub fn selected_phase_bank(&self) -> Bank {
        if self.control.psel() { Bank::Bank1 } else { Bank::Bank0 }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn link(&self) -> Option<&L> {
        self.link.as_ref()
    }

    /// Consumes the driver and gives the link back, if one was bound.
    pub fn release(self) -> Option<L> {
        self.link
    }
}

impl<L, E> Ad9833<L>
where
    L: SerialLink<Error = E>,
{
    /// Sets the reference clock used for all following frequency encodings.
    ///
    /// Nothing is written. Fails if the clock is zero or if a stored
    /// frequency would no longer fit the 28-bit register.
    pub fn configure_clock(&mut self, mclk_hz: u32) -> Result<(), Error<E>> {
        if mclk_hz == 0 {
            return Err(Error::InvalidClock);
        }
        for &freq_hz in &self.frequency {
            Self::check_frequency(freq_hz, mclk_hz)?;
        }
        self.mclk_hz = mclk_hz;
        Ok(())
    }

    /// Binds the serial link. Must happen before `start`.
    pub fn configure_pins(&mut self, link: L) -> Result<(), Error<E>> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.link = Some(link);
        Ok(())
    }

    /// Initializes the lines and loads the register image into the chip.
    ///
    /// Sequence: control with RESET set, FREQ0, FREQ1, PHASE0, PHASE1,
    /// control with RESET cleared. The driver only counts as started once the
    /// whole sequence went out. A second call fails without writing.
    pub fn start(&mut self) -> Result<(), Error<E>> {
        if self.started {
            warn!("start(): already started");
            return Err(Error::AlreadyStarted);
        }
        let link = match self.link.as_mut() {
            Some(link) => link,
            None => {
                warn!("start(): no serial link configured");
                return Err(Error::NotConfigured);
            }
        };
        link.pin_initialize().map_err(Error::Link)?;

        if let Err(e) = self.initialize() {
            self.control.set_reset(false);
            return Err(e);
        }

        self.started = true;
        debug!("start(): done");
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), Error<E>> {
        debug!("enter reset");
        self.control.set_reset(true);
        self.write_control()?;

        self.write_frequency(Bank::Bank0)?;
        self.write_frequency(Bank::Bank1)?;
        self.write_phase(Bank::Bank0)?;
        self.write_phase(Bank::Bank1)?;

        debug!("exit reset");
        self.control.set_reset(false);
        self.write_control()
    }

    /// Stores `freq_hz` in `bank`.
    ///
    /// Once started, the control word is written ahead of the two frequency
    /// words on every call, even if no control bit changed.
    pub fn set_frequency_register_value(&mut self, bank: Bank, freq_hz: f32) -> Result<(), Error<E>> {
        Self::check_frequency(freq_hz, self.mclk_hz)?;
        self.frequency[bank.index()] = freq_hz;

        if self.started {
            self.write_control()?;
            self.write_frequency(bank)?;
        }
        Ok(())
    }

    /// Selects the frequency bank driving the output.
    pub fn select_frequency_register(&mut self, bank: Bank) -> Result<(), Error<E>> {
        self.control.set_fsel(bank == Bank::Bank1);

        if self.started {
            self.write_control()?;
        }
        Ok(())
    }

    /// Loads `freq_hz` into FREQ0 and makes sure FREQ0 is selected.
    pub fn set_frequency(&mut self, freq_hz: f32) -> Result<(), Error<E>> {
        Self::check_frequency(freq_hz, self.mclk_hz)?;
        if self.control.fsel() {
            self.select_frequency_register(Bank::Bank0)?;
        }
        self.set_frequency_register_value(Bank::Bank0, freq_hz)
    }

    /// Stores `phase_rad` in `bank`. Values outside `[0, 2π)` wrap.
    ///
    /// Once started, the single phase word is written. Phase writes need no
    /// control word ahead of them.
    pub fn set_phase_register_value(&mut self, bank: Bank, phase_rad: f32) -> Result<(), Error<E>> {
        Self::check_phase(phase_rad)?;
        self.phase[bank.index()] = phase_rad;

        if self.started {
            self.write_phase(bank)?;
        }
        Ok(())
    }

    /// Selects the phase bank added to the output.
    pub fn select_phase_register(&mut self, bank: Bank) -> Result<(), Error<E>> {
        self.control.set_psel(bank == Bank::Bank1);

        if self.started {
            self.write_control()?;
        }
        Ok(())
    }

    /// Loads `phase_rad` into PHASE0 and makes sure PHASE0 is selected.
    pub fn set_phase(&mut self, phase_rad: f32) -> Result<(), Error<E>> {
        Self::check_phase(phase_rad)?;
        if self.control.psel() {
            self.select_phase_register(Bank::Bank0)?;
        }
        self.set_phase_register_value(Bank::Bank0, phase_rad)
    }

    /// Switches the output waveform or puts the chip to sleep.
    ///
    /// See [`Control::apply_mode`] for the bits touched.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<E>> {
        self.control.apply_mode(mode);
        self.mode = mode;

        if self.started {
            self.write_control()?;
        }
        Ok(())
    }

    fn write_control(&mut self) -> Result<(), Error<E>> {
        let word = self.control.word();
        self.write_word(word)
    }

    fn write_frequency(&mut self, bank: Bank) -> Result<(), Error<E>> {
        let freqreg = codec::frequency_to_register(self.frequency[bank.index()], self.mclk_hz);
        for &word in &codec::frequency_words(bank, freqreg) {
            self.write_word(word)?;
        }
        Ok(())
    }

    fn write_phase(&mut self, bank: Bank) -> Result<(), Error<E>> {
        let phasereg = codec::phase_to_register(self.phase[bank.index()]);
        self.write_word(codec::frame_phase_word(bank, phasereg))
    }

    fn write_word(&mut self, word: u16) -> Result<(), Error<E>> {
        trace!("write register {=u16:#x}", word);
        match self.link.as_mut() {
            Some(link) => link.write_word(word).map_err(Error::Link),
            None => Err(Error::NotConfigured),
        }
    }

    fn check_frequency(freq_hz: f32, mclk_hz: u32) -> Result<(), Error<E>> {
        if !freq_hz.is_finite() || freq_hz < 0.0 {
            return Err(Error::InvalidFrequency);
        }
        if codec::frequency_to_register(freq_hz, mclk_hz) > codec::FREQ_REG_MAX {
            return Err(Error::InvalidFrequency);
        }
        Ok(())
    }

    fn check_phase(phase_rad: f32) -> Result<(), Error<E>> {
        if phase_rad.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidPhase)
        }
    }
}
