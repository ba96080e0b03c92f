use hal::blocking::delay::DelayUs;
use hal::digital::v2::OutputPin;

/// Write-only transport carrying 16-bit words to the chip.
pub trait SerialLink {
    type Error;

    /// Puts the lines into their idle levels. Called once, at the start of
    /// [`Ad9833::start`](crate::Ad9833::start).
    fn pin_initialize(&mut self) -> Result<(), Self::Error>;

    /// Shifts one complete 16-bit word out, framed by FSYNC.
    fn write_word(&mut self, word: u16) -> Result<(), Self::Error>;
}

/// Short fixed wait between line transitions.
pub trait Settle {
    fn settle(&mut self);
}

/// Busy-waits a fixed number of spin iterations.
///
/// The chip needs at most 10 ns between transitions. The default of ten
/// iterations covers that on MCUs clocked well above 100 MHz.
#[derive(Clone, Copy, Debug)]
pub struct SpinSettle {
    spins: u32,
}

impl SpinSettle {
    pub fn new(spins: u32) -> Self {
        Self { spins }
    }
}

impl Default for SpinSettle {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Settle for SpinSettle {
    #[inline(always)]
    fn settle(&mut self) {
        for _ in 0..self.spins {
            core::hint::spin_loop();
        }
    }
}

/// Settles for 1 µs using an `embedded-hal` delay.
pub struct DelaySettle<D> {
    delay: D,
}

impl<D: DelayUs<u8>> DelaySettle<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayUs<u8>> Settle for DelaySettle<D> {
    fn settle(&mut self) {
        self.delay.delay_us(1);
    }
}

/// Bit-banged link over three GPIO outputs.
///
/// | Pin   | Idle | Role                                   |
/// |-------|------|----------------------------------------|
/// | fsync | high | Active-low frame                       |
/// | sclk  | high | Data is latched on the falling edge    |
/// | sdata | low  | MSB first                              |
pub struct BitBangLink<Fsync, Sclk, Sdata, S = SpinSettle> {
    fsync: Fsync,
    sclk: Sclk,
    sdata: Sdata,
    settle: S,
}

impl<Fsync, Sclk, Sdata> BitBangLink<Fsync, Sclk, Sdata, SpinSettle> {
    /// Takes the three pins, settling with [`SpinSettle::default`].
    ///
    /// Pins must already be configured as push-pull outputs. Their levels are
    /// set by [`SerialLink::pin_initialize`].
    pub fn new(fsync: Fsync, sclk: Sclk, sdata: Sdata) -> Self {
        Self::with_settle(fsync, sclk, sdata, SpinSettle::default())
    }
}

impl<Fsync, Sclk, Sdata, S> BitBangLink<Fsync, Sclk, Sdata, S> {
    pub fn with_settle(fsync: Fsync, sclk: Sclk, sdata: Sdata, settle: S) -> Self {
        Self { fsync, sclk, sdata, settle }
    }

    /// Gives back the pins and the settle source.
    pub fn release(self) -> (Fsync, Sclk, Sdata, S) {
        (self.fsync, self.sclk, self.sdata, self.settle)
    }
}

impl<Fsync, Sclk, Sdata, S, E> SerialLink for BitBangLink<Fsync, Sclk, Sdata, S>
where
    Fsync: OutputPin<Error = E>,
    Sclk: OutputPin<Error = E>,
    Sdata: OutputPin<Error = E>,
    S: Settle,
{
    type Error = E;

    fn pin_initialize(&mut self) -> Result<(), E> {
        debug!("pin_initialize()");
        self.fsync.set_high()?;
        self.sclk.set_high()?;
        self.sdata.set_low()?;
        Ok(())
    }

    fn write_word(&mut self, word: u16) -> Result<(), E> {
        self.fsync.set_low()?;
        let shifted = self.shift_out(word);

        // The frame is closed even after a failed bit, otherwise the chip
        // keeps counting into the next word.
        let sdata = self.sdata.set_low();
        self.settle.settle();
        let fsync = self.fsync.set_high();
        self.settle.settle();
        shifted.and(sdata).and(fsync)
    }
}

impl<Fsync, Sclk, Sdata, S, E> BitBangLink<Fsync, Sclk, Sdata, S>
where
    Sclk: OutputPin<Error = E>,
    Sdata: OutputPin<Error = E>,
    S: Settle,
{
    fn shift_out(&mut self, word: u16) -> Result<(), E> {
        let mut data = word;
        for _ in 0..16 {
            self.sdata.set_state((data & 0x8000 != 0).into())?;
            self.settle.settle();
            self.sclk.set_low()?;
            self.settle.settle();
            self.sclk.set_high()?;
            data <<= 1;
        }
        Ok(())
    }
}
