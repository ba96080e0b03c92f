use core::fmt;

/// Caller misuse and transport failures.
///
/// Every variant except [`Error::Link`] is detected before anything is
/// written to the chip, so the in-memory image and the chip stay in step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The serial link failed while writing
    Link(E),
    /// `start` was called before a serial link was configured
    NotConfigured,
    /// `start` already ran, or pins were reconfigured after it
    AlreadyStarted,
    /// Bank number other than 0 or 1
    InvalidBank(u8),
    /// Reference clock of 0 Hz
    InvalidClock,
    /// Frequency is negative, not finite or does not fit 28 bits at the
    /// configured reference clock
    InvalidFrequency,
    /// Phase is not finite
    InvalidPhase,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Link(e) => write!(f, "serial link error: {:?}", e),
            Error::NotConfigured => f.write_str("serial link not configured"),
            Error::AlreadyStarted => f.write_str("device already started"),
            Error::InvalidBank(n) => write!(f, "invalid register bank {}", n),
            Error::InvalidClock => f.write_str("reference clock must be non-zero"),
            Error::InvalidFrequency => f.write_str("frequency out of range"),
            Error::InvalidPhase => f.write_str("phase is not finite"),
        }
    }
}

/// Raw bank number that is neither 0 nor 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidBank(pub u8);

impl<E> From<InvalidBank> for Error<E> {
    fn from(InvalidBank(n): InvalidBank) -> Self {
        Error::InvalidBank(n)
    }
}
