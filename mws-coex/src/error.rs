//! Error types for the MWS crate.

/// A return value from a protocol [`Handler`](crate::Handler).
///
/// Zero acknowledges the event. Any other value refuses it, except for
/// [`Event::GetInactivityDuration`](crate::Event::GetInactivityDuration) where the value is the
/// reported duration in microseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RetVal(u32);

impl RetVal {
    /// A successful return value.
    pub const SUCCESS: RetVal = RetVal(0);

    /// A generic refusal.
    pub const REFUSED: RetVal = RetVal(1);

    /// Create a new `RetVal` from an integer.
    pub const fn new(n: u32) -> Self {
        RetVal(n)
    }

    /// The raw value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` if the handler acknowledged the event.
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Convert the `RetVal` to a `Result`.
    ///
    /// Zero is returned as `Ok(())`, anything else as `Err(Error::Failed)`.
    pub const fn to_result(self) -> Result<(), Error> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::Failed)
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RetVal {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "RetVal({=u32})", self.0)
    }
}

impl core::fmt::Debug for RetVal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RetVal").field(&self.0).finish()
    }
}

impl From<u32> for RetVal {
    fn from(value: u32) -> Self {
        RetVal(value)
    }
}

impl From<RetVal> for u32 {
    fn from(value: RetVal) -> Self {
        value.0
    }
}

impl From<Result<(), Error>> for RetVal {
    fn from(value: Result<(), Error>) -> Self {
        match value {
            Ok(()) => RetVal::SUCCESS,
            Err(_) => RetVal::REFUSED,
        }
    }
}

/// An error returned by the arbiter.
///
/// A successful operation is reported as `Ok(())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The request lost arbitration. This is an expected outcome; retrying is up to the caller.
    Denied,
    /// The protocol identifier is the `None` sentinel, out of range, or not registered.
    InvalidParameter,
    /// A protocol handler refused an event.
    Failed,
}

impl Error {
    /// Raw status code, as used by C protocol stacks.
    ///
    /// `0` is reserved for success, see [`status_code`].
    pub const fn code(self) -> u8 {
        match self {
            Error::Denied => 1,
            Error::InvalidParameter => 2,
            Error::Failed => 3,
        }
    }

    /// Parse a raw status code. `0` (success) and unknown codes return `None`.
    pub const fn from_code(code: u8) -> Option<Error> {
        match code {
            1 => Some(Error::Denied),
            2 => Some(Error::InvalidParameter),
            3 => Some(Error::Failed),
            _ => None,
        }
    }
}

/// Raw status code of an arbiter result.
pub const fn status_code(result: Result<(), Error>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Denied => f.write_str("request denied"),
            Error::InvalidParameter => f.write_str("invalid parameter"),
            Error::Failed => f.write_str("protocol handler refused the event"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retval_to_result() {
        assert_eq!(RetVal::SUCCESS.to_result(), Ok(()));
        assert_eq!(RetVal::new(7).to_result(), Err(Error::Failed));
        assert_eq!(RetVal::from(Err(Error::Denied)), RetVal::REFUSED);
        assert_eq!(u32::from(RetVal::new(1500)), 1500);
    }

    #[test]
    fn status_codes() {
        assert_eq!(status_code(Ok(())), 0);
        for err in [Error::Denied, Error::InvalidParameter, Error::Failed] {
            assert_eq!(Error::from_code(status_code(Err(err))), Some(err));
        }
        assert_eq!(Error::from_code(0), None);
        assert_eq!(Error::from_code(9), None);
    }
}
