//! Bounds for the client’s timeouts.

use std::cmp;

//------------ DefMinMax -----------------------------------------------------

/// The default and the permitted range of a timeout.
///
/// There is one of these for the resolve timeout and one for the probe’s
/// IO timeout. The setters of [`Config`][crate::Config] run whatever the
/// user asks for through [`limit`][Self::limit], so a zero timeout can’t fail
/// every query outright and a huge one can’t keep a probe waiting on a
/// silent server for hours.
#[derive(Clone, Copy, Debug)]
pub struct DefMinMax<T> {
    /// Used when nothing was configured.
    def: T,

    /// The shortest value accepted.
    min: T,

    /// The longest value accepted.
    max: T,
}

impl<T> DefMinMax<T> {
    /// Creates the bounds from a default, a minimum, and a maximum.
    pub const fn new(def: T, min: T, max: T) -> Self {
        Self { def, min, max }
    }

    /// Returns the default value.
    pub fn default(self) -> T {
        self.def
    }

    /// Clamps a configured value into the permitted range.
    pub fn limit(self, value: T) -> T
    where
        T: Ord,
    {
        cmp::max(self.min, cmp::min(self.max, value))
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    const TIMEOUT: DefMinMax<Duration> = DefMinMax::new(
        Duration::from_secs(5),
        Duration::from_millis(1),
        Duration::from_secs(600),
    );

    #[test]
    fn limit_timeouts() {
        assert_eq!(TIMEOUT.default(), Duration::from_secs(5));
        assert_eq!(TIMEOUT.limit(Duration::ZERO), Duration::from_millis(1));
        assert_eq!(
            TIMEOUT.limit(Duration::from_secs(3600)),
            Duration::from_secs(600)
        );
        assert_eq!(
            TIMEOUT.limit(Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }
}
