/*!
    Stream timestamps and their conversion to milliseconds.
*/

use crate::{Rational, rational::rescale};

/**
    A timestamp counted in ticks of some stream's time base.

    The value means nothing on its own; pair it with the time base of the
    stream it came from.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Whole milliseconds, rounded to nearest.

        Negative values are kept, since streams with an edit list may
        legitimately start before zero.
    */
    pub fn to_millis(self, time_base: Rational) -> i64 {
        rescale(self.0, time_base, Rational::MILLIS)
    }

    /**
        The tick nearest to `millis` in `time_base`.
    */
    pub fn from_millis(millis: i64, time_base: Rational) -> Self {
        Self(rescale(millis, Rational::MILLIS, time_base))
    }
}
