/*!
    Time bases and the integer rescaling between them.
*/

use std::fmt;

/**
    A fraction as libav reports it, for stream time bases (1/25, 1/90000)
    and frame rates (25/1, 30000/1001).
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /**
        The millisecond time base, 1/1000.
    */
    pub const MILLIS: Self = Self { num: 1, den: 1000 };

    /**
        # Panics

        Panics if `den` is zero. Values read from libav that may carry a
        zero denominator are built field by field instead.
    */
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "zero denominator");
        Self { num, den }
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /**
        Returns true if this is a usable value (non-zero numerator and denominator).

        FFmpeg reports unknown frame rates as `0/1` or `0/0`.
    */
    pub const fn is_valid(self) -> bool {
        self.num != 0 && self.den != 0
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/**
    Rescale `value` from time base `from` to time base `to`.

    Rounds to the nearest integer with halves away from zero, matching
    FFmpeg's `av_rescale_q`. Results outside the `i64` range saturate.
*/
pub fn rescale(value: i64, from: Rational, to: Rational) -> i64 {
    let b = from.num as i128 * to.den as i128;
    let c = from.den as i128 * to.num as i128;
    if c == 0 {
        return 0;
    }

    let product = value as i128 * b;
    let negative = (product < 0) != (c < 0);
    let (n, d) = (product.abs(), c.abs());
    let magnitude = (n + d / 2) / d;
    let result = if negative { -magnitude } else { magnitude };

    result.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
