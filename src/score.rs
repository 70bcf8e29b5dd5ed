use std::fmt;
use std::ops::Neg;

// Positive favours White. MIN and MAX stand in for minus and plus infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const MATE: Score = Score(1000);
    pub const MAX: Score = Score(i32::MAX);
    pub const MIN: Score = Score(i32::MIN);

    pub const fn new(value: i32) -> Self {
        Score(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    pub fn is_mate(self) -> bool {
        self.0.unsigned_abs() == Self::MATE.0.unsigned_abs()
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        match self {
            Score::MIN => Score::MAX,
            Score::MAX => Score::MIN,
            Score(value) => Score(-value),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Score::MAX => write!(f, "+inf"),
            Score::MIN => write!(f, "-inf"),
            Score(value) if self.is_mate() => write!(f, "{}mate", if value > 0 { "+" } else { "-" }),
            Score(value) => write!(f, "{value:+}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_bracket_mate() {
        assert!(Score::MIN < -Score::MATE);
        assert!(Score::MATE < Score::MAX);
        assert!(-Score::MATE < Score::ZERO);
    }

    #[test]
    fn negating_sentinels_swaps_them() {
        assert_eq!(-Score::MAX, Score::MIN);
        assert_eq!(-Score::MIN, Score::MAX);
        assert_eq!(-Score::new(3), Score::new(-3));
    }

    #[test]
    fn display() {
        assert_eq!(Score::new(3).to_string(), "+3");
        assert_eq!(Score::new(-2).to_string(), "-2");
        assert_eq!(Score::ZERO.to_string(), "+0");
        assert_eq!(Score::MATE.to_string(), "+mate");
        assert_eq!((-Score::MATE).to_string(), "-mate");
        assert_eq!(Score::MAX.to_string(), "+inf");
        assert_eq!(Score::MIN.to_string(), "-inf");
    }
}
