//! Dotted-integer versions and the constraint intervals that admit them.
//!
//! A version is one to three dotted integer segments, most significant
//! first: `7`, `1.4`, `2.0.13`. A constraint is either an exact version,
//! which admits only itself, or a bracketed range such as `[1.0,2.0)` whose
//! bracket characters pick per-side inclusivity. An empty side leaves the
//! range open at that end: `(,1.5]` admits everything up to 1.5, `[2.0,)`
//! everything from 2.0 up.

use std::cmp::Ordering;

use thiserror::Error;

/// Constraint admitting every version: one segment, from zero up.
pub const ANY_VERSION: &str = "[0,)";

/// Why a constraint string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The constraint string was empty.
    #[error("empty version constraint")]
    Empty,

    /// A range opened without closing, or closed without opening.
    #[error("unbalanced range brackets in `{0}`")]
    UnbalancedBrackets(String),

    /// A range had no `,` separating its bounds.
    #[error("range `{0}` is missing the `,` between its bounds")]
    MissingComma(String),

    /// Both sides of a range were left empty, so neither can lend the other
    /// its segment count.
    #[error("range `{0}` leaves both bounds empty")]
    EmptyBounds(String),

    /// A version segment was not a non-negative integer in range.
    #[error("version segment `{0}` is not a non-negative integer")]
    InvalidSegment(String),

    /// A version had no segments, or more than the supported three.
    #[error("expected 1 to 3 version segments, found {0}")]
    SegmentCount(usize),

    /// The two bounds of a range disagree on segment count.
    #[error("range bounds disagree on segment count: lower has {lower}, upper has {upper}")]
    MismatchedArity {
        /// Segment count of the lower bound.
        lower: usize,
        /// Segment count of the upper bound.
        upper: usize,
    },
}

/// A parsed version: dotted integer segments, most significant first.
///
/// Versions do not implement `Ord`: ordering is only defined between
/// versions of equal arity, which [`compare`] checks. Deriving `Ord` would
/// silently tie-break mismatched arities by length instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(Vec<u32>);

impl Version {
    /// Most segments a version may carry.
    pub const MAX_SEGMENTS: usize = 3;

    /// Parse a dotted-integer version of one to three segments.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment is not a non-negative integer or the
    /// segment count is out of range.
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let raw: Vec<&str> = text.split('.').collect();
        if raw.len() > Self::MAX_SEGMENTS {
            return Err(ConstraintError::SegmentCount(raw.len()));
        }
        let mut segments = Vec::with_capacity(raw.len());
        for part in raw {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConstraintError::InvalidSegment(part.to_string()));
            }
            let value = part
                .parse::<u32>()
                .map_err(|_| ConstraintError::InvalidSegment(part.to_string()))?;
            segments.push(value);
        }
        Ok(Self(segments))
    }

    /// The version's segments, most significant first.
    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    /// Number of segments.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// All-zero version of the given arity, the synthesized lower bound of
    /// a range with an empty left side.
    fn zeros(arity: usize) -> Self {
        Self(vec![0; arity])
    }

    /// All-maximum version of the given arity, the synthesized upper bound
    /// of a range with an empty right side.
    fn maxed(arity: usize) -> Self {
        Self(vec![u32::MAX; arity])
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Version {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Compare two versions segment by segment, most significant first.
///
/// Both versions must have the same arity. The naming pattern guarantees
/// this for scanned candidates; handing in mismatched arities is a caller
/// bug and trips a debug assertion.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    debug_assert_eq!(a.arity(), b.arity(), "version arity mismatch");
    a.0.cmp(&b.0)
}

/// A version interval with per-side inclusivity.
///
/// Produced by [`VersionInterval::parse`]; an exact constraint becomes the
/// degenerate interval whose bounds coincide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInterval {
    lower: Version,
    upper: Version,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl VersionInterval {
    /// The degenerate interval admitting exactly one version.
    pub fn exact(version: Version) -> Self {
        Self {
            lower: version.clone(),
            upper: version,
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    /// Parse a constraint string into an interval.
    ///
    /// A bare version is an exact constraint. A bracketed `lower,upper` pair
    /// is a range; an empty side is synthesized from the other side's arity
    /// (zeros below, maximums above) and is always inclusive, so open-ended
    /// ranges admit their sentinel values.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or unbalanced constraints, ranges missing
    /// their comma, ranges with both sides empty, and bounds that do not
    /// parse or disagree on segment count.
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConstraintError::Empty);
        }

        let opens = text.starts_with(['[', '(']);
        let closes = text.ends_with([']', ')']);
        if opens != closes {
            return Err(ConstraintError::UnbalancedBrackets(text.to_string()));
        }
        if !opens {
            return Ok(Self::exact(Version::parse(text)?));
        }

        let lower_inclusive = text.starts_with('[');
        let upper_inclusive = text.ends_with(']');
        let interior = &text[1..text.len() - 1];
        let Some((lower_part, upper_part)) = interior.split_once(',') else {
            return Err(ConstraintError::MissingComma(text.to_string()));
        };
        let lower_part = lower_part.trim();
        let upper_part = upper_part.trim();

        match (lower_part.is_empty(), upper_part.is_empty()) {
            (true, true) => Err(ConstraintError::EmptyBounds(text.to_string())),
            (true, false) => {
                let upper = Version::parse(upper_part)?;
                let lower = Version::zeros(upper.arity());
                Ok(Self {
                    lower,
                    upper,
                    lower_inclusive: true,
                    upper_inclusive,
                })
            }
            (false, true) => {
                let lower = Version::parse(lower_part)?;
                let upper = Version::maxed(lower.arity());
                Ok(Self {
                    lower,
                    upper,
                    lower_inclusive,
                    upper_inclusive: true,
                })
            }
            (false, false) => {
                let lower = Version::parse(lower_part)?;
                let upper = Version::parse(upper_part)?;
                if lower.arity() != upper.arity() {
                    return Err(ConstraintError::MismatchedArity {
                        lower: lower.arity(),
                        upper: upper.arity(),
                    });
                }
                Ok(Self {
                    lower,
                    upper,
                    lower_inclusive,
                    upper_inclusive,
                })
            }
        }
    }

    /// Whether the interval admits `candidate`.
    ///
    /// The candidate's arity must equal the interval's.
    pub fn admits(&self, candidate: &Version) -> bool {
        match compare(candidate, &self.lower) {
            Ordering::Less => return false,
            Ordering::Equal if !self.lower_inclusive => return false,
            _ => {}
        }
        match compare(candidate, &self.upper) {
            Ordering::Greater => false,
            Ordering::Equal if !self.upper_inclusive => false,
            _ => true,
        }
    }

    /// Segment count shared by both bounds.
    pub fn arity(&self) -> usize {
        self.lower.arity()
    }

    /// The lower bound.
    pub fn lower(&self) -> &Version {
        &self.lower
    }

    /// The upper bound.
    pub fn upper(&self) -> &Version {
        &self.upper
    }

    /// Whether the lower bound itself is admitted.
    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    /// Whether the upper bound itself is admitted.
    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }
}

impl std::str::FromStr for VersionInterval {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
