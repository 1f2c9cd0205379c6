use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Dotted version with an optional qualifier (e.g. "5.2", "2.1-SNAPSHOT")
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    major: u32,
    minor: u32,
    patch: u32,
    qualifier: Option<String>,
}

impl Version {
    /// Build a version from numeric components only
    pub fn of(major: u32, minor: u32) -> Self {
        Version {
            raw: format!("{}.{}", major, minor),
            major,
            minor,
            patch: 0,
            qualifier: None,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// A version is a release unless it carries the SNAPSHOT qualifier
    pub fn is_release(&self) -> bool {
        self.qualifier.as_deref() != Some("SNAPSHOT")
    }

    /// Compare numeric components only; qualifiers are ignored so that
    /// "2.1-SNAPSHOT" already counts as 2.1
    pub fn is_greater_than_or_equals(&self, other: &Version) -> bool {
        (self.major, self.minor, self.patch) >= (other.major, other.minor, other.patch)
    }
}

impl FromStr for Version {
    type Err = InvalidVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numbers, qualifier) = match s.split_once('-') {
            Some((n, q)) if !q.is_empty() => (n, Some(q.to_string())),
            Some(_) => return Err(InvalidVersionError::new(s)),
            None => (s, None),
        };

        let mut components = [0u32; 3];
        let mut count = 0;
        for part in numbers.split('.') {
            if count >= 3 {
                return Err(InvalidVersionError::new(s));
            }
            components[count] = part.parse().map_err(|_| InvalidVersionError::new(s))?;
            count += 1;
        }
        if count == 0 {
            return Err(InvalidVersionError::new(s));
        }

        Ok(Version {
            raw: s.to_string(),
            major: components[0],
            minor: components[1],
            patch: components[2],
            qualifier,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            // A release ranks above its own snapshot
            .then_with(|| match (&self.qualifier, &other.qualifier) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Raised when a version string cannot be parsed
#[derive(Debug)]
pub struct InvalidVersionError {
    input: String,
}

impl InvalidVersionError {
    fn new(input: &str) -> Self {
        InvalidVersionError {
            input: input.to_string(),
        }
    }
}

impl fmt::Display for InvalidVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid version: '{}'", self.input)
    }
}

impl Error for InvalidVersionError {}
