//! Target language selection.

use std::fmt;
use std::str::FromStr;

/// Languages a record can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetLanguage {
    /// C++17 header.
    Cpp,
    /// Kotlin source.
    Kotlin,
    /// Python 3 module.
    Python,
    /// Rust module.
    Rust,
}

impl TargetLanguage {
    /// Every supported target.
    pub const ALL: [Self; 4] = [Self::Cpp, Self::Kotlin, Self::Python, Self::Rust];

    /// Returns the short name used on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::Kotlin => "kotlin",
            Self::Python => "python",
            Self::Rust => "rust",
        }
    }

    /// Returns the file extension of generated artifacts.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Cpp => "h",
            Self::Kotlin => "kt",
            Self::Python => "py",
            Self::Rust => "rs",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTarget(pub String);

impl fmt::Display for UnknownTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown target language '{}'", self.0)
    }
}

impl std::error::Error for UnknownTarget {}

impl FromStr for TargetLanguage {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "python" | "py" => Ok(Self::Python),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_str() {
        assert_eq!("cpp".parse(), Ok(TargetLanguage::Cpp));
        assert_eq!("C++".parse(), Ok(TargetLanguage::Cpp));
        assert_eq!("kt".parse(), Ok(TargetLanguage::Kotlin));
        assert_eq!("Python".parse(), Ok(TargetLanguage::Python));
        assert_eq!("rs".parse(), Ok(TargetLanguage::Rust));
        assert!("cobol".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_target_names_round_trip() {
        for target in TargetLanguage::ALL {
            assert_eq!(target.name().parse(), Ok(target));
        }
    }

    #[test]
    fn test_target_extension() {
        assert_eq!(TargetLanguage::Cpp.extension(), "h");
        assert_eq!(TargetLanguage::Kotlin.extension(), "kt");
        assert_eq!(TargetLanguage::Python.extension(), "py");
        assert_eq!(TargetLanguage::Rust.extension(), "rs");
    }
}
