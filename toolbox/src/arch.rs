//! CPU architectures installers are offered for.

use std::{fmt, str::FromStr};

use serde::{Serialize, Deserialize};

use crate::result::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Amd64,
    Arm64,
    Win32,
}

impl Arch {
    pub const ALL: [Arch; 3] = [Arch::Amd64, Arch::Arm64, Arch::Win32];

    /// Guesses the architecture of the host from the compilation target: 64-bit x86 maps to
    /// [Arch::Amd64], any 32-bit target to [Arch::Win32] and everything else to [Arch::Arm64].
    pub fn host() -> Self {
        if cfg!(target_arch = "x86_64") {
            Arch::Amd64
        } else if cfg!(target_pointer_width = "32") {
            Arch::Win32
        } else {
            Arch::Arm64
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
            Arch::Win32 => "win32",
        }
    }

    /// Returns the architecture after this one in [Arch::ALL], wrapping around.
    pub fn next(self) -> Self {
        let i = Arch::ALL.iter().position(|&arch| arch == self).unwrap_or(0);
        Arch::ALL[(i + 1) % Arch::ALL.len()]
    }

    /// Returns the architecture before this one in [Arch::ALL], wrapping around.
    pub fn prev(self) -> Self {
        let i = Arch::ALL.iter().position(|&arch| arch == self).unwrap_or(0);
        Arch::ALL[(i + Arch::ALL.len() - 1) % Arch::ALL.len()]
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Arch::ALL.into_iter()
            .find(|arch| arch.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnsupportedArch(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let data = [
            ("amd64", Some(Arch::Amd64)),
            ("ARM64", Some(Arch::Arm64)),
            (" Win32 ", Some(Arch::Win32)),
            ("x86", None),
            ("", None),
        ];

        for (input, expected) in data {
            match (input.parse::<Arch>(), expected) {
                (Ok(arch), Some(expected)) => assert_eq!(arch, expected),
                (Err(Error::UnsupportedArch(s)), None) => assert_eq!(s, input),
                (result, _) => panic!("unexpected result for '{input}': {result:?}"),
            }
        }
    }

    #[test]
    fn cycle() {
        for arch in Arch::ALL {
            assert_eq!(arch.next().prev(), arch);
        }
        assert_eq!(Arch::Win32.next(), Arch::Amd64);
        assert_eq!(Arch::Amd64.prev(), Arch::Win32);
    }

    #[test]
    fn display_matches_serde() {
        for arch in Arch::ALL {
            let json = serde_json::to_string(&arch).unwrap();
            assert_eq!(json, format!("\"{arch}\""));
        }
    }
}
