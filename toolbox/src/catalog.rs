//! Built-in catalogs of pip libraries, desktop applications and Python installers.
//!
//! Both catalogs are embedded JSON documents. Libraries are stored as an object mapping each
//! library name to its description; applications as an array of [Application] records.

use std::fmt;

use deunicode::AsciiChars;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::{
    arch::Arch,
    result::*,
};

/// Python release offered for download.
pub const PYTHON_VERSION: &str = "3.13.7";

/// Mirror hosting the Python installers.
const PYTHON_MIRROR: &str = "https://mirrors.huaweicloud.com/python";

const LIBRARIES_JSON: &str = include_str!("../data/libraries.json");
const APPLICATIONS_JSON: &str = include_str!("../data/applications.json");

/// Returns the download URL of the Python installer for an architecture.
pub fn python_installer(arch: Arch) -> String {
    let file_name = match arch {
        Arch::Amd64 => format!("python-{PYTHON_VERSION}-amd64.exe"),
        Arch::Arm64 => format!("python-{PYTHON_VERSION}-arm64.exe"),
        Arch::Win32 => format!("python-{PYTHON_VERSION}.exe"),
    };
    format!("{PYTHON_MIRROR}/{PYTHON_VERSION}/{file_name}")
}

/// A library installable with `pip`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Library {
    pub name: String,
    pub description: String,
}

/// A desktop application with an installer per architecture.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Application {
    pub name: String,
    pub amd64: Option<String>,
    pub win32: Option<String>,
}

impl Application {
    /// Returns the installer URL for an architecture, if one is offered.
    pub fn url(&self, arch: Arch) -> Option<&str> {
        match arch {
            Arch::Amd64 => self.amd64.as_deref(),
            Arch::Win32 => self.win32.as_deref(),
            Arch::Arm64 => None,
        }
    }

    /// Returns all architectures an installer is offered for.
    pub fn architectures(&self) -> Vec<Arch> {
        Arch::ALL.into_iter()
            .filter(|&arch| self.url(arch).is_some())
            .collect()
    }

    /// Returns the architecture downloaded by default: amd64, or win32 when amd64 is missing.
    pub fn preferred(&self) -> Option<Arch> {
        [Arch::Amd64, Arch::Win32].into_iter()
            .find(|&arch| self.url(arch).is_some())
    }
}

/// Holds the libraries and applications offered by the Navigator.
#[derive(Debug, Clone)]
pub struct Catalog {
    libraries: Vec<Library>,
    applications: Vec<Application>,
}

impl Catalog {
    /// Loads the embedded catalogs.
    ///
    /// # Errors
    /// * [`Error::JSON`] if an embedded document is corrupt.
    pub fn builtin() -> Result<Self> {
        Catalog::from_json(LIBRARIES_JSON, APPLICATIONS_JSON)
    }

    /// Parses catalogs from JSON documents in the embedded format.
    ///
    /// # Errors
    /// * [`Error::JSON`] if a document cannot be parsed.
    pub fn from_json(libraries: &str, applications: &str) -> Result<Self> {
        let libraries = serde_json::from_str::<Libraries>(libraries)
            .map_err(|e| Error::JSON(e, "libraries"))?
            .0;
        let applications = serde_json::from_str::<Vec<Application>>(applications)
            .map_err(|e| Error::JSON(e, "applications"))?;

        log::debug!("loaded {} libraries and {} applications", libraries.len(), applications.len());
        Ok(Catalog { libraries, applications })
    }

    /// Returns a slice of all libraries in catalog order.
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Returns a slice of all applications in catalog order.
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Returns the index of the first library whose name equals the query or contains it,
    /// ignoring case.
    pub fn find_library(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        self.libraries.iter()
            .position(|library| {
                library.name == query || library.name.to_lowercase().contains(&query)
            })
    }
}

/// Library list deserialized from a JSON object while keeping document order.
struct Libraries(Vec<Library>);

impl<'de> Deserialize<'de> for Libraries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LibrariesVisitor;

        impl<'de> Visitor<'de> for LibrariesVisitor {
            type Value = Libraries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping library names to descriptions")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Libraries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut libraries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, description)) = map.next_entry::<String, String>()? {
                    libraries.push(Library { name, description });
                }
                Ok(Libraries(libraries))
            }
        }

        deserializer.deserialize_map(LibrariesVisitor)
    }
}

/// Converts an application name into a portable directory name, adhering to the POSIX portable
/// filename character set.
pub fn folder_name(name: &str) -> String {
    const LEGAL_SYMBOLS: &str = "._-";

    name
        .ascii_chars()               // attempt to convert all non-ascii charcters
        .flatten()                   // discard characters with no known ascii representation
        .flat_map(|str| str.chars()) // iterate over all converted characters
        .filter_map(|c| {            // filter or normalize invalid path characters
            if LEGAL_SYMBOLS.contains(c) {
                Some(c)
            } else if c.is_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == ' ' {
                Some('_')
            } else {
                None
            }
        })
        .take(255)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(catalog.libraries().len(), 141);
        assert_eq!(catalog.libraries()[0].name, "pyinstaller");
        assert_eq!(catalog.libraries().last().unwrap().name, "kivy");

        let names: Vec<&str> = catalog.applications().iter()
            .map(|app| app.name.as_str())
            .collect();
        assert_eq!(names, [
            "Atom", "Blender", "Git", "VSCodium", "Docker", "VirtualBox", "Wireshark", "RustDesk"
        ]);
        for app in catalog.applications() {
            assert!(app.preferred().is_some(), "{} offers no installer", app.name);
        }
    }

    #[test]
    fn find_library() {
        let catalog = Catalog::from_json(
            r#"{ "pytest-cov": "a", "pytest": "b", "Flask": "c", "requests": "d" }"#,
            "[]",
        ).unwrap();

        let data = [
            ("pytest", Some(0)),
            ("PyTest-Cov", Some(0)),
            ("flask", Some(2)),
            ("quest", Some(3)),
            ("", Some(0)),
            ("django", None),
        ];

        for (query, expected) in data {
            assert_eq!(catalog.find_library(query), expected, "query '{query}'");
        }
    }

    #[test]
    fn library_order_is_kept() {
        let catalog = Catalog::from_json(r#"{ "zeta": "z", "alpha": "a", "mu": "m" }"#, "[]").unwrap();
        let names: Vec<&str> = catalog.libraries().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mu"]);
    }

    #[test]
    fn corrupt_catalog() {
        let result = Catalog::from_json(r#"["pytest"]"#, "[]");
        assert!(matches!(result, Err(Error::JSON(_, "libraries"))));

        let result = Catalog::from_json("{}", r#"[{ "name": 1 }]"#);
        assert!(matches!(result, Err(Error::JSON(_, "applications"))));
    }

    #[test]
    fn application_urls() {
        let app = Application {
            name: "RustDesk".to_owned(),
            amd64: None,
            win32: Some("https://example.org/rustdesk.exe".to_owned()),
        };

        assert_eq!(app.url(Arch::Amd64), None);
        assert_eq!(app.url(Arch::Win32), Some("https://example.org/rustdesk.exe"));
        assert_eq!(app.url(Arch::Arm64), None);
        assert_eq!(app.architectures(), [Arch::Win32]);
        assert_eq!(app.preferred(), Some(Arch::Win32));
    }

    #[test]
    fn python_installers() {
        let data = [
            (Arch::Amd64, "https://mirrors.huaweicloud.com/python/3.13.7/python-3.13.7-amd64.exe"),
            (Arch::Arm64, "https://mirrors.huaweicloud.com/python/3.13.7/python-3.13.7-arm64.exe"),
            (Arch::Win32, "https://mirrors.huaweicloud.com/python/3.13.7/python-3.13.7.exe"),
        ];

        for (arch, url) in data {
            assert_eq!(python_installer(arch), url);
        }
    }

    #[test]
    fn folder_names() {
        let data = [
            ("Git", "git"),
            ("Vitrual box", "vitrual_box"),
            ("VSCodium 1.103", "vscodium_1.103"),
            ("Notepad++", "notepad"),
            ("åäö", "aao"),
        ];

        for (name, expected) in data {
            assert_eq!(folder_name(name), expected);
        }
    }
}
