//! Font acquisition for the CV renderer.
//!
//! The renderer needs a full TrueType family (regular, bold, italic, bold
//! italic) before any text can be measured or painted.  Resolution walks a
//! fixed chain: an explicit directory from the configuration, the bundled
//! `assets/fonts` directory (or `CVPRESS_FONTS_DIR`), and finally a set of
//! well-known system families.  Falling back past the configured family is a
//! logged degradation, not an error; only a fully exhausted chain fails.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::warn;

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the bundled font directory.
pub const FONTS_DIR_ENV: &str = "CVPRESS_FONTS_DIR";

/// The font family requested through the render configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontRequest {
    /// Family name; files are expected as `{name}-Regular.ttf` and friends.
    /// Empty means the bundled default.
    pub family: String,
    /// Directory to load the family from, bypassing the search chain.
    pub directory: Option<PathBuf>,
}

impl FontRequest {
    fn family_name(&self) -> &str {
        if self.family.trim().is_empty() {
            DEFAULT_FONT_FAMILY_NAME
        } else {
            &self.family
        }
    }
}

/// One system family the resolver can degrade to when the requested fonts
/// are unavailable.
struct SystemFamily {
    name: &'static str,
    directory: &'static str,
    files: [&'static str; 4],
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "Liberation Sans",
        directory: "/usr/share/fonts/truetype/liberation",
        files: [
            "LiberationSans-Regular.ttf",
            "LiberationSans-Bold.ttf",
            "LiberationSans-Italic.ttf",
            "LiberationSans-BoldItalic.ttf",
        ],
    },
    SystemFamily {
        name: "Liberation Sans",
        directory: "/usr/share/fonts/truetype/liberation2",
        files: [
            "LiberationSans-Regular.ttf",
            "LiberationSans-Bold.ttf",
            "LiberationSans-Italic.ttf",
            "LiberationSans-BoldItalic.ttf",
        ],
    },
    SystemFamily {
        name: "DejaVu Sans",
        directory: "/usr/share/fonts/truetype/dejavu",
        files: [
            "DejaVuSans.ttf",
            "DejaVuSans-Bold.ttf",
            "DejaVuSans-Oblique.ttf",
            "DejaVuSans-BoldOblique.ttf",
        ],
    },
    SystemFamily {
        name: "Arial",
        directory: "C:\\Windows\\Fonts",
        files: ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"],
    },
];

fn family_files(name: &str) -> [String; 4] {
    [
        format!("{}-Regular.ttf", name),
        format!("{}-Bold.ttf", name),
        format!("{}-Italic.ttf", name),
        format!("{}-BoldItalic.ttf", name),
    ]
}

fn bundled_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.iter().any(|existing| existing == &candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates
        .iter()
        .any(|existing| existing == &manifest_candidate)
    {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn directory_has_files(directory: &Path, files: &[String; 4]) -> bool {
    files.iter().all(|name| directory.join(name).is_file())
}

fn load_family_from_directory(directory: &Path, name: &str) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(directory, name, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                name,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn load_font_file(path: &Path) -> Result<FontData, Error> {
    let data = fs::read(path).map_err(|err| {
        Error::new(
            format!("Failed to read font file {}: {}", path.display(), err),
            err,
        )
    })?;
    FontData::new(data, None).map_err(|err| {
        Error::new(
            format!("Failed to parse font file {}: {}", path.display(), err),
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        )
    })
}

fn load_system_family(family: &SystemFamily) -> Result<FontFamily<FontData>, Error> {
    let directory = Path::new(family.directory);
    Ok(FontFamily {
        regular: load_font_file(&directory.join(family.files[0]))?,
        bold: load_font_file(&directory.join(family.files[1]))?,
        italic: load_font_file(&directory.join(family.files[2]))?,
        bold_italic: load_font_file(&directory.join(family.files[3]))?,
    })
}

fn resolve_bundled_directory(files: &[String; 4]) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in bundled_directory_candidates() {
        if candidate.is_dir() && directory_has_files(&candidate, files) {
            return Ok(candidate);
        }
        attempts.push(candidate.display().to_string());
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(Error::new(
        format!(
            "Unable to locate a font directory containing {}. Checked: {}. \
             See assets/fonts/README.md or set {}.",
            files[0], summary, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Resolves a complete font family for the given request.
///
/// An explicit `directory` in the request is authoritative and never falls
/// back.  Otherwise the bundled directory chain is tried first and the system
/// families after it, with a `warn!` when the renderer has to degrade.
pub fn resolve_font_family(request: &FontRequest) -> Result<FontFamily<FontData>, Error> {
    let name = request.family_name();

    if let Some(directory) = &request.directory {
        return load_family_from_directory(directory, name);
    }

    let files = family_files(name);
    let bundled_err = match resolve_bundled_directory(&files) {
        Ok(directory) => return load_family_from_directory(&directory, name),
        Err(err) if fonts_missing(&err) => err,
        Err(err) => return Err(err),
    };

    for fallback in SYSTEM_FAMILIES {
        match load_system_family(fallback) {
            Ok(family) => {
                warn!(
                    "Font family '{}' unavailable ({}); falling back to system '{}' from {}.",
                    name, bundled_err, fallback.name, fallback.directory
                );
                return Ok(family);
            }
            Err(_) => continue,
        }
    }

    Err(Error::new(
        format!(
            "Font family '{}' unavailable and no system fallback was found: {}",
            name, bundled_err
        ),
        io::Error::new(io::ErrorKind::NotFound, "no usable fonts are available"),
    ))
}

/// Whether [`resolve_font_family`] would succeed for the default request.
/// Rendering tests use this to skip on machines without fonts.
pub fn fonts_available() -> bool {
    resolve_font_family(&FontRequest::default()).is_ok()
}
