//! Font discovery.
//!
//! The configuration names a font family the way CSS `font-family` does;
//! this module resolves the family to a font file installed on the
//! machine. `SUKASHI_FONT_DIR` can point at a directory of `.ttf`/`.otf`
//! files and takes priority over the system locations. When the requested
//! family cannot be found, rendering falls back to a common sans-serif
//! face rather than failing, matching how a browser canvas substitutes
//! missing families.

use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::RenderError;

/// Selectable font families with their display labels.
pub const FONT_OPTIONS: &[(&str, &str)] = &[
    ("Arial", "Arial"),
    ("SimSun", "宋体"),
    ("SimHei", "黑体"),
    ("Microsoft YaHei", "微软雅黑"),
    ("KaiTi", "楷体"),
    ("FangSong", "仿宋"),
    ("Microsoft JhengHei", "微软正黑体"),
    ("PingFang SC", "苹方"),
    ("Hiragino Sans GB", "冬青黑体"),
    ("Source Han Sans CN", "思源黑体"),
    ("Source Han Serif CN", "思源宋体"),
    ("Noto Sans CJK SC", "Noto Sans 中文"),
    ("Times New Roman", "Times New Roman"),
    ("Georgia", "Georgia"),
    ("Verdana", "Verdana"),
    ("Courier New", "Courier New"),
];

/// File stems tried when neither the requested family nor its aliases
/// are installed.
const FALLBACK_STEMS: &[&str] = &[
    "dejavusans",
    "liberationsans",
    "notosans",
    "arimo",
    "freesans",
];

const SCAN_DEPTH: usize = 3;

/// Resolve a font family to a loaded font.
///
/// `family` may also be a direct path to a `.ttf`/`.otf`/`.ttc` file.
pub fn load_font(family: &str) -> Result<FontVec, RenderError> {
    let as_path = Path::new(family);
    if is_font_file(as_path) {
        if as_path.is_file() {
            return load_file(as_path);
        }
        return Err(RenderError::FontError(format!(
            "Font file not found: {}",
            family
        )));
    }

    let files = collect_all_font_files();
    if files.is_empty() {
        return Err(RenderError::FontError(
            "No font files found; install fonts or set SUKASHI_FONT_DIR".to_string(),
        ));
    }

    for candidate in candidate_stems(family) {
        if let Some(path) = match_stem(&files, &candidate) {
            debug!(family = %family, path = %path.display(), "Resolved watermark font");
            return load_file(path);
        }
    }

    for stem in FALLBACK_STEMS {
        if let Some(path) = match_stem(&files, stem) {
            warn!(
                family = %family,
                fallback = %path.display(),
                "Font family not installed, substituting"
            );
            return load_file(path);
        }
    }

    // Last resort: any parseable font beats no watermark at all
    for path in &files {
        if let Ok(font) = load_file(path) {
            warn!(
                family = %family,
                fallback = %path.display(),
                "Font family not installed, substituting"
            );
            return Ok(font);
        }
    }

    Err(RenderError::FontError(format!(
        "No usable font found for family '{}'",
        family
    )))
}

/// First parseable font on the machine, if any. Used by tests and
/// benchmarks that only need some font.
pub fn find_any_font() -> Option<FontVec> {
    let mut files = collect_all_font_files();
    files.sort();
    files.iter().find_map(|path| load_file(path).ok())
}

fn load_file(path: &Path) -> Result<FontVec, RenderError> {
    let data = std::fs::read(path).map_err(|e| {
        RenderError::FontError(format!("Failed to read font file {}: {}", path.display(), e))
    })?;

    let is_collection = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"));

    let parsed = if is_collection {
        FontVec::try_from_vec_and_index(data, 0)
    } else {
        FontVec::try_from_vec(data)
    };

    parsed.map_err(|e| {
        RenderError::FontError(format!("Failed to parse font {}: {}", path.display(), e))
    })
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(custom) = std::env::var("SUKASHI_FONT_DIR") {
        if !custom.is_empty() {
            dirs.push(PathBuf::from(custom));
        }
    }

    dirs.push(PathBuf::from("fonts"));

    if let Ok(home) = std::env::var("HOME") {
        dirs.push(Path::new(&home).join(".fonts"));
        dirs.push(Path::new(&home).join(".local/share/fonts"));
    }

    dirs.push(PathBuf::from("/usr/share/fonts"));
    dirs.push(PathBuf::from("/usr/local/share/fonts"));

    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
    }

    if cfg!(target_os = "windows") {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(Path::new(&windir).join("Fonts"));
        }
    }

    dirs
}

fn collect_all_font_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in search_dirs() {
        collect_font_files(&dir, SCAN_DEPTH, &mut files);
    }
    files
}

fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth == 0 {
        return;
    }

    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, depth - 1, out);
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            e.eq_ignore_ascii_case("ttf")
                || e.eq_ignore_ascii_case("otf")
                || e.eq_ignore_ascii_case("ttc")
        })
}

fn match_stem<'a>(files: &'a [PathBuf], candidate: &str) -> Option<&'a Path> {
    files
        .iter()
        .find(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem_matches(&normalize(stem), candidate))
        })
        .map(PathBuf::as_path)
}

fn stem_matches(stem: &str, candidate: &str) -> bool {
    stem == candidate
        || stem.strip_prefix(candidate).is_some_and(|rest| {
            matches!(rest, "regular" | "mt" | "r")
        })
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// File stems to try for a family, most specific first. Aliases cover
/// the actual on-disk names of the CJK families plus the metric-compatible
/// substitutes Linux distributions ship for the Microsoft core fonts.
fn candidate_stems(family: &str) -> Vec<String> {
    let normalized = normalize(family);

    let aliases: &[&str] = match normalized.as_str() {
        "arial" => &["liberationsans", "arimo"],
        "simsun" => &["nsimsun", "songti"],
        "simhei" => &["heiti"],
        "microsoftyahei" => &["msyh"],
        "kaiti" => &["simkai"],
        "fangsong" => &["simfang"],
        "microsoftjhenghei" => &["msjh"],
        "pingfangsc" => &["pingfang"],
        "sourcehansanscn" => &["sourcehansans"],
        "sourcehanserifcn" => &["sourcehanserif"],
        "notosanscjksc" => &["notosanscjk"],
        "timesnewroman" => &["times", "liberationserif", "tinos"],
        "georgia" => &["gelasio"],
        "verdana" => &["dejavusans"],
        "couriernew" => &["cour", "liberationmono", "cousine"],
        _ => &[],
    };

    let mut stems = vec![normalized];
    stems.extend(aliases.iter().map(|s| s.to_string()));
    stems
}
