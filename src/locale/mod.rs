//! Locale dictionary for user-facing strings.
//!
//! Two fixed-shape bundles (`zh`, `en`), selected exactly once at startup
//! from the environment's language settings and injected into consumers.
//! There is no runtime switch and no partial bundle.

use clap::ValueEnum;

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    Zh,
    En,
}

/// Tooltip strings for each configuration field.
#[derive(Debug)]
pub struct Tooltips {
    pub words: &'static str,
    pub font_family: &'static str,
    pub width: &'static str,
    pub height: &'static str,
    pub font_size: &'static str,
    pub color: &'static str,
    pub rotate: &'static str,
    pub row: &'static str,
    pub col: &'static str,
    pub start_x: &'static str,
    pub start_y: &'static str,
    pub offset_x: &'static str,
    pub offset_y: &'static str,
    pub compression: &'static str,
    pub save_config: &'static str,
}

/// A complete set of user-facing strings for one language.
#[derive(Debug)]
pub struct Translations {
    pub title: &'static str,
    pub description: &'static str,
    pub no_server_safe: &'static str,

    pub load: &'static str,
    pub load_batch: &'static str,
    pub download: &'static str,
    pub download_all: &'static str,

    pub words: &'static str,
    pub font_family: &'static str,
    pub width: &'static str,
    pub height: &'static str,
    pub font_size: &'static str,
    pub color: &'static str,
    pub rotate: &'static str,
    pub row: &'static str,
    pub col: &'static str,
    pub start_x: &'static str,
    pub start_y: &'static str,
    pub offset_x: &'static str,
    pub offset_y: &'static str,
    pub compression: &'static str,
    pub save_config: &'static str,

    pub tooltips: Tooltips,

    pub compression_title: &'static str,
    pub opacity: &'static str,

    pub original_project: &'static str,
    pub fork_with_enhancements: &'static str,

    pub clear: &'static str,
    pub processing: &'static str,
    pub pages: &'static str,
    pub pdf_document: &'static str,
    pub batch_empty_hint: &'static str,
}

impl Translations {
    /// The batch-empty hint with its `{loadBatch}` placeholder filled in.
    pub fn batch_empty_hint(&self) -> String {
        self.batch_empty_hint.replace("{loadBatch}", self.load_batch)
    }
}

static ZH: Translations = Translations {
    title: "水印工具",
    description: "为图片/PDF添加水印",
    no_server_safe: "文件不会上传，安全可靠",

    load: "加载文件",
    load_batch: "批量加载",
    download: "下载",
    download_all: "批量下载",

    words: "水印文字",
    font_family: "字体",
    width: "图片宽度",
    height: "图片高度",
    font_size: "字体大小",
    color: "颜色",
    rotate: "旋转角度",
    row: "行数",
    col: "列数",
    start_x: "起始X坐标",
    start_y: "起始Y坐标",
    offset_x: "X轴偏移",
    offset_y: "Y轴偏移",
    compression: "压缩质量",
    save_config: "保存配置",

    tooltips: Tooltips {
        words: "水印文字内容，使用回车键换行",
        font_family: "水印字体",
        width: "图片宽度，对PDF无效",
        height: "图片高度，对PDF无效",
        font_size: "水印字体大小",
        color: "水印颜色，rgba格式，最后一个参数是透明度",
        rotate: "水印旋转角度",
        row: "水印行数",
        col: "水印列数",
        start_x: "第一个水印的X轴位置",
        start_y: "第一个水印的Y轴位置",
        offset_x: "水印之间的X轴偏移量",
        offset_y: "水印之间的Y轴偏移量",
        compression: "压缩级别",
        save_config: "保存配置供下次使用",
    },

    compression_title: "数值越低，压缩越高",
    opacity: "透明度",

    original_project: "原始项目",
    fork_with_enhancements: "新增功能的分叉",

    clear: "清空",
    processing: "处理中...",
    pages: "页",
    pdf_document: "PDF 文档",
    batch_empty_hint: "点击\"{loadBatch}\"选择多张图片或PDF文件进行批量处理",
};

static EN: Translations = Translations {
    title: "Watermark",
    description: "Add watermark to image/pdf",
    no_server_safe: "No server, so safe",

    load: "Load",
    load_batch: "Batch Load",
    download: "Download",
    download_all: "Download All",

    words: "Words",
    font_family: "Font",
    width: "Width",
    height: "Height",
    font_size: "Font Size",
    color: "Color",
    rotate: "Rotate",
    row: "Row",
    col: "Col",
    start_x: "Start X",
    start_y: "Start Y",
    offset_x: "Offset X",
    offset_y: "Offset Y",
    compression: "Compression",
    save_config: "Save Config",

    tooltips: Tooltips {
        words: "The words of watermark, use enter key to wrap lines",
        font_family: "The font family for the watermark text",
        width: "The width of image, pdf is not useful",
        height: "The height of image, pdf is not useful",
        font_size: "The font size of the watermark",
        color: "The color of the watermark, rgba is three-primary color, last parameter is opacity",
        rotate: "The rotation angle of watermark",
        row: "The rows of watermarks",
        col: "The columns of watermarks",
        start_x: "The position along the X axis of first watermark",
        start_y: "The position along the Y axis of first watermark",
        offset_x: "The offset along the X axis between two watermarks",
        offset_y: "The offset along the Y axis between two watermarks",
        compression: "The level for compression",
        save_config: "Save the config for next use",
    },

    compression_title: "Lower the Value, Better the Compression",
    opacity: "Opacity",

    original_project: "Original Project",
    fork_with_enhancements: "Fork with Enhancements",

    clear: "Clear",
    processing: "Processing...",
    pages: "pages",
    pdf_document: "PDF Document",
    batch_empty_hint: "Click \"{loadBatch}\" to select multiple images or PDF files for batch processing",
};

/// The complete string bundle for a locale.
pub fn bundle(locale: Locale) -> &'static Translations {
    match locale {
        Locale::Zh => &ZH,
        Locale::En => &EN,
    }
}

/// Pick a locale from an ordered list of language tags.
///
/// The first tag wins; `zh*` selects Chinese, anything else English.
/// An empty list defaults to English.
pub fn detect_from_tags<S: AsRef<str>>(tags: &[S]) -> Locale {
    match tags.first() {
        Some(tag) if tag.as_ref().starts_with("zh") => Locale::Zh,
        _ => Locale::En,
    }
}

/// Detect the locale from environment language variables.
///
/// Checks `LANGUAGE`, `LC_ALL`, `LC_MESSAGES`, `LANG` in POSIX precedence;
/// the first one set supplies the tags (`LANGUAGE` may hold a `:`-separated
/// list). Resolved once at startup; callers inject the chosen bundle.
pub fn detect() -> Locale {
    for var in ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if value.is_empty() {
                continue;
            }
            let tags: Vec<&str> = value.split(':').collect();
            return detect_from_tags(&tags);
        }
    }
    Locale::En
}
