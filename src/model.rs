/// Numbering format used when a (list id, level) pair has no definition.
pub const DEFAULT_LIST_NUMBERING_STYLE: &str = "decimal";

/// Output heading tag. Document headings start at `h2`: the document title
/// is rendered as `h1` by whatever embeds the fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeadingTag {
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingTag::H2 => "h2",
            HeadingTag::H3 => "h3",
            HeadingTag::H4 => "h4",
            HeadingTag::H5 => "h5",
            HeadingTag::H6 => "h6",
        }
    }

    /// Map a natural style name ("heading 1" .. "heading 10", any case) to a
    /// tag, shifted down one level and saturating at `h6`.
    pub fn from_style_name(name: &str) -> Option<Self> {
        let level: u32 = name
            .to_lowercase()
            .strip_prefix("heading ")?
            .parse()
            .ok()?;
        match level {
            1 => Some(HeadingTag::H2),
            2 => Some(HeadingTag::H3),
            3 => Some(HeadingTag::H4),
            4 => Some(HeadingTag::H5),
            5..=10 => Some(HeadingTag::H6),
            _ => None,
        }
    }
}

/// One `w:style` entry of styles.xml, reduced to what conversion needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedStyle {
    pub id: String,
    pub header: Option<HeadingTag>,
    /// Half-points, as written in `w:sz`.
    pub font_size: Option<u32>,
    pub based_on: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    /// CSS list-style name carried in `data-list-type`.
    Ordered(&'static str),
}

impl ListKind {
    pub fn from_num_fmt(num_fmt: &str) -> Self {
        match num_fmt {
            "bullet" => ListKind::Unordered,
            "decimalZero" => ListKind::Ordered("decimal-leading-zero"),
            "upperRoman" => ListKind::Ordered("upper-roman"),
            "lowerRoman" => ListKind::Ordered("lower-roman"),
            "upperLetter" => ListKind::Ordered("upper-alpha"),
            "lowerLetter" => ListKind::Ordered("lower-alpha"),
            _ => ListKind::Ordered(DEFAULT_LIST_NUMBERING_STYLE),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered(_) => "ol",
        }
    }
}

/// Pixel dimensions of an embedded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero in either dimension means the size is unusable.
    pub fn has_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
