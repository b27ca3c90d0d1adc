//! Identifier codec: the single source of truth for derivative file names.
//!
//! An identifier is a relative path that callers hold as an opaque handle:
//!
//! ```text
//! <namespace>/<prefix>/<name>[.<W>x<H>[crop<L>x<T>x<R>x<B>].<flags>[.q<Q>]].<ext>
//!
//! articles/a4/photo.jpg                        original
//! articles/a4/photo.800x600.fit.q80.webp       derivative
//! articles/a4/photo.400x400crop0x0x600x600.fill+shrink_only.q85.jpg
//! ```
//!
//! The namespace is everything before the last two segments, the prefix is
//! the 2-character checksum shard, and the name is matched lazily so that
//! collision-suffixed originals (`photo.2.jpg`) decode as plain originals.
//!
//! Encoding is deterministic: the suffix field order is fixed by the grammar,
//! and the flag bitmask is always written in its canonical spelling (see
//! [`ResizeFlags::canonical_name`]). Decoding an encoded name yields the same
//! [`ImageName`] back, and re-encoding a decoded identifier yields the same
//! string.

use bitflags::bitflags;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Suffix grammar shared by the decoder and by [`family_pattern`].
const TRANSFORM_SUFFIX: &str = r"\.(?P<width>\d+)x(?P<height>\d+)(?:crop(?P<left>\d+)x(?P<top>\d+)x(?P<right>\d+)x(?P<bottom>\d+))?\.(?P<flags>[A-Za-z_]+(?:\+[A-Za-z_]+)*)(?:\.q(?P<quality>\d+))?";

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<namespace>.+)/(?P<prefix>[^/]+)/(?P<name>[^/]*?)(?:{TRANSFORM_SUFFIX})?\.(?P<extension>[^./]+)$"
    ))
    .expect("identifier pattern is valid")
});

static SIZE_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)?x(\d+)?(?:crop(\d+)x(\d+)x(\d+)x(\d+))?$").expect("size pattern is valid")
});

/// Usage shown when a size spec names a single size.
pub const SINGLE_SIZE_EXAMPLE: &str = "resolve(\"articles/a4/photo.jpg\", size = \"800x600\")";
/// Usage shown for srcset lists, where width-only entries are allowed.
pub const SRCSET_EXAMPLE: &str =
    "srcset(\"articles/a4/photo.jpg\", [\"400\", \"800x600\", \"1200\"])";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Malformed identifier '{0}': expected namespace/prefix/name.extension")]
    Malformed(String),
    #[error("Unsafe identifier '{0}': empty, '.' and '..' segments are not allowed")]
    UnsafePath(String),
    #[error("Unknown resize flag '{token}' (expected fit, fill, exact, stretch or shrink_only)")]
    UnknownFlag { token: String },
    #[error("Crop, flags and quality can only be set on a sized transform")]
    TransformWithoutSize,
}

/// A size spec that is not `WIDTHxHEIGHT[cropLxTxRxB]` with positive sides.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Invalid image size format: '{raw}'\n\
     Expected format: 'WIDTHxHEIGHT' (e.g. '800x600'), both values positive\n\n\
     Correct usage:\n  {single}\n  {srcset}\n\n\
     Note: width-only values (e.g. '400') are only valid inside srcset lists.",
    single = SINGLE_SIZE_EXAMPLE,
    srcset = SRCSET_EXAMPLE
)]
pub struct FormatError {
    pub raw: String,
}

impl FormatError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The two usage hints carried by every format error.
    pub fn examples(&self) -> [&'static str; 2] {
        [SINGLE_SIZE_EXAMPLE, SRCSET_EXAMPLE]
    }
}

bitflags! {
    /// Resize mode bitmask handed opaquely to the codec.
    ///
    /// `fit` is the empty mask, so `fit+shrink_only` and `shrink_only` are
    /// the same transform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeFlags: u8 {
        const SHRINK_ONLY = 1;
        const STRETCH = 2;
        const FILL = 4;
        const EXACT = 8;
    }
}

/// Token vocabulary, in lookup order.
const FLAG_TOKENS: &[(&str, ResizeFlags)] = &[
    ("fit", ResizeFlags::FIT),
    ("fill", ResizeFlags::FILL),
    ("exact", ResizeFlags::EXACT),
    ("stretch", ResizeFlags::STRETCH),
    ("shrink_only", ResizeFlags::SHRINK_ONLY),
];

impl ResizeFlags {
    /// Proportional fit inside the target box.
    pub const FIT: Self = Self::empty();

    /// Decode a flag token or a `+`-joined combination of tokens.
    ///
    /// Every sub-token must be in the fixed vocabulary; there is no silent
    /// default for unknown or empty tokens.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        raw.split('+').try_fold(Self::FIT, |bits, token| {
            FLAG_TOKENS
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, flag)| bits | *flag)
                .ok_or_else(|| IdentifierError::UnknownFlag {
                    token: token.to_string(),
                })
        })
    }

    /// Canonical `+`-joined spelling: `fit` for the empty mask, otherwise the
    /// set bits in vocabulary order.
    pub fn canonical_name(self) -> String {
        if self.is_empty() {
            return "fit".to_string();
        }
        FLAG_TOKENS
            .iter()
            .filter(|(_, flag)| !flag.is_empty() && self.contains(*flag))
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Target box of a derivative. Both sides are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Crop rectangle applied before resizing. The kept region is
/// `[left, right) x [top, bottom)` in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Crop {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Decoded `WIDTHxHEIGHT[cropLxTxRxB]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub size: Size,
    pub crop: Option<Crop>,
}

/// Parse a size spec. Width and height are mandatory and must be positive.
pub fn parse_size_spec(raw: &str) -> Result<SizeSpec, FormatError> {
    let invalid = || FormatError::new(raw);
    let caps = SIZE_SPEC.captures(raw.trim()).ok_or_else(invalid)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let width = number(1).filter(|w| *w > 0).ok_or_else(invalid)?;
    let height = number(2).filter(|h| *h > 0).ok_or_else(invalid)?;
    let crop = match (number(3), number(4), number(5), number(6)) {
        (Some(left), Some(top), Some(right), Some(bottom)) => {
            Some(Crop::new(left, top, right, bottom))
        }
        (None, None, None, None) => None,
        // crop digits present but out of range
        _ => return Err(invalid()),
    };

    Ok(SizeSpec {
        size: Size::new(width, height),
        crop,
    })
}

/// Size, crop, flags and quality of a derivative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform {
    pub size: Size,
    pub crop: Option<Crop>,
    pub flags: ResizeFlags,
    /// Format-specific: 0-100 for jpeg/webp/avif, 0-9 for png, none for gif.
    pub quality: Option<u8>,
}

impl Transform {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            crop: None,
            flags: ResizeFlags::FIT,
            quality: None,
        }
    }

    /// Suffix without the leading dot, e.g. `800x600crop0x0x10x10.fill.q80`.
    pub fn suffix(&self) -> String {
        let mut suffix = self.size.to_string();
        if let Some(c) = self.crop {
            suffix.push_str(&format!("crop{}x{}x{}x{}", c.left, c.top, c.right, c.bottom));
        }
        suffix.push('.');
        suffix.push_str(&self.flags.canonical_name());
        if let Some(q) = self.quality {
            suffix.push_str(&format!(".q{q}"));
        }
        suffix
    }
}

/// Decoded identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    pub namespace: String,
    pub prefix: String,
    pub name: String,
    /// Format token as written in the identifier (compare with
    /// [`ImageName::format_key`]).
    pub extension: String,
    pub transform: Option<Transform>,
}

impl ImageName {
    /// Build an untransformed name.
    pub fn original(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            name: name.into(),
            extension: extension.into(),
            transform: None,
        }
    }

    /// Decode an identifier. Strings without a transform suffix decode as
    /// plain originals; a suffix with an unknown flag token is an error.
    pub fn decode(identifier: &str) -> Result<Self, IdentifierError> {
        check_segments(identifier)?;
        let caps = IDENTIFIER
            .captures(identifier)
            .ok_or_else(|| IdentifierError::Malformed(identifier.to_string()))?;
        let text = |key: &str| caps.name(key).map_or("", |m| m.as_str()).to_string();
        let number = |key: &str| -> Result<Option<u32>, IdentifierError> {
            caps.name(key)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map_err(|_| IdentifierError::Malformed(identifier.to_string()))
        };

        let transform = match (number("width")?, number("height")?) {
            (Some(width), Some(height)) => {
                let crop = match (
                    number("left")?,
                    number("top")?,
                    number("right")?,
                    number("bottom")?,
                ) {
                    (Some(l), Some(t), Some(r), Some(b)) => Some(Crop::new(l, t, r, b)),
                    _ => None,
                };
                let quality = match number("quality")? {
                    Some(q) => Some(
                        u8::try_from(q)
                            .map_err(|_| IdentifierError::Malformed(identifier.to_string()))?,
                    ),
                    None => None,
                };
                Some(Transform {
                    size: Size::new(width, height),
                    crop,
                    flags: ResizeFlags::parse(&text("flags"))?,
                    quality,
                })
            }
            _ => None,
        };

        Ok(Self {
            namespace: text("namespace"),
            prefix: text("prefix"),
            name: text("name"),
            extension: text("extension"),
            transform,
        })
    }

    /// Encode back to an identifier string.
    pub fn encode(&self) -> String {
        format!("{}/{}/{}", self.namespace, self.prefix, self.file_name())
    }

    /// Last path segment, including any transform suffix.
    pub fn file_name(&self) -> String {
        match &self.transform {
            Some(t) => format!("{}.{}.{}", self.name, t.suffix(), self.extension),
            None => format!("{}.{}", self.name, self.extension),
        }
    }

    /// File name of the untransformed original.
    pub fn original_file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// Identifier of the untransformed original.
    pub fn original_identifier(&self) -> String {
        format!(
            "{}/{}/{}",
            self.namespace,
            self.prefix,
            self.original_file_name()
        )
    }

    /// `namespace/prefix`, the shard directory relative to a tree root.
    pub fn shard(&self) -> String {
        format!("{}/{}", self.namespace, self.prefix)
    }

    /// Lower-cased extension used for format and quality lookups.
    pub fn format_key(&self) -> String {
        self.extension.to_ascii_lowercase()
    }

    pub fn has_crop(&self) -> bool {
        self.transform.as_ref().is_some_and(|t| t.crop.is_some())
    }

    pub fn size(&self) -> Option<Size> {
        self.transform.as_ref().map(|t| t.size)
    }

    pub fn set_extension(&mut self, extension: impl Into<String>) {
        self.extension = extension.into();
    }

    /// Set or clear the target size. Clearing drops crop, flags and quality.
    pub fn set_size(&mut self, size: Option<Size>) {
        match (size, self.transform.as_mut()) {
            (Some(size), Some(t)) => t.size = size,
            (Some(size), None) => self.transform = Some(Transform::new(size)),
            (None, _) => self.transform = None,
        }
    }

    pub fn set_crop(&mut self, crop: Option<Crop>) -> Result<(), IdentifierError> {
        match (self.transform.as_mut(), crop) {
            (Some(t), crop) => t.crop = crop,
            (None, None) => {}
            (None, Some(_)) => return Err(IdentifierError::TransformWithoutSize),
        }
        Ok(())
    }

    pub fn set_flags(&mut self, flags: ResizeFlags) -> Result<(), IdentifierError> {
        let t = self
            .transform
            .as_mut()
            .ok_or(IdentifierError::TransformWithoutSize)?;
        t.flags = flags;
        Ok(())
    }

    pub fn set_quality(&mut self, quality: Option<u8>) -> Result<(), IdentifierError> {
        match (self.transform.as_mut(), quality) {
            (Some(t), quality) => t.quality = quality,
            (None, None) => {}
            (None, Some(_)) => return Err(IdentifierError::TransformWithoutSize),
        }
        Ok(())
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ImageName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Pattern matching every file of `name`'s family in a shard directory: the
/// original plus all of its derivatives, in any output format.
pub fn family_pattern(name: &str, extension: &str) -> Result<Regex, regex::Error> {
    let name = regex::escape(name);
    Regex::new(&format!(
        r"^{name}\.{}$|^{name}(?:{TRANSFORM_SUFFIX})\.[^./]+$",
        regex::escape(extension)
    ))
}

/// Reject empty, `.` and `..` segments and backslashes in a relative path.
pub(crate) fn check_segments(identifier: &str) -> Result<(), IdentifierError> {
    let unsafe_segment = identifier
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if unsafe_segment || identifier.contains('\\') {
        return Err(IdentifierError::UnsafePath(identifier.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Decoding
    // =========================================================================

    #[test]
    fn decode_plain_original() {
        let n = ImageName::decode("articles/a4/photo.jpg").unwrap();
        assert_eq!(n.namespace, "articles");
        assert_eq!(n.prefix, "a4");
        assert_eq!(n.name, "photo");
        assert_eq!(n.extension, "jpg");
        assert_eq!(n.transform, None);
    }

    #[test]
    fn decode_collision_suffixed_original() {
        let n = ImageName::decode("articles/a4/photo.12.jpg").unwrap();
        assert_eq!(n.name, "photo.12");
        assert_eq!(n.transform, None);
    }

    #[test]
    fn decode_full_transform() {
        let n = ImageName::decode("articles/a4/photo.800x600crop1x2x3x4.fill.q80.webp").unwrap();
        assert_eq!(n.name, "photo");
        assert_eq!(n.extension, "webp");
        let t = n.transform.unwrap();
        assert_eq!(t.size, Size::new(800, 600));
        assert_eq!(t.crop, Some(Crop::new(1, 2, 3, 4)));
        assert_eq!(t.flags, ResizeFlags::FILL);
        assert_eq!(t.quality, Some(80));
    }

    #[test]
    fn decode_transform_without_quality() {
        let n = ImageName::decode("ns/ab/anim.100x50.fit.gif").unwrap();
        let t = n.transform.unwrap();
        assert_eq!(t.quality, None);
        assert_eq!(t.flags, ResizeFlags::FIT);
    }

    #[test]
    fn decode_nested_namespace() {
        let n = ImageName::decode("users/42/ab/avatar.png").unwrap();
        assert_eq!(n.namespace, "users/42");
        assert_eq!(n.prefix, "ab");
        assert_eq!(n.name, "avatar");
    }

    #[test]
    fn decode_unknown_flag_is_hard_error() {
        let err = ImageName::decode("ns/ab/pic.10x10.zzz.jpg").unwrap_err();
        assert_eq!(
            err,
            IdentifierError::UnknownFlag {
                token: "zzz".into()
            }
        );
    }

    #[test]
    fn decode_rejects_missing_segments() {
        assert!(matches!(
            ImageName::decode("pic.jpg"),
            Err(IdentifierError::Malformed(_))
        ));
        assert!(matches!(
            ImageName::decode("ab/pic.jpg"),
            Err(IdentifierError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_missing_extension() {
        assert!(matches!(
            ImageName::decode("ns/ab/pic"),
            Err(IdentifierError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_traversal() {
        for bad in ["../ab/pic.jpg", "ns/../pic.jpg", "/ns/ab/pic.jpg", "ns//ab/pic.jpg"] {
            assert!(
                matches!(ImageName::decode(bad), Err(IdentifierError::UnsafePath(_))),
                "{bad} should be rejected"
            );
        }
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    #[test]
    fn encode_plain_roundtrips_string() {
        for id in ["articles/a4/photo.jpg", "ns/ab/Photo.2.JPG", "a/b/c/d.png"] {
            assert_eq!(ImageName::decode(id).unwrap().encode(), id);
        }
    }

    #[test]
    fn encode_uses_fixed_field_order() {
        let mut n = ImageName::original("ns", "ab", "pic", "jpg");
        n.set_size(Some(Size::new(10, 20)));
        n.set_quality(Some(70)).unwrap();
        n.set_crop(Some(Crop::new(0, 0, 5, 5))).unwrap();
        n.set_flags(ResizeFlags::FILL).unwrap();

        let mut m = ImageName::original("ns", "ab", "pic", "jpg");
        m.set_size(Some(Size::new(10, 20)));
        m.set_flags(ResizeFlags::FILL).unwrap();
        m.set_crop(Some(Crop::new(0, 0, 5, 5))).unwrap();
        m.set_quality(Some(70)).unwrap();

        assert_eq!(n.encode(), m.encode());
        assert_eq!(n.encode(), "ns/ab/pic.10x20crop0x0x5x5.fill.q70.jpg");
    }

    #[test]
    fn decode_encode_roundtrip_descriptors() {
        let mut sized = ImageName::original("ns", "ab", "pic.3", "webp");
        sized.set_size(Some(Size::new(1, 1)));
        sized
            .set_flags(ResizeFlags::FILL | ResizeFlags::SHRINK_ONLY)
            .unwrap();

        let mut full = sized.clone();
        full.set_crop(Some(Crop::new(9, 8, 7, 6))).unwrap();
        full.set_quality(Some(0)).unwrap();

        let plain = ImageName::original("deep/er", "zz", "x-y_z", "gif");

        for d in [sized, full, plain] {
            assert_eq!(ImageName::decode(&d.encode()).unwrap(), d);
        }
    }

    #[test]
    fn display_and_from_str_agree_with_codec() {
        let id = "ns/ab/pic.5x5.exact.q1.png";
        let n: ImageName = id.parse().unwrap();
        assert_eq!(n.to_string(), id);
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    #[test]
    fn crop_requires_size() {
        let mut n = ImageName::original("ns", "ab", "pic", "jpg");
        assert_eq!(
            n.set_crop(Some(Crop::new(0, 0, 1, 1))),
            Err(IdentifierError::TransformWithoutSize)
        );
        assert_eq!(n.set_crop(None), Ok(()));
        assert_eq!(
            n.set_flags(ResizeFlags::FILL),
            Err(IdentifierError::TransformWithoutSize)
        );
        assert_eq!(
            n.set_quality(Some(5)),
            Err(IdentifierError::TransformWithoutSize)
        );
    }

    #[test]
    fn clearing_size_drops_transform() {
        let mut n = ImageName::decode("ns/ab/pic.10x10crop0x0x1x1.fill.q5.jpg").unwrap();
        n.set_size(None);
        assert_eq!(n.encode(), "ns/ab/pic.jpg");
        assert!(!n.has_crop());
    }

    #[test]
    fn set_size_keeps_other_fields() {
        let mut n = ImageName::decode("ns/ab/pic.10x10.fill.q5.jpg").unwrap();
        n.set_size(Some(Size::new(20, 30)));
        assert_eq!(n.encode(), "ns/ab/pic.20x30.fill.q5.jpg");
    }

    // =========================================================================
    // Flags
    // =========================================================================

    #[test]
    fn flag_composition() {
        assert_eq!(ResizeFlags::parse("fit+shrink_only").unwrap().bits(), 1);
        assert_eq!(ResizeFlags::parse("fill+exact").unwrap().bits(), 12);
        assert_eq!(ResizeFlags::parse("stretch").unwrap().bits(), 2);
        assert_eq!(ResizeFlags::parse("fit").unwrap(), ResizeFlags::FIT);
    }

    #[test]
    fn flag_unknown_tokens_rejected() {
        assert!(ResizeFlags::parse("zzz").is_err());
        assert!(ResizeFlags::parse("fit+zzz").is_err());
        assert!(ResizeFlags::parse("").is_err());
        assert!(ResizeFlags::parse("fit+").is_err());
    }

    #[test]
    fn flag_canonical_names() {
        assert_eq!(ResizeFlags::FIT.canonical_name(), "fit");
        assert_eq!(
            ResizeFlags::parse("fit+shrink_only")
                .unwrap()
                .canonical_name(),
            "shrink_only"
        );
        assert_eq!(
            ResizeFlags::parse("shrink_only+fill")
                .unwrap()
                .canonical_name(),
            "fill+shrink_only"
        );
    }

    // =========================================================================
    // Size specs
    // =========================================================================

    #[test]
    fn size_spec_plain() {
        let s = parse_size_spec("800x600").unwrap();
        assert_eq!(s.size, Size::new(800, 600));
        assert_eq!(s.crop, None);
    }

    #[test]
    fn size_spec_with_crop() {
        let s = parse_size_spec("100x50crop10x20x300x400").unwrap();
        assert_eq!(s.size, Size::new(100, 50));
        assert_eq!(s.crop, Some(Crop::new(10, 20, 300, 400)));
    }

    #[test]
    fn size_spec_rejects_partial_or_zero() {
        for raw in ["abcx", "x600", "800x", "0x600", "800x0", "", "800", "800x600crop1x2"] {
            let err = parse_size_spec(raw).unwrap_err();
            assert_eq!(err.raw, raw);
        }
    }

    #[test]
    fn format_error_carries_usage_hints() {
        let err = parse_size_spec("abcx").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'abcx'"));
        for example in err.examples() {
            assert!(message.contains(example));
        }
    }

    #[test]
    fn family_pattern_matches_original_and_derivatives_only() {
        let re = family_pattern("pic", "jpg").unwrap();
        assert!(re.is_match("pic.jpg"));
        assert!(!re.is_match("pic.png"));
        assert!(!re.is_match("pic.jpeg"));
        assert!(re.is_match("pic.800x600.fit.q80.webp"));
        assert!(re.is_match("pic.10x10crop0x0x5x5.fill+shrink_only.png"));
        assert!(!re.is_match("pic.2.jpg"));
        assert!(!re.is_match("xpic.jpg"));
        assert!(!re.is_match("picture.jpg"));
    }
}
