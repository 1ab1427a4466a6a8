//! Line styles for the regions drawn on a figure.
//!
//! Styles are written as short tokens: an optional colour (`r`, `b`, `k`,
//! ... or `#RRGGBB`) followed by an optional line kind (`-`, `--`, `:`,
//! `-.`). `"b--"` is a dashed blue line, `"k"` a solid black one.

use countywatch_common::{CountyWatchError, Result};
use countywatch_config::RegionEntry;
use plotters::style::RGBColor;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

/// Colours assigned, in order, to regions without a configured colour.
pub const FALLBACK_PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
];

/// Stroke pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    /// `-`
    #[default]
    Solid,
    /// `--`
    Dashed,
    /// `:`
    Dotted,
    /// `-.`
    DashDot,
}

impl LineKind {
    /// Dash length and gap in pixels, or `None` for a solid stroke.
    pub const fn dash_pattern(self) -> Option<(u32, u32)> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some((10, 6)),
            Self::Dotted => Some((2, 4)),
            Self::DashDot => Some((8, 4)),
        }
    }
}

/// Colour and stroke of one region's lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStyle {
    /// Line colour.
    pub color: RGBColor,
    /// Stroke pattern.
    pub line: LineKind,
}

impl DisplayStyle {
    /// Creates a style.
    pub const fn new(color: RGBColor, line: LineKind) -> Self {
        Self { color, line }
    }

    /// Parses a style token, filling in `fallback` when the token names no
    /// colour.
    pub fn parse_with_fallback(token: &str, fallback: RGBColor) -> Result<Self> {
        let token = token.trim();
        let (color, rest) = split_color(token)?;
        let line = parse_line_kind(rest).ok_or_else(|| invalid_token(token))?;

        Ok(Self {
            color: color.unwrap_or(fallback),
            line,
        })
    }
}

impl FromStr for DisplayStyle {
    type Err = CountyWatchError;

    fn from_str(token: &str) -> Result<Self> {
        Self::parse_with_fallback(token, FALLBACK_PALETTE[0])
    }
}

fn invalid_token(token: &str) -> CountyWatchError {
    CountyWatchError::validation_field(format!("Invalid style token '{token}'"), "style")
}

fn split_color(token: &str) -> Result<(Option<RGBColor>, &str)> {
    if let Some(hex) = token.strip_prefix('#') {
        let digits = hex.get(..6).ok_or_else(|| invalid_token(token))?;
        let color = parse_hex(digits).ok_or_else(|| invalid_token(token))?;
        return Ok((Some(color), &hex[6..]));
    }

    let color = match token.chars().next() {
        Some('b') => RGBColor(0, 0, 255),
        Some('g') => RGBColor(0, 128, 0),
        Some('r') => RGBColor(255, 0, 0),
        Some('c') => RGBColor(0, 191, 191),
        Some('m') => RGBColor(191, 0, 191),
        Some('y') => RGBColor(191, 191, 0),
        Some('k') => RGBColor(0, 0, 0),
        Some('w') => RGBColor(255, 255, 255),
        _ => return Ok((None, token)),
    };
    Ok((Some(color), &token[1..]))
}

/// Parses a `#RRGGBB` colour.
pub fn parse_hex_color(value: &str) -> Option<RGBColor> {
    value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(parse_hex)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(RGBColor(
        u8::from_str_radix(&hex[0..2], 16).ok()?,
        u8::from_str_radix(&hex[2..4], 16).ok()?,
        u8::from_str_radix(&hex[4..6], 16).ok()?,
    ))
}

fn parse_line_kind(rest: &str) -> Option<LineKind> {
    match rest {
        "" | "-" => Some(LineKind::Solid),
        "--" => Some(LineKind::Dashed),
        ":" => Some(LineKind::Dotted),
        "-." => Some(LineKind::DashDot),
        _ => None,
    }
}

/// Region name to display style lookup handed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    styles: HashMap<String, DisplayStyle>,
}

impl StyleMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map for a figure's region list, rejecting the first
    /// token that does not parse. Entries without a colour take the next
    /// palette colour.
    pub fn from_entries(entries: &[RegionEntry]) -> Result<Self> {
        let mut map = Self::new();
        for (i, entry) in entries.iter().enumerate() {
            let fallback = FALLBACK_PALETTE[i % FALLBACK_PALETTE.len()];
            let style = DisplayStyle::parse_with_fallback(&entry.style, fallback).map_err(|_| {
                CountyWatchError::validation_field(
                    format!(
                        "Invalid style token '{}' for region '{}'",
                        entry.style, entry.region
                    ),
                    "figures.regions.style",
                )
            })?;
            map.insert(entry.region.clone(), style);
        }
        Ok(map)
    }

    /// Sets the style of a region, returning the style it replaces.
    ///
    /// Styles are keyed by region name alone, so two same-named regions in
    /// one figure share a slot and the later one wins.
    pub fn insert(
        &mut self,
        region_name: impl Into<String>,
        style: DisplayStyle,
    ) -> Option<DisplayStyle> {
        let region_name = region_name.into();
        let previous = self.styles.insert(region_name.clone(), style);
        if previous.is_some() {
            warn!(region = %region_name, "Region style replaced by a later entry with the same name");
        }
        previous
    }

    /// The configured style of a region, if any.
    pub fn get(&self, region_name: &str) -> Option<&DisplayStyle> {
        self.styles.get(region_name)
    }

    /// The style of the `index`-th drawn series: its configured style, or a
    /// solid palette colour.
    pub fn resolve(&self, region_name: &str, index: usize) -> DisplayStyle {
        self.get(region_name).copied().unwrap_or_else(|| {
            DisplayStyle::new(
                FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()],
                LineKind::Solid,
            )
        })
    }

    /// Number of configured styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no style is configured.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_tokens() {
        let style: DisplayStyle = "r-".parse().unwrap();
        assert_eq!(style, DisplayStyle::new(RGBColor(255, 0, 0), LineKind::Solid));

        let style: DisplayStyle = "b--".parse().unwrap();
        assert_eq!(style.line, LineKind::Dashed);
        assert_eq!(style.color, RGBColor(0, 0, 255));

        let style: DisplayStyle = "k".parse().unwrap();
        assert_eq!(style, DisplayStyle::new(RGBColor(0, 0, 0), LineKind::Solid));

        assert_eq!("m:".parse::<DisplayStyle>().unwrap().line, LineKind::Dotted);
        assert_eq!("c-.".parse::<DisplayStyle>().unwrap().line, LineKind::DashDot);
    }

    #[test]
    fn test_hex_tokens() {
        let style: DisplayStyle = "#1f77b4--".parse().unwrap();
        assert_eq!(style.color, RGBColor(31, 119, 180));
        assert_eq!(style.line, LineKind::Dashed);

        assert!("#1f77".parse::<DisplayStyle>().is_err());
        assert!("#zz77b4".parse::<DisplayStyle>().is_err());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFFFFF"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex_color("FFFFFF"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
    }

    #[test]
    fn test_line_only_token_uses_fallback() {
        let style = DisplayStyle::parse_with_fallback("--", RGBColor(1, 2, 3)).unwrap();
        assert_eq!(style, DisplayStyle::new(RGBColor(1, 2, 3), LineKind::Dashed));
    }

    #[test]
    fn test_invalid_tokens() {
        for token in ["q-", "r---", "r-x", "rb"] {
            assert!(token.parse::<DisplayStyle>().is_err(), "{token} should fail");
        }
    }

    #[test]
    fn test_dash_patterns() {
        assert!(LineKind::Solid.dash_pattern().is_none());
        assert!(LineKind::Dashed.dash_pattern().is_some());
    }

    #[test]
    fn test_style_map_from_entries() {
        let entries = vec![
            RegionEntry::new("Kent", "Michigan", "r-"),
            RegionEntry::new("Wayne", "Michigan", "--"),
        ];
        let map = StyleMap::from_entries(&entries).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Kent").unwrap().color, RGBColor(255, 0, 0));
        assert_eq!(
            map.resolve("Wayne", 1),
            DisplayStyle::new(FALLBACK_PALETTE[1], LineKind::Dashed)
        );
        assert_eq!(
            map.resolve("Cook", 5),
            DisplayStyle::new(FALLBACK_PALETTE[5], LineKind::Solid)
        );
    }

    #[test]
    fn test_same_region_name_shares_a_style() {
        let entries = vec![
            RegionEntry::new("Kent", "Michigan", "r-"),
            RegionEntry::new("Kent", "Delaware", "b--"),
        ];
        let map = StyleMap::from_entries(&entries).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("Kent"),
            Some(&DisplayStyle::new(RGBColor(0, 0, 255), LineKind::Dashed))
        );

        let mut map = StyleMap::new();
        assert!(map.insert("Kent", DisplayStyle::new(RGBColor(0, 0, 0), LineKind::Solid)).is_none());
        assert!(map.insert("Kent", DisplayStyle::new(RGBColor(0, 0, 0), LineKind::Solid)).is_some());
    }

    #[test]
    fn test_style_map_rejects_bad_token() {
        let entries = vec![RegionEntry::new("Kent", "Michigan", "purple")];
        let err = StyleMap::from_entries(&entries).unwrap_err();
        assert!(err.to_string().contains("purple"));
    }
}
