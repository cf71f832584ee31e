use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::Deserialize;

/// Canonical task name type.
pub type TaskName = String;

/// Boxed, sendable future used at every async trait seam in the crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Output style handed to the Sass compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SassStyle {
    #[default]
    Expanded,
    Compressed,
}

/// A browser viewport used for critical-path CSS extraction, written as
/// `"WIDTHxHEIGHT"` in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid viewport '{s}' (expected WIDTHxHEIGHT)"))?;

        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid viewport width '{w}': {e}"))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid viewport height '{h}': {e}"))?;

        if width == 0 || height == 0 {
            return Err(format!("viewport '{s}' must have non-zero dimensions"));
        }

        Ok(Viewport { width, height })
    }
}

impl TryFrom<String> for Viewport {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_parses_width_by_height() {
        assert_eq!("320x480".parse::<Viewport>(), Ok(Viewport::new(320, 480)));
        assert_eq!(" 1280X960 ".parse::<Viewport>(), Ok(Viewport::new(1280, 960)));
        assert_eq!(Viewport::new(768, 1024).to_string(), "768x1024");
    }

    #[test]
    fn viewport_rejects_garbage() {
        assert!("320".parse::<Viewport>().is_err());
        assert!("0x480".parse::<Viewport>().is_err());
        assert!("wide x tall".parse::<Viewport>().is_err());
    }
}
