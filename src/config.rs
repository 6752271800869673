//! Evaluation limits and render settings.

use std::fmt;
use std::str::FromStr;

/// Default evaluation nesting ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Default ceiling on patches in any one design.
pub const DEFAULT_MAX_PATCHES: usize = 100_000;
/// Remaining stack below which recursive parsing and evaluation grow a
/// fresh segment.
pub const STACK_RED_ZONE: usize = 100 * 1024;
/// Size of each stack segment added on growth.
pub const STACK_GROWTH: usize = 1024 * 1024;
/// Pixels per design unit, as on the original drawing canvas.
pub const DEFAULT_SCALE: f64 = 50.0;

/// Bounds on a single evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub max_depth: usize,
    pub max_patches: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_patches: DEFAULT_MAX_PATCHES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Svg,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(format!("unknown output format '{other}' (expected json or svg)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Svg => f.write_str("svg"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            scale: DEFAULT_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!("SVG".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("png".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn defaults() {
        let eval = EvalConfig::default();
        assert_eq!(eval.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(eval.max_patches, DEFAULT_MAX_PATCHES);
        assert_eq!(RenderConfig::default().scale, 50.0);
    }
}
