use crate::error::Result;
use crate::matching::PathPattern;
use crate::types::config::LayerConfig;

pub const UNMATCHED_LAYER: &str = "unmatched";

#[derive(Debug, Clone)]
struct CompiledLayer {
    name: String,
    patterns: Vec<PathPattern>,
}

/// Ordered layer classifier. Declaration order matters: the first layer with
/// a matching pattern wins, so specific layers go before catch-all ones.
#[derive(Debug, Clone, Default)]
pub struct LayerMatcher {
    layers: Vec<CompiledLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMatch<'a> {
    Matched { index: usize, name: &'a str },
    Unmatched,
}

impl LayerMatch<'_> {
    pub fn name(&self) -> &str {
        match self {
            Self::Matched { name, .. } => name,
            Self::Unmatched => UNMATCHED_LAYER,
        }
    }
}

impl LayerMatcher {
    pub fn compile(layers: &[LayerConfig]) -> Result<Self> {
        let layers = layers
            .iter()
            .map(|layer| {
                let patterns = layer
                    .patterns
                    .iter()
                    .map(|pattern| PathPattern::compile(pattern))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledLayer {
                    name: layer.name.clone(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layers })
    }

    pub fn match_path(&self, path: &str) -> LayerMatch<'_> {
        self.layers
            .iter()
            .enumerate()
            .find(|(_, layer)| layer.patterns.iter().any(|pattern| pattern.matches(path)))
            .map_or(LayerMatch::Unmatched, |(index, layer)| LayerMatch::Matched {
                index,
                name: &layer.name,
            })
    }
}
