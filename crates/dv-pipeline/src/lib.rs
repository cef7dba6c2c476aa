//! Ordered feature pipeline for document enrichment.
//!
//! A [`FeatureRegistry`] holds named text transformation steps tagged
//! [`FeatureTier::Standard`] or [`FeatureTier::Experimental`]. Registration
//! order is preserved and defines execution order. [`FeatureRegistry::build_pipeline`]
//! filters by tier and returns a [`Pipeline`] that threads document text
//! through each handler in turn.
//!
//! Handlers are pure `text -> text` functions: they never fail, never block,
//! and share no mutable state across invocations. A handler that cannot make
//! a decision returns its input unchanged.
//!
//! # Example
//!
//! ```
//! use dv_pipeline::{FeatureRegistry, FeatureTier};
//!
//! let mut registry = FeatureRegistry::new();
//! registry.register("upper", FeatureTier::Standard, |text| text.to_uppercase());
//! registry.register("shout", FeatureTier::Experimental, |text| format!("{text}!"));
//!
//! let pipeline = registry.build_pipeline(false);
//! assert_eq!(pipeline.run("hi"), "HI");
//!
//! let pipeline = registry.build_pipeline(true);
//! assert_eq!(pipeline.run("hi"), "HI!");
//! ```

use tracing::debug;

/// Transformation step handler: full document text in, full document text out.
pub type FeatureHandler = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Tier of a registered feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTier {
    /// Always included in the pipeline.
    Standard,
    /// Included only when the caller opts in.
    Experimental,
}

/// A named transformation step.
pub struct Feature {
    name: &'static str,
    tier: FeatureTier,
    handler: FeatureHandler,
}

impl Feature {
    /// Feature name, used for logging and introspection.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tier this feature was registered with.
    #[must_use]
    pub fn tier(&self) -> FeatureTier {
        self.tier
    }
}

/// Ordered collection of registered features.
#[derive(Default)]
pub struct FeatureRegistry {
    features: Vec<Feature>,
}

impl FeatureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature. Insertion order is execution order.
    pub fn register<F>(&mut self, name: &'static str, tier: FeatureTier, handler: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.features.push(Feature {
            name,
            tier,
            handler: Box::new(handler),
        });
    }

    /// Names of all registered features in order.
    pub fn feature_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.features.iter().map(Feature::name)
    }

    /// Build an ordered pipeline over the registered features.
    ///
    /// Standard features are always included; experimental features only when
    /// `enable_experimental` is set. Registration order is preserved.
    #[must_use]
    pub fn build_pipeline(&self, enable_experimental: bool) -> Pipeline<'_> {
        let steps = self
            .features
            .iter()
            .filter(|f| match f.tier {
                FeatureTier::Standard => true,
                FeatureTier::Experimental => enable_experimental,
            })
            .collect();
        Pipeline { steps }
    }
}

/// An ordered list of feature handlers ready to run.
pub struct Pipeline<'a> {
    steps: Vec<&'a Feature>,
}

impl Pipeline<'_> {
    /// Number of steps in this pipeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step in order, threading the text through each.
    #[must_use]
    pub fn run(&self, text: &str) -> String {
        let mut current = text.to_owned();
        for feature in &self.steps {
            debug!(feature = feature.name, "running pipeline step");
            current = (feature.handler)(&current);
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix_feature(suffix: &'static str) -> impl Fn(&str) -> String {
        move |text: &str| format!("{text}{suffix}")
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let registry = FeatureRegistry::new();
        let pipeline = registry.build_pipeline(true);
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run("unchanged"), "unchanged");
    }

    #[test]
    fn test_standard_features_always_run() {
        let mut registry = FeatureRegistry::new();
        registry.register("a", FeatureTier::Standard, suffix_feature("-a"));
        registry.register("b", FeatureTier::Standard, suffix_feature("-b"));

        assert_eq!(registry.build_pipeline(false).run("x"), "x-a-b");
        assert_eq!(registry.build_pipeline(true).run("x"), "x-a-b");
    }

    #[test]
    fn test_experimental_features_opt_in() {
        let mut registry = FeatureRegistry::new();
        registry.register("std", FeatureTier::Standard, suffix_feature("-s"));
        registry.register("exp", FeatureTier::Experimental, suffix_feature("-e"));

        assert_eq!(registry.build_pipeline(false).run("x"), "x-s");
        assert_eq!(registry.build_pipeline(true).run("x"), "x-s-e");
    }

    #[test]
    fn test_registration_order_is_execution_order() {
        let mut registry = FeatureRegistry::new();
        registry.register("exp1", FeatureTier::Experimental, suffix_feature("-1"));
        registry.register("std", FeatureTier::Standard, suffix_feature("-2"));
        registry.register("exp2", FeatureTier::Experimental, suffix_feature("-3"));

        // Experimental steps interleave with standard steps in registration order
        assert_eq!(registry.build_pipeline(true).run("x"), "x-1-2-3");
        assert_eq!(registry.build_pipeline(false).run("x"), "x-2");
    }

    #[test]
    fn test_pipeline_len_by_tier() {
        let mut registry = FeatureRegistry::new();
        registry.register("a", FeatureTier::Standard, suffix_feature(""));
        registry.register("b", FeatureTier::Experimental, suffix_feature(""));
        registry.register("c", FeatureTier::Experimental, suffix_feature(""));

        assert_eq!(registry.build_pipeline(false).len(), 1);
        assert_eq!(registry.build_pipeline(true).len(), 3);
    }

    #[test]
    fn test_feature_names() {
        let mut registry = FeatureRegistry::new();
        registry.register("first", FeatureTier::Standard, suffix_feature(""));
        registry.register("second", FeatureTier::Experimental, suffix_feature(""));

        let names: Vec<_> = registry.feature_names().collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_handlers_receive_previous_output() {
        let mut registry = FeatureRegistry::new();
        registry.register("wrap", FeatureTier::Standard, |t| format!("({t})"));
        registry.register("wrap-again", FeatureTier::Standard, |t| format!("[{t}]"));

        assert_eq!(registry.build_pipeline(false).run("x"), "[(x)]");
    }
}
