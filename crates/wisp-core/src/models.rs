//! Compiled-in registry of selectable chat models.
//!
//! The descriptor list is trusted literal data, constructed once and
//! read-only for the process lifetime. The display grouping is derived
//! from it on first access and cached.

use std::sync::OnceLock;

/// Default chat model identifier (vendor-prefixed).
pub const DEFAULT_CHAT_MODEL: &str = "anthropic/claude-opus-4-5";

/// Capability tags attached to registry entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Emits intermediate thinking before the final answer.
    Reasoning,
}

/// Definition of a selectable chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Globally unique id in `vendor/model` format.
    pub id: &'static str,
    /// Display label for pickers; never used for resolution.
    pub display_name: &'static str,
    /// True backend owner of the model.
    pub vendor: &'static str,
    /// Capability tags (may be empty).
    pub capabilities: &'static [Capability],
    /// Free-text description shown alongside the label.
    pub description: &'static str,
}

impl ModelDescriptor {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Display grouping key for pickers.
    ///
    /// Reasoning-capable models get their own `"reasoning"` group;
    /// everything else groups under its vendor.
    pub fn display_group(&self) -> &'static str {
        if self.has_capability(Capability::Reasoning) {
            "reasoning"
        } else {
            self.vendor
        }
    }

    /// Looks up a descriptor by its full id.
    pub fn find_by_id(id: &str) -> Option<&'static ModelDescriptor> {
        AVAILABLE_MODELS.iter().find(|model| model.id == id)
    }
}

/// Selectable chat models, in picker order.
pub const AVAILABLE_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "anthropic/claude-opus-4-5",
        display_name: "Claude Opus 4.5",
        vendor: "anthropic",
        capabilities: &[],
        description: "Most capable Anthropic model",
    },
    ModelDescriptor {
        id: "anthropic/claude-sonnet-4-5",
        display_name: "Claude Sonnet 4.5",
        vendor: "anthropic",
        capabilities: &[],
        description: "Best balance of speed, intelligence, and cost",
    },
    ModelDescriptor {
        id: "anthropic/claude-haiku-4-5",
        display_name: "Claude Haiku 4.5",
        vendor: "anthropic",
        capabilities: &[],
        description: "Fast and affordable, great for everyday tasks",
    },
    ModelDescriptor {
        id: "anthropic/claude-3.7-sonnet-thinking",
        display_name: "Claude 3.7 Sonnet",
        vendor: "anthropic",
        capabilities: &[Capability::Reasoning],
        description: "Extended thinking for complex problems",
    },
];

/// One display group of models.
#[derive(Debug, Clone)]
pub struct ModelGroup {
    pub tag: &'static str,
    pub models: Vec<&'static ModelDescriptor>,
}

/// Models grouped by display tag.
///
/// Group order follows first appearance in the registry; within a
/// group, registry order is preserved.
pub fn model_groups() -> &'static [ModelGroup] {
    static GROUPS: OnceLock<Vec<ModelGroup>> = OnceLock::new();
    GROUPS.get_or_init(|| {
        let mut groups: Vec<ModelGroup> = Vec::new();
        for model in AVAILABLE_MODELS {
            let tag = model.display_group();
            match groups.iter_mut().find(|group| group.tag == tag) {
                Some(group) => group.models.push(model),
                None => groups.push(ModelGroup {
                    tag,
                    models: vec![model],
                }),
            }
        }
        groups
    })
}
