use std::collections::HashMap;

use async_trait::async_trait;

/// Maps a component name from a page descriptor to something renderable.
#[async_trait]
pub trait ComponentResolver: Send + Sync {
    type Component: Send + Sync + 'static;

    async fn resolve(&self, name: &str) -> anyhow::Result<Self::Component>;
}

/// Resolver over a fixed name → component table.
#[derive(Debug, Clone)]
pub struct ComponentRegistry<C> {
    components: HashMap<String, C>,
}

impl<C> Default for ComponentRegistry<C> {
    fn default() -> Self {
        Self {
            components: HashMap::new(),
        }
    }
}

impl<C: Clone> ComponentRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, component: C) -> Self {
        self.components.insert(name.into(), component);
        self
    }
}

#[async_trait]
impl<C> ComponentResolver for ComponentRegistry<C>
where
    C: Clone + Send + Sync + 'static,
{
    type Component = C;

    async fn resolve(&self, name: &str) -> anyhow::Result<C> {
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown component: {name}"))
    }
}
