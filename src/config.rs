/// The attribute that bare words and `/…/` atoms are tested against.
pub const DEFAULT_ATTRIBUTE: &str = "word";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    default_attribute: String,
    /// Upper bound on simulation rounds for one `exec`. `None` is unbounded,
    /// which still terminates because the frontier never revisits a thread.
    step_limit: Option<usize>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn default_attribute(&self) -> &str {
        &self.default_attribute
    }

    pub fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_attribute: DEFAULT_ATTRIBUTE.to_string(),
            step_limit: None,
        }
    }
}

#[derive(Debug)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub fn new() -> ConfigBuilder {
        ConfigBuilder(Config::default())
    }

    pub fn build(self) -> Config {
        self.0
    }

    pub fn default_attribute(mut self, name: &str) -> ConfigBuilder {
        self.0.default_attribute = name.to_string();
        self
    }

    pub fn step_limit(mut self, limit: Option<usize>) -> ConfigBuilder {
        self.0.step_limit = limit;
        self
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_ATTRIBUTE};
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::default();
        assert_eq!(config.default_attribute(), DEFAULT_ATTRIBUTE);
        assert_eq!(config.step_limit(), None);

        let config = Config::builder()
            .default_attribute("lemma")
            .step_limit(Some(10))
            .build();
        assert_eq!(config.default_attribute(), "lemma");
        assert_eq!(config.step_limit(), Some(10));
    }
}
