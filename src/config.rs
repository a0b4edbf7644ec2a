use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::ConfigError;
use crate::generator::GeneratorSettings;
use crate::model::{Dimension, ResourceVector, ServerTemplate};
use crate::scheduler::OptimizerSettings;

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub template: TemplateConfig,
    pub generator: GeneratorSettings,
    pub optimizer: OptimizerSettings,
}

/// Standard server shape. Defaults follow an m5.2xlarge-like box with the
/// 80% safe-usage rule applied to CPU.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub capacity: ResourceVector,
    pub cost_tier: f64,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            capacity: ResourceVector::new(80.0, 64.0, 5000.0, 10.0)
                .with_gpu(4.0)
                .with_energy(1000.0),
            cost_tier: 1.0,
        }
    }
}

impl TemplateConfig {
    pub fn server_template(&self) -> ServerTemplate {
        ServerTemplate {
            capacity: self.capacity,
            cost_tier: self.cost_tier,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for dimension in Dimension::ALL {
            let value = self.template.capacity.component(dimension);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "template.capacity.{} must be a non-negative number, got {}",
                    dimension, value
                )));
            }
        }
        if !(self.template.cost_tier.is_finite() && self.template.cost_tier > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "template.cost_tier must be positive, got {}",
                self.template.cost_tier
            )));
        }

        let probabilities = [
            ("generator.gpu_probability", self.generator.gpu_probability),
            ("optimizer.relocate_probability", self.optimizer.relocate_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }

        let ranges = [
            ("cpu", self.generator.cpu),
            ("ram", self.generator.ram),
            ("iops", self.generator.iops),
            ("net_bw", self.generator.net_bw),
        ];
        for (name, range) in ranges {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "generator.{} range is empty: min {} > max {}",
                    name, range.min, range.max
                )));
            }
        }

        Ok(())
    }
}
