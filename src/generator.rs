use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::model::{ResourceVector, Workload, WorkloadId};

/// Inclusive integer range a demand dimension is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

impl ValueRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn distribution(&self, name: &str) -> Result<Uniform<u32>, ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "generator.{} range is empty: min {} > max {}",
                name, self.min, self.max
            )));
        }
        Ok(Uniform::new_inclusive(self.min, self.max))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub workload_count: usize,
    pub seed: u64,
    pub cpu: ValueRange,
    pub ram: ValueRange,
    pub iops: ValueRange,
    pub net_bw: ValueRange,
    pub gpu_probability: f64,
    pub energy_per_cpu: f64,
    pub energy_per_gpu: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            workload_count: 30,
            seed: 42,
            cpu: ValueRange::new(5, 30),
            ram: ValueRange::new(1, 16),
            iops: ValueRange::new(100, 1000),
            net_bw: ValueRange::new(1, 3),
            gpu_probability: 0.1,
            energy_per_cpu: 2.0,
            energy_per_gpu: 100.0,
        }
    }
}

/// Draws heterogeneous workloads: some CPU heavy, some RAM heavy, a few
/// needing a GPU. Energy follows CPU, with a large surcharge per GPU.
pub struct WorkloadGenerator {
    settings: GeneratorSettings,
    cpu: Uniform<u32>,
    ram: Uniform<u32>,
    iops: Uniform<u32>,
    net_bw: Uniform<u32>,
    gpu: Bernoulli,
}

impl WorkloadGenerator {
    pub fn new(settings: GeneratorSettings) -> Result<Self, ConfigError> {
        let gpu = Bernoulli::new(settings.gpu_probability).map_err(|_| {
            ConfigError::Invalid(format!(
                "generator.gpu_probability must be within [0, 1], got {}",
                settings.gpu_probability
            ))
        })?;

        Ok(Self {
            cpu: settings.cpu.distribution("cpu")?,
            ram: settings.ram.distribution("ram")?,
            iops: settings.iops.distribution("iops")?,
            net_bw: settings.net_bw.distribution("net_bw")?,
            gpu,
            settings,
        })
    }

    /// Reproducible batch seeded from the settings.
    pub fn generate(&self) -> Vec<Workload> {
        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        self.generate_with(&mut rng)
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Workload> {
        let workloads: Vec<Workload> = (1..=self.settings.workload_count)
            .map(|i| self.draw(i as WorkloadId, rng))
            .collect();
        debug!(count = workloads.len(), seed = self.settings.seed, "generated workloads");
        workloads
    }

    fn draw<R: Rng + ?Sized>(&self, id: WorkloadId, rng: &mut R) -> Workload {
        let cpu = f64::from(self.cpu.sample(rng));
        let ram = f64::from(self.ram.sample(rng));
        let iops = f64::from(self.iops.sample(rng));
        let net_bw = f64::from(self.net_bw.sample(rng));
        let gpu = if self.gpu.sample(rng) { 1.0 } else { 0.0 };
        let energy = cpu * self.settings.energy_per_cpu + gpu * self.settings.energy_per_gpu;

        Workload::new(
            id,
            ResourceVector::new(cpu, ram, iops, net_bw)
                .with_gpu(gpu)
                .with_energy(energy),
        )
    }
}
