use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// One scalar axis of resource demand or capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Cpu,
    Ram,
    Iops,
    NetBw,
    Gpu,
    Energy,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Cpu,
        Dimension::Ram,
        Dimension::Iops,
        Dimension::NetBw,
        Dimension::Gpu,
        Dimension::Energy,
    ];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Cpu => "cpu",
            Dimension::Ram => "ram",
            Dimension::Iops => "iops",
            Dimension::NetBw => "net_bw",
            Dimension::Gpu => "gpu",
            Dimension::Energy => "energy",
        };
        f.write_str(name)
    }
}

/// A point in the six-dimensional resource space.
///
/// Arithmetic is component-wise and never clamps, so a vector may go
/// negative while a removal is being simulated. `gpu` and `energy` default
/// to zero, which keeps four-dimensional inputs consistent with the rest.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceVector {
    pub cpu: f64,
    pub ram: f64,
    pub iops: f64,
    pub net_bw: f64,
    pub gpu: f64,
    pub energy: f64,
}

impl ResourceVector {
    pub fn new(cpu: f64, ram: f64, iops: f64, net_bw: f64) -> Self {
        Self {
            cpu,
            ram,
            iops,
            net_bw,
            gpu: 0.0,
            energy: 0.0,
        }
    }

    pub fn with_gpu(mut self, gpu: f64) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn component(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Cpu => self.cpu,
            Dimension::Ram => self.ram,
            Dimension::Iops => self.iops,
            Dimension::NetBw => self.net_bw,
            Dimension::Gpu => self.gpu,
            Dimension::Energy => self.energy,
        }
    }

    /// Dominance test: every dimension of `self` is `<=` the same dimension of `other`.
    pub fn fits_in(&self, other: &ResourceVector) -> bool {
        self.first_exceeding(other).is_none()
    }

    /// First dimension, in declaration order, where `self` exceeds `other`.
    pub fn first_exceeding(&self, other: &ResourceVector) -> Option<Dimension> {
        Dimension::ALL
            .into_iter()
            .find(|&d| self.component(d) > other.component(d))
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;

    fn add(self, other: ResourceVector) -> ResourceVector {
        ResourceVector {
            cpu: self.cpu + other.cpu,
            ram: self.ram + other.ram,
            iops: self.iops + other.iops,
            net_bw: self.net_bw + other.net_bw,
            gpu: self.gpu + other.gpu,
            energy: self.energy + other.energy,
        }
    }
}

impl Sub for ResourceVector {
    type Output = ResourceVector;

    fn sub(self, other: ResourceVector) -> ResourceVector {
        ResourceVector {
            cpu: self.cpu - other.cpu,
            ram: self.ram - other.ram,
            iops: self.iops - other.iops,
            net_bw: self.net_bw - other.net_bw,
            gpu: self.gpu - other.gpu,
            energy: self.energy - other.energy,
        }
    }
}

impl AddAssign for ResourceVector {
    fn add_assign(&mut self, other: ResourceVector) {
        *self = *self + other;
    }
}

impl SubAssign for ResourceVector {
    fn sub_assign(&mut self, other: ResourceVector) {
        *self = *self - other;
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(CPU:{}, RAM:{}, IO:{}, Net:{}, GPU:{}, Energy:{})",
            self.cpu, self.ram, self.iops, self.net_bw, self.gpu, self.energy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_demand_fits_zero_capacity() {
        let zero = ResourceVector::zero();
        assert!(zero.fits_in(&zero));
    }

    #[test]
    fn fits_in_requires_every_dimension() {
        let capacity = ResourceVector::new(80.0, 64.0, 5000.0, 10.0);
        assert!(ResourceVector::new(80.0, 64.0, 5000.0, 10.0).fits_in(&capacity));

        let too_much_net = ResourceVector::new(1.0, 1.0, 1.0, 11.0);
        assert!(!too_much_net.fits_in(&capacity));
        assert_eq!(too_much_net.first_exceeding(&capacity), Some(Dimension::NetBw));

        let needs_gpu = ResourceVector::new(1.0, 1.0, 1.0, 1.0).with_gpu(1.0);
        assert_eq!(needs_gpu.first_exceeding(&capacity), Some(Dimension::Gpu));
    }

    #[test]
    fn subtraction_may_go_negative() {
        let a = ResourceVector::new(10.0, 0.0, 0.0, 0.0);
        let b = ResourceVector::new(15.0, 2.0, 0.0, 0.0).with_energy(3.0);
        let diff = a - b;
        assert_eq!(diff.cpu, -5.0);
        assert_eq!(diff.ram, -2.0);
        assert_eq!(diff.energy, -3.0);
        assert_eq!(diff + b, a);
    }

    #[test]
    fn assign_operators_match_binary_ones() {
        let mut load = ResourceVector::zero();
        let demand = ResourceVector::new(5.0, 2.0, 300.0, 1.0).with_gpu(1.0).with_energy(110.0);
        load += demand;
        load += demand;
        assert_eq!(load, demand + demand);
        load -= demand;
        assert_eq!(load, demand);
    }
}
