//! Particles travelling along links from source to target.

/// Evenly spaced particles per link, each link with its own phase.
#[derive(Clone, Debug)]
pub struct LinkParticles {
	pub per_link: usize,
	/// Fraction of the link travelled per second.
	pub speed: f64,
}

impl Default for LinkParticles {
	fn default() -> Self {
		Self {
			per_link: 2,
			speed: 0.4,
		}
	}
}

impl LinkParticles {
	/// Simple pseudo-random function (deterministic)
	fn pseudo_random(seed: f64) -> f64 {
		let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
		x - x.floor()
	}

	/// Positions along link `link_idx` at `time`, as fractions in `[0, 1)`.
	pub fn offsets(&self, link_idx: usize, time: f64) -> impl Iterator<Item = f64> + '_ {
		let phase = Self::pseudo_random(link_idx as f64 + 1.0);
		let n = self.per_link.max(1) as f64;
		(0..self.per_link).map(move |i| (time * self.speed + phase + i as f64 / n).fract())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn offsets_stay_on_the_link_and_keep_spacing() {
		let particles = LinkParticles::default();
		for t in [0.0, 0.3, 7.9, 120.5] {
			let offsets: Vec<f64> = particles.offsets(3, t).collect();
			assert_eq!(offsets.len(), 2);
			assert!(offsets.iter().all(|o| (0.0..1.0).contains(o)));
			let gap = (offsets[1] - offsets[0]).rem_euclid(1.0);
			assert!((gap - 0.5).abs() < 1e-9);
		}
	}
}
