use crate::billboard::AnchorId;
use crate::config::SceneConfig;
use glam::Vec3;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CelestialKind {
    Galaxy,
    Star,
    Planet,
    BlackHole,
}

impl CelestialKind {
    pub fn label(self) -> &'static str {
        match self {
            CelestialKind::Galaxy => "Galaxy",
            CelestialKind::Star => "Star",
            CelestialKind::Planet => "Planet",
            CelestialKind::BlackHole => "Black hole",
        }
    }

    /// Radius range in world units.
    fn radius_range(self) -> (f32, f32) {
        match self {
            CelestialKind::Galaxy => (3.0, 5.0),
            CelestialKind::Star => (1.2, 2.4),
            CelestialKind::Planet => (0.5, 1.4),
            CelestialKind::BlackHole => (0.8, 1.6),
        }
    }

    fn palette(self) -> &'static [[f32; 3]] {
        match self {
            CelestialKind::Galaxy => &[[0.75, 0.55, 0.95], [0.55, 0.65, 1.0]],
            CelestialKind::Star => &[[1.0, 0.85, 0.45], [1.0, 0.6, 0.35], [0.7, 0.8, 1.0]],
            CelestialKind::Planet => &[[0.35, 0.7, 0.45], [0.8, 0.5, 0.3], [0.4, 0.6, 0.9]],
            CelestialKind::BlackHole => &[[0.15, 0.1, 0.2]],
        }
    }
}

/// One annotated body in the universe.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub id: AnchorId,
    pub kind: CelestialKind,
    pub name: String,
    pub position: Vec3,
    pub radius: f32,
    pub color_rgb: [f32; 3],
    pub description: String,
}

const SYLLABLES: &[&str] = &[
    "ka", "lor", "ven", "thi", "os", "mar", "zu", "rel", "an", "dra", "qua", "sol", "vex", "ny",
    "tor", "il",
];

const DESCRIPTORS: &[&str] = &[
    "claimed by the Azure Clan",
    "contested border territory",
    "rich in rare isotopes",
    "uncharted by any clan",
    "home to an ancient relay",
    "shrouded in ion storms",
];

/// Generate the universe for `config`. The same seed always yields the same
/// bodies.
pub fn generate_universe(config: &SceneConfig) -> Vec<CelestialBody> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.body_count)
        .map(|i| generate_body(&mut rng, i as u32, config.spread))
        .collect()
}

fn generate_body(rng: &mut StdRng, index: u32, spread: f32) -> CelestialBody {
    let kind = match rng.gen_range(0..100) {
        0..=9 => CelestialKind::Galaxy,
        10..=34 => CelestialKind::Star,
        35..=91 => CelestialKind::Planet,
        _ => CelestialKind::BlackHole,
    };
    let (r_min, r_max) = kind.radius_range();
    let radius = rng.gen_range(r_min..r_max);
    // Flattened disc.
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let dist = spread * rng.gen::<f32>().sqrt();
    let height = rng.gen_range(-0.15_f32..0.15) * spread;
    let position = Vec3::new(dist * angle.cos(), height, dist * angle.sin());
    let color_rgb = *kind.palette().choose(rng).unwrap_or(&[1.0, 1.0, 1.0]);
    let name = generate_name(rng);
    let descriptor = DESCRIPTORS.choose(rng).copied().unwrap_or("uncharted");
    let description = format!("{} {}", kind.label(), descriptor);
    CelestialBody {
        id: AnchorId(index),
        kind,
        name,
        position,
        radius,
        color_rgb,
        description,
    }
}

fn generate_name(rng: &mut StdRng) -> String {
    let parts = rng.gen_range(2..=3);
    let mut name: String = (0..parts)
        .filter_map(|_| SYLLABLES.choose(rng).copied())
        .collect();
    if let Some(first) = name.get(0..1) {
        name = first.to_uppercase() + &name[1..];
    }
    format!("{}-{}", name, rng.gen_range(1..100))
}
