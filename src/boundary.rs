//! Per-face boundary classification.
//!
//! Each face carries one user-facing [`BoundaryType`]. The classifier splits
//! it into the tag the field solver needs and the rule the particle push
//! needs, and refuses configurations where only one face of an axis is
//! periodic.
use crate::config::BoundaryInput;
use crate::error::{InitError, InitResult};

named_enum! {
    pub enum BoundaryType: "boundary type" {
        Periodic => "periodic",
        Injection => "injection",
        Reflection => "reflection",
        Dirichlet => "dirichlet",
        Neumann => "neumann",
    }
}

named_enum! {
    /// Boundary family for the field solver.
    pub enum FieldBoundary: "field boundary" {
        Periodic => "periodic",
        Dirichlet => "dirichlet",
        Neumann => "neumann",
    }
}

named_enum! {
    /// What happens to a particle that crosses a face.
    pub enum ParticleBoundary: "particle boundary" {
        Periodic => "periodic",
        Injection => "injection",
        Reflection => "reflection",
    }
}

impl BoundaryType {
    pub fn field(self) -> FieldBoundary {
        match self {
            BoundaryType::Periodic => FieldBoundary::Periodic,
            BoundaryType::Dirichlet | BoundaryType::Injection => FieldBoundary::Dirichlet,
            BoundaryType::Neumann | BoundaryType::Reflection => FieldBoundary::Neumann,
        }
    }

    pub fn particle(self) -> ParticleBoundary {
        match self {
            BoundaryType::Periodic => ParticleBoundary::Periodic,
            BoundaryType::Injection => ParticleBoundary::Injection,
            BoundaryType::Reflection | BoundaryType::Dirichlet | BoundaryType::Neumann => {
                ParticleBoundary::Reflection
            }
        }
    }
}

/// Raw selection for the six faces, lower face first on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Faces {
    pub x: [BoundaryType; 2],
    pub y: [BoundaryType; 2],
    pub z: [BoundaryType; 2],
}

impl Faces {
    pub fn new(input: &BoundaryInput) -> Faces {
        let get = |b: Option<BoundaryType>| b.unwrap_or(BoundaryType::Periodic);
        Faces {
            x: [get(input.x0), get(input.x1)],
            y: [get(input.y0), get(input.y1)],
            z: [get(input.z0), get(input.z1)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBoundary {
    pub field: [FieldBoundary; 2],
    pub particle: [ParticleBoundary; 2],
}

impl AxisBoundary {
    pub fn classify(axis: char, faces: [BoundaryType; 2]) -> InitResult<AxisBoundary> {
        let [lower, upper] = faces;
        let lower_periodic = lower == BoundaryType::Periodic;
        let upper_periodic = upper == BoundaryType::Periodic;
        if lower_periodic != upper_periodic {
            return Err(InitError::AsymmetricPeriodic { axis, lower, upper });
        }
        Ok(AxisBoundary {
            field: [lower.field(), upper.field()],
            particle: [lower.particle(), upper.particle()],
        })
    }

    pub fn is_periodic(&self) -> bool {
        self.particle[0] == ParticleBoundary::Periodic
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundaries {
    pub x: AxisBoundary,
    pub y: AxisBoundary,
    pub z: AxisBoundary,
}

impl Boundaries {
    pub fn classify(faces: &Faces) -> InitResult<Boundaries> {
        Ok(Boundaries {
            x: AxisBoundary::classify('x', faces.x)?,
            y: AxisBoundary::classify('y', faces.y)?,
            z: AxisBoundary::classify('z', faces.z)?,
        })
    }

    /// Field tags in face order -x, +x, -y, +y, -z, +z.
    pub fn field_tags(&self) -> [FieldBoundary; 6] {
        [
            self.x.field[0],
            self.x.field[1],
            self.y.field[0],
            self.y.field[1],
            self.z.field[0],
            self.z.field[1],
        ]
    }

    /// Particle rules in face order -x, +x, -y, +y, -z, +z.
    pub fn particle_tags(&self) -> [ParticleBoundary; 6] {
        [
            self.x.particle[0],
            self.x.particle[1],
            self.y.particle[0],
            self.y.particle[1],
            self.z.particle[0],
            self.z.particle[1],
        ]
    }
}
