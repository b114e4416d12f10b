use crate::advect::advect;
use crate::boundary::BoundaryKind;
use crate::error::ConfigError;
use crate::field::Field;
use crate::grid::Grid;
use crate::project::project;
use crate::solve::{diffuse, GaussSeidel, Jacobi, LinSolve};

/// Density ceiling applied by the decay pass. Velocity is never clamped;
/// decay is the designed mitigation for blow-up, not a safety rail.
pub const DENSITY_MAX: f32 = 255.0;

/// Which relaxation iteration backs diffusion and the pressure solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelaxScheme {
    /// Sequential in-place sweeps.
    GaussSeidel,
    /// Double-buffered frozen-source sweeps.
    Jacobi,
}

#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    /// Interior resolution per axis.
    pub resolution: usize,
    /// Density diffusion rate.
    pub diffusion: f32,
    /// Velocity viscosity rate.
    pub viscosity: f32,
    /// Fixed physical time step, decoupled from wall-clock render rate.
    pub dt: f32,
    /// Amount subtracted from every density cell per tick.
    pub density_decay: f32,
    /// Injection magnitude handed to the forcing callback.
    pub source_magnitude: f32,
    pub scheme: RelaxScheme,
}

impl SimParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        let rates = [
            ("diffusion", self.diffusion),
            ("viscosity", self.viscosity),
            ("density_decay", self.density_decay),
            ("source_magnitude", self.source_magnitude),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        Ok(())
    }
}

/// Additive forcing view handed to the per-tick callback. Writes may address
/// the ghost ring of the previous tick's fields; the next boundary pass
/// overwrites it anyway.
pub struct Sources<'a> {
    density: &'a mut Field,
    u: &'a mut Field,
    v: &'a mut Field,
    magnitude: f32,
}

impl Sources<'_> {
    /// Configured injection magnitude.
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn add_density(&mut self, i: usize, j: usize, amount: f32) {
        self.density.add(i, j, amount);
    }

    pub fn add_velocity(&mut self, i: usize, j: usize, du: f32, dv: f32) {
        self.u.add(i, j, du);
        self.v.add(i, j, dv);
    }
}

/// All simulation state: the velocity pair, the density field, and their
/// scratch counterparts, allocated once and reused destructively every tick.
pub struct Simulation {
    params: SimParams,
    solver: Box<dyn LinSolve + Send>,
    u: Field,
    v: Field,
    density: Field,
    u_prev: Field,
    v_prev: Field,
    density_prev: Field,
    tick: u64,
}

impl Simulation {
    pub fn new(params: SimParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let grid = Grid::new(params.resolution);
        let solver: Box<dyn LinSolve + Send> = match params.scheme {
            RelaxScheme::GaussSeidel => Box::new(GaussSeidel),
            RelaxScheme::Jacobi => Box::new(Jacobi::new(grid)),
        };
        log::info!(
            "simulation ready: {n}x{n} interior cells, {scheme:?} relaxation",
            n = params.resolution,
            scheme = params.scheme,
        );
        Ok(Self {
            params,
            solver,
            u: Field::new(grid),
            v: Field::new(grid),
            density: Field::new(grid),
            u_prev: Field::new(grid),
            v_prev: Field::new(grid),
            density_prev: Field::new(grid),
            tick: 0,
        })
    }

    pub fn params(&self) -> SimParams {
        self.params
    }

    pub fn resolution(&self) -> usize {
        self.params.resolution
    }

    /// Read-only density for the rendering side.
    pub fn density(&self) -> &Field {
        &self.density
    }

    pub fn velocity(&self) -> (&Field, &Field) {
        (&self.u, &self.v)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn add_density(&mut self, i: usize, j: usize, amount: f32) {
        self.density.add(i, j, amount);
    }

    pub fn add_velocity(&mut self, i: usize, j: usize, du: f32, dv: f32) {
        self.u.add(i, j, du);
        self.v.add(i, j, dv);
    }

    /// Advance one tick without external forcing.
    pub fn step(&mut self) {
        self.step_with(|_| {});
    }

    /// Advance one tick: forcing, then the velocity step, then the density
    /// step, then decay. The order is load-bearing — density must be carried
    /// by the tick's final velocity, and projection brackets advection.
    pub fn step_with<F: FnOnce(&mut Sources<'_>)>(&mut self, forcing: F) {
        {
            let mut sources = Sources {
                density: &mut self.density,
                u: &mut self.u,
                v: &mut self.v,
                magnitude: self.params.source_magnitude,
            };
            forcing(&mut sources);
        }
        self.velocity_step();
        self.density_step();
        self.decay();
        self.tick += 1;
        log::trace!("tick {} complete", self.tick);
    }

    fn velocity_step(&mut self) {
        let SimParams { viscosity, dt, .. } = self.params;
        diffuse(
            self.solver.as_mut(),
            &mut self.u_prev,
            &self.u,
            BoundaryKind::ReflectVertical,
            viscosity,
            dt,
        );
        diffuse(
            self.solver.as_mut(),
            &mut self.v_prev,
            &self.v,
            BoundaryKind::ReflectHorizontal,
            viscosity,
            dt,
        );
        // The first projection borrows (u, v) as pressure/divergence scratch;
        // both are rewritten by the advection below.
        project(
            self.solver.as_mut(),
            &mut self.u_prev,
            &mut self.v_prev,
            &mut self.u,
            &mut self.v,
        );
        advect(
            &mut self.u,
            &self.u_prev,
            &self.u_prev,
            &self.v_prev,
            BoundaryKind::ReflectVertical,
            dt,
        );
        advect(
            &mut self.v,
            &self.v_prev,
            &self.u_prev,
            &self.v_prev,
            BoundaryKind::ReflectHorizontal,
            dt,
        );
        project(
            self.solver.as_mut(),
            &mut self.u,
            &mut self.v,
            &mut self.u_prev,
            &mut self.v_prev,
        );
    }

    fn density_step(&mut self) {
        let SimParams { diffusion, dt, .. } = self.params;
        diffuse(
            self.solver.as_mut(),
            &mut self.density_prev,
            &self.density,
            BoundaryKind::Continuity,
            diffusion,
            dt,
        );
        advect(
            &mut self.density,
            &self.density_prev,
            &self.u,
            &self.v,
            BoundaryKind::Continuity,
            dt,
        );
    }

    fn decay(&mut self) {
        let decay = self.params.density_decay;
        self.density
            .update_with_index(|_, _, value| (value - decay).clamp(0.0, DENSITY_MAX));
    }
}
