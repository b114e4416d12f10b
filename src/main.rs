use anyhow::{Context, Result};
use smoke_sim::{RelaxScheme, SimParams, Simulation, DENSITY_MAX};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const RESOLUTION: usize = 128;
const TICKS: u64 = 600;
const FRAME_EVERY: u64 = 10;
const OUT_DIR: &str = "frames";

fn write_frame(sim: &Simulation, path: &Path) -> Result<()> {
    let n = sim.resolution();
    let density = sim.density();
    let mut pixels = Vec::with_capacity(n * n);
    // PNG rows run top to bottom; grid rows run bottom to top.
    for j in (1..=n).rev() {
        for i in 1..=n {
            let value = density.get(i, j).clamp(0.0, DENSITY_MAX);
            pixels.push((value / DENSITY_MAX * 255.0) as u8);
        }
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), n as u32, n as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let params = SimParams {
        resolution: RESOLUTION,
        diffusion: 0.0001,
        viscosity: 0.0002,
        dt: 1.0 / 60.0,
        density_decay: 0.4,
        source_magnitude: 120.0,
        scheme: RelaxScheme::Jacobi,
    };
    let mut sim = Simulation::new(params)?;
    std::fs::create_dir_all(OUT_DIR).with_context(|| format!("create {OUT_DIR}"))?;
    let center = RESOLUTION / 2;
    for tick in 0..TICKS {
        let sway = (tick as f32 * 0.05).sin();
        sim.step_with(|sources| {
            let amount = sources.magnitude();
            for i in center - 1..=center + 1 {
                sources.add_density(i, 2, amount);
                sources.add_velocity(i, 2, sway * 0.8, 2.5);
            }
        });
        if tick % FRAME_EVERY == 0 {
            let path = format!("{OUT_DIR}/frame_{tick:04}.png");
            write_frame(&sim, Path::new(&path))?;
            log::info!(
                "tick {tick}: wrote {path}, peak density {:.1}",
                sim.density().max_abs()
            );
        }
    }
    Ok(())
}
