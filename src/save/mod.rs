use crate::{config::Config, distributions::Positions, params::ParameterRecord, Float};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every resolved parameter as `key = value [unit]`, one per line.
///
/// The header and footer lines let analysis scripts find the block; the
/// file is an audit trail and not meant to be read back in.
pub fn write_echo<W: Write>(record: &ParameterRecord, w: &mut W) -> std::io::Result<()> {
    let g = &record.grid;
    let e = &record.electrons;
    let i = &record.ions;
    let n = &record.neutrals;
    let b = &record.boundaries;

    writeln!(w, "#Common Parameter Values")?;
    writeln!(w, "Nx = {}", g.x.n)?;
    writeln!(w, "Ny = {}", g.y.n)?;
    writeln!(w, "Nz = {}", g.z.n)?;
    writeln!(w, "x0 = {:.6} [m]", g.x.lo)?;
    writeln!(w, "y0 = {:.6} [m]", g.y.lo)?;
    writeln!(w, "z0 = {:.6} [m]", g.z.lo)?;
    writeln!(w, "x1 = {:.6} [m]", g.x.hi)?;
    writeln!(w, "y1 = {:.6} [m]", g.y.hi)?;
    writeln!(w, "z1 = {:.6} [m]", g.z.hi)?;
    writeln!(w, "Lx = {:.6} [m]", g.x.length())?;
    writeln!(w, "Ly = {:.6} [m]", g.y.length())?;
    writeln!(w, "Lz = {:.6} [m]", g.z.length())?;
    writeln!(w, "dx = {:.6} [m]", g.x.delta)?;
    writeln!(w, "dy = {:.6} [m]", g.y.delta)?;
    writeln!(w, "dz = {:.6} [m]", g.z.delta)?;
    for (axis, faces, ab) in [
        ('x', &record.faces.x, &b.x),
        ('y', &record.faces.y, &b.y),
        ('z', &record.faces.z, &b.z),
    ]
    .iter()
    {
        writeln!(w, "{}BC = {} / {}", axis, faces[0], faces[1])?;
        writeln!(w, "{}BC field = {} / {}", axis, ab.field[0], ab.field[1])?;
        writeln!(w, "{}BC particle = {} / {}", axis, ab.particle[0], ab.particle[1])?;
    }
    writeln!(w, "lhs type = {}", record.solver.lhs)?;
    writeln!(w, "rhs type = {}", record.solver.rhs)?;
    writeln!(w, "generator = {}", record.sampling.kind)?;
    writeln!(w, "density = {}", record.profile.name)?;
    writeln!(w, "seed = {}", record.sampling.seed)?;
    writeln!(w, "Np = {}", record.np)?;
    writeln!(w, "n0 = {} [m^-3]", record.n0)?;
    writeln!(w, "B0 = {} [T]", record.b0)?;
    writeln!(w, "E0 = {} [N/C]", record.e0)?;
    writeln!(w, "qe = {:e} [C]", e.q)?;
    writeln!(w, "me = {:e} [kg]", e.m)?;
    writeln!(w, "nue = {} [s^-1]", e.nu)?;
    write_vector(w, "ve0", &e.v0)?;
    write_vector(w, "veT", &e.vt)?;
    writeln!(w, "Te = {:.6} [K]", e.t)?;
    writeln!(w, "gamma_e = {:.6}", record.gamma_e)?;
    writeln!(w, "Omega_e = {} [s^-1]", e.omega)?;
    writeln!(w, "kappa_e = {}", e.kappa)?;
    writeln!(w, "qi = {:e} [C]", i.q)?;
    writeln!(w, "mi = {:e} [kg]", i.m)?;
    writeln!(w, "nui = {} [s^-1]", i.nu)?;
    write_vector(w, "vi0", &i.v0)?;
    write_vector(w, "viT", &i.vt)?;
    writeln!(w, "Ti = {:.6} [K]", i.t)?;
    writeln!(w, "Omega_i = {} [s^-1]", i.omega)?;
    writeln!(w, "kappa_i = {}", i.kappa)?;
    writeln!(w, "mn = {:e} [kg]", n.m)?;
    writeln!(w, "Tn = {:.6} [K]", n.t)?;
    writeln!(w, "vnT = {:.6} [m/s]", n.vt[0])?;
    write_vector(w, "vn0", &n.v0)?;
    writeln!(w, "#End of Common Parameter Values")?;
    Ok(())
}

fn write_vector<W: Write>(w: &mut W, key: &str, v: &[Float; 3]) -> std::io::Result<()> {
    for (c, value) in ['x', 'y', 'z'].iter().zip(v.iter()) {
        writeln!(w, "{}{} = {:.6} [m/s]", key, c, value)?;
    }
    Ok(())
}

/// Writes the options exactly as they were given, before any defaulting.
pub fn write_options<W: Write>(cfg: &Config, w: &mut W) -> Result<()> {
    let text = cfg.to_toml()?;
    writeln!(w, "#Input Options")?;
    w.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(w)?;
    }
    writeln!(w, "#End of Input Options")?;
    Ok(())
}

/// Writes the raw options followed by the resolved parameters to `path`,
/// replacing any previous contents.
pub fn echo_params(cfg: &Config, record: &ParameterRecord, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    let write = |w: &mut BufWriter<File>| -> Result<()> {
        write_options(cfg, w)?;
        write_echo(record, w)?;
        w.flush()?;
        Ok(())
    };
    write(&mut w).with_context(|| format!("Could not write parameters to {}", path.display()))
}

/// Saves every `stride`-th position as `x.npy`, `y.npy` and `z.npy`.
pub fn save_positions(pos: &Positions, outdir: &Path, stride: usize) -> Result<()> {
    let stride = stride.max(1);
    for (name, data) in &[("x", &pos.x), ("y", &pos.y), ("z", &pos.z)] {
        let out: Vec<Float> = data.iter().step_by(stride).copied().collect();
        npy::to_file(outdir.join(format!("{}.npy", name)), out)
            .with_context(|| format!("Could not save {} data to file", name))?;
    }
    Ok(())
}
