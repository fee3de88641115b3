// main.rs
//
// Command-line front end: load an STL, grid-cut it, write one STL per cell piece.

use gridcut::{CutRange, GridCut, Object, Scene, float_types, mesh::Mesh};
use eyre::{WrapErr, bail, eyre};
use std::{fs, path::PathBuf};
use tracing::{info, warn};

const USAGE: &str = "usage: gridcut <input.stl> [output_dir] [--start N] [--stop N] [--step N] [--tolerance T] [--ascii]";

/// Parsed command line
#[derive(Debug)]
struct Args {
    input: PathBuf,
    output: PathBuf,
    start: i64,
    stop: i64,
    step: i64,
    tolerance: Option<float_types::Real>,
    ascii: bool,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> eyre::Result<Args> {
        let defaults = CutRange::default();
        let mut positional = Vec::new();
        let mut args = Args {
            input: PathBuf::new(),
            output: PathBuf::from("cells"),
            start: defaults.start(),
            stop: defaults.stop(),
            step: defaults.step(),
            tolerance: None,
            ascii: false,
        };

        while let Some(arg) = raw.next() {
            let mut value = |flag: &str| {
                raw.next()
                    .ok_or_else(|| eyre!("missing value for {flag}\n{USAGE}"))
            };
            match arg.as_str() {
                "--start" => args.start = value("--start")?.parse()?,
                "--stop" => args.stop = value("--stop")?.parse()?,
                "--step" => args.step = value("--step")?.parse()?,
                "--tolerance" => args.tolerance = Some(value("--tolerance")?.parse()?),
                "--ascii" => args.ascii = true,
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        args.input = positional.next().ok_or_else(|| eyre!(USAGE))?.into();
        if let Some(output) = positional.next() {
            args.output = output.into();
        }
        Ok(args)
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("gridcut=info".parse()?),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    if let Some(tolerance) = args.tolerance {
        if !float_types::set_tolerance(tolerance) {
            warn!(tolerance, "tolerance was already fixed, ignoring --tolerance");
        }
    }

    let name = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Mesh")
        .to_string();
    let bytes = fs::read(&args.input)
        .wrap_err_with(|| format!("reading {}", args.input.display()))?;
    let mesh: Mesh<()> = Mesh::from_stl_bytes(&bytes, None)?;
    info!(
        input = %args.input.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "loaded mesh"
    );

    let mut scene: Scene<()> = Scene::new();
    let id = scene.add_object(Object::new_mesh(name, mesh));
    scene.select(id);

    let report = GridCut::new()
        .range(CutRange::new(args.start, args.stop, args.step)?)
        .run(&mut scene)?;

    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("creating {}", args.output.display()))?;
    for piece in &report.pieces {
        let Some(object) = scene.object(piece.id) else {
            continue;
        };
        let [x, y, z] = piece.cell();
        let path = args.output.join(format!("{}_{x}_{y}_{z}.stl", object.name));
        let mesh = object.mesh()?;
        if args.ascii {
            fs::write(&path, mesh.to_stl_ascii(&object.name))?;
        } else {
            fs::write(&path, mesh.to_stl_binary(&object.name)?)?;
        }
        info!(
            piece = %object.name,
            cell = ?piece.cell(),
            faces = mesh.face_count(),
            path = %path.display(),
            "wrote piece"
        );
    }

    info!(
        pieces = report.pieces.len(),
        output = %args.output.display(),
        "done"
    );
    Ok(())
}
