//! Scene Dump CLI
//!
//! Loads a scene description (TOML or JSON), dumps it to XML and reports the
//! recovered faults.
//!
//! Run with: cargo run -p scene_dump_cli -- level.toml -o level.xml
//!       or: scenedump level.toml --preset terse

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use scene_dump::{dump_scene, DumpOptions, Preset, Severity};
use scene_graph::MemoryScene;
use scene_markup::XmlStyle;

#[derive(Parser, Debug)]
#[command(name = "scenedump")]
#[command(about = "Dump a scene description to annotated XML")]
struct Args {
    /// Scene description file (.toml or .json)
    scene: PathBuf,

    /// Output file; defaults to the scene path with an .xml extension
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Base option set (default, terse, verbose)
    #[arg(short = 'p', long, default_value = "default")]
    preset: Preset,

    /// TOML options file laid over the preset
    #[arg(long)]
    options: Option<PathBuf>,

    /// Write everything on one line
    #[arg(long)]
    no_indent: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = build_options(args)?;
    options.log_summary();

    let scene = MemoryScene::load_from_file(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    log::info!("Scene '{}': {} node(s)", scene.name, scene.node_count());

    let dump = dump_scene(&scene, &options).context("Dump failed")?;

    let output = output_path(&args.scene, args.output.as_deref());
    let style = if args.no_indent {
        XmlStyle::compact()
    } else {
        XmlStyle::default()
    };
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    dump.write_xml(&mut writer, style)?;
    writer.flush()?;

    for diagnostic in dump.diagnostics.iter().filter(|d| d.severity == Severity::Warning) {
        log::debug!("{}", diagnostic);
    }
    log::info!(
        "Wrote {} ({} object(s), {} annotation(s), {} warning(s))",
        output.display(),
        dump.objects.len(),
        dump.annotations.annotations,
        dump.warning_count()
    );
    Ok(())
}

/// Preset, then options file, then environment
fn build_options(args: &Args) -> anyhow::Result<DumpOptions> {
    let mut options = DumpOptions::preset(args.preset);
    if let Some(path) = &args.options {
        options = options
            .merge_file(path)
            .with_context(|| format!("Failed to read options {}", path.display()))?;
    }
    options.apply_env_overrides();
    options.validate()?;
    Ok(options)
}

fn output_path(scene: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => scene.with_extension("xml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "scenedump",
            "level.toml",
            "-o",
            "out.xml",
            "--preset",
            "terse",
            "--no-indent",
        ])
        .unwrap();
        assert_eq!(args.scene, PathBuf::from("level.toml"));
        assert_eq!(args.output, Some(PathBuf::from("out.xml")));
        assert_eq!(args.preset, Preset::Terse);
        assert!(args.no_indent);

        assert!(Args::try_parse_from(["scenedump", "level.toml", "--preset", "loud"]).is_err());
    }

    #[test]
    fn test_output_path_defaults_to_xml() {
        assert_eq!(output_path(Path::new("scenes/level.toml"), None), PathBuf::from("scenes/level.xml"));
        assert_eq!(
            output_path(Path::new("level.toml"), Some(Path::new("out.xml"))),
            PathBuf::from("out.xml")
        );
    }

    #[test]
    fn test_run_writes_xml() {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("level.toml");
        std::fs::write(
            &scene,
            "name = \"Level\"\n\n[[roots]]\nid = 1\nname = \"Root\"\n",
        )
        .unwrap();
        let options = dir.path().join("dump.toml");
        std::fs::write(&options, "xml_namespace = \"\"\n").unwrap();

        let args = Args::try_parse_from([
            OsStr::new("scenedump"),
            scene.as_os_str(),
            OsStr::new("--options"),
            options.as_os_str(),
            OsStr::new("--no-indent"),
        ])
        .unwrap();
        run(&args).unwrap();

        let xml = std::fs::read_to_string(dir.path().join("level.xml")).unwrap();
        assert!(xml.contains("<GameObject name=\"Root\""));
        assert!(xml.contains("<Scene version=\"1\">"));
    }

    #[test]
    fn test_run_reports_structural_failure() {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("broken.json");
        std::fs::write(&scene, r#"{"roots": [{"id": 1, "name": "Root", "broken": "gone"}]}"#).unwrap();

        let args = Args::try_parse_from([OsStr::new("scenedump"), scene.as_os_str()]).unwrap();
        assert!(run(&args).is_err());
    }
}
