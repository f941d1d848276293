use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "photoframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the frames available in a frames directory.
    List(ListArgs),
    /// Print the slots of a frame as JSON.
    Slots(SlotsArgs),
    /// Fill a frame's slots with photos and export a print-size PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Frames directory (defaults to the config's `frames_dir`).
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SlotsArgs {
    /// Frame file name inside the frames directory.
    #[arg(long)]
    frame: Option<String>,

    /// Frames directory (defaults to the config's `frames_dir`).
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Frame file name inside the frames directory.
    #[arg(long)]
    frame: Option<String>,

    /// Frames directory (defaults to the config's `frames_dir`).
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Photo for a slot, as `SLOT=PATH` (repeatable).
    #[arg(long = "photo", value_parser = parse_photo_arg)]
    photos: Vec<(String, PathBuf)>,

    /// Logo color as `#rgb` or `#rrggbb`.
    #[arg(long)]
    logo_color: Option<String>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print width in millimetres.
    #[arg(long)]
    width_mm: Option<f64>,

    /// Print height in millimetres.
    #[arg(long)]
    height_mm: Option<f64>,

    /// Print resolution in dots per inch.
    #[arg(long)]
    dpi: Option<f64>,

    /// Extra directory of fonts for frame text (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Output PNG path (defaults to the config's `output_name`).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct SlotJson<'a> {
    id: &'a str,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

fn parse_photo_arg(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((slot, path)) if !slot.is_empty() && !path.is_empty() => {
            Ok((slot.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected SLOT=PATH, got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Slots(args) => cmd_slots(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<photoframe::EditorConfig> {
    match path {
        Some(p) => photoframe::EditorConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(photoframe::EditorConfig::default()),
    }
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let dir = args.frames.unwrap_or(cfg.frames_dir);
    let source = photoframe::DirSource::new(dir);
    for name in photoframe::list_frames(&source) {
        println!("{name}");
    }
    Ok(())
}

fn cmd_slots(args: SlotsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let source = photoframe::DirSource::new(args.frames.unwrap_or_else(|| cfg.frames_dir.clone()));
    let frame = args.frame.unwrap_or_else(|| cfg.default_frame.clone());

    let mut editor = photoframe::Editor::new(cfg);
    editor
        .load_frame(&source, &frame)
        .with_context(|| format!("load frame '{frame}'"))?;

    let slots: Vec<SlotJson<'_>> = editor
        .slots()
        .iter()
        .map(|s| SlotJson {
            id: s.id.as_str(),
            x: s.rect.x0,
            y: s.rect.y0,
            w: s.rect.width(),
            h: s.rect.height(),
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&slots).context("serialize slots")?
    );
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(w) = args.width_mm {
        cfg.print.width_mm = w;
    }
    if let Some(h) = args.height_mm {
        cfg.print.height_mm = h;
    }
    if let Some(dpi) = args.dpi {
        cfg.print.dpi = dpi;
    }
    cfg.font_dirs.extend(args.font_dirs);
    cfg.validate()?;

    let source = photoframe::DirSource::new(args.frames.unwrap_or_else(|| cfg.frames_dir.clone()));
    let frame = args.frame.unwrap_or_else(|| cfg.default_frame.clone());
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(cfg.output_name.clone()));

    let mut editor = photoframe::Editor::new(cfg);
    if let Some(color) = &args.logo_color {
        editor.set_logo_color(photoframe::LogoColor::parse(color)?);
    }
    editor
        .load_frame(&source, &frame)
        .with_context(|| format!("load frame '{frame}'"))?;

    for (slot, path) in &args.photos {
        let id = photoframe::SlotId::from(slot.as_str());
        if editor.session().slot(&id).is_none() {
            anyhow::bail!("frame '{frame}' has no slot '{slot}'");
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        editor
            .insert_image_into(&id, &bytes)
            .with_context(|| format!("insert '{}' into {slot}", path.display()))?;
    }

    let png = editor.export_png()?;
    png.save(&out)?;

    eprintln!("wrote {} ({}x{})", out.display(), png.width, png.height);
    Ok(())
}
