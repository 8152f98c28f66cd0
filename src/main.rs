//! Command-line host for the overlay session.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ocr_overlay::config::AppConfig;
use ocr_overlay::format::CsvFormat;
use ocr_overlay::render::{OverlayRenderer, RenderOutput, load_font};
use ocr_overlay::state::{AnnotationStatus, AnnotationStore, Session};

#[derive(Debug, Clone, Parser)]
#[command(name = "ocr-overlay", version, about)]
struct Opts {
    /// configuration file, defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Draw the annotations for one image and save the result
    Render {
        /// source image
        #[arg(long)]
        image: PathBuf,
        /// annotation table
        #[arg(long)]
        csv: PathBuf,
        /// output image file
        #[arg(long)]
        output: PathBuf,
        /// write the image without boxes
        #[arg(long)]
        hide_boxes: bool,
    },
    /// Report rows whose polygon cannot be parsed
    Check {
        /// annotation table
        #[arg(long)]
        csv: PathBuf,
        /// only check rows belonging to this image key
        #[arg(long)]
        image_key: Option<String>,
    },
    /// Interactive session driven by commands on stdin
    Session,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load_from_default_path(),
    };
    init_logging(&config);

    match opts.command {
        Command::Render {
            image,
            csv,
            output,
            hide_boxes,
        } => render(&config, &image, &csv, &output, hide_boxes)?,
        Command::Check { csv, image_key } => check(&csv, image_key.as_deref())?,
        Command::Session => run_session(&config)?,
    }

    Ok(())
}

/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &AppConfig) {
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();
}

fn build_session(config: &AppConfig) -> Session {
    let font = match load_font(config.font_path.as_deref()) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("{}; labels will be drawn without text", e);
            None
        }
    };
    let renderer = OverlayRenderer::new(config.render.clone(), font);
    Session::new(renderer).with_export_path(&config.export_path)
}

fn render(config: &AppConfig, image: &Path, csv: &Path, output: &Path, hide: bool) -> Result<()> {
    let mut session = build_session(config);
    session.load_image(image)?;
    session.load_csv(csv)?;
    session.set_boxes_visible(!hide);

    let Some(out) = session.annotate() else {
        bail!("no image loaded");
    };
    report_skipped(&out);
    write_image(&out, output)?;
    println!("{} annotations drawn, wrote {}", out.drawn, output.display());
    Ok(())
}

fn check(csv: &Path, image_key: Option<&str>) -> Result<()> {
    let table = CsvFormat.import(csv)?;
    let mut store = AnnotationStore::new();
    store.load(table);

    let mut total = 0;
    let mut failed = 0;
    for (row, record) in store.filter_by_image(image_key) {
        total += 1;
        if let Err(e) = record.parse_polygon() {
            failed += 1;
            println!(
                "data row {} (text_id {:?}): {}",
                row + 1,
                record.text_id.as_deref().unwrap_or(""),
                e
            );
        }
    }

    println!("{} rows checked, {} with unusable polygons", total, failed);
    Ok(())
}

fn report_skipped(out: &RenderOutput<'_>) {
    for skipped in &out.skipped {
        eprintln!(
            "skipped data row {} (text_id {:?}): {}",
            skipped.row + 1,
            skipped.text_id.as_deref().unwrap_or(""),
            skipped.error
        );
    }
}

fn write_image(out: &RenderOutput<'_>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    out.image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

const SESSION_HELP: &str = "\
commands:
  image <path>      load the current image
  csv <path>        load an annotation table
  edit <path>       replace the loaded table with an edited copy
  annotate <out>    render the current image to <out>
  toggle [out]      flip box visibility, optionally rendering to [out]
  status            show what is loaded
  save [path]       write the table to [path] or the configured export path
  quit";

fn run_session(config: &AppConfig) -> Result<()> {
    let mut session = build_session(config);
    println!("{}", SESSION_HELP);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let arg = parts.next().map(PathBuf::from);

        // Action failures are reported and the session keeps its state
        if let Err(e) = session_command(&mut session, command, arg.as_deref()) {
            eprintln!("error: {:#}", e);
        }
        if command == "quit" {
            break;
        }
    }

    Ok(())
}

fn session_command(session: &mut Session, command: &str, arg: Option<&Path>) -> Result<()> {
    match (command, arg) {
        ("image", Some(path)) => {
            session.load_image(path)?;
            print_status(session);
        }
        ("csv", Some(path)) => {
            let rows = session.load_csv(path)?;
            println!("{} rows loaded", rows);
            print_status(session);
        }
        ("edit", Some(path)) => {
            let table = CsvFormat.import(path)?;
            session.update_table(table);
            print_status(session);
        }
        ("annotate", Some(output)) => match session.annotate() {
            Some(out) => {
                report_skipped(&out);
                write_image(&out, output)?;
                println!("{} annotations drawn, wrote {}", out.drawn, output.display());
            }
            None => println!("no image loaded"),
        },
        ("toggle", output) => {
            let out = session.toggle_boxes();
            match (out, output) {
                (Some(out), Some(output)) => {
                    write_image(&out, output)?;
                    println!("wrote {}", output.display());
                }
                (None, Some(_)) => println!("no image loaded"),
                (_, None) => {}
            }
            println!(
                "boxes {}",
                if session.boxes_visible() { "shown" } else { "hidden" }
            );
        }
        ("status", _) => print_status(session),
        ("save", path) => {
            let written = match path {
                Some(path) => session.save_csv_to(path)?,
                None => session.save_csv()?,
            };
            println!("saved {}", written.display());
        }
        ("quit", _) => {}
        ("help", _) => println!("{}", SESSION_HELP),
        _ => println!("unknown command, try `help`"),
    }
    Ok(())
}

fn print_status(session: &Session) {
    let image = match session.current_image() {
        Some(loaded) => {
            let name = loaded
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string());
            format!(
                "{} ({}x{}, key {:?})",
                name,
                loaded.image.width(),
                loaded.image.height(),
                loaded.key.as_deref().unwrap_or("")
            )
        }
        None => "none".to_string(),
    };
    let annotations = match session.annotation_status() {
        AnnotationStatus::NoTable => "no table loaded".to_string(),
        AnnotationStatus::NoneForImage => "no annotations for this image".to_string(),
        AnnotationStatus::Available(n) => format!("{} annotations for this image", n),
    };
    println!("image: {}; {}", image, annotations);
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{DynamicImage, RgbImage};
    use ocr_overlay::data::LoadedImage;
    use ocr_overlay::render::RenderStyle;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ocr_overlay_cli_{}_{}.csv",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_edit_command_replaces_table() {
        let mut session = Session::new(OverlayRenderer::new(RenderStyle::default(), None));
        session.set_image(LoadedImage::from_memory(
            DynamicImage::ImageRgb8(RgbImage::new(100, 100)),
            Some("page_01.png"),
        ));

        let original = temp_csv("original", "text_id,polygon\n1,\"[[1,1],[9,1],[9,9]]\"\n");
        let edited = temp_csv(
            "edited",
            "text_id,polygon\n1,\"[[1,1],[9,1],[9,9]]\"\n2,\"[[20,20],[40,20],[40,40]]\"\n",
        );

        session_command(&mut session, "csv", Some(&original)).unwrap();
        assert_eq!(session.annotation_status(), AnnotationStatus::Available(1));

        session_command(&mut session, "edit", Some(&edited)).unwrap();
        assert_eq!(session.annotation_status(), AnnotationStatus::Available(2));
        assert_eq!(session.annotate().unwrap().drawn, 2);

        let _ = std::fs::remove_file(&original);
        let _ = std::fs::remove_file(&edited);
    }

    #[test]
    fn test_failed_edit_keeps_table() {
        let mut session = Session::new(OverlayRenderer::new(RenderStyle::default(), None));
        let original = temp_csv("keep", "polygon\n\"[[1,1],[9,1],[9,9]]\"\n");
        session_command(&mut session, "csv", Some(&original)).unwrap();

        let missing = std::env::temp_dir().join("ocr_overlay_cli_missing_edit.csv");
        assert!(session_command(&mut session, "edit", Some(&missing)).is_err());
        assert_eq!(session.store().len(), 1);

        let _ = std::fs::remove_file(&original);
    }
}
