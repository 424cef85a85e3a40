use super::cli_iast::{IastArgs, run_iast};
use super::cli_render::{RenderArgs, run_render};
use crate::Utils::logging::{init_logging, parse_level};
use crate::Utils::show_this_pic::{find_render, open_with_default_viewer};
use crate::errors::GeoSorbError;
use crate::settings::AppConfig;
use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, error};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "geosorb",
    version,
    about = "Matrix rank animation and binary-mixture IAST isotherms"
)]
pub struct Cli {
    /// error | warn | info | debug | trace
    #[arg(long, global = true, default_value = "info", value_parser = level_arg)]
    pub log_level: LevelFilter,
    /// JSON configuration file, defaults are used for missing fields
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// render the matrix rank animation to a GIF
    Render(RenderArgs),
    /// binary-mixture isotherms from pure-component data
    Iast(IastArgs),
    /// configuration file helpers
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// write the default configuration to FILE
    #[arg(long, value_name = "FILE")]
    pub write: PathBuf,
}

fn level_arg(s: &str) -> Result<LevelFilter, String> {
    parse_level(s).ok_or_else(|| format!("unknown log level '{}'", s))
}

/// Entry point of the `geosorb` binary
pub fn run() -> Result<(), GeoSorbError> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    run_cli(cli)
}

pub fn run_cli(cli: Cli) -> Result<(), GeoSorbError> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Some(Command::Render(args)) => {
            args.apply(&mut config.animation);
            run_render(&config.animation, args.open)?;
        }
        Some(Command::Iast(args)) => {
            args.apply(&mut config.iast);
            run_iast(&config.iast, &args)?;
        }
        Some(Command::Config(args)) => AppConfig::default().save(&args.write)?,
        None => run_interactive_menu(&config),
    }
    Ok(())
}

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Red (\x1b[31m) - errors of the chosen task

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
pub fn run_interactive_menu(config: &AppConfig) {
    loop {
        show_main_menu();
        let Some(choice) = get_user_input() else {
            println!("Goodbye!");
            break;
        };
        let outcome = match choice.trim() {
            "1" => run_render(&config.animation, false).map(|_| ()),
            "2" => run_iast(&config.iast, &IastArgs::default()).map(|_| ()),
            "3" => run_iast(
                &config.iast,
                &IastArgs {
                    no_plot: true,
                    terminal_plot: true,
                    ..Default::default()
                },
            )
            .map(|_| ()),
            "4" => find_render(&config.animation.media_dir, &config.animation.scene)
                .and_then(|path| open_with_default_viewer(&path))
                .map_err(GeoSorbError::from),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        if let Err(e) = outcome {
            error!("{}", e);
            println!("\x1b[31m{}\x1b[0m", e);
        }
    }
}

fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to GeoSorb: matrix rank geometry and binary-mixture adsorption\n \x1b[0m"
    );
    println!("\x1b[33m1. Render the matrix rank animation\x1b[0m");
    println!("\x1b[33m2. IAST binary mixture (plot window)\x1b[0m");
    println!("\x1b[33m3. IAST binary mixture (terminal only)\x1b[0m");
    println!("\x1b[33m4. Open the last rendered animation\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// `None` at end of input
fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Animation::renderer::RenderQuality;
    use crate::Adsorption::isotherm_models::ModelKind;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["geosorb", "render", "MatrixRankGeometry", "-q", "m", "--open"])
            .unwrap();
        match cli.command {
            Some(Command::Render(args)) => {
                assert_eq!(args.scene.as_deref(), Some("MatrixRankGeometry"));
                assert_eq!(args.quality, Some(RenderQuality::Medium));
                assert!(args.open);
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "geosorb",
            "iast",
            "--model",
            "henry",
            "--no-plot",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);
        match cli.command {
            Some(Command::Iast(args)) => {
                assert_eq!(args.model, Some(ModelKind::Henry));
                assert!(args.no_plot);
                assert!(!args.terminal_plot);
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from(["geosorb"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert!(Cli::try_parse_from(["geosorb", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn config_subcommand_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geosorb.json");
        let cli = Cli::try_parse_from(["geosorb", "config", "--write", path.to_str().unwrap()])
            .unwrap();
        run_cli(cli).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }
}
