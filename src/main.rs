//! nlindgen - ngspice code generator for nonlinear inductors
//!
//! # Usage
//!
//! ```bash
//! nlindgen func flux.dat --name Phi --order 3 --odd -o phi.inc
//! nlindgen func loss.dat --name Ur --order 3 --odd --no-params >> phi.inc
//! nlindgen element nlindv2 --phi Phi --ur Ur >> phi.inc
//! nlindgen demo -o raw_spice_all.txt --curves curves.dat
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use nlindgen::{
    compile, debug_element_template,
    demo::{build_demo_deck, DemoConfig, DemoCurves},
    element_template,
    error::{NlindError, Result},
    table, CompileOptions, InterpolationOrder,
};

/// Generate ngspice functions and subcircuits for nonlinear inductors
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a two-column sample table into .PARAM and .FUNC blocks
    Func {
        /// Path to the sample table
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Function name
        #[arg(short, long)]
        name: String,

        /// Polynomial order of the pieces (1 or 3)
        #[arg(long, default_value_t = 1)]
        order: u32,

        /// Treat the characteristic as odd, f(-x) = -f(x)
        #[arg(long)]
        odd: bool,

        /// Omit the .PARAM knot block
        #[arg(long)]
        no_params: bool,

        /// Name prefix of the knot constants
        #[arg(long, default_value = nlindgen::compiler::DEFAULT_KNOT_PREFIX)]
        knot_prefix: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit the nonlinear inductor subcircuit
    Element {
        /// Subcircuit name
        #[arg(value_name = "NAME")]
        name: String,

        /// Flux function name
        #[arg(long, default_value = "Phi")]
        phi: String,

        /// Resistive voltage function name
        #[arg(long, default_value = "Ur")]
        ur: String,

        /// Add probe ports k_L, k_R, i_phi, i_i
        #[arg(long)]
        debug: bool,

        /// Default of the `is` current scaling parameter (debug only)
        #[arg(long, default_value_t = 1.0, requires = "debug")]
        scaling: f64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the bundled saturating-inductor example
    Demo {
        /// Polynomial order of the pieces (1 or 3)
        #[arg(long, default_value_t = 3)]
        order: u32,

        /// Subcircuit name
        #[arg(long, default_value = "nlindv2")]
        element: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the tabulated i, L, R, Phi, Ur curves
        #[arg(long, value_name = "FILE")]
        curves: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Command::Func {
            table: table_path,
            name,
            order,
            odd,
            no_params,
            knot_prefix,
            output,
        } => {
            let order = InterpolationOrder::from_degree(order)?;
            let samples = table::read_table(&table_path)?;
            let options = CompileOptions::new()
                .with_order(order)
                .with_odd(odd)
                .with_emit_params(!no_params)
                .with_knot_prefix(knot_prefix);
            let function = compile(&name, &samples, &options)?;
            write_output(output.as_deref(), &function.render())
        }
        Command::Element {
            name,
            phi,
            ur,
            debug,
            scaling,
            output,
        } => {
            let subcircuit = if debug {
                debug_element_template(&name, &phi, &ur, scaling)?
            } else {
                element_template(&name, &phi, &ur)?
            };
            write_output(output.as_deref(), &subcircuit.render())
        }
        Command::Demo {
            order,
            element,
            output,
            curves,
        } => {
            let config = DemoConfig::new()
                .with_order(InterpolationOrder::from_degree(order)?)
                .with_element_name(element);
            let tabulated = DemoCurves::new(&config);
            let deck = build_demo_deck(&config, &tabulated)?;

            if let Some(path) = curves {
                write_output(Some(&path), &tabulated.to_table())?;
            }
            write_output(output.as_deref(), &deck.render())
        }
    }
}

/// Write `text` to `path`, or to stdout when no path is given.
fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| NlindError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => std::io::stdout()
            .write_all(text.as_bytes())
            .map_err(|e| NlindError::FileWriteError {
                path: "<stdout>".to_string(),
                source: e,
            }),
    }
}
