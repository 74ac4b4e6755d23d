//! iogo: tools for working with Nomad job specifications.

use std::{io::Write, process::ExitCode};

use clap::{Parser, Subcommand};
use facet_hcl::{HclError, job::RenderedExport, stdio::Endpoint};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status for encode errors: the schema and the value graph disagree.
const EXIT_SOFTWARE: u8 = 70;

#[derive(Parser, Debug)]
#[command(name = "iogo", version, about = "Nomad job specification tools")]
struct Cli {
    /// Log at debug level (otherwise `RUST_LOG`, or warnings only)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a job from Nomad's JSON form to HCL
    Json2hcl {
        /// JSON input file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: Endpoint,

        /// HCL output file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Endpoint,
    },
    /// Write one job of a rendered export as HCL
    Render {
        /// Namespace the job is rendered in
        #[arg(long, env = "NOMAD_NAMESPACE")]
        namespace: String,

        /// Name of the job
        #[arg(env = "NOMAD_JOB")]
        job: String,

        /// Export document (JSON), `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: Endpoint,

        /// HCL output file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Endpoint,
    },
    /// List the namespaces of a rendered export
    ListNamespaces {
        /// Export document (JSON), `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: Endpoint,

        /// Output file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Endpoint,
    },
    /// List the jobs of a rendered export as `namespace job` lines
    ListJobs {
        /// Export document (JSON), `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: Endpoint,

        /// Output file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Endpoint,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (status, message) = failure(&err);
            eprintln!("{message}");
            ExitCode::from(status)
        }
    }
}

/// Exit status and diagnostic for a failed command.
fn failure(err: &HclError) -> (u8, String) {
    if err.is_fatal() {
        (EXIT_SOFTWARE, format!("fatal: {err}"))
    } else {
        (1, format!("error: {err}"))
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(command: Commands) -> Result<(), HclError> {
    match command {
        Commands::Json2hcl { input, output } => {
            log::debug!("Converting {input} to {output}");
            let json = input.read_all()?;
            let hcl = facet_hcl::json_to_hcl(&json)?;
            write_all(&output, hcl.as_bytes())
        }
        Commands::Render {
            namespace,
            job,
            input,
            output,
        } => {
            log::debug!("Rendering {namespace}/{job} from {input} to {output}");
            let export = RenderedExport::from_json(&input.read_all()?)?;
            let hcl = facet_hcl::to_string("job", export.job(&namespace, &job)?)?;
            write_all(&output, hcl.as_bytes())
        }
        Commands::ListNamespaces { input, output } => {
            let export = RenderedExport::from_json(&input.read_all()?)?;
            let mut listing = String::new();
            for namespace in export.namespaces() {
                listing.push_str(namespace);
                listing.push('\n');
            }
            write_all(&output, listing.as_bytes())
        }
        Commands::ListJobs { input, output } => {
            let export = RenderedExport::from_json(&input.read_all()?)?;
            let mut listing = String::new();
            for (namespace, job) in export.jobs() {
                listing.push_str(&format!("{namespace} {job}\n"));
            }
            write_all(&output, listing.as_bytes())
        }
    }
}

fn write_all(output: &Endpoint, bytes: &[u8]) -> Result<(), HclError> {
    let mut sink = output.open_output()?;
    sink.write_all(bytes)?;
    sink.flush()?;
    Ok(())
}
