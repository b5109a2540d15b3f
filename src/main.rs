use std::time::Duration;

use argh::FromArgs;
use color_eyre::eyre::Context as _;
use tracing_subscriber::EnvFilter;

mod console;
mod shell;
mod simulator;

use console::Terminal;
use shell::{Link, Shell};

const VERSION: &str = git_version::git_version!(
    args = ["--always", "--dirty=-modified"],
    fallback = "unknown"
);

/// Drive a Finch robot through menu-selected demonstrations
#[derive(FromArgs, Debug)]
struct Args {
    /// serial port the robot is attached to
    #[argh(positional)]
    port: Option<String>,

    /// baud rate of the serial link
    #[argh(option, default = "9600")]
    baud: u32,

    /// milliseconds to wait for a sensor reply
    #[argh(option, default = "500")]
    timeout_ms: u64,

    /// use a simulated robot instead of a serial port
    #[argh(switch)]
    simulate: bool,

    /// list the available ports and exit
    #[argh(switch)]
    list: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();

    tracing::debug!(?args, "starting");

    if args.list {
        for port in finch_serial::available_ports().wrap_err("failed to list serial ports")? {
            println!("{port}");
        }

        return Ok(());
    }

    let link = if args.simulate {
        Link::Simulated
    } else {
        Link::Serial {
            port: args.port,
            baud_rate: args.baud,
            timeout: Duration::from_millis(args.timeout_ms),
        }
    };

    let mut console = Terminal::stdio();

    Shell::new(link, VERSION)
        .run(&mut console)
        .wrap_err("console input failed")
}
