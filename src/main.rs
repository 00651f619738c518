//! # chekprint CLI
//!
//! Command-line interface for receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Preview the laid-out receipt as text
//! chekprint render receipt.json --preview
//!
//! # Encode for a label printer and save the bytes
//! chekprint render receipt.json --profile label -o receipt.tspl
//!
//! # Print a receipt over Bluetooth
//! chekprint print receipt.json --device /dev/rfcomm0
//!
//! # Print the diagnostic receipt
//! chekprint test-receipt --store "Baraka Savdo"
//!
//! # List bound RFCOMM printers
//! chekprint scan
//! ```
//!
//! Set `RUST_LOG=chekprint=debug` for pipeline logs.

use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use chekprint::{
    ChekError,
    document::ReceiptDocument,
    engine,
    printer::Profile,
    template,
    transport::{BluetoothTransport, DiscoveredDevice, PrinterSession, bluetooth::DEFAULT_DEVICE},
};

/// chekprint - Receipt printing for 58mm thermal printers
#[derive(Parser, Debug)]
#[command(name = "chekprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out and encode a receipt document
    Render {
        /// JSON document path, or `-` for stdin
        input: PathBuf,

        /// Printer profile (escpos, label, label-40x30)
        #[arg(long, default_value = "escpos")]
        profile: Profile,

        /// Write bytes here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the laid-out lines instead of bytes
        #[arg(long)]
        preview: bool,
    },

    /// Render a receipt document and send it to the printer
    Print {
        /// JSON document path, or `-` for stdin
        input: PathBuf,

        /// Printer device path or Bluetooth address
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,

        /// Printer profile (escpos, label, label-40x30)
        #[arg(long, default_value = "escpos")]
        profile: Profile,
    },

    /// Print the diagnostic test receipt
    TestReceipt {
        /// Store name printed at the top
        #[arg(long, default_value = "STORE NAME")]
        store: String,

        /// Printer device path or Bluetooth address
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,

        /// Write bytes here instead of printing
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List printers bound to RFCOMM devices
    Scan {
        /// Scan timeout in seconds
        #[arg(long, default_value = "5")]
        timeout: u64,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ChekError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            profile,
            output,
            preview,
        } => {
            let doc = ReceiptDocument::from_json(&read_input(&input)?)?;
            if preview {
                for line in template::render(&doc)?.lines() {
                    println!("{}", line);
                }
                return Ok(());
            }
            let bytes = engine::render(&doc, &profile)?;
            write_output(output.as_ref(), &bytes)?;
        }

        Commands::Print {
            input,
            device,
            profile,
        } => {
            let bytes = engine::render_json(&read_input(&input)?, &profile)?;
            println!("Printing {} bytes to {}...", bytes.len(), device);
            send_to_printer(&device, bytes)?;
            println!("Printed successfully!");
        }

        Commands::TestReceipt {
            store,
            device,
            output,
        } => {
            let now = chrono::Local::now().naive_local();
            let program = template::test_receipt(&store, now, &Default::default());
            let bytes = program.to_bytes(&Profile::Character);
            match output {
                Some(path) => write_output(Some(&path), &bytes)?,
                None => {
                    send_to_printer(&device, bytes)?;
                    println!("Test receipt printed.");
                }
            }
        }

        Commands::Scan { timeout } => {
            let runtime = tokio::runtime::Runtime::new()?;
            let devices = runtime.block_on(async {
                let session = PrinterSession::spawn(BluetoothTransport::new());
                session.scan(Duration::from_secs(timeout)).await
            })?;
            if devices.is_empty() {
                println!("No bound RFCOMM printers found.");
            }
            for device in devices {
                println!(
                    "  {}  {}",
                    device.id,
                    device.address.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Read a document from a file, or stdin for `-`.
fn read_input(path: &PathBuf) -> Result<String, ChekError> {
    if path.as_os_str() == "-" {
        let mut json = String::new();
        io::stdin().read_to_string(&mut json)?;
        return Ok(json);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> Result<(), ChekError> {
    match path {
        Some(path) => std::fs::write(path, bytes)?,
        None => io::stdout().write_all(bytes)?,
    }
    Ok(())
}

/// Connect, write, and disconnect through a printer session.
fn send_to_printer(device: &str, bytes: Vec<u8>) -> Result<(), ChekError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let session = PrinterSession::spawn(BluetoothTransport::new());
        session
            .connect(DiscoveredDevice::new(device, device))
            .await?;
        let ack = session.write(bytes).await?;
        tracing::info!(bytes = ack.bytes, "receipt sent");
        session.disconnect().await?;
        Ok::<(), ChekError>(())
    })
}
