//! IPC wire codec command-line tool.
//!
//! Encodes JSON values into the schema-less wire format, decodes hex dumps
//! back into JSON, and prints a tag/body breakdown for debugging peers.

use anyhow::{bail, Context};
use bytes::BytesMut;
use clap::{Parser, Subcommand};
use ipc_wire::{
    decode_body, decode_from, encode_body, encode_with, from_json, to_json, wire_type_of,
    DecodeContext, EncodeContext, TypeArrayParams, Value, WireType,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod logging;

use config::{CliConfig, OutputFormat};
use logging::IpcLogFormatter;

/// Environment variable selecting the log level when `--log-level` is absent
const ENV_LOG_LEVEL: &str = "IPC_WIRE_LOG_LEVEL";

/// Schema-less IPC wire codec tool
#[derive(Parser, Debug)]
#[command(name = "ipc-wire-cli", version, about = "Encode, decode and inspect IPC wire values")]
struct Args {
    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Maximum nesting depth accepted when decoding
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Output format for encoded bytes
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON value ("-" reads stdin)
    Encode {
        /// JSON document
        json: String,

        /// Encode as a typed array with this element type chain, e.g. "string"
        /// or "typearray,varint"
        #[arg(long)]
        type_array: Option<String>,
    },

    /// Decode a hex dump into JSON
    Decode {
        /// Hex-encoded bytes, optionally prefixed with 0x
        hex: String,

        /// Offset of the first tag byte
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Show tag, body and round-trip of a JSON value
    Inspect {
        /// JSON document
        json: String,

        /// Encode as a typed array with this element type chain
        #[arg(long)]
        type_array: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
        .unwrap_or_else(|| "warn".to_string());
    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("ipc_wire={}", log_level).parse()?)
        .add_directive(format!("redb_ipc={}", log_level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .event_format(IpcLogFormatter::new("ipc-wire-cli".to_string()))
        .init();

    component_info!("cli", "Starting ipc-wire-cli v{}", env!("CARGO_PKG_VERSION"));

    let mut config = CliConfig::load(args.config.as_deref())?;
    config.apply_args(args.max_depth, args.format);

    let result = match args.command {
        Command::Encode { json, type_array } => run_encode(&config, &json, type_array.as_deref()),
        Command::Decode { hex, offset } => run_decode(&config, &hex, offset),
        Command::Inspect { json, type_array } => {
            run_inspect(&config, &json, type_array.as_deref())
        }
    };

    if let Err(e) = &result {
        component_error!("codec", "{:#}", e);
    }
    result
}

fn run_encode(config: &CliConfig, json: &str, type_array: Option<&str>) -> anyhow::Result<()> {
    let value = parse_value(json)?;
    let ctx = encode_context(type_array)?;
    let encoded = encode_with(&ctx, &value).context("failed to encode value")?;

    component_debug!("codec", "encoded {} into {} bytes", value.type_name(), encoded.len());
    println!("{}", config.format.render(&encoded));
    Ok(())
}

fn run_decode(config: &CliConfig, hex_input: &str, offset: usize) -> anyhow::Result<()> {
    let bytes = parse_hex(hex_input)?;
    let mut ctx = DecodeContext::at(&bytes, offset).with_max_depth(config.max_depth);
    let decoded = decode_from(&mut ctx).context("failed to decode buffer")?;

    let trailing = bytes.len() - ctx.offset();
    if trailing > 0 {
        component_warn!("codec", trailing, "bytes left after offset {}", ctx.offset());
    }

    println!("{}", serde_json::to_string_pretty(&to_json(&decoded.value))?);
    println!("consumed: {} bytes", decoded.consumed);
    Ok(())
}

fn run_inspect(config: &CliConfig, json: &str, type_array: Option<&str>) -> anyhow::Result<()> {
    let value = parse_value(json)?;
    let ctx = encode_context(type_array)?;
    let wire_type = match ctx.wire_type() {
        Some(wire_type) => wire_type,
        None => wire_type_of(&value)?,
    };

    let mut body = BytesMut::new();
    encode_body(wire_type, ctx.params(), &value, &mut body).context("failed to encode body")?;

    let mut decode_ctx = DecodeContext::new(&body).with_max_depth(config.max_depth);
    let decoded = decode_body(&mut decode_ctx, wire_type).context("failed to decode body")?;

    let tag = [wire_type.tag()];
    println!("origin:  {}", to_json(&value));
    println!("type:    {}", wire_type);
    println!("len:     {}", body.len());
    println!("tag:     {}", config.format.render(&tag));
    println!("body:    {}", config.format.render(&body));
    println!("decoded: {}", to_json(&decoded));
    Ok(())
}

fn parse_value(json: &str) -> anyhow::Result<Value> {
    let text = if json == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
    } else {
        json.to_string()
    };
    let doc: serde_json::Value = serde_json::from_str(&text).context("invalid JSON input")?;
    Ok(from_json(&doc)?)
}

fn encode_context(type_array: Option<&str>) -> anyhow::Result<EncodeContext> {
    Ok(match type_array {
        Some(chain) => EncodeContext::for_type_array(TypeArrayParams::parse_chain(chain)?),
        None => EncodeContext::new(),
    })
}

fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    if digits.is_empty() {
        bail!("empty hex input");
    }
    hex::decode(digits).context("invalid hex input")
}
