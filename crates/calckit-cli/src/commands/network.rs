use clap::Args;
use serde_json::Value;

use calckit_core::network::subnet::{self, SubnetInput};

use crate::input::{self, required};

/// Arguments for IPv4 subnet details
#[derive(Args)]
pub struct SubnetArgs {
    /// IPv4 address, optionally in CIDR form (10.1.2.3/20)
    #[arg(long)]
    pub address: Option<String>,

    /// Prefix length (0-32)
    #[arg(long)]
    pub prefix: Option<u8>,

    /// Dotted netmask (255.255.240.0)
    #[arg(long)]
    pub netmask: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_subnet(args: SubnetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let subnet_input: SubnetInput = input::load(args.input.as_deref(), || {
        Ok(SubnetInput {
            address: required(args.address, "address")?,
            prefix_length: args.prefix,
            netmask: args.netmask,
        })
    })?;
    let result = subnet::calculate_subnet(&subnet_input)?;
    Ok(serde_json::to_value(result)?)
}
